//! The per-stay payment ledger.
//!
//! Payments are append-only rows against an active occupancy, and the
//! occupancy's running columns are the derived view of them:
//! `sum(payments.amount) == paid_amount` and
//! `balance_amount == total_amount − paid_amount` hold after every call.
//! Overpayment is rejected outright, never clamped, so `balance_amount`
//! stays non-negative at this boundary.

use crate::{
    core::Scope,
    entities::{Occupancy, Payment, Room, occupancy, payment},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait, sea_query::Expr,
};
use tracing::debug;

/// Records a payment against an active stay and moves the running balance.
///
/// The balance check and the balance write are one conditional UPDATE
/// inside the transaction, so a concurrent payment or checkout on the same
/// stay cannot interleave between them.
///
/// # Errors
/// `Validation` for a non-positive or non-finite amount or blank method,
/// `NotFound` for an unknown occupancy, `Forbidden` for a cross-property
/// occupancy, `AlreadyClosed` once the stay has ended, and
/// `ExceedsBalance` (carrying both amounts) when the payment would overpay.
pub async fn record_payment(
    db: &DatabaseConnection,
    scope: &Scope,
    occupancy_id: i64,
    amount: f64,
    method: String,
    external_ref: Option<String>,
) -> Result<occupancy::Model> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::Validation {
            field: "amount",
            message: format!("must be a positive amount, got {amount}"),
        });
    }

    if method.trim().is_empty() {
        return Err(Error::Validation {
            field: "method",
            message: "payment method cannot be empty".to_string(),
        });
    }

    let txn = db.begin().await?;

    let stay = load_scoped_occupancy(&txn, scope, occupancy_id).await?;

    if !stay.is_active() {
        return Err(Error::AlreadyClosed { occupancy_id });
    }

    if amount > stay.balance_amount {
        return Err(Error::ExceedsBalance {
            requested: amount,
            balance: stay.balance_amount,
        });
    }

    let now = Utc::now();

    // Balance check and write in one statement: the guards re-assert the
    // preconditions so no other writer can have slipped in between.
    let moved = Occupancy::update_many()
        .col_expr(
            occupancy::Column::PaidAmount,
            Expr::col(occupancy::Column::PaidAmount).add(amount),
        )
        .col_expr(
            occupancy::Column::BalanceAmount,
            Expr::col(occupancy::Column::BalanceAmount).sub(amount),
        )
        .col_expr(occupancy::Column::LastPaidDate, Expr::value(now))
        .filter(occupancy::Column::Id.eq(occupancy_id))
        .filter(occupancy::Column::ActualCheckOut.is_null())
        .filter(occupancy::Column::BalanceAmount.gte(amount))
        .exec(&txn)
        .await?;

    if moved.rows_affected == 0 {
        // Lost a race since the read above; re-read to report accurately
        return Err(classify_rejection(&txn, occupancy_id, amount).await?);
    }

    let row = payment::ActiveModel {
        occupancy_id: Set(occupancy_id),
        amount: Set(amount),
        method: Set(method),
        paid_at: Set(now),
        external_ref: Set(external_ref),
        recorded_by: Set(scope.user_id.clone()),
        ..Default::default()
    };
    row.insert(&txn).await?;

    let updated = Occupancy::find_by_id(occupancy_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "occupancy",
            id: occupancy_id,
        })?;

    txn.commit().await?;

    debug!(
        occupancy_id,
        amount,
        balance = updated.balance_amount,
        "payment recorded"
    );

    Ok(updated)
}

/// All payments for a stay, newest first.
pub async fn get_payments_for_occupancy<C: ConnectionTrait>(
    db: &C,
    occupancy_id: i64,
) -> Result<Vec<payment::Model>> {
    Payment::find()
        .filter(payment::Column::OccupancyId.eq(occupancy_id))
        .order_by_desc(payment::Column::PaidAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a specific payment by its unique ID.
pub async fn get_payment_by_id<C: ConnectionTrait>(
    db: &C,
    payment_id: i64,
) -> Result<Option<payment::Model>> {
    Payment::find_by_id(payment_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Fetches an occupancy and enforces the caller's property scope through
/// the occupancy's room.
pub(crate) async fn load_scoped_occupancy<C: ConnectionTrait>(
    db: &C,
    scope: &Scope,
    occupancy_id: i64,
) -> Result<occupancy::Model> {
    let stay = Occupancy::find_by_id(occupancy_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "occupancy",
            id: occupancy_id,
        })?;

    let room = Room::find_by_id(stay.room_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "room",
            id: stay.room_id,
        })?;

    if room.property_id != scope.property_id {
        return Err(Error::Forbidden {
            property_id: room.property_id,
        });
    }

    Ok(stay)
}

async fn classify_rejection(
    txn: &DatabaseTransaction,
    occupancy_id: i64,
    amount: f64,
) -> Result<Error> {
    let Some(stay) = Occupancy::find_by_id(occupancy_id).one(txn).await? else {
        return Ok(Error::NotFound {
            entity: "occupancy",
            id: occupancy_id,
        });
    };

    if !stay.is_active() {
        return Ok(Error::AlreadyClosed { occupancy_id });
    }

    Ok(Error::ExceedsBalance {
        requested: amount,
        balance: stay.balance_amount,
    })
}
