//! The checkout gate.
//!
//! The single precondition-guarded transition that ends a stay: no checkout
//! while money is still owed. On success the stay's `actual_check_out` is
//! set exactly once, the room goes to `Dirty` for housekeeping, and the
//! occupancy becomes immutable — the ledger and the revision service both
//! refuse it from then on.

use crate::{
    core::{Scope, billing, payment::load_scoped_occupancy},
    entities::{Occupancy, Room, RoomStatus, occupancy, room},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait, sea_query::Expr,
};
use tracing::info;

/// Receipt data for a completed checkout.
#[derive(Debug, Clone)]
pub struct CheckoutSummary {
    /// The closed occupancy
    pub occupancy: occupancy::Model,
    /// Nights actually stayed, for the receipt
    pub nights_stayed: i64,
}

/// Closes an active stay and returns the room to housekeeping.
///
/// The close is a conditional update guarded on `actual_check_out IS NULL`
/// and a settled balance, so it can succeed at most once; a retry after a
/// timeout deterministically reports `AlreadyClosed` instead of corrupting
/// the ledger.
///
/// # Errors
/// `PaymentIncomplete` (carrying the outstanding balance) while money is
/// owed, `AlreadyClosed` on a second call, `NotFound`/`Forbidden` for
/// unknown or out-of-scope occupancies.
pub async fn checkout(
    db: &DatabaseConnection,
    scope: &Scope,
    occupancy_id: i64,
) -> Result<CheckoutSummary> {
    let txn = db.begin().await?;

    let stay = load_scoped_occupancy(&txn, scope, occupancy_id).await?;

    if !stay.is_active() {
        return Err(Error::AlreadyClosed { occupancy_id });
    }

    // The central business rule: no checkout with an open balance.
    // A negative balance (refund owed after a revision) does not block.
    if stay.balance_amount > 0.0 {
        return Err(Error::PaymentIncomplete {
            balance: stay.balance_amount,
        });
    }

    let now = Utc::now();

    let closed = Occupancy::update_many()
        .col_expr(occupancy::Column::ActualCheckOut, Expr::value(now))
        .filter(occupancy::Column::Id.eq(occupancy_id))
        .filter(occupancy::Column::ActualCheckOut.is_null())
        .filter(occupancy::Column::BalanceAmount.lte(0.0))
        .exec(&txn)
        .await?;

    if closed.rows_affected == 0 {
        // Lost a race since the read above; re-read to report accurately
        let current = Occupancy::find_by_id(occupancy_id)
            .one(&txn)
            .await?
            .ok_or(Error::NotFound {
                entity: "occupancy",
                id: occupancy_id,
            })?;
        if current.is_active() {
            return Err(Error::PaymentIncomplete {
                balance: current.balance_amount,
            });
        }
        return Err(Error::AlreadyClosed { occupancy_id });
    }

    // A room pulled to Maintenance mid-stay stays there; only an occupied
    // room goes back to housekeeping
    Room::update_many()
        .col_expr(room::Column::Status, Expr::value(RoomStatus::Dirty))
        .filter(room::Column::Id.eq(stay.room_id))
        .filter(room::Column::Status.eq(RoomStatus::Occupied))
        .exec(&txn)
        .await?;

    let occupancy = Occupancy::find_by_id(occupancy_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "occupancy",
            id: occupancy_id,
        })?;

    txn.commit().await?;

    let nights_stayed = billing::nights_between(occupancy.check_in_time, now);

    info!(
        occupancy_id,
        room_id = occupancy.room_id,
        nights_stayed,
        "checkout complete"
    );

    Ok(CheckoutSummary {
        occupancy,
        nights_stayed,
    })
}
