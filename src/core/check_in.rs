//! Check-in orchestration.
//!
//! Turns a vacant (or reserved) room into an active occupancy in one
//! all-or-nothing unit: claim the room, resolve every guest, create the
//! occupancy and its guest links, record the optional first payment. Any
//! failure past validation rolls the whole unit back — the room is never
//! left `Occupied` without an occupancy row, and no payment row can exist
//! without its occupancy.
//!
//! Two concurrent check-ins against the same room cannot both succeed: the
//! room is claimed with a conditional update on its status, and the partial
//! unique index on open occupancies backstops the claim at the storage
//! layer.

use crate::{
    core::{
        Scope, billing,
        guest::{self, GuestDescriptor, ResolvedGuest},
    },
    entities::{Room, RoomStatus, occupancy, occupancy_guest, payment, room},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, Set, SqlErr, TransactionTrait, sea_query::Expr,
};
use std::time::Duration;
use tracing::info;

/// First payment collected at the desk during check-in.
#[derive(Debug, Clone)]
pub struct InitialPayment {
    /// Amount collected; must be positive and no more than the stay total
    pub amount: f64,
    /// Payment method (e.g., "cash", "card")
    pub method: String,
    /// External transaction reference, if the method produced one
    pub external_ref: Option<String>,
}

/// Everything a check-in needs, validated as a unit before any write.
#[derive(Debug, Clone)]
pub struct CheckInRequest {
    /// Room to check into
    pub room_id: i64,
    /// When the guests arrived
    pub check_in_time: DateTime<Utc>,
    /// Planned departure; None bills a single night until revised
    pub expected_check_out: Option<DateTime<Utc>>,
    /// Contracted nightly rate
    pub rate: f64,
    /// Number of occupants
    pub occupant_count: i32,
    /// One descriptor per guest; at most one may claim primary
    pub guests: Vec<GuestDescriptor>,
    /// Optional first payment collected at the desk
    pub initial_payment: Option<InitialPayment>,
    /// Where the booking came from
    pub booking_source: Option<String>,
    /// Opaque group/corporate booking reference
    pub booking_ref: Option<String>,
}

/// The created stay, ready for display.
#[derive(Debug, Clone)]
pub struct CheckInOutcome {
    /// The new occupancy row
    pub occupancy: occupancy::Model,
    /// Guests linked to the stay, primary flag settled
    pub guests: Vec<ResolvedGuest>,
    /// The first payment, when one was collected
    pub initial_payment: Option<payment::Model>,
}

/// Checks a guest group into a room.
///
/// Validation happens entirely before the transaction begins; the
/// transactional unit then claims the room, resolves guests, and creates
/// the occupancy, link, and payment rows. The unit runs under an extended
/// deadline (`timeout`, configurable, 15s by default) because it performs
/// several dependent writes.
///
/// # Errors
/// `Validation` for bad input, `NotFound`/`Forbidden` for an unknown or
/// out-of-scope room, `RoomNotAvailable` when the room cannot be claimed,
/// `Timeout` when the deadline elapses (the transaction rolls back).
pub async fn check_in(
    db: &DatabaseConnection,
    scope: &Scope,
    request: CheckInRequest,
    timeout: Duration,
) -> Result<CheckInOutcome> {
    validate_request(&request)?;

    let seconds = timeout.as_secs();
    let outcome = tokio::time::timeout(timeout, perform_check_in(db, scope, request))
        .await
        .map_err(|_| Error::Timeout { seconds })??;

    info!(
        occupancy_id = outcome.occupancy.id,
        room_id = outcome.occupancy.room_id,
        total = outcome.occupancy.total_amount,
        balance = outcome.occupancy.balance_amount,
        "check-in complete"
    );

    Ok(outcome)
}

fn validate_request(request: &CheckInRequest) -> Result<()> {
    guest::validate_descriptors(&request.guests)?;

    if !request.rate.is_finite() || request.rate <= 0.0 {
        return Err(Error::Validation {
            field: "rate",
            message: format!("must be a positive amount, got {}", request.rate),
        });
    }

    if request.occupant_count < 1 {
        return Err(Error::Validation {
            field: "occupant_count",
            message: format!("must be at least 1, got {}", request.occupant_count),
        });
    }

    if let Some(expected) = request.expected_check_out {
        billing::validate_stay_window(request.check_in_time, expected)?;
    }

    if let Some(initial) = &request.initial_payment {
        if !initial.amount.is_finite() || initial.amount <= 0.0 {
            return Err(Error::Validation {
                field: "initial_payment.amount",
                message: format!("must be a positive amount, got {}", initial.amount),
            });
        }
        if initial.method.trim().is_empty() {
            return Err(Error::Validation {
                field: "initial_payment.method",
                message: "payment method cannot be empty".to_string(),
            });
        }

        // The ledger boundary: a stay can never start already overpaid
        let nights = billing::nights_for_stay(request.check_in_time, request.expected_check_out);
        let total = billing::total_for(request.rate, nights);
        if initial.amount > total {
            return Err(Error::ExceedsBalance {
                requested: initial.amount,
                balance: total,
            });
        }
    }

    Ok(())
}

async fn perform_check_in(
    db: &DatabaseConnection,
    scope: &Scope,
    request: CheckInRequest,
) -> Result<CheckInOutcome> {
    let txn = db.begin().await?;

    let room = Room::find_by_id(request.room_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "room",
            id: request.room_id,
        })?;

    if room.property_id != scope.property_id {
        return Err(Error::Forbidden {
            property_id: room.property_id,
        });
    }

    claim_room(&txn, &room).await?;

    let guests = guest::resolve_guests(&txn, &request.guests).await?;

    let nights = billing::nights_for_stay(request.check_in_time, request.expected_check_out);
    let total = billing::total_for(request.rate, nights);
    let paid = request.initial_payment.as_ref().map_or(0.0, |p| p.amount);
    let now = Utc::now();

    let occupancy_row = occupancy::ActiveModel {
        room_id: Set(room.id),
        check_in_time: Set(request.check_in_time),
        expected_check_out: Set(request.expected_check_out),
        actual_check_out: Set(None),
        rate: Set(request.rate),
        occupant_count: Set(request.occupant_count),
        total_amount: Set(total),
        paid_amount: Set(paid),
        balance_amount: Set(total - paid),
        last_paid_date: Set(request.initial_payment.as_ref().map(|_| now)),
        booking_source: Set(request.booking_source.clone()),
        booking_ref: Set(request.booking_ref.clone()),
        ..Default::default()
    };

    // The partial unique index on open occupancies backstops the room claim;
    // a violation means another stay is already active on this room.
    let occupancy = occupancy_row.insert(&txn).await.map_err(|e| {
        if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            Error::RoomNotAvailable {
                status: RoomStatus::Occupied,
            }
        } else {
            Error::Database(e)
        }
    })?;

    for resolved in &guests {
        let link = occupancy_guest::ActiveModel {
            occupancy_id: Set(occupancy.id),
            guest_id: Set(resolved.guest.id),
            is_primary: Set(resolved.is_primary),
            ..Default::default()
        };
        link.insert(&txn).await?;
    }

    let initial_payment = match &request.initial_payment {
        Some(initial) => {
            let row = payment::ActiveModel {
                occupancy_id: Set(occupancy.id),
                amount: Set(initial.amount),
                method: Set(initial.method.clone()),
                paid_at: Set(now),
                external_ref: Set(initial.external_ref.clone()),
                recorded_by: Set(scope.user_id.clone()),
                ..Default::default()
            };
            Some(row.insert(&txn).await?)
        }
        None => None,
    };

    txn.commit().await?;

    Ok(CheckInOutcome {
        occupancy,
        guests,
        initial_payment,
    })
}

/// Claims the room for the new stay with a single conditional update:
/// `status = Occupied` only while the current status still permits
/// check-in. Zero rows affected means another writer got there first (or
/// the room was never available) and the whole unit aborts.
async fn claim_room(txn: &DatabaseTransaction, room: &room::Model) -> Result<()> {
    let claimed = Room::update_many()
        .col_expr(room::Column::Status, Expr::value(RoomStatus::Occupied))
        .filter(room::Column::Id.eq(room.id))
        .filter(room::Column::Status.is_in([RoomStatus::Vacant, RoomStatus::Reserved]))
        .exec(txn)
        .await?;

    if claimed.rows_affected == 0 {
        return Err(Error::RoomNotAvailable {
            status: room.status,
        });
    }

    Ok(())
}
