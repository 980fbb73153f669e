//! Stay revision - rate and date edits to an active occupancy.
//!
//! Revising a stay recomputes `nights`, `total_amount`, and
//! `balance_amount` from the updated values. `paid_amount` is never touched
//! here; only the payment ledger moves it. A revision that drives the total
//! below what has already been paid yields a negative balance on purpose —
//! the sign is preserved for the caller to surface as refund-owed.

use crate::{
    core::{Scope, billing, payment::load_scoped_occupancy},
    entities::occupancy,
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};
use tracing::info;

/// Revises the expected departure and/or nightly rate of an active stay.
///
/// # Errors
/// `Validation` when neither field is supplied, the new rate is not a
/// positive finite amount, or the new departure falls outside the allowed
/// window; `AlreadyClosed` once the stay has ended; `NotFound`/`Forbidden`
/// for unknown or out-of-scope occupancies.
pub async fn revise_stay(
    db: &DatabaseConnection,
    scope: &Scope,
    occupancy_id: i64,
    new_expected_check_out: Option<DateTime<Utc>>,
    new_rate: Option<f64>,
) -> Result<occupancy::Model> {
    if new_expected_check_out.is_none() && new_rate.is_none() {
        return Err(Error::Validation {
            field: "revision",
            message: "supply a new expected checkout and/or a new rate".to_string(),
        });
    }

    if let Some(rate) = new_rate {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(Error::Validation {
                field: "rate",
                message: format!("must be a positive amount, got {rate}"),
            });
        }
    }

    let txn = db.begin().await?;

    let stay = load_scoped_occupancy(&txn, scope, occupancy_id).await?;

    if !stay.is_active() {
        return Err(Error::AlreadyClosed { occupancy_id });
    }

    if let Some(expected) = new_expected_check_out {
        billing::validate_stay_window(stay.check_in_time, expected)?;
    }

    let effective_check_out = new_expected_check_out.or(stay.expected_check_out);
    let effective_rate = new_rate.unwrap_or(stay.rate);

    let nights = billing::nights_for_stay(stay.check_in_time, effective_check_out);
    let total = billing::total_for(effective_rate, nights);
    // Literal formula: the result may be negative when the stay has been
    // shortened or discounted past what was already collected
    let balance = total - stay.paid_amount;

    let mut active: occupancy::ActiveModel = stay.into();
    active.expected_check_out = Set(effective_check_out);
    active.rate = Set(effective_rate);
    active.total_amount = Set(total);
    active.balance_amount = Set(balance);
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    info!(
        occupancy_id,
        nights,
        total,
        balance,
        "stay revised"
    );

    Ok(updated)
}
