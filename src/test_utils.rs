//! Shared test utilities for the occupancy engine.
//!
//! This module provides common helper functions for setting up test
//! databases and seeding rooms, guests, and stays with sensible defaults.

use crate::{
    core::{
        Scope,
        check_in::{CheckInOutcome, CheckInRequest, InitialPayment, check_in},
        guest::GuestDescriptor,
    },
    entities::{RoomStatus, room},
    errors::Result,
};
use chrono::{TimeDelta, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::time::Duration;

/// Extended transaction deadline used by every test check-in.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Creates an in-memory `SQLite` database with all tables and indexes.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// The default authorization context: property 1, a receptionist user.
pub fn test_scope() -> Scope {
    Scope {
        property_id: 1,
        user_id: "receptionist-1".to_string(),
    }
}

/// Seeds a vacant room on property 1.
///
/// # Defaults
/// * `capacity`: 2
/// * `price_per_night`: 1000.0
/// * `status`: `Vacant`
pub async fn create_test_room(db: &DatabaseConnection, number: &str) -> Result<room::Model> {
    create_room_for_property(db, number, 1).await
}

/// Seeds a vacant room on a specific property, for scope tests.
pub async fn create_room_for_property(
    db: &DatabaseConnection,
    number: &str,
    property_id: i64,
) -> Result<room::Model> {
    let model = room::ActiveModel {
        property_id: Set(property_id),
        number: Set(number.to_string()),
        capacity: Set(2),
        price_per_night: Set(1000.0),
        status: Set(RoomStatus::Vacant),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Seeds a room on property 1 in a specific status.
pub async fn create_room_with_status(
    db: &DatabaseConnection,
    number: &str,
    status: RoomStatus,
) -> Result<room::Model> {
    let model = room::ActiveModel {
        property_id: Set(1),
        number: Set(number.to_string()),
        capacity: Set(2),
        price_per_night: Set(1000.0),
        status: Set(status),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// A guest descriptor with only a name: no identity proof, not primary.
pub fn guest_descriptor(name: &str) -> GuestDescriptor {
    GuestDescriptor {
        name: name.to_string(),
        ..Default::default()
    }
}

/// A guest descriptor carrying an identity-proof pair.
pub fn guest_with_id_proof(name: &str, proof_type: &str, proof_number: &str) -> GuestDescriptor {
    GuestDescriptor {
        name: name.to_string(),
        id_proof_type: Some(proof_type.to_string()),
        id_proof_number: Some(proof_number.to_string()),
        ..Default::default()
    }
}

/// Checks a single guest into a room for `nights` nights at `rate`, with an
/// optional cash down payment. The workhorse for ledger and checkout tests.
pub async fn check_in_test_stay(
    db: &DatabaseConnection,
    room_id: i64,
    rate: f64,
    nights: i64,
    initial_amount: Option<f64>,
) -> Result<CheckInOutcome> {
    let check_in_time = Utc::now();
    let request = CheckInRequest {
        room_id,
        check_in_time,
        expected_check_out: Some(check_in_time + TimeDelta::days(nights)),
        rate,
        occupant_count: 1,
        guests: vec![guest_descriptor("Test Guest")],
        initial_payment: initial_amount.map(|amount| InitialPayment {
            amount,
            method: "cash".to_string(),
            external_ref: None,
        }),
        booking_source: Some("walk_in".to_string()),
        booking_ref: None,
    };

    check_in(db, &test_scope(), request, TEST_TIMEOUT).await
}
