//! Occupancy entity - One guest-group's stay in one room.
//!
//! An occupancy is active while `actual_check_out` is null and immutable
//! once it is set. The running money columns obey
//! `total_amount = rate × nights` and
//! `balance_amount = total_amount − paid_amount` at all times; `paid_amount`
//! only ever grows and is driven exclusively by the payment ledger.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Occupancy database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "occupancy")]
pub struct Model {
    /// Unique identifier for the stay
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Room being occupied
    pub room_id: i64,
    /// When the guests checked in
    pub check_in_time: DateTimeUtc,
    /// Planned departure; None means an open-ended one-night default
    pub expected_check_out: Option<DateTimeUtc>,
    /// Actual departure; None while the stay is active, set exactly once
    pub actual_check_out: Option<DateTimeUtc>,
    /// Contracted nightly rate for this stay
    pub rate: f64,
    /// Number of occupants
    pub occupant_count: i32,
    /// Billed total for the stay (`rate × nights`)
    pub total_amount: f64,
    /// Sum of all recorded payments; monotonically non-decreasing
    pub paid_amount: f64,
    /// Amount still owed (`total_amount − paid_amount`)
    pub balance_amount: f64,
    /// When the most recent payment was recorded
    pub last_paid_date: Option<DateTimeUtc>,
    /// Where the booking came from (e.g., "walk_in", "phone", "ota")
    pub booking_source: Option<String>,
    /// Opaque reference to a group/corporate booking record
    pub booking_ref: Option<String>,
}

/// Defines relationships between Occupancy and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each occupancy belongs to one room
    #[sea_orm(
        belongs_to = "super::room::Entity",
        from = "Column::RoomId",
        to = "super::room::Column::Id"
    )]
    Room,
    /// One occupancy links to one or more guests
    #[sea_orm(has_many = "super::occupancy_guest::Entity")]
    OccupancyGuests,
    /// One occupancy accumulates payments
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl Related<super::occupancy_guest::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OccupancyGuests.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether the stay is still open for ledger and revision operations.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.actual_check_out.is_none()
    }
}
