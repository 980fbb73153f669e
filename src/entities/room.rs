//! Room entity - Represents one rentable room within a property.
//!
//! Each room carries its property scope, a display number, capacity,
//! default nightly price, and a housekeeping/occupancy status. Status is
//! stored as a string-backed active enum so the legal-transition table can
//! live on the Rust type.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Room database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    /// Unique identifier for the room
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Property this room belongs to; all access is scoped to it
    pub property_id: i64,
    /// Display number (e.g., "204", "A-12")
    pub number: String,
    /// Advisory guest capacity from the catalog
    pub capacity: i32,
    /// Default nightly price from the catalog
    pub price_per_night: f64,
    /// Current housekeeping/occupancy status
    pub status: RoomStatus,
}

/// The room status state machine.
///
/// Check-in moves `Vacant`/`Reserved` rooms to `Occupied`; checkout moves
/// `Occupied` to `Dirty`. The remaining edges belong to housekeeping.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum RoomStatus {
    /// Clean and ready for a new stay
    #[sea_orm(string_value = "VACANT")]
    Vacant,
    /// Held for an upcoming arrival; still eligible for check-in
    #[sea_orm(string_value = "RESERVED")]
    Reserved,
    /// An active occupancy is attached
    #[sea_orm(string_value = "OCCUPIED")]
    Occupied,
    /// Checked out, awaiting housekeeping
    #[sea_orm(string_value = "DIRTY")]
    Dirty,
    /// Housekeeping in progress
    #[sea_orm(string_value = "CLEANING")]
    Cleaning,
    /// Pulled from inventory
    #[sea_orm(string_value = "MAINTENANCE")]
    Maintenance,
}

impl RoomStatus {
    /// Whether a check-in may claim a room in this status.
    #[must_use]
    pub const fn is_available_for_check_in(self) -> bool {
        matches!(self, Self::Vacant | Self::Reserved)
    }

    /// The full legal-transition table, covering check-in, checkout, and
    /// housekeeping edges alike.
    #[must_use]
    pub const fn can_transition(self, to: Self) -> bool {
        match (self, to) {
            // Check-in and checkout, owned by the orchestrator and the gate
            (Self::Vacant | Self::Reserved, Self::Occupied) => true,
            (Self::Occupied, Self::Dirty) => true,
            // Housekeeping cycle
            (Self::Dirty, Self::Cleaning) => true,
            (Self::Cleaning, Self::Vacant) => true,
            (Self::Maintenance, Self::Vacant) => true,
            // Any room can be pulled for maintenance
            (_, Self::Maintenance) => true,
            _ => false,
        }
    }

    /// The canonical wire/storage name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vacant => "VACANT",
            Self::Reserved => "RESERVED",
            Self::Occupied => "OCCUPIED",
            Self::Dirty => "DIRTY",
            Self::Cleaning => "CLEANING",
            Self::Maintenance => "MAINTENANCE",
        }
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Defines relationships between Room and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One room accumulates many occupancies over time
    #[sea_orm(has_many = "super::occupancy::Entity")]
    Occupancies,
}

impl Related<super::occupancy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Occupancies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_in_availability() {
        assert!(RoomStatus::Vacant.is_available_for_check_in());
        assert!(RoomStatus::Reserved.is_available_for_check_in());
        assert!(!RoomStatus::Occupied.is_available_for_check_in());
        assert!(!RoomStatus::Dirty.is_available_for_check_in());
        assert!(!RoomStatus::Cleaning.is_available_for_check_in());
        assert!(!RoomStatus::Maintenance.is_available_for_check_in());
    }

    #[test]
    fn test_transition_table() {
        use RoomStatus::{Cleaning, Dirty, Maintenance, Occupied, Reserved, Vacant};

        assert!(Vacant.can_transition(Occupied));
        assert!(Reserved.can_transition(Occupied));
        assert!(Occupied.can_transition(Dirty));
        assert!(Dirty.can_transition(Cleaning));
        assert!(Cleaning.can_transition(Vacant));
        assert!(Maintenance.can_transition(Vacant));

        // Every status can be pulled for maintenance
        for status in [Vacant, Reserved, Occupied, Dirty, Cleaning] {
            assert!(status.can_transition(Maintenance));
        }

        // Illegal edges
        assert!(!Occupied.can_transition(Vacant));
        assert!(!Dirty.can_transition(Vacant));
        assert!(!Dirty.can_transition(Occupied));
        assert!(!Vacant.can_transition(Dirty));
        assert!(!Cleaning.can_transition(Occupied));
    }

    #[test]
    fn test_status_display_matches_storage() {
        assert_eq!(RoomStatus::Vacant.to_string(), "VACANT");
        assert_eq!(RoomStatus::Maintenance.to_string(), "MAINTENANCE");
    }
}
