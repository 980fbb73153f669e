//! Guest entity - One person who has stayed (or is staying) at a property.
//!
//! Guests are recognized across stays by their `(id_proof_type,
//! id_proof_number)` pair when both are present; guests without identity
//! proof are stored as fresh records each time. Records are never deleted
//! by the engine.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Guest database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guests")]
pub struct Model {
    /// Unique identifier for the guest
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name
    pub name: String,
    /// Contact phone number
    pub phone: Option<String>,
    /// Contact email address
    pub email: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// Nationality
    pub nationality: Option<String>,
    /// Identity document kind (e.g., "passport", "national_id")
    pub id_proof_type: Option<String>,
    /// Identity document number; the dedup key together with the type
    pub id_proof_number: Option<String>,
}

/// Defines relationships between Guest and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A guest is linked to many occupancies across stays
    #[sea_orm(has_many = "super::occupancy_guest::Entity")]
    OccupancyGuests,
}

impl Related<super::occupancy_guest::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OccupancyGuests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
