//! Occupancy-guest link entity - Joins guests to the stays they are part of.
//!
//! One row per guest per occupancy; exactly one row per occupancy carries
//! `is_primary = true`, designating the stay's main contact.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Occupancy-guest link database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "occupancy_guests")]
pub struct Model {
    /// Unique identifier for the link row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The stay
    pub occupancy_id: i64,
    /// The guest
    pub guest_id: i64,
    /// Whether this guest is the stay's primary contact
    pub is_primary: bool,
}

/// Defines relationships between the link table and its endpoints
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each link row belongs to one occupancy
    #[sea_orm(
        belongs_to = "super::occupancy::Entity",
        from = "Column::OccupancyId",
        to = "super::occupancy::Column::Id"
    )]
    Occupancy,
    /// Each link row points at one guest
    #[sea_orm(
        belongs_to = "super::guest::Entity",
        from = "Column::GuestId",
        to = "super::guest::Column::Id"
    )]
    Guest,
}

impl Related<super::occupancy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Occupancy.def()
    }
}

impl Related<super::guest::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Guest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
