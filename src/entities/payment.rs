//! Payment entity - One payment recorded against a stay.
//!
//! Payments are append-only: rows are never updated or deleted, and
//! `sum(amount)` over an occupancy's payments always equals that
//! occupancy's `paid_amount`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The stay this payment settles against
    pub occupancy_id: i64,
    /// Amount paid; always positive
    pub amount: f64,
    /// Payment method (e.g., "cash", "card", "upi")
    pub method: String,
    /// When the payment was recorded
    pub paid_at: DateTimeUtc,
    /// External transaction reference from the payment provider
    pub external_ref: Option<String>,
    /// User id of the staff member who recorded the payment
    pub recorded_by: String,
}

/// Defines relationships between Payment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment belongs to one occupancy
    #[sea_orm(
        belongs_to = "super::occupancy::Entity",
        from = "Column::OccupancyId",
        to = "super::occupancy::Column::Id"
    )]
    Occupancy,
}

impl Related<super::occupancy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Occupancy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
