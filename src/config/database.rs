//! Database connection and schema bootstrap.
//!
//! Tables are generated straight from the entity definitions with SeaORM's
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. One raw statement follows: the partial unique index that holds
//! the engine's central inventory invariant — at most one occupancy per room
//! with no checkout time.

use crate::entities::{Guest, Occupancy, OccupancyGuest, Payment, Room};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema, Statement};

/// One active occupancy per room, enforced at the storage layer. Two
/// concurrent check-ins against the same room cannot both commit.
const ACTIVE_OCCUPANCY_INDEX: &str = "CREATE UNIQUE INDEX IF NOT EXISTS \
     idx_occupancy_room_active ON occupancy (room_id) \
     WHERE actual_check_out IS NULL";

/// Establishes a connection to the database at the given URL.
///
/// # Errors
/// Returns a database error if the connection cannot be established.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions, plus the partial unique
/// index backing the one-active-occupancy-per-room invariant.
///
/// # Errors
/// Returns a database error if any schema statement fails.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let room_table = schema.create_table_from_entity(Room);
    let guest_table = schema.create_table_from_entity(Guest);
    let occupancy_table = schema.create_table_from_entity(Occupancy);
    let occupancy_guest_table = schema.create_table_from_entity(OccupancyGuest);
    let payment_table = schema.create_table_from_entity(Payment);

    db.execute(builder.build(&room_table)).await?;
    db.execute(builder.build(&guest_table)).await?;
    db.execute(builder.build(&occupancy_table)).await?;
    db.execute(builder.build(&occupancy_guest_table)).await?;
    db.execute(builder.build(&payment_table)).await?;

    db.execute(Statement::from_string(
        builder,
        ACTIVE_OCCUPANCY_INDEX.to_string(),
    ))
    .await?;

    Ok(())
}
