//! Room lookups and housekeeping status transitions.
//!
//! The check-in orchestrator and the checkout gate own the
//! `Vacant|Reserved → Occupied` and `Occupied → Dirty` edges; everything
//! else on the room state machine (the cleaning cycle and maintenance
//! pulls) goes through [`update_room_status`], which enforces the
//! legal-transition table.

use crate::{
    core::Scope,
    entities::{Room, RoomStatus, room},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use tracing::info;

/// Finds a room by its unique ID.
pub async fn get_room_by_id<C: ConnectionTrait>(db: &C, room_id: i64) -> Result<Option<room::Model>> {
    Room::find_by_id(room_id).one(db).await.map_err(Into::into)
}

/// Fetches a room and enforces that it belongs to the caller's property.
///
/// # Errors
/// `NotFound` if the room does not exist, `Forbidden` if it belongs to a
/// different property.
pub async fn get_scoped_room<C: ConnectionTrait>(
    db: &C,
    scope: &Scope,
    room_id: i64,
) -> Result<room::Model> {
    let room = get_room_by_id(db, room_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "room",
            id: room_id,
        })?;

    if room.property_id != scope.property_id {
        return Err(Error::Forbidden {
            property_id: room.property_id,
        });
    }

    Ok(room)
}

/// Applies a housekeeping transition to a room.
///
/// Accepts the cleaning cycle (`Dirty → Cleaning → Vacant`), maintenance
/// pulls from any status, and `Maintenance → Vacant`. The occupancy edges
/// (`→ Occupied`, `→ Dirty`) are reserved for check-in and checkout and are
/// rejected here outright.
///
/// # Errors
/// `Validation` for a reserved target status, `RoomNotAvailable` (naming
/// the room's current status) for an edge the state machine does not allow.
pub async fn update_room_status(
    db: &DatabaseConnection,
    scope: &Scope,
    room_id: i64,
    new_status: RoomStatus,
) -> Result<room::Model> {
    if matches!(new_status, RoomStatus::Occupied | RoomStatus::Dirty) {
        return Err(Error::Validation {
            field: "status",
            message: format!("{new_status} can only be reached through check-in or checkout"),
        });
    }

    let room = get_scoped_room(db, scope, room_id).await?;

    if !room.status.can_transition(new_status) {
        return Err(Error::RoomNotAvailable {
            status: room.status,
        });
    }

    let previous = room.status;
    let mut active: room::ActiveModel = room.into();
    active.status = Set(new_status);
    let updated = active.update(db).await?;

    info!(room_id, %previous, status = %new_status, "room status updated");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_get_scoped_room_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = get_scoped_room(&db, &test_scope(), 999).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                entity: "room",
                id: 999
            }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_scoped_room_wrong_property() -> Result<()> {
        let db = setup_test_db().await?;
        let room = create_room_for_property(&db, "901", 2).await?;

        let result = get_scoped_room(&db, &test_scope(), room.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Forbidden { property_id: 2 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_housekeeping_cycle() -> Result<()> {
        let db = setup_test_db().await?;
        let scope = test_scope();
        let room = create_room_with_status(&db, "101", RoomStatus::Dirty).await?;

        let room = update_room_status(&db, &scope, room.id, RoomStatus::Cleaning).await?;
        assert_eq!(room.status, RoomStatus::Cleaning);

        let room = update_room_status(&db, &scope, room.id, RoomStatus::Vacant).await?;
        assert_eq!(room.status, RoomStatus::Vacant);

        Ok(())
    }

    #[tokio::test]
    async fn test_maintenance_pull_and_return() -> Result<()> {
        let db = setup_test_db().await?;
        let scope = test_scope();
        let room = create_test_room(&db, "102").await?;

        let room = update_room_status(&db, &scope, room.id, RoomStatus::Maintenance).await?;
        assert_eq!(room.status, RoomStatus::Maintenance);

        let room = update_room_status(&db, &scope, room.id, RoomStatus::Vacant).await?;
        assert_eq!(room.status, RoomStatus::Vacant);

        Ok(())
    }

    #[tokio::test]
    async fn test_illegal_housekeeping_edge_names_current_status() -> Result<()> {
        let db = setup_test_db().await?;
        let room = create_test_room(&db, "103").await?;

        // Vacant -> Cleaning is not a legal edge
        let result = update_room_status(&db, &test_scope(), room.id, RoomStatus::Cleaning).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::RoomNotAvailable {
                status: RoomStatus::Vacant
            }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_occupancy_edges_rejected_here() -> Result<()> {
        let db = setup_test_db().await?;
        let room = create_test_room(&db, "104").await?;

        for reserved in [RoomStatus::Occupied, RoomStatus::Dirty] {
            let result = update_room_status(&db, &test_scope(), room.id, reserved).await;
            assert!(matches!(
                result.unwrap_err(),
                Error::Validation { field: "status", .. }
            ));
        }

        Ok(())
    }
}
