//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod guest;
pub mod occupancy;
pub mod occupancy_guest;
pub mod payment;
pub mod room;

// Re-export specific types to avoid conflicts
pub use guest::{Column as GuestColumn, Entity as Guest, Model as GuestModel};
pub use occupancy::{Column as OccupancyColumn, Entity as Occupancy, Model as OccupancyModel};
pub use occupancy_guest::{
    Column as OccupancyGuestColumn, Entity as OccupancyGuest, Model as OccupancyGuestModel,
};
pub use payment::{Column as PaymentColumn, Entity as Payment, Model as PaymentModel};
pub use room::{Column as RoomColumn, Entity as Room, Model as RoomModel, RoomStatus};
