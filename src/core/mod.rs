//! Core business logic - the occupancy lifecycle and room allocation engine.
//!
//! Framework-agnostic operations over the entity layer: the room state
//! machine, guest identity resolution, the check-in orchestrator, the
//! per-stay payment ledger, stay revision, and the payment-gated checkout.
//! Every operation validates its input before touching the database and
//! runs its writes inside a single transaction.

pub mod billing;
pub mod check_in;
pub mod checkout;
pub mod guest;
pub mod payment;
pub mod room;
pub mod stay;

/// Authorization context supplied by the session layer.
///
/// The engine never authenticates anyone; it only enforces that every room
/// and occupancy it touches belongs to the caller's property, and stamps
/// `user_id` onto records the caller creates.
#[derive(Debug, Clone)]
pub struct Scope {
    /// Property the caller is allowed to operate on
    pub property_id: i64,
    /// Acting user id, recorded on payments
    pub user_id: String,
}
