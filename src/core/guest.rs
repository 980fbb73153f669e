//! Guest identity resolution.
//!
//! A check-in presents one descriptor per guest. Descriptors carrying a
//! complete `(id_proof_type, id_proof_number)` pair are matched against
//! existing guests by that exact pair; a match refreshes only the fields the
//! descriptor actually supplies and reuses the same identity. Descriptors
//! without identity proof always create a fresh record. Guests are never
//! deleted by the engine.

use crate::{
    entities::{Guest, guest},
    errors::{Error, Result},
};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait,
    QueryFilter, Set};
use tracing::debug;

/// One guest as presented at check-in.
///
/// `name` is required; every other field overwrites the stored record only
/// when supplied. `is_primary` is a hint — when no descriptor carries it,
/// the first descriptor becomes the stay's primary contact.
#[derive(Debug, Clone, Default)]
pub struct GuestDescriptor {
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
    /// Identity document kind
    pub id_proof_type: Option<String>,
    /// Identity document number
    pub id_proof_number: Option<String>,
    /// Whether this guest should be the stay's primary contact
    pub is_primary: bool,
}

impl GuestDescriptor {
    /// The dedup key, present only when both halves are non-empty.
    #[must_use]
    pub fn identity_key(&self) -> Option<(&str, &str)> {
        match (self.id_proof_type.as_deref(), self.id_proof_number.as_deref()) {
            (Some(kind), Some(number)) if !kind.trim().is_empty() && !number.trim().is_empty() => {
                Some((kind, number))
            }
            _ => None,
        }
    }
}

/// A guest record after resolution, with its primary-contact flag settled.
#[derive(Debug, Clone)]
pub struct ResolvedGuest {
    /// The persisted guest record (created or refreshed)
    pub guest: guest::Model,
    /// Whether this guest is the stay's primary contact
    pub is_primary: bool,
}

/// Validates a guest list before any write: it must be non-empty, every
/// name must be non-blank, and at most one descriptor may claim primary.
///
/// # Errors
/// `Validation` naming the offending field.
pub fn validate_descriptors(descriptors: &[GuestDescriptor]) -> Result<()> {
    if descriptors.is_empty() {
        return Err(Error::Validation {
            field: "guests",
            message: "at least one guest is required".to_string(),
        });
    }

    if descriptors.iter().any(|d| d.name.trim().is_empty()) {
        return Err(Error::Validation {
            field: "guests",
            message: "guest name cannot be empty".to_string(),
        });
    }

    let primary_count = descriptors.iter().filter(|d| d.is_primary).count();
    if primary_count > 1 {
        return Err(Error::Validation {
            field: "guests",
            message: format!("{primary_count} guests flagged primary, expected at most one"),
        });
    }

    // One link row per guest per stay: the same identity proof listed
    // twice would resolve to one record linked twice
    let mut seen_keys: Vec<(&str, &str)> = Vec::new();
    for descriptor in descriptors {
        if let Some(key) = descriptor.identity_key() {
            if seen_keys.contains(&key) {
                return Err(Error::Validation {
                    field: "guests",
                    message: format!("identity proof {}/{} listed more than once", key.0, key.1),
                });
            }
            seen_keys.push(key);
        }
    }

    Ok(())
}

/// Finds an existing guest by the exact identity-proof pair.
pub async fn find_guest_by_identity<C: ConnectionTrait>(
    db: &C,
    id_proof_type: &str,
    id_proof_number: &str,
) -> Result<Option<guest::Model>> {
    Guest::find()
        .filter(guest::Column::IdProofType.eq(id_proof_type))
        .filter(guest::Column::IdProofNumber.eq(id_proof_number))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Resolves every descriptor to a persisted guest record and settles the
/// primary-contact flag: an explicit flag wins, otherwise the first
/// descriptor is primary. Exactly one resolved guest ends up primary.
///
/// Runs against whatever connection it is handed, so the orchestrator can
/// keep the whole check-in inside one transaction.
///
/// # Errors
/// `Validation` for a bad guest list, or a database error.
pub async fn resolve_guests<C: ConnectionTrait>(
    db: &C,
    descriptors: &[GuestDescriptor],
) -> Result<Vec<ResolvedGuest>> {
    validate_descriptors(descriptors)?;

    let explicit_primary = descriptors.iter().position(|d| d.is_primary);
    let primary_index = explicit_primary.unwrap_or(0);

    let mut resolved = Vec::with_capacity(descriptors.len());
    for (index, descriptor) in descriptors.iter().enumerate() {
        let existing = match descriptor.identity_key() {
            Some((kind, number)) => find_guest_by_identity(db, kind, number).await?,
            None => None,
        };

        let model = match existing {
            Some(found) => {
                debug!(guest_id = found.id, "guest matched by identity proof");
                merge_update(db, found, descriptor).await?
            }
            None => create_guest(db, descriptor).await?,
        };

        resolved.push(ResolvedGuest {
            guest: model,
            is_primary: index == primary_index,
        });
    }

    Ok(resolved)
}

async fn create_guest<C: ConnectionTrait>(
    db: &C,
    descriptor: &GuestDescriptor,
) -> Result<guest::Model> {
    let model = guest::ActiveModel {
        name: Set(descriptor.name.trim().to_string()),
        phone: Set(descriptor.phone.clone()),
        email: Set(descriptor.email.clone()),
        address: Set(descriptor.address.clone()),
        nationality: Set(descriptor.nationality.clone()),
        id_proof_type: Set(descriptor.id_proof_type.clone()),
        id_proof_number: Set(descriptor.id_proof_number.clone()),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Refreshes a matched guest from a descriptor. Only fields the descriptor
/// supplies overwrite; absent fields keep their stored values.
async fn merge_update<C: ConnectionTrait>(
    db: &C,
    existing: guest::Model,
    descriptor: &GuestDescriptor,
) -> Result<guest::Model> {
    let mut active: guest::ActiveModel = existing.into();

    active.name = Set(descriptor.name.trim().to_string());
    active.phone = descriptor.phone.clone().map_or(NotSet, |v| Set(Some(v)));
    active.email = descriptor.email.clone().map_or(NotSet, |v| Set(Some(v)));
    active.address = descriptor.address.clone().map_or(NotSet, |v| Set(Some(v)));
    active.nationality = descriptor
        .nationality
        .clone()
        .map_or(NotSet, |v| Set(Some(v)));

    active.update(db).await.map_err(Into::into)
}
