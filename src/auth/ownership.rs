//! Ownership enforcement for mutations on owned resources.
//!
//! [`validate_is_owner`] is the single mandatory chokepoint for every
//! update/delete over an owned resource: any code path that performs such a
//! mutation without calling it first is a security defect. The check is a
//! pure comparison; both IDs are passed explicitly by the caller, never
//! pulled from ambient request context.

use crate::errors::{Error, Result};
use crate::types::UserId;

/// Check that the acting identity owns the resource. Returns `Forbidden` on
/// mismatch; `resource` labels the target in the error ("comment", "user").
pub fn validate_is_owner(actor_id: UserId, resource_owner_id: UserId, resource: &str) -> Result<()> {
    if actor_id == resource_owner_id {
        Ok(())
    } else {
        Err(Error::Forbidden {
            resource: resource.to_string(),
        })
    }
}
