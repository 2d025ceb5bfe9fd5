//! Common type definitions.
//!
//! Entity IDs are UUIDs wrapped in type aliases; session IDs are opaque
//! strings minted by the session store and never parsed by callers.

use uuid::Uuid;

/// User account identifier
pub type UserId = Uuid;

/// Opaque session identifier (random, unguessable)
pub type SessionId = String;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbrev_uuid() {
        let id: Uuid = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        assert_eq!(abbrev_uuid(&id), "550e8400");
    }
}
