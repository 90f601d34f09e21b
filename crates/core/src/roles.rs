//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_PROPERTY_OWNER: &str = "property_owner";

/// Role assigned to accounts created through self-registration.
pub const DEFAULT_REGISTRATION_ROLE: &str = ROLE_PROPERTY_OWNER;

/// Returns `true` if `role` is one of the known role names.
pub fn is_known_role(role: &str) -> bool {
    matches!(role, ROLE_ADMIN | ROLE_PROPERTY_OWNER)
}
