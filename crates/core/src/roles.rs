//! Well-known role name constants.
//!
//! These must match the `chk_users_role` constraint in
//! `20261001000001_create_users_table.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_USER: &str = "user";

/// Whether the role may work the editorial queue. Admins are editors too.
pub fn is_staff(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_EDITOR
}
