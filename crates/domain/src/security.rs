use serde::{Deserialize, Serialize};

/// Role label that grants access to the admin area.
pub const ADMIN_ROLE: &str = "admin";

/// Stored mapping from a principal to a role label.
///
/// The principal reference is weak: assignments are looked up by id and are
/// never cascaded when a principal disappears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    principal_id: String,
    role: String,
}

impl RoleAssignment {
    /// Creates a role assignment.
    #[must_use]
    pub fn new(principal_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            principal_id: principal_id.into(),
            role: role.into(),
        }
    }

    /// Returns the principal identifier this assignment names.
    #[must_use]
    pub fn principal_id(&self) -> &str {
        self.principal_id.as_str()
    }

    /// Returns the raw role label.
    #[must_use]
    pub fn role(&self) -> &str {
        self.role.as_str()
    }

    /// Returns whether the role label is the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}
