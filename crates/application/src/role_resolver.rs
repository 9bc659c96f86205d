use std::sync::Arc;

use hearthware_core::Principal;
use tracing::{debug, warn};

use crate::RoleRepository;

/// Decides whether a principal carries the admin role.
///
/// Lookups are never cached: every call goes to the remote profile store.
/// A configured bootstrap email is admitted even without an assignment so
/// the first admin can sign in before any profile rows exist. That identity
/// is a standing privilege grant and should be removed once a real admin
/// assignment exists.
#[derive(Clone)]
pub struct RoleResolver {
    repository: Arc<dyn RoleRepository>,
    bootstrap_admin_email: Option<String>,
}

impl RoleResolver {
    /// Creates a resolver without a bootstrap identity.
    #[must_use]
    pub fn new(repository: Arc<dyn RoleRepository>) -> Self {
        Self {
            repository,
            bootstrap_admin_email: None,
        }
    }

    /// Admits `email` as admin regardless of role assignments.
    #[must_use]
    pub fn with_bootstrap_admin(mut self, email: impl Into<String>) -> Self {
        let email = email.into().trim().to_lowercase();
        self.bootstrap_admin_email = (!email.is_empty()).then_some(email);
        self
    }

    /// Returns whether the principal is an admin. Lookup failures deny.
    pub async fn is_admin(&self, principal: &Principal) -> bool {
        match self.repository.find_role_assignment(principal.id()).await {
            Ok(Some(assignment))
                if assignment.is_admin() && assignment.principal_id() == principal.id() =>
            {
                return true;
            }
            Ok(Some(assignment)) => {
                debug!(
                    principal_id = %principal.id(),
                    role = %assignment.role(),
                    "principal has a non-admin role"
                );
            }
            Ok(None) => {
                debug!(principal_id = %principal.id(), "principal has no role assignment");
            }
            Err(error) => {
                warn!(
                    principal_id = %principal.id(),
                    error = %error,
                    "role lookup failed; denying admin access"
                );
            }
        }

        self.matches_bootstrap_admin(principal)
    }

    fn matches_bootstrap_admin(&self, principal: &Principal) -> bool {
        let Some(bootstrap) = self.bootstrap_admin_email.as_deref() else {
            return false;
        };

        let matched = principal
            .email()
            .is_some_and(|email| email.trim().to_lowercase() == bootstrap);
        if matched {
            warn!(
                principal_id = %principal.id(),
                "admin access granted through bootstrap identity"
            );
        }

        matched
    }
}
