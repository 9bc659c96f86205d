use std::collections::HashMap;

use async_trait::async_trait;
use hearthware_application::RoleRepository;
use hearthware_core::AppResult;
use hearthware_domain::RoleAssignment;
use tokio::sync::RwLock;

/// Role assignments held in memory.
#[derive(Debug, Default)]
pub struct InMemoryRoleRepository {
    assignments: RwLock<HashMap<String, RoleAssignment>>,
}

impl InMemoryRoleRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the role of one principal, replacing any previous role.
    pub async fn assign(&self, principal_id: &str, role: &str) {
        self.assignments.write().await.insert(
            principal_id.to_owned(),
            RoleAssignment::new(principal_id, role),
        );
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn find_role_assignment(&self, principal_id: &str) -> AppResult<Option<RoleAssignment>> {
        Ok(self.assignments.read().await.get(principal_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use hearthware_application::RoleRepository;

    use super::InMemoryRoleRepository;

    #[tokio::test]
    async fn assign_replaces_role() {
        let repository = InMemoryRoleRepository::new();
        assert!(matches!(repository.find_role_assignment("p-1").await, Ok(None)));

        repository.assign("p-1", "editor").await;
        repository.assign("p-1", "admin").await;

        let assignment = repository
            .find_role_assignment("p-1")
            .await
            .ok()
            .flatten();
        assert!(assignment.is_some_and(|assignment| assignment.is_admin()));
    }
}
