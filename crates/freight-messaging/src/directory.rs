//! Recipient Directory
//!
//! Filters the platform User Directory down to the set of users the caller
//! may address. The User Directory itself is an external collaborator behind
//! the [`UserDirectory`] trait; an in-memory implementation ships for tests
//! and single-node deployments.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{MessagingError, MessagingResult};
use crate::model::{Actor, ActorId, RecipientCandidate, TenantId};
use crate::scope::Scope;

/// Queries shorter than this return an empty result without touching the
/// User Directory.
pub const MIN_QUERY_LEN: usize = 2;

/// Result cap for recipient searches.
pub const MAX_CANDIDATES: usize = 10;

/// External User Directory collaborator.
///
/// Implementations are expected to bound their own latency; failures
/// surface as [`MessagingError::Transient`] and never leave partial state.
pub trait UserDirectory: Send + Sync {
    /// Look up a single actor by id.
    fn find(&self, id: ActorId) -> MessagingResult<Option<Actor>>;

    /// Case-insensitive substring search over email, first name and last
    /// name. `tenant = None` spans all tenants. Natural directory order.
    fn search(&self, tenant: Option<TenantId>, query: &str) -> MessagingResult<Vec<Actor>>;
}

/// In-memory User Directory
pub struct InMemoryDirectory {
    users: Arc<RwLock<HashMap<ActorId, Actor>>>,
    // Insertion order, so searches are stable.
    order: Arc<RwLock<Vec<ActorId>>>,
}

impl InMemoryDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            order: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Register an actor
    pub fn add(&self, actor: Actor) {
        let mut users = self.users.write();
        if users.insert(actor.id, actor.clone()).is_none() {
            self.order.write().push(actor.id);
        }
    }

    /// Number of registered actors
    pub fn count(&self) -> usize {
        self.users.read().len()
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(actor: &Actor, needle: &str) -> bool {
    actor.email.to_lowercase().contains(needle)
        || actor.first_name.to_lowercase().contains(needle)
        || actor.last_name.to_lowercase().contains(needle)
}

impl UserDirectory for InMemoryDirectory {
    fn find(&self, id: ActorId) -> MessagingResult<Option<Actor>> {
        Ok(self.users.read().get(&id).cloned())
    }

    fn search(&self, tenant: Option<TenantId>, query: &str) -> MessagingResult<Vec<Actor>> {
        let needle = query.to_lowercase();
        let users = self.users.read();
        let order = self.order.read();

        Ok(order
            .iter()
            .filter_map(|id| users.get(id))
            .filter(|a| tenant.is_none() || a.tenant_id == tenant)
            .filter(|a| matches(a, &needle))
            .cloned()
            .collect())
    }
}

/// Scoped recipient search over a [`UserDirectory`]
#[derive(Clone)]
pub struct RecipientDirectory {
    directory: Arc<dyn UserDirectory>,
}

impl RecipientDirectory {
    /// Wrap a User Directory
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    /// Search for addressable users under the caller's scope.
    ///
    /// Trivial queries (< [`MIN_QUERY_LEN`] characters) short-circuit to an
    /// empty result. `SelfOnly` callers cannot choose a recipient and fail
    /// with `Forbidden`. The caller's own id is always excluded and the
    /// result is capped at [`MAX_CANDIDATES`].
    pub fn search_recipients(
        &self,
        scope: &Scope,
        query: &str,
        exclude: ActorId,
    ) -> MessagingResult<Vec<RecipientCandidate>> {
        let tenant = match scope {
            Scope::Platform => None,
            Scope::Organization(t) => Some(*t),
            Scope::SelfOnly => {
                return Err(MessagingError::Forbidden(
                    "non-directed actors cannot search recipients".into(),
                ))
            }
        };

        if query.trim().chars().count() < MIN_QUERY_LEN {
            return Ok(Vec::new());
        }

        let hits = self.directory.search(tenant, query.trim())?;

        Ok(hits
            .iter()
            .filter(|a| a.id != exclude)
            .take(MAX_CANDIDATES)
            .map(RecipientCandidate::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use uuid::Uuid;

    fn seed(tenant: TenantId, n: usize) -> (InMemoryDirectory, Vec<Actor>) {
        let dir = InMemoryDirectory::new();
        let mut actors = Vec::new();
        for i in 0..n {
            let actor = Actor {
                id: Uuid::new_v4(),
                role: Role::Client,
                tenant_id: Some(tenant),
                first_name: format!("Ana{i}"),
                last_name: "Garcia".into(),
                email: format!("ana{i}@example.com"),
            };
            dir.add(actor.clone());
            actors.push(actor);
        }
        (dir, actors)
    }

    #[test]
    fn test_short_query_returns_empty() {
        let tenant = Uuid::new_v4();
        let (dir, _) = seed(tenant, 5);
        let recipients = RecipientDirectory::new(Arc::new(dir));

        let hits = recipients
            .search_recipients(&Scope::Organization(tenant), "a", Uuid::new_v4())
            .unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_self_scope_forbidden() {
        let tenant = Uuid::new_v4();
        let (dir, _) = seed(tenant, 1);
        let recipients = RecipientDirectory::new(Arc::new(dir));

        let result = recipients.search_recipients(&Scope::SelfOnly, "ana", Uuid::new_v4());
        assert!(matches!(result, Err(MessagingError::Forbidden(_))));
    }

    #[test]
    fn test_caller_excluded_even_on_self_match() {
        let tenant = Uuid::new_v4();
        let (dir, actors) = seed(tenant, 3);
        let recipients = RecipientDirectory::new(Arc::new(dir));
        let me = &actors[0];

        let hits = recipients
            .search_recipients(&Scope::Organization(tenant), &me.email, me.id)
            .unwrap();
        assert!(hits.iter().all(|c| c.id != me.id));
        assert!(hits.is_empty());
    }

    #[test]
    fn test_result_capped_at_ten() {
        let tenant = Uuid::new_v4();
        let (dir, _) = seed(tenant, 25);
        let recipients = RecipientDirectory::new(Arc::new(dir));

        let hits = recipients
            .search_recipients(&Scope::Organization(tenant), "garcia", Uuid::new_v4())
            .unwrap();
        assert_eq!(hits.len(), MAX_CANDIDATES);
    }

    #[test]
    fn test_org_scope_restricted_to_tenant() {
        let t1 = Uuid::new_v4();
        let t2 = Uuid::new_v4();
        let (dir, _) = seed(t1, 3);
        dir.add(Actor {
            id: Uuid::new_v4(),
            role: Role::Client,
            tenant_id: Some(t2),
            first_name: "Ana".into(),
            last_name: "Garcia".into(),
            email: "ana-other@example.com".into(),
        });
        let recipients = RecipientDirectory::new(Arc::new(dir));

        let hits = recipients
            .search_recipients(&Scope::Organization(t2), "garcia", Uuid::new_v4())
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].email, "ana-other@example.com");
    }

    #[test]
    fn test_platform_scope_spans_tenants() {
        let t1 = Uuid::new_v4();
        let t2 = Uuid::new_v4();
        let (dir, _) = seed(t1, 2);
        dir.add(Actor {
            id: Uuid::new_v4(),
            role: Role::Admin,
            tenant_id: Some(t2),
            first_name: "Bea".into(),
            last_name: "Garcia".into(),
            email: "bea@example.com".into(),
        });
        let recipients = RecipientDirectory::new(Arc::new(dir));

        let hits = recipients
            .search_recipients(&Scope::Platform, "garcia", Uuid::new_v4())
            .unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let tenant = Uuid::new_v4();
        let (dir, _) = seed(tenant, 1);
        let recipients = RecipientDirectory::new(Arc::new(dir));

        let hits = recipients
            .search_recipients(&Scope::Organization(tenant), "GARCIA", Uuid::new_v4())
            .unwrap();
        assert_eq!(hits.len(), 1);
    }
}
