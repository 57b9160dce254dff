//! Identity & Scope Resolver
//!
//! Derives the caller's effective visibility scope from their role. Access
//! control everywhere else in the engine branches on [`Scope`], never on the
//! raw role, so the mapping lives in exactly one place.

use serde::{Deserialize, Serialize};

use crate::error::{MessagingError, MessagingResult};
use crate::model::{Actor, Role, TenantId};

/// Effective visibility scope of a caller
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Scope {
    /// Sees and affects all tenants (root)
    Platform,
    /// Restricted to one organization (admin, manager)
    Organization(TenantId),
    /// Sees only conversations where the actor is a participant (client, user)
    SelfOnly,
}

impl Scope {
    /// Resolve the scope for an actor. Pure function of the actor record.
    pub fn resolve(actor: &Actor) -> MessagingResult<Scope> {
        match actor.role {
            Role::Root => Ok(Scope::Platform),
            Role::Admin | Role::Manager => {
                let tenant = actor.tenant_id.ok_or_else(|| {
                    MessagingError::Validation(format!(
                        "actor {} has an organization role but no tenant",
                        actor.id
                    ))
                })?;
                Ok(Scope::Organization(tenant))
            }
            Role::Client | Role::User => Ok(Scope::SelfOnly),
        }
    }

    /// Whether this scope reaches into the given tenant context.
    /// `SelfOnly` never covers a tenant; participant checks handle it.
    pub fn covers(&self, tenant: Option<TenantId>) -> bool {
        match self {
            Scope::Platform => true,
            Scope::Organization(own) => tenant == Some(*own),
            Scope::SelfOnly => false,
        }
    }
}
