//! List-level access control.
//!
//! Every CRUD operation on a list is gated by a [`Policy`]. A policy is a
//! pure predicate over the caller's [`AccessContext`]; it never touches
//! storage, so a denial can be decided before any record is read.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Payload carried by an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub id: Uuid,
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Session {
    pub data: SessionData,
}

/// Everything a policy may look at for one request.
#[derive(Debug, Clone, Default)]
pub struct AccessContext {
    pub session: Option<Session>,
}

impl AccessContext {
    pub fn anonymous() -> Self {
        Self { session: None }
    }

    pub fn with_session(id: Uuid, is_admin: bool) -> Self {
        Self {
            session: Some(Session {
                data: SessionData { id, is_admin },
            }),
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.session.as_ref().map(|s| s.data.id)
    }
}

/// True iff a session is present and flags the caller as an admin.
pub fn is_admin(ctx: &AccessContext) -> bool {
    ctx.session.as_ref().is_some_and(|s| s.data.is_admin)
}

pub fn allow_all(_ctx: &AccessContext) -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Query,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Query,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Query => "query",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ListKey {
    User,
    Product,
    LineItem,
    Purchase,
}

impl ListKey {
    pub const ALL: [ListKey; 4] = [
        ListKey::User,
        ListKey::Product,
        ListKey::LineItem,
        ListKey::Purchase,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListKey::User => "User",
            ListKey::Product => "Product",
            ListKey::LineItem => "LineItem",
            ListKey::Purchase => "Purchase",
        }
    }
}

impl fmt::Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Policy {
    AllowAll,
    IsAdmin,
}

impl Policy {
    pub fn evaluate(&self, ctx: &AccessContext) -> bool {
        match self {
            Policy::AllowAll => allow_all(ctx),
            Policy::IsAdmin => is_admin(ctx),
        }
    }
}

/// Per-operation policies for one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct OperationAccess {
    pub query: Policy,
    pub create: Policy,
    pub update: Policy,
    pub delete: Policy,
}

impl OperationAccess {
    pub const fn uniform(policy: Policy) -> Self {
        Self {
            query: policy,
            create: policy,
            update: policy,
            delete: policy,
        }
    }

    pub fn policy(&self, operation: Operation) -> Policy {
        match operation {
            Operation::Query => self.query,
            Operation::Create => self.create,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }

    pub fn allows(&self, ctx: &AccessContext, operation: Operation) -> bool {
        self.policy(operation).evaluate(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_admin_requires_a_session() {
        assert!(!is_admin(&AccessContext::anonymous()));
    }

    #[test]
    fn is_admin_reads_the_session_flag() {
        let id = Uuid::new_v4();
        assert!(!is_admin(&AccessContext::with_session(id, false)));
        assert!(is_admin(&AccessContext::with_session(id, true)));
    }

    #[test]
    fn allow_all_ignores_the_context() {
        assert!(allow_all(&AccessContext::anonymous()));
        assert!(allow_all(&AccessContext::with_session(Uuid::new_v4(), false)));
    }

    #[test]
    fn operation_access_dispatches_per_operation() {
        let access = OperationAccess {
            query: Policy::AllowAll,
            ..OperationAccess::uniform(Policy::IsAdmin)
        };
        let anon = AccessContext::anonymous();

        assert!(access.allows(&anon, Operation::Query));
        assert!(!access.allows(&anon, Operation::Create));
        assert!(!access.allows(&anon, Operation::Update));
        assert!(!access.allows(&anon, Operation::Delete));
    }

    #[test]
    fn session_serializes_in_camel_case() {
        let id = Uuid::nil();
        let ctx = AccessContext::with_session(id, true);
        let json = serde_json::to_value(ctx.session.unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "data": { "id": id, "isAdmin": true } })
        );
    }
}
