//! Request context carrying the acting user and their role.

use serde::{Deserialize, Serialize};

use deskbook_core::types::UserId;
use deskbook_entity::user::UserRole;

/// Who is acting on the current request.
///
/// Built by the API layer from gateway headers and passed into every
/// service method that makes an authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting user's ID.
    pub user_id: UserId,
    /// The acting user's role.
    pub role: UserRole,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Context for a client acting on their own behalf.
    pub fn client(user_id: UserId) -> Self {
        Self::new(user_id, UserRole::Client)
    }

    /// Context for an administrator.
    pub fn admin(user_id: UserId) -> Self {
        Self::new(user_id, UserRole::Admin)
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Whether the current user may act on something owned by `owner`.
    pub fn may_access(&self, owner: UserId) -> bool {
        self.is_admin() || self.user_id == owner
    }

    /// Owner constraint to hand to guarded store writes: none for admins.
    pub fn owner_guard(&self) -> Option<UserId> {
        (!self.is_admin()).then_some(self.user_id)
    }
}
