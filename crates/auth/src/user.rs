//! The user as authorization sees it.
//!
//! Accounts, credentials and company memberships are owned elsewhere; by the
//! time a check runs they have been resolved into an id and the role held in
//! the active company.

use serde::{Deserialize, Serialize};

use schoolhub_core::UserId;

use crate::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub role: Role,
}

impl User {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
}
