use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier carried by a user within one company.
///
/// Kept as an opaque string: a user persisted with a role that has no policy
/// must still be representable so that ability construction can reject it.
/// The roles with a policy in the standard table are the associated constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const ADMIN: Role = Role(Cow::Borrowed("ADMIN"));
    pub const TEACHER: Role = Role(Cow::Borrowed("TEACHER"));
    pub const STUDENT: Role = Role(Cow::Borrowed("STUDENT"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
