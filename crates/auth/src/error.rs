use thiserror::Error;

use crate::{Action, Role, SubjectKind};

/// Failures while building abilities or validating capabilities.
///
/// A denied check is not an error; see [`crate::AuthzError`] for the guard form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The permission table has no policy for the user's role.
    #[error("unknown role '{0}': no permission policy is registered for it")]
    UnknownRole(Role),

    /// The pair does not exist in the capability schema.
    #[error("'{action}' is not a valid action on subject '{subject}'")]
    MalformedCapability { action: Action, subject: SubjectKind },

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("unknown subject '{0}'")]
    UnknownSubject(String),
}
