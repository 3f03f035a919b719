use serde::{Deserialize, Serialize};

use crate::AuthError;

/// Every verb known to the capability schema.
///
/// Which verbs are legal for which subject is decided by
/// [`crate::schema::Capability`], not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Implies every other action on the subject.
    Manage,
    Get,
    Create,
    Update,
    Delete,
    Submit,
    Grade,
    Mark,
    Lock,
    Unlock,
    Complete,
    Pay,
    Invite,
    TransferOwnership,
    Receive,
    Subscribe,
    CancelSubscription,
    ResumeSubscription,
}

impl Action {
    pub const ALL: [Action; 18] = [
        Action::Manage,
        Action::Get,
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::Submit,
        Action::Grade,
        Action::Mark,
        Action::Lock,
        Action::Unlock,
        Action::Complete,
        Action::Pay,
        Action::Invite,
        Action::TransferOwnership,
        Action::Receive,
        Action::Subscribe,
        Action::CancelSubscription,
        Action::ResumeSubscription,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Manage => "manage",
            Action::Get => "get",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Submit => "submit",
            Action::Grade => "grade",
            Action::Mark => "mark",
            Action::Lock => "lock",
            Action::Unlock => "unlock",
            Action::Complete => "complete",
            Action::Pay => "pay",
            Action::Invite => "invite",
            Action::TransferOwnership => "transfer_ownership",
            Action::Receive => "receive",
            Action::Subscribe => "subscribe",
            Action::CancelSubscription => "cancel_subscription",
            Action::ResumeSubscription => "resume_subscription",
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Action {
    type Err = AuthError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == value)
            .ok_or_else(|| AuthError::UnknownAction(value.to_string()))
    }
}
