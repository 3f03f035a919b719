//! Capability schema: which `(action, subject)` pairs exist at all.
//!
//! Every subject declares its own verb enum and [`Capability`] combines them, so
//! an illegal pair such as `(pay, Course)` cannot be written in code. Strings
//! and JSON coming from outside go through [`Capability::new`] /
//! [`Capability::parse`], which apply the same table at runtime.
//!
//! Whether a *role* holds a capability is a different question, answered by
//! [`crate::policy`].

use serde::{Deserialize, Serialize};

use crate::{Action, AuthError, SubjectKind};

macro_rules! subject_actions {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            Manage,
            Get,
            Create,
            Update,
            Delete,
            $($variant,)*
        }

        impl $name {
            /// Every verb legal for the subject, universal verbs first.
            pub const ACTIONS: &'static [Action] = &[
                Action::Manage,
                Action::Get,
                Action::Create,
                Action::Update,
                Action::Delete,
                $(Action::$variant,)*
            ];

            pub const CRUD: [$name; 4] = [$name::Get, $name::Create, $name::Update, $name::Delete];

            pub fn action(self) -> Action {
                match self {
                    $name::Manage => Action::Manage,
                    $name::Get => Action::Get,
                    $name::Create => Action::Create,
                    $name::Update => Action::Update,
                    $name::Delete => Action::Delete,
                    $($name::$variant => Action::$variant,)*
                }
            }
        }

        impl TryFrom<Action> for $name {
            type Error = Action;

            fn try_from(action: Action) -> Result<Self, Self::Error> {
                match action {
                    Action::Manage => Ok($name::Manage),
                    Action::Get => Ok($name::Get),
                    Action::Create => Ok($name::Create),
                    Action::Update => Ok($name::Update),
                    Action::Delete => Ok($name::Delete),
                    $(Action::$variant => Ok($name::$variant),)*
                    other => Err(other),
                }
            }
        }
    };
}

subject_actions! {
    /// Verbs of subjects with no domain-specific actions.
    CrudAction {}
}

subject_actions! {
    TaskAction { Submit, Grade }
}

subject_actions! {
    PresenceAction { Mark }
}

subject_actions! {
    RegistrationAction { Lock, Unlock, Complete }
}

subject_actions! {
    MonthlyFeeAction { Pay }
}

subject_actions! {
    NotificationAction { Receive }
}

subject_actions! {
    MemberAction { Invite, TransferOwnership }
}

subject_actions! {
    /// Includes the subscription lifecycle of the company's plan.
    CompanyAction { Subscribe, CancelSubscription, ResumeSubscription }
}

/// The only verb legal on the `all` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllAction {
    Manage,
}

impl AllAction {
    pub const ACTIONS: &'static [Action] = &[Action::Manage];

    pub fn action(self) -> Action {
        Action::Manage
    }
}

impl TryFrom<Action> for AllAction {
    type Error = Action;

    fn try_from(action: Action) -> Result<Self, Self::Error> {
        match action {
            Action::Manage => Ok(AllAction::Manage),
            other => Err(other),
        }
    }
}

/// A structurally valid `(action, subject)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Grant", try_from = "Grant")]
pub enum Capability {
    Course(CrudAction),
    Class(CrudAction),
    Task(TaskAction),
    Material(CrudAction),
    Presence(PresenceAction),
    Registration(RegistrationAction),
    MonthlyFee(MonthlyFeeAction),
    Billing(CrudAction),
    Report(CrudAction),
    Notification(NotificationAction),
    Member(MemberAction),
    Company(CompanyAction),
    User(CrudAction),
    Role(CrudAction),
    Lesson(CrudAction),
    Discipline(CrudAction),
    Level(CrudAction),
    Classroom(CrudAction),
    All(AllAction),
}

impl Capability {
    /// Unrestricted access: `(manage, all)`.
    pub const MANAGE_ALL: Capability = Capability::All(AllAction::Manage);

    /// Validate a pair against the schema.
    pub fn new(action: Action, subject: SubjectKind) -> Result<Self, AuthError> {
        let capability = match subject {
            SubjectKind::Course => CrudAction::try_from(action).map(Capability::Course),
            SubjectKind::Class => CrudAction::try_from(action).map(Capability::Class),
            SubjectKind::Task => TaskAction::try_from(action).map(Capability::Task),
            SubjectKind::Material => CrudAction::try_from(action).map(Capability::Material),
            SubjectKind::Presence => PresenceAction::try_from(action).map(Capability::Presence),
            SubjectKind::Registration => {
                RegistrationAction::try_from(action).map(Capability::Registration)
            }
            SubjectKind::MonthlyFee => {
                MonthlyFeeAction::try_from(action).map(Capability::MonthlyFee)
            }
            SubjectKind::Billing => CrudAction::try_from(action).map(Capability::Billing),
            SubjectKind::Report => CrudAction::try_from(action).map(Capability::Report),
            SubjectKind::Notification => {
                NotificationAction::try_from(action).map(Capability::Notification)
            }
            SubjectKind::Member => MemberAction::try_from(action).map(Capability::Member),
            SubjectKind::Company => CompanyAction::try_from(action).map(Capability::Company),
            SubjectKind::User => CrudAction::try_from(action).map(Capability::User),
            SubjectKind::Role => CrudAction::try_from(action).map(Capability::Role),
            SubjectKind::Lesson => CrudAction::try_from(action).map(Capability::Lesson),
            SubjectKind::Discipline => CrudAction::try_from(action).map(Capability::Discipline),
            SubjectKind::Level => CrudAction::try_from(action).map(Capability::Level),
            SubjectKind::Classroom => CrudAction::try_from(action).map(Capability::Classroom),
            SubjectKind::All => AllAction::try_from(action).map(Capability::All),
        };

        capability.map_err(|_| AuthError::MalformedCapability { action, subject })
    }

    /// Validate a pair given by name, e.g. `("grade", "Task")`.
    pub fn parse(action: &str, subject: &str) -> Result<Self, AuthError> {
        Self::new(action.parse()?, subject.parse()?)
    }

    /// Every legal pair, in subject then verb order.
    pub fn all() -> Vec<Capability> {
        SubjectKind::ALL
            .into_iter()
            .flat_map(|subject| {
                subject
                    .actions()
                    .iter()
                    .filter_map(move |&action| Capability::new(action, subject).ok())
            })
            .collect()
    }

    pub fn subject(self) -> SubjectKind {
        match self {
            Capability::Course(_) => SubjectKind::Course,
            Capability::Class(_) => SubjectKind::Class,
            Capability::Task(_) => SubjectKind::Task,
            Capability::Material(_) => SubjectKind::Material,
            Capability::Presence(_) => SubjectKind::Presence,
            Capability::Registration(_) => SubjectKind::Registration,
            Capability::MonthlyFee(_) => SubjectKind::MonthlyFee,
            Capability::Billing(_) => SubjectKind::Billing,
            Capability::Report(_) => SubjectKind::Report,
            Capability::Notification(_) => SubjectKind::Notification,
            Capability::Member(_) => SubjectKind::Member,
            Capability::Company(_) => SubjectKind::Company,
            Capability::User(_) => SubjectKind::User,
            Capability::Role(_) => SubjectKind::Role,
            Capability::Lesson(_) => SubjectKind::Lesson,
            Capability::Discipline(_) => SubjectKind::Discipline,
            Capability::Level(_) => SubjectKind::Level,
            Capability::Classroom(_) => SubjectKind::Classroom,
            Capability::All(_) => SubjectKind::All,
        }
    }

    pub fn action(self) -> Action {
        match self {
            Capability::Course(a)
            | Capability::Class(a)
            | Capability::Material(a)
            | Capability::Billing(a)
            | Capability::Report(a)
            | Capability::User(a)
            | Capability::Role(a)
            | Capability::Lesson(a)
            | Capability::Discipline(a)
            | Capability::Level(a)
            | Capability::Classroom(a) => a.action(),
            Capability::Task(a) => a.action(),
            Capability::Presence(a) => a.action(),
            Capability::Registration(a) => a.action(),
            Capability::MonthlyFee(a) => a.action(),
            Capability::Notification(a) => a.action(),
            Capability::Member(a) => a.action(),
            Capability::Company(a) => a.action(),
            Capability::All(a) => a.action(),
        }
    }

    pub fn grant(self) -> Grant {
        Grant {
            action: self.action(),
            subject: self.subject(),
        }
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.grant(), f)
    }
}

impl SubjectKind {
    /// Verbs the schema allows on this subject.
    pub fn actions(self) -> &'static [Action] {
        match self {
            SubjectKind::Course
            | SubjectKind::Class
            | SubjectKind::Material
            | SubjectKind::Billing
            | SubjectKind::Report
            | SubjectKind::User
            | SubjectKind::Role
            | SubjectKind::Lesson
            | SubjectKind::Discipline
            | SubjectKind::Level
            | SubjectKind::Classroom => CrudAction::ACTIONS,
            SubjectKind::Task => TaskAction::ACTIONS,
            SubjectKind::Presence => PresenceAction::ACTIONS,
            SubjectKind::Registration => RegistrationAction::ACTIONS,
            SubjectKind::MonthlyFee => MonthlyFeeAction::ACTIONS,
            SubjectKind::Notification => NotificationAction::ACTIONS,
            SubjectKind::Member => MemberAction::ACTIONS,
            SubjectKind::Company => CompanyAction::ACTIONS,
            SubjectKind::All => AllAction::ACTIONS,
        }
    }
}

/// A granted rule in its wire form: `{"action": "grade", "subject": "Task"}`.
///
/// Unlike [`Capability`], a `Grant` is not validated by construction; use
/// [`Grant::validate`] on anything deserialized from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Grant {
    pub action: Action,
    pub subject: SubjectKind,
}

impl Grant {
    /// Whether this rule answers `(action, subject)`.
    ///
    /// `manage` stands for any action and `all` for any subject.
    pub fn covers(&self, action: Action, subject: SubjectKind) -> bool {
        (self.action == action || self.action == Action::Manage)
            && (self.subject == subject || self.subject == SubjectKind::All)
    }

    pub fn validate(self) -> Result<Capability, AuthError> {
        Capability::new(self.action, self.subject)
    }
}

impl From<Capability> for Grant {
    fn from(capability: Capability) -> Self {
        capability.grant()
    }
}

impl TryFrom<Grant> for Capability {
    type Error = AuthError;

    fn try_from(grant: Grant) -> Result<Self, Self::Error> {
        grant.validate()
    }
}

impl core::fmt::Display for Grant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.action, self.subject)
    }
}
