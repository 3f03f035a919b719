//! Role → policy table.
//!
//! A policy is a plain function issuing grants into an [`AbilityBuilder`]. The
//! table is assembled once at startup and never mutated afterwards; callers
//! hold it (usually behind an `Arc`) and build abilities per request.

use std::collections::BTreeMap;

use schoolhub_core::UserId;

use crate::schema::{
    CompanyAction, CrudAction, MemberAction, MonthlyFeeAction, NotificationAction, PresenceAction,
    TaskAction,
};
use crate::{Ability, AbilityBuilder, Action, AuthError, Capability, Role, SubjectKind, User};

/// Issues the grants of one role.
pub type Policy = fn(&User, &mut AbilityBuilder);

#[derive(Clone, Default)]
pub struct PermissionTable {
    policies: BTreeMap<Role, Policy>,
}

impl PermissionTable {
    /// A table with no roles; every ability construction fails until policies
    /// are added.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard school policies: `ADMIN`, `TEACHER`, `STUDENT`.
    pub fn school() -> Self {
        Self::empty()
            .with_policy(Role::ADMIN, admin)
            .with_policy(Role::TEACHER, teacher)
            .with_policy(Role::STUDENT, student)
    }

    pub fn with_policy(mut self, role: Role, policy: Policy) -> Self {
        self.policies.insert(role, policy);
        self
    }

    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.policies.keys()
    }

    pub fn contains(&self, role: &Role) -> bool {
        self.policies.contains_key(role)
    }

    /// Build the ability of `user` from the policy of its role.
    ///
    /// A role with no policy is an error, never an empty (or full) ability.
    pub fn define_ability_for(&self, user: &User) -> Result<Ability, AuthError> {
        let Some(policy) = self.policies.get(&user.role) else {
            tracing::error!(user_id = %user.id, role = %user.role, "no permission policy for role");
            return Err(AuthError::UnknownRole(user.role.clone()));
        };

        let mut builder = AbilityBuilder::new(user.role.clone());
        policy(user, &mut builder);
        let ability = builder.build();

        tracing::debug!(
            user_id = %user.id,
            role = %user.role,
            rules = ability.rules().len(),
            "ability defined"
        );
        Ok(ability)
    }

    /// Ability a role grants regardless of which user holds it.
    pub fn define_ability_for_role(&self, role: &Role) -> Result<Ability, AuthError> {
        self.define_ability_for(&User::new(UserId::new(), role.clone()))
    }

    /// Registered roles whose ability covers `(action, subject)`.
    pub fn roles_granting(&self, action: Action, subject: SubjectKind) -> Vec<Role> {
        self.roles()
            .filter(|role| {
                self.define_ability_for_role(role)
                    .is_ok_and(|ability| ability.can(action, subject))
            })
            .cloned()
            .collect()
    }
}

impl core::fmt::Debug for PermissionTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PermissionTable")
            .field("roles", &self.policies.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn admin(_user: &User, builder: &mut AbilityBuilder) {
    builder.can(Capability::MANAGE_ALL);
}

fn teacher(_user: &User, builder: &mut AbilityBuilder) {
    builder
        .can(Capability::User(CrudAction::Get))
        .can(Capability::User(CrudAction::Update))
        .can(Capability::Company(CompanyAction::Get))
        .can(Capability::Member(MemberAction::Get))
        .can(Capability::Course(CrudAction::Get))
        .can(Capability::Level(CrudAction::Get))
        .can(Capability::Discipline(CrudAction::Get))
        .can(Capability::Classroom(CrudAction::Get))
        .can(Capability::Class(CrudAction::Get))
        .can_all(CrudAction::CRUD.map(Capability::Lesson))
        .can_all(TaskAction::CRUD.map(Capability::Task))
        .can(Capability::Task(TaskAction::Grade))
        .can_all(CrudAction::CRUD.map(Capability::Material))
        .can_all(PresenceAction::CRUD.map(Capability::Presence))
        .can(Capability::Presence(PresenceAction::Mark));
}

fn student(_user: &User, builder: &mut AbilityBuilder) {
    builder
        .can(Capability::User(CrudAction::Get))
        .can(Capability::User(CrudAction::Update))
        .can(Capability::Course(CrudAction::Get))
        .can(Capability::Level(CrudAction::Get))
        .can(Capability::Discipline(CrudAction::Get))
        .can(Capability::Class(CrudAction::Get))
        // Fees are read-only; no Registration or Billing grants.
        .can(Capability::MonthlyFee(MonthlyFeeAction::Get))
        .can(Capability::Task(TaskAction::Get))
        .can(Capability::Task(TaskAction::Submit))
        .can(Capability::Material(CrudAction::Get))
        .can(Capability::Presence(PresenceAction::Get))
        .can(Capability::Notification(NotificationAction::Get))
        .can(Capability::Notification(NotificationAction::Receive));
}
