//! Abilities: the finalized permission set of one user.
//!
//! Built by [`crate::PermissionTable::define_ability_for`]; policies only ever
//! see the [`AbilityBuilder`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Action, AuthError, AuthzError, Capability, Grant, Role, Subject, SubjectKind};

/// Accumulates grants while a role policy runs.
#[derive(Debug, Clone)]
pub struct AbilityBuilder {
    role: Role,
    rules: Vec<Grant>,
}

impl AbilityBuilder {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            rules: Vec::new(),
        }
    }

    /// Grant one capability. Granting the same capability twice is a no-op.
    pub fn can(&mut self, capability: Capability) -> &mut Self {
        let grant = capability.grant();
        if !self.rules.contains(&grant) {
            self.rules.push(grant);
        }
        self
    }

    pub fn can_all(&mut self, capabilities: impl IntoIterator<Item = Capability>) -> &mut Self {
        for capability in capabilities {
            self.can(capability);
        }
        self
    }

    pub fn build(self) -> Ability {
        Ability {
            role: self.role,
            rules: self.rules.into(),
        }
    }
}

/// Immutable, queryable set of grants.
///
/// Cloning shares the rule list; an ability can be handed to as many request
/// handlers or threads as needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ability {
    role: Role,
    rules: Arc<[Grant]>,
}

impl Ability {
    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Granted rules, in the order the policy issued them.
    pub fn rules(&self) -> &[Grant] {
        &self.rules
    }

    /// True iff some rule covers `(action, subject)`, counting `manage` as any
    /// action and `all` as any subject.
    ///
    /// Instances are resolved through their discriminator, so checking a
    /// tagged `Company` answers exactly like checking `SubjectKind::Company`.
    pub fn can(&self, action: Action, subject: impl Subject) -> bool {
        self.rule_for(action, subject.subject_kind()).is_some()
    }

    pub fn cannot(&self, action: Action, subject: impl Subject) -> bool {
        !self.can(action, subject)
    }

    /// Typed form of [`Ability::can`].
    pub fn allows(&self, capability: Capability) -> bool {
        self.can(capability.action(), capability.subject())
    }

    /// First rule answering `(action, subject)`.
    pub fn rule_for(&self, action: Action, subject: SubjectKind) -> Option<&Grant> {
        self.rules.iter().find(|rule| rule.covers(action, subject))
    }

    /// Guard form of [`Ability::can`] for handlers that propagate with `?`.
    pub fn authorize(&self, action: Action, subject: impl Subject) -> Result<(), AuthzError> {
        let subject = subject.subject_kind();
        if self.can(action, subject) {
            Ok(())
        } else {
            Err(AuthzError::Forbidden { action, subject })
        }
    }

    /// A detached `can` that owns its own handle on the rules.
    pub fn checker(&self) -> impl Fn(Action, SubjectKind) -> bool + Clone + Send + Sync + use<> {
        let ability = self.clone();
        move |action, subject| ability.can(action, subject)
    }

    pub fn pack(&self) -> PackedAbility {
        PackedAbility {
            role: self.role.clone(),
            rules: self.rules.to_vec(),
        }
    }

    /// Rebuild an ability from its wire form.
    ///
    /// Every rule is checked against the capability schema; a packed ability
    /// containing `(pay, Course)` is rejected rather than silently dropped.
    pub fn unpack(packed: PackedAbility) -> Result<Self, AuthError> {
        let mut builder = AbilityBuilder::new(packed.role);
        for grant in packed.rules {
            builder.can(grant.validate()?);
        }
        Ok(builder.build())
    }
}

/// Serializable rule list, shipped to front-ends so they can gate UI locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedAbility {
    pub role: Role,
    pub rules: Vec<Grant>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CrudAction, MonthlyFeeAction, TaskAction};

    fn grader() -> Ability {
        let mut builder = AbilityBuilder::new(Role::TEACHER);
        builder
            .can(Capability::Task(TaskAction::Grade))
            .can_all(CrudAction::CRUD.map(Capability::Lesson))
            .can(Capability::Material(CrudAction::Manage));
        builder.build()
    }

    #[test]
    fn exact_rule_matches_only_its_pair() {
        let ability = grader();
        assert!(ability.can(Action::Grade, SubjectKind::Task));
        assert!(ability.cannot(Action::Submit, SubjectKind::Task));
        assert!(ability.cannot(Action::Grade, SubjectKind::Lesson));
    }

    #[test]
    fn manage_on_subject_implies_every_action_on_it() {
        let ability = grader();
        for &action in SubjectKind::Material.actions() {
            assert!(ability.can(action, SubjectKind::Material), "{action}");
        }
        assert!(ability.cannot(Action::Get, SubjectKind::Course));
    }

    #[test]
    fn crud_does_not_imply_manage() {
        let ability = grader();
        assert!(ability.can(Action::Delete, SubjectKind::Lesson));
        assert!(ability.cannot(Action::Manage, SubjectKind::Lesson));
    }

    #[test]
    fn manage_all_covers_everything() {
        let mut builder = AbilityBuilder::new(Role::ADMIN);
        builder.can(Capability::MANAGE_ALL);
        let ability = builder.build();

        assert!(ability.can(Action::Manage, SubjectKind::All));
        assert!(ability.allows(Capability::MonthlyFee(MonthlyFeeAction::Pay)));
    }

    #[test]
    fn duplicate_grants_collapse() {
        let mut builder = AbilityBuilder::new(Role::STUDENT);
        builder
            .can(Capability::Course(CrudAction::Get))
            .can(Capability::Course(CrudAction::Get));
        assert_eq!(builder.build().rules().len(), 1);
    }

    #[test]
    fn authorize_reports_the_denied_pair() {
        let ability = grader();
        assert_eq!(ability.authorize(Action::Delete, SubjectKind::Lesson), Ok(()));
        assert_eq!(
            ability.authorize(Action::Get, SubjectKind::Billing),
            Err(AuthzError::Forbidden {
                action: Action::Get,
                subject: SubjectKind::Billing,
            })
        );
    }

    #[test]
    fn checker_outlives_the_ability_it_came_from() {
        let check = {
            let ability = grader();
            ability.checker()
        };
        let handle = std::thread::spawn(move || check(Action::Grade, SubjectKind::Task));
        assert!(handle.join().unwrap());
    }

    #[test]
    fn pack_then_unpack_keeps_rules() {
        let ability = grader();
        let json = serde_json::to_string(&ability.pack()).unwrap();
        let restored = Ability::unpack(serde_json::from_str(&json).unwrap()).unwrap();
        assert_eq!(restored, ability);
    }

    #[test]
    fn unpack_rejects_rules_outside_the_schema() {
        let packed = PackedAbility {
            role: Role::STUDENT,
            rules: vec![Grant {
                action: Action::Pay,
                subject: SubjectKind::Course,
            }],
        };
        assert_eq!(
            Ability::unpack(packed),
            Err(AuthError::MalformedCapability {
                action: Action::Pay,
                subject: SubjectKind::Course,
            })
        );
    }
}
