//! Read-only view of the whole RBAC setup, for audit endpoints.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Action, AuthError, Grant, PermissionTable, SubjectKind};

/// Role definition with its effective grants (for audit/display).
#[derive(Debug, Clone, Serialize)]
pub struct RoleDefinition {
    pub name: String,
    pub description: Option<String>,
    pub grants: Vec<Grant>,
}

/// Subject definition with the verbs the schema allows on it.
#[derive(Debug, Clone, Serialize)]
pub struct SubjectDefinition {
    pub name: SubjectKind,
    pub actions: Vec<Action>,
}

/// Registry of every role and subject known to the system.
#[derive(Debug, Clone, Serialize)]
pub struct RbacRegistry {
    pub roles: BTreeMap<String, RoleDefinition>,
    pub subjects: Vec<SubjectDefinition>,
}

impl RbacRegistry {
    /// Run every registered policy once and record what it grants.
    pub fn from_table(table: &PermissionTable) -> Result<Self, AuthError> {
        let mut roles = BTreeMap::new();
        for role in table.roles() {
            let ability = table.define_ability_for_role(role)?;
            roles.insert(
                role.to_string(),
                RoleDefinition {
                    name: role.to_string(),
                    description: role_description(role.as_str()),
                    grants: ability.rules().to_vec(),
                },
            );
        }

        Ok(Self {
            roles,
            subjects: subject_definitions(),
        })
    }

    pub fn role(&self, name: &str) -> Option<&RoleDefinition> {
        self.roles.get(name)
    }
}

/// The capability schema, subject by subject.
pub fn subject_definitions() -> Vec<SubjectDefinition> {
    SubjectKind::ALL
        .into_iter()
        .map(|subject| SubjectDefinition {
            name: subject,
            actions: subject.actions().to_vec(),
        })
        .collect()
}

fn role_description(role: &str) -> Option<String> {
    match role {
        "ADMIN" => Some("Company administrator with unrestricted access".to_string()),
        "TEACHER" => Some("Teaching staff: lessons, tasks, materials and attendance".to_string()),
        "STUDENT" => Some("Enrolled student: coursework, own fees and notifications".to_string()),
        _ => None,
    }
}
