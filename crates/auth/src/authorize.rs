use serde::Serialize;
use thiserror::Error;

use schoolhub_core::UserId;

use crate::{Action, AuthError, Capability, Grant, PermissionTable, Role, Subject, SubjectKind, User};

/// Denial in guard form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: cannot {action} {subject}")]
    Forbidden { action: Action, subject: SubjectKind },
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an authorization decision.
///
/// Answers "why was this allowed/denied?" for audit endpoints and debugging.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub action: Action,
    pub subject: SubjectKind,

    /// Whether the check passes.
    pub granted: bool,

    /// Human-readable reason for the decision.
    pub reason: String,

    pub user: UserState,

    /// The rule that decided a granted check.
    pub matched_rule: Option<Grant>,

    /// If denied, this explains what was missing.
    pub denial_reason: Option<DenialReason>,
}

/// The user whose ability was evaluated.
#[derive(Debug, Clone, Serialize)]
pub struct UserState {
    pub user_id: UserId,
    pub role: Role,
    pub effective_rules: Vec<Grant>,
    pub has_manage_all: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    /// The pair is not in the capability schema; no role could ever hold it.
    MalformedCapability,
    MissingGrant,
}

/// Explain why `user` may or may not perform `action` on `subject`.
///
/// Fails only when the user's role has no policy, exactly like
/// [`PermissionTable::define_ability_for`].
pub fn explain_authorization(
    table: &PermissionTable,
    user: &User,
    action: Action,
    subject: impl Subject,
) -> Result<AuthorizationExplanation, AuthError> {
    let subject = subject.subject_kind();
    let ability = table.define_ability_for(user)?;

    let matched_rule = ability.rule_for(action, subject).copied();
    let user_state = UserState {
        user_id: user.id,
        role: user.role.clone(),
        effective_rules: ability.rules().to_vec(),
        has_manage_all: ability.allows(Capability::MANAGE_ALL),
    };

    if let Some(rule) = matched_rule {
        let reason = if rule == Capability::MANAGE_ALL.grant() {
            format!("Role '{}' has unrestricted access ('manage all')", user.role)
        } else if rule.action == Action::Manage && rule.action != action {
            format!("Role '{}' manages every action on '{}'", user.role, rule.subject)
        } else {
            format!("Role '{}' is granted '{}'", user.role, rule)
        };

        return Ok(AuthorizationExplanation {
            action,
            subject,
            granted: true,
            reason,
            user: user_state,
            matched_rule,
            denial_reason: None,
        });
    }

    let denial_reason = if Capability::new(action, subject).is_err() {
        DenialReason {
            kind: DenialKind::MalformedCapability,
            message: format!("'{action}' is not a valid action on subject '{subject}'"),
            suggestions: vec![format!(
                "Valid actions on '{}' are: {}",
                subject,
                subject
                    .actions()
                    .iter()
                    .map(|a| a.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )],
        }
    } else {
        let granting_roles: Vec<String> = table
            .roles_granting(action, subject)
            .into_iter()
            .map(|role| role.to_string())
            .collect();

        let mut suggestions = vec![format!(
            "Extend the '{}' policy with '{} {}'",
            user.role, action, subject
        )];
        if !granting_roles.is_empty() {
            suggestions.insert(
                0,
                format!(
                    "The following roles would grant this: {}",
                    granting_roles.join(", ")
                ),
            );
        }

        DenialReason {
            kind: DenialKind::MissingGrant,
            message: format!("Missing grant: '{action} {subject}'"),
            suggestions,
        }
    };

    Ok(AuthorizationExplanation {
        action,
        subject,
        granted: false,
        reason: format!(
            "Role '{}' holds no rule covering '{} {}'",
            user.role, action, subject
        ),
        user: user_state,
        matched_rule: None,
        denial_reason: Some(denial_reason),
    })
}
