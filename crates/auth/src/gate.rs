//! Conditional rendering against an ability.
//!
//! UI-agnostic counterpart of a `<Can I="update" a="Course">` component: the
//! caller supplies the "children" as a closure and gets them back only when the
//! check passes.

use crate::{Ability, Action, Subject};

#[derive(Debug, Clone)]
pub struct Can<S> {
    action: Action,
    subject: S,
    negate: bool,
}

impl<S: Subject> Can<S> {
    pub fn new(action: Action, subject: S) -> Self {
        Self {
            action,
            subject,
            negate: false,
        }
    }

    /// Invert the gate: render only when the check fails.
    pub fn not(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    pub fn allowed(&self, ability: &Ability) -> bool {
        ability.can(self.action, &self.subject) != self.negate
    }

    /// `Some(children())` when allowed, `None` (render nothing) otherwise.
    /// The closure is not invoked on denial.
    pub fn render<T>(&self, ability: &Ability, children: impl FnOnce() -> T) -> Option<T> {
        self.allowed(ability).then(children)
    }

    /// Pass-through mode: always invoke `children` with the outcome.
    pub fn pass_through<T>(&self, ability: &Ability, children: impl FnOnce(bool) -> T) -> T {
        children(self.allowed(ability))
    }
}
