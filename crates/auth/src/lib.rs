//! `schoolhub-auth` — role-based capability system for the school platform.
//!
//! A fixed capability schema says which `(action, subject)` pairs exist, a
//! permission table says which of them each role holds, and the resulting
//! [`Ability`] answers `can` / `cannot` for one user. Pure and synchronous: no
//! HTTP, no storage.

pub mod ability;
pub mod action;
pub mod authorize;
pub mod claims;
pub mod error;
pub mod gate;
pub mod policy;
pub mod registry;
pub mod roles;
pub mod schema;
pub mod subject;
pub mod user;

pub use ability::{Ability, AbilityBuilder, PackedAbility};
pub use action::Action;
pub use authorize::{AuthorizationExplanation, AuthzError, DenialKind, explain_authorization};
pub use claims::{Hs256JwtValidator, JwtClaims, JwtValidator, TokenValidationError, validate_claims};
pub use error::AuthError;
pub use gate::Can;
pub use policy::{PermissionTable, Policy};
pub use registry::RbacRegistry;
pub use roles::Role;
pub use schema::{Capability, Grant};
pub use subject::{Company, DISCRIMINATOR, JsonSubject, Subject, SubjectKind, TypedSubject, Typename};
pub use user::User;
