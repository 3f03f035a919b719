//! Subjects: the entity classes actions apply to.
//!
//! A check can name a subject directly (`SubjectKind::Company`) or hand over an
//! instance. Instances identify their subject through exactly one convention:
//! the [`DISCRIMINATOR`] field (`__typename`). Nothing inspects the rest of the
//! object's shape.

use serde::{Deserialize, Serialize};

use schoolhub_core::{CompanyId, UserId};

use crate::AuthError;

/// Reserved field carrying an instance's subject name.
pub const DISCRIMINATOR: &str = "__typename";

/// Closed set of subjects, plus the `all` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SubjectKind {
    Course,
    Class,
    Task,
    Material,
    Presence,
    Registration,
    MonthlyFee,
    Billing,
    Report,
    Notification,
    Member,
    Company,
    User,
    Role,
    Lesson,
    Discipline,
    Level,
    Classroom,
    /// Matches every subject. Only `manage` may be granted on it.
    #[serde(rename = "all")]
    All,
}

impl SubjectKind {
    pub const ALL: [SubjectKind; 19] = [
        SubjectKind::Course,
        SubjectKind::Class,
        SubjectKind::Task,
        SubjectKind::Material,
        SubjectKind::Presence,
        SubjectKind::Registration,
        SubjectKind::MonthlyFee,
        SubjectKind::Billing,
        SubjectKind::Report,
        SubjectKind::Notification,
        SubjectKind::Member,
        SubjectKind::Company,
        SubjectKind::User,
        SubjectKind::Role,
        SubjectKind::Lesson,
        SubjectKind::Discipline,
        SubjectKind::Level,
        SubjectKind::Classroom,
        SubjectKind::All,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SubjectKind::Course => "Course",
            SubjectKind::Class => "Class",
            SubjectKind::Task => "Task",
            SubjectKind::Material => "Material",
            SubjectKind::Presence => "Presence",
            SubjectKind::Registration => "Registration",
            SubjectKind::MonthlyFee => "MonthlyFee",
            SubjectKind::Billing => "Billing",
            SubjectKind::Report => "Report",
            SubjectKind::Notification => "Notification",
            SubjectKind::Member => "Member",
            SubjectKind::Company => "Company",
            SubjectKind::User => "User",
            SubjectKind::Role => "Role",
            SubjectKind::Lesson => "Lesson",
            SubjectKind::Discipline => "Discipline",
            SubjectKind::Level => "Level",
            SubjectKind::Classroom => "Classroom",
            SubjectKind::All => "all",
        }
    }
}

impl core::fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for SubjectKind {
    type Err = AuthError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SubjectKind::ALL
            .into_iter()
            .find(|subject| subject.as_str() == value)
            .ok_or_else(|| AuthError::UnknownSubject(value.to_string()))
    }
}

/// Anything an ability can be queried against.
pub trait Subject {
    fn subject_kind(&self) -> SubjectKind;
}

impl Subject for SubjectKind {
    fn subject_kind(&self) -> SubjectKind {
        *self
    }
}

impl<S: Subject + ?Sized> Subject for &S {
    fn subject_kind(&self) -> SubjectKind {
        (**self).subject_kind()
    }
}

/// Domain records that always belong to one subject.
pub trait Typename {
    const TYPENAME: SubjectKind;
}

/// A subject instance: arbitrary data tagged with its discriminator.
///
/// Serializes flat, e.g. `{"__typename": "Company", "id": "...", "owner_id": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedSubject<T> {
    #[serde(rename = "__typename")]
    pub typename: SubjectKind,
    #[serde(flatten)]
    pub data: T,
}

impl<T> TypedSubject<T> {
    pub fn new(typename: SubjectKind, data: T) -> Self {
        Self { typename, data }
    }
}

impl<T: Typename> TypedSubject<T> {
    /// Tag a record with its own subject name.
    pub fn tag(data: T) -> Self {
        Self::new(T::TYPENAME, data)
    }
}

impl<T> Subject for TypedSubject<T> {
    fn subject_kind(&self) -> SubjectKind {
        self.typename
    }
}

/// Untyped instance as received over the wire (any object with `__typename`).
pub type JsonSubject = TypedSubject<serde_json::Map<String, serde_json::Value>>;

/// Company (tenant) record as seen by authorization checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub owner_id: UserId,
}

impl Typename for Company {
    const TYPENAME: SubjectKind = SubjectKind::Company;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_string_roundtrip() {
        for subject in SubjectKind::ALL {
            assert_eq!(subject.as_str().parse::<SubjectKind>().ok(), Some(subject));
            let json = serde_json::to_string(&subject).unwrap();
            assert_eq!(json, format!("\"{subject}\""));
        }
    }

    #[test]
    fn sentinel_is_lowercase() {
        assert_eq!("all".parse::<SubjectKind>().unwrap(), SubjectKind::All);
        assert!("All".parse::<SubjectKind>().is_err());
    }

    #[test]
    fn tagged_company_carries_discriminator() {
        let company = Company {
            id: CompanyId::new(),
            owner_id: UserId::new(),
        };
        let subject = TypedSubject::tag(company.clone());
        assert_eq!(subject.subject_kind(), SubjectKind::Company);

        let json = serde_json::to_value(&subject).unwrap();
        assert_eq!(json[DISCRIMINATOR], "Company");
        assert_eq!(json["owner_id"], company.owner_id.to_string());
    }

    #[test]
    fn json_subject_resolves_by_discriminator_only() {
        let subject: JsonSubject = serde_json::from_value(serde_json::json!({
            "__typename": "MonthlyFee",
            "id": "fee-1",
            "amount": 120,
        }))
        .unwrap();

        assert_eq!(subject.subject_kind(), SubjectKind::MonthlyFee);
        assert_eq!(subject.data["amount"], 120);
    }

    #[test]
    fn json_subject_without_discriminator_is_rejected() {
        let result = serde_json::from_value::<JsonSubject>(serde_json::json!({ "id": "x" }));
        assert!(result.is_err());
    }
}
