use schoolhub_core::CompanyId;

/// Company (tenant) context for a request.
///
/// Immutable, and present on every authenticated route alongside the
/// request's `User` and `Ability`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CompanyContext {
    company_id: CompanyId,
}

impl CompanyContext {
    pub fn new(company_id: CompanyId) -> Self {
        Self { company_id }
    }

    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }
}
