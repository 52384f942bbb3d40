use crate::classify;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct SubjectOrganizationNameMissing;

impl Lint for SubjectOrganizationNameMissing {
    fn check_applies(&self, cert: &Certificate) -> bool {
        classify::is_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if cert.subject.contains(oid::ORGANIZATION) {
            LintResult::pass()
        } else {
            LintResult::error("subject has no organizationName")
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_subject_organization_name_missing",
        description: "Subscriber Certificate: organizationName is required.",
        citation: "MRfCSC: 9.2.4.a",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MRFCSC_EFFECTIVE,
        lint: Box::new(SubjectOrganizationNameMissing),
    }
}
