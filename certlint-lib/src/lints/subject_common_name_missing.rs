use crate::classify;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct SubjectCommonNameMissing;

impl Lint for SubjectCommonNameMissing {
    fn check_applies(&self, cert: &Certificate) -> bool {
        classify::is_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        match cert.subject.first(oid::COMMON_NAME) {
            Some(cn) if !cn.is_empty() => LintResult::pass(),
            _ => LintResult::error("subject has no commonName"),
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_subject_common_name_missing",
        description: "Subscriber Certificate: commonName is required.",
        citation: "MRfCSC: 9.2.2",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MRFCSC_EFFECTIVE,
        lint: Box::new(SubjectCommonNameMissing),
    }
}
