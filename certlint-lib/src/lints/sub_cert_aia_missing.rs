use crate::classify;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct SubCertAiaMissing;

impl Lint for SubCertAiaMissing {
    fn check_applies(&self, cert: &Certificate) -> bool {
        classify::is_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if classify::has_extension(cert, oid::EXT_AUTHORITY_INFO_ACCESS) {
            LintResult::pass()
        } else {
            LintResult::error("authorityInformationAccess extension is absent")
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_sub_cert_aia_missing",
        description: "Subscriber Certificate: authorityInformationAccess This extension MUST be present. It MUST NOT be marked critical.",
        citation: "BRs: 7.1.2.3.c",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MRFCSC_EFFECTIVE,
        lint: Box::new(SubCertAiaMissing),
    }
}
