use super::malformed;
use crate::classify;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct SubCertKeyUsageMissing;

impl Lint for SubCertKeyUsageMissing {
    fn check_applies(&self, cert: &Certificate) -> bool {
        classify::is_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if let Some(fatal) = malformed(cert, oid::EXT_KEY_USAGE) {
            return fatal;
        }
        match cert.key_usage() {
            Some(ku) if !ku.is_empty() => LintResult::pass(),
            _ => LintResult::error("keyUsage is absent or asserts no usages"),
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_sub_cert_key_usage_missing",
        description: "Subscriber Certificate: keyUsage This extension MUST be present and MUST be marked critical.",
        citation: "BRs: 7.1.2.3.e",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MRFCSC_EFFECTIVE,
        lint: Box::new(SubCertKeyUsageMissing),
    }
}
