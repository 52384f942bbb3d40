use super::{malformed, subscriber_with};
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct SubCertEkuCodeSigningNotSet;

impl Lint for SubCertEkuCodeSigningNotSet {
    fn check_applies(&self, cert: &Certificate) -> bool {
        subscriber_with(cert, oid::EXT_EXTENDED_KEY_USAGE)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if let Some(fatal) = malformed(cert, oid::EXT_EXTENDED_KEY_USAGE) {
            return fatal;
        }
        let purposes = cert.extended_key_usage().unwrap_or_default();
        if purposes.iter().any(|p| p == oid::EKU_CODE_SIGNING) {
            LintResult::pass()
        } else {
            LintResult::error("id-kp-codeSigning is not present")
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_sub_cert_eku_code_signing_not_set",
        description: "Subscriber Certificate: extKeyUsage If the Certificate is a Code Signing Certificate, then id-kp-codeSigning MUST be present",
        citation: "BRs: 7.1.2.3.f",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MRFCSC_EFFECTIVE,
        lint: Box::new(SubCertEkuCodeSigningNotSet),
    }
}
