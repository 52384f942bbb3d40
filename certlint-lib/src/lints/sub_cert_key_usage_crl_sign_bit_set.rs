use super::{malformed, subscriber_with};
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct SubCertKeyUsageCrlSignBitSet;

impl Lint for SubCertKeyUsageCrlSignBitSet {
    fn check_applies(&self, cert: &Certificate) -> bool {
        subscriber_with(cert, oid::EXT_KEY_USAGE)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if let Some(fatal) = malformed(cert, oid::EXT_KEY_USAGE) {
            return fatal;
        }
        if cert.key_usage().is_some_and(|ku| ku.crl_sign) {
            LintResult::error("cRLSign is set")
        } else {
            LintResult::pass()
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_sub_cert_key_usage_crl_sign_bit_set",
        description: "Subscriber Certificate: keyUsage The bit position for cRLSign MUST NOT be set.",
        citation: "BRs: 7.1.2.3.e",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MRFCSC_EFFECTIVE,
        lint: Box::new(SubCertKeyUsageCrlSignBitSet),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::KeyUsage;
    use crate::status::Status;
    use crate::testutil::CertBuilder;

    #[test]
    fn crl_sign_is_an_error() {
        let cert = CertBuilder::subscriber()
            .key_usage(KeyUsage {
                digital_signature: true,
                crl_sign: true,
                ..KeyUsage::default()
            })
            .build();
        assert_eq!(definition().evaluate(&cert).status, Status::Error);
    }

    #[test]
    fn digital_signature_only_passes() {
        let cert = CertBuilder::subscriber().build();
        assert_eq!(definition().evaluate(&cert).status, Status::Pass);
    }

    #[test]
    fn malformed_extension_is_fatal() {
        let cert = CertBuilder::subscriber().malformed(oid::EXT_KEY_USAGE).build();
        let result = definition().evaluate(&cert);
        assert_eq!(result.status, Status::Fatal);
        assert!(result.details.as_deref().unwrap_or_default().starts_with("malformed"));
    }
}
