use super::malformed;
use crate::classify;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct AuthorityKeyIdentifierNoKeyIdentifier;

impl Lint for AuthorityKeyIdentifierNoKeyIdentifier {
    fn check_applies(&self, cert: &Certificate) -> bool {
        classify::is_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if let Some(fatal) = malformed(cert, oid::EXT_AUTHORITY_KEY_ID) {
            return fatal;
        }
        if cert.authority_key_id().is_some()
            || (classify::is_ca(cert) && classify::is_self_signed(cert))
        {
            LintResult::pass()
        } else {
            LintResult::error("authorityKeyIdentifier has no keyIdentifier")
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_ext_authority_key_identifier_no_key_identifier",
        description: "CAs must include keyIdentifer field of AKI in all non-self-issued certificates",
        citation: "RFC 5280: 4.2.1.1",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MRFCSC_EFFECTIVE,
        lint: Box::new(AuthorityKeyIdentifierNoKeyIdentifier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use crate::testutil::CertBuilder;

    #[test]
    fn key_identifier_present() {
        let cert = CertBuilder::subscriber().build();
        assert_eq!(definition().evaluate(&cert).status, Status::Pass);
    }

    #[test]
    fn issuer_and_serial_only_is_an_error() {
        let cert = CertBuilder::subscriber().aki_key_id(None).build();
        assert_eq!(definition().evaluate(&cert).status, Status::Error);
    }

    #[test]
    fn missing_extension_is_an_error() {
        let cert = CertBuilder::subscriber()
            .without_extension(oid::EXT_AUTHORITY_KEY_ID)
            .build();
        assert_eq!(definition().evaluate(&cert).status, Status::Error);
    }

    #[test]
    fn malformed_extension_is_fatal() {
        let cert = CertBuilder::subscriber().malformed(oid::EXT_AUTHORITY_KEY_ID).build();
        let result = definition().evaluate(&cert);
        assert_eq!(result.status, Status::Fatal);
        assert!(result.details.as_deref().unwrap_or_default().starts_with("malformed"));
    }
}
