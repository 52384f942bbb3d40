use super::malformed;
use crate::classify;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct SubCertAiaDoesNotContainIssuingCaUrl;

impl Lint for SubCertAiaDoesNotContainIssuingCaUrl {
    fn check_applies(&self, cert: &Certificate) -> bool {
        classify::is_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if let Some(fatal) = malformed(cert, oid::EXT_AUTHORITY_INFO_ACCESS) {
            return fatal;
        }
        let has_http_ca_issuers = cert
            .aia_entries()
            .iter()
            .any(|entry| entry.is_ca_issuers() && entry.location.starts_with("http://"));
        if has_http_ca_issuers {
            LintResult::pass()
        } else {
            LintResult::error("no caIssuers access method with an HTTP URL")
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_sub_cert_aia_does_not_contain_issuing_ca_url",
        description: "Subscriber Certificate: authorityInformationAccess extension should contain the HTTP URL of the issuing CA's certificate",
        citation: "BRs: 7.1.2.3.c",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MRFCSC_EFFECTIVE,
        lint: Box::new(SubCertAiaDoesNotContainIssuingCaUrl),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use crate::testutil::CertBuilder;

    fn with_aia(entries: &[(&str, &str)]) -> Status {
        let cert = CertBuilder::subscriber().aia(entries).build();
        definition().evaluate(&cert).status
    }

    #[test]
    fn http_ca_issuers_passes() {
        assert_eq!(
            with_aia(&[(oid::ACCESS_CA_ISSUERS, "http://ca.example.test/ca.crt")]),
            Status::Pass
        );
    }

    #[test]
    fn ocsp_only_is_an_error() {
        assert_eq!(
            with_aia(&[(oid::ACCESS_OCSP, "http://ocsp.example.test")]),
            Status::Error
        );
    }

    #[test]
    fn missing_extension_is_an_error() {
        let cert = CertBuilder::subscriber()
            .without_extension(oid::EXT_AUTHORITY_INFO_ACCESS)
            .build();
        assert_eq!(definition().evaluate(&cert).status, Status::Error);
    }

    #[test]
    fn non_http_location_is_an_error() {
        assert_eq!(
            with_aia(&[(oid::ACCESS_CA_ISSUERS, "ldap://ca.example.test/cn=ca")]),
            Status::Error
        );
        assert_eq!(
            with_aia(&[(oid::ACCESS_CA_ISSUERS, "https://ca.example.test/ca.crt")]),
            Status::Error
        );
    }

    #[test]
    fn malformed_extension_is_fatal() {
        let cert = CertBuilder::subscriber().malformed(oid::EXT_AUTHORITY_INFO_ACCESS).build();
        let result = definition().evaluate(&cert);
        assert_eq!(result.status, Status::Fatal);
        assert!(result.details.as_deref().unwrap_or_default().starts_with("malformed"));
    }
}
