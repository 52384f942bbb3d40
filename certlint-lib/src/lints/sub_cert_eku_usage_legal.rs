use super::{malformed, subscriber_with};
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

const PERMITTED: &[&str] = &[
    oid::EKU_CODE_SIGNING,
    oid::EKU_EMAIL_PROTECTION,
    oid::EKU_MS_LIFETIME_SIGNING,
    oid::EKU_MS_DOCUMENT_SIGNING,
];

struct SubCertEkuUsageLegal;

impl Lint for SubCertEkuUsageLegal {
    fn check_applies(&self, cert: &Certificate) -> bool {
        subscriber_with(cert, oid::EXT_EXTENDED_KEY_USAGE)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if let Some(fatal) = malformed(cert, oid::EXT_EXTENDED_KEY_USAGE) {
            return fatal;
        }
        let illegal: Vec<&str> = cert
            .extended_key_usage()
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .filter(|p| !PERMITTED.contains(p))
            .collect();
        if illegal.is_empty() {
            LintResult::pass()
        } else {
            LintResult::error(format!("disallowed purposes: {}", illegal.join(", ")))
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_sub_cert_eku_usage_legal",
        description: "Subscriber Certificate: extKeyUsage The following EKUs MAY be present: {Lifetime Signing OID (1.3.6.1.4.1.311.10.3.13), id-kp-emailProtection, Document Signing (1.3.6.1.4.1.311.10.3.12)}",
        citation: "BRs: 7.1.2.3.f",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MRFCSC_EFFECTIVE,
        lint: Box::new(SubCertEkuUsageLegal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use crate::testutil::CertBuilder;

    #[test]
    fn permitted_purposes_pass() {
        let cert = CertBuilder::subscriber().eku(PERMITTED).build();
        assert_eq!(definition().evaluate(&cert).status, Status::Pass);
    }

    #[test]
    fn any_extended_key_usage_is_not_permitted() {
        let cert = CertBuilder::subscriber()
            .eku(&[oid::EKU_CODE_SIGNING, oid::EKU_ANY])
            .build();
        let result = definition().evaluate(&cert);
        assert_eq!(result.status, Status::Error);
        assert_eq!(
            result.details.as_deref(),
            Some("disallowed purposes: 2.5.29.37.0")
        );
    }

    #[test]
    fn server_auth_is_not_permitted() {
        let cert = CertBuilder::subscriber()
            .eku(&[oid::EKU_CODE_SIGNING, oid::EKU_SERVER_AUTH, oid::EKU_TIME_STAMPING])
            .build();
        assert_eq!(definition().evaluate(&cert).status, Status::Error);
    }

    #[test]
    fn malformed_extension_is_fatal() {
        let cert = CertBuilder::subscriber().malformed(oid::EXT_EXTENDED_KEY_USAGE).build();
        let result = definition().evaluate(&cert);
        assert_eq!(result.status, Status::Fatal);
        assert!(result.details.as_deref().unwrap_or_default().starts_with("malformed"));
    }
}
