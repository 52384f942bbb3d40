use crate::classify;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct SubCertCertificatePoliciesMissing;

impl Lint for SubCertCertificatePoliciesMissing {
    fn check_applies(&self, cert: &Certificate) -> bool {
        classify::is_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if classify::has_extension(cert, oid::EXT_CERTIFICATE_POLICIES) {
            LintResult::pass()
        } else {
            LintResult::error("certificatePolicies extension is absent")
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_sub_cert_certificate_policies_missing",
        description: "Subscriber Certificate: certificatePolicies MUST be present and SHOULD NOT be marked critical.",
        citation: "BRs: 7.1.2.3",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MRFCSC_EFFECTIVE,
        lint: Box::new(SubCertCertificatePoliciesMissing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use crate::testutil::CertBuilder;

    #[test]
    fn presence() {
        let with = CertBuilder::subscriber().build();
        let without = CertBuilder::subscriber()
            .without_extension(oid::EXT_CERTIFICATE_POLICIES)
            .build();
        assert_eq!(definition().evaluate(&with).status, Status::Pass);
        assert_eq!(definition().evaluate(&without).status, Status::Error);
    }
}
