use crate::classify;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct RootCaContainsCertPolicy;

impl Lint for RootCaContainsCertPolicy {
    fn check_applies(&self, cert: &Certificate) -> bool {
        classify::is_root_ca(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if classify::has_extension(cert, oid::EXT_CERTIFICATE_POLICIES) {
            LintResult::error("root certificate carries certificatePolicies")
        } else {
            LintResult::pass()
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_root_ca_contains_cert_policy",
        description: "Root CA Certificate: certificatePolicies SHOULD NOT be present.",
        citation: "MRfCSC: 9.3.2",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MRFCSC_EFFECTIVE,
        lint: Box::new(RootCaContainsCertPolicy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use crate::testutil::CertBuilder;
    use time::macros::datetime;

    fn root() -> CertBuilder {
        CertBuilder::root().not_before(datetime!(2017-01-01 0:00 UTC))
    }

    #[test]
    fn root_without_policies_passes() {
        assert_eq!(definition().evaluate(&root().build()).status, Status::Pass);
    }

    #[test]
    fn root_with_policies_is_an_error() {
        let cert = root().policies(&[oid::ANY_POLICY]).build();
        assert_eq!(definition().evaluate(&cert).status, Status::Error);
    }

    #[test]
    fn subscribers_do_not_apply() {
        let cert = CertBuilder::subscriber().build();
        assert_eq!(definition().evaluate(&cert).status, Status::NA);
    }

    #[test]
    fn root_issued_before_the_requirements() {
        let cert = CertBuilder::root().policies(&[oid::ANY_POLICY]).build();
        assert_eq!(definition().evaluate(&cert).status, Status::NE);
    }
}
