use super::{malformed, subscriber_with};
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct SubCertCrlDistributionPointsNoUrl;

impl Lint for SubCertCrlDistributionPointsNoUrl {
    fn check_applies(&self, cert: &Certificate) -> bool {
        subscriber_with(cert, oid::EXT_CRL_DISTRIBUTION_POINTS)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if let Some(fatal) = malformed(cert, oid::EXT_CRL_DISTRIBUTION_POINTS) {
            return fatal;
        }
        if cert
            .crl_distribution_uris()
            .iter()
            .any(|uri| uri.starts_with("http://"))
        {
            LintResult::pass()
        } else {
            LintResult::error("cRLDistributionPoints has no HTTP URL")
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_sub_cert_crl_distribution_points_does_not_contain_url",
        description: "Subscriber Certificate: cRLDistributionPoints MUST be present, and it MUST contain the HTTP URL of the CA's CRL service.",
        citation: "BRs: 7.1.2.3.b",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MRFCSC_EFFECTIVE,
        lint: Box::new(SubCertCrlDistributionPointsNoUrl),
    }
}
