use super::subscriber_with;
use crate::classify;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct SubCertCrlDistributionPointsMarkedCritical;

impl Lint for SubCertCrlDistributionPointsMarkedCritical {
    fn check_applies(&self, cert: &Certificate) -> bool {
        subscriber_with(cert, oid::EXT_CRL_DISTRIBUTION_POINTS)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if classify::is_extension_critical(cert, oid::EXT_CRL_DISTRIBUTION_POINTS) {
            LintResult::error("cRLDistributionPoints is marked critical")
        } else {
            LintResult::pass()
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        // The misspelling is part of the published identifier.
        name: "e_sub_cert_crl_destribution_points_marked_critical",
        description: "Subscriber Certificate: cRLDistributionPoints MUST be present and SHOULD NOT be marked critical.",
        citation: "BRs: 7.1.2.3.b",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MRFCSC_EFFECTIVE,
        lint: Box::new(SubCertCrlDistributionPointsMarkedCritical),
    }
}
