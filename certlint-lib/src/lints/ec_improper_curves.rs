use crate::classify;
use crate::dates;
use crate::fields::{Certificate, KeyAlgorithm};
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::status::LintResult;

const APPROVED_CURVES: &[&str] = &["P-256", "P-384", "P-521"];

struct EcImproperCurves;

impl Lint for EcImproperCurves {
    fn check_applies(&self, cert: &Certificate) -> bool {
        cert.public_key.algorithm == KeyAlgorithm::Ec && classify::is_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        match cert.public_key.curve.as_deref() {
            Some(curve) if APPROVED_CURVES.contains(&curve) => LintResult::pass(),
            Some(curve) => LintResult::error(format!("curve {curve} is not approved")),
            None => LintResult::error("named curve not recognized"),
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_ec_improper_curves",
        description: "If the Key is ECDSA, then the curve MUST be one of NIST P-256, P-384, or P-521.",
        citation: "BRs: 6.1.5.2",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MIN_CRYPTO_EFFECTIVE,
        lint: Box::new(EcImproperCurves),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use crate::testutil::CertBuilder;

    #[test]
    fn nist_curves_pass() {
        for curve in APPROVED_CURVES {
            let cert = CertBuilder::subscriber().ec(curve).build();
            assert_eq!(definition().evaluate(&cert).status, Status::Pass);
        }
    }

    #[test]
    fn other_curves_fail() {
        for curve in ["P-224", "secp256k1"] {
            let cert = CertBuilder::subscriber().ec(curve).build();
            assert_eq!(definition().evaluate(&cert).status, Status::Error);
        }
    }
}
