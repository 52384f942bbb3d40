use crate::classify;
use crate::dates;
use crate::fields::{Certificate, KeyAlgorithm};
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::status::LintResult;

struct DsaImproperModulus;

impl Lint for DsaImproperModulus {
    fn check_applies(&self, cert: &Certificate) -> bool {
        cert.public_key.algorithm == KeyAlgorithm::Dsa && classify::is_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        // N is the bit length of the subprime q.
        match cert.public_key.dsa_q_bits {
            Some(224 | 256) => LintResult::pass(),
            Some(bits) => LintResult::error(format!("N is {bits} bits, expected 224 or 256")),
            None => LintResult::warn("DSA domain parameters are not present in the certificate"),
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_dsa_improper_modulus",
        description: "If the Key is DSA, than modulus length (N) must be either 224 or 256 bits.",
        citation: "BRs: 6.1.5.2",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MIN_CRYPTO_EFFECTIVE,
        lint: Box::new(DsaImproperModulus),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use crate::testutil::CertBuilder;

    #[test]
    fn subprime_sizes() {
        for (q, expected) in [(160, Status::Error), (224, Status::Pass), (256, Status::Pass)] {
            let cert = CertBuilder::subscriber().dsa(2048, q).build();
            assert_eq!(definition().evaluate(&cert).status, expected, "q={q}");
        }
    }
}
