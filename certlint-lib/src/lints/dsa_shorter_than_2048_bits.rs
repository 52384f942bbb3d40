use crate::classify;
use crate::dates;
use crate::fields::{Certificate, KeyAlgorithm};
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::status::LintResult;

struct DsaShorterThan2048Bits;

impl Lint for DsaShorterThan2048Bits {
    fn check_applies(&self, cert: &Certificate) -> bool {
        cert.public_key.algorithm == KeyAlgorithm::Dsa && classify::is_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        match cert.public_key.dsa_p_bits {
            None => LintResult::warn("DSA domain parameters are not present in the certificate"),
            Some(bits) if bits < 2048 => LintResult::error(format!("L is {bits} bits")),
            Some(_) => LintResult::pass(),
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_dsa_shorter_than_2048_bits",
        description: "If the Key is DSA, than the key length (L) must be at least 2048 bits.",
        citation: "BRs: 6.1.5.2",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MIN_CRYPTO_EFFECTIVE,
        lint: Box::new(DsaShorterThan2048Bits),
    }
}
