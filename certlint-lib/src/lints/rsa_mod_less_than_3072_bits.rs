use super::rsa_mod_less_than_2048_bits::check_modulus;
use crate::classify;
use crate::dates;
use crate::fields::{Certificate, KeyAlgorithm};
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::regime::RsaKeySizeRegime;
use crate::status::LintResult;

struct RsaModLessThan3072Bits;

impl Lint for RsaModLessThan3072Bits {
    fn check_applies(&self, cert: &Certificate) -> bool {
        cert.public_key.algorithm == KeyAlgorithm::Rsa && classify::is_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        check_modulus(cert, RsaKeySizeRegime::Min3072.minimum_bits())
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_rsa_mod_less_than_3072_bits",
        description: "Subscriber Certificate: If the key is RSA, then the modulus MUST be at least 3072 bits in length.",
        citation: "BRs: 6.1.5.2",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::RSA_3072_TRANSITION,
        lint: Box::new(RsaModLessThan3072Bits),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use crate::testutil::CertBuilder;
    use time::macros::datetime;

    #[test]
    fn rsa_2048_after_transition_is_an_error() {
        let cert = CertBuilder::subscriber().rsa(2048).build();
        let result = definition().evaluate(&cert);
        assert_eq!(result.status, Status::Error);
        assert_eq!(result.details.as_deref(), Some("modulus is 2048 bits, minimum is 3072"));
    }

    #[test]
    fn rsa_3072_passes() {
        let cert = CertBuilder::subscriber().rsa(3072).build();
        assert_eq!(definition().evaluate(&cert).status, Status::Pass);
    }

    #[test]
    fn not_effective_in_2020() {
        let cert = CertBuilder::subscriber()
            .rsa(2048)
            .issued(datetime!(2020-01-01 0:00 UTC))
            .build();
        assert_eq!(definition().evaluate(&cert).status, Status::NE);
    }

    #[test]
    fn dsa_does_not_apply() {
        let cert = CertBuilder::subscriber().dsa(2048, 256).build();
        assert_eq!(definition().evaluate(&cert).status, Status::NA);
    }

    #[test]
    fn undecodable_key_is_fatal() {
        let mut cert = CertBuilder::subscriber().build();
        cert.public_key.rsa_modulus_bits = None;
        assert_eq!(definition().evaluate(&cert).status, Status::Fatal);
    }
}
