use crate::classify;
use crate::dates;
use crate::fields::{Certificate, KeyAlgorithm};
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::regime::{rsa_key_size_regimes, RsaKeySizeRegime};
use crate::status::LintResult;

struct RsaModLessThan2048Bits;

impl Lint for RsaModLessThan2048Bits {
    fn check_applies(&self, cert: &Certificate) -> bool {
        cert.public_key.algorithm == KeyAlgorithm::Rsa
            && classify::is_subscriber(cert)
            && rsa_key_size_regimes().resolve(cert.issued_at()) == Some(&RsaKeySizeRegime::Min2048)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        check_modulus(cert, RsaKeySizeRegime::Min2048.minimum_bits())
    }
}

/// Compare the RSA modulus length against `minimum`.
pub(super) fn check_modulus(cert: &Certificate, minimum: u32) -> LintResult {
    match cert.public_key.rsa_modulus_bits {
        None => LintResult::fatal("RSA public key could not be decoded"),
        Some(bits) if bits < minimum => {
            LintResult::error(format!("modulus is {bits} bits, minimum is {minimum}"))
        }
        Some(_) => LintResult::pass(),
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_rsa_mod_less_than_2048_bits",
        description: "Subscriber Certificate: If the key is RSA, then the modulus MUST be at least 2048 bits in length. (Issued prior to Jan 1, 2021)",
        citation: "BRs: 6.1.5.2",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MIN_CRYPTO_EFFECTIVE,
        lint: Box::new(RsaModLessThan2048Bits),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use crate::testutil::CertBuilder;
    use time::macros::datetime;

    fn issued_2020(bits: u32) -> Certificate {
        CertBuilder::subscriber()
            .rsa(bits)
            .issued(datetime!(2020-01-01 0:00 UTC))
            .build()
    }

    #[test]
    fn short_modulus_is_an_error() {
        assert_eq!(definition().evaluate(&issued_2020(1024)).status, Status::Error);
        assert_eq!(definition().evaluate(&issued_2020(2047)).status, Status::Error);
    }

    #[test]
    fn exactly_2048_passes() {
        assert_eq!(definition().evaluate(&issued_2020(2048)).status, Status::Pass);
    }

    #[test]
    fn superseded_by_the_3072_regime() {
        let cert = CertBuilder::subscriber().rsa(1024).build();
        assert_eq!(definition().evaluate(&cert).status, Status::NA);
    }

    #[test]
    fn ec_keys_do_not_apply() {
        let cert = CertBuilder::subscriber()
            .ec("P-256")
            .issued(datetime!(2020-01-01 0:00 UTC))
            .build();
        assert_eq!(definition().evaluate(&cert).status, Status::NA);
    }

    #[test]
    fn before_minimum_crypto_requirements() {
        let cert = CertBuilder::subscriber()
            .rsa(1024)
            .issued(datetime!(2016-06-01 0:00 UTC))
            .build();
        assert_eq!(definition().evaluate(&cert).status, Status::NE);
    }
}
