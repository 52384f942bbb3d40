use crate::classify;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

const ACCEPTED: &[&str] = &[
    oid::SHA256_WITH_RSA,
    oid::SHA384_WITH_RSA,
    oid::SHA512_WITH_RSA,
    oid::DSA_WITH_SHA256,
    oid::ECDSA_WITH_SHA256,
    oid::ECDSA_WITH_SHA384,
    oid::ECDSA_WITH_SHA512,
];

/// Tolerated, but reported.
const DISCOURAGED: &[&str] = &[oid::DSA_WITH_SHA1, oid::SHA1_WITH_RSA];

/// RSASSA-PSS is tolerated only over these digests.
const PSS_HASHES: &[&str] = &[oid::HASH_SHA256, oid::HASH_SHA384, oid::HASH_SHA512];

struct SignatureAlgorithmNotSupported;

impl Lint for SignatureAlgorithmNotSupported {
    fn check_applies(&self, cert: &Certificate) -> bool {
        classify::is_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        let alg = cert.signature_algorithm_oid.as_str();
        if ACCEPTED.contains(&alg) {
            LintResult::pass()
        } else if alg == oid::RSASSA_PSS {
            match cert.pss_hash_oid.as_deref() {
                Some(hash) if PSS_HASHES.contains(&hash) => {
                    LintResult::warn(format!("RSASSA-PSS with digest {hash} is discouraged"))
                }
                hash => LintResult::error(format!(
                    "RSASSA-PSS with digest {} is not permitted",
                    hash.unwrap_or("unknown")
                )),
            }
        } else if DISCOURAGED.contains(&alg) {
            LintResult::warn(format!("signature algorithm {} is discouraged", cert.signature_algorithm))
        } else {
            LintResult::error(format!("signature algorithm {} is not permitted", cert.signature_algorithm))
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_signature_algorithm_not_supported",
        description: "Certificates MUST meet the following requirements for algorithm Source: SHA-256, SHA-384, SHA-512",
        citation: "BRs: 7.1.3.2.1, 7.1.3.2.2, and 7.1.3.2.3",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MRFCSC_EFFECTIVE,
        lint: Box::new(SignatureAlgorithmNotSupported),
    }
}
