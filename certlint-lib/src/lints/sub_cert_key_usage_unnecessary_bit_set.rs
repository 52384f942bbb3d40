use super::{malformed, subscriber_with};
use crate::dates;
use crate::fields::{Certificate, KeyUsage};
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct SubCertKeyUsageUnnecessaryBitSet;

fn unnecessary_bits(ku: &KeyUsage) -> Vec<&'static str> {
    [
        (ku.content_commitment, "contentCommitment"),
        (ku.key_encipherment, "keyEncipherment"),
        (ku.data_encipherment, "dataEncipherment"),
        (ku.key_agreement, "keyAgreement"),
        (ku.encipher_only, "encipherOnly"),
        (ku.decipher_only, "decipherOnly"),
    ]
    .into_iter()
    .filter_map(|(set, name)| set.then_some(name))
    .collect()
}

impl Lint for SubCertKeyUsageUnnecessaryBitSet {
    fn check_applies(&self, cert: &Certificate) -> bool {
        subscriber_with(cert, oid::EXT_KEY_USAGE)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if let Some(fatal) = malformed(cert, oid::EXT_KEY_USAGE) {
            return fatal;
        }
        let set = cert.key_usage().map(unnecessary_bits).unwrap_or_default();
        if set.is_empty() {
            LintResult::pass()
        } else {
            LintResult::error(format!("unnecessary bits set: {}", set.join(", ")))
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_sub_cert_key_usage_uneccessary_bit_set",
        description: "Subscriber Certificate: keyUsage All other bit positions should not be set.",
        citation: "BRs: 7.1.2.3.e",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MRFCSC_EFFECTIVE,
        lint: Box::new(SubCertKeyUsageUnnecessaryBitSet),
    }
}
