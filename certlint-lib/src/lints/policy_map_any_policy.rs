use x509_parser::der_parser::parse_der;

use crate::classify;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct PolicyMapAnyPolicy;

impl Lint for PolicyMapAnyPolicy {
    fn check_applies(&self, cert: &Certificate) -> bool {
        classify::has_extension(cert, oid::EXT_POLICY_MAPPINGS)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        let Some(ext) = cert.extension(oid::EXT_POLICY_MAPPINGS) else {
            return LintResult::fatal("policyMappings vanished");
        };
        match decode_mappings(&ext.raw) {
            Err(reason) => LintResult::fatal(reason),
            Ok(mappings) => {
                let maps_any = mappings
                    .iter()
                    .any(|(issuer, subject)| issuer == oid::ANY_POLICY || subject == oid::ANY_POLICY);
                if maps_any {
                    LintResult::error("anyPolicy appears in a policy mapping")
                } else {
                    LintResult::pass()
                }
            }
        }
    }
}

/// Decode `SEQUENCE OF SEQUENCE { issuerDomainPolicy, subjectDomainPolicy }`
/// into dotted OID pairs.
fn decode_mappings(raw: &[u8]) -> Result<Vec<(String, String)>, String> {
    let (rest, obj) = parse_der(raw).map_err(|e| format!("policyMappings is not valid DER: {e}"))?;
    if !rest.is_empty() {
        return Err("trailing data after policyMappings".into());
    }
    let outer = obj
        .as_sequence()
        .map_err(|_| "policyMappings is not a SEQUENCE".to_string())?;
    outer
        .iter()
        .map(|mapping| {
            let pair = mapping
                .as_sequence()
                .map_err(|_| "policy mapping is not a SEQUENCE".to_string())?;
            match pair.as_slice() {
                [issuer, subject] => {
                    let issuer = issuer
                        .as_oid()
                        .map_err(|_| "issuerDomainPolicy is not an OID".to_string())?;
                    let subject = subject
                        .as_oid()
                        .map_err(|_| "subjectDomainPolicy is not an OID".to_string())?;
                    Ok((issuer.to_id_string(), subject.to_id_string()))
                }
                _ => Err("policy mapping must hold exactly two OIDs".into()),
            }
        })
        .collect()
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_ext_policy_map_any_policy",
        description: "Policies must not be mapped to or from the anyPolicy value",
        citation: "RFC 5280: 4.2.1.5",
        source: LintSource::Rfc5280,
        effective_date: dates::RFC5280,
        lint: Box::new(PolicyMapAnyPolicy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use crate::testutil::CertBuilder;

    // anyPolicy and the baseline code-signing policy
    const ANY_POLICY_DER: &[u8] = &[0x06, 0x04, 0x55, 0x1D, 0x20, 0x00];
    const CODE_SIGNING_DER: &[u8] = &[0x06, 0x06, 0x67, 0x81, 0x0C, 0x01, 0x04, 0x01];
    const NULL_DER: &[u8] = &[0x05, 0x00];

    fn mappings(pairs: &[(&[u8], &[u8])]) -> Vec<u8> {
        let mut inner = Vec::new();
        for (issuer, subject) in pairs {
            let len = issuer.len() + subject.len();
            inner.push(0x30);
            inner.push(u8::try_from(len).unwrap_or(0));
            inner.extend_from_slice(issuer);
            inner.extend_from_slice(subject);
        }
        let mut out = vec![0x30, u8::try_from(inner.len()).unwrap_or(0)];
        out.extend(inner);
        out
    }

    fn status_for(raw: &[u8]) -> Status {
        let cert = CertBuilder::root()
            .not_before(time::macros::datetime!(2022-01-01 0:00 UTC))
            .raw_extension(oid::EXT_POLICY_MAPPINGS, true, raw)
            .build();
        definition().evaluate(&cert).status
    }

    #[test]
    fn ordinary_mapping_passes() {
        assert_eq!(
            status_for(&mappings(&[(CODE_SIGNING_DER, CODE_SIGNING_DER)])),
            Status::Pass
        );
    }

    #[test]
    fn any_policy_on_either_side_is_an_error() {
        assert_eq!(
            status_for(&mappings(&[(ANY_POLICY_DER, CODE_SIGNING_DER)])),
            Status::Error
        );
        assert_eq!(
            status_for(&mappings(&[
                (CODE_SIGNING_DER, CODE_SIGNING_DER),
                (CODE_SIGNING_DER, ANY_POLICY_DER),
            ])),
            Status::Error
        );
    }

    #[test]
    fn malformed_extension_is_fatal() {
        assert_eq!(status_for(&[0x30, 0x03, 0x30, 0x01, 0x05]), Status::Fatal);
        assert_eq!(status_for(&mappings(&[(CODE_SIGNING_DER, NULL_DER)])), Status::Fatal);
    }

    #[test]
    fn absent_extension_does_not_apply() {
        let cert = CertBuilder::subscriber().build();
        assert_eq!(definition().evaluate(&cert).status, Status::NA);
    }
}
