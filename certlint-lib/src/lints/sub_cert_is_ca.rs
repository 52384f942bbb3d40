use x509_parser::der_parser::ber::BerObjectContent;
use x509_parser::der_parser::parse_der;

use super::signing_subscriber;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct SubCertIsCa;

impl Lint for SubCertIsCa {
    fn check_applies(&self, cert: &Certificate) -> bool {
        signing_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        let Some(ext) = cert.extension(oid::EXT_BASIC_CONSTRAINTS) else {
            return LintResult::fatal("basicConstraints vanished");
        };
        match decode_ca_flag(&ext.raw) {
            Ok(true) => LintResult::error("basicConstraints cA is true"),
            Ok(false) => LintResult::pass(),
            Err(reason) => LintResult::fatal(reason),
        }
    }
}

/// Decode the cA flag from a DER `BasicConstraints` value.
///
/// The extension is re-read from its encoding so a structurally invalid
/// value is reported instead of being treated as absent.
fn decode_ca_flag(raw: &[u8]) -> Result<bool, String> {
    let (rest, obj) =
        parse_der(raw).map_err(|e| format!("basicConstraints is not valid DER: {e}"))?;
    if !rest.is_empty() {
        return Err("trailing data after basicConstraints".into());
    }
    let fields = obj
        .as_sequence()
        .map_err(|_| "basicConstraints is not a SEQUENCE".to_string())?;
    match fields.first().map(|f| &f.content) {
        None => Ok(false),
        Some(BerObjectContent::Boolean(ca)) => Ok(*ca),
        // pathLenConstraint alone; cA takes its DEFAULT FALSE.
        Some(BerObjectContent::Integer(_)) => Ok(false),
        Some(_) => Err("unexpected element in basicConstraints".into()),
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_sub_cert_is_ca",
        description: "Subscriber Certificate: basicContrainsts cA field MUST NOT be true.",
        citation: "BRs: 7.1.2.3.d",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MRFCSC_EFFECTIVE,
        lint: Box::new(SubCertIsCa),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::KeyUsage;
    use crate::status::Status;
    use crate::testutil::CertBuilder;

    fn signing_only() -> KeyUsage {
        KeyUsage {
            digital_signature: true,
            ..KeyUsage::default()
        }
    }

    #[test]
    fn end_entity_passes() {
        let cert = CertBuilder::subscriber().build();
        assert_eq!(definition().evaluate(&cert).status, Status::Pass);
    }

    #[test]
    fn ca_flag_without_cert_sign_is_an_error() {
        let cert = CertBuilder::subscriber()
            .basic_constraints(true)
            .key_usage(signing_only())
            .build();
        assert_eq!(definition().evaluate(&cert).status, Status::Error);
    }

    #[test]
    fn malformed_basic_constraints_is_fatal() {
        let cert = CertBuilder::subscriber()
            .raw_extension(oid::EXT_BASIC_CONSTRAINTS, true, &[0x30, 0x05, 0x01])
            .build();
        assert_eq!(definition().evaluate(&cert).status, Status::Fatal);
    }

    #[test]
    fn no_key_usage_does_not_apply() {
        let cert = CertBuilder::subscriber()
            .without_extension(oid::EXT_KEY_USAGE)
            .build();
        assert_eq!(definition().evaluate(&cert).status, Status::NA);
    }

    #[test]
    fn decodes_encodings() {
        assert_eq!(decode_ca_flag(&[0x30, 0x00]), Ok(false));
        assert_eq!(decode_ca_flag(&[0x30, 0x03, 0x01, 0x01, 0xFF]), Ok(true));
        assert_eq!(decode_ca_flag(&[0x30, 0x03, 0x02, 0x01, 0x00]), Ok(false));
        assert!(decode_ca_flag(&[0x04, 0x00]).is_err());
        assert!(decode_ca_flag(&[0x30, 0x00, 0x00]).is_err());
    }
}
