//! Certificate decoding from PEM, DER and bare base64.

use crate::fields::{
    AiaEntry, BasicConstraints, Certificate, DateTime, DistinguishedName, Extension,
    ExtensionValue, KeyAlgorithm, KeyUsage, NameAttribute, PublicKeyInfo,
};
use crate::oid;
use crate::util;
use crate::CertlintError;
use base64::Engine;
use x509_parser::prelude::*;

/// How to interpret input bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputFormat {
    /// PEM if the input starts with an armor line, DER otherwise.
    #[default]
    Auto,
    Pem,
    Der,
    /// Base64 of the DER encoding without PEM armor.
    Base64,
}

impl InputFormat {
    /// Decode a single certificate.
    pub fn parse(self, input: &[u8]) -> Result<Certificate, CertlintError> {
        match self {
            InputFormat::Auto => parse_cert(input),
            InputFormat::Pem => parse_pem(input),
            InputFormat::Der => parse_der(input),
            InputFormat::Base64 => parse_base64(input),
        }
    }

    /// Decode every certificate in the input. PEM input may hold a bundle;
    /// the other formats hold exactly one certificate.
    pub fn parse_all(self, input: &[u8]) -> Result<Vec<Certificate>, CertlintError> {
        match self {
            InputFormat::Pem => parse_pem_bundle(input),
            InputFormat::Auto if util::is_pem(input) => parse_pem_bundle(input),
            other => other.parse(input).map(|cert| vec![cert]),
        }
    }
}

impl std::str::FromStr for InputFormat {
    type Err = CertlintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(InputFormat::Auto),
            "pem" => Ok(InputFormat::Pem),
            "der" => Ok(InputFormat::Der),
            "base64" => Ok(InputFormat::Base64),
            other => Err(CertlintError::Config(format!(
                "unknown input format '{other}' (expected auto, pem, der or base64)"
            ))),
        }
    }
}

/// Parse a certificate from PEM or DER (auto-detected).
///
/// If the input begins with `-----BEGIN` (after stripping whitespace), it is
/// treated as PEM. Otherwise it is treated as DER.
pub fn parse_cert(input: &[u8]) -> Result<Certificate, CertlintError> {
    if input.is_empty() {
        return Err(CertlintError::ParseError("empty input".into()));
    }

    if util::is_pem(input) {
        parse_pem(input)
    } else {
        parse_der(input)
    }
}

/// Parse the first certificate of a PEM document.
pub fn parse_pem(input: &[u8]) -> Result<Certificate, CertlintError> {
    let (_, pem) = x509_parser::pem::parse_x509_pem(input)
        .map_err(|e| CertlintError::PemError(format!("{}", e)))?;

    if !is_certificate_label(&pem.label) {
        return Err(CertlintError::PemError(format!(
            "expected CERTIFICATE, got {}",
            pem.label
        )));
    }

    parse_der(&pem.contents)
}

/// Parse a certificate from base64-encoded DER without PEM armor.
///
/// Embedded whitespace and line breaks are ignored.
pub fn parse_base64(input: &[u8]) -> Result<Certificate, CertlintError> {
    let compact: Vec<u8> = input
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let der = base64::engine::general_purpose::STANDARD
        .decode(&compact)
        .map_err(|e| CertlintError::Base64Error(format!("{}", e)))?;
    parse_der(&der)
}

/// Parse a certificate from DER format.
pub fn parse_der(input: &[u8]) -> Result<Certificate, CertlintError> {
    let (remaining, x509) = X509Certificate::from_der(input)
        .map_err(|e| CertlintError::DerError(format!("{}", e)))?;

    // Use only the actual certificate bytes, not any trailing data,
    // so that fingerprints are computed over the correct content.
    let cert_len = input.len() - remaining.len();
    let cert_der = input.get(..cert_len).unwrap_or(input);
    build_certificate(&x509, cert_der)
}

/// Parse every CERTIFICATE block in a PEM bundle, in order.
pub fn parse_pem_bundle(input: &[u8]) -> Result<Vec<Certificate>, CertlintError> {
    pem_blocks(input)?
        .iter()
        .map(|der| parse_der(der))
        .collect()
}

/// Extract the DER contents of every CERTIFICATE block in a PEM bundle.
///
/// Trailing garbage after at least one good block is ignored.
pub(crate) fn pem_blocks(input: &[u8]) -> Result<Vec<Vec<u8>>, CertlintError> {
    let mut certs = Vec::new();

    for pem_result in Pem::iter_from_buffer(input) {
        match pem_result {
            Ok(pem) => {
                if is_certificate_label(&pem.label) {
                    certs.push(pem.contents);
                }
            }
            Err(e) => {
                if !certs.is_empty() {
                    break;
                }
                return Err(CertlintError::PemError(format!(
                    "failed to parse PEM: {}",
                    e
                )));
            }
        }
    }

    if certs.is_empty() {
        return Err(CertlintError::PemError(
            "no certificates found in PEM input".into(),
        ));
    }

    Ok(certs)
}

fn is_certificate_label(label: &str) -> bool {
    matches!(
        label,
        "CERTIFICATE" | "TRUSTED CERTIFICATE" | "X509 CERTIFICATE"
    )
}

fn build_certificate(x509: &X509Certificate, raw_der: &[u8]) -> Result<Certificate, CertlintError> {
    let tbs = &x509.tbs_certificate;

    let raw_version = tbs.version.0;
    if raw_version > 2 {
        return Err(CertlintError::ParseError(format!(
            "unsupported X.509 version {} (expected v1, v2, or v3)",
            raw_version + 1
        )));
    }

    let signature_algorithm_oid = x509.signature_algorithm.algorithm.to_id_string();
    let signature_algorithm = signature_algorithm_name(&signature_algorithm_oid);
    let pss_hash_oid = pss_hash_oid(&x509.signature_algorithm);

    let issuer = build_dn(&tbs.issuer);
    let subject = build_dn(&tbs.subject);

    // Only a self-issued certificate can carry a signature under its own key.
    let self_signature_valid =
        subject.raw == issuer.raw && x509.verify_signature(None).is_ok();

    Ok(Certificate {
        version: raw_version + 1,
        serial: format_serial(tbs.raw_serial()),
        signature_algorithm,
        signature_algorithm_oid,
        pss_hash_oid,
        issuer,
        subject,
        not_before: DateTime::from_timestamp(tbs.validity.not_before.timestamp()),
        not_after: DateTime::from_timestamp(tbs.validity.not_after.timestamp()),
        public_key: build_public_key_info(&tbs.subject_pki),
        extensions: tbs.extensions().iter().map(build_extension).collect(),
        self_signature_valid,
        raw_der: raw_der.to_vec(),
    })
}

/// Format a serial number as a colon-separated uppercase hex string,
/// stripping leading zero bytes but keeping at least one byte.
fn format_serial(raw: &[u8]) -> String {
    let stripped = match raw.iter().position(|&b| b != 0) {
        Some(pos) => raw.get(pos..).unwrap_or(raw),
        None => raw.get(raw.len().saturating_sub(1)..).unwrap_or(raw),
    };
    util::hex_colon_upper(stripped)
}

/// The digest named by RSASSA-PSS parameters. Unparseable parameters give `None`.
fn pss_hash_oid(alg: &AlgorithmIdentifier) -> Option<String> {
    use x509_parser::signature_algorithm::SignatureAlgorithm;

    match SignatureAlgorithm::try_from(alg) {
        Ok(SignatureAlgorithm::RSASSA_PSS(params)) => Some(params.hash_algorithm_oid().to_id_string()),
        _ => None,
    }
}

fn signature_algorithm_name(algorithm_oid: &str) -> String {
    match algorithm_oid {
        oid::MD5_WITH_RSA => "md5WithRSAEncryption".into(),
        oid::SHA1_WITH_RSA => "sha1WithRSAEncryption".into(),
        oid::RSASSA_PSS => "rsassaPss".into(),
        oid::SHA256_WITH_RSA => "sha256WithRSAEncryption".into(),
        oid::SHA384_WITH_RSA => "sha384WithRSAEncryption".into(),
        oid::SHA512_WITH_RSA => "sha512WithRSAEncryption".into(),
        oid::DSA_WITH_SHA1 => "dsaWithSHA1".into(),
        oid::DSA_WITH_SHA224 => "dsa_with_SHA224".into(),
        oid::DSA_WITH_SHA256 => "dsa_with_SHA256".into(),
        oid::ECDSA_WITH_SHA1 => "ecdsa-with-SHA1".into(),
        oid::ECDSA_WITH_SHA256 => "ecdsa-with-SHA256".into(),
        oid::ECDSA_WITH_SHA384 => "ecdsa-with-SHA384".into(),
        oid::ECDSA_WITH_SHA512 => "ecdsa-with-SHA512".into(),
        oid::ED25519 => "Ed25519".into(),
        oid::ED448 => "Ed448".into(),
        other => other.to_string(),
    }
}

pub(crate) fn build_dn(name: &X509Name) -> DistinguishedName {
    let mut attributes = Vec::new();
    for rdn in name.iter() {
        for attr in rdn.iter() {
            let attr_oid = attr.attr_type().to_id_string();
            attributes.push(NameAttribute {
                short_name: util::oid_short_name(&attr_oid),
                oid: attr_oid,
                value: attr.as_str().unwrap_or("<binary>").to_string(),
            });
        }
    }
    DistinguishedName {
        attributes,
        raw: name.as_raw().to_vec(),
    }
}

fn build_public_key_info(spki: &SubjectPublicKeyInfo) -> PublicKeyInfo {
    let oid_str = spki.algorithm.algorithm.to_id_string();

    match oid_str.as_str() {
        oid::RSA_ENCRYPTION | oid::RSASSA_PSS => {
            let mut info = PublicKeyInfo::bare(KeyAlgorithm::Rsa);
            if let Some((bits, exponent)) = extract_rsa_params(&spki.subject_public_key.data) {
                info.key_size = Some(bits);
                info.rsa_modulus_bits = Some(bits);
                info.rsa_exponent = exponent;
            }
            info
        }
        oid::DSA => {
            let mut info = PublicKeyInfo::bare(KeyAlgorithm::Dsa);
            if let Some((p_bits, q_bits)) = extract_dsa_params(&spki.algorithm) {
                info.key_size = Some(p_bits);
                info.dsa_p_bits = Some(p_bits);
                info.dsa_q_bits = Some(q_bits);
            }
            info
        }
        oid::EC_PUBLIC_KEY => {
            let mut info = PublicKeyInfo::bare(KeyAlgorithm::Ec);
            let curve = extract_ec_curve(&spki.algorithm);
            info.key_size = match curve.as_str() {
                "P-224" => Some(224),
                "P-256" | "secp256k1" => Some(256),
                "P-384" => Some(384),
                "P-521" => Some(521),
                _ => None,
            };
            info.curve = Some(curve);
            info
        }
        oid::ED25519 => PublicKeyInfo {
            key_size: Some(256),
            ..PublicKeyInfo::bare(KeyAlgorithm::Ed25519)
        },
        oid::ED448 => PublicKeyInfo {
            key_size: Some(448),
            ..PublicKeyInfo::bare(KeyAlgorithm::Ed448)
        },
        _ => PublicKeyInfo::bare(KeyAlgorithm::Other(oid_str)),
    }
}

/// Extract the exact modulus bit length and the exponent from an
/// RSAPublicKey structure.
fn extract_rsa_params(data: &[u8]) -> Option<(u32, Option<u64>)> {
    let (_, parsed) = x509_parser::der_parser::parse_der(data).ok()?;
    let seq = parsed.as_sequence().ok()?;
    let modulus = seq.first().and_then(|m| m.as_slice().ok())?;
    let exponent = seq.get(1).and_then(|e| e.as_u64().ok());
    Some((util::integer_bit_len(modulus), exponent))
}

/// Extract the bit lengths of P and Q from Dss-Parms in the SPKI algorithm
/// parameters. Inherited parameters (absent) yield `None`.
fn extract_dsa_params(algo: &AlgorithmIdentifier) -> Option<(u32, u32)> {
    use x509_parser::der_parser::asn1_rs::ToDer;

    let params_der = algo.parameters.as_ref()?.to_der_vec().ok()?;
    let (_, parsed) = x509_parser::der_parser::parse_der(&params_der).ok()?;
    let seq = parsed.as_sequence().ok()?;
    let p = seq.first().and_then(|p| p.as_slice().ok())?;
    let q = seq.get(1).and_then(|q| q.as_slice().ok())?;
    Some((util::integer_bit_len(p), util::integer_bit_len(q)))
}

fn extract_ec_curve(algo: &AlgorithmIdentifier) -> String {
    if let Some(params) = &algo.parameters {
        if let Ok(oid) = params.as_oid() {
            return match oid.to_id_string().as_str() {
                oid::CURVE_P224 => "P-224".into(),
                oid::CURVE_P256 => "P-256".into(),
                oid::CURVE_P384 => "P-384".into(),
                oid::CURVE_P521 => "P-521".into(),
                oid::CURVE_SECP256K1 => "secp256k1".into(),
                other => other.to_string(),
            };
        }
    }
    "unknown".into()
}

fn build_extension(ext: &X509Extension) -> Extension {
    let oid = ext.oid.to_id_string();
    let name = extension_oid_to_name(&oid);

    let value = match ext.parsed_extension() {
        ParsedExtension::BasicConstraints(bc) => ExtensionValue::BasicConstraints(BasicConstraints {
            ca: bc.ca,
            path_len: bc.path_len_constraint,
        }),
        ParsedExtension::KeyUsage(ku) => ExtensionValue::KeyUsage(KeyUsage {
            digital_signature: ku.digital_signature(),
            content_commitment: ku.non_repudiation(),
            key_encipherment: ku.key_encipherment(),
            data_encipherment: ku.data_encipherment(),
            key_agreement: ku.key_agreement(),
            key_cert_sign: ku.key_cert_sign(),
            crl_sign: ku.crl_sign(),
            encipher_only: ku.encipher_only(),
            decipher_only: ku.decipher_only(),
        }),
        ParsedExtension::ExtendedKeyUsage(eku) => {
            let mut purposes = Vec::new();
            let flags = [
                (eku.any, oid::EKU_ANY),
                (eku.server_auth, oid::EKU_SERVER_AUTH),
                (eku.client_auth, oid::EKU_CLIENT_AUTH),
                (eku.code_signing, oid::EKU_CODE_SIGNING),
                (eku.email_protection, oid::EKU_EMAIL_PROTECTION),
                (eku.time_stamping, oid::EKU_TIME_STAMPING),
                (eku.ocsp_signing, oid::EKU_OCSP_SIGNING),
            ];
            for (set, purpose) in flags {
                if set {
                    purposes.push(purpose.to_string());
                }
            }
            purposes.extend(eku.other.iter().map(|o| o.to_id_string()));
            ExtensionValue::ExtendedKeyUsage(purposes)
        }
        ParsedExtension::SubjectKeyIdentifier(ski) => {
            ExtensionValue::SubjectKeyIdentifier(util::hex_colon_upper(ski.0))
        }
        ParsedExtension::AuthorityKeyIdentifier(aki) => {
            let key_id = aki
                .key_identifier
                .as_ref()
                .map(|ki| util::hex_colon_upper(ki.0));
            let issuer = aki.authority_cert_issuer.as_ref().map(|names| {
                names
                    .iter()
                    .map(format_general_name)
                    .collect::<Vec<_>>()
                    .join(", ")
            });
            ExtensionValue::AuthorityKeyIdentifier { key_id, issuer }
        }
        ParsedExtension::AuthorityInfoAccess(aia) => {
            let entries = aia
                .accessdescs
                .iter()
                .map(|desc| AiaEntry {
                    method: desc.access_method.to_id_string(),
                    location: format_general_name(&desc.access_location),
                })
                .collect();
            ExtensionValue::AuthorityInfoAccess(entries)
        }
        ParsedExtension::CRLDistributionPoints(cdp) => {
            let mut uris = Vec::new();
            for point in &cdp.points {
                if let Some(x509_parser::extensions::DistributionPointName::FullName(names)) =
                    &point.distribution_point
                {
                    for gn in names {
                        if let GeneralName::URI(uri) = gn {
                            uris.push(uri.to_string());
                        }
                    }
                }
            }
            ExtensionValue::CrlDistributionPoints(uris)
        }
        ParsedExtension::CertificatePolicies(policies) => ExtensionValue::CertificatePolicies(
            policies
                .iter()
                .map(|p| p.policy_id.to_id_string())
                .collect(),
        ),
        ParsedExtension::ParseError { error } => ExtensionValue::Malformed(format!("{:?}", error)),
        _ => ExtensionValue::Raw(hex::encode(ext.value)),
    };

    Extension {
        oid,
        name,
        critical: ext.critical,
        value,
        raw: ext.value.to_vec(),
    }
}

fn extension_oid_to_name(oid_str: &str) -> String {
    match oid_str {
        oid::EXT_SUBJECT_KEY_ID => "Subject Key Identifier".into(),
        oid::EXT_KEY_USAGE => "Key Usage".into(),
        oid::EXT_SUBJECT_ALT_NAME => "Subject Alternative Name".into(),
        oid::EXT_BASIC_CONSTRAINTS => "Basic Constraints".into(),
        oid::EXT_NAME_CONSTRAINTS => "Name Constraints".into(),
        oid::EXT_CRL_DISTRIBUTION_POINTS => "CRL Distribution Points".into(),
        oid::EXT_CERTIFICATE_POLICIES => "Certificate Policies".into(),
        oid::EXT_POLICY_MAPPINGS => "Policy Mappings".into(),
        oid::EXT_AUTHORITY_KEY_ID => "Authority Key Identifier".into(),
        oid::EXT_POLICY_CONSTRAINTS => "Policy Constraints".into(),
        oid::EXT_EXTENDED_KEY_USAGE => "Extended Key Usage".into(),
        oid::EXT_INHIBIT_ANY_POLICY => "Inhibit Any-Policy".into(),
        oid::EXT_AUTHORITY_INFO_ACCESS => "Authority Information Access".into(),
        other => other.to_string(),
    }
}

fn format_general_name(gn: &GeneralName) -> String {
    match gn {
        GeneralName::DNSName(name) => name.to_string(),
        GeneralName::RFC822Name(email) => email.to_string(),
        GeneralName::URI(uri) => uri.to_string(),
        GeneralName::DirectoryName(dn) => build_dn(dn).to_oneline(),
        other => format!("{:?}", other),
    }
}
