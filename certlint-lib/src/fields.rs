//! Decoded certificate model consumed by the classifier and the rules.

use serde::Serialize;
use time::OffsetDateTime;

use crate::oid;

/// Digest algorithm for fingerprint computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Sha256,
    Sha384,
    Sha512,
    Sha1,
}

/// A decoded X.509 certificate.
///
/// Rules only ever see this model. Everything they need is extracted at
/// parse time, including the raw bytes of each extension so that rules can
/// re-parse a sub-structure and report a malformed encoding themselves.
#[derive(Debug, Clone, Serialize)]
pub struct Certificate {
    /// Certificate version (1, 2, or 3).
    pub version: u32,
    /// Serial number as a colon-separated hex string.
    pub serial: String,
    /// Signature algorithm name, or the dotted OID when unnamed.
    pub signature_algorithm: String,
    /// Signature algorithm OID.
    pub signature_algorithm_oid: String,
    /// Hash algorithm OID from RSASSA-PSS parameters, SHA-1 when they omit it.
    pub pss_hash_oid: Option<String>,
    pub issuer: DistinguishedName,
    pub subject: DistinguishedName,
    pub not_before: DateTime,
    pub not_after: DateTime,
    pub public_key: PublicKeyInfo,
    pub extensions: Vec<Extension>,

    /// Whether the signature verifies under the certificate's own key.
    #[serde(skip)]
    pub self_signature_valid: bool,

    /// Raw DER bytes of the entire certificate.
    #[serde(skip)]
    pub raw_der: Vec<u8>,
}

/// One attribute of a distinguished name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameAttribute {
    /// Attribute type OID in dotted-decimal form.
    pub oid: String,
    /// Short name where known (e.g. "CN", "O", "C"), otherwise the OID.
    pub short_name: String,
    pub value: String,
}

/// Distinguished name with ordered attributes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DistinguishedName {
    pub attributes: Vec<NameAttribute>,
    /// DER encoding of the Name, empty for synthesized values.
    #[serde(skip)]
    pub raw: Vec<u8>,
}

impl DistinguishedName {
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// All values of the given attribute type, in encoding order.
    pub fn values<'a>(&'a self, attr_oid: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.attributes
            .iter()
            .filter(move |a| a.oid == attr_oid)
            .map(|a| a.value.as_str())
    }

    /// The first value of the given attribute type.
    pub fn first<'a>(&'a self, attr_oid: &str) -> Option<&'a str> {
        self.attributes
            .iter()
            .find(|a| a.oid == attr_oid)
            .map(|a| a.value.as_str())
    }

    pub fn contains(&self, attr_oid: &str) -> bool {
        self.attributes.iter().any(|a| a.oid == attr_oid)
    }

    /// Format as a comma-separated one-line string matching OpenSSL's default format.
    /// Example: "C = US, O = Org, CN = example.com"
    pub fn to_oneline(&self) -> String {
        let mut result = String::new();
        for (i, attr) in self.attributes.iter().enumerate() {
            if i > 0 {
                result.push_str(", ");
            }
            result.push_str(&attr.short_name);
            result.push_str(" = ");
            for ch in attr.value.chars() {
                match ch {
                    '\\' => result.push_str("\\\\"),
                    ',' => result.push_str("\\,"),
                    '=' => result.push_str("\\="),
                    _ => result.push(ch),
                }
            }
        }
        result
    }
}

/// Names compare by their DER encoding when both sides have one, and by
/// attribute type and value otherwise.
impl PartialEq for DistinguishedName {
    fn eq(&self, other: &Self) -> bool {
        if !self.raw.is_empty() && !other.raw.is_empty() {
            return self.raw == other.raw;
        }
        self.attributes.len() == other.attributes.len()
            && self
                .attributes
                .iter()
                .zip(&other.attributes)
                .all(|(a, b)| a.oid == b.oid && a.value == b.value)
    }
}

impl Eq for DistinguishedName {}

impl std::fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_oneline())
    }
}

/// Public key algorithm family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum KeyAlgorithm {
    Rsa,
    Dsa,
    Ec,
    Ed25519,
    Ed448,
    /// Unrecognized algorithm, identified by OID.
    Other(String),
}

/// Public key information.
#[derive(Debug, Clone, Serialize)]
pub struct PublicKeyInfo {
    pub algorithm: KeyAlgorithm,
    /// Key size in bits: modulus length for RSA, P length for DSA, field size for EC.
    pub key_size: Option<u32>,
    /// Named curve for EC keys ("P-256", "P-384", ...), or the curve OID when unnamed.
    pub curve: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsa_modulus_bits: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsa_exponent: Option<u64>,
    /// Bit length of the DSA prime modulus P (the "L" parameter).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dsa_p_bits: Option<u32>,
    /// Bit length of the DSA subprime Q (the "N" parameter).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dsa_q_bits: Option<u32>,
}

impl PublicKeyInfo {
    /// A key with only its algorithm known.
    pub fn bare(algorithm: KeyAlgorithm) -> Self {
        PublicKeyInfo {
            algorithm,
            key_size: None,
            curve: None,
            rsa_modulus_bits: None,
            rsa_exponent: None,
            dsa_p_bits: None,
            dsa_q_bits: None,
        }
    }
}

/// A certificate extension.
#[derive(Debug, Clone, Serialize)]
pub struct Extension {
    /// OID as a dotted-decimal string.
    pub oid: String,
    /// Human-readable name (or OID string if unknown).
    pub name: String,
    pub critical: bool,
    pub value: ExtensionValue,
    /// DER contents of the extnValue OCTET STRING.
    #[serde(skip)]
    pub raw: Vec<u8>,
}

/// Strongly-typed extension values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum ExtensionValue {
    BasicConstraints(BasicConstraints),
    KeyUsage(KeyUsage),
    /// Key purpose OIDs in dotted-decimal form.
    ExtendedKeyUsage(Vec<String>),
    SubjectKeyIdentifier(String),
    AuthorityKeyIdentifier {
        key_id: Option<String>,
        issuer: Option<String>,
    },
    AuthorityInfoAccess(Vec<AiaEntry>),
    /// URIs from full-name distribution points.
    CrlDistributionPoints(Vec<String>),
    /// Policy OIDs in dotted-decimal form.
    CertificatePolicies(Vec<String>),
    /// A known extension whose value failed to decode.
    Malformed(String),
    /// Fallback for extensions we don't parse into a specific variant.
    Raw(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BasicConstraints {
    pub ca: bool,
    pub path_len: Option<u32>,
}

/// The nine key usage bits of RFC 5280 Section 4.2.1.3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KeyUsage {
    pub digital_signature: bool,
    /// Also known as nonRepudiation.
    pub content_commitment: bool,
    pub key_encipherment: bool,
    pub data_encipherment: bool,
    pub key_agreement: bool,
    pub key_cert_sign: bool,
    pub crl_sign: bool,
    pub encipher_only: bool,
    pub decipher_only: bool,
}

impl KeyUsage {
    /// True when no bit is asserted.
    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }

    /// Names of the asserted bits, in bit order.
    pub fn names(&self) -> Vec<&'static str> {
        [
            (self.digital_signature, "digitalSignature"),
            (self.content_commitment, "contentCommitment"),
            (self.key_encipherment, "keyEncipherment"),
            (self.data_encipherment, "dataEncipherment"),
            (self.key_agreement, "keyAgreement"),
            (self.key_cert_sign, "keyCertSign"),
            (self.crl_sign, "cRLSign"),
            (self.encipher_only, "encipherOnly"),
            (self.decipher_only, "decipherOnly"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect()
    }
}

/// Authority Information Access entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiaEntry {
    /// Access method OID.
    pub method: String,
    /// Access location (usually a URI).
    pub location: String,
}

impl AiaEntry {
    pub fn is_ca_issuers(&self) -> bool {
        self.method == oid::ACCESS_CA_ISSUERS
    }
}

/// Date-time representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateTime {
    /// ISO 8601 formatted string.
    pub iso8601: String,
    /// Unix timestamp.
    pub timestamp: i64,
}

impl DateTime {
    pub fn from_timestamp(timestamp: i64) -> Self {
        let iso8601 = match OffsetDateTime::from_unix_timestamp(timestamp) {
            Ok(dt) => format!(
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
                dt.year(),
                u8::from(dt.month()),
                dt.day(),
                dt.hour(),
                dt.minute(),
                dt.second()
            ),
            Err(_) => format!("{}", timestamp),
        };
        DateTime { iso8601, timestamp }
    }

    pub fn from_instant(instant: OffsetDateTime) -> Self {
        Self::from_timestamp(instant.unix_timestamp())
    }

    /// The instant as an `OffsetDateTime` in UTC.
    ///
    /// Timestamps outside the representable range clamp to the Unix epoch;
    /// x509-parser never produces one.
    pub fn instant(&self) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(self.timestamp).unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }
}

impl std::fmt::Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.iso8601)
    }
}

impl Certificate {
    /// The issuance instant used for effective-date gating.
    pub fn issued_at(&self) -> OffsetDateTime {
        self.not_before.instant()
    }

    /// Find an extension by OID.
    pub fn extension(&self, ext_oid: &str) -> Option<&Extension> {
        self.extensions.iter().find(|e| e.oid == ext_oid)
    }

    pub fn basic_constraints(&self) -> Option<&BasicConstraints> {
        self.extensions.iter().find_map(|ext| match &ext.value {
            ExtensionValue::BasicConstraints(bc) => Some(bc),
            _ => None,
        })
    }

    pub fn key_usage(&self) -> Option<&KeyUsage> {
        self.extensions.iter().find_map(|ext| match &ext.value {
            ExtensionValue::KeyUsage(ku) => Some(ku),
            _ => None,
        })
    }

    /// Extended key usage purpose OIDs, if the extension is present.
    pub fn extended_key_usage(&self) -> Option<&[String]> {
        self.extensions.iter().find_map(|ext| match &ext.value {
            ExtensionValue::ExtendedKeyUsage(oids) => Some(oids.as_slice()),
            _ => None,
        })
    }

    /// Certificate policy OIDs, if the extension is present.
    pub fn certificate_policies(&self) -> Option<&[String]> {
        self.extensions.iter().find_map(|ext| match &ext.value {
            ExtensionValue::CertificatePolicies(oids) => Some(oids.as_slice()),
            _ => None,
        })
    }

    /// Authority Information Access entries; empty if the extension is absent.
    pub fn aia_entries(&self) -> &[AiaEntry] {
        self.extensions
            .iter()
            .find_map(|ext| match &ext.value {
                ExtensionValue::AuthorityInfoAccess(entries) => Some(entries.as_slice()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// CRL distribution point URIs; empty if the extension is absent.
    pub fn crl_distribution_uris(&self) -> &[String] {
        self.extensions
            .iter()
            .find_map(|ext| match &ext.value {
                ExtensionValue::CrlDistributionPoints(uris) => Some(uris.as_slice()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// The keyIdentifier field of the authority key identifier extension.
    pub fn authority_key_id(&self) -> Option<&str> {
        self.extensions.iter().find_map(|ext| match &ext.value {
            ExtensionValue::AuthorityKeyIdentifier { key_id, .. } => key_id.as_deref(),
            _ => None,
        })
    }

    /// Compute the fingerprint of the certificate using the given digest algorithm.
    pub fn fingerprint(&self, algorithm: DigestAlgorithm) -> String {
        crate::fingerprint::compute_fingerprint(&self.raw_der, algorithm)
    }
}
