//! OID string constants used by the parser, the classifier and the rules.
//!
//! Grouped by the document that defines them: RFC 5280 / X.520 for names and
//! extensions, RFC 3279 / RFC 5480 / RFC 8410 for algorithms, and the CA/B
//! Forum and vendor arcs for policy identifiers.

// ── X.509 Distinguished Name attributes (RFC 4519 / X.520) ──────────────

pub const COMMON_NAME: &str = "2.5.4.3";
pub const SURNAME: &str = "2.5.4.4";
pub const SERIAL_NUMBER: &str = "2.5.4.5";
pub const COUNTRY: &str = "2.5.4.6";
pub const LOCALITY: &str = "2.5.4.7";
pub const STATE_OR_PROVINCE: &str = "2.5.4.8";
pub const STREET_ADDRESS: &str = "2.5.4.9";
pub const ORGANIZATION: &str = "2.5.4.10";
pub const ORGANIZATIONAL_UNIT: &str = "2.5.4.11";
pub const TITLE: &str = "2.5.4.12";
pub const BUSINESS_CATEGORY: &str = "2.5.4.15";
pub const POSTAL_CODE: &str = "2.5.4.17";
pub const GIVEN_NAME: &str = "2.5.4.42";
pub const EMAIL_ADDRESS: &str = "1.2.840.113549.1.9.1"; // PKCS#9
pub const DOMAIN_COMPONENT: &str = "0.9.2342.19200300.100.1.25";

// ── EV jurisdiction attributes (Microsoft arc, EV Guidelines 9.2.4) ─────

pub const JURISDICTION_LOCALITY: &str = "1.3.6.1.4.1.311.60.2.1.1";
pub const JURISDICTION_STATE_OR_PROVINCE: &str = "1.3.6.1.4.1.311.60.2.1.2";
pub const JURISDICTION_COUNTRY: &str = "1.3.6.1.4.1.311.60.2.1.3";

// ── Signature algorithms ─────────────────────────────────────────────────

pub const MD5_WITH_RSA: &str = "1.2.840.113549.1.1.4";
pub const SHA1_WITH_RSA: &str = "1.2.840.113549.1.1.5";
pub const RSASSA_PSS: &str = "1.2.840.113549.1.1.10";
pub const SHA256_WITH_RSA: &str = "1.2.840.113549.1.1.11";
pub const SHA384_WITH_RSA: &str = "1.2.840.113549.1.1.12";
pub const SHA512_WITH_RSA: &str = "1.2.840.113549.1.1.13";
pub const DSA_WITH_SHA1: &str = "1.2.840.10040.4.3";
pub const DSA_WITH_SHA224: &str = "2.16.840.1.101.3.4.3.1";
pub const DSA_WITH_SHA256: &str = "2.16.840.1.101.3.4.3.2";
pub const ECDSA_WITH_SHA1: &str = "1.2.840.10045.4.1";
pub const ECDSA_WITH_SHA256: &str = "1.2.840.10045.4.3.2";
pub const ECDSA_WITH_SHA384: &str = "1.2.840.10045.4.3.3";
pub const ECDSA_WITH_SHA512: &str = "1.2.840.10045.4.3.4";
pub const ED25519: &str = "1.3.101.112";
pub const ED448: &str = "1.3.101.113";

// ── Hash algorithms (RSASSA-PSS parameters) ─────────────────────────────

pub const HASH_SHA1: &str = "1.3.14.3.2.26";
pub const HASH_SHA256: &str = "2.16.840.1.101.3.4.2.1";
pub const HASH_SHA384: &str = "2.16.840.1.101.3.4.2.2";
pub const HASH_SHA512: &str = "2.16.840.1.101.3.4.2.3";

// ── Public key types ─────────────────────────────────────────────────────

pub const RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.1";
pub const DSA: &str = "1.2.840.10040.4.1";
pub const EC_PUBLIC_KEY: &str = "1.2.840.10045.2.1";

// ── Named elliptic curves ────────────────────────────────────────────────

pub const CURVE_P224: &str = "1.3.132.0.33";
pub const CURVE_P256: &str = "1.2.840.10045.3.1.7";
pub const CURVE_P384: &str = "1.3.132.0.34";
pub const CURVE_P521: &str = "1.3.132.0.35";
pub const CURVE_SECP256K1: &str = "1.3.132.0.10";

// ── X.509v3 extensions (RFC 5280 Section 4.2) ───────────────────────────

pub const EXT_SUBJECT_KEY_ID: &str = "2.5.29.14";
pub const EXT_KEY_USAGE: &str = "2.5.29.15";
pub const EXT_SUBJECT_ALT_NAME: &str = "2.5.29.17";
pub const EXT_BASIC_CONSTRAINTS: &str = "2.5.29.19";
pub const EXT_NAME_CONSTRAINTS: &str = "2.5.29.30";
pub const EXT_CRL_DISTRIBUTION_POINTS: &str = "2.5.29.31";
pub const EXT_CERTIFICATE_POLICIES: &str = "2.5.29.32";
pub const EXT_POLICY_MAPPINGS: &str = "2.5.29.33";
pub const EXT_AUTHORITY_KEY_ID: &str = "2.5.29.35";
pub const EXT_POLICY_CONSTRAINTS: &str = "2.5.29.36";
pub const EXT_EXTENDED_KEY_USAGE: &str = "2.5.29.37";
pub const EXT_INHIBIT_ANY_POLICY: &str = "2.5.29.54";

// ── PKIX Authority Information Access (RFC 5280 Section 4.2.2) ──────────

pub const EXT_AUTHORITY_INFO_ACCESS: &str = "1.3.6.1.5.5.7.1.1";
pub const ACCESS_OCSP: &str = "1.3.6.1.5.5.7.48.1";
pub const ACCESS_CA_ISSUERS: &str = "1.3.6.1.5.5.7.48.2";

// ── Extended Key Usage values (RFC 5280 Section 4.2.1.12) ────────────────

pub const EKU_ANY: &str = "2.5.29.37.0";
pub const EKU_SERVER_AUTH: &str = "1.3.6.1.5.5.7.3.1";
pub const EKU_CLIENT_AUTH: &str = "1.3.6.1.5.5.7.3.2";
pub const EKU_CODE_SIGNING: &str = "1.3.6.1.5.5.7.3.3";
pub const EKU_EMAIL_PROTECTION: &str = "1.3.6.1.5.5.7.3.4";
pub const EKU_TIME_STAMPING: &str = "1.3.6.1.5.5.7.3.8";
pub const EKU_OCSP_SIGNING: &str = "1.3.6.1.5.5.7.3.9";
pub const EKU_MS_LIFETIME_SIGNING: &str = "1.3.6.1.4.1.311.10.3.13";
pub const EKU_MS_DOCUMENT_SIGNING: &str = "1.3.6.1.4.1.311.10.3.12";

// ── Certificate policies ────────────────────────────────────────────────

pub const ANY_POLICY: &str = "2.5.29.32.0";
pub const POLICY_BR_CODE_SIGNING: &str = "2.23.140.1.4.1";
pub const POLICY_CABF_EV_TLS: &str = "2.23.140.1.1";
pub const POLICY_CABF_EV_CODE_SIGNING: &str = "2.23.140.1.3";
pub const POLICY_SECTIGO_EV_CODE_SIGNING: &str = "1.3.6.1.4.1.6449.1.2.1.6.1";
pub const POLICY_VERISIGN_EV_CODE_SIGNING: &str = "2.16.840.1.113733.1.7.23.6";

/// Policy identifiers that mark a certificate as Extended Validation.
pub const EV_POLICIES: &[&str] = &[
    POLICY_CABF_EV_TLS,
    POLICY_CABF_EV_CODE_SIGNING,
    POLICY_SECTIGO_EV_CODE_SIGNING,
    POLICY_VERISIGN_EV_CODE_SIGNING,
];
