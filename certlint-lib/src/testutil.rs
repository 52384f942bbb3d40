//! Builder for synthetic certificates used by unit tests.

use time::macros::datetime;
use time::OffsetDateTime;

use crate::fields::{
    AiaEntry, BasicConstraints, Certificate, DateTime, DistinguishedName, Extension,
    ExtensionValue, KeyAlgorithm, KeyUsage, NameAttribute, PublicKeyInfo,
};
use crate::oid;
use crate::util;

pub(crate) const SUBSCRIBER_SUBJECT: &[(&str, &str)] = &[
    (oid::COUNTRY, "US"),
    (oid::STATE_OR_PROVINCE, "California"),
    (oid::LOCALITY, "San Francisco"),
    (oid::ORGANIZATION, "Example Software Inc"),
    (oid::COMMON_NAME, "Example Software Inc"),
];

const ISSUER: &[(&str, &str)] = &[
    (oid::COUNTRY, "US"),
    (oid::ORGANIZATION, "Certlint Test"),
    (oid::COMMON_NAME, "Certlint Test Root"),
];

pub(crate) fn dn(attrs: &[(&str, &str)]) -> DistinguishedName {
    DistinguishedName {
        attributes: attrs
            .iter()
            .map(|(attr_oid, value)| NameAttribute {
                oid: (*attr_oid).to_string(),
                short_name: util::oid_short_name(attr_oid),
                value: (*value).to_string(),
            })
            .collect(),
        raw: Vec::new(),
    }
}

fn ext(ext_oid: &str, critical: bool, value: ExtensionValue) -> Extension {
    Extension {
        oid: ext_oid.to_string(),
        name: ext_oid.to_string(),
        critical,
        value,
        raw: Vec::new(),
    }
}

fn basic_constraints_der(ca: bool) -> Vec<u8> {
    if ca {
        vec![0x30, 0x03, 0x01, 0x01, 0xFF]
    } else {
        vec![0x30, 0x00]
    }
}

pub(crate) struct CertBuilder {
    cert: Certificate,
}

impl CertBuilder {
    /// An RSA-3072 code-signing subscriber certificate issued 2022-01-01
    /// that passes every built-in rule.
    pub(crate) fn subscriber() -> Self {
        let cert = Certificate {
            version: 3,
            serial: "01".into(),
            signature_algorithm: "sha256WithRSAEncryption".into(),
            signature_algorithm_oid: oid::SHA256_WITH_RSA.into(),
            pss_hash_oid: None,
            issuer: dn(ISSUER),
            subject: dn(SUBSCRIBER_SUBJECT),
            not_before: DateTime::from_instant(datetime!(2022-01-01 0:00 UTC)),
            not_after: DateTime::from_instant(datetime!(2023-01-01 0:00 UTC)),
            public_key: PublicKeyInfo {
                key_size: Some(3072),
                rsa_modulus_bits: Some(3072),
                rsa_exponent: Some(65537),
                ..PublicKeyInfo::bare(KeyAlgorithm::Rsa)
            },
            extensions: Vec::new(),
            self_signature_valid: false,
            raw_der: Vec::new(),
        };
        CertBuilder { cert }
            .basic_constraints(false)
            .key_usage(KeyUsage {
                digital_signature: true,
                ..KeyUsage::default()
            })
            .eku(&[oid::EKU_CODE_SIGNING])
            .policies(&[oid::POLICY_BR_CODE_SIGNING])
            .aia(&[
                (oid::ACCESS_CA_ISSUERS, "http://ca.example.test/root.crt"),
                (oid::ACCESS_OCSP, "http://ocsp.example.test"),
            ])
            .crl_uris(&["http://crl.example.test/root.crl"])
            .aki_key_id(Some("AB:CD"))
    }

    /// An EV code-signing subscriber carrying every EV subject attribute.
    pub(crate) fn ev_subscriber() -> Self {
        CertBuilder::subscriber()
            .policies(&[oid::POLICY_CABF_EV_CODE_SIGNING])
            .add_subject_attr(oid::BUSINESS_CATEGORY, "Private Organization")
            .add_subject_attr(oid::SERIAL_NUMBER, "5157550")
            .add_subject_attr(oid::STREET_ADDRESS, "1 Example Way")
            .add_subject_attr(oid::JURISDICTION_STATE_OR_PROVINCE, "Delaware")
            .add_subject_attr(oid::JURISDICTION_COUNTRY, "US")
    }

    /// A self-signed root CA certificate issued 2016-01-01.
    pub(crate) fn root() -> Self {
        let mut builder = CertBuilder::subscriber()
            .without_extension(oid::EXT_EXTENDED_KEY_USAGE)
            .without_extension(oid::EXT_CERTIFICATE_POLICIES)
            .without_extension(oid::EXT_AUTHORITY_INFO_ACCESS)
            .without_extension(oid::EXT_CRL_DISTRIBUTION_POINTS)
            .basic_constraints(true)
            .key_usage(KeyUsage {
                key_cert_sign: true,
                crl_sign: true,
                ..KeyUsage::default()
            })
            .self_signature_valid(true)
            .not_before(datetime!(2016-01-01 0:00 UTC))
            .not_after(datetime!(2041-01-01 0:00 UTC));
        builder.cert.subject = dn(ISSUER);
        builder.cert.issuer = dn(ISSUER);
        builder
    }

    pub(crate) fn build(self) -> Certificate {
        self.cert
    }

    pub(crate) fn not_before(mut self, at: OffsetDateTime) -> Self {
        self.cert.not_before = DateTime::from_instant(at);
        self
    }

    pub(crate) fn not_after(mut self, at: OffsetDateTime) -> Self {
        self.cert.not_after = DateTime::from_instant(at);
        self
    }

    /// Move the validity window so it starts at `at` and lasts one year.
    pub(crate) fn issued(self, at: OffsetDateTime) -> Self {
        self.not_before(at).not_after(at + time::Duration::days(365))
    }

    pub(crate) fn version(mut self, version: u32) -> Self {
        self.cert.version = version;
        self
    }

    /// Sign with RSASSA-PSS over the given digest.
    pub(crate) fn pss(mut self, hash_oid: Option<&str>) -> Self {
        self.cert.signature_algorithm = "rsassaPss".into();
        self.cert.signature_algorithm_oid = oid::RSASSA_PSS.into();
        self.cert.pss_hash_oid = hash_oid.map(Into::into);
        self
    }

    pub(crate) fn signature_algorithm(mut self, algorithm_oid: &str) -> Self {
        self.cert.signature_algorithm = algorithm_oid.into();
        self.cert.signature_algorithm_oid = algorithm_oid.into();
        self
    }

    pub(crate) fn self_signature_valid(mut self, valid: bool) -> Self {
        self.cert.self_signature_valid = valid;
        self
    }

    pub(crate) fn rsa(mut self, bits: u32) -> Self {
        self.cert.public_key = PublicKeyInfo {
            key_size: Some(bits),
            rsa_modulus_bits: Some(bits),
            rsa_exponent: Some(65537),
            ..PublicKeyInfo::bare(KeyAlgorithm::Rsa)
        };
        self
    }

    pub(crate) fn dsa(mut self, p_bits: u32, q_bits: u32) -> Self {
        self.cert.public_key = PublicKeyInfo {
            key_size: Some(p_bits),
            dsa_p_bits: Some(p_bits),
            dsa_q_bits: Some(q_bits),
            ..PublicKeyInfo::bare(KeyAlgorithm::Dsa)
        };
        self
    }

    pub(crate) fn ec(mut self, curve: &str) -> Self {
        self.cert.public_key = PublicKeyInfo {
            curve: Some(curve.into()),
            ..PublicKeyInfo::bare(KeyAlgorithm::Ec)
        };
        self
    }

    pub(crate) fn subject(mut self, attrs: &[(&str, &str)]) -> Self {
        self.cert.subject = dn(attrs);
        self
    }

    pub(crate) fn add_subject_attr(mut self, attr_oid: &str, value: &str) -> Self {
        self.cert.subject.attributes.push(NameAttribute {
            oid: attr_oid.into(),
            short_name: util::oid_short_name(attr_oid),
            value: value.into(),
        });
        self
    }

    pub(crate) fn without_subject_attr(mut self, attr_oid: &str) -> Self {
        self.cert.subject.attributes.retain(|a| a.oid != attr_oid);
        self
    }

    pub(crate) fn issuer(mut self, attrs: &[(&str, &str)]) -> Self {
        self.cert.issuer = dn(attrs);
        self
    }

    /// Add or replace an extension, keyed by OID.
    pub(crate) fn extension(mut self, extension: Extension) -> Self {
        match self
            .cert
            .extensions
            .iter_mut()
            .find(|e| e.oid == extension.oid)
        {
            Some(existing) => *existing = extension,
            None => self.cert.extensions.push(extension),
        }
        self
    }

    /// Add or replace an extension carrying only raw DER.
    pub(crate) fn raw_extension(self, ext_oid: &str, critical: bool, raw: &[u8]) -> Self {
        self.extension(Extension {
            raw: raw.to_vec(),
            ..ext(ext_oid, critical, ExtensionValue::Raw(hex::encode(raw)))
        })
    }

    /// Replace the value of an existing extension with a decoding failure.
    pub(crate) fn malformed(mut self, ext_oid: &str) -> Self {
        for e in self.cert.extensions.iter_mut().filter(|e| e.oid == ext_oid) {
            e.value = ExtensionValue::Malformed("unexpected end of input".into());
        }
        self
    }

    pub(crate) fn without_extension(mut self, ext_oid: &str) -> Self {
        self.cert.extensions.retain(|e| e.oid != ext_oid);
        self
    }

    pub(crate) fn critical(mut self, ext_oid: &str, critical: bool) -> Self {
        for e in self.cert.extensions.iter_mut().filter(|e| e.oid == ext_oid) {
            e.critical = critical;
        }
        self
    }

    pub(crate) fn basic_constraints(self, ca: bool) -> Self {
        self.extension(Extension {
            raw: basic_constraints_der(ca),
            ..ext(
                oid::EXT_BASIC_CONSTRAINTS,
                true,
                ExtensionValue::BasicConstraints(BasicConstraints { ca, path_len: None }),
            )
        })
    }

    pub(crate) fn key_usage(self, ku: KeyUsage) -> Self {
        self.extension(ext(oid::EXT_KEY_USAGE, true, ExtensionValue::KeyUsage(ku)))
    }

    pub(crate) fn eku(self, purposes: &[&str]) -> Self {
        self.extension(ext(
            oid::EXT_EXTENDED_KEY_USAGE,
            false,
            ExtensionValue::ExtendedKeyUsage(purposes.iter().map(|p| (*p).to_string()).collect()),
        ))
    }

    pub(crate) fn policies(self, policies: &[&str]) -> Self {
        self.extension(ext(
            oid::EXT_CERTIFICATE_POLICIES,
            false,
            ExtensionValue::CertificatePolicies(policies.iter().map(|p| (*p).to_string()).collect()),
        ))
    }

    pub(crate) fn aia(self, entries: &[(&str, &str)]) -> Self {
        self.extension(ext(
            oid::EXT_AUTHORITY_INFO_ACCESS,
            false,
            ExtensionValue::AuthorityInfoAccess(
                entries
                    .iter()
                    .map(|(method, location)| AiaEntry {
                        method: (*method).to_string(),
                        location: (*location).to_string(),
                    })
                    .collect(),
            ),
        ))
    }

    pub(crate) fn crl_uris(self, uris: &[&str]) -> Self {
        self.extension(ext(
            oid::EXT_CRL_DISTRIBUTION_POINTS,
            false,
            ExtensionValue::CrlDistributionPoints(uris.iter().map(|u| (*u).to_string()).collect()),
        ))
    }

    pub(crate) fn aki_key_id(self, key_id: Option<&str>) -> Self {
        self.extension(ext(
            oid::EXT_AUTHORITY_KEY_ID,
            false,
            ExtensionValue::AuthorityKeyIdentifier {
                key_id: key_id.map(str::to_string),
                issuer: None,
            },
        ))
    }
}
