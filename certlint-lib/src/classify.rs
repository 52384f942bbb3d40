//! Certificate role predicates shared by the rules.
//!
//! Every predicate is total: a missing field or extension yields `false`,
//! `None` or an empty result, never a panic.

use crate::fields::{Certificate, DistinguishedName, Extension};
use crate::oid;

/// Subject and issuer names are identical.
pub fn is_self_issued(cert: &Certificate) -> bool {
    cert.subject == cert.issuer
}

/// Self-issued, and the signature verifies under the certificate's own key.
pub fn is_self_signed(cert: &Certificate) -> bool {
    is_self_issued(cert) && cert.self_signature_valid
}

/// The basic constraints extension asserts cA.
pub fn is_ca(cert: &Certificate) -> bool {
    cert.basic_constraints().is_some_and(|bc| bc.ca)
}

/// A self-signed CA certificate.
pub fn is_root_ca(cert: &Certificate) -> bool {
    is_self_signed(cert) && is_ca(cert)
}

/// An end-entity certificate.
///
/// A certificate that claims cA but whose key usage does not permit
/// certificate signing cannot act as a CA, so it is treated as a subscriber.
pub fn is_subscriber(cert: &Certificate) -> bool {
    if !is_ca(cert) {
        return true;
    }
    cert.key_usage().is_some_and(|ku| !ku.key_cert_sign)
}

/// The certificate declares at least one Extended Validation policy.
pub fn is_ev(cert: &Certificate) -> bool {
    cert.certificate_policies()
        .is_some_and(|policies| policies.iter().any(|p| oid::EV_POLICIES.contains(&p.as_str())))
}

pub fn get_extension<'a>(cert: &'a Certificate, ext_oid: &str) -> Option<&'a Extension> {
    cert.extension(ext_oid)
}

pub fn has_extension(cert: &Certificate, ext_oid: &str) -> bool {
    cert.extension(ext_oid).is_some()
}

/// False when the extension is absent.
pub fn is_extension_critical(cert: &Certificate, ext_oid: &str) -> bool {
    cert.extension(ext_oid).is_some_and(|e| e.critical)
}

pub fn name_has_attribute(name: &DistinguishedName, attr_oid: &str) -> bool {
    name.contains(attr_oid)
}

pub fn name_attribute_values<'a>(name: &'a DistinguishedName, attr_oid: &str) -> Vec<&'a str> {
    name.attributes
        .iter()
        .filter(|a| a.oid == attr_oid)
        .map(|a| a.value.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::KeyUsage;
    use crate::testutil::CertBuilder;

    #[test]
    fn plain_subscriber() {
        let cert = CertBuilder::subscriber().build();
        assert!(is_subscriber(&cert));
        assert!(!is_ca(&cert));
        assert!(!is_root_ca(&cert));
        assert!(!is_self_issued(&cert));
    }

    #[test]
    fn root_is_not_subscriber() {
        let cert = CertBuilder::root().build();
        assert!(is_root_ca(&cert));
        assert!(is_self_signed(&cert));
        assert!(!is_subscriber(&cert));
    }

    #[test]
    fn self_issued_without_valid_signature_is_not_root() {
        let cert = CertBuilder::root().self_signature_valid(false).build();
        assert!(is_self_issued(&cert));
        assert!(!is_self_signed(&cert));
        assert!(!is_root_ca(&cert));
    }

    #[test]
    fn ca_flag_without_cert_sign_is_subscriber() {
        let cert = CertBuilder::subscriber()
            .basic_constraints(true)
            .key_usage(KeyUsage {
                digital_signature: true,
                ..KeyUsage::default()
            })
            .build();
        assert!(is_ca(&cert));
        assert!(is_subscriber(&cert));
    }

    #[test]
    fn ca_flag_without_key_usage_is_not_subscriber() {
        let cert = CertBuilder::subscriber()
            .basic_constraints(true)
            .without_extension(oid::EXT_KEY_USAGE)
            .build();
        assert!(!is_subscriber(&cert));
    }

    #[test]
    fn ev_detection() {
        let ev = CertBuilder::subscriber()
            .policies(&[oid::POLICY_CABF_EV_CODE_SIGNING])
            .build();
        assert!(is_ev(&ev));
        let non_ev = CertBuilder::subscriber().build();
        assert!(!is_ev(&non_ev));
        let no_policies = CertBuilder::subscriber()
            .without_extension(oid::EXT_CERTIFICATE_POLICIES)
            .build();
        assert!(!is_ev(&no_policies));
    }

    #[test]
    fn extension_lookups_are_total() {
        let cert = CertBuilder::subscriber()
            .without_extension(oid::EXT_AUTHORITY_INFO_ACCESS)
            .build();
        assert!(!has_extension(&cert, oid::EXT_AUTHORITY_INFO_ACCESS));
        assert!(!is_extension_critical(&cert, oid::EXT_AUTHORITY_INFO_ACCESS));
        assert!(get_extension(&cert, oid::EXT_AUTHORITY_INFO_ACCESS).is_none());
        assert!(is_extension_critical(&cert, oid::EXT_KEY_USAGE));
    }

    #[test]
    fn name_attribute_helpers() {
        let cert = CertBuilder::subscriber().build();
        assert!(name_has_attribute(&cert.subject, oid::COUNTRY));
        assert_eq!(name_attribute_values(&cert.subject, oid::COUNTRY), vec!["US"]);
        assert!(name_attribute_values(&cert.subject, oid::DOMAIN_COMPONENT).is_empty());
    }
}
