//! The built-in rule catalog.
//!
//! Each rule lives in its own module and exposes a `definition` function
//! returning its [`LintDefinition`]. [`register_all`] is the only place that
//! knows the full list.

mod authority_key_identifier_critical;
mod authority_key_identifier_no_key_identifier;
mod cert_extensions_version_not_3;
mod dsa_improper_modulus;
mod dsa_shorter_than_2048_bits;
mod ec_improper_curves;
mod ev_business_category_missing;
mod ev_business_category_string_missing;
mod ev_jurisdiction_missing;
mod ev_number_and_street_missing;
mod ev_organization_name_missing;
mod ev_serial_number_missing;
mod ev_state_or_province_missing;
mod issuer_field_empty;
mod policy_map_any_policy;
mod root_ca_contains_cert_policy;
mod rsa_mod_less_than_2048_bits;
mod rsa_mod_less_than_3072_bits;
mod signature_algorithm_not_supported;
mod sub_cert_aia_does_not_contain_issuing_ca_url;
mod sub_cert_aia_marked_critical;
mod sub_cert_aia_missing;
mod sub_cert_certificate_policies_missing;
mod sub_cert_country_name_missing;
mod sub_cert_crl_distribution_points_marked_critical;
mod sub_cert_crl_distribution_points_no_url;
mod sub_cert_eku_code_signing_not_set;
mod sub_cert_eku_usage_legal;
mod sub_cert_is_ca;
mod sub_cert_key_usage_crl_sign_bit_set;
mod sub_cert_key_usage_missing;
mod sub_cert_key_usage_unnecessary_bit_set;
mod sub_cert_valid_time_longer_than_39_months;
mod subject_common_name_missing;
mod subject_contains_noninformational_value;
mod subject_country_must_appear;
mod subject_country_not_iso;
mod subject_domain_component_included;
mod subject_organization_name_missing;
mod subject_province_must_appear;

use crate::classify;
use crate::fields::{Certificate, ExtensionValue};
use crate::lint::{LintContext, LintDefinition};
use crate::registry::RegistryBuilder;
use crate::status::LintResult;

/// Register every built-in rule with `builder`.
pub fn register_all(builder: &mut RegistryBuilder, ctx: &LintContext) {
    let definitions: Vec<LintDefinition> = vec![
        // Key strength and algorithms
        rsa_mod_less_than_2048_bits::definition(),
        rsa_mod_less_than_3072_bits::definition(),
        dsa_shorter_than_2048_bits::definition(),
        dsa_improper_modulus::definition(),
        ec_improper_curves::definition(),
        signature_algorithm_not_supported::definition(),
        // Extensions
        sub_cert_aia_missing::definition(),
        sub_cert_aia_marked_critical::definition(),
        sub_cert_aia_does_not_contain_issuing_ca_url::definition(),
        sub_cert_crl_distribution_points_no_url::definition(),
        sub_cert_crl_distribution_points_marked_critical::definition(),
        sub_cert_certificate_policies_missing::definition(),
        sub_cert_eku_code_signing_not_set::definition(),
        sub_cert_eku_usage_legal::definition(),
        sub_cert_is_ca::definition(),
        sub_cert_key_usage_missing::definition(),
        sub_cert_key_usage_crl_sign_bit_set::definition(),
        sub_cert_key_usage_unnecessary_bit_set::definition(),
        authority_key_identifier_critical::definition(),
        authority_key_identifier_no_key_identifier::definition(),
        root_ca_contains_cert_policy::definition(),
        policy_map_any_policy::definition(),
        // Structure and validity
        cert_extensions_version_not_3::definition(),
        sub_cert_valid_time_longer_than_39_months::definition(),
        issuer_field_empty::definition(ctx),
        // Subject name
        subject_common_name_missing::definition(),
        subject_organization_name_missing::definition(),
        subject_country_must_appear::definition(),
        subject_province_must_appear::definition(),
        sub_cert_country_name_missing::definition(),
        subject_country_not_iso::definition(),
        subject_contains_noninformational_value::definition(),
        subject_domain_component_included::definition(),
        // Extended validation
        ev_organization_name_missing::definition(),
        ev_business_category_missing::definition(),
        ev_business_category_string_missing::definition(),
        ev_serial_number_missing::definition(),
        ev_number_and_street_missing::definition(),
        ev_state_or_province_missing::definition(),
        ev_jurisdiction_missing::definition(),
    ];
    for definition in definitions {
        builder.register(definition);
    }
}

/// A subscriber certificate carrying the extension `ext_oid`.
fn subscriber_with(cert: &Certificate, ext_oid: &str) -> bool {
    classify::is_subscriber(cert) && classify::has_extension(cert, ext_oid)
}

/// A subscriber certificate that has a key usage without `keyCertSign` and a
/// basic constraints extension.
fn signing_subscriber(cert: &Certificate) -> bool {
    classify::is_subscriber(cert)
        && cert.key_usage().is_some_and(|ku| !ku.key_cert_sign)
        && classify::has_extension(cert, crate::oid::EXT_BASIC_CONSTRAINTS)
}

/// `Fatal` when the extension is present but its value failed to decode.
fn malformed(cert: &Certificate, ext_oid: &str) -> Option<LintResult> {
    let ext = cert.extension(ext_oid)?;
    match &ext.value {
        ExtensionValue::Malformed(reason) => {
            Some(LintResult::fatal(format!("malformed {}: {reason}", ext.name)))
        }
        _ => None,
    }
}

/// A subscriber certificate asserting an EV policy.
fn ev_subscriber(cert: &Certificate) -> bool {
    classify::is_ev(cert) && classify::is_subscriber(cert)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::lint_certificate;
    use crate::registry::Registry;
    use crate::status::Status;
    use crate::testutil::CertBuilder;

    #[test]
    fn catalog_builds_without_duplicates() {
        let registry = Registry::builtin(&LintContext::default()).unwrap();
        assert_eq!(registry.len(), 40);
        assert!(registry.excluded().is_empty());
    }

    #[test]
    fn names_carry_a_severity_prefix() {
        let registry = Registry::builtin(&LintContext::default()).unwrap();
        for name in registry.names() {
            assert!(
                ["e_", "w_", "n_"].iter().any(|p| name.starts_with(p)),
                "{name}"
            );
        }
    }

    #[test]
    fn clean_subscriber_has_no_failures() {
        let registry = Registry::builtin(&LintContext::default()).unwrap();
        let results = lint_certificate(&CertBuilder::subscriber().build(), &registry);
        let failures: Vec<_> = results.at_least(Status::Error).names().map(str::to_owned).collect();
        assert!(failures.is_empty(), "{failures:?}");
    }

    #[test]
    fn clean_root_has_no_failures() {
        let registry = Registry::builtin(&LintContext::default()).unwrap();
        let root = CertBuilder::root()
            .not_before(time::macros::datetime!(2022-01-01 0:00 UTC))
            .build();
        let results = lint_certificate(&root, &registry);
        assert!(!results.has_failures(), "{:?}", results.at_least(Status::Error));
    }
}
