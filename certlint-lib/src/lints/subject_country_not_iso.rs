use std::collections::HashSet;

use crate::classify;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;
use crate::CertlintError;

/// ISO 3166-1 alpha-2 officially assigned codes.
const ISO_3166_ALPHA_2: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT",
    "AU", "AW", "AX", "AZ", "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI",
    "BJ", "BL", "BM", "BN", "BO", "BQ", "BR", "BS", "BT", "BV", "BW", "BY",
    "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK", "CL", "CM", "CN",
    "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM",
    "DO", "DZ", "EC", "EE", "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK",
    "FM", "FO", "FR", "GA", "GB", "GD", "GE", "GF", "GG", "GH", "GI", "GL",
    "GM", "GN", "GP", "GQ", "GR", "GS", "GT", "GU", "GW", "GY", "HK", "HM",
    "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN", "IO", "IQ", "IR",
    "IS", "IT", "JE", "JM", "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN",
    "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC", "LI", "LK", "LR", "LS",
    "LT", "LU", "LV", "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK",
    "ML", "MM", "MN", "MO", "MP", "MQ", "MR", "MS", "MT", "MU", "MV", "MW",
    "MX", "MY", "MZ", "NA", "NC", "NE", "NF", "NG", "NI", "NL", "NO", "NP",
    "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG", "PH", "PK", "PL", "PM",
    "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW",
    "SA", "SB", "SC", "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM",
    "SN", "SO", "SR", "SS", "ST", "SV", "SX", "SY", "SZ", "TC", "TD", "TF",
    "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO", "TR", "TT", "TV", "TW",
    "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

#[derive(Default)]
struct SubjectCountryNotIso {
    codes: HashSet<&'static str>,
}

impl Lint for SubjectCountryNotIso {
    fn initialize(&mut self) -> Result<(), CertlintError> {
        self.codes = ISO_3166_ALPHA_2.iter().copied().collect();
        Ok(())
    }

    fn check_applies(&self, cert: &Certificate) -> bool {
        classify::is_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        match cert
            .subject
            .values(oid::COUNTRY)
            .find(|c| !self.codes.contains(c.to_ascii_uppercase().as_str()))
        {
            Some(bad) => LintResult::error(format!("'{bad}' is not an ISO 3166-1 country code")),
            None => LintResult::pass(),
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_subject_country_not_iso",
        description: "The subject:countryName MUST contain the two-letter ISO 3166-1 country code",
        citation: "MRfCSC: 9.2.4.f",
        source: LintSource::BaselineRequirements,
        effective_date: dates::MRFCSC_EFFECTIVE,
        lint: Box::new(SubjectCountryNotIso::default()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::status::Status;
    use crate::testutil::CertBuilder;

    fn initialized() -> LintDefinition {
        let mut def = definition();
        def.lint.initialize().unwrap();
        def
    }

    fn with_country(country: &str) -> Status {
        let cert = CertBuilder::subscriber()
            .without_subject_attr(oid::COUNTRY)
            .add_subject_attr(oid::COUNTRY, country)
            .build();
        initialized().evaluate(&cert).status
    }

    #[test]
    fn table_has_every_assigned_code() {
        assert_eq!(ISO_3166_ALPHA_2.len(), 249);
        assert_eq!(initialized().evaluate(&CertBuilder::subscriber().build()).status, Status::Pass);
    }

    #[test]
    fn lowercase_is_accepted() {
        assert_eq!(with_country("de"), Status::Pass);
    }

    #[test]
    fn unassigned_codes_fail() {
        assert_eq!(with_country("UK"), Status::Error);
        assert_eq!(with_country("USA"), Status::Error);
        assert_eq!(with_country(""), Status::Error);
    }

    #[test]
    fn no_country_passes() {
        let cert = CertBuilder::subscriber().without_subject_attr(oid::COUNTRY).build();
        assert_eq!(initialized().evaluate(&cert).status, Status::Pass);
    }
}
