use super::signing_subscriber;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct SubCertCountryNameMissing;

impl Lint for SubCertCountryNameMissing {
    fn check_applies(&self, cert: &Certificate) -> bool {
        signing_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        match cert.subject.first(oid::COUNTRY) {
            Some(c) if !c.is_empty() => LintResult::pass(),
            Some(_) => LintResult::error("countryName is empty"),
            None => LintResult::error("subject has no countryName"),
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_sub_cert_country_name_missing",
        description: "The subject:countryName MUST contain the two-letter ISO 3166-1 country code",
        citation: "BRs: 7.1.4.2.3.f",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MRFCSC_EFFECTIVE,
        lint: Box::new(SubCertCountryNameMissing),
    }
}
