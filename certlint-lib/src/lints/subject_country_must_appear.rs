use crate::classify;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct SubjectCountryMustAppear;

impl Lint for SubjectCountryMustAppear {
    fn check_applies(&self, cert: &Certificate) -> bool {
        classify::is_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if cert.subject.contains(oid::COUNTRY) {
            LintResult::pass()
        } else {
            LintResult::error("subject has no countryName")
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_subscriber_certificate_country_name_must_appear",
        description: "Subscriber Certificate: subject:countryName MUST appear",
        citation: "MRfCSC: 9.2.4.f",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MRFCSC_EFFECTIVE,
        lint: Box::new(SubjectCountryMustAppear),
    }
}
