use super::ev_subscriber;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

const CATEGORIES: &[&str] = &[
    "Private Organization",
    "Government Entity",
    "Business Entity",
    "Non-Commercial Entity",
];

struct EvBusinessCategoryStringMissing;

impl Lint for EvBusinessCategoryStringMissing {
    fn check_applies(&self, cert: &Certificate) -> bool {
        ev_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        // When repeated, the last businessCategory is the one that counts.
        match cert.subject.values(oid::BUSINESS_CATEGORY).last() {
            Some(category) if CATEGORIES.contains(&category) => LintResult::pass(),
            Some(category) => {
                LintResult::error(format!("'{category}' is not a recognized business category"))
            }
            None => LintResult::error("EV subject has no businessCategory"),
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_ev_business_category_string_missing",
        description: "EV certificates must include one of the following strings: 'Private Organization', 'Government Entity', 'Business Entity',or 'Non-Commercial Entity'",
        citation: "BRfCSCV20: 9.2.5.b",
        source: LintSource::BaselineRequirements,
        effective_date: dates::BRFCSC_V20,
        lint: Box::new(EvBusinessCategoryStringMissing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use crate::testutil::CertBuilder;

    fn with_categories(values: &[&str]) -> Status {
        let mut builder = CertBuilder::ev_subscriber().without_subject_attr(oid::BUSINESS_CATEGORY);
        for value in values {
            builder = builder.add_subject_attr(oid::BUSINESS_CATEGORY, value);
        }
        definition().evaluate(&builder.build()).status
    }

    #[test]
    fn recognized_categories_pass() {
        for category in CATEGORIES {
            assert_eq!(with_categories(&[*category]), Status::Pass);
        }
    }

    #[test]
    fn case_matters() {
        assert_eq!(with_categories(&["private organization"]), Status::Error);
    }

    #[test]
    fn last_value_decides() {
        assert_eq!(with_categories(&["Bogus", "Government Entity"]), Status::Pass);
        assert_eq!(with_categories(&["Government Entity", "Bogus"]), Status::Error);
    }

    #[test]
    fn missing_is_an_error() {
        assert_eq!(with_categories(&[]), Status::Error);
    }
}
