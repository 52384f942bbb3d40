use super::ev_subscriber;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct EvBusinessCategoryMissing;

impl Lint for EvBusinessCategoryMissing {
    fn check_applies(&self, cert: &Certificate) -> bool {
        ev_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if cert.subject.contains(oid::BUSINESS_CATEGORY) {
            LintResult::pass()
        } else {
            LintResult::error("EV subject has no businessCategory")
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_ev_business_category_missing",
        description: "EV certificates must include businessCategory in subject",
        citation: "BRfCSCV20: 9.2.5.b",
        source: LintSource::BaselineRequirements,
        effective_date: dates::BRFCSC_V20,
        lint: Box::new(EvBusinessCategoryMissing),
    }
}
