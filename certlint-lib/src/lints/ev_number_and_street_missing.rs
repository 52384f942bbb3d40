use super::ev_subscriber;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct EvNumberAndStreetMissing;

impl Lint for EvNumberAndStreetMissing {
    fn check_applies(&self, cert: &Certificate) -> bool {
        ev_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if cert.subject.contains(oid::STREET_ADDRESS) {
            LintResult::pass()
        } else {
            LintResult::error("EV subject has no streetAddress")
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_ev_Number_And_Street_Missing",
        description: "The certificate MUST contain the address of the physical location of the Subject's Place of Business.",
        citation: "BRfCSCV20: 9.2.5.e",
        source: LintSource::BaselineRequirements,
        effective_date: dates::BRFCSC_V20,
        lint: Box::new(EvNumberAndStreetMissing),
    }
}
