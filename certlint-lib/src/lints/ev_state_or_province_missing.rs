use super::ev_subscriber;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct EvStateOrProvinceMissing;

impl Lint for EvStateOrProvinceMissing {
    fn check_applies(&self, cert: &Certificate) -> bool {
        ev_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if cert.subject.contains(oid::STATE_OR_PROVINCE) || cert.subject.contains(oid::LOCALITY) {
            LintResult::pass()
        } else {
            LintResult::error("EV subject has neither stateOrProvinceName nor localityName")
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_ev_state_or_province_missing",
        description: "The certificate MUST contain the address of the physical location of the Subject's Place of Business.",
        citation: "BRfCSCV20: 9.2.5.e",
        source: LintSource::BaselineRequirements,
        effective_date: dates::BRFCSC_V20,
        lint: Box::new(EvStateOrProvinceMissing),
    }
}
