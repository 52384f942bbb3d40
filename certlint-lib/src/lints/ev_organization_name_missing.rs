use super::ev_subscriber;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct EvOrganizationNameMissing;

impl Lint for EvOrganizationNameMissing {
    fn check_applies(&self, cert: &Certificate) -> bool {
        ev_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if cert.subject.contains(oid::ORGANIZATION) {
            LintResult::pass()
        } else {
            LintResult::error("EV subject has no organizationName")
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_ev_organization_name_missing",
        description: "EV certificates must include organizationName in subject",
        citation: "BRfCSCV20: 9.2.5.a",
        source: LintSource::BaselineRequirements,
        effective_date: dates::BRFCSC_V20,
        lint: Box::new(EvOrganizationNameMissing),
    }
}
