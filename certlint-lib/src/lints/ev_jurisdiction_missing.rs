use super::ev_subscriber;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct EvJurisdictionMissing;

impl Lint for EvJurisdictionMissing {
    fn check_applies(&self, cert: &Certificate) -> bool {
        ev_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        let subject = &cert.subject;
        let locality = subject.contains(oid::JURISDICTION_LOCALITY);
        let state = subject.contains(oid::JURISDICTION_STATE_OR_PROVINCE);
        let country = subject.contains(oid::JURISDICTION_COUNTRY);

        // Country is always required; a locality needs its state.
        match (country, state, locality) {
            (true, true, _) | (true, false, false) => LintResult::pass(),
            (false, _, _) => LintResult::error("jurisdictionCountryName is missing"),
            (true, false, true) => LintResult::error(
                "jurisdictionLocalityName requires jurisdictionStateOrProvinceName",
            ),
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_ev_jurisdiction_missing",
        description: "The certificate MUST contain the Jurisdiction the certificate was issued in",
        citation: "BRfCSCV20: 9.2.5.c",
        source: LintSource::BaselineRequirements,
        effective_date: dates::BRFCSC_V20,
        lint: Box::new(EvJurisdictionMissing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use crate::testutil::CertBuilder;

    fn jurisdiction(country: bool, state: bool, locality: bool) -> Status {
        let mut builder = CertBuilder::ev_subscriber()
            .without_subject_attr(oid::JURISDICTION_COUNTRY)
            .without_subject_attr(oid::JURISDICTION_STATE_OR_PROVINCE);
        if locality {
            builder = builder.add_subject_attr(oid::JURISDICTION_LOCALITY, "Wilmington");
        }
        if state {
            builder = builder.add_subject_attr(oid::JURISDICTION_STATE_OR_PROVINCE, "Delaware");
        }
        if country {
            builder = builder.add_subject_attr(oid::JURISDICTION_COUNTRY, "US");
        }
        definition().evaluate(&builder.build()).status
    }

    #[test]
    fn accepted_combinations() {
        assert_eq!(jurisdiction(true, true, true), Status::Pass);
        assert_eq!(jurisdiction(true, true, false), Status::Pass);
        assert_eq!(jurisdiction(true, false, false), Status::Pass);
    }

    #[test]
    fn rejected_combinations() {
        assert_eq!(jurisdiction(true, false, true), Status::Error);
        assert_eq!(jurisdiction(false, true, true), Status::Error);
        assert_eq!(jurisdiction(false, false, false), Status::Error);
    }
}
