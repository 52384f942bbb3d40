use super::ev_subscriber;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct EvSerialNumberMissing;

impl Lint for EvSerialNumberMissing {
    fn check_applies(&self, cert: &Certificate) -> bool {
        ev_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if cert.subject.contains(oid::SERIAL_NUMBER) {
            LintResult::pass()
        } else {
            LintResult::error("EV subject has no serialNumber")
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_ev_serial_number_missing",
        description: "EV certificates must include serialNumber in subject",
        citation: "BRfCSCV20: 9.2.5.d",
        source: LintSource::BaselineRequirements,
        effective_date: dates::BRFCSC_V20,
        lint: Box::new(EvSerialNumberMissing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use crate::testutil::CertBuilder;
    use time::macros::datetime;

    #[test]
    fn registration_number_required() {
        let cert = CertBuilder::ev_subscriber()
            .without_subject_attr(oid::SERIAL_NUMBER)
            .build();
        assert_eq!(definition().evaluate(&cert).status, Status::Error);
    }

    #[test]
    fn not_effective_before_version_2() {
        let cert = CertBuilder::ev_subscriber()
            .without_subject_attr(oid::SERIAL_NUMBER)
            .issued(datetime!(2019-01-01 0:00 UTC))
            .build();
        assert_eq!(definition().evaluate(&cert).status, Status::NE);
    }
}
