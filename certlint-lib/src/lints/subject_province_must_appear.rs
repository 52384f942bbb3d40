use crate::classify;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct SubjectProvinceMustAppear;

impl Lint for SubjectProvinceMustAppear {
    fn check_applies(&self, cert: &Certificate) -> bool {
        classify::is_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if cert.subject.contains(oid::STATE_OR_PROVINCE) || cert.subject.contains(oid::LOCALITY) {
            LintResult::pass()
        } else {
            LintResult::error("subject has neither stateOrProvinceName nor localityName")
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_subscriber_certificate_province_must_appear",
        description: "Subscriber Certificate: subject:stateOrProvinceName MUST appear if the subject:localityName is absent",
        citation: "MRfCSC: 9.2.4.d",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MRFCSC_EFFECTIVE,
        lint: Box::new(SubjectProvinceMustAppear),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use crate::testutil::CertBuilder;

    fn without(attrs: &[&str]) -> Status {
        let mut builder = CertBuilder::subscriber();
        for attr in attrs {
            builder = builder.without_subject_attr(attr);
        }
        definition().evaluate(&builder.build()).status
    }

    #[test]
    fn either_state_or_locality_is_enough() {
        assert_eq!(without(&[]), Status::Pass);
        assert_eq!(without(&[oid::LOCALITY]), Status::Pass);
        assert_eq!(without(&[oid::STATE_OR_PROVINCE]), Status::Pass);
    }

    #[test]
    fn neither_is_an_error() {
        assert_eq!(without(&[oid::LOCALITY, oid::STATE_OR_PROVINCE]), Status::Error);
    }
}
