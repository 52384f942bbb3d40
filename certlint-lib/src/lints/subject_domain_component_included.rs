use crate::classify;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::regime::{code_signing_regimes, CodeSigningRegime};
use crate::status::LintResult;

struct SubjectDomainComponentIncluded;

impl Lint for SubjectDomainComponentIncluded {
    fn check_applies(&self, cert: &Certificate) -> bool {
        classify::is_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if !cert.subject.contains(oid::DOMAIN_COMPONENT) {
            return LintResult::pass();
        }
        let ev_tolerated = CodeSigningRegime::Brfcsc20..CodeSigningRegime::Brfcsc22;
        match code_signing_regimes().resolve(cert.issued_at()) {
            Some(regime) if ev_tolerated.contains(regime) => {
                if classify::is_ev(cert) {
                    LintResult::pass()
                } else {
                    LintResult::error("domainComponent is only allowed in EV certificates")
                }
            }
            _ => LintResult::error("subject contains domainComponent"),
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_subject_domain_component_included",
        description: "This field must not be present in a Code Signing Certificate",
        citation: "MRfCSC: 9.2.3",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MRFCSC_EFFECTIVE,
        lint: Box::new(SubjectDomainComponentIncluded),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use crate::testutil::CertBuilder;
    use time::macros::datetime;
    use time::OffsetDateTime;

    fn status(at: OffsetDateTime, ev: bool) -> Status {
        let policy = if ev {
            oid::POLICY_CABF_EV_CODE_SIGNING
        } else {
            oid::POLICY_BR_CODE_SIGNING
        };
        let cert = CertBuilder::subscriber()
            .issued(at)
            .policies(&[policy])
            .add_subject_attr(oid::DOMAIN_COMPONENT, "example")
            .build();
        definition().evaluate(&cert).status
    }

    #[test]
    fn forbidden_before_version_2() {
        let at = datetime!(2020-09-01 23:59:59 UTC);
        assert_eq!(status(at, false), Status::Error);
        assert_eq!(status(at, true), Status::Error);
    }

    #[test]
    fn allowed_for_ev_from_version_2() {
        let at = datetime!(2020-09-02 0:00 UTC);
        assert_eq!(status(at, false), Status::Error);
        assert_eq!(status(at, true), Status::Pass);
    }

    #[test]
    fn forbidden_again_from_version_2_2() {
        assert_eq!(status(datetime!(2021-03-04 0:00 UTC), true), Status::Pass);
        assert_eq!(status(datetime!(2021-03-05 0:00 UTC), true), Status::Error);
    }

    #[test]
    fn absent_domain_component_passes() {
        let cert = CertBuilder::subscriber().build();
        assert_eq!(definition().evaluate(&cert).status, Status::Pass);
    }
}
