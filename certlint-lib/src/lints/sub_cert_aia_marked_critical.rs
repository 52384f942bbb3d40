use super::subscriber_with;
use crate::classify;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct SubCertAiaMarkedCritical;

impl Lint for SubCertAiaMarkedCritical {
    fn check_applies(&self, cert: &Certificate) -> bool {
        subscriber_with(cert, oid::EXT_AUTHORITY_INFO_ACCESS)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if classify::is_extension_critical(cert, oid::EXT_AUTHORITY_INFO_ACCESS) {
            LintResult::error("authorityInformationAccess is marked critical")
        } else {
            LintResult::pass()
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_sub_cert_aia_marked_critical",
        description: "Subscriber Certificate: authorityInformationAccess This extension MUST be present. It MUST NOT be marked critical.",
        citation: "BRs: 7.1.2.3.c",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MRFCSC_EFFECTIVE,
        lint: Box::new(SubCertAiaMarkedCritical),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use crate::testutil::CertBuilder;

    #[test]
    fn criticality() {
        let ok = CertBuilder::subscriber().build();
        assert_eq!(definition().evaluate(&ok).status, Status::Pass);
        let critical = CertBuilder::subscriber()
            .critical(oid::EXT_AUTHORITY_INFO_ACCESS, true)
            .build();
        assert_eq!(definition().evaluate(&critical).status, Status::Error);
    }

    #[test]
    fn absent_extension_does_not_apply() {
        let cert = CertBuilder::subscriber()
            .without_extension(oid::EXT_AUTHORITY_INFO_ACCESS)
            .build();
        assert_eq!(definition().evaluate(&cert).status, Status::NA);
    }
}
