use super::subscriber_with;
use crate::classify;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::oid;
use crate::status::LintResult;

struct AuthorityKeyIdentifierCritical;

impl Lint for AuthorityKeyIdentifierCritical {
    fn check_applies(&self, cert: &Certificate) -> bool {
        subscriber_with(cert, oid::EXT_AUTHORITY_KEY_ID)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if classify::is_extension_critical(cert, oid::EXT_AUTHORITY_KEY_ID) {
            LintResult::error("authorityKeyIdentifier is marked critical")
        } else {
            LintResult::pass()
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_ext_authority_key_identifier_critical",
        description: "The authority key identifier extension must be non-critical",
        citation: "MRfCSC: 7.1.2",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::MRFCSC_EFFECTIVE,
        lint: Box::new(AuthorityKeyIdentifierCritical),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use crate::testutil::CertBuilder;

    #[test]
    fn criticality() {
        let cert = CertBuilder::subscriber().build();
        assert_eq!(definition().evaluate(&cert).status, Status::Pass);
        let cert = CertBuilder::subscriber()
            .critical(oid::EXT_AUTHORITY_KEY_ID, true)
            .build();
        assert_eq!(definition().evaluate(&cert).status, Status::Error);
    }
}
