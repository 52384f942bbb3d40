use crate::classify;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::status::LintResult;

struct CertExtensionsVersionNot3;

impl Lint for CertExtensionsVersionNot3 {
    fn check_applies(&self, cert: &Certificate) -> bool {
        classify::is_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if cert.version == 3 {
            LintResult::pass()
        } else {
            LintResult::error(format!("certificate is version {}", cert.version))
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_cert_extensions_version_not_3",
        description: "Certificates MUST be of type X.509 v3.",
        citation: "MRfCSC: 7.1.1",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::RFC2459,
        lint: Box::new(CertExtensionsVersionNot3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use crate::testutil::CertBuilder;

    #[test]
    fn versions() {
        for (version, expected) in [(1, Status::Error), (2, Status::Error), (3, Status::Pass)] {
            let cert = CertBuilder::subscriber().version(version).build();
            assert_eq!(definition().evaluate(&cert).status, expected);
        }
    }
}
