use std::sync::Arc;

use time::Duration;
use tracing::debug;

use crate::chain::ChainVerifier;
use crate::classify;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintContext, LintDefinition, LintSource};
use crate::regime::{issuer_name_regimes, IssuerNameRegime};
use crate::status::LintResult;

/// Before the name encoding change the issuer only has to be non-empty.
/// Afterwards each issuer name must match, byte for byte, the subject of the
/// certificate above it in a verified path.
struct IssuerFieldEmpty {
    verifier: Arc<dyn ChainVerifier>,
}

impl IssuerFieldEmpty {
    fn check_chain(&self, cert: &Certificate) -> LintResult {
        // Verify as of the day after issuance.
        let at = cert.issued_at() + Duration::days(1);
        let links = match self.verifier.verify(cert, at) {
            Ok(links) => links,
            Err(e) => {
                debug!(serial = %cert.serial, error = %e, "issuer chain unavailable");
                return LintResult::warn(format!("could not verify issuer chain: {e}"));
            }
        };

        let mut expected = &cert.issuer;
        for link in links.iter().skip(1) {
            if link.subject != *expected {
                return LintResult::error(format!(
                    "issuer '{expected}' does not match issuing certificate subject '{}'",
                    link.subject
                ));
            }
            expected = &link.issuer;
        }
        LintResult::pass()
    }
}

impl Lint for IssuerFieldEmpty {
    fn check_applies(&self, cert: &Certificate) -> bool {
        classify::is_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        if cert.issuer.is_empty() {
            return LintResult::error("issuer name is empty");
        }
        match issuer_name_regimes().resolve(cert.issued_at()) {
            Some(IssuerNameRegime::ChainMatched) => self.check_chain(cert),
            Some(IssuerNameRegime::NonEmpty) | None => LintResult::pass(),
        }
    }
}

pub(super) fn definition(ctx: &LintContext) -> LintDefinition {
    LintDefinition {
        name: "e_issuer_field_empty",
        description: "Certificate issuer field MUST NOT be empty and must have a non-empty distinguished name",
        citation: "RFC 5280: 4.1.2.4",
        source: LintSource::Rfc5280,
        effective_date: dates::RFC5280,
        lint: Box::new(IssuerFieldEmpty {
            verifier: Arc::clone(&ctx.chain_verifier),
        }),
    }
}
