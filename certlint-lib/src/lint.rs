//! The rule contract and catalog metadata.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::chain::{ChainVerifier, NoChainVerifier};
use crate::fields::Certificate;
use crate::status::{LintResult, Status};
use crate::CertlintError;

/// The logic of one compliance rule.
///
/// Rules are shared across worker threads and must not mutate state after
/// [`initialize`](Lint::initialize) returns.
pub trait Lint: Send + Sync {
    /// One-time setup, run when the registry is built. A failure is a
    /// configuration error.
    fn initialize(&mut self) -> Result<(), CertlintError> {
        Ok(())
    }

    /// Whether the rule's precondition holds for this certificate.
    fn check_applies(&self, cert: &Certificate) -> bool;

    /// Evaluate the rule. Only called when the rule is in force and applies.
    fn execute(&self, cert: &Certificate) -> LintResult;
}

/// The policy document a rule derives from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LintSource {
    #[serde(rename = "UnknownLintSource")]
    Unknown,
    #[serde(rename = "CABFBaselineRequirements")]
    BaselineRequirements,
    #[serde(rename = "MinimumRequirementsForCodeSigningCertificates")]
    MinimumRequirementsCodeSigning,
    #[serde(rename = "RFC5280")]
    Rfc5280,
    #[serde(rename = "RFC5891")]
    Rfc5891,
    #[serde(rename = "HouseRule")]
    HouseRule,
    #[serde(rename = "ThirdParty")]
    ThirdParty,
}

impl LintSource {
    pub const ALL: [LintSource; 7] = [
        LintSource::Unknown,
        LintSource::BaselineRequirements,
        LintSource::MinimumRequirementsCodeSigning,
        LintSource::Rfc5280,
        LintSource::Rfc5891,
        LintSource::HouseRule,
        LintSource::ThirdParty,
    ];

    /// The serialized name.
    pub fn as_str(self) -> &'static str {
        match self {
            LintSource::Unknown => "UnknownLintSource",
            LintSource::BaselineRequirements => "CABFBaselineRequirements",
            LintSource::MinimumRequirementsCodeSigning => {
                "MinimumRequirementsForCodeSigningCertificates"
            }
            LintSource::Rfc5280 => "RFC5280",
            LintSource::Rfc5891 => "RFC5891",
            LintSource::HouseRule => "HouseRule",
            LintSource::ThirdParty => "ThirdParty",
        }
    }
}

impl std::fmt::Display for LintSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the serialized name or a short alias, case-insensitively.
impl std::str::FromStr for LintSource {
    type Err = CertlintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let source = match lower.as_str() {
            "unknown" => LintSource::Unknown,
            "br" | "cabf_br" => LintSource::BaselineRequirements,
            "mrfcsc" | "cs" => LintSource::MinimumRequirementsCodeSigning,
            "rfc5280" => LintSource::Rfc5280,
            "rfc5891" => LintSource::Rfc5891,
            "house" => LintSource::HouseRule,
            "third_party" => LintSource::ThirdParty,
            _ => LintSource::ALL
                .into_iter()
                .find(|src| src.as_str().eq_ignore_ascii_case(s))
                .ok_or_else(|| CertlintError::Config(format!("unknown lint source '{s}'")))?,
        };
        Ok(source)
    }
}

/// A registered rule: immutable metadata plus its logic.
pub struct LintDefinition {
    /// Globally unique, stable identifier.
    pub name: &'static str,
    pub description: &'static str,
    pub citation: &'static str,
    pub source: LintSource,
    /// Certificates issued before this instant are reported `NE`.
    pub effective_date: OffsetDateTime,
    pub lint: Box<dyn Lint>,
}

impl LintDefinition {
    /// Run the rule with effective-date and applicability gating.
    pub fn evaluate(&self, cert: &Certificate) -> LintResult {
        if cert.issued_at() < self.effective_date {
            return LintResult::new(Status::NE);
        }
        if !self.lint.check_applies(cert) {
            return LintResult::new(Status::NA);
        }
        self.lint.execute(cert)
    }
}

impl std::fmt::Debug for LintDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LintDefinition")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("effective_date", &self.effective_date)
            .finish_non_exhaustive()
    }
}

/// Collaborators handed to rule constructors at registration time.
#[derive(Clone)]
pub struct LintContext {
    pub chain_verifier: Arc<dyn ChainVerifier>,
}

impl LintContext {
    pub fn with_chain_verifier(verifier: impl ChainVerifier + 'static) -> Self {
        LintContext {
            chain_verifier: Arc::new(verifier),
        }
    }
}

impl Default for LintContext {
    fn default() -> Self {
        Self::with_chain_verifier(NoChainVerifier)
    }
}

impl std::fmt::Debug for LintContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LintContext").finish_non_exhaustive()
    }
}
