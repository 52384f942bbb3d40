//! certlint-lib: effective-dated compliance linting for X.509 certificates.
//!
//! Certificates are decoded into a [`Certificate`] model, then evaluated
//! against a [`Registry`] of independent rules. Every rule reports exactly one
//! [`LintResult`] per certificate. Rules whose effective date postdates the
//! certificate's issuance report `NE`, and rules whose preconditions do not
//! hold report `NA`, so neither is confused with a failure.
//!
//! ```no_run
//! use certlint_lib::{parse_cert, LintContext, Linter, LinterConfig, Registry};
//!
//! # fn main() -> Result<(), certlint_lib::CertlintError> {
//! let cert = parse_cert(&std::fs::read("cert.pem")?)?;
//! let registry = Registry::builtin(&LintContext::default())?;
//! let linter = Linter::new(registry, &LinterConfig::default())?;
//! let results = linter.lint(&cert);
//! println!("{}", serde_json::to_string_pretty(&results)?);
//! # Ok(())
//! # }
//! ```

pub mod chain;
pub mod classify;
pub mod dates;
mod engine;
mod export;
mod fields;
mod fingerprint;
mod lint;
pub mod lints;
pub mod oid;
mod parser;
pub mod regime;
mod registry;
mod status;
mod util;

#[cfg(test)]
pub(crate) mod testutil;

pub use chain::{
    ChainError, ChainLink, ChainVerifier, NoChainVerifier, TimeoutVerifier, TrustStore,
    TrustStoreVerifier,
};
pub use engine::{lint_certificate, Linter, LinterConfig, ResultSet};
pub use export::{lint_descriptions, lint_schema, write_lint_descriptions, LintDescription};
pub use fields::{
    AiaEntry, BasicConstraints, Certificate, DateTime, DigestAlgorithm, DistinguishedName,
    Extension, ExtensionValue, KeyAlgorithm, KeyUsage, NameAttribute, PublicKeyInfo,
};
pub use fingerprint::compute_fingerprint;
pub use lint::{Lint, LintContext, LintDefinition, LintSource};
pub use parser::{parse_base64, parse_cert, parse_der, parse_pem, parse_pem_bundle, InputFormat};
pub use registry::{LintFilter, Registry, RegistryBuilder};
pub use status::{LintResult, Status};

/// Errors returned by certlint-lib.
#[derive(Debug, thiserror::Error)]
pub enum CertlintError {
    #[error("Failed to parse certificate: {0}")]
    ParseError(String),

    #[error("Invalid PEM format: {0}")]
    PemError(String),

    #[error("Invalid DER format: {0}")]
    DerError(String),

    #[error("Invalid base64 input: {0}")]
    Base64Error(String),

    #[error("Duplicate lint name: {0}")]
    DuplicateLint(String),

    #[error("Lint {name} failed to initialize: {reason}")]
    LintInit { name: String, reason: String },

    #[error("Unknown lint: {0}")]
    UnknownLint(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Verification error: {0}")]
    VerifyError(String),
}
