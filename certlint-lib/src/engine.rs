//! Evaluation of a registry against certificates.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::fields::Certificate;
use crate::lint::LintDefinition;
use crate::registry::Registry;
use crate::status::{LintResult, Status};
use crate::CertlintError;

/// Engine settings.
#[derive(Debug, Clone, Default)]
pub struct LinterConfig {
    /// Worker threads. `None` uses the available parallelism.
    pub threads: Option<usize>,
}

/// A registry bound to a worker pool.
pub struct Linter {
    registry: Registry,
    pool: rayon::ThreadPool,
}

impl std::fmt::Debug for Linter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Linter")
            .field("lints", &self.registry.len())
            .field("threads", &self.pool.current_num_threads())
            .finish()
    }
}

impl Linter {
    pub fn new(registry: Registry, config: &LinterConfig) -> Result<Self, CertlintError> {
        let mut builder =
            rayon::ThreadPoolBuilder::new().thread_name(|i| format!("certlint-worker-{i}"));
        if let Some(threads) = config.threads {
            if threads == 0 {
                return Err(CertlintError::Config(
                    "thread count must be at least 1".into(),
                ));
            }
            builder = builder.num_threads(threads);
        }
        let pool = builder
            .build()
            .map_err(|e| CertlintError::Config(format!("failed to start worker pool: {e}")))?;
        Ok(Linter { registry, pool })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Evaluate every registered rule against one certificate.
    pub fn lint(&self, cert: &Certificate) -> ResultSet {
        self.pool.install(|| lint_certificate(cert, &self.registry))
    }

    /// Evaluate a batch of certificates. Results are in input order.
    pub fn lint_batch(&self, certs: &[Certificate]) -> Vec<ResultSet> {
        self.pool.install(|| {
            certs
                .par_iter()
                .map(|cert| lint_certificate(cert, &self.registry))
                .collect()
        })
    }
}

/// Evaluate every rule in `registry` against `cert` on the current rayon pool.
///
/// The returned set has exactly one entry per registered rule.
pub fn lint_certificate(cert: &Certificate, registry: &Registry) -> ResultSet {
    let definitions: Vec<&LintDefinition> = registry.iter().collect();
    let results: BTreeMap<String, LintResult> = definitions
        .par_iter()
        .map(|def| (def.name.to_string(), evaluate_guarded(def, cert)))
        .collect();
    ResultSet { results }
}

/// Evaluate one rule, turning a panic into a `Fatal` verdict.
fn evaluate_guarded(def: &LintDefinition, cert: &Certificate) -> LintResult {
    let result = match catch_unwind(AssertUnwindSafe(|| def.evaluate(cert))) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".into());
            warn!(lint = def.name, serial = %cert.serial, %message, "lint panicked");
            LintResult::fatal(format!("lint panicked: {message}"))
        }
    };
    trace!(lint = def.name, status = %result.status, "lint evaluated");
    result
}

/// Verdicts for one certificate, keyed by lint name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    results: BTreeMap<String, LintResult>,
}

impl ResultSet {
    pub fn get(&self, name: &str) -> Option<&LintResult> {
        self.results.get(name)
    }

    pub fn status(&self, name: &str) -> Option<Status> {
        self.results.get(name).map(|r| r.status)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LintResult)> + '_ {
        self.results.iter().map(|(name, result)| (name.as_str(), result))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.results.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of verdicts with the given status.
    pub fn count(&self, status: Status) -> usize {
        self.results.values().filter(|r| r.status == status).count()
    }

    /// The most severe evaluated verdict. `NA` and `NE` never count.
    pub fn worst(&self) -> Option<Status> {
        self.results
            .values()
            .map(|r| r.status)
            .filter(|s| s.is_evaluated())
            .max()
    }

    /// Any `Error` or `Fatal` verdict.
    pub fn has_failures(&self) -> bool {
        self.results.values().any(|r| r.status.is_failure())
    }

    /// Only the evaluated verdicts at or above `min` severity.
    pub fn at_least(&self, min: Status) -> ResultSet {
        let results = self
            .results
            .iter()
            .filter(|(_, r)| r.status.is_evaluated() && r.status >= min)
            .map(|(name, r)| (name.clone(), r.clone()))
            .collect();
        ResultSet { results }
    }
}
