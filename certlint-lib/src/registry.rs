//! The lint catalog: built once, read-only afterwards.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::lint::{LintContext, LintDefinition, LintSource};
use crate::CertlintError;

/// Collects definitions, then validates and initializes them in [`build`](Self::build).
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    definitions: Vec<LintDefinition>,
    skip_failed_init: bool,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, definition: LintDefinition) -> &mut Self {
        self.definitions.push(definition);
        self
    }

    /// Exclude rules whose `initialize` fails instead of aborting the build.
    /// Excluded rules are reported by [`Registry::excluded`].
    pub fn skip_failed_init(mut self, skip: bool) -> Self {
        self.skip_failed_init = skip;
        self
    }

    /// Validate name uniqueness, initialize every rule, and freeze the catalog.
    pub fn build(self) -> Result<Registry, CertlintError> {
        let mut seen = BTreeSet::new();
        for def in &self.definitions {
            if !seen.insert(def.name) {
                return Err(CertlintError::DuplicateLint(def.name.to_string()));
            }
        }

        let mut lints = BTreeMap::new();
        let mut excluded = Vec::new();
        for mut def in self.definitions {
            if let Err(e) = def.lint.initialize() {
                if !self.skip_failed_init {
                    return Err(CertlintError::LintInit {
                        name: def.name.to_string(),
                        reason: e.to_string(),
                    });
                }
                warn!(lint = def.name, error = %e, "excluding lint after failed initialization");
                excluded.push((def.name, e.to_string()));
                continue;
            }
            lints.insert(def.name, def);
        }

        debug!(lints = lints.len(), excluded = excluded.len(), "built lint registry");
        Ok(Registry { lints, excluded })
    }
}

/// Mapping from lint name to definition, iterated in name order.
#[derive(Debug, Default)]
pub struct Registry {
    lints: BTreeMap<&'static str, LintDefinition>,
    excluded: Vec<(&'static str, String)>,
}

impl Registry {
    /// Every built-in rule, initialized strictly.
    pub fn builtin(ctx: &LintContext) -> Result<Registry, CertlintError> {
        let mut builder = RegistryBuilder::new();
        crate::lints::register_all(&mut builder, ctx);
        builder.build()
    }

    pub fn get(&self, name: &str) -> Option<&LintDefinition> {
        self.lints.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lints.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.lints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lints.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.lints.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LintDefinition> + '_ {
        self.lints.values()
    }

    /// Rules left out of the catalog because `initialize` failed, with the reason.
    pub fn excluded(&self) -> &[(&'static str, String)] {
        &self.excluded
    }

    /// A new registry holding only the definitions the filter selects.
    ///
    /// Names in the filter must all exist in this registry.
    pub fn filtered(self, filter: &LintFilter) -> Result<Registry, CertlintError> {
        for name in filter.include_names.iter().chain(&filter.exclude_names) {
            if !self.lints.contains_key(name.as_str()) {
                return Err(CertlintError::UnknownLint(name.clone()));
            }
        }

        let lints: BTreeMap<_, _> = self
            .lints
            .into_iter()
            .filter(|(_, def)| filter.selects(def))
            .collect();
        debug!(lints = lints.len(), "filtered lint registry");
        Ok(Registry {
            lints,
            excluded: self.excluded,
        })
    }
}

/// Selection of rules by name and by source.
///
/// Empty include lists select everything; exclusions always win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintFilter {
    pub include_names: Vec<String>,
    pub exclude_names: Vec<String>,
    pub include_sources: Vec<LintSource>,
    pub exclude_sources: Vec<LintSource>,
}

impl LintFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn selects(&self, def: &LintDefinition) -> bool {
        if self.exclude_names.iter().any(|n| n == def.name)
            || self.exclude_sources.contains(&def.source)
        {
            return false;
        }
        let name_ok =
            self.include_names.is_empty() || self.include_names.iter().any(|n| n == def.name);
        let source_ok =
            self.include_sources.is_empty() || self.include_sources.contains(&def.source);
        name_ok && source_ok
    }
}
