use crate::classify;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::status::LintResult;

/// Placeholder values indicating an omitted field.
const PLACEHOLDERS: &[&str] = &["-", ".", " "];

struct SubjectContainsNoninformationalValue;

impl Lint for SubjectContainsNoninformationalValue {
    fn check_applies(&self, cert: &Certificate) -> bool {
        classify::is_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        let placeholder = cert
            .subject
            .attributes
            .iter()
            .find(|attr| PLACEHOLDERS.contains(&attr.value.as_str()));
        match placeholder {
            Some(attr) => LintResult::error(format!(
                "{} holds the placeholder '{}'",
                attr.short_name, attr.value
            )),
            None => LintResult::pass(),
        }
    }
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_subject_contains_noninformational_value",
        description: "Subject name fields must not contain '.','-',' ' or any other indication that the field has been omitted",
        citation: "BRfCSC v2.0",
        source: LintSource::BaselineRequirements,
        effective_date: dates::BRFCSC_V20,
        lint: Box::new(SubjectContainsNoninformationalValue),
    }
}
