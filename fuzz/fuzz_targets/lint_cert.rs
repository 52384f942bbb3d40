#![no_main]

use std::sync::OnceLock;

use certlint_lib::{lint_certificate, parse_der, LintContext, Registry};
use libfuzzer_sys::fuzz_target;

fn registry() -> Option<&'static Registry> {
    static REGISTRY: OnceLock<Option<Registry>> = OnceLock::new();
    REGISTRY
        .get_or_init(|| Registry::builtin(&LintContext::default()).ok())
        .as_ref()
}

fuzz_target!(|data: &[u8]| {
    let Some(registry) = registry() else {
        return;
    };
    // Every rule must report exactly once for any certificate that decodes.
    if let Ok(cert) = parse_der(data) {
        let results = lint_certificate(&cert, registry);
        assert_eq!(results.len(), registry.len());
    }
});
