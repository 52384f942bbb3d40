#![no_main]

use certlint_lib::{
    compute_fingerprint, parse_base64, parse_cert, parse_pem_bundle, DigestAlgorithm,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The decoders must never panic, regardless of input.
    if let Ok(cert) = parse_cert(data) {
        // Exercise the accessors the rules rely on.
        let _ = cert.issued_at();
        let _ = cert.key_usage();
        let _ = compute_fingerprint(&cert.raw_der, DigestAlgorithm::Sha256);
        let _ = cert.subject.to_string();
    }
    let _ = parse_pem_bundle(data);
    let _ = parse_base64(data);
});
