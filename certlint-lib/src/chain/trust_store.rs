//! Trust anchors for chain verification.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;
use x509_parser::prelude::*;

use crate::parser::pem_blocks;
use crate::CertlintError;

/// Well-known CA bundle file paths, in order of preference.
const KNOWN_CA_BUNDLE_PATHS: &[&str] = &[
    "/etc/ssl/certs/ca-certificates.crt", // Debian/Ubuntu
    "/etc/pki/tls/certs/ca-bundle.crt",   // RHEL/CentOS/Fedora
    "/etc/ssl/ca-bundle.pem",             // openSUSE
    "/etc/ssl/cert.pem",                  // macOS, Alpine
];

const KNOWN_CA_DIR_PATHS: &[&str] = &["/etc/ssl/certs"];

/// `.pem`, `.crt`, `.cer`, or an OpenSSL hash link (`XXXXXXXX.N`).
fn is_pem_cert_file(path: &Path) -> bool {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(e) => e,
        None => return false,
    };
    matches!(ext, "pem" | "crt" | "cer")
        || (ext.len() == 1 && ext.bytes().next().is_some_and(|b| b.is_ascii_digit()))
}

/// DER certificates indexed by raw subject name.
#[derive(Default)]
pub struct TrustStore {
    certs_by_subject: HashMap<Vec<u8>, Vec<Vec<u8>>>,
    count: usize,
}

impl std::fmt::Debug for TrustStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustStore")
            .field("count", &self.count)
            .finish()
    }
}

impl TrustStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the system trust store from the locations OpenSSL searches:
    /// `SSL_CERT_FILE`, the bundle OpenSSL was built with, well-known bundles,
    /// then `SSL_CERT_DIR`, OpenSSL's directory and well-known directories.
    pub fn system() -> Result<Self, CertlintError> {
        let mut store = TrustStore::new();

        if let Some(bundle_path) = find_system_ca_bundle() {
            if let Ok(data) = std::fs::read(&bundle_path) {
                let added = store.add_pem_bundle(&data)?;
                if added > 0 {
                    debug!(path = %bundle_path.display(), certs = added, "loaded system CA bundle");
                    return Ok(store);
                }
            }
        }

        let openssl_dirs = openssl_probe::probe();
        let dir_candidates = std::env::var("SSL_CERT_DIR")
            .ok()
            .into_iter()
            .chain(
                openssl_dirs
                    .cert_dir
                    .iter()
                    .map(|p| p.to_string_lossy().into_owned()),
            )
            .chain(KNOWN_CA_DIR_PATHS.iter().map(|s| (*s).to_string()));

        for dir in dir_candidates {
            if let Ok(added) = store.add_pem_directory(Path::new(&dir)) {
                if added > 0 {
                    debug!(path = %dir, certs = added, "loaded system CA directory");
                    return Ok(store);
                }
            }
        }

        Err(CertlintError::VerifyError(
            "no system trust store found".into(),
        ))
    }

    /// Create a trust store from a PEM bundle.
    pub fn from_pem(pem_data: &[u8]) -> Result<Self, CertlintError> {
        let mut store = TrustStore::new();
        store.add_pem_bundle(pem_data)?;
        Ok(store)
    }

    pub fn add_der(&mut self, der: &[u8]) -> Result<(), CertlintError> {
        let (_, x509) = X509Certificate::from_der(der)
            .map_err(|e| CertlintError::DerError(format!("{}", e)))?;

        self.certs_by_subject
            .entry(x509.subject().as_raw().to_vec())
            .or_default()
            .push(der.to_vec());
        self.count += 1;
        Ok(())
    }

    /// Add every certificate of a PEM bundle, skipping entries that fail to
    /// parse. Returns the number added.
    pub fn add_pem_bundle(&mut self, pem_data: &[u8]) -> Result<usize, CertlintError> {
        let mut added = 0;
        for der in pem_blocks(pem_data)? {
            if self.add_der(&der).is_ok() {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Load every certificate file in a directory (like OpenSSL's `-CApath`).
    pub fn add_pem_directory(&mut self, dir: &Path) -> Result<usize, CertlintError> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            CertlintError::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", dir.display(), e),
            ))
        })?;
        let mut total = 0;
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() || !is_pem_cert_file(&path) {
                continue;
            }
            if let Ok(data) = std::fs::read(&path) {
                if let Ok(added) = self.add_pem_bundle(&data) {
                    total += added;
                }
            }
        }
        Ok(total)
    }

    /// Trusted certificates whose subject is exactly `subject_raw`.
    pub(crate) fn find_by_subject_raw(&self, subject_raw: &[u8]) -> &[Vec<u8>] {
        self.certs_by_subject
            .get(subject_raw)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether this exact DER certificate is trusted.
    pub fn contains(&self, der: &[u8]) -> bool {
        match X509Certificate::from_der(der) {
            Ok((_, x509)) => self
                .find_by_subject_raw(x509.subject().as_raw())
                .iter()
                .any(|c| c == der),
            Err(_) => false,
        }
    }
}

/// Find the system CA bundle path (same location OpenSSL uses).
pub fn find_system_ca_bundle() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("SSL_CERT_FILE") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Some(p);
        }
    }

    let openssl_paths = openssl_probe::probe();
    if let Some(file) = openssl_paths.cert_file {
        let path = PathBuf::from(&file);
        if path.exists() {
            return Some(path);
        }
    }

    KNOWN_CA_BUNDLE_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cert_file_extensions() {
        assert!(is_pem_cert_file(Path::new("root.pem")));
        assert!(is_pem_cert_file(Path::new("root.crt")));
        assert!(is_pem_cert_file(Path::new("a1b2c3d4.0")));
        assert!(!is_pem_cert_file(Path::new("root.key")));
        assert!(!is_pem_cert_file(Path::new("README")));
    }

    #[test]
    fn empty_store() {
        let store = TrustStore::new();
        assert!(store.is_empty());
        assert!(!store.contains(b"not a certificate"));
        assert!(store.find_by_subject_raw(b"x").is_empty());
    }

    #[test]
    fn bundle_without_certificates_is_an_error() {
        assert!(TrustStore::from_pem(b"hello").is_err());
    }
}
