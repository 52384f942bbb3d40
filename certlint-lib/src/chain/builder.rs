//! Path building from a leaf to a trust anchor by depth-first search.

use ::time::OffsetDateTime;
use x509_parser::prelude::*;

use super::{ChainError, ChainLink, ChainVerifier, TrustStore};
use crate::fields::{Certificate, DateTime};
use crate::parser::{build_dn, pem_blocks};
use crate::CertlintError;

/// Maximum chain depth to prevent infinite loops during chain building.
const MAX_CHAIN_DEPTH: usize = 32;

/// Verifies paths against a trust store, drawing intermediates from an
/// untrusted pool.
#[derive(Debug, Default)]
pub struct TrustStoreVerifier {
    trust_store: TrustStore,
    intermediates: Vec<Vec<u8>>,
}

impl TrustStoreVerifier {
    pub fn new(trust_store: TrustStore) -> Self {
        TrustStoreVerifier {
            trust_store,
            intermediates: Vec::new(),
        }
    }

    /// Add every certificate of a PEM bundle to the untrusted pool.
    pub fn add_untrusted_pem(&mut self, pem_data: &[u8]) -> Result<usize, CertlintError> {
        let blocks = pem_blocks(pem_data)?;
        let added = blocks.len();
        self.intermediates.extend(blocks);
        Ok(added)
    }

    pub fn trust_store(&self) -> &TrustStore {
        &self.trust_store
    }
}

impl ChainVerifier for TrustStoreVerifier {
    fn verify(&self, cert: &Certificate, at: OffsetDateTime) -> Result<Vec<ChainLink>, ChainError> {
        if cert.raw_der.is_empty() {
            return Err(ChainError::NoPath("certificate has no DER encoding".into()));
        }

        let pool: Vec<(&[u8], X509Certificate)> = self
            .intermediates
            .iter()
            .filter_map(|der| {
                X509Certificate::from_der(der)
                    .ok()
                    .map(|(_, x509)| (der.as_slice(), x509))
            })
            .collect();

        let chain = build_chain_dfs(&cert.raw_der, &pool, &self.trust_store).ok_or_else(|| {
            ChainError::NoPath(format!("no trusted issuer found for {}", cert.issuer))
        })?;

        let instant = at.unix_timestamp();
        let mut links = Vec::with_capacity(chain.len());
        for der in &chain {
            let (_, x509) = X509Certificate::from_der(der)
                .map_err(|e| ChainError::NoPath(format!("unparseable chain member: {e}")))?;
            let validity = x509.validity();
            let subject = build_dn(x509.subject());
            if instant < validity.not_before.timestamp() || instant > validity.not_after.timestamp() {
                return Err(ChainError::Expired(format!(
                    "{} is not valid at {}",
                    subject,
                    DateTime::from_instant(at)
                )));
            }
            links.push(ChainLink {
                subject,
                issuer: build_dn(x509.issuer()),
                not_before: DateTime::from_timestamp(validity.not_before.timestamp()),
                not_after: DateTime::from_timestamp(validity.not_after.timestamp()),
            });
        }
        Ok(links)
    }
}

/// Find a path from `leaf_der` to a trust anchor, leaf first and anchor last.
///
/// Backtracks over the intermediate pool so cross-signed and duplicate
/// intermediates are all tried.
fn build_chain_dfs(
    leaf_der: &[u8],
    intermediates: &[(&[u8], X509Certificate)],
    trust_store: &TrustStore,
) -> Option<Vec<Vec<u8>>> {
    let (_, leaf) = X509Certificate::from_der(leaf_der).ok()?;
    let mut chain = vec![leaf_der.to_vec()];
    let mut used = vec![false; intermediates.len()];
    dfs_build(&leaf, &mut chain, &mut used, intermediates, trust_store).then_some(chain)
}

/// Extend `chain` from `current`. On success `chain` ends at a trust anchor.
#[allow(clippy::indexing_slicing)] // used[idx] safe: idx from intermediates.iter().enumerate(), same len
fn dfs_build(
    current: &X509Certificate,
    chain: &mut Vec<Vec<u8>>,
    used: &mut [bool],
    intermediates: &[(&[u8], X509Certificate)],
    trust_store: &TrustStore,
) -> bool {
    let issuer_raw = current.issuer().as_raw();

    // A trusted self-signed certificate terminates the path.
    if current.subject().as_raw() == issuer_raw && current.verify_signature(None).is_ok() {
        if let Some(last) = chain.last() {
            if trust_store.contains(last) {
                return true;
            }
        }
    }

    for root_der in trust_store.find_by_subject_raw(issuer_raw) {
        if let Ok((_, root)) = X509Certificate::from_der(root_der) {
            if current.verify_signature(Some(root.public_key())).is_ok() {
                if chain.last() != Some(root_der) {
                    chain.push(root_der.clone());
                }
                return true;
            }
        }
    }

    if chain.len() >= MAX_CHAIN_DEPTH {
        return false;
    }

    for (idx, (der, cert)) in intermediates.iter().enumerate() {
        if used[idx] || cert.subject().as_raw() != issuer_raw {
            continue;
        }
        if current.verify_signature(Some(cert.public_key())).is_err() {
            continue;
        }

        used[idx] = true;
        chain.push(der.to_vec());

        if dfs_build(cert, chain, used, intermediates, trust_store) {
            return true;
        }

        chain.pop();
        used[idx] = false;
    }

    false
}
