//! Chain verification used by rules that compare a certificate with its issuer.
//!
//! Rules never build chains themselves. They call a [`ChainVerifier`] handed
//! to them through [`LintContext`](crate::LintContext), and treat any
//! [`ChainError`] as "could not determine" rather than as a pass.

mod builder;
mod trust_store;

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use time::OffsetDateTime;
use tracing::warn;

use crate::fields::{Certificate, DateTime, DistinguishedName};

pub use builder::TrustStoreVerifier;
pub use trust_store::{find_system_ca_bundle, TrustStore};

/// One certificate of a verified path, leaf first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainLink {
    pub subject: DistinguishedName,
    pub issuer: DistinguishedName,
    pub not_before: DateTime,
    pub not_after: DateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("chain verification is not configured")]
    Unavailable,

    #[error("chain verification timed out after {0:?}")]
    Timeout(Duration),

    #[error("too many chain verifications still running ({0})")]
    Saturated(usize),

    #[error("no path to a trust anchor: {0}")]
    NoPath(String),

    #[error("certificate outside its validity period: {0}")]
    Expired(String),
}

/// Builds and verifies the path from a certificate to a trust anchor.
pub trait ChainVerifier: Send + Sync {
    /// Return the verified path, leaf first and trust anchor last, with every
    /// link valid at `at`.
    fn verify(&self, cert: &Certificate, at: OffsetDateTime) -> Result<Vec<ChainLink>, ChainError>;
}

impl<T: ChainVerifier + ?Sized> ChainVerifier for Arc<T> {
    fn verify(&self, cert: &Certificate, at: OffsetDateTime) -> Result<Vec<ChainLink>, ChainError> {
        (**self).verify(cert, at)
    }
}

/// A verifier for deployments without trust material.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoChainVerifier;

impl ChainVerifier for NoChainVerifier {
    fn verify(&self, _cert: &Certificate, _at: OffsetDateTime) -> Result<Vec<ChainLink>, ChainError> {
        Err(ChainError::Unavailable)
    }
}

/// Default cap on helper threads a [`TimeoutVerifier`] keeps alive.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 64;

/// Bounds another verifier's running time.
///
/// Verification runs on a helper thread. When the deadline passes the helper
/// is detached, not cancelled: it keeps running until the inner verifier
/// returns and its result is discarded. At most `max_in_flight` helpers may
/// be alive at once; further calls fail with [`ChainError::Saturated`]
/// until some of them finish.
#[derive(Debug)]
pub struct TimeoutVerifier<V> {
    inner: Arc<V>,
    timeout: Duration,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: usize,
}

impl<V> TimeoutVerifier<V> {
    pub fn new(inner: V, timeout: Duration) -> Self {
        TimeoutVerifier {
            inner: Arc::new(inner),
            timeout,
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    /// Cap the number of helper threads alive at once. Zero is treated as one.
    pub fn with_max_in_flight(mut self, max: usize) -> Self {
        self.max_in_flight = max.max(1);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Helper threads currently running, including detached ones.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    fn reserve(&self) -> Option<InFlightGuard> {
        let max = self.max_in_flight;
        self.in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| (n < max).then_some(n + 1))
            .ok()
            .map(|_| InFlightGuard(Arc::clone(&self.in_flight)))
    }
}

/// Releases one in-flight slot when the helper thread finishes.
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl<V: ChainVerifier + 'static> ChainVerifier for TimeoutVerifier<V> {
    fn verify(&self, cert: &Certificate, at: OffsetDateTime) -> Result<Vec<ChainLink>, ChainError> {
        let Some(guard) = self.reserve() else {
            warn!(max = self.max_in_flight, "chain verification refused, helpers still running");
            return Err(ChainError::Saturated(self.max_in_flight));
        };
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let cert = cert.clone();
        let spawned = std::thread::Builder::new()
            .name("certlint-chain".into())
            .spawn(move || {
                let _guard = guard;
                // The receiver is gone once the deadline has passed.
                let _ = tx.send(inner.verify(&cert, at));
            });
        if let Err(e) = spawned {
            warn!(error = %e, "could not start chain verification thread");
            return Err(ChainError::Unavailable);
        }

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                warn!(timeout = ?self.timeout, "chain verification timed out");
                Err(ChainError::Timeout(self.timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(ChainError::Unavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::testutil::CertBuilder;
    use time::macros::datetime;

    struct Slow(Duration);

    impl ChainVerifier for Slow {
        fn verify(&self, _cert: &Certificate, _at: OffsetDateTime) -> Result<Vec<ChainLink>, ChainError> {
            std::thread::sleep(self.0);
            Ok(Vec::new())
        }
    }

    #[test]
    fn no_verifier_is_unavailable() {
        let cert = CertBuilder::subscriber().build();
        assert_eq!(
            NoChainVerifier.verify(&cert, datetime!(2022-01-02 0:00 UTC)),
            Err(ChainError::Unavailable)
        );
    }

    #[test]
    fn timeout_fires_for_slow_verifier() {
        let verifier = TimeoutVerifier::new(Slow(Duration::from_secs(5)), Duration::from_millis(20));
        let cert = CertBuilder::subscriber().build();
        assert_eq!(
            verifier.verify(&cert, datetime!(2022-01-02 0:00 UTC)),
            Err(ChainError::Timeout(Duration::from_millis(20)))
        );
    }

    #[test]
    fn timeout_passes_through_fast_result() {
        let verifier = TimeoutVerifier::new(Slow(Duration::ZERO), Duration::from_secs(5));
        let cert = CertBuilder::subscriber().build();
        assert_eq!(verifier.verify(&cert, datetime!(2022-01-02 0:00 UTC)), Ok(Vec::new()));
    }

    #[test]
    fn saturated_verifier_refuses_new_work() {
        let verifier = TimeoutVerifier::new(Slow(Duration::from_secs(5)), Duration::from_millis(20))
            .with_max_in_flight(1);
        let cert = CertBuilder::subscriber().build();
        let at = datetime!(2022-01-02 0:00 UTC);
        assert_eq!(
            verifier.verify(&cert, at),
            Err(ChainError::Timeout(Duration::from_millis(20)))
        );
        assert_eq!(verifier.in_flight(), 1);
        assert_eq!(verifier.verify(&cert, at), Err(ChainError::Saturated(1)));
    }

    #[test]
    fn finished_helpers_release_their_slot() {
        let verifier =
            TimeoutVerifier::new(Slow(Duration::ZERO), Duration::from_secs(5)).with_max_in_flight(1);
        let cert = CertBuilder::subscriber().build();
        let at = datetime!(2022-01-02 0:00 UTC);
        assert_eq!(verifier.verify(&cert, at), Ok(Vec::new()));
        // The slot is released after the result is sent, so allow the helper to exit.
        for _ in 0..100 {
            if verifier.in_flight() == 0 {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(verifier.verify(&cert, at), Ok(Vec::new()));
    }

    #[test]
    fn timeout_passes_through_errors() {
        let verifier = TimeoutVerifier::new(NoChainVerifier, Duration::from_secs(5));
        let cert = CertBuilder::subscriber().build();
        assert_eq!(
            verifier.verify(&cert, datetime!(2022-01-02 0:00 UTC)),
            Err(ChainError::Unavailable)
        );
    }
}
