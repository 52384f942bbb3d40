//! Resolution of the policy regime in force at an instant.
//!
//! A [`RegimeTable`] is an ordered list of `(regime, start)` pairs. The regime
//! in force at an instant is the one with the latest start not after it.
//! Rules whose meaning changed between document versions branch on the
//! resolved regime instead of comparing dates inline, so consecutive regimes
//! partition time with no gaps or overlaps.

use std::sync::OnceLock;

use time::OffsetDateTime;

use crate::dates;

/// Ordered boundaries between successive regimes.
#[derive(Debug, Clone)]
pub struct RegimeTable<V> {
    entries: Vec<(V, OffsetDateTime)>,
}

impl<V> RegimeTable<V> {
    /// Build a table. Entries are sorted by start instant; entries sharing a
    /// start keep their relative order and the last one wins on resolution.
    pub fn new(entries: impl IntoIterator<Item = (V, OffsetDateTime)>) -> Self {
        let mut entries: Vec<_> = entries.into_iter().collect();
        entries.sort_by_key(|(_, start)| *start);
        RegimeTable { entries }
    }

    /// The regime in force at `at`, or `None` before the first boundary.
    pub fn resolve(&self, at: OffsetDateTime) -> Option<&V> {
        let idx = self.entries.partition_point(|(_, start)| *start <= at);
        idx.checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(|(regime, _)| regime)
    }

    /// Start instants in ascending order.
    pub fn boundaries(&self) -> impl Iterator<Item = OffsetDateTime> + '_ {
        self.entries.iter().map(|(_, start)| *start)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&V, OffsetDateTime)> + '_ {
        self.entries.iter().map(|(regime, start)| (regime, *start))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Versions of the code-signing certificate requirements.
///
/// Declaration order matches chronological order, so `v >= Brfcsc20` reads as
/// "version 2.0 or later".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CodeSigningRegime {
    /// Minimum Requirements for Code Signing Certificates 1.1.
    Mrfcsc11,
    Brfcsc12,
    Brfcsc20,
    Brfcsc21,
    Brfcsc22,
    Brfcsc23,
    Brfcsc24,
    Brfcsc25,
    Brfcsc26,
    Brfcsc27,
    Brfcsc28,
    Brfcsc30,
    Brfcsc31,
    Brfcsc32,
}

/// Minimum RSA modulus size for subscriber keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RsaKeySizeRegime {
    Min2048,
    Min3072,
}

impl RsaKeySizeRegime {
    pub fn minimum_bits(self) -> u32 {
        match self {
            RsaKeySizeRegime::Min2048 => 2048,
            RsaKeySizeRegime::Min3072 => 3072,
        }
    }
}

/// How the issuer name must relate to the issuing certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IssuerNameRegime {
    /// The issuer field must be non-empty.
    NonEmpty,
    /// The issuer field must equal the issuing certificate's subject along a
    /// verified chain.
    ChainMatched,
}

pub fn code_signing_regimes() -> &'static RegimeTable<CodeSigningRegime> {
    static TABLE: OnceLock<RegimeTable<CodeSigningRegime>> = OnceLock::new();
    TABLE.get_or_init(|| {
        use CodeSigningRegime::*;
        RegimeTable::new([
            (Mrfcsc11, dates::MRFCSC_EFFECTIVE),
            (Brfcsc12, dates::BRFCSC_V12),
            (Brfcsc20, dates::BRFCSC_V20),
            (Brfcsc21, dates::BRFCSC_V21),
            (Brfcsc22, dates::BRFCSC_V22),
            (Brfcsc23, dates::BRFCSC_V23),
            (Brfcsc24, dates::BRFCSC_V24),
            (Brfcsc25, dates::BRFCSC_V25),
            (Brfcsc26, dates::BRFCSC_V26),
            (Brfcsc27, dates::BRFCSC_V27),
            (Brfcsc28, dates::BRFCSC_V28),
            (Brfcsc30, dates::BRFCSC_V30),
            (Brfcsc31, dates::BRFCSC_V31),
            (Brfcsc32, dates::BRFCSC_V32),
        ])
    })
}

pub fn rsa_key_size_regimes() -> &'static RegimeTable<RsaKeySizeRegime> {
    static TABLE: OnceLock<RegimeTable<RsaKeySizeRegime>> = OnceLock::new();
    TABLE.get_or_init(|| {
        RegimeTable::new([
            (RsaKeySizeRegime::Min2048, dates::MIN_CRYPTO_EFFECTIVE),
            (RsaKeySizeRegime::Min3072, dates::RSA_3072_TRANSITION),
        ])
    })
}

pub fn issuer_name_regimes() -> &'static RegimeTable<IssuerNameRegime> {
    static TABLE: OnceLock<RegimeTable<IssuerNameRegime>> = OnceLock::new();
    TABLE.get_or_init(|| {
        RegimeTable::new([
            (IssuerNameRegime::NonEmpty, dates::RFC5280),
            (IssuerNameRegime::ChainMatched, dates::NAME_ENCODING_CHANGE),
        ])
    })
}
