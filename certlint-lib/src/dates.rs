//! Effective dates of the policy documents the rules cite.
//!
//! All instants are midnight UTC on the date the document took effect.

use time::macros::datetime;
use time::OffsetDateTime;

// ── RFCs ────────────────────────────────────────────────────────────────

pub const RFC2459: OffsetDateTime = datetime!(1999-01-01 0:00 UTC);
pub const RFC5280: OffsetDateTime = datetime!(2008-05-01 0:00 UTC);

// ── CA/B Forum baseline requirements ────────────────────────────────────

pub const SUB_CERT_39_MONTH: OffsetDateTime = datetime!(2016-07-02 0:00 UTC);
/// Issuer and subject names must be byte-identical along the chain.
pub const NAME_ENCODING_CHANGE: OffsetDateTime = datetime!(2020-09-30 0:00 UTC);

// ── Code-signing requirements, by version ───────────────────────────────

pub const MRFCSC_EFFECTIVE: OffsetDateTime = datetime!(2016-09-22 0:00 UTC);
pub const BRFCSC_V12: OffsetDateTime = datetime!(2019-08-13 0:00 UTC);
pub const BRFCSC_V20: OffsetDateTime = datetime!(2020-09-02 0:00 UTC);
pub const BRFCSC_V21: OffsetDateTime = datetime!(2020-11-07 0:00 UTC);
pub const BRFCSC_V22: OffsetDateTime = datetime!(2021-03-05 0:00 UTC);
pub const BRFCSC_V23: OffsetDateTime = datetime!(2021-05-03 0:00 UTC);
pub const BRFCSC_V24: OffsetDateTime = datetime!(2021-09-09 0:00 UTC);
pub const BRFCSC_V25: OffsetDateTime = datetime!(2021-09-13 0:00 UTC);
pub const BRFCSC_V26: OffsetDateTime = datetime!(2021-11-03 0:00 UTC);
pub const BRFCSC_V27: OffsetDateTime = datetime!(2021-12-03 0:00 UTC);
pub const BRFCSC_V28: OffsetDateTime = datetime!(2022-05-09 0:00 UTC);
pub const BRFCSC_V30: OffsetDateTime = datetime!(2022-06-29 0:00 UTC);
pub const BRFCSC_V31: OffsetDateTime = datetime!(2022-09-19 0:00 UTC);
pub const BRFCSC_V32: OffsetDateTime = datetime!(2022-10-28 0:00 UTC);

// ── Code-signing cryptography transitions ───────────────────────────────

pub const MIN_CRYPTO_EFFECTIVE: OffsetDateTime = datetime!(2017-01-31 0:00 UTC);
pub const DIGEST_ALGORITHM_TRANSITION: OffsetDateTime = datetime!(2021-01-01 0:00 UTC);
/// RSA subscriber keys must be at least 3072 bits from this date.
pub const RSA_3072_TRANSITION: OffsetDateTime = datetime!(2021-06-01 0:00 UTC);
