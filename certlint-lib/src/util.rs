//! Shared encoding utilities.

use crate::oid;

/// Format bytes as colon-separated uppercase hex (e.g., "AB:CD:EF").
pub fn hex_colon_upper(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// True if the input starts with a PEM armor line, ignoring leading whitespace.
pub fn is_pem(input: &[u8]) -> bool {
    let start = input
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(input.len());
    input
        .get(start..)
        .is_some_and(|rest| rest.starts_with(b"-----BEGIN"))
}

/// Short display name for a distinguished-name attribute OID.
pub fn oid_short_name(attr_oid: &str) -> String {
    match attr_oid {
        oid::COMMON_NAME => "CN".into(),
        oid::SURNAME => "SN".into(),
        oid::SERIAL_NUMBER => "serialNumber".into(),
        oid::COUNTRY => "C".into(),
        oid::LOCALITY => "L".into(),
        oid::STATE_OR_PROVINCE => "ST".into(),
        oid::STREET_ADDRESS => "street".into(),
        oid::ORGANIZATION => "O".into(),
        oid::ORGANIZATIONAL_UNIT => "OU".into(),
        oid::TITLE => "title".into(),
        oid::BUSINESS_CATEGORY => "businessCategory".into(),
        oid::POSTAL_CODE => "postalCode".into(),
        oid::GIVEN_NAME => "GN".into(),
        oid::EMAIL_ADDRESS => "emailAddress".into(),
        oid::DOMAIN_COMPONENT => "DC".into(),
        oid::JURISDICTION_LOCALITY => "jurisdictionL".into(),
        oid::JURISDICTION_STATE_OR_PROVINCE => "jurisdictionST".into(),
        oid::JURISDICTION_COUNTRY => "jurisdictionC".into(),
        other => other.to_string(),
    }
}

/// Exact bit length of a big-endian unsigned integer, ignoring leading zeros.
pub fn integer_bit_len(bytes: &[u8]) -> u32 {
    let Some(pos) = bytes.iter().position(|&b| b != 0) else {
        return 0;
    };
    let significant = bytes.get(pos..).unwrap_or_default();
    let leading = significant.first().map_or(0, |b| b.leading_zeros());
    (significant.len() as u32) * 8 - leading
}
