use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::DonationKind;

/// Receipt identifier with the shape `<PREFIX><YYYY><MM><DD><SEQ4>`.
///
/// `NGO` prefixes monetary receipts, `IKD` in-kind receipts. The sequence
/// is 4 digits, zero padded, 1-based, unique per calendar day per kind.
/// Audit consumers parse this exact shape, so it must never change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptNumber(String);

pub const MONETARY_PREFIX: &str = "NGO";
pub const IN_KIND_PREFIX: &str = "IKD";

impl ReceiptNumber {
    pub fn mint(kind: DonationKind, date: NaiveDate, sequence: u32) -> Self {
        let prefix = match kind {
            DonationKind::Monetary => MONETARY_PREFIX,
            DonationKind::InKind => IN_KIND_PREFIX,
        };
        ReceiptNumber(format!("{}{}{:04}", prefix, date.format("%Y%m%d"), sequence))
    }

    /// Parse a receipt number back into its parts. Returns `None` for
    /// anything that does not match the documented shape, multibyte
    /// input included.
    pub fn parse(s: &str) -> Option<(DonationKind, NaiveDate, u32)> {
        if s.len() != 15 || !s.is_ascii() {
            return None;
        }
        let kind = match s.get(..3)? {
            MONETARY_PREFIX => DonationKind::Monetary,
            IN_KIND_PREFIX => DonationKind::InKind,
            _ => return None,
        };
        let date = NaiveDate::parse_from_str(s.get(3..11)?, "%Y%m%d").ok()?;
        let sequence: u32 = s.get(11..15)?.parse().ok()?;
        if sequence == 0 {
            return None;
        }
        Some((kind, date, sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stable receipt file name. Email attachments and download links
    /// reference this name, so it is part of the external contract.
    pub fn pdf_filename(&self) -> String {
        format!("receipt_{}.pdf", self.0)
    }
}

impl fmt::Display for ReceiptNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monetary_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let number = ReceiptNumber::mint(DonationKind::Monetary, date, 1);
        assert_eq!(number.as_str(), "NGO202403070001");
    }

    #[test]
    fn test_in_kind_format() {
        let date = NaiveDate::from_ymd_opt(2024, 11, 21).unwrap();
        let number = ReceiptNumber::mint(DonationKind::InKind, date, 412);
        assert_eq!(number.as_str(), "IKD202411210412");
    }

    #[test]
    fn test_parse_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let number = ReceiptNumber::mint(DonationKind::InKind, date, 37);
        let (kind, parsed_date, sequence) = ReceiptNumber::parse(number.as_str()).unwrap();
        assert_eq!(kind, DonationKind::InKind);
        assert_eq!(parsed_date, date);
        assert_eq!(sequence, 37);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ReceiptNumber::parse("").is_none());
        assert!(ReceiptNumber::parse("XYZ202401010001").is_none());
        assert!(ReceiptNumber::parse("NGO2024010100").is_none());
        assert!(ReceiptNumber::parse("NGO202413010001").is_none());
        assert!(ReceiptNumber::parse("NGO202401010000").is_none());
    }

    #[test]
    fn test_parse_rejects_multibyte_input() {
        // 15 bytes, but char boundaries do not line up with the field
        // offsets. Must return None, not panic.
        let multibyte = "NGééééééX";
        assert_eq!(multibyte.len(), 15);
        assert!(ReceiptNumber::parse(multibyte).is_none());
        assert!(ReceiptNumber::parse("日本語のレシート").is_none());
    }

    #[test]
    fn test_pdf_filename_contract() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let number = ReceiptNumber::mint(DonationKind::Monetary, date, 12);
        assert_eq!(number.pdf_filename(), "receipt_NGO202403070012.pdf");
    }
}
