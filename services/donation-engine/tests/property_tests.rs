//! Property-based tests for receipt numbering invariants
//!
//! Receipt numbers are parsed by audit tooling and embedded in email
//! attachments, so their shape and per-day ordering must hold for all
//! inputs.

use chrono::{NaiveDate, TimeZone, Utc};
use donation_engine::models::DonationKind;
use donation_engine::receipt::{ReceiptNumber, ReceiptSequencer};
use proptest::prelude::*;

fn arb_kind() -> impl Strategy<Value = DonationKind> {
    prop_oneof![Just(DonationKind::Monetary), Just(DonationKind::InKind)]
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2020i32..2035, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

proptest! {
    /// Property: minted numbers always parse back to their parts.
    #[test]
    fn receipt_number_roundtrip(
        kind in arb_kind(),
        date in arb_date(),
        sequence in 1u32..=9999,
    ) {
        let number = ReceiptNumber::mint(kind, date, sequence);
        let (parsed_kind, parsed_date, parsed_sequence) =
            ReceiptNumber::parse(number.as_str()).expect("minted number parses");
        prop_assert_eq!(parsed_kind, kind);
        prop_assert_eq!(parsed_date, date);
        prop_assert_eq!(parsed_sequence, sequence);
    }

    /// Property: the string shape is always prefix + 8 date digits + 4
    /// sequence digits.
    #[test]
    fn receipt_number_shape(
        kind in arb_kind(),
        date in arb_date(),
        sequence in 1u32..=9999,
    ) {
        let number = ReceiptNumber::mint(kind, date, sequence);
        let s = number.as_str();
        prop_assert_eq!(s.len(), 15);
        prop_assert!(s.starts_with("NGO") || s.starts_with("IKD"));
        prop_assert!(s[3..].chars().all(|c| c.is_ascii_digit()));
        prop_assert_eq!(number.pdf_filename(), format!("receipt_{}.pdf", s));
    }

    /// Property: sequential minting within one day yields strictly
    /// increasing, duplicate-free sequences regardless of how mints are
    /// interleaved across kinds.
    #[test]
    fn sequences_strictly_increase_within_a_day(
        kinds in prop::collection::vec(arb_kind(), 1..200),
        date in arb_date(),
    ) {
        let sequencer = ReceiptSequencer::new();
        let now = Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap());

        let mut last_monetary = 0u32;
        let mut last_in_kind = 0u32;
        for kind in kinds {
            let number = sequencer.next_at(kind, now);
            let (_, _, sequence) = ReceiptNumber::parse(number.as_str()).unwrap();
            match kind {
                DonationKind::Monetary => {
                    prop_assert_eq!(sequence, last_monetary + 1);
                    last_monetary = sequence;
                }
                DonationKind::InKind => {
                    prop_assert_eq!(sequence, last_in_kind + 1);
                    last_in_kind = sequence;
                }
            }
        }
    }
}
