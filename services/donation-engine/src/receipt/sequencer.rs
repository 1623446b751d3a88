use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;

use crate::models::DonationKind;
use crate::receipt::ReceiptNumber;

/// Atomic keyed counter for receipt sequences.
///
/// Serializes minting per (UTC day, donation kind) so that concurrent
/// verifications can never receive the same sequence number. Counters roll
/// over at the UTC day boundary; past days are dropped on rollover.
pub struct ReceiptSequencer {
    state: Mutex<DayCounters>,
}

#[derive(Debug, Clone, Copy)]
struct DayCounters {
    date: NaiveDate,
    monetary: u32,
    in_kind: u32,
}

impl DayCounters {
    fn empty(date: NaiveDate) -> Self {
        DayCounters {
            date,
            monetary: 0,
            in_kind: 0,
        }
    }
}

impl ReceiptSequencer {
    pub fn new() -> Self {
        ReceiptSequencer {
            state: Mutex::new(DayCounters::empty(Utc::now().date_naive())),
        }
    }

    /// Mint the next receipt number for `kind`, dated today (UTC).
    pub fn next(&self, kind: DonationKind) -> ReceiptNumber {
        self.next_at(kind, Utc::now())
    }

    /// Clock-injectable variant of [`next`](Self::next).
    pub fn next_at(&self, kind: DonationKind, now: DateTime<Utc>) -> ReceiptNumber {
        let today = now.date_naive();
        let mut state = self.state.lock();

        if state.date != today {
            *state = DayCounters::empty(today);
        }

        let sequence = match kind {
            DonationKind::Monetary => {
                state.monetary += 1;
                state.monetary
            }
            DonationKind::InKind => {
                state.in_kind += 1;
                state.in_kind
            }
        };

        ReceiptNumber::mint(kind, today, sequence)
    }

    /// Sequence number last issued today for `kind`, 0 if none.
    pub fn issued_today(&self, kind: DonationKind, now: DateTime<Utc>) -> u32 {
        let state = self.state.lock();
        if state.date != now.date_naive() {
            return 0;
        }
        match kind {
            DonationKind::Monetary => state.monetary,
            DonationKind::InKind => state.in_kind,
        }
    }
}

impl Default for ReceiptSequencer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_sequences_are_strictly_increasing() {
        let sequencer = ReceiptSequencer::new();
        let now = at(2024, 3, 7);

        let first = sequencer.next_at(DonationKind::InKind, now);
        let second = sequencer.next_at(DonationKind::InKind, now);
        let third = sequencer.next_at(DonationKind::InKind, now);

        assert_eq!(first.as_str(), "IKD202403070001");
        assert_eq!(second.as_str(), "IKD202403070002");
        assert_eq!(third.as_str(), "IKD202403070003");
    }

    #[test]
    fn test_kinds_count_independently() {
        let sequencer = ReceiptSequencer::new();
        let now = at(2024, 3, 7);

        sequencer.next_at(DonationKind::Monetary, now);
        sequencer.next_at(DonationKind::Monetary, now);
        let in_kind = sequencer.next_at(DonationKind::InKind, now);

        assert_eq!(in_kind.as_str(), "IKD202403070001");
        assert_eq!(sequencer.issued_today(DonationKind::Monetary, now), 2);
    }

    #[test]
    fn test_counters_reset_at_day_boundary() {
        let sequencer = ReceiptSequencer::new();

        let yesterday = sequencer.next_at(DonationKind::Monetary, at(2024, 3, 7));
        let today = sequencer.next_at(DonationKind::Monetary, at(2024, 3, 8));

        assert_eq!(yesterday.as_str(), "NGO202403070001");
        assert_eq!(today.as_str(), "NGO202403080001");
    }

    #[test]
    fn test_no_duplicates_under_concurrent_minting() {
        let sequencer = Arc::new(ReceiptSequencer::new());
        let now = at(2024, 3, 7);
        let threads = 16;
        let mints_per_thread = 50;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let sequencer = Arc::clone(&sequencer);
                std::thread::spawn(move || {
                    (0..mints_per_thread)
                        .map(|_| sequencer.next_at(DonationKind::InKind, now))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for number in handle.join().unwrap() {
                assert!(seen.insert(number), "duplicate receipt number issued");
            }
        }
        assert_eq!(seen.len(), threads * mints_per_thread);
        assert_eq!(
            sequencer.issued_today(DonationKind::InKind, now),
            (threads * mints_per_thread) as u32
        );
    }
}
