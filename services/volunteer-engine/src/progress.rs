// Volunteer Progress - pure badge and streak derivation
//
// No I/O here: every transition is a function of the accumulated counters
// and an explicit `now`, so the rules are testable without the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Badge, BadgeAward, EventParticipation, ProgressSummary};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolunteerProgress {
    pub volunteer_id: Uuid,
    pub total_events: u32,
    pub total_hours: f64,
    pub total_score: i64,
    pub current_badge: Badge,
    pub badge_history: Vec<BadgeAward>,
    pub events_participated: Vec<EventParticipation>,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_active_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl VolunteerProgress {
    pub fn new(volunteer_id: Uuid) -> Self {
        VolunteerProgress {
            volunteer_id,
            total_events: 0,
            total_hours: 0.0,
            total_score: 0,
            current_badge: Badge::Beginner,
            badge_history: Vec::new(),
            events_participated: Vec::new(),
            current_streak: 0,
            longest_streak: 0,
            last_active_date: None,
            created_at: Utc::now(),
        }
    }

    /// Recompute the badge tier from `total_events`. A change appends one
    /// history entry; repeated calls at the same count append nothing.
    pub fn update_badge(&mut self, now: DateTime<Utc>) {
        let new_badge = Badge::for_event_count(self.total_events);
        if new_badge != self.current_badge {
            self.badge_history.push(BadgeAward {
                badge: new_badge,
                achieved_at: now,
                event_count: self.total_events,
            });
            self.current_badge = new_badge;
        }
    }

    /// Advance the consecutive-day streak.
    ///
    /// `days_diff` is the floor of the elapsed time in whole days. One day
    /// extends the streak, more than one breaks it, and a second event on
    /// the same day leaves the streak untouched. `longest_streak` only
    /// ever ratchets upward.
    pub fn update_streak(&mut self, now: DateTime<Utc>) {
        match self.last_active_date {
            None => self.current_streak = 1,
            Some(last_active) => {
                let days_diff = (now - last_active).num_days();
                if days_diff == 1 {
                    self.current_streak += 1;
                } else if days_diff > 1 {
                    self.current_streak = 1;
                }
            }
        }

        if self.current_streak > self.longest_streak {
            self.longest_streak = self.current_streak;
        }
        self.last_active_date = Some(now);
    }

    /// Append a participation record and fold it into the counters, then
    /// rederive badge and streak. Badge first: it reads the new total.
    pub fn add_event(
        &mut self,
        campaign_id: Uuid,
        hours: f64,
        score: i64,
        now: DateTime<Utc>,
    ) {
        self.events_participated.push(EventParticipation {
            campaign_id,
            joined_at: now,
            hours_contributed: hours,
            score_earned: score,
        });

        self.total_events += 1;
        self.total_hours += hours;
        self.total_score += score;

        self.update_badge(now);
        self.update_streak(now);
    }

    pub fn summary(&self) -> ProgressSummary {
        ProgressSummary {
            current_badge: self.current_badge,
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
            total_events: self.total_events,
            total_hours: self.total_hours,
            total_score: self.total_score,
        }
    }

    /// Events still needed to reach the next tier, 0 at Legend.
    pub fn events_to_next_badge(&self) -> u32 {
        match self.current_badge.next() {
            Some(next) => next.threshold().saturating_sub(self.total_events),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at_day(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 10, 0, 0).unwrap()
    }

    fn progress_with_events(total_events: u32) -> VolunteerProgress {
        let mut progress = VolunteerProgress::new(Uuid::new_v4());
        progress.total_events = total_events;
        progress
    }

    #[test]
    fn test_badge_thresholds() {
        let cases = [
            (0, Badge::Beginner),
            (4, Badge::Beginner),
            (5, Badge::Helper),
            (9, Badge::Helper),
            (10, Badge::Contributor),
            (19, Badge::Contributor),
            (20, Badge::Champion),
            (29, Badge::Champion),
            (30, Badge::Hero),
            (49, Badge::Hero),
            (50, Badge::Legend),
            (120, Badge::Legend),
        ];
        for (events, expected) in cases {
            assert_eq!(
                Badge::for_event_count(events),
                expected,
                "events = {}",
                events
            );
        }
    }

    #[test]
    fn test_badge_change_appends_single_history_entry() {
        let mut progress = progress_with_events(5);
        let now = at_day(1);

        progress.update_badge(now);
        assert_eq!(progress.current_badge, Badge::Helper);
        assert_eq!(progress.badge_history.len(), 1);
        assert_eq!(progress.badge_history[0].event_count, 5);

        // Repeated calls at the same count are a no-op.
        progress.update_badge(now);
        progress.update_badge(now);
        assert_eq!(progress.badge_history.len(), 1);
    }

    #[test]
    fn test_badge_history_records_each_crossing_once() {
        let mut progress = VolunteerProgress::new(Uuid::new_v4());
        for day in 1..=25 {
            progress.add_event(Uuid::new_v4(), 1.0, 10, at_day(day.min(28)));
        }
        assert_eq!(progress.current_badge, Badge::Champion);
        let tiers: Vec<Badge> = progress.badge_history.iter().map(|a| a.badge).collect();
        assert_eq!(tiers, vec![Badge::Helper, Badge::Contributor, Badge::Champion]);

        // Entries are strictly increasing in tier and in event count.
        for pair in progress.badge_history.windows(2) {
            assert!(pair[0].badge < pair[1].badge);
            assert!(pair[0].event_count < pair[1].event_count);
        }
    }

    #[test]
    fn test_first_event_starts_streak_at_one() {
        let mut progress = VolunteerProgress::new(Uuid::new_v4());
        progress.update_streak(at_day(1));
        assert_eq!(progress.current_streak, 1);
        assert_eq!(progress.longest_streak, 1);
        assert_eq!(progress.last_active_date, Some(at_day(1)));
    }

    #[test]
    fn test_next_day_extends_streak() {
        let mut progress = VolunteerProgress::new(Uuid::new_v4());
        progress.update_streak(at_day(1));
        progress.update_streak(at_day(2));
        progress.update_streak(at_day(3));
        assert_eq!(progress.current_streak, 3);
        assert_eq!(progress.longest_streak, 3);
    }

    #[test]
    fn test_same_day_events_do_not_inflate_streak() {
        let mut progress = VolunteerProgress::new(Uuid::new_v4());
        progress.update_streak(at_day(1));
        progress.update_streak(at_day(1) + Duration::hours(3));
        progress.update_streak(at_day(1) + Duration::hours(7));
        assert_eq!(progress.current_streak, 1);
        assert_eq!(progress.longest_streak, 1);
    }

    #[test]
    fn test_gap_resets_streak_but_longest_survives() {
        let mut progress = VolunteerProgress::new(Uuid::new_v4());
        for day in 1..=4 {
            progress.update_streak(at_day(day));
        }
        assert_eq!(progress.current_streak, 4);

        progress.update_streak(at_day(10));
        assert_eq!(progress.current_streak, 1);
        assert_eq!(progress.longest_streak, 4);
    }

    #[test]
    fn test_five_consecutive_days_yield_helper_badge_and_streak() {
        let mut progress = VolunteerProgress::new(Uuid::new_v4());
        for day in 1..=5 {
            progress.add_event(Uuid::new_v4(), 2.0, 10, at_day(day));
        }

        assert_eq!(progress.current_badge, Badge::Helper);
        assert_eq!(progress.current_streak, 5);
        assert_eq!(progress.longest_streak, 5);
        assert_eq!(progress.total_events, 5);
        assert_eq!(progress.total_hours, 10.0);
        assert_eq!(progress.total_score, 50);
    }

    #[test]
    fn test_events_to_next_badge() {
        let mut progress = progress_with_events(7);
        progress.update_badge(at_day(1));
        assert_eq!(progress.current_badge, Badge::Helper);
        assert_eq!(progress.events_to_next_badge(), 3);

        let mut legend = progress_with_events(60);
        legend.update_badge(at_day(1));
        assert_eq!(legend.events_to_next_badge(), 0);
    }
}
