use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ===== BADGE TIERS =====

/// Ordered badge tiers. Thresholds are evaluated highest-first; the first
/// match wins.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Badge {
    Beginner,
    Helper,
    Contributor,
    Champion,
    Hero,
    Legend,
}

impl Badge {
    /// Tier for a cumulative event count.
    pub fn for_event_count(events: u32) -> Badge {
        if events >= 50 {
            Badge::Legend
        } else if events >= 30 {
            Badge::Hero
        } else if events >= 20 {
            Badge::Champion
        } else if events >= 10 {
            Badge::Contributor
        } else if events >= 5 {
            Badge::Helper
        } else {
            Badge::Beginner
        }
    }

    /// Event count at which this tier is reached.
    pub fn threshold(&self) -> u32 {
        match self {
            Badge::Beginner => 0,
            Badge::Helper => 5,
            Badge::Contributor => 10,
            Badge::Champion => 20,
            Badge::Hero => 30,
            Badge::Legend => 50,
        }
    }

    pub fn next(&self) -> Option<Badge> {
        match self {
            Badge::Beginner => Some(Badge::Helper),
            Badge::Helper => Some(Badge::Contributor),
            Badge::Contributor => Some(Badge::Champion),
            Badge::Champion => Some(Badge::Hero),
            Badge::Hero => Some(Badge::Legend),
            Badge::Legend => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Badge::Beginner => "Beginner",
            Badge::Helper => "Helper",
            Badge::Contributor => "Contributor",
            Badge::Champion => "Champion",
            Badge::Hero => "Hero",
            Badge::Legend => "Legend",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "Helper" => Badge::Helper,
            "Contributor" => Badge::Contributor,
            "Champion" => Badge::Champion,
            "Hero" => Badge::Hero,
            "Legend" => Badge::Legend,
            _ => Badge::Beginner,
        }
    }

    /// Display color carried through to clients.
    pub fn color(&self) -> &str {
        match self {
            Badge::Beginner => "#9E9E9E",
            Badge::Helper => "#4CAF50",
            Badge::Contributor => "#2196F3",
            Badge::Champion => "#FF9800",
            Badge::Hero => "#E91E63",
            Badge::Legend => "#9C27B0",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeAward {
    pub badge: Badge,
    pub achieved_at: DateTime<Utc>,
    pub event_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventParticipation {
    pub campaign_id: Uuid,
    pub joined_at: DateTime<Utc>,
    pub hours_contributed: f64,
    pub score_earned: i64,
}

// ===== CAMPAIGN ROSTER =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinedVolunteer {
    pub volunteer_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolunteerCampaign {
    pub id: Uuid,
    pub title: String,
    pub volunteers_needed: u32,
    pub volunteers_joined: Vec<JoinedVolunteer>,
}

impl VolunteerCampaign {
    pub fn spots_remaining(&self) -> u32 {
        self.volunteers_needed
            .saturating_sub(self.volunteers_joined.len() as u32)
    }
}

// ===== REQUESTS / RESPONSES =====

#[derive(Debug, Clone, Deserialize)]
pub struct CreateVolunteerCampaignRequest {
    pub title: String,
    pub volunteers_needed: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordEventRequest {
    pub volunteer_id: Uuid,
    pub campaign_id: Uuid,
    #[serde(default)]
    pub hours: f64,
    #[serde(default)]
    pub score: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressSummary {
    pub current_badge: Badge,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_events: u32,
    pub total_hours: f64,
    pub total_score: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressResponse {
    pub current_badge: Badge,
    pub badge_color: String,
    pub total_events: u32,
    pub total_hours: f64,
    pub total_score: i64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub next_badge: Option<Badge>,
    pub events_to_next_badge: u32,
    pub badge_history: Vec<BadgeAward>,
    pub recent_events: Vec<EventParticipation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JoinResponse {
    pub message: String,
    pub points_earned: i64,
    pub progress: ProgressSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardKind {
    Overall,
    Monthly,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub volunteer_id: Uuid,
    pub badge: Badge,
    pub badge_color: String,
    pub total_events: u32,
    pub total_hours: f64,
    pub total_score: i64,
    pub current_streak: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_ordering_follows_thresholds() {
        assert!(Badge::Beginner < Badge::Helper);
        assert!(Badge::Helper < Badge::Contributor);
        assert!(Badge::Contributor < Badge::Champion);
        assert!(Badge::Champion < Badge::Hero);
        assert!(Badge::Hero < Badge::Legend);
    }

    #[test]
    fn test_badge_string_roundtrip() {
        for badge in [
            Badge::Beginner,
            Badge::Helper,
            Badge::Contributor,
            Badge::Champion,
            Badge::Hero,
            Badge::Legend,
        ] {
            assert_eq!(Badge::from_str(badge.as_str()), badge);
        }
    }

    #[test]
    fn test_next_badge_chain_ends_at_legend() {
        assert_eq!(Badge::Hero.next(), Some(Badge::Legend));
        assert_eq!(Badge::Legend.next(), None);
    }

    #[test]
    fn test_spots_remaining_saturates() {
        let campaign = VolunteerCampaign {
            id: Uuid::new_v4(),
            title: "Beach Cleanup".to_string(),
            volunteers_needed: 2,
            volunteers_joined: vec![
                JoinedVolunteer {
                    volunteer_id: Uuid::new_v4(),
                    joined_at: Utc::now(),
                },
                JoinedVolunteer {
                    volunteer_id: Uuid::new_v4(),
                    joined_at: Utc::now(),
                },
                JoinedVolunteer {
                    volunteer_id: Uuid::new_v4(),
                    joined_at: Utc::now(),
                },
            ],
        };
        assert_eq!(campaign.spots_remaining(), 0);
    }
}
