use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::errors::{Result, VolunteerEngineError};
use crate::metrics;
use crate::models::{
    CreateVolunteerCampaignRequest, JoinResponse, JoinedVolunteer, LeaderboardEntry,
    LeaderboardKind, ProgressResponse, ProgressSummary, RecordEventRequest, VolunteerCampaign,
};
use crate::store::VolunteerStore;

/// Score granted for joining a campaign as a volunteer.
const JOIN_SCORE: i64 = 10;

pub struct VolunteerService {
    pub store: Arc<VolunteerStore>,
}

impl VolunteerService {
    pub fn new(store: Arc<VolunteerStore>) -> Self {
        VolunteerService { store }
    }

    // ===== CAMPAIGNS =====

    pub fn create_campaign(&self, request: CreateVolunteerCampaignRequest) -> VolunteerCampaign {
        let campaign = VolunteerCampaign {
            id: Uuid::new_v4(),
            title: request.title,
            volunteers_needed: request.volunteers_needed,
            volunteers_joined: Vec::new(),
        };
        self.store.insert_campaign(campaign.clone());
        campaign
    }

    // ===== PARTICIPATION LEDGER =====

    /// Append a completed event to the volunteer's ledger and rederive
    /// badge and streak.
    pub fn record_event(&self, request: RecordEventRequest) -> Result<ProgressSummary> {
        if request.hours < 0.0 {
            return Err(VolunteerEngineError::Validation(
                "hours cannot be negative".to_string(),
            ));
        }
        self.record_event_at(request, Utc::now())
    }

    /// Clock-injectable variant of [`record_event`](Self::record_event).
    pub fn record_event_at(
        &self,
        request: RecordEventRequest,
        now: DateTime<Utc>,
    ) -> Result<ProgressSummary> {
        let summary = self.store.with_progress_mut(request.volunteer_id, |progress| {
            let badge_before = progress.current_badge;
            progress.add_event(request.campaign_id, request.hours, request.score, now);

            if progress.current_badge != badge_before {
                metrics::BADGES_AWARDED
                    .with_label_values(&[progress.current_badge.as_str()])
                    .inc();
                info!(
                    volunteer = %request.volunteer_id,
                    badge = progress.current_badge.as_str(),
                    events = progress.total_events,
                    "badge tier reached"
                );
            }
            progress.summary()
        });

        metrics::EVENTS_RECORDED.inc();
        Ok(summary)
    }

    /// Join a campaign roster. The join itself counts as a scored event.
    pub fn join_campaign(&self, volunteer_id: Uuid, campaign_id: Uuid) -> Result<JoinResponse> {
        self.store.with_campaign_mut(campaign_id, |campaign| {
            if campaign
                .volunteers_joined
                .iter()
                .any(|v| v.volunteer_id == volunteer_id)
            {
                return Err(VolunteerEngineError::AlreadyJoined);
            }
            if campaign.spots_remaining() == 0 {
                return Err(VolunteerEngineError::CampaignFull);
            }
            campaign.volunteers_joined.push(JoinedVolunteer {
                volunteer_id,
                joined_at: Utc::now(),
            });
            Ok(())
        })?;

        metrics::VOLUNTEERS_JOINED.inc();
        let progress = self.record_event(RecordEventRequest {
            volunteer_id,
            campaign_id,
            hours: 0.0,
            score: JOIN_SCORE,
        })?;

        Ok(JoinResponse {
            message: "Successfully joined as volunteer!".to_string(),
            points_earned: JOIN_SCORE,
            progress,
        })
    }

    // ===== READS =====

    /// Progress dashboard. A volunteer with no activity yet gets a fresh
    /// record, matching the lazily-created ledger.
    pub fn get_progress(&self, volunteer_id: Uuid) -> ProgressResponse {
        let progress = self
            .store
            .with_progress_mut(volunteer_id, |progress| progress.clone());

        let recent_events = progress
            .events_participated
            .iter()
            .rev()
            .take(5)
            .cloned()
            .collect();

        ProgressResponse {
            current_badge: progress.current_badge,
            badge_color: progress.current_badge.color().to_string(),
            total_events: progress.total_events,
            total_hours: progress.total_hours,
            total_score: progress.total_score,
            current_streak: progress.current_streak,
            longest_streak: progress.longest_streak,
            next_badge: progress.current_badge.next(),
            events_to_next_badge: progress.events_to_next_badge(),
            badge_history: progress.badge_history.clone(),
            recent_events,
        }
    }

    /// Top volunteers: overall ranks by total score, monthly by total
    /// events.
    pub fn leaderboard(&self, kind: LeaderboardKind, limit: usize) -> Vec<LeaderboardEntry> {
        let mut all = self.store.all_progress();
        match kind {
            LeaderboardKind::Overall => {
                all.sort_by(|a, b| b.total_score.cmp(&a.total_score));
            }
            LeaderboardKind::Monthly => {
                all.sort_by(|a, b| b.total_events.cmp(&a.total_events));
            }
        }

        all.iter()
            .take(limit)
            .enumerate()
            .map(|(index, progress)| LeaderboardEntry {
                rank: index + 1,
                volunteer_id: progress.volunteer_id,
                badge: progress.current_badge,
                badge_color: progress.current_badge.color().to_string(),
                total_events: progress.total_events,
                total_hours: progress.total_hours,
                total_score: progress.total_score,
                current_streak: progress.current_streak,
            })
            .collect()
    }
}
