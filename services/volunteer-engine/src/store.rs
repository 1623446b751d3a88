use dashmap::DashMap;
use uuid::Uuid;

use crate::errors::{Result, VolunteerEngineError};
use crate::models::VolunteerCampaign;
use crate::progress::VolunteerProgress;

/// In-memory store for volunteer progress records and campaign rosters.
/// Progress records are created lazily on first activity and never
/// deleted.
pub struct VolunteerStore {
    volunteers: DashMap<Uuid, VolunteerProgress>,
    campaigns: DashMap<Uuid, VolunteerCampaign>,
}

impl VolunteerStore {
    pub fn new() -> Self {
        VolunteerStore {
            volunteers: DashMap::new(),
            campaigns: DashMap::new(),
        }
    }

    // ===== CAMPAIGNS =====

    pub fn insert_campaign(&self, campaign: VolunteerCampaign) {
        self.campaigns.insert(campaign.id, campaign);
    }

    pub fn get_campaign(&self, id: Uuid) -> Result<VolunteerCampaign> {
        self.campaigns
            .get(&id)
            .map(|c| c.clone())
            .ok_or(VolunteerEngineError::CampaignNotFound(id))
    }

    /// Mutate a campaign roster under its entry lock, so concurrent joins
    /// cannot oversubscribe the roster.
    pub fn with_campaign_mut<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut VolunteerCampaign) -> Result<T>,
    ) -> Result<T> {
        let mut campaign = self
            .campaigns
            .get_mut(&id)
            .ok_or(VolunteerEngineError::CampaignNotFound(id))?;
        f(&mut campaign)
    }

    // ===== PROGRESS =====

    /// Mutate the volunteer's progress record, creating it on first use.
    pub fn with_progress_mut<T>(
        &self,
        volunteer_id: Uuid,
        f: impl FnOnce(&mut VolunteerProgress) -> T,
    ) -> T {
        let mut progress = self
            .volunteers
            .entry(volunteer_id)
            .or_insert_with(|| VolunteerProgress::new(volunteer_id));
        f(&mut progress)
    }

    pub fn get_progress(&self, volunteer_id: Uuid) -> Option<VolunteerProgress> {
        self.volunteers.get(&volunteer_id).map(|p| p.clone())
    }

    /// Snapshot of every progress record, for leaderboard ranking.
    pub fn all_progress(&self) -> Vec<VolunteerProgress> {
        self.volunteers.iter().map(|p| p.clone()).collect()
    }
}

impl Default for VolunteerStore {
    fn default() -> Self {
        Self::new()
    }
}
