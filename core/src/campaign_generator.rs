//! Campaign roster generation.
//!
//! Draw order per campaign (fixed): channel, start offset, duration,
//! budget, target audience.

use crate::{
    config::{GeneratorConfig, TARGET_AUDIENCES},
    horizon::inclusive_days,
    rng::SimRng,
    sequence::IdSequence,
    types::{round2, Day, RowId},
};
use chrono::Days;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Campaign {
    pub campaign_id: RowId,
    pub campaign_name: String,
    pub channel: String,
    pub start_date: Day,
    pub end_date: Day,
    pub budget: f64,
    pub target_audience: String,
}

impl Campaign {
    /// Length of the campaign window in days, both ends inclusive.
    pub fn length_days(&self) -> u64 {
        inclusive_days(self.start_date, self.end_date)
    }
}

pub struct CampaignGenerator<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> CampaignGenerator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self, rng: &mut SimRng, ids: &mut IdSequence) -> Vec<Campaign> {
        let horizon = self.config.horizon;
        let channels = &self.config.channels.channels;
        let mut campaigns = Vec::with_capacity(self.config.num_campaigns);

        for _ in 0..self.config.num_campaigns {
            let profile = rng.choose(channels);

            let offset = rng.int_inclusive(0, self.config.max_start_offset_days);
            let start_date = horizon.clamp(horizon.start + Days::new(offset));

            let duration =
                rng.int_inclusive(self.config.min_duration_days, self.config.max_duration_days);
            let end_date = (start_date + Days::new(duration)).min(horizon.end);

            let budget = round2(rng.uniform(profile.budget_min, profile.budget_max));
            let target_audience = rng.choose(&TARGET_AUDIENCES).to_string();

            let campaign_id = ids.next_id();
            campaigns.push(Campaign {
                campaign_id,
                campaign_name: format!("{} Campaign {campaign_id}", display_name(&profile.channel)),
                channel: profile.channel.clone(),
                start_date,
                end_date,
                budget,
                target_audience,
            });
        }

        log::info!("campaign: generated {} campaigns", campaigns.len());
        campaigns
    }
}

/// "paid_search" -> "Paid Search"
fn display_name(channel: &str) -> String {
    channel
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
