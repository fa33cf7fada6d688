//! Daily performance simulation.
//!
//! Each campaign is walked day by day across its window. Spend gets a
//! weekend dip and a per-day variance factor; the same variance draw is
//! reused down the funnel (impressions -> clicks -> conversions) so
//! good and bad days move together. Channel validation keeps every rate
//! times the peak variance at or below one, so each funnel stage is a
//! floor of at most the previous stage and
//! `conversions <= clicks <= impressions` holds without clamping.
//!
//! Draw order per day (fixed): variance, revenue jitter.

use crate::{
    campaign_generator::Campaign,
    config::{ChannelProfile, ChannelTable},
    error::SimResult,
    horizon::each_day,
    rng::SimRng,
    types::{round2, Day, RowId},
};
use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};

pub const WEEKEND_MULTIPLIER: f64 = 0.7;
pub const VARIANCE_RANGE: (f64, f64) = (0.7, 1.3);
pub const REVENUE_JITTER: (f64, f64) = (0.8, 1.2);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyPerformance {
    pub date: Day,
    pub campaign_id: RowId,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub spend: f64,
    pub revenue: f64,
}

/// Budget split evenly across every day of the window.
pub fn daily_budget(campaign: &Campaign) -> f64 {
    campaign.budget / campaign.length_days().max(1) as f64
}

pub fn weekend_multiplier(day: Day) -> f64 {
    match day.weekday() {
        Weekday::Sat | Weekday::Sun => WEEKEND_MULTIPLIER,
        _ => 1.0,
    }
}

pub struct PerformanceSimulator<'a> {
    channels: &'a ChannelTable,
}

impl<'a> PerformanceSimulator<'a> {
    pub fn new(channels: &'a ChannelTable) -> Self {
        Self { channels }
    }

    pub fn generate(
        &self,
        campaigns: &[Campaign],
        rng: &mut SimRng,
    ) -> SimResult<Vec<DailyPerformance>> {
        let mut records = Vec::new();
        for campaign in campaigns {
            let profile = self.channels.get(&campaign.channel)?;
            let before = records.len();
            self.simulate_campaign(campaign, profile, rng, &mut records);
            log::debug!(
                "performance: campaign {} ({}) -> {} days",
                campaign.campaign_id,
                campaign.channel,
                records.len() - before
            );
        }
        log::info!("performance: generated {} daily records", records.len());
        Ok(records)
    }

    fn simulate_campaign(
        &self,
        campaign: &Campaign,
        profile: &ChannelProfile,
        rng: &mut SimRng,
        out: &mut Vec<DailyPerformance>,
    ) {
        let budget_per_day = daily_budget(campaign);

        for date in each_day(campaign.start_date, campaign.end_date) {
            let variance = rng.uniform(VARIANCE_RANGE.0, VARIANCE_RANGE.1);
            let spend = budget_per_day * variance * weekend_multiplier(date);

            let impressions = (spend / (profile.avg_cpc * profile.avg_ctr)).floor() as u64;
            let clicks = (impressions as f64 * profile.avg_ctr * variance).floor() as u64;
            let conversions = (clicks as f64 * profile.avg_cvr * variance).floor() as u64;

            let jitter = rng.uniform(REVENUE_JITTER.0, REVENUE_JITTER.1);
            let revenue = conversions as f64 * profile.avg_aov * jitter;

            out.push(DailyPerformance {
                date,
                campaign_id: campaign.campaign_id,
                impressions,
                clicks,
                conversions,
                spend: round2(spend),
                revenue: round2(revenue),
            });
        }
    }
}
