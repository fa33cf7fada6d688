//! A/B test results.
//!
//! A fixed-seed sample of campaigns each gets one three-arm creative
//! test. Significance is a deliberately simple rule, not a hypothesis
//! test: an arm is flagged when it has more than 100 conversions and its
//! CVR differs from the channel baseline by more than 10%. The p-value
//! is drawn from a low band for flagged arms and a high band otherwise.
//!
//! Draw order per sampled campaign (fixed): test duration, base
//! impressions, then per arm: CTR factor and CVR factor (non-control
//! arms only), impression split, p-value.

use crate::{
    campaign_generator::Campaign,
    config::ChannelTable,
    error::SimResult,
    rng::SimRng,
    sequence::IdSequence,
    types::{round4, Day, RowId},
};
use chrono::Days;
use serde::{Deserialize, Serialize};

pub const TEST_DURATION_DAYS: (u64, u64) = (14, 30);
pub const BASE_IMPRESSIONS: (u64, u64) = (50_000, 200_000);
pub const IMPRESSION_SPLIT_NOISE: (f64, f64) = (0.9, 1.1);
pub const SIGNIFICANT_MIN_CONVERSIONS: u64 = 100;
pub const SIGNIFICANT_CVR_DEVIATION: f64 = 0.10;
pub const SIGNIFICANT_P_RANGE: (f64, f64) = (0.01, 0.15);
pub const INSIGNIFICANT_P_RANGE: (f64, f64) = (0.15, 0.90);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Control,
    VariantA,
    VariantB,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Control, Variant::VariantA, Variant::VariantB];

    /// Multiplicative (CTR, CVR) perturbation ranges around the baseline.
    fn perturbation(&self) -> Option<((f64, f64), (f64, f64))> {
        match self {
            Self::Control => None,
            Self::VariantA => Some(((0.95, 1.15), (0.90, 1.10))),
            Self::VariantB => Some(((0.85, 1.25), (0.95, 1.20))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Control => "control",
            Self::VariantA => "variant_a",
            Self::VariantB => "variant_b",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AbTestRecord {
    pub test_id: RowId,
    pub campaign_id: RowId,
    pub test_name: String,
    pub variant: Variant,
    pub start_date: Day,
    pub end_date: Day,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub statistical_significance: bool,
    pub p_value: f64,
}

/// The simplified significance rule.
pub fn is_significant(conversions: u64, cvr: f64, baseline_cvr: f64) -> bool {
    conversions > SIGNIFICANT_MIN_CONVERSIONS
        && ((cvr - baseline_cvr).abs() / baseline_cvr) > SIGNIFICANT_CVR_DEVIATION
}

/// Number of campaigns to test for a roster of `n`.
pub fn sample_size(n: usize, fraction: f64) -> usize {
    ((n as f64) * fraction).round() as usize
}

pub struct AbTestSynthesizer<'a> {
    channels: &'a ChannelTable,
    fraction: f64,
}

impl<'a> AbTestSynthesizer<'a> {
    pub fn new(channels: &'a ChannelTable, fraction: f64) -> Self {
        Self { channels, fraction }
    }

    /// `sampler` picks the campaigns; `rng` drives everything else.
    pub fn generate(
        &self,
        campaigns: &[Campaign],
        sampler: &mut SimRng,
        rng: &mut SimRng,
        ids: &mut IdSequence,
    ) -> SimResult<Vec<AbTestRecord>> {
        let picked = sampler.sample_indices(campaigns.len(), sample_size(campaigns.len(), self.fraction));
        let mut records = Vec::with_capacity(picked.len() * Variant::ALL.len());

        for idx in picked {
            self.test_campaign(&campaigns[idx], rng, ids, &mut records)?;
        }

        log::info!(
            "ab_test: generated {} rows across {} campaigns",
            records.len(),
            records.len() / Variant::ALL.len()
        );
        Ok(records)
    }

    fn test_campaign(
        &self,
        campaign: &Campaign,
        rng: &mut SimRng,
        ids: &mut IdSequence,
        out: &mut Vec<AbTestRecord>,
    ) -> SimResult<()> {
        let profile = self.channels.get(&campaign.channel)?;
        let test_name = format!("Creative Test - {}", campaign.campaign_name);

        let duration = rng.int_inclusive(TEST_DURATION_DAYS.0, TEST_DURATION_DAYS.1);
        let start_date = campaign.start_date;
        let end_date = (start_date + Days::new(duration)).min(campaign.end_date);

        let base_impressions = rng.int_inclusive(BASE_IMPRESSIONS.0, BASE_IMPRESSIONS.1);
        let (base_ctr, base_cvr) = (profile.avg_ctr, profile.avg_cvr);

        for variant in Variant::ALL {
            let (ctr, cvr) = match variant.perturbation() {
                None => (base_ctr, base_cvr),
                Some((ctr_range, cvr_range)) => {
                    let ctr = base_ctr * rng.uniform(ctr_range.0, ctr_range.1);
                    let cvr = base_cvr * rng.uniform(cvr_range.0, cvr_range.1);
                    (ctr, cvr)
                }
            };

            let share = base_impressions as f64 / Variant::ALL.len() as f64;
            let impressions = (share
                * rng.uniform(IMPRESSION_SPLIT_NOISE.0, IMPRESSION_SPLIT_NOISE.1))
            .floor() as u64;
            let clicks = (impressions as f64 * ctr).floor() as u64;
            let conversions = (clicks as f64 * cvr).floor() as u64;

            let significant = is_significant(conversions, cvr, base_cvr);
            let (lo, hi) = if significant {
                SIGNIFICANT_P_RANGE
            } else {
                INSIGNIFICANT_P_RANGE
            };
            let p_value = round4(rng.uniform(lo, hi));

            out.push(AbTestRecord {
                test_id: ids.next_id(),
                campaign_id: campaign.campaign_id,
                test_name: test_name.clone(),
                variant,
                start_date,
                end_date,
                impressions,
                clicks,
                conversions,
                statistical_significance: significant,
                p_value,
            });
        }
        Ok(())
    }
}
