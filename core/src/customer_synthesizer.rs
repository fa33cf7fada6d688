//! Customer acquisition.
//!
//! Every conversion in the daily performance table becomes one customer,
//! scanned in performance order. The scan stops the moment the customer
//! cap is reached, so the last campaign-day touched may be only partly
//! represented. No draws are made past the cap: later stages share the
//! stream and must start from exactly that point.

use crate::{
    campaign_generator::Campaign,
    config::ChannelTable,
    error::{SimError, SimResult},
    performance_simulator::DailyPerformance,
    rng::SimRng,
    sequence::IdSequence,
    types::{round2, Day, RowId},
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

pub const HIGH_VALUE_THRESHOLD: f64 = 100.0;
pub const MEDIUM_VALUE_THRESHOLD: f64 = 50.0;
pub const FIRST_ORDER_RANGE: (f64, f64) = (0.5, 1.5);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CustomerSegment {
    HighValue,
    MediumValue,
    LowValue,
}

impl CustomerSegment {
    /// Segment is a pure function of the first order value.
    pub fn from_first_order(value: f64) -> Self {
        if value >= HIGH_VALUE_THRESHOLD {
            Self::HighValue
        } else if value >= MEDIUM_VALUE_THRESHOLD {
            Self::MediumValue
        } else {
            Self::LowValue
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighValue => "high_value",
            Self::MediumValue => "medium_value",
            Self::LowValue => "low_value",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "high_value" => Some(Self::HighValue),
            "medium_value" => Some(Self::MediumValue),
            "low_value" => Some(Self::LowValue),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub customer_id: RowId,
    pub acquisition_date: Day,
    pub campaign_id: RowId,
    pub channel: String,
    pub first_order_value: f64,
    pub customer_segment: CustomerSegment,
    pub email_hash: String,
}

/// Opaque, stable stand-in for a customer's email address.
pub fn email_hash(customer_id: RowId) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("customer_{customer_id}@example.com").as_bytes());
    hex::encode(hasher.finalize())
}

pub struct CustomerSynthesizer<'a> {
    channels: &'a ChannelTable,
    max_customers: usize,
}

impl<'a> CustomerSynthesizer<'a> {
    pub fn new(channels: &'a ChannelTable, max_customers: usize) -> Self {
        Self {
            channels,
            max_customers,
        }
    }

    pub fn generate(
        &self,
        campaigns: &[Campaign],
        performance: &[DailyPerformance],
        rng: &mut SimRng,
        ids: &mut IdSequence,
    ) -> SimResult<Vec<Customer>> {
        let mut customers = Vec::new();
        if self.max_customers == 0 {
            return Ok(customers);
        }

        let by_id: HashMap<RowId, &Campaign> =
            campaigns.iter().map(|c| (c.campaign_id, c)).collect();

        for record in performance.iter().filter(|r| r.conversions > 0) {
            let campaign = by_id
                .get(&record.campaign_id)
                .ok_or(SimError::UnknownCampaign {
                    campaign_id: record.campaign_id,
                })?;
            let profile = self.channels.get(&campaign.channel)?;

            for _ in 0..record.conversions {
                let first_order_value =
                    round2(profile.avg_aov * rng.uniform(FIRST_ORDER_RANGE.0, FIRST_ORDER_RANGE.1));
                let customer_id = ids.next_id();
                customers.push(Customer {
                    customer_id,
                    acquisition_date: record.date,
                    campaign_id: campaign.campaign_id,
                    channel: campaign.channel.clone(),
                    first_order_value,
                    customer_segment: CustomerSegment::from_first_order(first_order_value),
                    email_hash: email_hash(customer_id),
                });

                if customers.len() >= self.max_customers {
                    log::info!(
                        "customer: cap of {} reached at campaign {} on {}",
                        self.max_customers,
                        campaign.campaign_id,
                        record.date
                    );
                    return Ok(customers);
                }
            }
        }

        log::info!("customer: generated {} customers", customers.len());
        Ok(customers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn segment_thresholds() {
        assert_eq!(CustomerSegment::from_first_order(120.0), CustomerSegment::HighValue);
        assert_eq!(CustomerSegment::from_first_order(100.0), CustomerSegment::HighValue);
        assert_eq!(CustomerSegment::from_first_order(52.0), CustomerSegment::MediumValue);
        assert_eq!(CustomerSegment::from_first_order(50.0), CustomerSegment::MediumValue);
        assert_eq!(CustomerSegment::from_first_order(40.0), CustomerSegment::LowValue);
        assert_eq!(CustomerSegment::from_first_order(49.99), CustomerSegment::LowValue);
    }

    #[test]
    fn segment_names_round_trip() {
        for seg in [
            CustomerSegment::HighValue,
            CustomerSegment::MediumValue,
            CustomerSegment::LowValue,
        ] {
            assert_eq!(CustomerSegment::parse(seg.as_str()), Some(seg));
        }
        assert_eq!(CustomerSegment::parse("vip"), None);
    }

    #[test]
    fn email_hash_is_hex_sha256() {
        let h = email_hash(1);
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(h, email_hash(1));
        assert_ne!(h, email_hash(2));
    }

    #[test]
    fn dangling_campaign_reference_is_an_error() {
        let channels = ChannelTable::default();
        let perf = vec![DailyPerformance {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            campaign_id: 99,
            impressions: 1_000,
            clicks: 30,
            conversions: 2,
            spend: 10.0,
            revenue: 150.0,
        }];
        let mut rng = SimRng::new(1, 0);
        let mut ids = IdSequence::new();
        let err = CustomerSynthesizer::new(&channels, 10)
            .generate(&[], &perf, &mut rng, &mut ids)
            .unwrap_err();
        assert!(matches!(err, SimError::UnknownCampaign { campaign_id: 99 }));
    }
}
