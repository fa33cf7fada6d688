//! Run summary: row counts and headline spend/revenue figures,
//! written next to the interchange files as `summary.json`.

use crate::pipeline::Dataset;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetSummary {
    pub campaigns: usize,
    pub daily_performance: usize,
    pub customers: usize,
    pub transactions: usize,
    pub ab_tests: usize,
    pub total_spend: f64,
    pub total_revenue: f64,
    /// Revenue over spend; zero when nothing was spent.
    pub overall_roas: f64,
}

impl DatasetSummary {
    pub fn of(dataset: &Dataset) -> Self {
        let total_spend: f64 = dataset.daily_performance.iter().map(|r| r.spend).sum();
        let total_revenue: f64 = dataset.daily_performance.iter().map(|r| r.revenue).sum();
        let overall_roas = if total_spend > 0.0 {
            total_revenue / total_spend
        } else {
            0.0
        };
        Self {
            campaigns: dataset.campaigns.len(),
            daily_performance: dataset.daily_performance.len(),
            customers: dataset.customers.len(),
            transactions: dataset.transactions.len(),
            ab_tests: dataset.ab_tests.len(),
            total_spend,
            total_revenue,
            overall_roas,
        }
    }

    pub fn to_json(&self) -> crate::error::SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_dataset_has_zero_roas() {
        let s = DatasetSummary::of(&Dataset::default());
        assert_eq!(s.overall_roas, 0.0);
        assert_eq!(s.customers, 0);
        assert!(s.to_json().unwrap().contains("\"overall_roas\""));
    }
}
