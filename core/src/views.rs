//! Joined views for downstream analysis.
//!
//! A child row whose parent is missing is a hard error, never dropped.

use crate::{
    campaign_generator::Campaign,
    customer_synthesizer::{Customer, CustomerSegment},
    error::{SimError, SimResult},
    performance_simulator::DailyPerformance,
    store::{DateRange, SimStore},
    transaction_synthesizer::Transaction,
    types::{Day, RowId},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Daily performance enriched with campaign attributes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelPerformanceRow {
    pub date: Day,
    pub campaign_id: RowId,
    pub campaign_name: String,
    pub channel: String,
    pub target_audience: String,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub spend: f64,
    pub revenue: f64,
}

/// A transaction enriched with its customer's acquisition attributes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerLtvRow {
    pub transaction_id: RowId,
    pub customer_id: RowId,
    pub transaction_date: Day,
    pub order_value: f64,
    pub products_purchased: u64,
    pub discount_applied: f64,
    pub acquisition_date: Day,
    pub channel: String,
    pub customer_segment: CustomerSegment,
    pub first_order_value: f64,
}

pub fn channel_performance(
    campaigns: &[Campaign],
    performance: &[DailyPerformance],
) -> SimResult<Vec<ChannelPerformanceRow>> {
    let by_id: HashMap<RowId, &Campaign> = campaigns.iter().map(|c| (c.campaign_id, c)).collect();
    performance
        .iter()
        .map(|p| -> SimResult<ChannelPerformanceRow> {
            let c = by_id.get(&p.campaign_id).ok_or(SimError::UnknownCampaign {
                campaign_id: p.campaign_id,
            })?;
            Ok(ChannelPerformanceRow {
                date: p.date,
                campaign_id: p.campaign_id,
                campaign_name: c.campaign_name.clone(),
                channel: c.channel.clone(),
                target_audience: c.target_audience.clone(),
                impressions: p.impressions,
                clicks: p.clicks,
                conversions: p.conversions,
                spend: p.spend,
                revenue: p.revenue,
            })
        })
        .collect()
}

pub fn customer_ltv(
    customers: &[Customer],
    transactions: &[Transaction],
) -> SimResult<Vec<CustomerLtvRow>> {
    let by_id: HashMap<RowId, &Customer> = customers.iter().map(|c| (c.customer_id, c)).collect();
    transactions
        .iter()
        .map(|t| -> SimResult<CustomerLtvRow> {
            let c = by_id.get(&t.customer_id).ok_or(SimError::UnknownCustomer {
                customer_id: t.customer_id,
            })?;
            Ok(CustomerLtvRow {
                transaction_id: t.transaction_id,
                customer_id: t.customer_id,
                transaction_date: t.transaction_date,
                order_value: t.order_value,
                products_purchased: t.products_purchased,
                discount_applied: t.discount_applied,
                acquisition_date: c.acquisition_date,
                channel: c.channel.clone(),
                customer_segment: c.customer_segment,
                first_order_value: c.first_order_value,
            })
        })
        .collect()
}

impl SimStore {
    /// Performance in `range` joined to every campaign.
    pub fn channel_performance(&self, range: DateRange) -> SimResult<Vec<ChannelPerformanceRow>> {
        let campaigns: Vec<Campaign> = self.all()?;
        let performance: Vec<DailyPerformance> = self.query(range)?;
        channel_performance(&campaigns, &performance)
    }

    /// Transactions in `range` joined to every customer.
    pub fn customer_ltv(&self, range: DateRange) -> SimResult<Vec<CustomerLtvRow>> {
        let customers: Vec<Customer> = self.all()?;
        let transactions: Vec<Transaction> = self.query(range)?;
        customer_ltv(&customers, &transactions)
    }
}
