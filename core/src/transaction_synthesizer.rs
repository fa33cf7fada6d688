//! Transaction history.
//!
//! Each customer gets one first transaction on the acquisition date,
//! then up to `repeat_count` repeat attempts. An attempt succeeds with
//! the segment's continuation probability; a success lands 7–60 days
//! after the previous purchase. The first repeat date that falls past
//! the horizon ends that customer's history.
//!
//! Draw order per customer (fixed): repeat count, first-order product
//! count, then per attempt: continuation roll, and on success gap days,
//! order value, discount, product count.

use crate::{
    customer_synthesizer::{Customer, CustomerSegment},
    rng::SimRng,
    sequence::IdSequence,
    types::{round2, Day, RowId},
};
use chrono::Days;
use serde::{Deserialize, Serialize};

/// Weighted discount menu: three-in-seven chance of no discount.
pub const DISCOUNT_CHOICES: [f64; 7] = [0.0, 0.0, 0.0, 5.0, 10.0, 15.0, 20.0];
pub const REPEAT_GAP_DAYS: (u64, u64) = (7, 60);
pub const REPEAT_VALUE_RANGE: (f64, f64) = (0.7, 1.1);
pub const FIRST_ORDER_PRODUCTS: (u64, u64) = (1, 5);
pub const REPEAT_ORDER_PRODUCTS: (u64, u64) = (1, 4);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub transaction_id: RowId,
    pub customer_id: RowId,
    pub transaction_date: Day,
    pub order_value: f64,
    pub products_purchased: u64,
    pub discount_applied: f64,
}

/// Repeat-purchase behaviour for one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepeatProfile {
    pub min_repeats: u64,
    pub max_repeats: u64,
    pub continuation_probability: f64,
}

impl RepeatProfile {
    pub fn for_segment(segment: CustomerSegment) -> Self {
        let (min_repeats, max_repeats, continuation_probability) = match segment {
            CustomerSegment::HighValue => (2, 8, 0.7),
            CustomerSegment::MediumValue => (1, 4, 0.5),
            CustomerSegment::LowValue => (0, 2, 0.3),
        };
        Self {
            min_repeats,
            max_repeats,
            continuation_probability,
        }
    }
}

pub struct TransactionSynthesizer {
    horizon_end: Day,
}

impl TransactionSynthesizer {
    pub fn new(horizon_end: Day) -> Self {
        Self { horizon_end }
    }

    pub fn generate(
        &self,
        customers: &[Customer],
        rng: &mut SimRng,
        ids: &mut IdSequence,
    ) -> Vec<Transaction> {
        let mut transactions = Vec::with_capacity(customers.len() * 2);
        for customer in customers {
            self.history_for(customer, rng, ids, &mut transactions);
        }
        log::info!(
            "transaction: generated {} transactions for {} customers",
            transactions.len(),
            customers.len()
        );
        transactions
    }

    fn history_for(
        &self,
        customer: &Customer,
        rng: &mut SimRng,
        ids: &mut IdSequence,
        out: &mut Vec<Transaction>,
    ) {
        let profile = RepeatProfile::for_segment(customer.customer_segment);
        let repeat_count = rng.int_inclusive(profile.min_repeats, profile.max_repeats);

        out.push(Transaction {
            transaction_id: ids.next_id(),
            customer_id: customer.customer_id,
            transaction_date: customer.acquisition_date,
            order_value: customer.first_order_value,
            products_purchased: rng.int_inclusive(FIRST_ORDER_PRODUCTS.0, FIRST_ORDER_PRODUCTS.1),
            discount_applied: 0.0,
        });

        let mut last_purchase = customer.acquisition_date;
        for _ in 0..repeat_count {
            if !rng.chance(profile.continuation_probability) {
                continue;
            }
            let gap = rng.int_inclusive(REPEAT_GAP_DAYS.0, REPEAT_GAP_DAYS.1);
            let next_purchase = last_purchase + Days::new(gap);
            if next_purchase > self.horizon_end {
                break;
            }

            let order_value = round2(
                customer.first_order_value * rng.uniform(REPEAT_VALUE_RANGE.0, REPEAT_VALUE_RANGE.1),
            );
            let discount_applied = *rng.choose(&DISCOUNT_CHOICES);
            let products_purchased =
                rng.int_inclusive(REPEAT_ORDER_PRODUCTS.0, REPEAT_ORDER_PRODUCTS.1);

            out.push(Transaction {
                transaction_id: ids.next_id(),
                customer_id: customer.customer_id,
                transaction_date: next_purchase,
                order_value,
                products_purchased,
                discount_applied,
            });
            last_purchase = next_purchase;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn customer(id: RowId, value: f64, acquired: Day) -> Customer {
        Customer {
            customer_id: id,
            acquisition_date: acquired,
            campaign_id: 1,
            channel: "email".into(),
            first_order_value: value,
            customer_segment: CustomerSegment::from_first_order(value),
            email_hash: crate::customer_synthesizer::email_hash(id),
        }
    }

    #[test]
    fn repeat_profiles_match_segments() {
        let high = RepeatProfile::for_segment(CustomerSegment::HighValue);
        assert_eq!((high.min_repeats, high.max_repeats), (2, 8));
        assert_eq!(high.continuation_probability, 0.7);
        let low = RepeatProfile::for_segment(CustomerSegment::LowValue);
        assert_eq!((low.min_repeats, low.max_repeats), (0, 2));
    }

    #[test]
    fn customer_acquired_on_last_day_gets_only_first_purchase() {
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let customers: Vec<_> = (1..=50).map(|i| customer(i, 150.0, end)).collect();
        let mut rng = SimRng::new(8, 0);
        let mut ids = IdSequence::new();
        let txns = TransactionSynthesizer::new(end).generate(&customers, &mut rng, &mut ids);
        assert_eq!(txns.len(), 50);
        assert!(txns.iter().all(|t| t.discount_applied == 0.0 && t.transaction_date == end));
    }

    #[test]
    fn repeats_are_increasing_and_bounded() {
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let customers: Vec<_> = (1..=200).map(|i| customer(i, 40.0 + i as f64, start)).collect();
        let mut rng = SimRng::new(21, 0);
        let mut ids = IdSequence::new();
        let txns = TransactionSynthesizer::new(end).generate(&customers, &mut rng, &mut ids);

        for c in &customers {
            let mine: Vec<_> = txns.iter().filter(|t| t.customer_id == c.customer_id).collect();
            assert_eq!(mine[0].transaction_date, c.acquisition_date);
            assert_eq!(mine[0].order_value, c.first_order_value);
            assert!((1..=5).contains(&mine[0].products_purchased));
            for pair in mine.windows(2) {
                let gap = (pair[1].transaction_date - pair[0].transaction_date).num_days();
                assert!((7..=60).contains(&gap), "gap {gap}");
            }
            for t in &mine[1..] {
                assert!(t.transaction_date <= end);
                assert!(DISCOUNT_CHOICES.contains(&t.discount_applied));
                assert!((1..=4).contains(&t.products_purchased));
                assert!(t.order_value >= round2(c.first_order_value * 0.7));
                assert!(t.order_value <= round2(c.first_order_value * 1.1));
            }
        }
        let ids: Vec<_> = txns.iter().map(|t| t.transaction_id).collect();
        assert_eq!(ids, (1..=txns.len() as u64).collect::<Vec<_>>());
    }
}
