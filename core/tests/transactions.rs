//! Transaction history over full pipeline runs.

use mktsim_core::{
    config::GeneratorConfig,
    customer_synthesizer::CustomerSegment,
    pipeline::{Dataset, Pipeline},
    transaction_synthesizer::{RepeatProfile, Transaction, DISCOUNT_CHOICES},
};
use std::collections::HashMap;

fn run(seed: u64) -> (GeneratorConfig, Dataset) {
    let config = GeneratorConfig {
        num_campaigns: 12,
        max_customers: 1_500,
        ..GeneratorConfig::default()
    }
    .with_seed(seed);
    let d = Pipeline::generate(config.clone()).expect("generate");
    (config, d)
}

fn by_customer(d: &Dataset) -> HashMap<u64, Vec<&Transaction>> {
    let mut map: HashMap<u64, Vec<&Transaction>> = HashMap::new();
    for t in &d.transactions {
        map.entry(t.customer_id).or_default().push(t);
    }
    map
}

#[test]
fn exactly_one_first_transaction_per_customer() {
    let (_, d) = run(42);
    let history = by_customer(&d);
    assert_eq!(history.len(), d.customers.len());
    for c in &d.customers {
        let firsts = history[&c.customer_id]
            .iter()
            .filter(|t| t.transaction_date == c.acquisition_date && t.discount_applied == 0.0)
            .count();
        assert_eq!(firsts, 1, "customer {} has {firsts} first transactions", c.customer_id);
        let first = history[&c.customer_id][0];
        assert_eq!(first.transaction_date, c.acquisition_date);
        assert_eq!(first.order_value, c.first_order_value);
    }
}

#[test]
fn repeat_dates_strictly_increase_inside_horizon() {
    let (config, d) = run(7);
    for txns in by_customer(&d).values() {
        for pair in txns.windows(2) {
            assert!(pair[0].transaction_date < pair[1].transaction_date);
        }
        for t in txns {
            assert!(t.transaction_date <= config.horizon.end);
        }
    }
}

#[test]
fn repeat_counts_respect_segment_ceiling() {
    let (_, d) = run(99);
    let history = by_customer(&d);
    for c in &d.customers {
        let profile = RepeatProfile::for_segment(c.customer_segment);
        let repeats = history[&c.customer_id].len() as u64 - 1;
        assert!(
            repeats <= profile.max_repeats,
            "{:?} customer {} made {repeats} repeats",
            c.customer_segment,
            c.customer_id
        );
    }
}

#[test]
fn high_value_customers_come_back_more() {
    let (_, d) = run(3);
    let history = by_customer(&d);
    let mean_repeats = |seg: CustomerSegment| {
        let counts: Vec<f64> = d
            .customers
            .iter()
            .filter(|c| c.customer_segment == seg)
            .map(|c| (history[&c.customer_id].len() - 1) as f64)
            .collect();
        counts.iter().sum::<f64>() / counts.len().max(1) as f64
    };
    let high = mean_repeats(CustomerSegment::HighValue);
    let low = mean_repeats(CustomerSegment::LowValue);
    assert!(high > low, "high={high:.2} low={low:.2}");
}

#[test]
fn discounts_come_from_the_menu() {
    let (_, d) = run(5);
    for t in &d.transactions {
        assert!(DISCOUNT_CHOICES.contains(&t.discount_applied));
    }
    let ids: Vec<u64> = d.transactions.iter().map(|t| t.transaction_id).collect();
    assert_eq!(ids, (1..=d.transactions.len() as u64).collect::<Vec<_>>());
}
