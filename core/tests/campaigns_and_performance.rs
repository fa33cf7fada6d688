//! Campaign roster and daily performance, checked over whole runs.

use mktsim_core::{
    config::GeneratorConfig,
    horizon::each_day,
    performance_simulator::daily_budget,
    pipeline::{Dataset, Pipeline},
};
use std::collections::HashMap;

fn run(seed: u64) -> (GeneratorConfig, Dataset) {
    let config = GeneratorConfig {
        num_campaigns: 25,
        max_customers: 500,
        ..GeneratorConfig::default()
    }
    .with_seed(seed);
    let dataset = Pipeline::generate(config.clone()).expect("generate");
    (config, dataset)
}

#[test]
fn campaign_windows_respect_horizon() {
    for seed in [1, 2, 3] {
        let (config, d) = run(seed);
        for c in &d.campaigns {
            assert!(c.start_date <= c.end_date);
            assert!(c.end_date <= config.horizon.end);
            assert!(config.channels.get(&c.channel).is_ok());
        }
    }
}

#[test]
fn exactly_one_record_per_campaign_day() {
    let (_, d) = run(7);
    let mut per_campaign: HashMap<u64, Vec<_>> = HashMap::new();
    for r in &d.daily_performance {
        per_campaign.entry(r.campaign_id).or_default().push(r.date);
    }
    for c in &d.campaigns {
        let expected: Vec<_> = each_day(c.start_date, c.end_date).collect();
        assert_eq!(
            per_campaign.get(&c.campaign_id),
            Some(&expected),
            "campaign {} does not cover its window day by day",
            c.campaign_id
        );
    }
    let total_days: u64 = d.campaigns.iter().map(|c| c.length_days()).sum();
    assert_eq!(d.daily_performance.len() as u64, total_days);
}

#[test]
fn funnel_never_widens() {
    let (_, d) = run(13);
    for r in &d.daily_performance {
        assert!(
            r.conversions <= r.clicks && r.clicks <= r.impressions,
            "funnel violated on {} for campaign {}",
            r.date,
            r.campaign_id
        );
        assert!(r.spend >= 0.0);
        assert!(r.revenue >= 0.0);
    }
}

#[test]
fn spend_tracks_the_even_daily_split() {
    let (_, d) = run(17);
    let budgets: HashMap<u64, f64> = d
        .campaigns
        .iter()
        .map(|c| (c.campaign_id, daily_budget(c)))
        .collect();
    for r in &d.daily_performance {
        let per_day = budgets[&r.campaign_id];
        assert!(r.spend >= (per_day * 0.7 * 0.7 - 0.01));
        assert!(r.spend <= (per_day * 1.3 + 0.01));
    }
}

#[test]
fn weekends_spend_less_on_average() {
    use chrono::{Datelike, Weekday};
    let (_, d) = run(23);
    let budgets: HashMap<u64, f64> = d
        .campaigns
        .iter()
        .map(|c| (c.campaign_id, daily_budget(c)))
        .collect();
    let (mut weekend, mut weekday) = (Vec::new(), Vec::new());
    for r in &d.daily_performance {
        let ratio = r.spend / budgets[&r.campaign_id];
        match r.date.weekday() {
            Weekday::Sat | Weekday::Sun => weekend.push(ratio),
            _ => weekday.push(ratio),
        }
    }
    let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;
    assert!(mean(&weekend) < mean(&weekday) * 0.8);
}

#[test]
fn funnel_holds_at_the_highest_accepted_rates() {
    let mut config = GeneratorConfig {
        num_campaigns: 10,
        max_customers: 200,
        ..GeneratorConfig::default()
    };
    for profile in &mut config.channels.channels {
        profile.avg_ctr = 0.76;
        profile.avg_cvr = 0.76;
    }
    let d = Pipeline::generate(config).expect("rates at the variance ceiling are accepted");
    for r in &d.daily_performance {
        assert!(
            r.conversions <= r.clicks && r.clicks <= r.impressions,
            "funnel broken: {r:?}"
        );
    }
    for t in &d.ab_tests {
        assert!(t.conversions <= t.clicks && t.clicks <= t.impressions);
    }
}

#[test]
fn rates_that_break_the_funnel_are_refused_before_generation() {
    let mut config = GeneratorConfig::default_test();
    config.channels.channels[0].avg_ctr = 0.9;
    config.channels.channels[0].avg_cvr = 0.9;
    let err = Pipeline::generate(config).unwrap_err();
    assert!(matches!(err, mktsim_core::error::SimError::Config { .. }), "{err}");
}
