//! The generation pipeline.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Campaign generator
//!   2. Daily performance simulator
//!   3. Customer acquisition synthesizer
//!   4. Transaction history synthesizer
//!   5. A/B test synthesizer
//!
//! RULES:
//!   - Each stage fully materializes its table before the next starts.
//!   - Stages read only tables produced by earlier stages.
//!   - Every stage draws from the one Generation stream, in this order.
//!     The A/B stage branches off the campaign roster but still runs
//!     last so its draws follow the transaction draws.
//!   - Campaign selection for A/B tests uses the AbSampling stream only.

use crate::{
    ab_test_synthesizer::{AbTestRecord, AbTestSynthesizer},
    campaign_generator::{Campaign, CampaignGenerator},
    config::GeneratorConfig,
    customer_synthesizer::{Customer, CustomerSynthesizer},
    error::SimResult,
    performance_simulator::{DailyPerformance, PerformanceSimulator},
    rng::{RngBank, StreamSlot},
    sequence::Sequences,
    summary::DatasetSummary,
    transaction_synthesizer::{Transaction, TransactionSynthesizer},
};
use serde::{Deserialize, Serialize};

/// Every table produced by one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    pub campaigns: Vec<Campaign>,
    pub daily_performance: Vec<DailyPerformance>,
    pub customers: Vec<Customer>,
    pub transactions: Vec<Transaction>,
    pub ab_tests: Vec<AbTestRecord>,
}

impl Dataset {
    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary::of(self)
    }
}

pub struct Pipeline {
    config:    GeneratorConfig,
    rng_bank:  RngBank,
    sequences: Sequences,
}

impl Pipeline {
    pub fn new(config: GeneratorConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            rng_bank: RngBank::new(config.seed, config.ab_sample_seed),
            sequences: Sequences::default(),
            config,
        })
    }

    /// Validate `config` and run every stage once.
    pub fn generate(config: GeneratorConfig) -> SimResult<Dataset> {
        Self::new(config)?.run()
    }

    /// Run all stages. Consumes the pipeline: sequences and streams are
    /// single-use, a second run would not start from ID 1.
    pub fn run(mut self) -> SimResult<Dataset> {
        let config = &self.config;
        log::info!(
            "pipeline: seed={} horizon={}..{} campaigns={} max_customers={}",
            config.seed,
            config.horizon.start,
            config.horizon.end,
            config.num_campaigns,
            config.max_customers
        );

        let mut rng = self.rng_bank.for_stream(StreamSlot::Generation);
        let mut sampler = self.rng_bank.for_stream(StreamSlot::AbSampling);
        let ids = &mut self.sequences;

        let campaigns = CampaignGenerator::new(config).generate(&mut rng, &mut ids.campaign);

        let daily_performance =
            PerformanceSimulator::new(&config.channels).generate(&campaigns, &mut rng)?;

        let customers = CustomerSynthesizer::new(&config.channels, config.max_customers)
            .generate(&campaigns, &daily_performance, &mut rng, &mut ids.customer)?;

        let transactions = TransactionSynthesizer::new(config.horizon.end)
            .generate(&customers, &mut rng, &mut ids.transaction);

        let ab_tests = AbTestSynthesizer::new(&config.channels, config.ab_test_fraction)
            .generate(&campaigns, &mut sampler, &mut rng, &mut ids.test)?;

        let dataset = Dataset {
            campaigns,
            daily_performance,
            customers,
            transactions,
            ab_tests,
        };
        log::debug!("pipeline: sequences at end of run {:?}", self.sequences);
        Ok(dataset)
    }
}
