//! Bulk load of a generated dataset into the persistence store.
//!
//! RULES:
//!   - Tables load parents first (Table::LOAD_ORDER).
//!   - The first failure stops the load. Tables already written stay
//!     written; later tables are reported as not attempted.
//!   - Clearing existing data is destructive and only happens after the
//!     ConfirmGate says yes. A "no" cancels the whole load.

use crate::{
    config::BatchSizes,
    error::{SimError, SimResult},
    pipeline::Dataset,
    store::{Record, RowStore},
    table::Table,
};
use std::fmt;

/// Asks a human (or a test) before a destructive operation.
pub trait ConfirmGate {
    fn confirm(&mut self, prompt: &str) -> bool;
}

pub struct AlwaysConfirm;

impl ConfirmGate for AlwaysConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

pub struct NeverConfirm;

impl ConfirmGate for NeverConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStep {
    Clear,
    Table(Table),
}

impl fmt::Display for LoadStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clear => f.write_str("clear"),
            Self::Table(t) => write!(f, "{t}"),
        }
    }
}

#[derive(Debug)]
pub enum StepStatus {
    Done { rows: usize, batches: usize },
    Failed { rows_written: usize, error: SimError },
    NotAttempted,
}

#[derive(Debug)]
pub struct StepReport {
    pub step: LoadStep,
    pub status: StepStatus,
}

#[derive(Debug, Default)]
pub struct LoadReport {
    pub cancelled: bool,
    pub steps: Vec<StepReport>,
}

impl LoadReport {
    pub fn is_success(&self) -> bool {
        !self.cancelled
            && self
                .steps
                .iter()
                .all(|s| matches!(s.status, StepStatus::Done { .. }))
    }

    pub fn failed_step(&self) -> Option<LoadStep> {
        self.steps
            .iter()
            .find(|s| matches!(s.status, StepStatus::Failed { .. }))
            .map(|s| s.step)
    }

    pub fn status_of(&self, step: LoadStep) -> Option<&StepStatus> {
        self.steps.iter().find(|s| s.step == step).map(|s| &s.status)
    }

    /// Turn the report into the crate error for the first failed step.
    pub fn into_result(self) -> SimResult<()> {
        if self.cancelled {
            return Err(SimError::LoadCancelled);
        }
        for report in self.steps {
            if let StepStatus::Failed { error, .. } = report.status {
                return Err(SimError::LoadFailed {
                    step: report.step.to_string(),
                    source: Box::new(error),
                });
            }
        }
        Ok(())
    }
}

pub struct Loader {
    batch_sizes: BatchSizes,
    clear_first: bool,
}

impl Loader {
    pub fn new(batch_sizes: BatchSizes) -> Self {
        Self {
            batch_sizes,
            clear_first: false,
        }
    }

    pub fn clear_first(mut self, clear: bool) -> Self {
        self.clear_first = clear;
        self
    }

    pub fn load<S: RowStore, G: ConfirmGate>(
        &self,
        dataset: &Dataset,
        store: &S,
        gate: &mut G,
    ) -> LoadReport {
        let mut report = LoadReport::default();

        if self.clear_first {
            if !gate.confirm("This will delete all existing data. Are you sure you want to continue?") {
                log::warn!("loader: clearing not confirmed, load cancelled");
                report.cancelled = true;
                return report;
            }
            match store.clear_all() {
                Ok(()) => report.steps.push(StepReport {
                    step: LoadStep::Clear,
                    status: StepStatus::Done { rows: 0, batches: 0 },
                }),
                Err(error) => {
                    log::error!("loader: clearing existing data failed: {error}");
                    report.steps.push(StepReport {
                        step: LoadStep::Clear,
                        status: StepStatus::Failed {
                            rows_written: 0,
                            error,
                        },
                    });
                    mark_not_attempted(&mut report, &Table::LOAD_ORDER);
                    return report;
                }
            }
        }

        for (i, table) in Table::LOAD_ORDER.iter().enumerate() {
            let status = match table {
                Table::Campaigns => load_table(store, &dataset.campaigns, self.batch_sizes.campaigns),
                Table::DailyPerformance => load_table(
                    store,
                    &dataset.daily_performance,
                    self.batch_sizes.daily_performance,
                ),
                Table::Customers => load_table(store, &dataset.customers, self.batch_sizes.customers),
                Table::Transactions => {
                    load_table(store, &dataset.transactions, self.batch_sizes.transactions)
                }
                Table::AbTests => load_table(store, &dataset.ab_tests, self.batch_sizes.ab_tests),
            };
            let failed = matches!(status, StepStatus::Failed { .. });
            report.steps.push(StepReport {
                step: LoadStep::Table(*table),
                status,
            });
            if failed {
                mark_not_attempted(&mut report, &Table::LOAD_ORDER[i + 1..]);
                return report;
            }
        }

        log::info!("loader: all tables loaded");
        report
    }
}

fn load_table<S: RowStore, R: Record>(store: &S, rows: &[R], batch_size: usize) -> StepStatus {
    let mut written = 0;
    let mut batches = 0;
    for batch in rows.chunks(batch_size.max(1)) {
        match store.insert_rows(batch) {
            Ok(n) => {
                written += n;
                batches += 1;
                log::debug!("loader: {} inserted {n} rows ({written}/{})", R::TABLE, rows.len());
            }
            Err(error) => {
                log::error!(
                    "loader: {} failed after {written} of {} rows: {error}",
                    R::TABLE,
                    rows.len()
                );
                return StepStatus::Failed {
                    rows_written: written,
                    error,
                };
            }
        }
    }
    log::info!("loader: imported {written} rows into {}", R::TABLE);
    StepStatus::Done {
        rows: written,
        batches,
    }
}

fn mark_not_attempted(report: &mut LoadReport, tables: &[Table]) {
    for table in tables {
        report.steps.push(StepReport {
            step: LoadStep::Table(*table),
            status: StepStatus::NotAttempted,
        });
    }
}
