//! CSV interchange files.
//!
//! One file per table, header row equal to the record's field names,
//! dates as `YYYY-MM-DD`. `summary.json` is written alongside but never
//! read back.

use crate::{error::SimResult, pipeline::Dataset, table::Table};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

pub const SUMMARY_FILE: &str = "summary.json";

pub fn write_dataset(dir: &Path, dataset: &Dataset) -> SimResult<()> {
    std::fs::create_dir_all(dir)?;
    write_table(dir, Table::Campaigns, &dataset.campaigns)?;
    write_table(dir, Table::DailyPerformance, &dataset.daily_performance)?;
    write_table(dir, Table::Customers, &dataset.customers)?;
    write_table(dir, Table::Transactions, &dataset.transactions)?;
    write_table(dir, Table::AbTests, &dataset.ab_tests)?;
    std::fs::write(dir.join(SUMMARY_FILE), dataset.summary().to_json()?)?;
    log::info!("interchange: wrote dataset to {}", dir.display());
    Ok(())
}

pub fn read_dataset(dir: &Path) -> SimResult<Dataset> {
    let dataset = Dataset {
        campaigns: read_table(dir, Table::Campaigns)?,
        daily_performance: read_table(dir, Table::DailyPerformance)?,
        customers: read_table(dir, Table::Customers)?,
        transactions: read_table(dir, Table::Transactions)?,
        ab_tests: read_table(dir, Table::AbTests)?,
    };
    log::info!("interchange: read dataset from {}", dir.display());
    Ok(dataset)
}

pub fn write_table<T: Serialize>(dir: &Path, table: Table, rows: &[T]) -> SimResult<()> {
    let path = dir.join(table.file_name());
    let mut writer = csv::Writer::from_path(&path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    log::debug!("interchange: {} rows -> {}", rows.len(), path.display());
    Ok(())
}

pub fn read_table<T: DeserializeOwned>(dir: &Path, table: Table) -> SimResult<Vec<T>> {
    let path = dir.join(table.file_name());
    let mut reader = csv::Reader::from_path(&path)?;
    let rows = reader.deserialize().collect::<Result<Vec<T>, _>>()?;
    log::debug!("interchange: {} rows <- {}", rows.len(), path.display());
    Ok(rows)
}
