//! Row mappings between generated records and SQLite tables.

use crate::{
    ab_test_synthesizer::{AbTestRecord, Variant},
    campaign_generator::Campaign,
    customer_synthesizer::{Customer, CustomerSegment},
    performance_simulator::DailyPerformance,
    table::Table,
    transaction_synthesizer::Transaction,
    types::{Day, DATE_FORMAT},
};
use rusqlite::{
    types::{FromSql, FromSqlError, FromSqlResult, Value, ValueRef},
    Row,
};

/// A record type that maps onto exactly one table.
pub trait Record: Sized {
    const TABLE: Table;
    /// Column names, in the order `values()` yields them and
    /// `from_row()` reads them.
    const COLUMNS: &'static [&'static str];
    const ORDER_BY: &'static str;

    fn values(&self) -> Vec<Value>;
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

fn day(d: Day) -> Value {
    Value::Text(d.format(DATE_FORMAT).to_string())
}

fn int(n: u64) -> Value {
    Value::Integer(n as i64)
}

fn id(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    Ok(row.get::<_, i64>(idx)? as u64)
}

impl FromSql for CustomerSegment {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        CustomerSegment::parse(s)
            .ok_or_else(|| FromSqlError::Other(format!("unknown customer segment '{s}'").into()))
    }
}

impl FromSql for Variant {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "control" => Ok(Variant::Control),
            "variant_a" => Ok(Variant::VariantA),
            "variant_b" => Ok(Variant::VariantB),
            other => Err(FromSqlError::Other(format!("unknown variant '{other}'").into())),
        }
    }
}

impl Record for Campaign {
    const TABLE: Table = Table::Campaigns;
    const COLUMNS: &'static [&'static str] = &[
        "campaign_id",
        "campaign_name",
        "channel",
        "start_date",
        "end_date",
        "budget",
        "target_audience",
    ];
    const ORDER_BY: &'static str = "campaign_id";

    fn values(&self) -> Vec<Value> {
        vec![
            int(self.campaign_id),
            Value::Text(self.campaign_name.clone()),
            Value::Text(self.channel.clone()),
            day(self.start_date),
            day(self.end_date),
            Value::Real(self.budget),
            Value::Text(self.target_audience.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Campaign {
            campaign_id: id(row, 0)?,
            campaign_name: row.get(1)?,
            channel: row.get(2)?,
            start_date: row.get(3)?,
            end_date: row.get(4)?,
            budget: row.get(5)?,
            target_audience: row.get(6)?,
        })
    }
}

impl Record for DailyPerformance {
    const TABLE: Table = Table::DailyPerformance;
    const COLUMNS: &'static [&'static str] = &[
        "date",
        "campaign_id",
        "impressions",
        "clicks",
        "conversions",
        "spend",
        "revenue",
    ];
    const ORDER_BY: &'static str = "campaign_id, date";

    fn values(&self) -> Vec<Value> {
        vec![
            day(self.date),
            int(self.campaign_id),
            int(self.impressions),
            int(self.clicks),
            int(self.conversions),
            Value::Real(self.spend),
            Value::Real(self.revenue),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(DailyPerformance {
            date: row.get(0)?,
            campaign_id: id(row, 1)?,
            impressions: id(row, 2)?,
            clicks: id(row, 3)?,
            conversions: id(row, 4)?,
            spend: row.get(5)?,
            revenue: row.get(6)?,
        })
    }
}

impl Record for Customer {
    const TABLE: Table = Table::Customers;
    const COLUMNS: &'static [&'static str] = &[
        "customer_id",
        "acquisition_date",
        "campaign_id",
        "channel",
        "first_order_value",
        "customer_segment",
        "email_hash",
    ];
    const ORDER_BY: &'static str = "customer_id";

    fn values(&self) -> Vec<Value> {
        vec![
            int(self.customer_id),
            day(self.acquisition_date),
            int(self.campaign_id),
            Value::Text(self.channel.clone()),
            Value::Real(self.first_order_value),
            Value::Text(self.customer_segment.as_str().to_string()),
            Value::Text(self.email_hash.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Customer {
            customer_id: id(row, 0)?,
            acquisition_date: row.get(1)?,
            campaign_id: id(row, 2)?,
            channel: row.get(3)?,
            first_order_value: row.get(4)?,
            customer_segment: row.get(5)?,
            email_hash: row.get(6)?,
        })
    }
}

impl Record for Transaction {
    const TABLE: Table = Table::Transactions;
    const COLUMNS: &'static [&'static str] = &[
        "transaction_id",
        "customer_id",
        "transaction_date",
        "order_value",
        "products_purchased",
        "discount_applied",
    ];
    const ORDER_BY: &'static str = "transaction_id";

    fn values(&self) -> Vec<Value> {
        vec![
            int(self.transaction_id),
            int(self.customer_id),
            day(self.transaction_date),
            Value::Real(self.order_value),
            int(self.products_purchased),
            Value::Real(self.discount_applied),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Transaction {
            transaction_id: id(row, 0)?,
            customer_id: id(row, 1)?,
            transaction_date: row.get(2)?,
            order_value: row.get(3)?,
            products_purchased: id(row, 4)?,
            discount_applied: row.get(5)?,
        })
    }
}

impl Record for AbTestRecord {
    const TABLE: Table = Table::AbTests;
    const COLUMNS: &'static [&'static str] = &[
        "test_id",
        "campaign_id",
        "test_name",
        "variant",
        "start_date",
        "end_date",
        "impressions",
        "clicks",
        "conversions",
        "statistical_significance",
        "p_value",
    ];
    const ORDER_BY: &'static str = "test_id";

    fn values(&self) -> Vec<Value> {
        vec![
            int(self.test_id),
            int(self.campaign_id),
            Value::Text(self.test_name.clone()),
            Value::Text(self.variant.as_str().to_string()),
            day(self.start_date),
            day(self.end_date),
            int(self.impressions),
            int(self.clicks),
            int(self.conversions),
            Value::Integer(self.statistical_significance as i64),
            Value::Real(self.p_value),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(AbTestRecord {
            test_id: id(row, 0)?,
            campaign_id: id(row, 1)?,
            test_name: row.get(2)?,
            variant: row.get(3)?,
            start_date: row.get(4)?,
            end_date: row.get(5)?,
            impressions: id(row, 6)?,
            clicks: id(row, 7)?,
            conversions: id(row, 8)?,
            statistical_significance: row.get(9)?,
            p_value: row.get(10)?,
        })
    }
}
