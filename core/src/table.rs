//! The five output tables and their fixed orderings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Campaigns,
    DailyPerformance,
    Customers,
    Transactions,
    AbTests,
}

impl Table {
    /// Parents before children, so foreign keys always resolve.
    pub const LOAD_ORDER: [Table; 5] = [
        Table::Campaigns,
        Table::DailyPerformance,
        Table::Customers,
        Table::Transactions,
        Table::AbTests,
    ];

    /// Children before parents.
    pub const CLEAR_ORDER: [Table; 5] = [
        Table::AbTests,
        Table::Transactions,
        Table::Customers,
        Table::DailyPerformance,
        Table::Campaigns,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Campaigns => "campaigns",
            Self::DailyPerformance => "daily_performance",
            Self::Customers => "customers",
            Self::Transactions => "transactions",
            Self::AbTests => "ab_tests",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.csv", self.name())
    }

    /// Column the date-range filter applies to.
    pub fn date_column(&self) -> &'static str {
        match self {
            Self::Campaigns | Self::AbTests => "start_date",
            Self::DailyPerformance => "date",
            Self::Customers => "acquisition_date",
            Self::Transactions => "transaction_date",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
