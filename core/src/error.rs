use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Channel '{channel}' not found in channel profile table")]
    UnknownChannel { channel: String },

    #[error("Campaign {campaign_id} not found")]
    UnknownCampaign { campaign_id: u64 },

    #[error("Customer {customer_id} not found")]
    UnknownCustomer { customer_id: u64 },

    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("Load failed at step '{step}': {source}")]
    LoadFailed {
        step: String,
        #[source]
        source: Box<SimError>,
    },

    #[error("Load cancelled: clearing existing data was not confirmed")]
    LoadCancelled,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
