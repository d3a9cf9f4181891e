//! Remote deal model and query client
//!
//! Deals live in a hosted Postgres exposed through a PostgREST-style API.
//! The client reads the full `mydeals` collection ranked by temperature,
//! and the model carries the temperature-level mapping used for display
//! badges.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the remote deals collection
const DEALS_TABLE: &str = "mydeals";

/// Server-side ordering: hottest first, most recent first within a rank
const DEALS_ORDER: &str = "temperature.desc.nullslast,created_at.desc";

/// Environment variable holding the deals endpoint base URL
pub const DEALS_URL_VAR: &str = "QUICKNAV_DEALS_URL";

/// Environment variable holding the deals API key
pub const DEALS_KEY_VAR: &str = "QUICKNAV_DEALS_KEY";

/// A deal row from the remote `mydeals` collection
///
/// Every column except `id` and `created_at` is nullable; camelCase wire
/// names match the hosted schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    /// Server-assigned row id
    pub id: i64,
    /// When the deal was recorded
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub title: Option<String>,
    /// Community heat ranking; higher is hotter
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default, rename = "referralLink")]
    pub referral_link: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, rename = "detailPageUrl")]
    pub detail_page_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Deal {
    /// Temperature level for this deal; a missing temperature counts as 0
    pub fn temperature_level(&self) -> TemperatureLevel {
        TemperatureLevel::from_temperature(self.temperature.unwrap_or(0.0))
    }
}

/// Display bucket for a deal's temperature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureLevel {
    Cold,
    Warm,
    Hot,
    Fire,
}

impl TemperatureLevel {
    /// Maps a raw temperature to its display bucket
    pub fn from_temperature(temperature: f64) -> Self {
        if temperature >= 500.0 {
            TemperatureLevel::Fire
        } else if temperature >= 250.0 {
            TemperatureLevel::Hot
        } else if temperature >= 100.0 {
            TemperatureLevel::Warm
        } else {
            TemperatureLevel::Cold
        }
    }

    /// Lowercase label for display
    pub fn label(&self) -> &'static str {
        match self {
            TemperatureLevel::Cold => "cold",
            TemperatureLevel::Warm => "warm",
            TemperatureLevel::Hot => "hot",
            TemperatureLevel::Fire => "fire",
        }
    }
}

/// Errors that can occur when fetching deals
#[derive(Debug, Error)]
pub enum DealsError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The query itself failed; carries the server's error message
    #[error("{0}")]
    Query(String),

    /// The response body was not a valid deal collection
    #[error("failed to parse deals response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint or API key environment variable is not set
    #[error("missing deals credentials: set {0}")]
    MissingCredentials(&'static str),
}

/// A source of deal collections
///
/// One attempt per invocation; retry policy is the caller's concern.
#[allow(async_fn_in_trait)]
pub trait DealsSource {
    async fn fetch_deals(&self) -> Result<Vec<Deal>, DealsError>;
}

/// Shape of a PostgREST error body
#[derive(Debug, Deserialize)]
struct QueryErrorBody {
    message: String,
}

/// Client reading the `mydeals` collection from a PostgREST-style endpoint
#[derive(Debug, Clone)]
pub struct DealsClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl DealsClient {
    /// Creates a new DealsClient for the given endpoint and API key
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Creates a client from the `QUICKNAV_DEALS_URL` and `QUICKNAV_DEALS_KEY`
    /// environment variables
    pub fn from_env() -> Result<Self, DealsError> {
        let base_url =
            std::env::var(DEALS_URL_VAR).map_err(|_| DealsError::MissingCredentials(DEALS_URL_VAR))?;
        let api_key =
            std::env::var(DEALS_KEY_VAR).map_err(|_| DealsError::MissingCredentials(DEALS_KEY_VAR))?;
        Ok(Self::new(base_url, api_key))
    }
}

impl DealsSource for DealsClient {
    /// Reads all columns of `mydeals`, ordered by temperature then recency
    ///
    /// A non-2xx response carrying a structured error body (`{"message":
    /// ...}`) is surfaced as `DealsError::Query` with that message; other
    /// non-2xx responses fall back to the status line.
    async fn fetch_deals(&self) -> Result<Vec<Deal>, DealsError> {
        let url = format!("{}/rest/v1/{}", self.base_url, DEALS_TABLE);

        let response = self
            .client
            .get(&url)
            .query(&[("select", "*"), ("order", DEALS_ORDER)])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<QueryErrorBody>(&text)
                .map(|body| body.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(DealsError::Query(message));
        }

        Ok(serde_json::from_str(&text)?)
    }
}
