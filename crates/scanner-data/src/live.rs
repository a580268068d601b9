//! Live market data over the brokerage HTTP API.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use scanner_core::error::DataError;
use scanner_core::traits::MarketDataSource;
use scanner_core::types::Candle;

/// Live data source configuration.
#[derive(Debug, Clone)]
pub struct LiveConfig {
    pub base_url: String,
    pub api_key: String,
    /// Candle interval identifier, e.g. "5minute"
    pub interval: String,
}

impl LiveConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            interval: "5minute".to_string(),
        }
    }
}

/// Candle rows come back as `[timestamp_ms, open, high, low, close, volume]`.
#[derive(Debug, Deserialize)]
struct CandleResponse {
    candles: Vec<(i64, f64, f64, f64, f64, f64)>,
}

/// Brokerage candle-fetch client.
pub struct LiveDataSource {
    config: LiveConfig,
    client: Client,
}

impl LiveDataSource {
    pub fn new(config: LiveConfig) -> Result<Self, DataError> {
        let mut headers = header::HeaderMap::new();
        let auth = header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| DataError::Unavailable(e.to_string()))?;
        headers.insert(header::AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| DataError::NetworkError(e.to_string()))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl MarketDataSource for LiveDataSource {
    async fn fetch_candles(&self, symbol: &str, count: usize) -> Result<Vec<Candle>, DataError> {
        let url = format!("{}/v1/historical/candles", self.config.base_url);
        debug!(symbol, count, "fetching live candles");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("interval", &self.config.interval),
                ("count", &count.to_string()),
            ])
            .send()
            .await
            .map_err(|e| DataError::NetworkError(e.to_string()))?;

        match resp.status() {
            StatusCode::NOT_FOUND => {
                return Err(DataError::SymbolNotFound(symbol.to_string()));
            }
            status if !status.is_success() => {
                return Err(DataError::Unavailable(format!(
                    "candle endpoint returned {}",
                    status
                )));
            }
            _ => {}
        }

        let body: CandleResponse = resp
            .json()
            .await
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        Ok(body
            .candles
            .into_iter()
            .map(|(timestamp, open, high, low, close, volume)| {
                Candle::new(timestamp, open, high, low, close, volume)
            })
            .collect())
    }

    fn name(&self) -> &str {
        "live"
    }
}
