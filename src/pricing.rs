//! Static per-model pricing.
//!
//! Prices are USD per one million tokens and are chosen by model family. Anything that is
//! not recognisably Opus or Haiku is billed at Sonnet rates, which is also what most
//! Claude Code traffic uses.

use serde::{Deserialize, Serialize};

const TOKENS_PER_PRICE_UNIT: f64 = 1_000_000.0;

/// Price vector for one model family, USD per 1M tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPrices {
    pub input: f64,
    pub output: f64,
    pub cache_read: f64,
    pub cache_create: f64,
}

pub const OPUS_PRICES: ModelPrices = ModelPrices {
    input: 15.0,
    output: 75.0,
    cache_read: 1.50,
    cache_create: 18.75,
};

pub const HAIKU_PRICES: ModelPrices = ModelPrices {
    input: 0.80,
    output: 4.0,
    cache_read: 0.08,
    cache_create: 1.0,
};

pub const SONNET_PRICES: ModelPrices = ModelPrices {
    input: 3.0,
    output: 15.0,
    cache_read: 0.30,
    cache_create: 3.75,
};

/// Case-insensitive substring test on a model identifier.
///
/// Both the pricing lookup and the Sonnet-only weekly window go through this.
pub fn model_matches(model: &str, family: &str) -> bool {
    model.to_lowercase().contains(&family.to_lowercase())
}

pub struct PricingTable;

impl PricingTable {
    pub fn prices(model: &str) -> ModelPrices {
        if model_matches(model, "opus") {
            OPUS_PRICES
        } else if model_matches(model, "haiku") {
            HAIKU_PRICES
        } else {
            SONNET_PRICES
        }
    }

    /// Cost in USD of one request. Not rounded.
    pub fn cost(
        model: &str,
        input_tokens: u64,
        output_tokens: u64,
        cache_read_tokens: u64,
        cache_create_tokens: u64,
    ) -> f64 {
        let prices = Self::prices(model);
        (input_tokens as f64 * prices.input
            + output_tokens as f64 * prices.output
            + cache_read_tokens as f64 * prices.cache_read
            + cache_create_tokens as f64 * prices.cache_create)
            / TOKENS_PER_PRICE_UNIT
    }
}
