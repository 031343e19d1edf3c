//! Window aggregation.
//!
//! Reduces a slice of entries to a [`UsageWindow`]. The same entry collection is
//! reduced against several floors, so the floor is applied here again even though the
//! scanner and parser already filtered on the loosest one.

use chrono::{DateTime, Utc};

use crate::models::{UsageEntry, UsageWindow};
use crate::pricing::PricingTable;

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub struct WindowAggregator;

impl WindowAggregator {
    pub fn aggregate<'a, I>(entries: I, since: DateTime<Utc>) -> UsageWindow
    where
        I: IntoIterator<Item = &'a UsageEntry>,
    {
        let mut window = UsageWindow::default();
        let mut total_cost = 0.0;

        for entry in entries {
            if entry.timestamp < since {
                continue;
            }
            window.entry_count += 1;

            match window.oldest_entry {
                Some(oldest) if entry.timestamp >= oldest => {}
                _ => window.oldest_entry = Some(entry.timestamp),
            }
            match window.newest_entry {
                Some(newest) if entry.timestamp <= newest => {}
                _ => window.newest_entry = Some(entry.timestamp),
            }

            let cost = PricingTable::cost(
                &entry.model,
                entry.input_tokens,
                entry.output_tokens,
                entry.cache_read_tokens,
                entry.cache_create_tokens,
            );
            total_cost += cost;
            window.tokens.add_entry(entry);

            let model_usage = window.by_model.entry(entry.model.clone()).or_default();
            model_usage.tokens.add_entry(entry);
            model_usage.cost_usd += cost;
        }

        window.total_cost_usd = round_to(total_cost, 3);
        window
    }
}
