//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

use crate::cache::{CacheStats, CoordinatorStats};

/// Format data as a table
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return "No results found.".to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

/// One counter in the `--stats` table
#[derive(Debug, Tabled)]
pub struct StatRow {
    #[tabled(rename = "COUNTER")]
    pub name: &'static str,
    #[tabled(rename = "VALUE")]
    pub value: u64,
}

/// Rows describing coordinator activity and cache contents
pub fn stats_rows(stats: &CoordinatorStats, cache: &CacheStats) -> Vec<StatRow> {
    let row = |name, value| StatRow { name, value };
    vec![
        row("cache hits", stats.hits),
        row("network fetches", stats.fetches),
        row("joined in-flight", stats.joins),
        row("failed fetches", stats.failures),
        row("wait timeouts", stats.timeouts),
        row("cancellations", stats.cancellations),
        row("per-key locks", stats.locks as u64),
        row("in-flight requests", stats.in_flight as u64),
        row("cached entries", cache.valid_entries as u64),
        row("expired entries", cache.expired_entries as u64),
    ]
}
