//! Extraction of relative time windows from free-form query text.
//!
//! Only the narrow "last N <unit>" family is recognized; anything else is
//! the generation model's job to reason about. Parsing never fails: bad
//! input degrades to "no temporal filter".

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::domain::models::{TemporalWindow, TimeUnit};

static TEMPORAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\blast\s+(\d+)\s+(hour|day|week|month)s?\b").expect("temporal pattern compiles")
});

/// Extract a time window from `text`, matching case-insensitively.
///
/// The first match wins. `N` must be a positive integer; zero or an
/// unparsable number is treated as no match and logged, never raised.
pub fn parse_temporal_window(text: &str) -> Option<TemporalWindow> {
    let lowered = text.to_lowercase();
    let captures = TEMPORAL_PATTERN.captures(&lowered)?;

    let amount: u32 = match captures[1].parse() {
        Ok(n) => n,
        Err(err) => {
            warn!(raw = &captures[1], %err, "temporal amount did not parse, skipping filter");
            return None;
        }
    };
    if amount == 0 {
        warn!("temporal amount must be positive, skipping filter");
        return None;
    }

    // The unit alternation is fixed in the pattern, so this always resolves.
    let unit = TimeUnit::from_name(&captures[2])?;

    let window = TemporalWindow::last(amount, unit);
    debug!(lower_bound = %window.lower_bound, "parsed temporal filter");
    Some(window)
}
