//! Narration-duration parsing, aggregation, and formatting.
//!
//! Durations travel through the pipeline as "1h 5m 30s"-style strings (any
//! subset of tokens); internally everything is summed as integer seconds and
//! only formatted back at the boundary.

use crate::Result;
use crate::types::ContentUnit;
use once_cell::sync::Lazy;
use regex::Regex;

static DURATION_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*([hms])").expect("duration token regex pattern is valid and should compile")
});

/// Returned when no unit carries a usable duration.
pub const UNKNOWN_DURATION: &str = "Unknown";

/// Returned when aggregation itself fails; a defensive boundary that should
/// not trigger from any input (malformed tokens parse to zero).
pub const CALCULATION_ERROR: &str = "Calculation Error";

/// Parse a duration string into total seconds.
///
/// All `<digits><h|m|s>` tokens found anywhere in the string contribute;
/// malformed or missing tokens contribute zero, never an error.
pub fn parse_duration_seconds(duration: &str) -> u64 {
    DURATION_TOKEN_RE
        .captures_iter(duration)
        .map(|caps| {
            let value: u64 = caps[1].parse().unwrap_or(0);
            match &caps[2] {
                "h" => value * 3600,
                "m" => value * 60,
                _ => value,
            }
        })
        .sum()
}

/// Format total seconds as "`<H>h <M>m <S>s`".
///
/// Hour and minute segments are omitted only when zero and no larger unit is
/// present; the seconds segment is always shown.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Sum the durations of all qualifying units into a formatted total.
///
/// A unit qualifies when it carries a non-empty duration string and is not
/// explicitly excluded. Returns [`UNKNOWN_DURATION`] when nothing qualifies
/// and [`CALCULATION_ERROR`] if the computation itself fails.
pub fn aggregate_durations(units: &[ContentUnit]) -> String {
    match try_aggregate(units) {
        Ok(Some(total_seconds)) => format_duration(total_seconds),
        Ok(None) => UNKNOWN_DURATION.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "duration aggregation failed");
            CALCULATION_ERROR.to_string()
        }
    }
}

fn try_aggregate(units: &[ContentUnit]) -> Result<Option<u64>> {
    let mut total: u64 = 0;
    let mut qualified = false;

    for unit in units {
        if !unit.classification.include {
            continue;
        }
        let Some(duration) = unit.estimated_duration.as_deref() else {
            continue;
        };
        if duration.trim().is_empty() {
            continue;
        }
        qualified = true;
        total = total.saturating_add(parse_duration_seconds(duration));
    }

    Ok(qualified.then_some(total))
}
