//! Duration parsing utilities.
//!
//! This module parses human-readable timeout strings (like "500ms" or "5m")
//! into [`Duration`] values for the `--timeout` option and the config file.

use std::time::Duration;

use anyhow::Result;

/// Parse a human-readable duration string.
///
/// Supports integer values with an optional unit suffix. A plain number is
/// interpreted as seconds.
///
/// # Arguments
///
/// * `duration_str` - A string representing the duration (e.g., "500ms", "30s", "5m", "2h")
///
/// # Returns
///
/// - `Ok(Duration)` - The parsed duration
/// - `Err(anyhow::Error)` - If the string format is invalid or causes overflow
///
/// # Errors
///
/// This function will return an error if:
/// - The string is empty or the unit is unknown (e.g., "10x")
/// - The number is not a non-negative integer (e.g., "-5s", "1.5s")
/// - The resulting number of milliseconds would overflow `u64`
///
/// # Examples
///
/// ```
/// # use std::time::Duration;
/// # use dir_sizer::utils::parse_duration;
/// # use anyhow::Result;
/// # fn main() -> Result<()> {
/// assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
/// assert_eq!(parse_duration("30s")?, Duration::from_secs(30));
/// assert_eq!(parse_duration("5m")?, Duration::from_secs(300));
/// # Ok(())
/// # }
/// ```
///
/// # Supported Units
///
/// - `ms` (milliseconds), `s` (seconds), `m` (minutes), `h` (hours)
/// - Plain numbers are seconds
pub fn parse_duration(duration_str: &str) -> Result<Duration> {
    let duration_str = duration_str.trim().to_lowercase();
    let (number_str, multiplier) = parse_duration_unit(&duration_str);

    if number_str.is_empty() {
        return Err(anyhow::anyhow!("Missing number in duration: {duration_str}"));
    }

    let number: u64 = number_str
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid duration '{duration_str}': {e}"))?;

    let millis = number
        .checked_mul(multiplier)
        .ok_or_else(|| anyhow::anyhow!("Duration value overflow: {number} * {multiplier}ms"))?;

    Ok(Duration::from_millis(millis))
}

/// Parse an optional timeout, where zero means "no timeout".
///
/// # Errors
///
/// Same as [`parse_duration`].
pub fn parse_timeout(timeout_str: &str) -> Result<Option<Duration>> {
    let duration = parse_duration(timeout_str)?;
    Ok((!duration.is_zero()).then_some(duration))
}

/// Split off the unit suffix and return the numeric part with its multiplier
/// in milliseconds.
fn parse_duration_unit(duration_str: &str) -> (&str, u64) {
    // "ms" must be tried before "m" and "s".
    const UNITS: &[(&str, u64)] = &[("ms", 1), ("h", 3_600_000), ("m", 60_000), ("s", 1_000)];

    for (suffix, multiplier) in UNITS {
        if let Some(number) = duration_str.strip_suffix(suffix) {
            return (number, *multiplier);
        }
    }

    (duration_str, 1_000)
}
