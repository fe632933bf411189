use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::warn;

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Uses the `iana-time-zone` crate directly – no subprocess calls.
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

// ── Timezone resolution ───────────────────────────────────────────────────────

/// Parse an IANA timezone name, falling back to UTC with a warning when the
/// name is not recognised.
pub fn resolve_timezone(tz_name: &str) -> Tz {
    tz_name.parse::<Tz>().unwrap_or_else(|_| {
        warn!(
            "unrecognised timezone \"{}\", falling back to UTC",
            tz_name
        );
        Tz::UTC
    })
}

/// Validate that `tz_name` is a recognised IANA timezone identifier.
pub fn validate_timezone(tz_name: &str) -> bool {
    tz_name.parse::<Tz>().is_ok()
}

// ── Clock formatting ──────────────────────────────────────────────────────────

/// Format a UTC instant as a wall clock in `tz`, 24-hour with seconds.
///
/// Shown in the footer next to the refresh hint.
pub fn format_clock(dt: &DateTime<Utc>, tz: Tz) -> String {
    dt.with_timezone(&tz).format("%H:%M:%S").to_string()
}

// ── Tests ──────────────────────────────────────────────────────────────────────
