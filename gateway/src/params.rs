//! Query parameter parsing, validation, and clamping
//!
//! The core engine assumes validated inputs (`min <= max`, `count >= 1`,
//! unique counts clamped to the range size); everything that enforces
//! those preconditions lives here, before any request reaches the engine.

use chain_core::config::LimitsConfig;
use serde::Deserialize;

/// Raw query string fields, parsed leniently or strictly per field below.
#[derive(Debug, Default, Deserialize)]
pub struct RawGenerateParams {
    pub min: Option<String>,
    pub max: Option<String>,
    pub count: Option<String>,
    pub flo: Option<String>,
    pub unique: Option<String>,
    pub itime: Option<String>,
}

/// A validated, clamped generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub min: f64,
    pub max: f64,
    pub count: u32,
    pub float_mode: bool,
    pub unique: bool,
    /// Publish cycles to defer the record by; 0 means the current cycle.
    pub delay_slots: usize,
}

impl GenerateRequest {
    /// Integer bounds for integer-mode generation (truncated toward zero).
    pub fn int_bounds(&self) -> (i64, i64) {
        (self.min as i64, self.max as i64)
    }
}

/// Lenient flag parsing: unparseable values fall back to false.
fn parse_flag(raw: Option<&str>) -> bool {
    matches!(raw, Some("1" | "t" | "T" | "true" | "TRUE" | "True"))
}

/// Validate and clamp a raw request against the configured limits.
///
/// `min`, `max`, and `count` are required and strictly bounded; `flo`,
/// `unique`, and `itime` parse leniently. An inverted or empty range is
/// widened to the default span (capped at the allowed maximum), and in
/// unique mode `count` is clamped to the range size.
pub fn validate(raw: RawGenerateParams, limits: &LimitsConfig) -> Result<GenerateRequest, String> {
    let min: f64 = match raw.min.as_deref().and_then(|s| s.parse().ok()) {
        Some(value) if value >= limits.min_value => value,
        _ => return Err("invalid or out of range min parameter".to_string()),
    };

    let mut max: f64 = match raw.max.as_deref().and_then(|s| s.parse().ok()) {
        Some(value) if value <= limits.max_value => value,
        _ => return Err("invalid or out of range max parameter".to_string()),
    };

    let mut count: u32 = match raw.count.as_deref().and_then(|s| s.parse().ok()) {
        Some(value) if (1..=limits.max_count).contains(&value) => value,
        _ => return Err("invalid or out of range count parameter".to_string()),
    };

    let float_mode = parse_flag(raw.flo.as_deref());
    let unique = parse_flag(raw.unique.as_deref());
    let delay_slots: usize = raw
        .itime
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);

    if min >= max {
        max = min + limits.default_span;
        if max > limits.max_value {
            max = limits.max_value;
        }
    }

    if unique {
        let range_size = (max - min + 1.0) as i64;
        if i64::from(count) > range_size {
            count = range_size as u32;
        }
    }

    Ok(GenerateRequest {
        min,
        max,
        count,
        float_mode,
        unique,
        delay_slots,
    })
}
