//! # Result Rendering
//!
//! Turns phase results into printable text: an aligned, human-readable
//! block for terminals, or pretty JSON for other programs. Instants in JSON
//! are RFC 3339 strings; text output uses the configured strftime pattern.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;

use crate::config::{OutputConfig, OutputFormat};
use crate::lunar::PhaseSnapshot;
use crate::quarters::{PhaseHunt, PhaseSelector};

#[derive(Serialize)]
struct PhaseReport<'a> {
    at: DateTime<Utc>,
    phase_name: &'static str,
    #[serde(flatten)]
    snapshot: &'a PhaseSnapshot,
}

#[derive(Serialize)]
struct HuntReport<'a> {
    lunation: i64,
    #[serde(flatten)]
    hunt: &'a PhaseHunt,
}

#[derive(Serialize)]
struct RangeReport<'a> {
    phase: PhaseSelector,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    dates: &'a [DateTime<Utc>],
}

/// Format an instant with the configured pattern; a bad pattern falls back
/// to RFC 3339 instead of panicking inside `Display`.
fn stamp(instant: &DateTime<Utc>, out: &OutputConfig) -> String {
    let mut s = String::new();
    if write!(s, "{}", instant.format(&out.time_format)).is_err() {
        return instant.to_rfc3339();
    }
    s
}

/// Render a phase snapshot taken at `at`.
pub fn render_phase(
    at: DateTime<Utc>,
    snap: &PhaseSnapshot,
    out: &OutputConfig,
) -> Result<String, serde_json::Error> {
    if out.format == OutputFormat::Json {
        return serde_json::to_string_pretty(&PhaseReport {
            at,
            phase_name: snap.phase_name(),
            snapshot: snap,
        });
    }

    let p = out.precision;
    let lines = [
        format!("Moon phase at {}", stamp(&at, out)),
        format!("  Phase:             {:.p$} ({})", snap.phase, snap.phase_name()),
        format!(
            "  Illuminated:       {:.prec$}%",
            snap.illuminated * 100.0,
            prec = p.saturating_sub(2)
        ),
        format!("  Age:               {:.p$} days", snap.age),
        format!("  Distance:          {:.0} km", snap.distance),
        format!("  Angular diameter:  {:.p$}°", snap.angular_diameter),
        format!("  Sun distance:      {:.0} km", snap.sun_distance),
        format!("  Sun diameter:      {:.p$}°", snap.sun_angular_diameter),
    ];
    Ok(lines.join("\n"))
}

/// Render the phases of one lunation.
pub fn render_hunt(hunt: &PhaseHunt, out: &OutputConfig) -> Result<String, serde_json::Error> {
    if out.format == OutputFormat::Json {
        return serde_json::to_string_pretty(&HuntReport {
            lunation: hunt.lunation(),
            hunt,
        });
    }

    let mut lines = vec![format!("Lunation {}", hunt.lunation())];
    for (selector, date) in hunt.quarters() {
        lines.push(format!("  {:<15} {}", format!("{selector}:"), stamp(&date, out)));
    }
    lines.push(format!(
        "  {:<15} {}",
        "Next New Moon:",
        stamp(&hunt.nextnew_date, out)
    ));
    Ok(lines.join("\n"))
}

/// Render every occurrence of one phase between `start` and `end`.
pub fn render_range(
    selector: PhaseSelector,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    dates: &[DateTime<Utc>],
    out: &OutputConfig,
) -> Result<String, serde_json::Error> {
    if out.format == OutputFormat::Json {
        return serde_json::to_string_pretty(&RangeReport {
            phase: selector,
            start,
            end,
            dates,
        });
    }

    let mut lines = vec![format!(
        "{} × {} between {} and {}",
        dates.len(),
        selector,
        stamp(&start, out),
        stamp(&end, out)
    )];
    lines.extend(dates.iter().map(|d| format!("  {}", stamp(d, out))));
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{phase, phase_hunt, phase_range};
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2014, 2, 17, 5, 0, 0).unwrap()
    }

    #[test]
    fn test_text_phase_block() {
        let snap = phase(Some(at())).unwrap();
        let text = render_phase(at(), &snap, &OutputConfig::default()).unwrap();
        assert!(text.starts_with("Moon phase at 2014-02-17 05:00:00 UTC"));
        assert!(text.contains("Waning Gibbous"));
        assert!(text.contains("Distance:"));
        assert_eq!(text.lines().count(), 8);
    }

    #[test]
    fn test_json_phase_has_all_fields() {
        let snap = phase(Some(at())).unwrap();
        let out = OutputConfig {
            format: OutputFormat::Json,
            ..OutputConfig::default()
        };
        let json = render_phase(at(), &snap, &out).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for field in [
            "at",
            "phase_name",
            "phase",
            "illuminated",
            "age",
            "distance",
            "angular_diameter",
            "sun_distance",
            "sun_angular_diameter",
        ] {
            assert!(value.get(field).is_some(), "missing {field}");
        }
        assert_eq!(value["at"], "2014-02-17T05:00:00Z");
    }

    #[test]
    fn test_hunt_text_and_json() {
        let hunt = phase_hunt(Some(at())).unwrap();
        let text = render_hunt(&hunt, &OutputConfig::default()).unwrap();
        assert_eq!(text.lines().count(), 6);
        assert!(text.contains("First Quarter:"));
        assert!(text.contains("Next New Moon:"));

        let out = OutputConfig {
            format: OutputFormat::Json,
            ..OutputConfig::default()
        };
        let value: serde_json::Value =
            serde_json::from_str(&render_hunt(&hunt, &out).unwrap()).unwrap();
        assert_eq!(value["lunation"], hunt.lunation());
        assert!(value["nextnew_date"].is_string());
    }

    #[test]
    fn test_range_text_lists_every_date() {
        let start = Utc.with_ymd_and_hms(2014, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2014, 6, 30, 0, 0, 0).unwrap();
        let dates = phase_range(start, end, PhaseSelector::Full).unwrap();
        let text = render_range(PhaseSelector::Full, start, end, &dates, &OutputConfig::default())
            .unwrap();
        assert_eq!(text.lines().count(), dates.len() + 1);
        assert!(text.starts_with("6 × Full Moon"));
    }

    #[test]
    fn test_bad_time_format_falls_back_to_rfc3339() {
        let out = OutputConfig {
            time_format: "%Q".to_string(),
            ..OutputConfig::default()
        };
        assert_eq!(stamp(&at(), &out), "2014-02-17T05:00:00+00:00");
    }
}
