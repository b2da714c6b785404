// ── Running record domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId};

/// One logged run, belonging to a member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningRecord {
    pub id: Option<EntityId>,
    pub user_id: EntityId,
    pub distance_meters: u32,
    pub duration_seconds: u32,
    pub record_date: Option<DateTime<Utc>>,
    /// Set by an admin once the run has been checked for plausibility.
    #[serde(default)]
    pub verified: bool,
}

impl RunningRecord {
    /// Distance in kilometers for display.
    pub fn distance_km(&self) -> f64 {
        f64::from(self.distance_meters) / 1000.0
    }

    /// Average pace in seconds per kilometer. `None` for zero-distance
    /// records (manual placeholders).
    pub fn pace_secs_per_km(&self) -> Option<u32> {
        if self.distance_meters == 0 {
            return None;
        }
        let secs = u64::from(self.duration_seconds) * 1000 / u64::from(self.distance_meters);
        u32::try_from(secs).ok()
    }
}

/// Format meters as kilometers, e.g. "12.3 km".
#[must_use]
pub fn fmt_distance(meters: u32) -> String {
    format!("{:.1} km", f64::from(meters) / 1000.0)
}

/// Format seconds as "h:mm:ss", or "m:ss" under an hour.
#[must_use]
pub fn fmt_duration(secs: u32) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Format seconds-per-kilometer as "m:ss /km". `None` renders as "─"
/// (zero-distance placeholder records have no pace).
#[must_use]
pub fn fmt_pace(secs_per_km: Option<u32>) -> String {
    match secs_per_km {
        Some(secs) => {
            let minutes = secs / 60;
            let seconds = secs % 60;
            format!("{minutes}:{seconds:02} /km")
        }
        None => "─".into(),
    }
}

impl Entity for RunningRecord {
    const RESOURCE: &'static str = "running-records";
    const TYPE_TAG: &'static str = "runningRecord";

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn distance_is_kilometers_with_one_decimal() {
        assert_eq!(fmt_distance(0), "0.0 km");
        assert_eq!(fmt_distance(5000), "5.0 km");
        assert_eq!(fmt_distance(21_097), "21.1 km");
    }

    #[test]
    fn duration_drops_hours_when_zero() {
        assert_eq!(fmt_duration(59), "0:59");
        assert_eq!(fmt_duration(1500), "25:00");
        assert_eq!(fmt_duration(3_661), "1:01:01");
    }

    #[test]
    fn pace_renders_minutes_seconds_or_dash() {
        assert_eq!(fmt_pace(Some(330)), "5:30 /km");
        assert_eq!(fmt_pace(Some(600)), "10:00 /km");
        assert_eq!(fmt_pace(None), "─");
    }

    #[test]
    fn zero_distance_record_has_no_pace() {
        let record = RunningRecord {
            id: Some(1),
            user_id: 2,
            distance_meters: 0,
            duration_seconds: 600,
            record_date: None,
            verified: false,
        };
        assert_eq!(fmt_pace(record.pace_secs_per_km()), "─");
    }
}
