//! Maintenance schedule derived from current remaining useful life.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bucket::{Bucket, RulStatus};
use crate::types::{EngineError, Result};

/// Action text for every scheduled task.
pub const INSPECTION_ACTION: &str = "Preventive Maintenance Inspection";

/// Assets at or below this RUL are scheduled at half their remaining life.
const HIGH_RUL: f64 = 30.0;
/// Assets at or below this RUL are urgent.
const URGENT_RUL: f64 = 15.0;
/// Assets above this RUL are not scheduled.
const MEDIUM_RUL: f64 = 100.0;

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Urgent,
    High,
    Medium,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Urgent => write!(f, "URGENT"),
            Self::High => write!(f, "HIGH"),
            Self::Medium => write!(f, "MEDIUM"),
        }
    }
}

/// A scheduled inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceTask {
    /// Asset identifier
    pub asset_id: String,
    /// Remaining useful life, clamped to zero and truncated to whole cycles
    pub rul: i64,
    /// Current three-tier status
    pub status: RulStatus,
    /// Days from today
    pub offset_days: i64,
    /// Date of the inspection
    pub scheduled_date: NaiveDate,
    /// Priority
    pub priority: Priority,
    /// What to do
    pub action: String,
}

/// Derived schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "tasks", rename_all = "snake_case")]
pub enum Schedule {
    /// At least one task, lowest RUL first
    Tasks(Vec<MaintenanceTask>),
    /// No asset qualified
    NothingScheduled,
}

impl Schedule {
    /// Scheduled tasks; empty for [`Schedule::NothingScheduled`].
    pub fn tasks(&self) -> &[MaintenanceTask] {
        match self {
            Self::Tasks(tasks) => tasks,
            Self::NothingScheduled => &[],
        }
    }
}

/// Offset and priority for a clamped RUL, `None` when not scheduled.
pub fn plan(rul: f64) -> Option<(i64, Priority)> {
    if rul <= HIGH_RUL {
        let offset = ((rul * 0.5).floor() as i64).max(1);
        let priority = if rul <= URGENT_RUL {
            Priority::Urgent
        } else {
            Priority::High
        };
        Some((offset, priority))
    } else if rul <= MEDIUM_RUL {
        Some(((rul * 0.6).floor() as i64, Priority::Medium))
    } else {
        None
    }
}

/// Build the schedule from `(asset_id, current RUL)` pairs.
pub fn derive_schedule(assets: &[(String, f64)], today: NaiveDate) -> Result<Schedule> {
    let mut tasks = Vec::new();
    for (asset_id, raw_rul) in assets {
        if !raw_rul.is_finite() {
            return Err(EngineError::invalid(format!(
                "{}: RUL is not numeric",
                asset_id
            )));
        }
        let rul = raw_rul.max(0.0);
        let Some((offset_days, priority)) = plan(rul) else {
            continue;
        };
        tasks.push(MaintenanceTask {
            asset_id: asset_id.clone(),
            rul: rul as i64,
            status: RulStatus::classify(rul)?,
            offset_days,
            scheduled_date: today + Duration::days(offset_days),
            priority,
            action: INSPECTION_ACTION.to_string(),
        });
    }

    if tasks.is_empty() {
        return Ok(Schedule::NothingScheduled);
    }
    tasks.sort_by(|a, b| a.rul.cmp(&b.rul).then_with(|| a.asset_id.cmp(&b.asset_id)));
    Ok(Schedule::Tasks(tasks))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn assets(raw: &[(&str, f64)]) -> Vec<(String, f64)> {
        raw.iter().map(|(a, r)| (a.to_string(), *r)).collect()
    }

    #[test]
    fn test_plan_rules() {
        assert_eq!(plan(0.0), Some((1, Priority::Urgent)));
        assert_eq!(plan(15.0), Some((7, Priority::Urgent)));
        assert_eq!(plan(16.0), Some((8, Priority::High)));
        assert_eq!(plan(30.0), Some((15, Priority::High)));
        assert_eq!(plan(31.0), Some((18, Priority::Medium)));
        assert_eq!(plan(100.0), Some((60, Priority::Medium)));
        assert_eq!(plan(150.0), None);
    }

    #[test]
    fn test_schedule_dates_and_order() {
        let schedule = derive_schedule(
            &assets(&[("E7", 31.0), ("E2", 0.0), ("E9", 150.0), ("E4", -12.0)]),
            today(),
        )
        .unwrap();
        let tasks = schedule.tasks();
        assert_eq!(tasks.len(), 3);

        assert_eq!(tasks[0].asset_id, "E2");
        assert_eq!(tasks[0].scheduled_date, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
        assert_eq!(tasks[0].priority, Priority::Urgent);

        // negative RUL clamps to zero
        assert_eq!(tasks[1].asset_id, "E4");
        assert_eq!(tasks[1].rul, 0);
        assert_eq!(tasks[1].offset_days, 1);

        assert_eq!(tasks[2].asset_id, "E7");
        assert_eq!(tasks[2].offset_days, 18);
        assert_eq!(tasks[2].priority, Priority::Medium);
        assert_eq!(tasks[2].status, RulStatus::Critical);
        assert_eq!(tasks[2].action, INSPECTION_ACTION);
    }

    #[test]
    fn test_nothing_scheduled_sentinel() {
        let schedule = derive_schedule(&assets(&[("E1", 101.0), ("E2", 300.0)]), today()).unwrap();
        assert_eq!(schedule, Schedule::NothingScheduled);
        assert!(derive_schedule(&[], today()).unwrap().tasks().is_empty());
    }

    #[test]
    fn test_non_numeric_rul() {
        assert!(derive_schedule(&assets(&[("E1", f64::NAN)]), today()).is_err());
    }
}
