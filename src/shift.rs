use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// All shift-window arithmetic runs in Philippine Time (UTC+8, no DST),
/// regardless of server or client locale.
pub fn business_tz() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).expect("UTC+8 is a valid offset")
}

const DEFAULT_START_HOUR: u8 = 10;
const DEFAULT_START_MINUTE: u8 = 0;
const DEFAULT_END_HOUR: u8 = 19; // 7 PM
const DEFAULT_END_MINUTE: u8 = 0;

/// Grace period after shift end during which a late clock-out is credited
/// as shift end instead of counting as overtime.
const OVERTIME_THRESHOLD_MINUTES: i64 = 61;

/// Per-employee shift window. One active config per employee, latest
/// write wins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct ShiftConfig {
    #[schema(example = 10)]
    pub start_hour: u8,
    #[schema(example = 0)]
    pub start_minute: u8,
    #[schema(example = 19)]
    pub end_hour: u8,
    #[schema(example = 0)]
    pub end_minute: u8,
}

impl Default for ShiftConfig {
    fn default() -> Self {
        Self {
            start_hour: DEFAULT_START_HOUR,
            start_minute: DEFAULT_START_MINUTE,
            end_hour: DEFAULT_END_HOUR,
            end_minute: DEFAULT_END_MINUTE,
        }
    }
}

impl ShiftConfig {
    /// Out-of-range clock components fall back to the documented defaults
    /// rather than failing; the classifier never rejects a config.
    pub fn sanitized(self) -> Self {
        fn or_default(value: u8, max: u8, default: u8) -> u8 {
            if value <= max { value } else { default }
        }
        Self {
            start_hour: or_default(self.start_hour, 23, DEFAULT_START_HOUR),
            start_minute: or_default(self.start_minute, 59, DEFAULT_START_MINUTE),
            end_hour: or_default(self.end_hour, 23, DEFAULT_END_HOUR),
            end_minute: or_default(self.end_minute, 59, DEFAULT_END_MINUTE),
        }
    }

    /// Configuration-time validation: components in range and end strictly
    /// after start. The classifier itself does not enforce ordering, so a
    /// reversed window must never reach the database.
    pub fn validate(&self) -> Result<(), ShiftConfigError> {
        if self.start_hour > 23 || self.end_hour > 23 {
            return Err(ShiftConfigError::HourOutOfRange);
        }
        if self.start_minute > 59 || self.end_minute > 59 {
            return Err(ShiftConfigError::MinuteOutOfRange);
        }
        if (self.end_hour, self.end_minute) <= (self.start_hour, self.start_minute) {
            return Err(ShiftConfigError::EndNotAfterStart);
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ShiftConfigError {
    #[error("hour must be between 0 and 23")]
    HourOutOfRange,
    #[error("minute must be between 0 and 59")]
    MinuteOutOfRange,
    #[error("shift end must be after shift start")]
    EndNotAfterStart,
}

/// The two clock actions. Anything else on the wire is a caller error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ClockKind {
    #[serde(rename = "clockIn")]
    ClockIn,
    #[serde(rename = "clockOut")]
    ClockOut,
}

impl ClockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClockKind::ClockIn => "clockIn",
            ClockKind::ClockOut => "clockOut",
        }
    }
}

impl fmt::Display for ClockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid clock kind: {0:?} (expected clockIn or clockOut)")]
pub struct InvalidClockKind(pub String);

impl FromStr for ClockKind {
    type Err = InvalidClockKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clockIn" => Ok(ClockKind::ClockIn),
            "clockOut" => Ok(ClockKind::ClockOut),
            other => Err(InvalidClockKind(other.to_string())),
        }
    }
}

/// Status credited to a clock action. Wire spelling matches the stored
/// records, camelCase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ClockStatus {
    #[serde(rename = "onTime")]
    OnTime,
    #[serde(rename = "early")]
    Early,
    #[serde(rename = "late")]
    Late,
    #[serde(rename = "overtime")]
    Overtime,
}

impl ClockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClockStatus::OnTime => "onTime",
            ClockStatus::Early => "early",
            ClockStatus::Late => "late",
            ClockStatus::Overtime => "overtime",
        }
    }
}

/// Result of classifying one clock action.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockOutcome {
    /// Instant credited for payroll purposes; may differ from the raw
    /// instant per the rounding rules below.
    pub effective_time: DateTime<FixedOffset>,
    pub status: ClockStatus,
    pub is_overtime: bool,
}

/// Classify a clock action against the employee's shift window.
///
/// Pure and synchronous. Comparisons are wall-clock hour/minute in the
/// business timezone, hour first then minute:
///
/// - clock-in before start: credited as today at shift start, `early`.
///   Arriving after start is still `onTime` (intentional simplification,
///   preserved from the original behavior).
/// - clock-out after end: 61+ minutes past end is `overtime` (flag set,
///   credited as-is); 1..=60 minutes past end is `late` and credited as
///   today at shift end, the extra minutes are discarded; otherwise
///   `onTime`, credited as-is.
pub fn classify(kind: ClockKind, now: DateTime<Utc>, shift: &ShiftConfig) -> ClockOutcome {
    let shift = shift.sanitized();
    let tz = business_tz();
    let local = now.with_timezone(&tz);
    let wall = (local.hour(), local.minute());

    let at_today = |hour: u8, minute: u8| {
        local
            .date_naive()
            .and_hms_opt(u32::from(hour), u32::from(minute), 0)
            .expect("sanitized shift time is a valid wall-clock time")
            .and_local_timezone(tz)
            .single()
            .expect("fixed offset has no ambiguous local times")
    };

    match kind {
        ClockKind::ClockIn => {
            if wall < (u32::from(shift.start_hour), u32::from(shift.start_minute)) {
                ClockOutcome {
                    effective_time: at_today(shift.start_hour, shift.start_minute),
                    status: ClockStatus::Early,
                    is_overtime: false,
                }
            } else {
                ClockOutcome {
                    effective_time: local,
                    status: ClockStatus::OnTime,
                    is_overtime: false,
                }
            }
        }
        ClockKind::ClockOut => {
            let shift_end = at_today(shift.end_hour, shift.end_minute);
            if wall > (u32::from(shift.end_hour), u32::from(shift.end_minute)) {
                let diff_minutes = (local - shift_end).num_minutes();
                if diff_minutes >= OVERTIME_THRESHOLD_MINUTES {
                    ClockOutcome {
                        effective_time: local,
                        status: ClockStatus::Overtime,
                        is_overtime: true,
                    }
                } else {
                    // Credited as shift end; overtime minutes inside the
                    // grace period are discarded.
                    ClockOutcome {
                        effective_time: shift_end,
                        status: ClockStatus::Late,
                        is_overtime: false,
                    }
                }
            } else {
                ClockOutcome {
                    effective_time: local,
                    status: ClockStatus::OnTime,
                    is_overtime: false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Helper: build a UTC instant from Philippine wall-clock components.
    fn ph(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        business_tz()
            .with_ymd_and_hms(2026, 3, 2, h, m, s)
            .single()
            .expect("valid test instant")
            .with_timezone(&Utc)
    }

    fn local(h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
        business_tz()
            .with_ymd_and_hms(2026, 3, 2, h, m, s)
            .single()
            .expect("valid test instant")
    }

    #[test]
    fn clock_in_before_start_is_early_and_credited_at_start() {
        let out = classify(ClockKind::ClockIn, ph(9, 45, 0), &ShiftConfig::default());
        assert_eq!(out.status, ClockStatus::Early);
        assert_eq!(out.effective_time, local(10, 0, 0));
        assert!(!out.is_overtime);
    }

    #[test]
    fn clock_in_at_start_is_on_time() {
        let out = classify(ClockKind::ClockIn, ph(10, 0, 0), &ShiftConfig::default());
        assert_eq!(out.status, ClockStatus::OnTime);
        assert_eq!(out.effective_time, local(10, 0, 0));
    }

    #[test]
    fn clock_in_after_start_is_still_on_time() {
        // Intentional simplification preserved from the original portal.
        let out = classify(ClockKind::ClockIn, ph(11, 30, 0), &ShiftConfig::default());
        assert_eq!(out.status, ClockStatus::OnTime);
        assert_eq!(out.effective_time, local(11, 30, 0));
    }

    #[test]
    fn clock_in_seconds_after_start_minute_is_on_time() {
        // Wall-clock comparison is hour/minute only.
        let out = classify(ClockKind::ClockIn, ph(10, 0, 59), &ShiftConfig::default());
        assert_eq!(out.status, ClockStatus::OnTime);
    }

    #[test]
    fn clock_out_before_end_is_on_time() {
        let out = classify(ClockKind::ClockOut, ph(18, 15, 0), &ShiftConfig::default());
        assert_eq!(out.status, ClockStatus::OnTime);
        assert_eq!(out.effective_time, local(18, 15, 0));
        assert!(!out.is_overtime);
    }

    #[test]
    fn clock_out_at_end_is_on_time() {
        let out = classify(ClockKind::ClockOut, ph(19, 0, 0), &ShiftConfig::default());
        assert_eq!(out.status, ClockStatus::OnTime);
        assert_eq!(out.effective_time, local(19, 0, 0));
    }

    #[test]
    fn clock_out_seconds_into_end_minute_is_on_time() {
        // 19:00:30 is not strictly after 19:00 at minute granularity.
        let out = classify(ClockKind::ClockOut, ph(19, 0, 30), &ShiftConfig::default());
        assert_eq!(out.status, ClockStatus::OnTime);
    }

    #[test]
    fn clock_out_one_minute_late_is_late_and_credited_at_end() {
        let out = classify(ClockKind::ClockOut, ph(19, 1, 0), &ShiftConfig::default());
        assert_eq!(out.status, ClockStatus::Late);
        assert_eq!(out.effective_time, local(19, 0, 0));
        assert!(!out.is_overtime);
    }

    #[test]
    fn clock_out_within_grace_period_is_late() {
        // 19:30 → 30 minutes past end, credited as 19:00.
        let out = classify(ClockKind::ClockOut, ph(19, 30, 0), &ShiftConfig::default());
        assert_eq!(out.status, ClockStatus::Late);
        assert_eq!(out.effective_time, local(19, 0, 0));
    }

    #[test]
    fn clock_out_at_end_of_grace_period_is_late() {
        // Exactly 60 minutes past end is still within the grace period.
        let out = classify(ClockKind::ClockOut, ph(20, 0, 0), &ShiftConfig::default());
        assert_eq!(out.status, ClockStatus::Late);
        assert_eq!(out.effective_time, local(19, 0, 0));
        assert!(!out.is_overtime);
    }

    #[test]
    fn clock_out_61_minutes_late_is_overtime() {
        let out = classify(ClockKind::ClockOut, ph(20, 1, 0), &ShiftConfig::default());
        assert_eq!(out.status, ClockStatus::Overtime);
        assert_eq!(out.effective_time, local(20, 1, 0));
        assert!(out.is_overtime);
    }

    #[test]
    fn clock_out_well_past_grace_period_is_overtime() {
        // 20:05 → 65 minutes past end, credited as-is.
        let out = classify(ClockKind::ClockOut, ph(20, 5, 0), &ShiftConfig::default());
        assert_eq!(out.status, ClockStatus::Overtime);
        assert_eq!(out.effective_time, local(20, 5, 0));
        assert!(out.is_overtime);
    }

    #[test]
    fn custom_shift_window_is_respected() {
        let shift = ShiftConfig {
            start_hour: 8,
            start_minute: 30,
            end_hour: 17,
            end_minute: 30,
        };
        let early = classify(ClockKind::ClockIn, ph(8, 29, 0), &shift);
        assert_eq!(early.status, ClockStatus::Early);
        assert_eq!(early.effective_time, local(8, 30, 0));

        let ot = classify(ClockKind::ClockOut, ph(18, 31, 0), &shift);
        assert_eq!(ot.status, ClockStatus::Overtime);
    }

    #[test]
    fn out_of_range_components_fall_back_to_defaults() {
        let shift = ShiftConfig {
            start_hour: 99,
            start_minute: 0,
            end_hour: 19,
            end_minute: 75,
        };
        // start_hour falls back to 10, end_minute to 0.
        let out = classify(ClockKind::ClockIn, ph(9, 45, 0), &shift);
        assert_eq!(out.status, ClockStatus::Early);
        assert_eq!(out.effective_time, local(10, 0, 0));
    }

    #[test]
    fn invalid_kind_fails_to_parse() {
        let err = "lunch".parse::<ClockKind>().unwrap_err();
        assert_eq!(err, InvalidClockKind("lunch".to_string()));
        assert!("clockIn".parse::<ClockKind>().is_ok());
        assert!("clockOut".parse::<ClockKind>().is_ok());
    }

    #[test]
    fn validate_rejects_reversed_window() {
        let shift = ShiftConfig {
            start_hour: 19,
            start_minute: 0,
            end_hour: 10,
            end_minute: 0,
        };
        assert_eq!(shift.validate(), Err(ShiftConfigError::EndNotAfterStart));

        let zero_width = ShiftConfig {
            start_hour: 10,
            start_minute: 0,
            end_hour: 10,
            end_minute: 0,
        };
        assert_eq!(
            zero_width.validate(),
            Err(ShiftConfigError::EndNotAfterStart)
        );
    }

    #[test]
    fn validate_rejects_out_of_range_components() {
        let shift = ShiftConfig {
            start_hour: 24,
            ..ShiftConfig::default()
        };
        assert_eq!(shift.validate(), Err(ShiftConfigError::HourOutOfRange));

        let shift = ShiftConfig {
            end_minute: 60,
            ..ShiftConfig::default()
        };
        assert_eq!(shift.validate(), Err(ShiftConfigError::MinuteOutOfRange));
    }

    #[test]
    fn validate_accepts_default_window() {
        assert!(ShiftConfig::default().validate().is_ok());
    }

    #[test]
    fn wire_spelling_is_camel_case() {
        // Stored records and the JSON API both use the original spellings.
        assert_eq!(
            serde_json::to_string(&ClockKind::ClockIn).unwrap(),
            "\"clockIn\""
        );
        assert_eq!(
            serde_json::to_string(&ClockStatus::OnTime).unwrap(),
            "\"onTime\""
        );
        assert_eq!(ClockStatus::Overtime.as_str(), "overtime");
        assert_eq!(ClockKind::ClockOut.as_str(), "clockOut");
    }
}
