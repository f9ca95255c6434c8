use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// A scheduled work interval belonging to a project.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct Shift {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Monday")]
    pub day: String,

    #[schema(example = "08:00:00", value_type = String, format = "time")]
    pub start_time: NaiveTime,

    #[schema(example = "16:00:00", value_type = String, format = "time")]
    pub end_time: NaiveTime,

    #[schema(example = 8.0)]
    pub hours_of_work: f64,

    #[schema(example = 200.0)]
    pub payment: f64,

    #[schema(example = 10)]
    pub project: u64,
}

/// Day-of-week a shift is scheduled on, stored as its English name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, ToSchema,
)]
pub enum Day {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl From<Weekday> for Day {
    fn from(w: Weekday) -> Self {
        match w {
            Weekday::Sun => Day::Sunday,
            Weekday::Mon => Day::Monday,
            Weekday::Tue => Day::Tuesday,
            Weekday::Wed => Day::Wednesday,
            Weekday::Thu => Day::Thursday,
            Weekday::Fri => Day::Friday,
            Weekday::Sat => Day::Saturday,
        }
    }
}

/// Accepts `HH:MM` (what the scheduling form sends) and `HH:MM:SS`.
pub fn parse_time_of_day(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

/// A validated shift-to-be. Duration follows the day-wraparound policy:
/// an end time at or before the start belongs to the next day, so 24h are
/// added before differencing. Equal start and end is a full 24-hour shift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftPlan {
    pub day: Day,
    pub start: NaiveTime,
    pub end: NaiveTime,
    duration_minutes: i64,
}

impl ShiftPlan {
    pub fn new(day: Day, start: NaiveTime, end: NaiveTime) -> Self {
        let mut minutes = end.signed_duration_since(start).num_minutes();
        if minutes <= 0 {
            minutes += 24 * 60;
        }

        ShiftPlan {
            day,
            start,
            end,
            duration_minutes: minutes,
        }
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration_minutes as f64 / 60.0
    }

    /// Minute-exact comparison against a project's configured shift length.
    pub fn duration_matches(&self, hours_per_shift: f64) -> bool {
        self.duration_minutes == (hours_per_shift * 60.0).round() as i64
    }

    pub fn payment(&self, pay_per_hour: f64) -> f64 {
        pay_per_hour * self.duration_hours()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn plain_duration_is_end_minus_start() {
        let plan = ShiftPlan::new(Day::Monday, t(8, 0), t(16, 0));
        assert_eq!(plan.duration_hours(), 8.0);
    }

    #[test]
    fn overnight_shift_wraps_past_midnight() {
        let plan = ShiftPlan::new(Day::Friday, t(22, 0), t(6, 0));
        assert_eq!(plan.duration_hours(), 8.0);
    }

    #[test]
    fn equal_times_make_a_full_day_shift() {
        let plan = ShiftPlan::new(Day::Sunday, t(9, 0), t(9, 0));
        assert_eq!(plan.duration_hours(), 24.0);
    }

    #[test]
    fn minute_granularity_survives() {
        let plan = ShiftPlan::new(Day::Tuesday, t(8, 30), t(12, 0));
        assert_eq!(plan.duration_hours(), 3.5);
        assert!(plan.duration_matches(3.5));
        assert!(!plan.duration_matches(3.0));
    }

    #[test]
    fn duration_mismatch_is_detected() {
        let plan = ShiftPlan::new(Day::Monday, t(8, 0), t(15, 0));
        assert!(!plan.duration_matches(8.0));
        assert!(plan.duration_matches(7.0));
    }

    #[test]
    fn payment_is_rate_times_hours() {
        let plan = ShiftPlan::new(Day::Monday, t(8, 0), t(16, 0));
        assert_eq!(plan.payment(25.0), 200.0);

        let overnight = ShiftPlan::new(Day::Monday, t(23, 0), t(3, 0));
        assert_eq!(overnight.payment(10.0), 40.0);
    }

    #[test]
    fn day_parses_from_its_english_name() {
        assert_eq!("Monday".parse::<Day>().unwrap(), Day::Monday);
        assert_eq!("Sunday".parse::<Day>().unwrap(), Day::Sunday);
        assert!("Funday".parse::<Day>().is_err());
    }

    #[test]
    fn day_displays_as_stored_in_the_schema() {
        assert_eq!(Day::Wednesday.to_string(), "Wednesday");
    }

    #[test]
    fn weekday_conversion_lines_up() {
        assert_eq!(Day::from(Weekday::Sun), Day::Sunday);
        assert_eq!(Day::from(Weekday::Sat), Day::Saturday);
    }

    #[test]
    fn times_parse_with_and_without_seconds() {
        assert_eq!(parse_time_of_day("08:00"), Some(t(8, 0)));
        assert_eq!(parse_time_of_day("16:30:00"), Some(t(16, 30)));
        assert_eq!(parse_time_of_day("8 o'clock"), None);
    }
}
