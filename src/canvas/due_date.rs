//! Natural-language due dates
//!
//! Instructors type things like "next friday at 5pm". The parser handles
//! day words, weekday names with this/next qualifiers, an optional "at
//! <time>" suffix, and falls back to absolute timestamps. The default time
//! is 11:59 PM local.

use chrono::{
    DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Timelike,
};
use lazy_static::lazy_static;
use phf::phf_map;
use regex::Regex;

use crate::utils::error::{PublishError, PublishResult};

static WEEKDAY_ALIASES: phf::Map<&'static str, u32> = phf_map! {
    "monday" => 0,
    "mon" => 0,
    "tuesday" => 1,
    "tue" => 1,
    "tues" => 1,
    "wednesday" => 2,
    "wed" => 2,
    "thursday" => 3,
    "thu" => 3,
    "thur" => 3,
    "thurs" => 3,
    "friday" => 4,
    "fri" => 4,
    "saturday" => 5,
    "sat" => 5,
    "sunday" => 6,
    "sun" => 6,
};

/// Words meaning "no due date"
const SKIP_WORDS: [&str; 4] = ["none", "no", "skip", "n/a"];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref DAY_WORD: Regex = Regex::new(r"^(today|tomorrow)(?:\s+at\s+(.+))?$").unwrap();
    static ref WEEKDAY: Regex = {
        // Longest alias first so "thurs" is not cut short by "thu"
        let mut words: Vec<&str> = WEEKDAY_ALIASES.keys().copied().collect();
        words.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        Regex::new(&format!(
            r"^(?:(next|this)\s+)?({})(?:\s+at\s+(.+))?$",
            words.join("|")
        ))
        .unwrap()
    };
}

/// Parse a due date expression relative to `now`.
///
/// Returns `Ok(None)` for blank input and for skip words ("none", "skip").
pub fn parse_due_date(text: &str, now: DateTime<Local>) -> PublishResult<Option<DateTime<Local>>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let normalized = WHITESPACE
        .replace_all(&trimmed.to_lowercase(), " ")
        .trim()
        .to_string();
    if SKIP_WORDS.contains(&normalized.as_str()) {
        return Ok(None);
    }

    if let Some(caps) = DAY_WORD.captures(&normalized) {
        let mut date = now.date_naive();
        if &caps[1] == "tomorrow" {
            date += Duration::days(1);
        }
        let (hour, minute) = time_or_default(trimmed, caps.get(2).map(|m| m.as_str()))?;
        return at_local(trimmed, now, date, hour, minute).map(Some);
    }

    if let Some(caps) = WEEKDAY.captures(&normalized) {
        let qualifier = caps.get(1).map(|m| m.as_str());
        let target = WEEKDAY_ALIASES.get(&caps[2]).copied().unwrap_or(0);
        let today = now.date_naive().weekday().num_days_from_monday();
        let mut days_ahead = (7 + target - today) % 7;
        if qualifier == Some("next") && days_ahead == 0 {
            days_ahead = 7;
        }
        let date = now.date_naive() + Duration::days(days_ahead as i64);
        let (hour, minute) = time_or_default(trimmed, caps.get(3).map(|m| m.as_str()))?;
        return at_local(trimmed, now, date, hour, minute).map(Some);
    }

    parse_absolute(trimmed, now).map(Some)
}

/// Format a due date for the Canvas API (ISO-8601 with seconds precision).
pub fn format_due_at(due: &DateTime<Local>) -> String {
    due.to_rfc3339_opts(SecondsFormat::Secs, false)
}

fn time_or_default(input: &str, time_part: Option<&str>) -> PublishResult<(u32, u32)> {
    match time_part {
        Some(part) => parse_time_part(part).map_err(|msg| PublishError::due_date(input, msg)),
        None => Ok((23, 59)),
    }
}

/// Parse the "at ..." suffix: "5pm", "17:00", "noon".
fn parse_time_part(text: &str) -> Result<(u32, u32), String> {
    let cleaned = text.trim().to_lowercase();
    if cleaned == "noon" {
        return Ok((12, 0));
    }
    if cleaned == "midnight" {
        return Ok((0, 0));
    }

    let compact = cleaned.replace(' ', "").to_uppercase();
    for fmt in ["%H:%M", "%H%M", "%I:%M%p", "%I%p"] {
        if let Ok(parsed) = NaiveTime::parse_from_str(&compact, fmt) {
            return Ok((parsed.hour(), parsed.minute()));
        }
    }
    Err(format!("could not parse time '{}'", text.trim()))
}

fn at_local(
    input: &str,
    now: DateTime<Local>,
    date: NaiveDate,
    hour: u32,
    minute: u32,
) -> PublishResult<DateTime<Local>> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| PublishError::due_date(input, "time out of range"))?;
    now.timezone()
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .ok_or_else(|| PublishError::due_date(input, "time does not exist in the local timezone"))
}

/// Absolute timestamps: RFC 3339 first, then naive local formats, then a
/// bare date (which gets the 11:59 PM default).
fn parse_absolute(text: &str, now: DateTime<Local>) -> PublishResult<DateTime<Local>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        let local = parsed.with_timezone(&now.timezone());
        return Ok(local.with_second(0).unwrap_or(local));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(text, fmt) {
            return now
                .timezone()
                .from_local_datetime(&naive)
                .earliest()
                .ok_or_else(|| {
                    PublishError::due_date(text, "time does not exist in the local timezone")
                });
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return at_local(text, now, date, 23, 59);
    }

    Err(PublishError::due_date(text, "unrecognized date expression"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 10, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_blank_and_skip_words() {
        assert!(parse_due_date("", now()).unwrap().is_none());
        assert!(parse_due_date("  none  ", now()).unwrap().is_none());
        assert!(parse_due_date("N/A", now()).unwrap().is_none());
    }

    #[test]
    fn test_today_defaults_to_end_of_day() {
        let due = parse_due_date("today", now()).unwrap().unwrap();
        assert_eq!(due.date_naive(), now().date_naive());
        assert_eq!((due.hour(), due.minute()), (23, 59));
    }

    #[test]
    fn test_tomorrow_at_time() {
        let due = parse_due_date("tomorrow at 5pm", now()).unwrap().unwrap();
        assert_eq!(due.date_naive(), now().date_naive() + Duration::days(1));
        assert_eq!((due.hour(), due.minute()), (17, 0));
    }

    #[test]
    fn test_weekday_lands_within_a_week() {
        let due = parse_due_date("friday", now()).unwrap().unwrap();
        assert_eq!(due.weekday(), Weekday::Fri);
        let ahead = due.date_naive() - now().date_naive();
        assert!((0..7).contains(&ahead.num_days()));
    }

    #[test]
    fn test_next_weekday_skips_same_day() {
        let now = now();
        let today_name = match now.weekday() {
            Weekday::Mon => "monday",
            Weekday::Tue => "tuesday",
            Weekday::Wed => "wednesday",
            Weekday::Thu => "thursday",
            Weekday::Fri => "friday",
            Weekday::Sat => "saturday",
            Weekday::Sun => "sunday",
        };
        let this = parse_due_date(today_name, now).unwrap().unwrap();
        assert_eq!(this.date_naive(), now.date_naive());
        let next = parse_due_date(&format!("next {}", today_name), now)
            .unwrap()
            .unwrap();
        assert_eq!(next.date_naive(), now.date_naive() + Duration::days(7));
    }

    #[test]
    fn test_short_weekday_alias() {
        let due = parse_due_date("thurs at noon", now()).unwrap().unwrap();
        assert_eq!(due.weekday(), Weekday::Thu);
        assert_eq!((due.hour(), due.minute()), (12, 0));
    }

    #[test]
    fn test_twenty_four_hour_time() {
        let due = parse_due_date("tomorrow at 17:45", now()).unwrap().unwrap();
        assert_eq!((due.hour(), due.minute()), (17, 45));
    }

    #[test]
    fn test_bare_date_gets_default_time() {
        let due = parse_due_date("2026-04-01", now()).unwrap().unwrap();
        assert_eq!(
            due.date_naive(),
            NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()
        );
        assert_eq!((due.hour(), due.minute()), (23, 59));
    }

    #[test]
    fn test_naive_timestamp() {
        let due = parse_due_date("2026-04-01T08:00", now()).unwrap().unwrap();
        assert_eq!((due.hour(), due.minute()), (8, 0));
    }

    #[test]
    fn test_garbage_is_an_error() {
        let err = parse_due_date("someday soon", now()).unwrap_err();
        assert!(err.to_string().contains("someday soon"));
    }

    #[test]
    fn test_bad_time_suffix_is_an_error() {
        assert!(parse_due_date("friday at elevenish", now()).is_err());
    }

    #[test]
    fn test_format_has_seconds_precision() {
        let due = parse_due_date("2026-04-01T08:00", now()).unwrap().unwrap();
        let formatted = format_due_at(&due);
        assert!(formatted.starts_with("2026-04-01T08:00:00"));
    }
}
