//! Date and time prompt.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::turn::TurnContext;

use super::prompt::{Prompt, PromptOptions, PromptRecognizer};

/// One reading of an ambiguous date/time utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateTimeResolution {
    /// Normalized value: `%Y-%m-%d %H:%M` for datetimes, `%Y-%m-%d` for
    /// dates, `%H:%M` for times.
    pub value: String,

    /// Which granularity the value carries: `datetime`, `date`, or `time`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl DateTimeResolution {
    fn time(time: NaiveTime) -> Self {
        Self {
            value: time.format("%H:%M").to_string(),
            kind: "time".into(),
        }
    }
}

/// Parses the reply as a date, a time, or both.
///
/// Deliberately small: ISO-style dates and datetimes, 24-hour clock times,
/// and 12-hour clock times with an am/pm marker. A bare hour without a
/// marker ("at 7") is ambiguous and yields two resolutions, morning and
/// evening, for the host to disambiguate.
#[derive(Debug, Default)]
pub struct DateTimeRecognizer;

impl PromptRecognizer for DateTimeRecognizer {
    fn recognize(&self, turn: &TurnContext, _options: &PromptOptions) -> Option<Value> {
        let resolutions = resolve(turn.text()?);
        if resolutions.is_empty() {
            return None;
        }
        serde_json::to_value(resolutions).ok()
    }
}

fn resolve(text: &str) -> Vec<DateTimeResolution> {
    let text = text.trim();

    if let Ok(datetime) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M") {
        return vec![DateTimeResolution {
            value: datetime.format("%Y-%m-%d %H:%M").to_string(),
            kind: "datetime".into(),
        }];
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return vec![DateTimeResolution {
            value: date.format("%Y-%m-%d").to_string(),
            kind: "date".into(),
        }];
    }
    if let Ok(time) = NaiveTime::parse_from_str(text, "%H:%M") {
        return vec![DateTimeResolution::time(time)];
    }
    if let Some(time) = parse_meridiem(text) {
        return vec![DateTimeResolution::time(time)];
    }
    if let Some(hour) = parse_bare_hour(text) {
        // 12-hour clock without a marker: offer both readings.
        let morning = hour % 12;
        return vec![
            DateTimeResolution::time(NaiveTime::from_hms_opt(morning, 0, 0).unwrap_or_default()),
            DateTimeResolution::time(
                NaiveTime::from_hms_opt(morning + 12, 0, 0).unwrap_or_default(),
            ),
        ];
    }
    Vec::new()
}

/// Parses "7am", "7 am", "7:30 pm" and the like.
fn parse_meridiem(text: &str) -> Option<NaiveTime> {
    let lowered = text.to_lowercase();
    let (clock, evening) = if let Some(stripped) = lowered.strip_suffix("am") {
        (stripped.trim_end(), false)
    } else if let Some(stripped) = lowered.strip_suffix("pm") {
        (stripped.trim_end(), true)
    } else {
        return None;
    };

    let (hour, minute) = match clock.split_once(':') {
        Some((h, m)) => (h.trim().parse::<u32>().ok()?, m.trim().parse::<u32>().ok()?),
        None => (clock.trim().parse::<u32>().ok()?, 0),
    };
    if !(1..=12).contains(&hour) {
        return None;
    }
    let hour24 = (hour % 12) + if evening { 12 } else { 0 };
    NaiveTime::from_hms_opt(hour24, minute, 0)
}

fn parse_bare_hour(text: &str) -> Option<u32> {
    let hour = text.parse::<u32>().ok()?;
    (1..=12).contains(&hour).then_some(hour)
}

/// A prompt that resolves with a list of [`DateTimeResolution`]s.
pub type DateTimePrompt = Prompt<DateTimeRecognizer>;

/// Creates a date/time prompt.
pub fn datetime_prompt() -> DateTimePrompt {
    Prompt::new(DateTimeRecognizer)
}
