use chrono::Duration;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub date: String,
    pub score: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thoughts: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub week: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub month: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Stats {
    pub good: usize,
    pub neutral: usize,
    pub bad: usize,
    pub average: f64,
    pub total: usize,
}

/// Read response of the Energy API, as reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EnergyData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub entries: Vec<Entry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stats: Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimePeriod {
    #[serde(rename = "3days")]
    ThreeDays,
    #[default]
    #[serde(rename = "week")]
    Week,
    #[serde(rename = "month")]
    Month,
    #[serde(rename = "year")]
    Year,
}

impl TimePeriod {
    pub const ALL: [TimePeriod; 4] = [
        TimePeriod::ThreeDays,
        TimePeriod::Week,
        TimePeriod::Month,
        TimePeriod::Year,
    ];

    pub fn window(self) -> Duration {
        match self {
            TimePeriod::ThreeDays => Duration::days(3),
            TimePeriod::Week => Duration::days(7),
            TimePeriod::Month => Duration::days(30),
            TimePeriod::Year => Duration::days(365),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimePeriod::ThreeDays => "3days",
            TimePeriod::Week => "week",
            TimePeriod::Month => "month",
            TimePeriod::Year => "year",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimePeriod::ThreeDays => "3 days",
            TimePeriod::Week => "Week",
            TimePeriod::Month => "Month",
            TimePeriod::Year => "Year",
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown time period '{0}', expected one of 3days, week, month, year")]
pub struct UnknownPeriod(pub String);

impl FromStr for TimePeriod {
    type Err = UnknownPeriod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TimePeriod::ALL
            .into_iter()
            .find(|period| period.as_str() == value.trim())
            .ok_or_else(|| UnknownPeriod(value.to_string()))
    }
}

/// A validated entry ready to be sent to the write endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub score: u8,
    pub thoughts: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateEntryPayload {
    pub score: u8,
    pub thoughts: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEntryRequest {
    // Wide enough that out-of-range numbers reach validation.
    pub score: Option<i64>,
    #[serde(default)]
    pub thoughts: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyGoal {
    pub average: f64,
    pub total: usize,
    pub target: f64,
    pub progress_percent: f64,
    pub reached: bool,
    pub remaining: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreTone {
    Excellent,
    Good,
    Neutral,
    MediumLow,
    Low,
}

impl ScoreTone {
    pub fn for_score(score: u8) -> Self {
        match score {
            5.. => ScoreTone::Excellent,
            4 => ScoreTone::Good,
            3 => ScoreTone::Neutral,
            2 => ScoreTone::MediumLow,
            _ => ScoreTone::Low,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            ScoreTone::Excellent => "energy-excellent",
            ScoreTone::Good => "energy-good",
            ScoreTone::Neutral => "energy-neutral",
            ScoreTone::MediumLow => "energy-medium-low",
            ScoreTone::Low => "energy-low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub label: String,
    pub total: usize,
    pub average: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Trends {
    pub by_week: Vec<TrendPoint>,
    pub by_month: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentEntry {
    #[serde(flatten)]
    pub entry: Entry,
    pub tone: ScoreTone,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub period: TimePeriod,
    pub stats: Stats,
    pub server_stats: Stats,
    pub monthly_goal: MonthlyGoal,
    pub recent: Vec<RecentEntry>,
    pub trends: Trends,
    pub read_only_hint: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigResponse {
    pub read_url: String,
    pub write_url: String,
    pub is_using_default_read_only_endpoint: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_round_trips_through_query_strings() {
        assert_eq!("3days".parse::<TimePeriod>().unwrap(), TimePeriod::ThreeDays);
        assert_eq!("month".parse::<TimePeriod>().unwrap(), TimePeriod::Month);
        assert!("fortnight".parse::<TimePeriod>().is_err());
        assert_eq!(TimePeriod::default(), TimePeriod::Week);
    }

    #[test]
    fn period_windows_are_whole_days() {
        assert_eq!(TimePeriod::ThreeDays.window().num_hours(), 72);
        assert_eq!(TimePeriod::Month.window().num_days(), 30);
        assert_eq!(TimePeriod::Year.window().num_days(), 365);
    }

    #[test]
    fn energy_data_tolerates_missing_fields() {
        let data: EnergyData = serde_json::from_str(
            r#"{"entries":[{"date":"05.03.2024","score":4,"thoughts":"fine"}]}"#,
        )
        .unwrap();
        assert_eq!(data.entries.len(), 1);
        assert_eq!(data.entries[0].week, "");
        assert_eq!(data.stats, Stats::default());
    }

    #[test]
    fn partial_server_stats_fill_in_zeroes() {
        let data: EnergyData = serde_json::from_str(r#"{"entries":[],"stats":{"total":1}}"#).unwrap();
        assert_eq!(data.stats.total, 1);
        assert_eq!(data.stats.good, 0);
        assert_eq!(data.stats.average, 0.0);

        let data: EnergyData = serde_json::from_str(r#"{"entries":null,"stats":null}"#).unwrap();
        assert_eq!(data, EnergyData::default());
    }

    #[test]
    fn null_text_fields_read_as_empty() {
        let entry: Entry = serde_json::from_str(
            r#"{"date":"05.03.2024","score":3,"thoughts":null,"category":null,"week":null,"month":"March"}"#,
        )
        .unwrap();
        assert_eq!(entry.thoughts, "");
        assert_eq!(entry.category, "");
        assert_eq!(entry.week, "");
        assert_eq!(entry.month, "March");
    }

    #[test]
    fn entry_request_accepts_any_integer_score() {
        let request: CreateEntryRequest =
            serde_json::from_str(r#"{"score":300,"thoughts":"x"}"#).unwrap();
        assert_eq!(request.score, Some(300));
        let request: CreateEntryRequest = serde_json::from_str(r#"{"score":-1}"#).unwrap();
        assert_eq!(request.score, Some(-1));
        assert_eq!(request.thoughts, "");
    }

    #[test]
    fn payload_uses_camel_case_timestamp() {
        let payload = CreateEntryPayload {
            score: 5,
            thoughts: "great day".into(),
            created_at: "2024-03-05T10:00:00.000Z".into(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["createdAt"], "2024-03-05T10:00:00.000Z");
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn tones_follow_score_thresholds() {
        assert_eq!(ScoreTone::for_score(5), ScoreTone::Excellent);
        assert_eq!(ScoreTone::for_score(4), ScoreTone::Good);
        assert_eq!(ScoreTone::for_score(3), ScoreTone::Neutral);
        assert_eq!(ScoreTone::for_score(2), ScoreTone::MediumLow);
        assert_eq!(ScoreTone::for_score(1).css_class(), "energy-low");
    }
}
