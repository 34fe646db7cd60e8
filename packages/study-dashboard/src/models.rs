use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::pagination::Page;

/// Weekly goal used by the full user-data fetch when the dashboard is unavailable.
pub const DEFAULT_WEEKLY_GOAL: u32 = 10;

/// Aggregate learning metrics shown on the study dashboard.
///
/// Every field is always present; anything the backend leaves out, sends as
/// `null`, or sends as a falsy value becomes `0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    pub weekly_goal: u32,
    pub mastery_level: f64,
    pub study_streak: u32,
    pub focus_score: f64,
    pub retention_rate: f64,
    pub cards_mastered: u32,
    pub minutes_per_day: f64,
    pub accuracy: f64,
}

impl DashboardStats {
    pub fn zeroed() -> Self {
        Self::default()
    }

    /// Maps a raw `/dashboard` body. Non-object bodies yield [`DashboardStats::zeroed`].
    pub fn from_json(body: &Value) -> Self {
        let Some(obj) = body.as_object() else {
            return Self::zeroed();
        };

        Self {
            weekly_goal: count_or_zero(obj.get("weekly_goal")),
            mastery_level: number_or_zero(obj.get("mastery_level")),
            study_streak: count_or_zero(obj.get("study_streak")),
            focus_score: number_or_zero(obj.get("focus_score")),
            retention_rate: number_or_zero(obj.get("retention_rate")),
            cards_mastered: count_or_zero(obj.get("cards_mastered")),
            minutes_per_day: number_or_zero(obj.get("minutes_per_day")),
            accuracy: number_or_zero(obj.get("accuracy")),
        }
    }

    /// Same stats with every fractional field rounded to the nearest integer.
    pub fn rounded(self) -> Self {
        Self {
            mastery_level: self.mastery_level.round(),
            focus_score: self.focus_score.round(),
            retention_rate: self.retention_rate.round(),
            minutes_per_day: self.minutes_per_day.round(),
            accuracy: self.accuracy.round(),
            ..self
        }
    }

    pub fn is_zeroed(&self) -> bool {
        *self == Self::zeroed()
    }
}

fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn number_or_zero(value: Option<&Value>) -> f64 {
    value.and_then(parse_number).unwrap_or(0.0)
}

/// Non-negative whole count from a number or numeric string, rounded and
/// saturated to `u32`. `None` when the value is not numeric at all.
pub(crate) fn parse_count(value: &Value) -> Option<u32> {
    let v = parse_number(value)?.round();
    Some(if v <= 0.0 {
        0
    } else if v >= u32::MAX as f64 {
        u32::MAX
    } else {
        v as u32
    })
}

fn count_or_zero(value: Option<&Value>) -> u32 {
    value.and_then(parse_count).unwrap_or(0)
}

/// One element of the `/progress` array. The client never looks inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressRecord(pub Value);

impl ProgressRecord {
    /// Coerces a raw body into records; anything but an array is empty.
    pub fn list_from_json(body: Value) -> Vec<Self> {
        match body {
            Value::Array(items) => items.into_iter().map(ProgressRecord).collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub subject: String,
}

impl Deck {
    /// Coerces a raw `/decks` body. Non-arrays become empty and entries that
    /// are not deck objects are skipped.
    pub fn list_from_json(body: Value) -> Vec<Self> {
        let Value::Array(items) = body else {
            return Vec::new();
        };

        items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Deck>(item) {
                Ok(deck) => Some(deck),
                Err(err) => {
                    warn!(error = %err, "skipping malformed deck entry");
                    None
                }
            })
            .collect()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

/// Everything the dashboard page needs after sign-in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserData {
    pub decks: Vec<Deck>,
    pub progress: Vec<ProgressRecord>,
    pub weekly_goal: u32,
    pub stats: DashboardStats,
}

impl UserData {
    pub fn deck_page(&self, page: usize, per_page: usize) -> Page<Deck> {
        Page::paginate(&self.decks, page, per_page)
    }
}
