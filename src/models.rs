//! Data Model
//!
//! Wire types exchanged with the recognition and log-storage services,
//! plus the display helpers the views share.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a logged meal, unique within one user's log set
pub type LogId = i64;

/// Macronutrient breakdown for a portion
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Nutrition {
    pub fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fat,
        }
    }
}

impl fmt::Display for Nutrition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} kcal | {:.1}g protein | {:.1}g carbs | {:.1}g fat",
            self.calories, self.protein, self.carbs, self.fat
        )
    }
}

/// One persisted meal record as returned by `GET /api/food-logs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodLogEntry {
    pub id: LogId,
    pub food_name: String,
    pub confidence: f64,
    /// Portion weight in grams. `None` when the service omitted it or sent
    /// a fractional value.
    #[serde(
        default,
        deserialize_with = "lenient_grams",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<u32>,
    pub nutrition: Nutrition,
    /// Naive timestamps are taken as UTC; unreadable ones become `None`
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

impl FoodLogEntry {
    /// Dish name with classifier underscores replaced by spaces
    pub fn display_name(&self) -> String {
        humanize_dish(&self.food_name)
    }

    pub fn confidence_label(&self) -> String {
        format_confidence(self.confidence)
    }

    pub fn weight_label(&self) -> String {
        match self.weight {
            Some(grams) => format!("{}g", grams),
            None => "?g".to_string(),
        }
    }
}

/// Output of one image-analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    pub food_name: String,
    pub confidence: f64,
    pub nutrition: Nutrition,
    #[serde(default)]
    pub summary: String,
}

impl RecognitionResult {
    pub fn display_name(&self) -> String {
        humanize_dish(&self.food_name)
    }

    pub fn confidence_label(&self) -> String {
        format_confidence(self.confidence)
    }

    /// Heading shown above the summary text
    pub fn summary_heading(&self) -> String {
        format!("What is {}?", self.display_name())
    }
}

/// Credentials body for `POST /api/login` and `POST /api/register`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Successful auth response
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthGrant {
    #[serde(deserialize_with = "opaque_id")]
    pub user_id: String,
}

/// A selected image as it goes into the multipart body
#[derive(Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Guess the MIME type from the file extension
    pub fn mime_for(file_name: &str) -> &'static str {
        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "bmp" => "image/bmp",
            _ => "application/octet-stream",
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// `apple_pie` -> `apple pie`
pub fn humanize_dish(food_name: &str) -> String {
    food_name.replace('_', " ")
}

/// `0.875` -> `87.50%`
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.2}%", confidence * 100.0)
}

/// Weights arrive as `200` or `200.0`
fn lenient_grams<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v.as_u64() {
        Some(n) => u32::try_from(n).ok(),
        None => v
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64)
            .map(|f| f as u32),
    }))
}

/// RFC 3339, or the offset-less ISO form `2024-03-01T12:30:00.123456`
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(|v| v.as_str()).and_then(parse_timestamp))
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// The auth service hands out numeric row ids; other deployments use strings.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n.to_string()),
        RawId::Text(s) if !s.trim().is_empty() => Ok(s),
        RawId::Text(_) => Err(serde::de::Error::custom("empty user id")),
    }
}
