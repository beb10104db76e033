//! Spreadsheet sink: one record flattened to one appended row.
//!
//! The endpoint is any HTTP service accepting `{"values": [[...]]}` per
//! append. Failures come back as [`SinkError`] so the caller can warn and
//! keep the report; nothing here retries.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::info;

use crate::config::AppConfig;
use crate::error::SinkError;
use crate::record::{DailyRecord, SetEntry};

const SINK_TIMEOUT_SECS: u64 = 30;

/// Flatten a normalized record into the fixed 74-column row: date,
/// weekday, nutrition totals, the four meals, sleep, heart rate, stress,
/// activity, strength (with the concatenated per-set string), cardio,
/// and the daily summary.
pub fn flatten_row(record: &DailyRecord) -> Vec<Value> {
    let mut row: Vec<Value> = vec![
        Value::String(record.date.clone()),
        Value::String(record.weekday.clone()),
    ];

    let n = &record.nutrition;
    row.extend([
        number_cell(&n.total_calories),
        number_cell(&n.total_protein),
        number_cell(&n.total_carbs),
        number_cell(&n.total_fat),
        number_cell(&n.total_fiber),
        text_cell(&n.balance_analysis),
    ]);

    for meal in [
        &record.breakfast,
        &record.lunch,
        &record.dinner,
        &record.extra_meal,
    ] {
        row.extend([
            text_cell(&meal.time),
            text_cell(&meal.content),
            number_cell(&meal.calories),
            number_cell(&meal.protein),
            number_cell(&meal.carbs),
            number_cell(&meal.fat),
            number_cell(&meal.fiber),
            text_cell(&meal.comment),
        ]);
    }

    let sleep = &record.sleep;
    row.extend([
        text_cell(&sleep.bedtime),
        text_cell(&sleep.wake_time),
        text_cell(&sleep.total_duration),
        text_cell(&sleep.stage_analysis),
        text_cell(&sleep.comment),
    ]);

    let hr = &record.heart_rate;
    row.extend([
        number_cell(&hr.resting_hr),
        text_cell(&hr.resting_range),
        text_cell(&hr.daily_range),
        text_cell(&hr.trend_analysis),
        text_cell(&hr.comment),
    ]);

    let stress = &record.stress;
    row.extend([
        number_cell(&stress.mean),
        text_cell(&stress.trend_analysis),
        text_cell(&stress.comment),
    ]);

    let activity = &record.activity;
    row.extend([
        number_cell(&activity.total_steps),
        text_cell(&activity.active_duration),
        number_cell(&activity.active_calories),
        number_cell(&activity.total_burned),
    ]);

    let strength = &record.strength;
    let details = strength
        .sets
        .as_deref()
        .map(set_details_string)
        .unwrap_or_default();
    row.extend([
        text_cell(&strength.theme),
        text_cell(&strength.start_time),
        text_cell(&strength.duration),
        Value::String(details),
        number_cell(&strength.total_volume),
        number_cell(&strength.burn_estimate),
        text_cell(&strength.comment),
    ]);

    let cardio = &record.cardio;
    row.extend([
        text_cell(&cardio.kind),
        text_cell(&cardio.start_time),
        text_cell(&cardio.distance),
        text_cell(&cardio.duration),
        number_cell(&cardio.avg_hr),
        number_cell(&cardio.avg_cadence),
        text_cell(&cardio.avg_pace),
        number_cell(&cardio.calories),
    ]);

    let summary = &record.summary;
    row.extend([text_cell(&summary.analysis), text_cell(&summary.advice)]);

    row
}

/// `名称(重量kg*次数)` per set, joined by `" | "`.
pub fn set_details_string(sets: &[SetEntry]) -> String {
    sets.iter()
        .map(|set| {
            format!(
                "{}({}kg*{})",
                set.name.as_deref().unwrap_or(""),
                raw_scalar(&set.weight),
                raw_scalar(&set.reps)
            )
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn raw_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn number_cell(value: &Option<serde_json::Number>) -> Value {
    value.clone().map(Value::Number).unwrap_or(Value::Null)
}

fn text_cell(value: &Option<String>) -> Value {
    value.clone().map(Value::String).unwrap_or(Value::Null)
}

/// Append client for the configured spreadsheet endpoint.
#[derive(Debug)]
pub struct SheetSink {
    endpoint: String,
    token: String,
    client: reqwest::Client,
}

impl SheetSink {
    /// Build from config. Both endpoint and token must be present.
    pub fn from_config(config: &AppConfig) -> Result<Self, SinkError> {
        let endpoint = config
            .sheet_url
            .clone()
            .ok_or(SinkError::MissingCredentials)?;
        let token = config
            .sheet_token
            .clone()
            .ok_or(SinkError::MissingCredentials)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(SINK_TIMEOUT_SECS))
            .build()
            .map_err(|e| SinkError::Other(format!("failed to build HTTP client: {}", e)))?;
        Ok(SheetSink {
            endpoint,
            token,
            client,
        })
    }

    /// Append one flattened row. A 404 means the sheet is gone or the URL
    /// is wrong; anything else non-2xx is passed through as-is.
    pub async fn append_row(&self, row: &[Value]) -> Result<(), SinkError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&json!({ "values": [row] }))
            .send()
            .await
            .map_err(|e| SinkError::Other(format!("append request failed: {}", e)))?;

        match response.status() {
            status if status.is_success() => {
                info!("Appended row ({} cells) to sheet", row.len());
                Ok(())
            }
            StatusCode::NOT_FOUND => Err(SinkError::SheetNotFound(self.endpoint.clone())),
            status => {
                let body = response.text().await.unwrap_or_default();
                let truncated = if body.len() > 512 {
                    format!("{}...", &body[..512])
                } else {
                    body
                };
                Err(SinkError::Other(format!(
                    "append failed: {} - {}",
                    status, truncated
                )))
            }
        }
    }
}
