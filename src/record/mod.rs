//! The normalized daily record and its fixed schema.
//!
//! Wire keys are the Chinese field names the model is instructed to emit;
//! Rust field names are English. Every leaf is optional so the normalizer
//! can tell "absent" from "present" — presence, not truthiness, decides
//! whether a default is filled in. Numeric leaves deserialize leniently
//! (JSON number or numeric string), anything else reads as absent.

pub mod normalize;
pub mod strength;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

pub use normalize::normalize;
pub use strength::aggregate_strength;

/// Coerce a JSON value to a float: numbers pass through, numeric strings
/// are parsed, everything else is a miss.
pub(crate) fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn coerce_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                Some(Number::from(i))
            } else {
                s.parse::<f64>().ok().and_then(Number::from_f64)
            }
        }
        _ => None,
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<Number>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_number))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

/// Set entries may arrive as non-objects mixed into the list; those are
/// dropped rather than failing the whole section.
fn lenient_sets<'de, D>(deserializer: D) -> Result<Option<Vec<SetEntry>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    }))
}

fn zero() -> Number {
    Number::from(0)
}

/// Fills absent fields from the fixed placeholder schema. One level deep:
/// a filled set list is an empty list, entries are never deep-merged.
pub(crate) trait FillDefaults {
    fn fill_defaults(&mut self);
}

/// One exercise set extracted from a workout screenshot.
///
/// Weight and reps stay raw JSON so a garbage value ("热" instead of a
/// number) survives into the record and simply contributes zero volume.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SetEntry {
    #[serde(rename = "动作名称", deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(rename = "OCR原始行", deserialize_with = "lenient_string")]
    pub raw_line: Option<String>,
    #[serde(rename = "组序号", deserialize_with = "lenient_string")]
    pub set_index: Option<String>,
    #[serde(rename = "重量")]
    pub weight: Value,
    #[serde(rename = "次数")]
    pub reps: Value,
    #[serde(rename = "单组容量", skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NutritionSummary {
    #[serde(rename = "总热量", deserialize_with = "lenient_number")]
    pub total_calories: Option<Number>,
    #[serde(rename = "总蛋白质", deserialize_with = "lenient_number")]
    pub total_protein: Option<Number>,
    #[serde(rename = "总碳水", deserialize_with = "lenient_number")]
    pub total_carbs: Option<Number>,
    #[serde(rename = "总脂肪", deserialize_with = "lenient_number")]
    pub total_fat: Option<Number>,
    #[serde(rename = "总膳食纤维", deserialize_with = "lenient_number")]
    pub total_fiber: Option<Number>,
    #[serde(rename = "总盈余缺口分析", deserialize_with = "lenient_string")]
    pub balance_analysis: Option<String>,
}

impl FillDefaults for NutritionSummary {
    fn fill_defaults(&mut self) {
        self.total_calories.get_or_insert_with(zero);
        self.total_protein.get_or_insert_with(zero);
        self.total_carbs.get_or_insert_with(zero);
        self.total_fat.get_or_insert_with(zero);
        self.total_fiber.get_or_insert_with(zero);
        self.balance_analysis.get_or_insert_with(|| "暂无分析".to_string());
    }
}

/// One of the four meal slots (早餐 / 午餐 / 晚餐 / 加餐).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MealEntry {
    #[serde(rename = "时间", deserialize_with = "lenient_string")]
    pub time: Option<String>,
    #[serde(rename = "内容", deserialize_with = "lenient_string")]
    pub content: Option<String>,
    #[serde(rename = "热量", deserialize_with = "lenient_number")]
    pub calories: Option<Number>,
    #[serde(rename = "蛋白质", deserialize_with = "lenient_number")]
    pub protein: Option<Number>,
    #[serde(rename = "碳水", deserialize_with = "lenient_number")]
    pub carbs: Option<Number>,
    #[serde(rename = "脂肪", deserialize_with = "lenient_number")]
    pub fat: Option<Number>,
    #[serde(rename = "膳食纤维", deserialize_with = "lenient_number")]
    pub fiber: Option<Number>,
    #[serde(rename = "点评", deserialize_with = "lenient_string")]
    pub comment: Option<String>,
}

impl FillDefaults for MealEntry {
    fn fill_defaults(&mut self) {
        self.time.get_or_insert_with(|| "N/A".to_string());
        self.content.get_or_insert_with(String::new);
        self.calories.get_or_insert_with(zero);
        self.protein.get_or_insert_with(zero);
        self.carbs.get_or_insert_with(zero);
        self.fat.get_or_insert_with(zero);
        self.fiber.get_or_insert_with(zero);
        self.comment.get_or_insert_with(String::new);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SleepSection {
    #[serde(rename = "入睡时间", deserialize_with = "lenient_string")]
    pub bedtime: Option<String>,
    #[serde(rename = "起床时间", deserialize_with = "lenient_string")]
    pub wake_time: Option<String>,
    #[serde(rename = "睡眠总时长", deserialize_with = "lenient_string")]
    pub total_duration: Option<String>,
    #[serde(rename = "睡眠阶段分析", deserialize_with = "lenient_string")]
    pub stage_analysis: Option<String>,
    #[serde(rename = "睡眠点评", deserialize_with = "lenient_string")]
    pub comment: Option<String>,
}

impl FillDefaults for SleepSection {
    fn fill_defaults(&mut self) {
        self.bedtime.get_or_insert_with(|| "N/A".to_string());
        self.wake_time.get_or_insert_with(|| "N/A".to_string());
        self.total_duration.get_or_insert_with(|| "0h".to_string());
        self.stage_analysis.get_or_insert_with(|| "暂无数据".to_string());
        self.comment.get_or_insert_with(String::new);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeartRateSection {
    #[serde(rename = "静息心率", deserialize_with = "lenient_number")]
    pub resting_hr: Option<Number>,
    #[serde(rename = "平均静息范围", deserialize_with = "lenient_string")]
    pub resting_range: Option<String>,
    #[serde(rename = "全天心率范围", deserialize_with = "lenient_string")]
    pub daily_range: Option<String>,
    #[serde(rename = "心率时序分析", deserialize_with = "lenient_string")]
    pub trend_analysis: Option<String>,
    #[serde(rename = "心率点评", deserialize_with = "lenient_string")]
    pub comment: Option<String>,
}

impl FillDefaults for HeartRateSection {
    fn fill_defaults(&mut self) {
        self.resting_hr.get_or_insert_with(zero);
        self.resting_range.get_or_insert_with(|| "N/A".to_string());
        self.daily_range.get_or_insert_with(|| "N/A".to_string());
        self.trend_analysis.get_or_insert_with(|| "暂无数据".to_string());
        self.comment.get_or_insert_with(String::new);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StressSection {
    #[serde(rename = "压力均值", deserialize_with = "lenient_number")]
    pub mean: Option<Number>,
    #[serde(rename = "压力时序分析", deserialize_with = "lenient_string")]
    pub trend_analysis: Option<String>,
    #[serde(rename = "压力点评", deserialize_with = "lenient_string")]
    pub comment: Option<String>,
}

impl FillDefaults for StressSection {
    fn fill_defaults(&mut self) {
        self.mean.get_or_insert_with(zero);
        self.trend_analysis.get_or_insert_with(|| "暂无数据".to_string());
        self.comment.get_or_insert_with(String::new);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ActivitySection {
    #[serde(rename = "总步数", deserialize_with = "lenient_number")]
    pub total_steps: Option<Number>,
    #[serde(rename = "活动时长", deserialize_with = "lenient_string")]
    pub active_duration: Option<String>,
    #[serde(rename = "活动卡路里", deserialize_with = "lenient_number")]
    pub active_calories: Option<Number>,
    #[serde(rename = "燃烧的卡路里总数", deserialize_with = "lenient_number")]
    pub total_burned: Option<Number>,
}

impl FillDefaults for ActivitySection {
    fn fill_defaults(&mut self) {
        self.total_steps.get_or_insert_with(zero);
        self.active_duration.get_or_insert_with(|| "0min".to_string());
        self.active_calories.get_or_insert_with(zero);
        self.total_burned.get_or_insert_with(zero);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StrengthSection {
    #[serde(rename = "力量主题", deserialize_with = "lenient_string")]
    pub theme: Option<String>,
    #[serde(rename = "具体时间", deserialize_with = "lenient_string")]
    pub start_time: Option<String>,
    #[serde(rename = "训练时长", deserialize_with = "lenient_string")]
    pub duration: Option<String>,
    #[serde(rename = "总容量", deserialize_with = "lenient_number")]
    pub total_volume: Option<Number>,
    #[serde(rename = "消耗估算", deserialize_with = "lenient_number")]
    pub burn_estimate: Option<Number>,
    #[serde(rename = "力量点评", deserialize_with = "lenient_string")]
    pub comment: Option<String>,
    #[serde(rename = "动作流水明细", deserialize_with = "lenient_sets")]
    pub sets: Option<Vec<SetEntry>>,
}

impl FillDefaults for StrengthSection {
    fn fill_defaults(&mut self) {
        self.theme.get_or_insert_with(|| "休息日".to_string());
        self.start_time.get_or_insert_with(|| "N/A".to_string());
        self.duration.get_or_insert_with(|| "0min".to_string());
        self.total_volume.get_or_insert_with(zero);
        self.burn_estimate.get_or_insert_with(zero);
        self.comment.get_or_insert_with(String::new);
        self.sets.get_or_insert_with(Vec::new);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CardioSection {
    #[serde(rename = "有氧类型", deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(rename = "具体时间", deserialize_with = "lenient_string")]
    pub start_time: Option<String>,
    #[serde(rename = "距离", deserialize_with = "lenient_string")]
    pub distance: Option<String>,
    #[serde(rename = "有氧时长", deserialize_with = "lenient_string")]
    pub duration: Option<String>,
    #[serde(rename = "平均心率", deserialize_with = "lenient_number")]
    pub avg_hr: Option<Number>,
    #[serde(rename = "平均步频", deserialize_with = "lenient_number")]
    pub avg_cadence: Option<Number>,
    #[serde(rename = "平均步速", deserialize_with = "lenient_string")]
    pub avg_pace: Option<String>,
    #[serde(rename = "有氧卡路里消耗", deserialize_with = "lenient_number")]
    pub calories: Option<Number>,
}

impl FillDefaults for CardioSection {
    fn fill_defaults(&mut self) {
        self.kind.get_or_insert_with(|| "无".to_string());
        self.start_time.get_or_insert_with(|| "N/A".to_string());
        self.distance.get_or_insert_with(|| "0km".to_string());
        self.duration.get_or_insert_with(|| "0min".to_string());
        self.avg_hr.get_or_insert_with(zero);
        self.avg_cadence.get_or_insert_with(zero);
        self.avg_pace.get_or_insert_with(|| "N/A".to_string());
        self.calories.get_or_insert_with(zero);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DailySummary {
    #[serde(rename = "本日分析", deserialize_with = "lenient_string")]
    pub analysis: Option<String>,
    #[serde(rename = "指导建议", deserialize_with = "lenient_string")]
    pub advice: Option<String>,
}

impl FillDefaults for DailySummary {
    fn fill_defaults(&mut self) {
        self.analysis.get_or_insert_with(String::new);
        self.advice.get_or_insert_with(String::new);
    }
}

/// The schema-complete daily record. After [`normalize`] every field of
/// every section is present, so downstream consumers index freely.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyRecord {
    #[serde(rename = "日期")]
    pub date: String,
    #[serde(rename = "星期")]
    pub weekday: String,
    #[serde(rename = "营养摄入汇总")]
    pub nutrition: NutritionSummary,
    #[serde(rename = "早餐")]
    pub breakfast: MealEntry,
    #[serde(rename = "午餐")]
    pub lunch: MealEntry,
    #[serde(rename = "晚餐")]
    pub dinner: MealEntry,
    #[serde(rename = "加餐")]
    pub extra_meal: MealEntry,
    #[serde(rename = "睡眠")]
    pub sleep: SleepSection,
    #[serde(rename = "心率")]
    pub heart_rate: HeartRateSection,
    #[serde(rename = "压力")]
    pub stress: StressSection,
    #[serde(rename = "全天消耗与活动")]
    pub activity: ActivitySection,
    #[serde(rename = "力量训练")]
    pub strength: StrengthSection,
    #[serde(rename = "有氧训练")]
    pub cardio: CardioSection,
    #[serde(rename = "本日总结")]
    pub summary: DailySummary,
}

impl DailyRecord {
    /// One-screen digest: the original dashboard's overview table as plain
    /// text lines, derived entirely from the normalized record.
    pub fn overview_lines(&self) -> Vec<String> {
        let intake = self
            .nutrition
            .total_calories
            .as_ref()
            .and_then(|n| n.as_f64())
            .unwrap_or(0.0);
        let burned = self
            .activity
            .total_burned
            .as_ref()
            .and_then(|n| n.as_f64())
            .unwrap_or(0.0);
        let volume = self
            .strength
            .total_volume
            .as_ref()
            .and_then(|n| n.as_f64())
            .unwrap_or(0.0);
        let stress = self
            .stress
            .mean
            .as_ref()
            .map(|n| n.to_string())
            .unwrap_or_else(|| "0".to_string());

        vec![
            format!("总摄入: {} kcal", intake),
            format!("总消耗: {} kcal", burned),
            format!(
                "热量差: {} kcal ({})",
                intake - burned,
                self.nutrition.balance_analysis.as_deref().unwrap_or("")
            ),
            format!(
                "训练容量: {} kg ({})",
                volume,
                self.strength.theme.as_deref().unwrap_or("休息日")
            ),
            format!("压力均值: {}", stress),
        ]
    }
}
