//! Default-filling against the fixed schema.
//!
//! Two levels only: a top-level section that is absent (or not an object)
//! becomes the full placeholder section; a section that is present gets
//! each missing sub-field filled individually. Nothing deeper is merged —
//! set-list entries in particular are taken as-is.

use chrono::{Datelike, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{
    ActivitySection, CardioSection, DailyRecord, DailySummary, FillDefaults, HeartRateSection,
    MealEntry, NutritionSummary, SleepSection, StressSection, StrengthSection,
};

const WEEKDAY_LABELS: [&str; 7] = ["一", "二", "三", "四", "五", "六", "日"];

/// Localized weekday label, 周一 through 周日.
pub fn weekday_label(date: NaiveDateTime) -> String {
    let idx = date.weekday().num_days_from_monday() as usize;
    format!("周{}", WEEKDAY_LABELS[idx])
}

/// Build a schema-complete [`DailyRecord`] from the model's raw JSON
/// object, stamping it with the report date.
///
/// Present values are never overwritten; the operation is idempotent.
pub fn normalize(mut raw: Map<String, Value>, report_date: NaiveDateTime) -> DailyRecord {
    DailyRecord {
        date: report_date.format("%Y-%m-%d").to_string(),
        weekday: weekday_label(report_date),
        nutrition: take_section::<NutritionSummary>(&mut raw, "营养摄入汇总"),
        breakfast: take_section::<MealEntry>(&mut raw, "早餐"),
        lunch: take_section::<MealEntry>(&mut raw, "午餐"),
        dinner: take_section::<MealEntry>(&mut raw, "晚餐"),
        extra_meal: take_section::<MealEntry>(&mut raw, "加餐"),
        sleep: take_section::<SleepSection>(&mut raw, "睡眠"),
        heart_rate: take_section::<HeartRateSection>(&mut raw, "心率"),
        stress: take_section::<StressSection>(&mut raw, "压力"),
        activity: take_section::<ActivitySection>(&mut raw, "全天消耗与活动"),
        strength: take_section::<StrengthSection>(&mut raw, "力量训练"),
        cardio: take_section::<CardioSection>(&mut raw, "有氧训练"),
        summary: take_section::<DailySummary>(&mut raw, "本日总结"),
    }
}

/// Extract one section by wire key, falling back to the empty section when
/// the key is absent or its value is not an object, then fill defaults.
fn take_section<T>(raw: &mut Map<String, Value>, key: &str) -> T
where
    T: DeserializeOwned + Default + FillDefaults,
{
    let mut section: T = raw
        .remove(key)
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default();
    section.fill_defaults();
    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::{json, Number};

    fn report_date() -> NaiveDateTime {
        // 2024-05-01 is a Wednesday.
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn test_injects_date_and_weekday() {
        let record = normalize(Map::new(), report_date());
        assert_eq!(record.date, "2024-05-01");
        assert_eq!(record.weekday, "周三");
    }

    #[test]
    fn test_weekday_labels_span_week() {
        // 2024-04-29 is a Monday.
        let monday = NaiveDate::from_ymd_opt(2024, 4, 29).unwrap();
        for (offset, expected) in ["周一", "周二", "周三", "周四", "周五", "周六", "周日"]
            .iter()
            .enumerate()
        {
            let date = (monday + chrono::Days::new(offset as u64))
                .and_hms_opt(0, 0, 0)
                .unwrap();
            assert_eq!(&weekday_label(date), expected);
        }
    }

    #[test]
    fn test_empty_input_yields_full_placeholder_record() {
        let record = normalize(Map::new(), report_date());
        assert_eq!(record.nutrition.total_calories, Some(Number::from(0)));
        assert_eq!(record.breakfast.time.as_deref(), Some("N/A"));
        assert_eq!(record.sleep.total_duration.as_deref(), Some("0h"));
        assert_eq!(record.strength.theme.as_deref(), Some("休息日"));
        assert_eq!(record.strength.sets, Some(vec![]));
        assert_eq!(record.cardio.kind.as_deref(), Some("无"));
        assert_eq!(record.summary.analysis.as_deref(), Some(""));
    }

    #[test]
    fn test_partial_section_merges_missing_subkeys_only() {
        let raw = as_map(json!({
            "早餐": {"时间": "08:00", "内容": "鸡蛋", "热量": 300}
        }));
        let record = normalize(raw, report_date());
        assert_eq!(record.breakfast.time.as_deref(), Some("08:00"));
        assert_eq!(record.breakfast.content.as_deref(), Some("鸡蛋"));
        assert_eq!(record.breakfast.calories, Some(Number::from(300)));
        // Missing subkeys come from the defaults.
        assert_eq!(record.breakfast.protein, Some(Number::from(0)));
        assert_eq!(record.breakfast.comment.as_deref(), Some(""));
    }

    #[test]
    fn test_present_zero_is_not_overwritten() {
        let raw = as_map(json!({
            "压力": {"压力均值": 0, "压力点评": ""}
        }));
        let record = normalize(raw, report_date());
        assert_eq!(record.stress.mean, Some(Number::from(0)));
        assert_eq!(record.stress.comment.as_deref(), Some(""));
        assert_eq!(record.stress.trend_analysis.as_deref(), Some("暂无数据"));
    }

    #[test]
    fn test_non_object_section_replaced_wholesale() {
        let raw = as_map(json!({ "睡眠": "没有数据" }));
        let record = normalize(raw, report_date());
        assert_eq!(record.sleep.bedtime.as_deref(), Some("N/A"));
        assert_eq!(record.sleep.stage_analysis.as_deref(), Some("暂无数据"));
    }

    #[test]
    fn test_set_list_not_deep_merged() {
        let raw = as_map(json!({
            "力量训练": {
                "力量主题": "推力日",
                "动作流水明细": [{"动作名称": "卧推", "重量": 40, "次数": 10}]
            }
        }));
        let record = normalize(raw, report_date());
        let sets = record.strength.sets.as_ref().unwrap();
        assert_eq!(sets.len(), 1);
        // Entry sub-fields are not defaulted: absent stays absent.
        assert!(sets[0].raw_line.is_none());
        assert!(sets[0].volume.is_none());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = as_map(json!({
            "营养摄入汇总": {"总热量": 1850, "总盈余缺口分析": "轻微缺口"},
            "午餐": {"时间": "12:30", "内容": "牛肉饭", "热量": 700},
            "力量训练": {
                "力量主题": "拉力日",
                "动作流水明细": [{"动作名称": "硬拉", "重量": 80, "次数": 5}]
            }
        }));
        let once = normalize(raw, report_date());
        let round_tripped = as_map(serde_json::to_value(&once).unwrap());
        let twice = normalize(round_tripped, report_date());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_every_present_value_survives() {
        let raw = as_map(json!({
            "心率": {
                "静息心率": 52,
                "平均静息范围": "50-55",
                "全天心率范围": "48-162",
                "心率时序分析": "早高晚低",
                "心率点评": "正常"
            }
        }));
        let record = normalize(raw.clone(), report_date());
        let out = as_map(serde_json::to_value(&record).unwrap());
        let hr_in = raw["心率"].as_object().unwrap();
        let hr_out = out["心率"].as_object().unwrap();
        for (key, value) in hr_in {
            assert_eq!(hr_out.get(key), Some(value), "key '{}' changed", key);
        }
    }
}
