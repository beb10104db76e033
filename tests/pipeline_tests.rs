//! End-to-end checks over the offline half of the pipeline: a canned model
//! reply goes through JSON extraction, schema normalization, strength
//! aggregation, and row flattening.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Number, Value};

use healthsheet::pipeline::extraction::extract_json_object;
use healthsheet::pipeline::timeline::{assemble_content, ContentBlock, QuickAdds};
use healthsheet::record::{aggregate_strength, normalize};
use healthsheet::sheets::flatten_row;

fn report_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

/// A plausible fenced reply covering a training day with one junk set.
const MODEL_REPLY: &str = r#"```json
{
  "营养摄入汇总": {
    "总热量": 1850,
    "总蛋白质": 130,
    "总碳水": 180,
    "总脂肪": 55,
    "总膳食纤维": 28,
    "总盈余缺口分析": "轻微热量缺口"
  },
  "早餐": {
    "时间": "08:00", "内容": "燕麦粥和鸡蛋", "热量": 420,
    "蛋白质": 22, "碳水": 55, "脂肪": 12, "膳食纤维": 8, "点评": "均衡"
  },
  "午餐": {
    "时间": "12:30", "内容": "牛肉饭", "热量": 700,
    "蛋白质": 40, "碳水": 80, "脂肪": 20, "膳食纤维": 6, "点评": "蛋白质充足"
  },
  "力量训练": {
    "力量主题": "推力日",
    "具体时间": "18:30",
    "训练时长": "55min",
    "总容量": 12345,
    "动作流水明细": [
      {"动作名称": "卧推", "OCR原始行": "1 40kg 10", "组序号": "1", "重量": 40, "次数": 10},
      {"动作名称": "卧推", "OCR原始行": "2 50kg 8", "组序号": "2", "重量": "50", "次数": 8},
      {"动作名称": "卧推", "OCR原始行": "3 ?? 8", "组序号": "3", "重量": "热", "次数": 8}
    ]
  }
}
```"#;

#[test]
fn canned_reply_produces_complete_record() {
    let raw = extract_json_object(MODEL_REPLY);
    assert!(!raw.is_empty());

    let mut record = normalize(raw, report_date());
    let total = aggregate_strength(&mut record);

    // Extracted values survive.
    assert_eq!(record.date, "2024-05-01");
    assert_eq!(record.weekday, "周三");
    assert_eq!(record.nutrition.total_calories, Some(Number::from(1850)));
    assert_eq!(record.breakfast.content.as_deref(), Some("燕麦粥和鸡蛋"));
    assert_eq!(record.lunch.time.as_deref(), Some("12:30"));

    // Sections the model skipped are schema-complete placeholders.
    assert_eq!(record.dinner.time.as_deref(), Some("N/A"));
    assert_eq!(record.sleep.total_duration.as_deref(), Some("0h"));
    assert_eq!(record.cardio.kind.as_deref(), Some("无"));

    // 400 + 400, the unreadable third set contributes zero, and the
    // model's claimed 12345 total is overwritten.
    assert_eq!(total, 800.0);
    assert_eq!(
        record.strength.total_volume.as_ref().unwrap().as_f64(),
        Some(800.0)
    );
    let sets = record.strength.sets.as_ref().unwrap();
    assert_eq!(sets.len(), 3);
    assert_eq!(sets[2].volume, Some(0.0));
}

#[test]
fn flattened_row_matches_record() {
    let raw = extract_json_object(MODEL_REPLY);
    let mut record = normalize(raw, report_date());
    aggregate_strength(&mut record);

    let row = flatten_row(&record);
    assert_eq!(row.len(), 74);
    assert_eq!(row[0], json!("2024-05-01"));
    assert!(row
        .iter()
        .any(|cell| cell == &json!("卧推(40kg*10) | 卧推(50kg*8) | 卧推(热kg*8)")));
    // No cell is null after normalization.
    assert!(row.iter().all(|cell| !cell.is_null()));
}

#[test]
fn garbage_reply_still_yields_full_report() {
    let raw = extract_json_object("抱歉，我无法解析这些图片。");
    assert!(raw.is_empty());

    let mut record = normalize(raw, report_date());
    let total = aggregate_strength(&mut record);

    assert_eq!(total, 0.0);
    assert_eq!(record.date, "2024-05-01");
    assert_eq!(record.strength.theme.as_deref(), Some("休息日"));

    let row = flatten_row(&record);
    assert_eq!(row.len(), 74);
    assert!(row.iter().all(|cell| !cell.is_null()));
}

#[test]
fn serialized_record_keeps_wire_keys() {
    let raw = extract_json_object(MODEL_REPLY);
    let mut record = normalize(raw, report_date());
    aggregate_strength(&mut record);

    let value: Value = serde_json::to_value(&record).unwrap();
    let obj = value.as_object().unwrap();
    for key in [
        "日期",
        "星期",
        "营养摄入汇总",
        "早餐",
        "午餐",
        "晚餐",
        "加餐",
        "睡眠",
        "心率",
        "压力",
        "全天消耗与活动",
        "力量训练",
        "有氧训练",
        "本日总结",
    ] {
        assert!(obj.contains_key(key), "missing wire key '{}'", key);
    }
    assert_eq!(
        value["力量训练"]["动作流水明细"][0]["单组容量"],
        json!(400.0)
    );
}

#[test]
fn supplement_directive_rides_along_with_empty_batch_content() {
    // Content assembly is pure; an empty timeline with quick-adds still
    // produces the Part 1 header plus the supplement directive.
    let timeline = healthsheet::pipeline::timeline::Timeline {
        fixed: vec![],
        floating: vec![],
        report_date: report_date(),
    };
    let content = assemble_content(
        &timeline,
        &QuickAdds {
            bcaa: true,
            protein: false,
        },
    );
    assert_eq!(content.len(), 2);
    let ContentBlock::Text(directive) = &content[1] else {
        panic!("expected text block");
    };
    assert!(directive.contains("BCAA 6g"));
    assert!(!directive.contains("蛋白粉"));
}
