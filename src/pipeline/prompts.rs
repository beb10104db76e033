//! System prompt and response-schema text for the report extraction call.
//!
//! The wording is an opaque instruction payload: the pipeline only relies
//! on the response being one JSON object shaped like [`RESPONSE_SCHEMA`].

/// JSON template the model is instructed to fill. Keys must match the
/// wire names on the record types in [`crate::record`].
pub const RESPONSE_SCHEMA: &str = r#"
{
  "营养摄入汇总": {
    "总热量": 0, "总蛋白质": 0, "总碳水": 0, "总脂肪": 0, "总膳食纤维": 0,
    "总盈余缺口分析": "..."
  },
  "早餐": {
    "时间": "HH:MM", "内容": "...", "热量": 0, "蛋白质": 0, "碳水": 0, "脂肪": 0, "膳食纤维": 0, "点评": "..."
  },
  "午餐": {
    "时间": "HH:MM", "内容": "...", "热量": 0, "蛋白质": 0, "碳水": 0, "脂肪": 0, "膳食纤维": 0, "点评": "..."
  },
  "晚餐": {
    "时间": "HH:MM", "内容": "...", "热量": 0, "蛋白质": 0, "碳水": 0, "脂肪": 0, "膳食纤维": 0, "点评": "..."
  },
  "加餐": {
    "时间": "HH:MM", "内容": "...", "热量": 0, "蛋白质": 0, "碳水": 0, "脂肪": 0, "膳食纤维": 0, "点评": "..."
  },
  "睡眠": {
    "入睡时间": "HH:MM", "起床时间": "HH:MM", "睡眠总时长": "...",
    "睡眠阶段分析": "...", "睡眠点评": "..."
  },
  "心率": {
    "静息心率": 0, "平均静息范围": "...", "全天心率范围": "...",
    "心率时序分析": "...", "心率点评": "..."
  },
  "压力": {
    "压力均值": 0, "压力时序分析": "...", "压力点评": "..."
  },
  "全天消耗与活动": {
    "总步数": 0, "活动时长": "...", "活动卡路里": 0, "燃烧的卡路里总数": 0
  },
  "力量训练": {
    "力量主题": "...", "具体时间": "HH:MM", "训练时长": "...",
    "动作流水明细": [
      {
        "动作名称": "...", "OCR原始行": "如: 1/热 10+10kg 12", "组序号": "1", "重量": 20, "次数": 12
      }
    ],
    "总容量": 0, "消耗估算": 0, "力量点评": "..."
  },
  "有氧训练": {
    "有氧类型": "...", "具体时间": "HH:MM", "距离": "...", "有氧时长": "...",
    "平均心率": "...", "平均步频": "...", "平均步速": "...", "有氧卡路里消耗": "..."
  },
  "本日总结": { "本日分析": "...", "指导建议": "..." }
}
"#;

/// Build the system instruction for the extraction request.
pub fn build_system_prompt() -> String {
    format!(
        r#"你是一名精英营养师和数据分析师。

【任务 1：力量训练 - 逐行提取】
**不要合并！** 截图有几组，数组里就有几个对象。
**不要乘序号！** 单组容量 = 重量 * 次数。

【任务 2：膳食纤维与营养】
对食物照片进行估算时，必须进行精确视觉估算，包含热量, 蛋白质, 碳水, 脂肪, 膳食纤维数据。

【任务 3：压力均值】
若无直接均值，按 (高*90 + 中*65 + 低*40 + 放松*10)/100 计算。

【输出要求】
严格 JSON 格式，不要多余文本。
{schema}
"#,
        schema = RESPONSE_SCHEMA
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_valid_json() {
        let value: serde_json::Value = serde_json::from_str(RESPONSE_SCHEMA).unwrap();
        let obj = value.as_object().unwrap();
        for key in [
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
            assert!(obj.contains_key(key), "schema missing section '{}'", key);
        }
    }

    #[test]
    fn test_system_prompt_embeds_schema() {
        let prompt = build_system_prompt();
        assert!(prompt.contains("营养摄入汇总"));
        assert!(prompt.contains("单组容量 = 重量 * 次数"));
        assert!(prompt.contains("严格 JSON 格式"));
    }
}
