//! Timeline assembly: prepared, classified uploads in prompt order.
//!
//! Food photos with a parseable capture time form the fixed, time-ordered
//! part of the prompt; everything else floats behind it under a category
//! label. The whole batch gets one report date.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{Datelike, Local, NaiveDateTime};
use serde_json::{json, Value};
use tracing::info;

use super::classify::{classify_filename, FileCategory};
use super::image_prep::prepare_image;
use crate::error::ReportError;

/// Floating-item labels shown to the model ahead of each image.
const LABEL_UNFILED_FOOD: &str = "【未归档食物】";
const LABEL_WORKOUT_SNAPSHOT: &str = "【健身详情截图】";
const LABEL_S_HEALTH: &str = "【SHealth汇总】";

const PART1_HEADER: &str = "## Part 1: 饮食照片流\n(请对以下食物照片进行精确视觉估算，包含热量, 蛋白质, 碳水, 脂肪, 膳食纤维)\n";
const PART2_HEADER: &str = "\n## Part 2: 健康数据截图 (OCR)\n请提取包括步频、配速、压力时序等所有详细数据。\n";

const BCAA_TEXT: &str = "- BCAA 6g (训练中摄入)\n";
const PROTEIN_TEXT: &str = "- 蛋白粉 32g + 肌酸 3g (训练后摄入)\n";

/// Timestamps at or before this year are treated as misparses when picking
/// the report date.
const MIN_VALID_YEAR: i32 = 2000;

/// One uploaded file: raw bytes plus the name the user's device gave it.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Fixed supplement quick-adds folded into the 加餐 slot on request.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuickAdds {
    pub bcaa: bool,
    pub protein: bool,
}

/// An upload after image preparation and filename classification.
#[derive(Debug, Clone)]
pub struct ClassifiedItem {
    pub filename: String,
    pub category: FileCategory,
    pub timestamp: Option<NaiveDateTime>,
    pub label: Option<&'static str>,
    pub mime: &'static str,
    pub data_b64: String,
}

/// The partitioned batch. Every input appears in exactly one of `fixed`
/// (food with timestamp, ascending) and `floating` (everything else).
#[derive(Debug)]
pub struct Timeline {
    pub fixed: Vec<ClassifiedItem>,
    pub floating: Vec<ClassifiedItem>,
    pub report_date: NaiveDateTime,
}

/// One block of the user message: either instruction text or an inline
/// base64 image.
#[derive(Debug, Clone)]
pub enum ContentBlock {
    Text(String),
    Image { mime: &'static str, data_b64: String },
}

impl ContentBlock {
    /// Render as an OpenAI-style content part.
    pub fn to_content_part(&self) -> Value {
        match self {
            ContentBlock::Text(text) => json!({ "type": "text", "text": text }),
            ContentBlock::Image { mime, data_b64 } => json!({
                "type": "image_url",
                "image_url": { "url": format!("data:{};base64,{}", mime, data_b64) }
            }),
        }
    }
}

/// Prepare and classify every upload, partition into fixed/floating, and
/// derive the report date.
///
/// # Errors
/// Propagates [`ReportError::Decode`] from image preparation.
pub fn build_timeline(files: &[UploadedImage]) -> Result<Timeline, ReportError> {
    build_timeline_at(files, Local::now().naive_local())
}

pub(crate) fn build_timeline_at(
    files: &[UploadedImage],
    now: NaiveDateTime,
) -> Result<Timeline, ReportError> {
    let mut fixed = Vec::new();
    let mut floating = Vec::new();

    for file in files {
        let (bytes, mime) = prepare_image(&file.bytes, &file.filename)?;
        let data_b64 = STANDARD.encode(&bytes);
        let (timestamp, category) = classify_filename(&file.filename);

        let mut item = ClassifiedItem {
            filename: file.filename.clone(),
            category,
            timestamp,
            label: None,
            mime,
            data_b64,
        };

        match category {
            FileCategory::Food => match timestamp {
                Some(_) => fixed.push(item),
                None => {
                    item.label = Some(LABEL_UNFILED_FOOD);
                    floating.push(item);
                }
            },
            FileCategory::WorkoutSnapshot => {
                item.label = Some(LABEL_WORKOUT_SNAPSHOT);
                floating.push(item);
            }
            FileCategory::SHealth => {
                item.label = Some(LABEL_S_HEALTH);
                floating.push(item);
            }
        }
    }

    fixed.sort_by_key(|item| item.timestamp);
    let report_date = pick_report_date(fixed.iter().filter_map(|item| item.timestamp), now);

    info!(
        "Timeline built: {} fixed, {} floating, report date {}",
        fixed.len(),
        floating.len(),
        report_date.format("%Y-%m-%d")
    );

    Ok(Timeline {
        fixed,
        floating,
        report_date,
    })
}

/// The batch's single report date: the earliest timestamp with a plausible
/// year, or `fallback` when nothing qualifies. Pre-2001 years are treated
/// as misparses and skipped.
pub(crate) fn pick_report_date(
    candidates: impl Iterator<Item = NaiveDateTime>,
    fallback: NaiveDateTime,
) -> NaiveDateTime {
    candidates
        .filter(|ts| ts.year() > MIN_VALID_YEAR)
        .min()
        .unwrap_or(fallback)
}

/// Assemble the ordered user-message content: the timed food stream, the
/// optional supplement directive, then labeled health screenshots.
pub fn assemble_content(timeline: &Timeline, quick_adds: &QuickAdds) -> Vec<ContentBlock> {
    let mut content = vec![ContentBlock::Text(PART1_HEADER.to_string())];

    for item in &timeline.fixed {
        let Some(ts) = item.timestamp else { continue };
        content.push(ContentBlock::Text(format!(
            "- {} [食物照片] (请估算热量及宏量营养素)",
            ts.format("%H:%M")
        )));
        content.push(ContentBlock::Image {
            mime: item.mime,
            data_b64: item.data_b64.clone(),
        });
    }

    let mut supplement_text = String::new();
    if quick_adds.bcaa {
        supplement_text.push_str(BCAA_TEXT);
    }
    if quick_adds.protein {
        supplement_text.push_str(PROTEIN_TEXT);
    }
    if !supplement_text.is_empty() {
        content.push(ContentBlock::Text(format!(
            "\n## 特别指令：补剂\n【强制要求】请将以下补剂合并计算入 JSON 的 `加餐` 字段：\n{}",
            supplement_text
        )));
    }

    let snapshots: Vec<&ClassifiedItem> = timeline
        .floating
        .iter()
        .filter(|item| {
            matches!(
                item.category,
                FileCategory::WorkoutSnapshot | FileCategory::SHealth
            )
        })
        .collect();

    if !snapshots.is_empty() {
        content.push(ContentBlock::Text(PART2_HEADER.to_string()));
        for item in snapshots {
            content.push(ContentBlock::Text(format!(
                "📸 {}",
                item.label.unwrap_or("")
            )));
            content.push(ContentBlock::Image {
                mime: item.mime,
                data_b64: item.data_b64.clone(),
            });
        }
    }

    content
}
