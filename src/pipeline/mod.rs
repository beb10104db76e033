//! The report pipeline: uploads in, schema-complete record out.
//!
//! Strictly sequential — each image is prepared and classified in turn,
//! one blocking model call follows, then the reply is parsed, normalized,
//! and aggregated. Nothing is retried; the only hard failures are image
//! decode errors and the model call itself.

pub mod classify;
pub mod extraction;
pub mod image_prep;
pub mod prompts;
pub mod timeline;

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::ReportError;
use crate::record::{aggregate_strength, normalize, DailyRecord};

pub use timeline::{QuickAdds, UploadedImage};

/// Run the full pipeline for one batch of uploads.
pub async fn generate_report(
    files: &[UploadedImage],
    quick_adds: &QuickAdds,
    config: &AppConfig,
) -> Result<DailyRecord, ReportError> {
    let batch = timeline::build_timeline(files)?;
    let content = timeline::assemble_content(&batch, quick_adds);

    let response_text = extraction::request_report(config, &content).await?;
    let raw = extraction::extract_json_object(&response_text);
    if raw.is_empty() {
        warn!("model reply contained no usable JSON; report will be all defaults");
    }

    let mut record = normalize(raw, batch.report_date);
    let total_volume = aggregate_strength(&mut record);

    info!(
        "Report ready for {} ({}): training volume {} kg",
        record.date, record.weekday, total_volume
    );
    Ok(record)
}
