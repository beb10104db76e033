pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod sheets;

pub use config::AppConfig;
pub use error::{ReportError, SinkError};
pub use pipeline::{generate_report, QuickAdds, UploadedImage};
pub use record::DailyRecord;
