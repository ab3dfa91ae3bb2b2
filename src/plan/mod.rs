/// Deployment plan: matrix records and their Markdown comment.
pub mod markdown;
pub mod matrix;

pub use markdown::write_comment;
pub use matrix::{ProdHubJob, SupportStagingJob, parse_matrix};
