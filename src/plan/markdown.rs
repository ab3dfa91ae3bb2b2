/// Markdown deployment-plan comment for pull requests.
///
/// The rendered comment is written to a file so a CI workflow can upload
/// it as an artifact and post it from a separate, privileged workflow.
use std::path::{Path, PathBuf};

use comfy_table::{Table, presets::ASCII_MARKDOWN};
use tracing::debug;

use super::matrix::{MatrixRow, ProdHubJob, SupportStagingJob};
use crate::errors::{DeployerError, Result};

/// File the comment body is written to, inside the output directory.
pub const COMMENT_FILE: &str = "comment-body.txt";

pub const NO_SUPPORT_STAGING: &str = "No support or staging upgrades will be triggered";
pub const NO_PROD: &str = "No production hub upgrades will be triggered";

/// Keep free text from breaking table structure.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}

/// Render `rows` as a Markdown table, or `None` when there are no rows.
#[must_use]
pub fn markdown_table<R: MatrixRow>(rows: &[R]) -> Option<String> {
    if rows.is_empty() {
        return None;
    }
    let mut table = Table::new();
    table.load_preset(ASCII_MARKDOWN);
    table.set_header(R::HEADERS.iter().copied());
    for row in rows {
        table.add_row(row.cells().iter().map(|c| escape_cell(c)));
    }
    Some(table.to_string())
}

/// Render the full deployment-plan comment.
#[must_use]
pub fn render_comment(support_staging: &[SupportStagingJob], prod: &[ProdHubJob]) -> String {
    let support_staging_section =
        markdown_table(support_staging).unwrap_or_else(|| NO_SUPPORT_STAGING.to_owned());
    let prod_section = markdown_table(prod).unwrap_or_else(|| NO_PROD.to_owned());

    format!(
        "<!-- deployment-plan -->\n\
         Merging this PR will trigger the following deployment actions.\n\
         \n\
         ### Support and Staging deployments\n\
         \n\
         {support_staging_section}\n\
         \n\
         ### Production deployments\n\
         \n\
         {prod_section}\n"
    )
}

/// Render the comment and write it to `dir/comment-body.txt`, replacing any
/// previous content.
///
/// # Errors
///
/// Returns `Io` if the file cannot be written.
pub fn write_comment(
    dir: &Path,
    support_staging: &[SupportStagingJob],
    prod: &[ProdHubJob],
) -> Result<PathBuf> {
    let path = dir.join(COMMENT_FILE);
    let body = render_comment(support_staging, prod);
    debug!(
        path = %path.display(),
        support_staging = support_staging.len(),
        prod = prod.len(),
        "writing deployment plan"
    );
    std::fs::write(&path, body).map_err(|source| DeployerError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
