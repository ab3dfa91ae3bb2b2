/// `comment` command: write the deployment-plan comment body.
use crate::cli::OutputCtx;
use crate::cli::args::CommentArgs;
use crate::console::Colour;
use crate::errors::Result;
use crate::plan::{ProdHubJob, SupportStagingJob, parse_matrix, write_comment};
use crate::types::CommentOutput;

/// Run `deployer comment`.
///
/// # Errors
///
/// Returns `InvalidMatrix` for malformed JSON, `Io` if the file cannot be
/// written.
pub fn run(args: &CommentArgs, ctx: &OutputCtx) -> Result<()> {
    let support_staging: Vec<SupportStagingJob> =
        parse_matrix("support-staging", &args.support_staging_matrix)?;
    let prod: Vec<ProdHubJob> = parse_matrix("prod", &args.prod_matrix)?;

    let path = write_comment(&args.output_dir, &support_staging, &prod)?;

    let output = CommentOutput {
        ok: true,
        path: path.clone(),
        support_staging_jobs: support_staging.len(),
        prod_jobs: prod.len(),
    };
    ctx.report(
        &output,
        &format!("Deployment plan written to {}", path.display()),
        Colour::Green,
    )
}
