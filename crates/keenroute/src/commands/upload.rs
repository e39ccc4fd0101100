//! `upload`: flatten a routes file and add every route to the router.

use keenroute_core::{flatten_groups, load_routes_file};

use crate::cli::{GlobalOpts, UploadArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(args: UploadArgs, global: &GlobalOpts) -> Result<(), CliError> {
    util::require_file(&args.file)?;

    let file = load_routes_file(&args.file)?;
    let routes = flatten_groups(&file)?;
    if routes.is_empty() {
        output::print_output("No entries to upload.", global.quiet);
        return Ok(());
    }

    let mut router = util::connect(global)?;
    let report = router.add_routes(&routes).await?;

    output::success(
        &format!(
            "Uploaded {} static routes in {} batch(es) and saved config.",
            report.routes, report.batches
        ),
        global.quiet,
        global.color,
    );
    Ok(())
}
