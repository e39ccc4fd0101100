//! `backup`: fetch the router's routes and write them as a grouped routes file.

use keenroute_core::{group_routes, save_routes_file};

use crate::cli::{BackupArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(args: BackupArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut router = util::connect(global)?;

    let routes = if args.skip_unsupported {
        let report = router.fetch_routes_lenient().await?;
        if report.skipped > 0 {
            output::warn(
                &format!("skipped {} route(s) without an IPv4 destination", report.skipped),
                global.color,
            );
        }
        report.routes
    } else {
        router.fetch_routes().await?
    };

    let file = group_routes(&routes);
    save_routes_file(&args.output, &file)?;

    output::success(
        &format!(
            "Backed up {} routes to {}",
            file.host_count(),
            args.output.display()
        ),
        global.quiet,
        global.color,
    );
    Ok(())
}
