//! `resolve`: merge DNS answers for group domains into the routes file.

use keenroute_core::{SystemResolver, load_routes_file, resolve_domains, save_routes_file};

use crate::cli::{GlobalOpts, ResolveArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(args: ResolveArgs, global: &GlobalOpts) -> Result<(), CliError> {
    util::require_file(&args.file)?;

    let mut file = load_routes_file(&args.file)?;
    if !file.has_domains() {
        output::print_output("No domains to resolve.", global.quiet);
        return Ok(());
    }

    let summary = resolve_domains(&mut file, &SystemResolver).await?;

    save_routes_file(&args.file, &file)?;
    output::success(
        &format!(
            "Resolved {} domains in {} groups, added {} IPs.",
            summary.domains, summary.groups, summary.ips_added
        ),
        global.quiet,
        global.color,
    );
    Ok(())
}
