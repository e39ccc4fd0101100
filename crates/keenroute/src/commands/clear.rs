//! `clear`: delete every static route on the router.

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    if !util::confirm(
        "Delete ALL static routes from the router?",
        "clear",
        global.yes,
    )? {
        output::print_output("Aborted.", global.quiet);
        return Ok(());
    }

    let mut router = util::connect(global)?;
    let deleted = router.delete_all_routes().await?;

    output::success(
        &format!("Cleared {deleted} static routes and saved config."),
        global.quiet,
        global.color,
    );
    Ok(())
}
