//! `list`: show the router's static routes.

use tabled::Tabled;

use keenroute_core::Route;

use crate::cli::{GlobalOpts, ListArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct RouteRow {
    #[tabled(rename = "Destination")]
    destination: String,
    #[tabled(rename = "Via")]
    via: String,
    #[tabled(rename = "Auto")]
    auto: &'static str,
    #[tabled(rename = "Reject")]
    reject: &'static str,
    #[tabled(rename = "Comment")]
    comment: String,
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "" }
}

fn to_row(route: &Route) -> RouteRow {
    RouteRow {
        destination: route.destination.to_string(),
        via: route.target().to_owned(),
        auto: yes_no(route.auto),
        reject: yes_no(route.reject),
        comment: route.comment.clone(),
    }
}

pub async fn handle(args: ListArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut router = util::connect(global)?;
    let report = router.fetch_routes_lenient().await?;
    if report.skipped > 0 {
        output::warn(
            &format!("{} route(s) without an IPv4 destination not shown", report.skipped),
            global.color,
        );
    }

    let out = output::render_list(args.output, &report.routes, to_row, |r| {
        r.destination.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
