use chrono::Utc;

use dftrack::dashboard::Dashboard;
use dftrack::pagination::PageRequest;
use dftrack::remote::{self, DataFetcher, TokenProvider};
use dftrack::render;

use crate::{Context, DEMO_BANNER};

fn fetch(
    dashboard: &mut Dashboard,
    tokens: &dyn TokenProvider,
    fetcher: &dyn DataFetcher,
    req: PageRequest,
) {
    let result = remote::load_page(tokens, fetcher, &req.cursor);
    dashboard.complete(req.seq, result);
}

/// Load page `page` of the filtered collection, walking next links from the
/// first page. Falls back to sample data the same way the dashboard does.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn load(ctx: &Context, name: &str, owner: &str, page: u32) -> anyhow::Result<Dashboard> {
    let mut dashboard = ctx.dashboard(name, owner);
    if ctx.demo {
        dashboard.load_demo(DEMO_BANNER);
        return Ok(dashboard);
    }
    let (tokens, fetcher) = ctx.clients()?;
    let req = dashboard.start();
    fetch(&mut dashboard, tokens.as_ref(), fetcher.as_ref(), req);

    for _ in 1..page {
        if dashboard.snapshot().demo {
            break;
        }
        let Some(req) = dashboard.next_page() else {
            eprintln!(
                "[dftrack] only {} page(s) available",
                dashboard.snapshot().page.current_page
            );
            break;
        };
        fetch(&mut dashboard, tokens.as_ref(), fetcher.as_ref(), req);
    }
    Ok(dashboard)
}

/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn cmd_list(ctx: &Context, name: &str, owner: &str, page: u32) -> anyhow::Result<i32> {
    let dashboard = load(ctx, name, owner, page)?;
    print!("{}", render::screen(&dashboard.snapshot(), Utc::now()));
    Ok(0)
}
