use dftrack::render;

use crate::{Context, list_cmd};

/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn cmd_show(ctx: &Context, key: &str, name: &str, owner: &str) -> anyhow::Result<i32> {
    let dashboard = list_cmd::load(ctx, name, owner, 1)?;
    let snapshot = dashboard.snapshot();
    if let Some(banner) = snapshot.banner
        && !ctx.demo
    {
        eprintln!("[dftrack] {banner}");
    }
    let Some(view) = dashboard.find(key) else {
        eprintln!("[dftrack] no dataflow matching \"{key}\" on the first page");
        return Ok(1);
    };
    print!("{}", render::detail(view));
    Ok(0)
}
