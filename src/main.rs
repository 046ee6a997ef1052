mod browse_cmd;
mod history_cmd;
mod list_cmd;
mod show_cmd;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dftrack::config::{self, DashboardConfig};
use dftrack::dashboard::Dashboard;
use dftrack::remote::odata::ODataClient;
use dftrack::remote::token::HttpTokenProvider;
use dftrack::remote::{DataFetcher, TokenProvider, Unconfigured, http};

/// Banner shown when sample data is requested explicitly.
pub const DEMO_BANNER: &str = "Demo Mode: showing sample data.";

#[derive(Parser)]
#[command(
    name = "dftrack",
    version,
    about = "Browse dataflows and their refresh history from an OData service"
)]
struct Cli {
    /// Dataflow collection URL (overrides DFTRACK_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Token endpoint URL (overrides DFTRACK_TOKEN_URL)
    #[arg(long, global = true)]
    token_url: Option<String>,

    /// Records per page
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    page_size: Option<u32>,

    /// Use the built-in sample dataset instead of the service
    #[arg(long, global = true, env = "DFTRACK_DEMO")]
    demo: bool,

    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the request URL for the first page of a query
    Query {
        /// Match against dataflow name or description
        #[arg(long, default_value = "")]
        name: String,
        /// Match against the owning user's full name
        #[arg(long, default_value = "")]
        owner: String,
    },
    /// Fetch and print one page of dataflows
    List {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        owner: String,
        /// 1-based page to show
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// Show one dataflow in detail
    Show {
        /// Dataflow id or name
        key: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        owner: String,
    },
    /// Normalize a raw refresh-history payload and print its runs
    History {
        /// File holding the payload (reads stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Interactive dashboard
    Browse,
}

/// Resolved settings shared by the subcommands.
pub struct Context {
    pub config: DashboardConfig,
    pub demo: bool,
}

impl Context {
    fn from_cli(cli: &Cli) -> Self {
        let mut config = config::load();
        if let Some(url) = &cli.base_url {
            config.base_url = Some(url.clone());
        }
        if let Some(url) = &cli.token_url {
            config.token_url = Some(url.clone());
        }
        if let Some(size) = cli.page_size {
            config.page_size = size;
        }
        Self {
            config,
            demo: cli.demo,
        }
    }

    /// A dashboard over the configured collection with settled filters.
    pub fn dashboard(&self, name: &str, owner: &str) -> Dashboard {
        Dashboard::new(
            self.config.base_url.clone().unwrap_or_default(),
            self.config.page_size,
            self.config.debounce(),
        )
        .with_filters(name, owner)
    }

    /// Token provider and fetcher for the configured service.
    ///
    /// Without a complete configuration both are [`Unconfigured`], so the
    /// first fetch fails and the dashboard falls back to sample data.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn clients(&self) -> anyhow::Result<(Box<dyn TokenProvider>, Box<dyn DataFetcher>)> {
        let Some((_, token_url)) = self.config.remote() else {
            tracing::debug!("service not configured");
            return Ok((Box::new(Unconfigured), Box::new(Unconfigured)));
        };
        let client = http::build_client(self.config.timeout_secs)?;
        Ok((
            Box::new(HttpTokenProvider::new(client.clone(), token_url.to_string())),
            Box::new(ODataClient::new(client)),
        ))
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "dftrack=debug" } else { "dftrack=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("DFTRACK_LOG")
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn cmd_query(ctx: &Context, name: &str, owner: &str, verbose: bool) -> i32 {
    let dashboard = ctx.dashboard(name, owner);
    let query = dashboard.query();
    if verbose {
        for (key, value) in query.params() {
            eprintln!("[dftrack] {key} = {value}");
        }
    }
    println!(
        "{}",
        query.to_url(ctx.config.base_url.as_deref().unwrap_or_default())
    );
    0
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let ctx = Context::from_cli(&cli);

    let result = match &cli.command {
        Commands::Query { name, owner } => Ok(cmd_query(&ctx, name, owner, cli.verbose)),
        Commands::List { name, owner, page } => list_cmd::cmd_list(&ctx, name, owner, *page),
        Commands::Show { key, name, owner } => show_cmd::cmd_show(&ctx, key, name, owner),
        Commands::History { file } => history_cmd::cmd_history(file.as_deref()),
        Commands::Browse => browse_cmd::cmd_browse(&ctx),
    };
    let exit_code = result.unwrap_or_else(|e| {
        eprintln!("[dftrack] error: {e:#}");
        1
    });
    std::process::exit(exit_code);
}
