mod output;

use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::services::aggregator::{CHARGEBACK_TOP_N, EXECUTIVE_TOP_N, TREND_TOP_N};
use crate::services::{
    ChargebackFilter, Completion, Desensitizer, PageRequest, PageView, Poller, ReportClient,
    ViewState,
};
use crate::types::{Dimension, Snapshot};

/// Chargeback and cost report client
#[derive(Parser)]
#[command(name = "chargeview")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides config file and CHARGEVIEW_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the chargeback summary
    Chargeback {
        #[command(flatten)]
        args: ChargebackArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the executive summary
    Executive {
        #[command(flatten)]
        args: ExecutiveArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show daily cost trends
    Trends {
        #[command(flatten)]
        args: TrendArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Refresh a page on its polling interval until Ctrl-C
    Watch {
        /// Override the polling interval in seconds
        #[arg(long)]
        interval: Option<u64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        #[command(subcommand)]
        page: Page,
    },

    /// Mask emails, phone numbers, id numbers and IPs in text (stdin if empty)
    Mask {
        text: Vec<String>,
        /// Treat input as JSON and mask by field name
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Page {
    Chargeback(ChargebackArgs),
    Executive(ExecutiveArgs),
    Trends(TrendArgs),
}

#[derive(Args, Debug, Clone, PartialEq)]
struct ChargebackArgs {
    /// Reporting period in days
    #[arg(long, default_value_t = 30)]
    period_days: u32,
    /// Restrict to one team
    #[arg(long)]
    team: Option<String>,
    /// Entries per breakdown
    #[arg(long, default_value_t = CHARGEBACK_TOP_N)]
    top: usize,
}

#[derive(Args, Debug, Clone, PartialEq)]
struct ExecutiveArgs {
    /// Top applications to show
    #[arg(long, default_value_t = EXECUTIVE_TOP_N)]
    top: usize,
}

#[derive(Args, Debug, Clone, PartialEq)]
struct TrendArgs {
    /// Window in days
    #[arg(long, default_value_t = 30)]
    days: u32,
    /// Dimension to split series by
    #[arg(long, value_enum, default_value_t = Dimension::Team)]
    group_by: Dimension,
    /// Series to draw
    #[arg(long, default_value_t = TREND_TOP_N)]
    top: usize,
}

impl From<ChargebackArgs> for PageRequest {
    fn from(args: ChargebackArgs) -> Self {
        PageRequest::Chargeback {
            filter: ChargebackFilter {
                period_days: args.period_days,
                team: args.team,
            },
            top_n: args.top,
        }
    }
}

impl From<ExecutiveArgs> for PageRequest {
    fn from(args: ExecutiveArgs) -> Self {
        PageRequest::Executive { top_n: args.top }
    }
}

impl From<TrendArgs> for PageRequest {
    fn from(args: TrendArgs) -> Self {
        PageRequest::Trends {
            days: args.days,
            dimension: args.group_by,
            top_n: args.top,
        }
    }
}

impl From<Page> for PageRequest {
    fn from(page: Page) -> Self {
        match page {
            Page::Chargeback(args) => args.into(),
            Page::Executive(args) => args.into(),
            Page::Trends(args) => args.into(),
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Mask { text, json } => run_mask(text, json),
            Commands::Chargeback { args, json } => {
                show(&load_config(self.base_url)?, args.into(), json).await
            }
            Commands::Executive { args, json } => {
                show(&load_config(self.base_url)?, args.into(), json).await
            }
            Commands::Trends { args, json } => {
                show(&load_config(self.base_url)?, args.into(), json).await
            }
            Commands::Watch {
                interval,
                json,
                page,
            } => {
                let config = load_config(self.base_url)?;
                watch(&config, page.into(), interval, json).await
            }
        }
    }
}

fn load_config(base_url: Option<String>) -> anyhow::Result<Config> {
    let config = Config::load()
        .context("Failed to load configuration")?
        .with_base_url(base_url)?;
    Ok(config)
}

fn print_view(view: &PageView, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        print!("{}", output::render(view));
    }
    Ok(())
}

async fn show(config: &Config, request: PageRequest, json: bool) -> anyhow::Result<()> {
    let client = ReportClient::new(config)?;
    let view = request.load(&client).await.map_err(|e| {
        log::error!("{} fetch failed: {}", request.name(), e);
        e
    });
    let view = view.with_context(|| format!("Failed to load {}", request.name()))?;
    print_view(&view, json)
}

async fn watch(
    config: &Config,
    request: PageRequest,
    interval: Option<u64>,
    json: bool,
) -> anyhow::Result<()> {
    let client = ReportClient::new(config)?;
    let interval = interval
        .map(Duration::from_secs)
        .unwrap_or_else(|| request.poll_interval(config));
    let name = request.name();
    let state: Arc<ViewState<Snapshot<PageView>>> = Arc::new(ViewState::new(name));

    let poller = {
        let state = state.clone();
        Poller::spawn(name, interval, move || {
            let client = client.clone();
            let state = state.clone();
            let request = request.clone();
            async move {
                let token = state.begin();
                let result = request.load(&client).await.map(Snapshot::now);
                match state.complete(token, result) {
                    Completion::Applied => {
                        if let Some(snapshot) = state.data() {
                            if json {
                                match serde_json::to_string(&snapshot) {
                                    Ok(line) => println!("{}", line),
                                    Err(e) => log::error!("serializing snapshot failed: {}", e),
                                }
                            } else {
                                println!("{}", output::render_snapshot(&snapshot));
                            }
                        }
                    }
                    Completion::Failed => {
                        if let Some(message) = state.error() {
                            eprintln!("{}", message);
                        }
                    }
                    Completion::Stale => {}
                }
            }
        })
    };

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    poller.stop().await;
    Ok(())
}

fn run_mask(text: Vec<String>, json: bool) -> anyhow::Result<()> {
    let input = if text.is_empty() {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        text.join(" ")
    };

    let masker = Desensitizer::new();
    if json {
        let value: serde_json::Value =
            serde_json::from_str(&input).context("Input is not valid JSON")?;
        println!(
            "{}",
            serde_json::to_string_pretty(&masker.desensitize_json(&value))?
        );
    } else {
        print!("{}", masker.desensitize_text(&input));
        if !input.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}
