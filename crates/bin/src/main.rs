//! findash CLI binary.
//!
//! Renders dashboard pages for a ticker on the terminal.

use clap::{Parser, Subcommand, ValueEnum};
use findash::{
    AlphaVantageClient, CleanOptions, DashError, Dashboard, InMemoryCache, Interval, LogLevel,
    Page, PageData, ReportPeriod, Settings, StatementKind, Topics, time_series_frame,
};
use serde_json::Value;
use std::process;
use std::sync::Arc;
use tracing::{Level, subscriber, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "findash")]
#[command(about = "Financial dashboard over the Alpha Vantage API", long_about = None)]
#[command(version)]
struct Cli {
    /// API key (defaults to ALPHA_VANTAGE_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatementArg {
    BalanceSheet,
    IncomeStatement,
    CashFlow,
}

impl From<StatementArg> for StatementKind {
    fn from(arg: StatementArg) -> Self {
        match arg {
            StatementArg::BalanceSheet => Self::BalanceSheet,
            StatementArg::IncomeStatement => Self::IncomeStatement,
            StatementArg::CashFlow => Self::CashFlow,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum IntervalArg {
    Daily,
    Weekly,
    Monthly,
}

impl From<IntervalArg> for Interval {
    fn from(arg: IntervalArg) -> Self {
        match arg {
            IntervalArg::Daily => Self::Daily,
            IntervalArg::Weekly => Self::Weekly,
            IntervalArg::Monthly => Self::Monthly,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the company card
    Overview {
        /// Stock symbol
        symbol: String,
    },

    /// Show a financial statement
    Statement {
        /// Stock symbol
        symbol: String,

        /// Which statement
        #[arg(long, value_enum, default_value = "balance-sheet")]
        kind: StatementArg,

        /// Quarterly instead of annual reports
        #[arg(long)]
        quarterly: bool,
    },

    /// Print one statement row as a chart series
    Chart {
        /// Stock symbol
        symbol: String,

        /// Row label, e.g. totalAssets
        category: String,

        /// Which statement
        #[arg(long, value_enum, default_value = "balance-sheet")]
        kind: StatementArg,

        /// Quarterly instead of annual reports
        #[arg(long)]
        quarterly: bool,

        /// Treat zero values as missing
        #[arg(long)]
        zero_is_missing: bool,
    },

    /// Show price bars
    Quotes {
        /// Stock symbol
        symbol: String,

        /// Bar interval
        #[arg(long, value_enum, default_value = "daily")]
        interval: IntervalArg,

        /// Full history instead of the last 100 daily bars
        #[arg(long)]
        full: bool,
    },

    /// Show overview ratios
    Kpi {
        /// Stock symbol
        symbol: String,
    },

    /// Search tickers by keywords
    Search {
        /// Search keywords
        keywords: String,
    },

    /// Show news and sentiment
    News {
        /// Stock symbol
        symbol: String,

        /// Comma-separated topics
        #[arg(long)]
        topics: Option<String>,

        /// Number of articles
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show today's top gainers, losers and most active tickers
    Movers,

    /// Render a dashboard page by name
    Page {
        /// Page title or name, e.g. "Balance Sheet" or balance-sheet
        page: String,

        /// Stock symbol
        symbol: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env();

    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(max_level(settings.log_level))
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = subscriber::set_global_default(my_subscriber) {
        eprintln!("Error: could not install logger: {e}");
    }
    if let Some(raw) = &settings.rejected_log_level {
        warn!(
            "Invalid logging level {raw:?}, using {}. Valid levels: DEBUG, INFO, WARNING, ERROR, CRITICAL",
            settings.log_level
        );
    }

    if let Err(e) = run(Cli::parse(), &settings).await {
        eprintln!("Error: {e}");
        let code = match e {
            DashError::Configuration(_) => 2,
            _ => 1,
        };
        process::exit(code);
    }
}

const fn max_level(level: LogLevel) -> Level {
    match level {
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info => Level::INFO,
        LogLevel::Warning => Level::WARN,
        LogLevel::Error | LogLevel::Critical => Level::ERROR,
    }
}

async fn run(cli: Cli, settings: &Settings) -> findash::Result<()> {
    let client = AlphaVantageClient::from_settings(settings, cli.api_key.as_deref())?
        .with_cache(Arc::new(InMemoryCache::new()));
    let dashboard = Dashboard::new(client.clone());

    match cli.command {
        Commands::Overview { symbol } => {
            print_page(&dashboard.load(Page::CompanyOverview, &symbol).await);
        }
        Commands::Statement {
            symbol,
            kind,
            quarterly,
        } => {
            let table = dashboard
                .with_period(period(quarterly))
                .statement(kind.into(), &symbol)
                .await;
            println!("{table}");
        }
        Commands::Chart {
            symbol,
            category,
            kind,
            quarterly,
            zero_is_missing,
        } => {
            let series = dashboard
                .with_period(period(quarterly))
                .with_clean_options(CleanOptions::default().with_zero_is_missing(zero_is_missing))
                .chart_series(kind.into(), &symbol, &category)
                .await?;
            println!("{}", series.category);
            for point in &series.points {
                let value = point.value.map_or_else(|| "-".to_string(), |v| v.to_string());
                println!("{}\t{value}", point.period);
            }
        }
        Commands::Quotes {
            symbol,
            interval,
            full,
        } => {
            let interval = Interval::from(interval);
            let response = client.time_series(&symbol, interval, full).await;
            println!("{}", time_series_frame(&response, interval)?);
        }
        Commands::Kpi { symbol } => {
            println!("{}", dashboard.kpis(&symbol).await);
        }
        Commands::Search { keywords } => {
            for found in dashboard.search(&keywords).await {
                println!(
                    "{}\t{}\t{}\t{}",
                    found.symbol, found.name, found.region, found.match_score
                );
            }
        }
        Commands::News {
            symbol,
            topics,
            limit,
        } => {
            let topics = topics.map(Topics::from);
            print_json(&client.market_news_sentiment(&symbol, topics.as_ref(), limit).await)?;
        }
        Commands::Movers => {
            print_json(&client.top_gainers_losers().await)?;
        }
        Commands::Page { page, symbol } => {
            let page: Page = page.parse()?;
            print_page(&dashboard.load(page, &symbol).await);
        }
    }

    Ok(())
}

const fn period(quarterly: bool) -> ReportPeriod {
    if quarterly {
        ReportPeriod::Quarterly
    } else {
        ReportPeriod::Annual
    }
}

fn print_json(value: &Value) -> findash::Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| DashError::Other(e.to_string()))?;
    println!("{text}");
    Ok(())
}

fn print_page(data: &PageData) {
    match data {
        PageData::Home => {
            println!("Pick a page:");
            for page in Page::ALL.iter().skip(1) {
                println!("  {} ({})", page.title(), page.slug());
            }
        }
        PageData::Overview(card) => {
            for (key, value) in card {
                let text = value.as_str().map_or_else(|| value.to_string(), str::to_string);
                println!("{key}: {text}");
            }
        }
        PageData::Statement { kind, table } => {
            println!("{}", kind.title());
            println!("{table}");
        }
        PageData::Quotes(df) | PageData::Kpis(df) => println!("{df}"),
    }
    if data.is_empty() {
        warn!("No data to show");
    }
}
