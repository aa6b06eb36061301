use analytics::AnalyticsEngine;
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use configuration::{LogFormat, Settings};
use core_types::units::format_compact_usd;
use core_types::{DashboardFilter, FilterState};
use dashboard_client::{ChartView, DashboardApi, HttpDashboardClient};
use database::{ConnectionOptions, DbRepository};
use rust_decimal::Decimal;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use web_server::AppState;

/// The entry point for the Tangguh TEP contract analytics dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = configuration::load_settings(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(format) = cli.log_format {
        settings.logging.format = format;
    }
    // Held until exit so buffered file logs are flushed.
    let _log_guard = configuration::init_tracing(&settings.logging)?;

    match cli.command {
        Commands::Serve(args) => handle_serve(args, settings).await,
        Commands::Migrate => handle_migrate(&settings).await,
        Commands::Summary => handle_summary(&settings).await,
        Commands::Fetch(args) => handle_fetch(args, &settings).await,
        Commands::Options(args) => handle_options(args, &settings).await,
        Commands::Events(args) => handle_events(args, &settings).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Contract analytics for the Tangguh Expansion Project.
#[derive(Parser)]
#[command(name = "tangguh", author, version, about, long_about = None)]
struct Cli {
    /// A TOML settings file. Defaults to `config.toml` when it exists.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the configured console log format.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dashboard HTTP API.
    Serve(ServeArgs),
    /// Apply the database migrations and exit.
    Migrate,
    /// Print the KPI summary, contract evolution and variation order totals.
    Summary,
    /// Fetch one chart view from a running server and print it as JSON.
    Fetch(FetchArgs),
    /// List the years, amendments, disciplines and subcontractors a running server offers.
    Options(RemoteArgs),
    /// List the project events a running server would overlay on the monthly charts.
    Events(EventsArgs),
}

#[derive(Args)]
struct ServeArgs {
    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args)]
struct RemoteArgs {
    /// The server to query. Defaults to `client.base_url`.
    #[arg(long)]
    base_url: Option<String>,
}

#[derive(Args)]
struct EventsArgs {
    #[command(flatten)]
    remote: RemoteArgs,

    /// Earliest event start (format: YYYY-MM-DD).
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Latest event start (format: YYYY-MM-DD).
    #[arg(long)]
    end: Option<NaiveDate>,
}

#[derive(Args)]
struct FetchArgs {
    /// One of: summary, contract-evolution, monthly-cost, cost-breakdown,
    /// pamf-analysis, pob-timeline, project-progress, variation-orders.
    view: ChartView,

    #[command(flatten)]
    remote: RemoteArgs,

    #[arg(long)]
    year: Option<i32>,

    /// Start of the date range (format: YYYY-MM-DD).
    #[arg(long)]
    start: Option<NaiveDate>,

    /// End of the date range (format: YYYY-MM-DD).
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Comma-separated amendment ids.
    #[arg(long, value_delimiter = ',')]
    amendments: Vec<i32>,

    /// Comma-separated discipline ids.
    #[arg(long, value_delimiter = ',')]
    disciplines: Vec<i32>,

    /// Comma-separated subcontractor ids.
    #[arg(long, value_delimiter = ',')]
    subcontractors: Vec<i32>,
}

impl FetchArgs {
    fn filter_state(&self) -> FilterState {
        let mut filters = FilterState::default();
        filters.update_year(self.year);
        filters.update_date_range(self.start, self.end);
        filters.update_amendments(self.amendments.clone());
        filters.update_disciplines(self.disciplines.clone());
        filters.update_subcontractors(self.subcontractors.clone());
        filters
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn connect_repository(settings: &Settings) -> anyhow::Result<DbRepository> {
    let mut options = ConnectionOptions::new(settings.require_database_url()?);
    options.max_connections = settings.database.max_connections;
    options.acquire_timeout = settings.database.acquire_timeout();

    let pool = database::connect(&options).await.context("Failed to connect to the database")?;
    Ok(DbRepository::new(pool))
}

async fn handle_serve(args: ServeArgs, mut settings: Settings) -> anyhow::Result<()> {
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    let addr: SocketAddr = settings
        .server
        .address()
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", settings.server.address()))?;

    let db_repo = connect_repository(&settings).await?;
    if settings.database.run_migrations {
        database::run_migrations(db_repo.pool()).await.context("Failed to run database migrations")?;
    }

    web_server::run_server(addr, Arc::new(AppState::new(db_repo))).await
}

async fn handle_migrate(settings: &Settings) -> anyhow::Result<()> {
    let db_repo = connect_repository(settings).await?;
    database::run_migrations(db_repo.pool()).await.context("Failed to run database migrations")?;
    println!("Migrations applied.");
    Ok(())
}

fn usd(value: f64) -> String {
    Decimal::try_from(value).map(format_compact_usd).unwrap_or_else(|_| value.to_string())
}

async fn handle_summary(settings: &Settings) -> anyhow::Result<()> {
    let db_repo = connect_repository(settings).await?;
    let engine = AnalyticsEngine::new();
    let everything = DashboardFilter::default();

    let (snapshot, (amendments, values), variation_orders) = tokio::try_join!(
        db_repo.summary_snapshot(),
        db_repo.contract_evolution(&everything),
        db_repo.variation_orders(&everything),
    )?;

    let summary = engine.summary(&snapshot);
    let mut kpis = Table::new();
    kpis.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["KPI", "Value"]);
    kpis.add_row(vec!["Total contract value".to_string(), usd(summary.total_contract_value)]);
    kpis.add_row(vec!["Original contract value".to_string(), usd(summary.original_contract_value)]);
    kpis.add_row(vec!["Growth".to_string(), format!("{:.1}%", summary.growth_percent)]);
    kpis.add_row(vec!["Latest amendment".to_string(), summary.latest_amendment.clone().unwrap_or_else(|| "-".to_string())]);
    kpis.add_row(vec!["Amendments".to_string(), summary.amendment_count.to_string()]);
    kpis.add_row(vec!["PAMF claims".to_string(), summary.pamf_count.to_string()]);
    kpis.add_row(vec!["Subcontractors".to_string(), summary.subcontractor_count.to_string()]);
    let period = match (summary.start_date, summary.end_date) {
        (Some(start), Some(end)) => format!("{start} to {end}"),
        (Some(start), None) => format!("from {start}"),
        _ => "-".to_string(),
    };
    kpis.add_row(vec!["Project period".to_string(), period]);
    println!("{kpis}");

    let mut evolution = Table::new();
    evolution
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Amendment", "Name", "Effective", "Total value"]);
    for point in engine.contract_evolution(&amendments, &values) {
        evolution.add_row(vec![
            point.amendment_code,
            point.amendment_name,
            point.effective_date.map(|d| d.to_string()).unwrap_or_default(),
            usd(point.total_value),
        ]);
    }
    println!("{evolution}");

    let stats = engine.variation_order_stats(&variation_orders);
    let mut vo_table = Table::new();
    vo_table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Variation orders", "Count", "Value"]);
    vo_table.add_row(vec![
        "All".to_string(),
        stats.count.to_string(),
        format_compact_usd(stats.total_value),
    ]);
    vo_table.add_row(vec![
        "Approved".to_string(),
        stats.approved_count.to_string(),
        format_compact_usd(stats.approved_value),
    ]);
    println!("{vo_table}");

    Ok(())
}

impl RemoteArgs {
    fn client(&self, settings: &Settings) -> anyhow::Result<HttpDashboardClient> {
        let base_url = self.base_url.clone().unwrap_or_else(|| settings.client.base_url.clone());
        Ok(HttpDashboardClient::new(base_url)?)
    }
}

async fn handle_fetch(args: FetchArgs, settings: &Settings) -> anyhow::Result<()> {
    let client = args.remote.client(settings)?;
    let filters = args.filter_state();

    tracing::info!(view = %args.view, url = %client.view_url(args.view, &filters), "Fetching chart view.");
    let data = client
        .fetch_view(args.view, &filters)
        .await
        .with_context(|| format!("Failed to fetch {}", args.view))?;

    if data.is_empty() {
        eprintln!("No data for {} with the given filters.", args.view);
    }
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}

async fn handle_options(args: RemoteArgs, settings: &Settings) -> anyhow::Result<()> {
    let options = args.client(settings)?.filter_options().await.context("Failed to fetch filter options")?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Filter", "Id", "Label"]);
    for year in &options.years {
        table.add_row(vec!["year".to_string(), year.to_string(), year.to_string()]);
    }
    for amendment in &options.amendments {
        table.add_row(vec!["amendment".to_string(), amendment.id.to_string(), amendment.code.clone()]);
    }
    for discipline in &options.disciplines {
        table.add_row(vec![
            "discipline".to_string(),
            discipline.id.to_string(),
            format!("{} ({})", discipline.name, discipline.code),
        ]);
    }
    for subcontractor in &options.subcontractors {
        table.add_row(vec!["subcontractor".to_string(), subcontractor.id.to_string(), subcontractor.name.clone()]);
    }
    println!("{table}");
    Ok(())
}

async fn handle_events(args: EventsArgs, settings: &Settings) -> anyhow::Result<()> {
    let client = args.remote.client(settings)?;
    let mut filters = FilterState::default();
    filters.update_date_range(args.start, args.end);

    let events = client.events(&filters).await.context("Failed to fetch events")?;
    if events.is_empty() {
        eprintln!("No events in the given range.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Date", "Until", "Type", "Event"]);
    for event in events {
        table.add_row(vec![
            event.event_date.to_string(),
            event.end_date.map(|d| d.to_string()).unwrap_or_default(),
            event.event_type,
            event.event_name,
        ]);
    }
    println!("{table}");
    Ok(())
}
