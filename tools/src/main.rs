//! dash-runner: headless driver for the cart abandonment dashboard engine.
//!
//! Usage:
//!   dash-runner --data-dir ./data
//!   dash-runner --records orders.json --ipc-mode
//!   dash-runner --seed 7 --ipc-mode
//!
//! IPC lines look like:
//!   {"type":"command","command":{"cmd":"toggle","field":"deviceType","value":"Mobile"}}
//!   {"type":"table","search":"lyon","sort_click":"price"}

use anyhow::Result;
use cartdash_core::{
    breakdown::{BreakdownRow, MonthlyRate},
    bundle::DerivedBundle,
    command::FilterCommand,
    config::DashConfig,
    engine::DashEngine,
    filter::FilterState,
    funnel::Funnel,
    generator::CorpusGenerator,
    metrics::{CartsValue, KpiSummary},
    record::{AcquisitionChannel, ClientType, DeviceType, Record},
    store::{FilterOptions, RecordStore},
    table::{TableColumn, TableQuery},
    types::Revision,
};
use std::env;
use std::io::{self, BufRead, Write};

/// Rows returned per table response.
const TABLE_PAGE_SIZE: usize = 50;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Command {
        command: FilterCommand,
    },
    Table {
        #[serde(default)]
        search: Option<String>,
        #[serde(default)]
        sort_click: Option<TableColumn>,
    },
    Quit,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    revision:        Revision,
    filters:         &'a FilterState,
    options:         FilterOptions,
    visible_records: usize,
    total_records:   usize,
    kpis:            KpiSummary,
    kpi_display:     KpiDisplay,
    funnel:          Funnel,
    carts_value:     CartsValue,
    by_client_type:  &'a [BreakdownRow<ClientType>],
    by_device:       &'a [BreakdownRow<DeviceType>],
    by_channel:      &'a [BreakdownRow<AcquisitionChannel>],
    monthly:         &'a [MonthlyRate],
    table:           TablePage<'a>,
}

#[derive(serde::Serialize)]
struct KpiDisplay {
    conversion_rate:    String,
    average_cart_value: String,
    abandonment_rate:   String,
    recovery_rate:      String,
    sales_potential:    String,
}

#[derive(serde::Serialize)]
struct TablePage<'a> {
    query:      &'a TableQuery,
    total_rows: usize,
    rows:       Vec<&'a Record>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let data_dir = string_arg(&args, "--data-dir").unwrap_or("./data");
    let records_path = string_arg(&args, "--records");

    let mut config = DashConfig::load(data_dir)?;
    config.corpus.seed = parse_arg(&args, "--seed", config.corpus.seed);

    let store = match records_path {
        Some(path) => RecordStore::load_json(path)?,
        None => RecordStore::from_records(CorpusGenerator::generate(&config.corpus)?),
    };

    if !ipc_mode {
        println!("Cart abandonment dashboard: dash-runner");
        println!("  data_dir:  {data_dir}");
        match records_path {
            Some(path) => println!("  records:   {path}"),
            None => println!("  records:   generated (seed {})", config.corpus.seed),
        }
        println!();
    }

    let mut engine = DashEngine::new(config, store);

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
    } else {
        print_summary(&engine.bundle());
    }

    Ok(())
}

fn run_ipc_loop(engine: &mut DashEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();
    let mut table = TableQuery::default();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                reply_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {}
            IpcCommand::Command { command } => {
                if let Err(e) = engine.dispatch(&command) {
                    reply_error(&mut stdout, &e.to_string())?;
                    continue;
                }
            }
            IpcCommand::Table { search, sort_click } => {
                if let Some(search) = search {
                    table.search = search;
                }
                if let Some(column) = sort_click {
                    table.click_column(column);
                }
            }
        }

        let bundle = engine.bundle();
        let state = build_ui_state(&bundle, engine.filter_options(), engine.store().len(), &table);
        writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn reply_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    log::warn!("ipc: {message}");
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{}", err_json)?;
    stdout.flush()?;
    Ok(())
}

fn build_ui_state<'a>(
    bundle: &'a DerivedBundle,
    options: FilterOptions,
    total_records: usize,
    table: &'a TableQuery,
) -> UiState<'a> {
    let rows = table.rows(&bundle.view);

    UiState {
        revision: bundle.revision,
        filters: &bundle.filters,
        options,
        visible_records: bundle.view.len(),
        total_records,
        kpis: bundle.kpis,
        kpi_display: KpiDisplay {
            conversion_rate:    bundle.kpis.conversion_rate.to_string(),
            average_cart_value: bundle.kpis.average_cart_value.to_string(),
            abandonment_rate:   bundle.kpis.abandonment_rate.to_string(),
            recovery_rate:      bundle.kpis.recovery_rate.to_string(),
            sales_potential:    bundle.kpis.sales_potential.to_string(),
        },
        funnel: bundle.funnel,
        carts_value: bundle.carts_value,
        by_client_type: &bundle.by_client_type,
        by_device: &bundle.by_device,
        by_channel: &bundle.by_channel,
        monthly: &bundle.monthly,
        table: TablePage {
            query: table,
            total_rows: rows.len(),
            rows: rows.into_iter().take(TABLE_PAGE_SIZE).collect(),
        },
    }
}

fn print_summary(bundle: &DerivedBundle) {
    let kpis = &bundle.kpis;

    println!("=== KPIs ({} records) ===", bundle.view.len());
    println!("  conversion rate:   {}", kpis.conversion_rate);
    println!("  avg cart value:    {}", kpis.average_cart_value);
    println!("  abandonment rate:  {}", kpis.abandonment_rate);
    println!("  recovery rate:     {}", kpis.recovery_rate);
    println!("  sales potential:   {}", kpis.sales_potential);

    println!();
    println!("=== FUNNEL ===");
    for step in bundle.funnel.steps() {
        println!(
            "  {:<10} {:>8} | prev {:>6.2}% | visits {:>6.2}%",
            step.stage.as_str(),
            step.count,
            step.from_previous,
            step.from_visits,
        );
    }

    println!();
    println!("=== ABANDONMENT BY CHANNEL ===");
    for row in &bundle.by_channel {
        println!("  {:<8} {:>5.1}%", row.key.as_str(), row.rate);
    }

    println!();
    println!("=== ABANDONMENT BY DEVICE ===");
    for row in &bundle.by_device {
        println!("  {:<8} {:>5.1}%", row.key.as_str(), row.rate);
    }

    println!();
    println!("=== ABANDONMENT BY CLIENT TYPE ===");
    for row in &bundle.by_client_type {
        println!("  {:<16} {:>5.1}%", row.key.as_str(), row.rate);
    }

    println!();
    println!("=== MONTHLY ABANDONMENT ===");
    for row in &bundle.monthly {
        println!("  {:>2} {:>5.1}%", row.key, row.rate);
    }
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
