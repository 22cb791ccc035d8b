//! Wayfarer CLI binary: plan a trip with the multi-agent planning graph.
//!
//! `wayfarer Kyoto --days 3 --interests food,temples` prints the itinerary; `--json`
//! prints the whole run result; `--verbose` traces each node on stderr.

mod log_format;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use cli::{
    build_graph, format_step, outcome_json, plan, render_plan, to_json_string, RunError,
    RunOptions,
};
use config::Settings;

/// Max chars of a message shown per verbose step line.
const DISPLAY_MAX_LEN: usize = 200;

#[derive(Parser, Debug)]
#[command(name = "wayfarer")]
#[command(about = "Wayfarer: plan a trip with a team of travel agents")]
struct Args {
    /// Destination city or region
    #[arg(value_name = "DESTINATION", required_unless_present = "status")]
    destination: Option<String>,

    /// Where the trip starts
    #[arg(long, value_name = "PLACE")]
    origin: Option<String>,

    /// Trip length in days (default: 7)
    #[arg(long, value_name = "N")]
    days: Option<u32>,

    /// Budget tier, e.g. budget, moderate, luxury (default: moderate)
    #[arg(long, value_name = "TIER")]
    budget: Option<String>,

    /// Interests; repeat the flag or separate with commas
    #[arg(long, value_name = "LIST")]
    interests: Vec<String>,

    /// Number of travellers (default: 1)
    #[arg(long, value_name = "N")]
    group_size: Option<u32>,

    /// Travel dates as free text, e.g. "April 3-6"
    #[arg(long, value_name = "TEXT")]
    dates: Option<String>,

    /// Max node executions per run (default: 50 or WAYFARER_RECURSION_LIMIT)
    #[arg(long, value_name = "N")]
    recursion_limit: Option<usize>,

    /// Print the run result as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Write the output to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// When using --json, pretty-print (multi-line)
    #[arg(long)]
    pretty: bool,

    /// Print each node step to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Show which API credentials are configured and exit
    #[arg(long)]
    status: bool,

    /// Directory with config overrides (.env); default: current directory
    #[arg(long, value_name = "DIR", env = "WAYFARER_CONFIG_DIR")]
    config_dir: Option<PathBuf>,
}

impl Args {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            destination: self.destination.clone().unwrap_or_default(),
            origin: self.origin.clone(),
            days: self.days,
            budget: self.budget.clone(),
            interests: self.interests.clone(),
            group_size: self.group_size,
            dates: self.dates.clone(),
            recursion_limit: self.recursion_limit,
        }
    }
}

/// Writes `text` plus a newline to `file`, or to stdout.
fn write_output(text: &str, file: Option<&std::path::Path>) -> std::io::Result<()> {
    match file {
        Some(path) => std::fs::write(path, format!("{}\n", text)),
        None => {
            println!("{}", text);
            std::io::Write::flush(&mut std::io::stdout())
        }
    }
}

fn print_status(settings: &Settings, json: bool, pretty: bool) -> Result<(), RunError> {
    let status = settings.api_status();
    if json {
        let value = serde_json::json!({
            "provider": settings.provider.as_str(),
            "apis": status,
        });
        println!("{}", to_json_string(&value, pretty));
        return Ok(());
    }
    let mark = |on: bool| if on { "configured" } else { "missing" };
    println!("provider:    {}", settings.provider);
    println!("openai:      {}", mark(status.openai));
    println!("gemini:      {}", mark(status.gemini));
    println!("openweather: {}", mark(status.openweather));
    println!("web search:  {}", mark(status.web_search));
    Ok(())
}

async fn run(args: Args) -> Result<(), RunError> {
    let settings = Settings::from_env()?;
    if args.status {
        return print_status(&settings, args.json, args.pretty);
    }

    let opts = args.run_options();
    let request = opts.trip_request()?;
    let graph = build_graph(&settings, &opts)?;

    let verbose = args.verbose;
    let outcome = plan(&graph, request, |step| {
        if verbose {
            eprintln!("{}", format_step(step, DISPLAY_MAX_LEN));
        }
    })
    .await?;

    let text = if args.json {
        to_json_string(&outcome_json(&outcome), args.pretty)
    } else {
        render_plan(&outcome)
    };
    write_output(&text, args.file.as_deref())?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = config::load_and_apply("wayfarer", args.config_dir.as_deref()) {
        eprintln!("wayfarer: {}", RunError::from(e));
        return ExitCode::from(2);
    }
    // Dropped at the end of main so buffered log lines reach LOG_FILE.
    let _log_guard = match logging::init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("wayfarer: logging: {}", e);
            None
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "planning run failed");
            eprintln!("wayfarer: {}", e);
            ExitCode::FAILURE
        }
    }
}
