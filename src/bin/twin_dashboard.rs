//! railtwin dashboard runner
//!
//! Mounts the full dashboard, optionally launches a scenario, and prints one
//! JSON snapshot per second to stdout. Logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tracing::Level;

use railtwin::{
    Dashboard, DashboardSnapshot, Launch, Scheduler, ThreadScheduler, ThreadSchedulerConfig, TwinConfig,
    TwinResult, VirtualScheduler,
};

/// Runner options
struct Options {
    /// Seconds to run
    duration: u64,
    /// Overrides the config seed
    seed: Option<u64>,
    /// JSON config file
    config: Option<PathBuf>,
    /// Scenario to launch at start
    scenario: Option<String>,
    /// Drive a virtual clock instead of waiting in real time
    virtual_clock: bool,
    verbose: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            duration: 10,
            seed: None,
            config: None,
            scenario: None,
            virtual_clock: false,
            verbose: false,
        }
    }
}

fn value_of<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    if let Some(value) = args.get(i + 1) {
        value
    } else {
        eprintln!("error: {flag} requires a value");
        std::process::exit(1);
    }
}

fn parse_number(value: &str, flag: &str) -> u64 {
    value.parse().unwrap_or_else(|_| {
        eprintln!("error: invalid number for {flag}: {value}");
        std::process::exit(1);
    })
}

fn print_help() {
    println!("twin-dashboard - Smart Train Digital Twin dashboard runner");
    println!();
    println!("USAGE:");
    println!("    twin-dashboard [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("        --seed <SEED>         Seed for every panel's random stream");
    println!("        --duration <SECS>     Seconds to run [default: 10]");
    println!("        --config <PATH>       JSON config file");
    println!("        --scenario <ID>       Scenario to launch at start, e.g. SIM004");
    println!("        --virtual             Advance a virtual clock instead of real time");
    println!("    -v, --verbose             Debug logging");
    println!("    -h, --help                Print help information");
}

fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().collect();
    let mut options = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                options.seed = Some(parse_number(value_of(&args, i, "--seed"), "--seed"));
                i += 2;
            }
            "--duration" => {
                options.duration = parse_number(value_of(&args, i, "--duration"), "--duration");
                i += 2;
            }
            "--config" => {
                options.config = Some(PathBuf::from(value_of(&args, i, "--config")));
                i += 2;
            }
            "--scenario" => {
                options.scenario = Some(value_of(&args, i, "--scenario").to_string());
                i += 2;
            }
            "--virtual" => {
                options.virtual_clock = true;
                i += 1;
            }
            "--verbose" | "-v" => {
                options.verbose = true;
                i += 1;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other => {
                eprintln!("error: unknown argument: {other}");
                eprintln!("Run with --help for usage information");
                std::process::exit(1);
            }
        }
    }

    options
}

fn emit(snapshot: &DashboardSnapshot, pretty: bool) -> TwinResult<()> {
    let line = if pretty {
        serde_json::to_string_pretty(snapshot)
    } else {
        serde_json::to_string(snapshot)
    }
    .map_err(|e| railtwin::TwinError::internal(format!("snapshot encoding failed: {e}")))?;
    println!("{line}");
    Ok(())
}

/// Launch attempts before a full scheduler queue is reported as an error.
const LAUNCH_ATTEMPTS: u32 = 3;

/// Launches `key`, retrying while the scheduler reports a retryable error
/// such as a full control queue. A failed launch leaves the simulator idle.
fn launch_with_retry(dashboard: &mut Dashboard, key: &str) -> TwinResult<Launch> {
    let mut attempt = 1;
    loop {
        match dashboard.launch(key) {
            Err(e) if e.is_retryable() && attempt < LAUNCH_ATTEMPTS => {
                tracing::warn!(scenario = %key, attempt, error = %e, "launch failed, retrying");
                std::thread::sleep(Duration::from_millis(50) * attempt);
                attempt += 1;
            }
            other => return other,
        }
    }
}

fn run(options: &Options) -> TwinResult<()> {
    let mut config = match &options.config {
        Some(path) => TwinConfig::load(path)?,
        None => TwinConfig::default(),
    };
    if options.seed.is_some() {
        config.seed = options.seed;
    }

    let virtual_clock = options.virtual_clock.then(|| Arc::new(VirtualScheduler::new()));
    let scheduler: Arc<dyn Scheduler> = match &virtual_clock {
        Some(clock) => Arc::clone(clock) as Arc<dyn Scheduler>,
        None => Arc::new(ThreadScheduler::new(ThreadSchedulerConfig::default())?),
    };

    let mut dashboard = Dashboard::mount(scheduler, &config)?;
    tracing::info!(
        seed = dashboard.seed(),
        duration_s = options.duration,
        virtual_clock = options.virtual_clock,
        "dashboard running"
    );

    if let Some(key) = &options.scenario {
        let launch = launch_with_retry(&mut dashboard, key)?;
        tracing::info!(scenario = %key, busy = launch.is_busy(), "scenario launched");
    }

    let second = Duration::from_secs(1);
    for _ in 0..options.duration {
        match &virtual_clock {
            Some(clock) => {
                clock.advance(second)?;
            }
            None => std::thread::sleep(second),
        }
        emit(&dashboard.snapshot()?, false)?;
    }

    let last = dashboard.unmount()?;
    emit(&last, true)
}

fn main() -> ExitCode {
    let options = parse_args();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if options.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "dashboard failed");
            ExitCode::FAILURE
        }
    }
}
