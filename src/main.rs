use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead};
use std::path::Path;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use trigcam::camera::{CameraSystem, CameraSystemBuilder};
use trigcam::config::{DisplayBackend, LoggingConfig};
use trigcam::display;
use trigcam::input::{ConsoleInput, OperatorInput, ScriptedInput};
use trigcam::{SessionOrchestrator, TrigcamConfig, TriggerSource};

#[derive(Parser, Debug)]
#[command(name = "trigcam")]
#[command(about = "Triggered multi-camera acquisition with software or hardware triggers")]
#[command(version)]
#[command(long_about = "Configures the trigger of every connected camera (software or hardware), \
acquires frames from all cameras in turn until the stop key is pressed, presents them, \
then disables the trigger and releases the cameras.")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "trigcam.toml", help = "Path to TOML configuration file")]
    config: String,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit without touching any camera")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in TOML format and exit")]
    print_config: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,

    /// Override the trigger source
    #[arg(long, value_name = "SOURCE", help = "Trigger source: software or hardware")]
    trigger: Option<TriggerSource>,

    /// Override the display backend
    #[arg(long, value_name = "BACKEND", help = "Display backend: terminal, snapshot or headless")]
    display: Option<DisplayBackend>,

    /// Override the number of simulated cameras
    #[arg(long, value_name = "N", help = "Number of simulated cameras")]
    cameras: Option<usize>,

    /// Run unattended for a fixed number of cycles
    #[arg(
        long,
        value_name = "N",
        help = "Confirm every trigger automatically and stop after N cycles"
    )]
    cycles: Option<usize>,

    /// Write the session outcome as JSON
    #[arg(long, value_name = "PATH", help = "Write the session report to PATH as JSON")]
    report: Option<String>,

    /// Exit without waiting for Enter
    #[arg(long, help = "Do not wait for Enter before exiting")]
    no_wait: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print_default_config()?;
        return Ok(());
    }

    let exit_code = run(&args)?;
    std::process::exit(exit_code);
}

fn run(args: &Args) -> Result<i32> {
    let mut config = TrigcamConfig::load_from_file(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config))?;
    apply_overrides(args, &mut config);

    if args.validate_config {
        return match config.validate() {
            Ok(()) => {
                println!("✓ Configuration is valid");
                Ok(0)
            }
            Err(e) => {
                eprintln!("✗ Configuration validation failed: {}", e);
                Ok(1)
            }
        };
    }
    config.validate().context("Invalid configuration")?;

    // Must outlive every log statement below
    let _log_guard = init_logging(args, &config.logging)?;

    info!("Starting trigcam v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    let mut system = CameraSystemBuilder::new()
        .config(config.simulator.clone())
        .build()?;
    info!("Using {} camera system", system.name());

    let mut cameras = system.discover();
    println!("Number of cameras detected: {}", cameras.len());

    let exit_code = if cameras.is_empty() {
        println!("Not enough cameras!");
        -1
    } else {
        let mut renderer = display::create_renderer(&config.display)?;
        let mut operator: Box<dyn OperatorInput> = match args.cycles {
            Some(cycles) => Box::new(ScriptedInput::stop_after_cycles(cycles, cameras.len())),
            None => Box::new(ConsoleInput::new(config.acquisition.stop_key())?),
        };

        let mut orchestrator = SessionOrchestrator::new(&config);
        let result = orchestrator.run(&mut cameras, operator.as_mut(), renderer.as_mut());
        // Restores the terminal before anything else is printed
        drop(operator);

        match result {
            Ok(outcome) => {
                if let Some(path) = &args.report {
                    outcome.write_json(path)?;
                }
                outcome.exit_code()
            }
            Err(e) => {
                error!("Session could not run: {}", e);
                -1
            }
        }
    };

    // Device handles go before the system that produced them
    drop(cameras);
    drop(system);

    if !args.no_wait {
        wait_for_enter()?;
    }

    info!("trigcam exited with code: {}", exit_code);
    Ok(exit_code)
}

fn apply_overrides(args: &Args, config: &mut TrigcamConfig) {
    if let Some(source) = args.trigger {
        config.trigger.source = source;
    }
    if let Some(backend) = args.display {
        config.display.backend = backend;
    }
    if let Some(count) = args.cameras {
        config.simulator.camera_count = count;
    }
}

fn wait_for_enter() -> Result<()> {
    println!();
    println!("Done! Press Enter to exit...");
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}

fn init_logging(args: &Args, logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::fmt::writer::BoxMakeWriter;
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    // Determine log level based on flags
    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("trigcam={}", log_level)));

    // A log file keeps log lines out of the terminal preview
    let (writer, guard, ansi) = match &logging.file {
        Some(file) => {
            let path = Path::new(file);
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Log file path '{}' has no file name", file))?;

            let appender = tracing_appender::rolling::daily(directory, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard), false)
        }
        None => (BoxMakeWriter::new(io::stderr), None, true),
    };

    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_writer(writer)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_writer(writer)
            .with_ansi(ansi)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_writer(writer)
            .with_ansi(ansi)
            .with_target(true)
            .with_thread_ids(args.debug)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer()
                .with_writer(writer)
                .with_ansi(ansi)
                .with_target(true)
                .with_thread_ids(args.debug)
                .with_file(args.debug)
                .with_line_number(args.debug)
                .boxed()
        }
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();

    Ok(guard)
}

/// Print default configuration in TOML format
fn print_default_config() -> Result<()> {
    println!("# Trigcam Configuration File");
    println!("# This is the default configuration with all available options");
    println!("# Every key can also be set through TRIGCAM__<SECTION>__<KEY> environment variables");
    println!();
    println!("{}", toml::to_string_pretty(&TrigcamConfig::default())?);
    Ok(())
}
