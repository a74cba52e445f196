//! vigil-sim - live anomaly-detection dashboard simulation
//!
//! Usage:
//!   vigil-sim run --ticks 500 --method mad
//!   vigil-sim run --ticks 200 --method isolation_forest --window 50 --format json
//!   vigil-sim serve --port 8080 --tick-ms 100
//!   vigil-sim list

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vigil_core::{list_methods, DetectorSettings, Method};
use vigil_sim::{create_shared_state, router, DashboardEngine, GeneratorConfig};

#[derive(Parser)]
#[command(name = "vigil-sim")]
#[command(about = "Live anomaly detection over a simulated signal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DetectorArgs {
    /// Detector variant (z_score, mad, isolation_forest)
    #[arg(short, long, default_value = "z_score")]
    method: String,

    /// Z-score threshold
    #[arg(long, default_value = "3.0")]
    z_threshold: f64,

    /// MAD threshold
    #[arg(long, default_value = "3.5")]
    mad_threshold: f64,

    /// Isolation forest contamination, in (0, 0.5]
    #[arg(long, default_value = "0.05")]
    contamination: f64,

    /// Sliding window capacity
    #[arg(short, long, default_value = "100")]
    window: usize,

    /// Generator starting value
    #[arg(long, default_value = "100.0")]
    start_value: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a headless simulation and print each tick
    Run {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "500")]
        ticks: u64,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        format: OutputFormat,

        #[command(flatten)]
        detector: DetectorArgs,
    },

    /// Serve the HTTP control API and tick on a timer
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Tick interval in milliseconds
        #[arg(long, default_value = "100")]
        tick_ms: u64,

        #[command(flatten)]
        detector: DetectorArgs,
    },

    /// List available detector methods
    List,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            ticks,
            format,
            detector,
        } => run_headless(ticks, format, detector),
        Commands::Serve {
            host,
            port,
            tick_ms,
            detector,
        } => run_serve(host, port, tick_ms, detector),
        Commands::List => run_list(),
    }
}

fn build_engine(args: &DetectorArgs) -> DashboardEngine {
    let method = Method::parse(&args.method).unwrap_or_else(|| {
        eprintln!(
            "Unknown method '{}'; expected one of: z_score, mad, isolation_forest",
            args.method
        );
        std::process::exit(2);
    });

    let settings = DetectorSettings {
        method,
        z_threshold: args.z_threshold,
        mad_threshold: args.mad_threshold,
        contamination: args.contamination,
    };
    let generator = GeneratorConfig {
        start_value: args.start_value,
        ..GeneratorConfig::default()
    };

    match DashboardEngine::new(args.window, settings, generator) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("Invalid configuration: {}", err);
            std::process::exit(2);
        }
    }
}

fn run_headless(ticks: u64, format: OutputFormat, detector: DetectorArgs) {
    let mut engine = build_engine(&detector);
    engine.start();

    for _ in 0..ticks {
        let Some(report) = engine.tick() else { break };

        match format {
            OutputFormat::Json => match serde_json::to_string(&report) {
                Ok(line) => println!("{}", line),
                Err(err) => eprintln!("serialize error: {}", err),
            },
            OutputFormat::Pretty => {
                let marker = if report.anomaly.is_some() {
                    "  <-- ANOMALY"
                } else {
                    ""
                };
                println!("[{:>6}] {:.2}{}", report.time_step, report.value, marker);
            }
        }
    }

    let stats = engine.stats();
    eprintln!("\n╔══════════════════════════════════════════════╗");
    eprintln!("║              Simulation Complete             ║");
    eprintln!("╠══════════════════════════════════════════════╣");
    eprintln!("║ Ticks:     {:33} ║", stats.tick_count);
    eprintln!("║ Anomalies: {:33} ║", stats.anomaly_count);
    eprintln!("║ Method:    {:33} ║", engine.settings().method.label());
    eprintln!("╚══════════════════════════════════════════════╝");
}

fn run_list() {
    println!("Available detector methods:");
    for (name, description) in list_methods() {
        println!("  {:18} {}", name, description);
    }
}

#[tokio::main]
async fn run_serve(host: String, port: u16, tick_ms: u64, detector: DetectorArgs) {
    let engine = build_engine(&detector);
    let state = create_shared_state(engine, tick_ms.max(1));

    // Scheduler: the engine itself never sleeps, a timer drives it.
    let tick_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_millis(tick_ms.max(1)));
        loop {
            interval.tick().await;
            let mut state = tick_state.lock().unwrap();
            state.engine.tick();
        }
    });

    let app = router(state);
    let addr = format!("{}:{}", host, port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            eprintln!("Failed to bind {}: {}", addr, err);
            std::process::exit(1);
        }
    };

    info!(%addr, tick_ms, "dashboard API listening");
    println!("Dashboard control API on http://{}", addr);
    println!("  POST /start /stop /pause /resume /reset /configure /tick");
    println!("  GET  /status /dashboard /methods /health");

    let serve_result = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutting down");
            }
        })
        .await;

    if let Err(err) = serve_result {
        eprintln!("server error: {}", err);
        std::process::exit(1);
    }
}
