use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use recording_proxy::config::{resolve_config, ForwardAddress, Overrides};
use recording_proxy::lifecycle::{signals, startup};
use recording_proxy::observability::logging;
use recording_proxy::{HttpServer, ProxyError, Shutdown};

#[derive(Parser)]
#[command(name = "recording-proxy")]
#[command(about = "Forward HTTP traffic to one server and record every exchange", long_about = None)]
struct Cli {
    /// The TCP port to bind the server to [default: 8080]
    #[arg(short, long)]
    port: Option<u16>,

    /// The server address (scheme://host[:port]) to forward the request to
    #[arg(short, long)]
    addr: Option<ForwardAddress>,

    /// Directory for exchange logs [default: logs]
    #[arg(long)]
    logs_dir: Option<PathBuf>,

    /// Capacity of the log queue [default: 2]
    #[arg(long)]
    queue_capacity: Option<usize>,

    /// Optional TOML config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    match run(Cli::parse()).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "recording-proxy stopped");
            eprintln!("recording-proxy: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ProxyError> {
    let config = resolve_config(
        cli.config.as_deref(),
        Overrides {
            port: cli.port,
            forward_address: cli.addr,
            logs_dir: cli.logs_dir,
            queue_capacity: cli.queue_capacity,
        },
    )?;

    tracing::info!(
        port = config.listener.port,
        logs_dir = %config.recording.logs_dir.display(),
        queue_capacity = config.recording.queue_capacity,
        "Configuration loaded"
    );

    let listener = startup::bind_listener(&config.listener).await?;
    let server = HttpServer::new(&config).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_on_ctrl_c(&shutdown).await;
    });

    server.run(listener, server_shutdown).await
}
