use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use belvedere::config;
use belvedere::http;
use belvedere::lifecycle::startup::{fatal, EXIT_FAILURE, EXIT_OK};
use belvedere::lifecycle::Coordinator;
use belvedere::net;
use belvedere::observability::logging;
use belvedere::services::Container;

#[derive(Parser, Debug)]
#[command(name = "belvedere", version, about = "HTTP application server")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long, env = "BELVEDERE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Wire logging before anything can fail so even a bad config is logged.
    // The container re-records the logging subsystem during construction.
    logging::init(config::loader::environment_from_env());
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "application starting");

    let config = Arc::new(fatal(
        "failed to load configuration",
        config::load(args.config.as_deref()),
    ));

    let container = fatal(
        "failed to initialize services",
        Container::new(config.clone()).await,
    );
    tracing::info!(
        environment = %config.app.environment,
        hostname = %config.http.hostname,
        port = config.http.port,
        tasks_enabled = config.tasks.enabled,
        "container initialized"
    );

    let router = fatal("failed to build the router", http::build(&container));

    let listener = fatal(
        "failed to start the server",
        net::start(router, &config.http).await,
    );
    tracing::info!(
        address = %listener.local_addr(),
        tls_enabled = config.http.tls.enabled,
        "server started"
    );

    // Block here until a termination signal arrives, then drain.
    let coordinator = Coordinator::new(listener, container);
    match coordinator.run(config.http.drain_deadline()).await {
        Ok(()) => EXIT_OK,
        Err(err) => {
            tracing::error!(error = %err, "shutdown failed");
            EXIT_FAILURE
        }
    }
}
