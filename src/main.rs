#[macro_use]
extern crate log;

mod cli;
mod constants;
mod kafka_types;
mod logging;
mod offsets;
mod throughput;

use tokio_util::sync::CancellationToken;

use cli::Cli;
use offsets::OffsetPoller;
use throughput::{ThroughputMonitor, ThroughputReporter};

#[tokio::main]
async fn main() {
    let cli = parse_cli_and_init_logging();

    let shutdown_token = build_shutdown_token();

    let poller = match OffsetPoller::new(cli.build_client_config()) {
        Ok(poller) => poller,
        Err(e) => {
            error!("Failed to set up Kafka Admin Client: {e}");
            std::process::exit(exit_code::FAILURE);
        },
    };

    // The set of monitored Partitions is resolved once, at startup:
    // the monitoring loop polls this fixed set on every tick.
    let partitions = match poller.discover_partitions(&cli.topic) {
        Ok(partitions) => partitions,
        Err(e) => {
            error!("Failed to discover Partitions of Topic '{}': {e}", cli.topic);
            std::process::exit(exit_code::FAILURE);
        },
    };
    info!("Monitoring Topic '{}' across {} Partitions", cli.topic, partitions.len());

    let monitor = ThroughputMonitor::new(
        poller,
        partitions,
        cli.poll_interval(),
        cli.window_capacities(),
        ThroughputReporter::new(cli.topic.clone()),
    );

    if let Err(e) = monitor.run(shutdown_token).await {
        error!("Monitoring terminated: {e}");
        std::process::exit(exit_code::FAILURE);
    }
}

fn parse_cli_and_init_logging() -> Cli {
    // Parse command line input and initialize logging
    let cli = Cli::parse_and_validate();
    logging::init(cli.verbosity_level());

    trace!("Created:\n{:#?}", cli);

    cli
}

fn build_shutdown_token() -> CancellationToken {
    let shutdown_token = CancellationToken::new();

    // Setup shutdown signal handler:
    // when it's time to shutdown, cancel the token so the monitoring
    // loop can exit at its next tick boundary.
    //
    // NOTE: This handler will be listening on its own dedicated thread.
    let handler_token = shutdown_token.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Shutting down...");
        handler_token.cancel();
    }) {
        error!("Failed to register signal handler: {e}");
    }

    shutdown_token
}
