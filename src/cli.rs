use std::time::Duration;

use clap::{error::ErrorKind, ArgGroup, CommandFactory, Parser};
use rdkafka::ClientConfig;

use crate::constants::{
    DEFAULT_LONG_WINDOW, DEFAULT_MEDIUM_WINDOW, DEFAULT_POLL_INTERVAL, DEFAULT_SHORT_WINDOW,
};
use crate::throughput::WindowCapacities;

/// Command Line Interface, defined via the declarative,
/// `derive` based functionality of the `clap` crate.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("logging_flags")
        .required(false)
        .multiple(false)
        .args(["verbose", "quiet"]),
))]
pub struct Cli {
    // ------------------------------------------------------------------ Admin Client configuration
    /// Initial Kafka Brokers to connect to (format: 'HOST:PORT,...').
    ///
    /// Equivalent to '--config=bootstrap.servers:host:port,...'.
    #[arg(short, long = "brokers", value_name = "BOOTSTRAP_BROKERS")]
    pub bootstrap_brokers: String,

    /// Client identifier used by the internal Kafka (Admin) Client.
    ///
    /// Equivalent to '--config=client.id:my-client-id'.
    #[arg(long = "client-id", value_name = "CLIENT_ID", default_value = env!("CARGO_PKG_NAME"))]
    pub client_id: String,

    /// Additional configuration used by the internal Kafka (Admin) Client (format: 'CONF_KEY:CONF_VAL').
    ///
    /// To set multiple configurations keys, use this argument multiple times.
    /// Connections to TLS-fronted Brokers are configured this way
    /// (e.g. 'security.protocol:ssl', 'ssl.ca.location:ca.crt').
    /// See: https://github.com/edenhill/librdkafka/blob/master/CONFIGURATION.md.
    #[arg(
        long = "kafka-conf",
        value_name = "CONF_KEY:CONF_VAL",
        value_parser = kv_clap_value_parser,
        verbatim_doc_comment
    )]
    pub kafka_config: Vec<KVPair>,

    // ---------------------------------------------------------------------- Monitoring configuration
    /// Topic to measure the throughput of.
    ///
    /// Its Partitions are discovered once at startup; their end offsets
    /// are then polled at every interval.
    #[arg(short, long, value_name = "TOPIC")]
    pub topic: String,

    /// How often, in seconds, to poll the Topic Partitions end offsets.
    #[arg(
        long = "poll-interval",
        value_name = "SECONDS",
        default_value = DEFAULT_POLL_INTERVAL,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_interval_secs: u64,

    /// Short moving-average window, as an amount of rate samples.
    #[arg(
        long = "short-window",
        value_name = "SAMPLES",
        default_value = DEFAULT_SHORT_WINDOW,
        value_parser = window_size_clap_value_parser
    )]
    pub short_window_size: usize,

    /// Medium moving-average window, as an amount of rate samples.
    #[arg(
        long = "medium-window",
        value_name = "SAMPLES",
        default_value = DEFAULT_MEDIUM_WINDOW,
        value_parser = window_size_clap_value_parser
    )]
    pub medium_window_size: usize,

    /// Long moving-average window, as an amount of rate samples.
    #[arg(
        long = "long-window",
        value_name = "SAMPLES",
        default_value = DEFAULT_LONG_WINDOW,
        value_parser = window_size_clap_value_parser
    )]
    pub long_window_size: usize,

    // ---------------------------------------------------------------------------------- Verbosity
    /// Verbose logging.
    ///
    /// * none    = 'INFO'
    /// * '-v'    = 'DEBUG'
    /// * '-vv'   = 'TRACE'
    ///
    /// Alternatively, set environment variable 'KTHROUGHPUT_LOG=(ERROR|WARN|INFO|DEBUG|TRACE|OFF)'.
    #[arg(short, long, action = clap::ArgAction::Count, verbatim_doc_comment)]
    pub verbose: u8,

    /// Quiet logging.
    ///
    /// * none    = 'INFO'
    /// * '-q'    = 'WARN'
    /// * '-qq'   = 'ERROR'
    /// * '-qqq'  = 'OFF'
    ///
    /// Alternatively, set environment variable 'KTHROUGHPUT_LOG=(ERROR|WARN|INFO|DEBUG|TRACE|OFF)'.
    #[arg(short, long, action = clap::ArgAction::Count, verbatim_doc_comment)]
    pub quiet: u8,
}

impl Cli {
    pub fn parse_and_validate() -> Self {
        let cli = Self::parse();

        if !(cli.short_window_size <= cli.medium_window_size
            && cli.medium_window_size <= cli.long_window_size)
        {
            Self::command()
                .error(
                    ErrorKind::ValueValidation,
                    format!(
                        "Window sizes must be non-decreasing: \
                        --short-window={} --medium-window={} --long-window={}",
                        cli.short_window_size, cli.medium_window_size, cli.long_window_size
                    ),
                )
                .exit();
        }

        cli
    }

    pub fn verbosity_level(&self) -> i8 {
        self.verbose as i8 - self.quiet as i8
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn window_capacities(&self) -> WindowCapacities {
        WindowCapacities {
            short: self.short_window_size,
            medium: self.medium_window_size,
            long: self.long_window_size,
        }
    }

    pub fn build_client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", self.bootstrap_brokers.clone())
            .set("client.id", self.client_id.clone());
        for cfg in &self.kafka_config {
            config.set(cfg.0.clone(), cfg.1.clone());
        }

        trace!("Created:\n{:#?}", config);
        config
    }
}

/// A simple (key,value) pair of `String`s, useful to be parsed from arguments via [`kv_clap_value_parser`].
pub type KVPair = (String, String);

/// To be used as [`clap::value_parser`] function to create [`KVPair`] values.
fn kv_clap_value_parser(kv: &str) -> Result<KVPair, String> {
    let (k, v) = match kv.split_once(':') {
        None => {
            return Err("Should have 'K:V' format".to_string());
        },
        Some((k, v)) => (k, v),
    };

    Ok((k.to_string(), v.to_string()))
}

fn window_size_clap_value_parser(size_str: &str) -> Result<usize, String> {
    let size = size_str.parse::<usize>().map_err(|e| format!("Unable to parse {size_str}: {e}"))?;

    if size == 0 {
        return Err("Window size must hold at least 1 sample".to_string());
    }

    Ok(size)
}
