use clap::Parser;

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "HTTP load-generation controller - start/stop fleets of concurrent request loops over a small JSON control API, with shared-secret worker registration."
)]
pub struct ControllerArgs {
    /// Address the control API listens on
    #[arg(long = "listen", env = "VOLLEY_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: String,

    /// Path of the controller config file generated by quick-start
    #[arg(long = "config-path", env = "VOLLEY_CONFIG", default_value = "config.json")]
    pub config_path: String,

    /// Directory worker records are persisted under
    #[arg(long = "workers-path", env = "VOLLEY_WORKERS", default_value = "workers")]
    pub workers_path: String,

    /// Per-probe request timeout in milliseconds
    #[arg(long = "probe-timeout-ms", default_value_t = 10_000)]
    pub probe_timeout_ms: u64,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}
