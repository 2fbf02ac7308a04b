use clap::Parser;

/// # Application Configuration
///
/// Configuration for the cache inspection server, parsed from command-line
/// arguments and environment variables using `clap`.
#[derive(Parser, Debug, Clone)]
#[clap(
    author,
    version,
    about = "HTTP server to inspect and set values in a managed Redis cache."
)]
#[clap(long_about = None)]
pub struct AppConfig {
    /// Cache connection string (e.g., host:6380,password=secret,ssl=True).
    /// Can be provided via `--cache-connstr` argument or `CACHE_CONNSTR` environment variable.
    #[clap(
        long,
        env = "CACHE_CONNSTR",
        hide_env_values = true,
        help = "Cache connection string (host:port,password=<secret>[,ssl=True])"
    )]
    pub cache_connstr: Option<String>,

    /// HTTP server port. Defaults to 7071.
    #[clap(long, env = "PORT", default_value_t = 7071, help = "HTTP server port")]
    pub port: u16,

    #[clap(
        long,
        env = "CACHE_CONNECT_TIMEOUT_SECS",
        default_value_t = 10,
        help = "Seconds to wait for a cache connection before failing the request"
    )]
    pub connect_timeout_secs: u64,
}
