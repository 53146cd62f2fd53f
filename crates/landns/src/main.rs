// # landns - LAN dynamic-DNS reconciler
//
// One-shot process: resolve this host's local-network address, fetch the
// published "A" record for the configured subdomain, and update the record
// if the two differ. Periodic execution is a scheduler's job (cron or a
// systemd timer), not this binary's.
//
// This is a THIN integration layer: configuration, logging setup, wiring,
// and exit codes live here; all reconcile/retry logic lives in landns-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `ACCESS_KEY_ID` / `ACCESS_KEY_SECRET`: alidns API credentials
// - `DOMAIN_NAME`: root domain the record lives under
// - `SUBDOMAIN_NAME`: RR (host-part) of the managed record
// - `LOCAL_DNS_ADDRESS`: reference address the network prefix is derived from
// - `ERROR_RETRIES`: maximum retry attempts per operation
// - `API_ENDPOINT`: optional, defaults to https://dns.aliyuncs.com/
// - `RETRY_DELAY_SECS`: optional, defaults to 60
// - `LOG_LEVEL`: optional, defaults to info
//
// ## Example
//
// ```bash
// export ACCESS_KEY_ID=LTAI...
// export ACCESS_KEY_SECRET=...
// export DOMAIN_NAME=example.com
// export SUBDOMAIN_NAME=nas
// export LOCAL_DNS_ADDRESS=192.168.1.1
// export ERROR_RETRIES=5
//
// landns
// ```

use anyhow::{Context, Result};
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use landns_core::config::{Config, DEFAULT_API_ENDPOINT, DEFAULT_RETRY_DELAY_SECS};
use landns_core::reconciler::{ReconcileOutcome, Reconciler};
use landns_ip_local::HostAddressSource;
use landns_provider_alidns::AlidnsClient;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Record in sync or updated successfully
/// - 1: Configuration or startup error
/// - 2: Reconcile failure (a retry budget was exhausted)
#[derive(Debug, Clone, Copy)]
enum LandnsExitCode {
    /// Record already in sync, or updated successfully
    CleanExit = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Reconcile failed after exhausting a retry budget
    ReconcileFailed = 2,
}

impl From<LandnsExitCode> for ExitCode {
    fn from(code: LandnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct AppConfig {
    core: Config,
    log_level: String,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Required keys that are missing or unparsable are a fatal startup
    /// error; nothing is retried at this stage.
    fn from_env() -> Result<Self> {
        let core = Config {
            access_key_id: require("ACCESS_KEY_ID")?,
            access_key_secret: require("ACCESS_KEY_SECRET")?,
            domain_name: require("DOMAIN_NAME")?,
            subdomain_name: require("SUBDOMAIN_NAME")?,
            local_dns_address: require("LOCAL_DNS_ADDRESS")?,
            max_retries: require("ERROR_RETRIES")?
                .parse()
                .context("ERROR_RETRIES must be an integer >= 0")?,
            retry_delay_secs: match env::var("RETRY_DELAY_SECS") {
                Ok(value) => value
                    .parse()
                    .context("RETRY_DELAY_SECS must be an integer number of seconds")?,
                Err(_) => DEFAULT_RETRY_DELAY_SECS,
            },
            api_endpoint: env::var("API_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_API_ENDPOINT.to_string()),
        };

        Ok(Self {
            core,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require(key: &'static str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} is required. Set it via: export {key}=..."))
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            return LandnsExitCode::ConfigError.into();
        }
    };

    // Validate configuration before any network activity
    if let Err(e) = config.core.validate() {
        eprintln!("Configuration validation error: {e}");
        return LandnsExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => {
            eprintln!("LOG_LEVEL '{other}' is not valid. Valid levels: trace, debug, info, warn, error");
            return LandnsExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
        return LandnsExitCode::ConfigError.into();
    }

    info!(
        "starting landns for {}.{}",
        config.core.subdomain_name, config.core.domain_name
    );

    // The reconcile flow is strictly sequential, so a single-threaded
    // runtime is all it needs.
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {e}");
            return LandnsExitCode::ReconcileFailed.into();
        }
    };

    let code = rt.block_on(async {
        match run(&config.core).await {
            Ok(ReconcileOutcome::InSync { address }) => {
                info!("nothing to do, record already points at {address}");
                LandnsExitCode::CleanExit
            }
            Ok(ReconcileOutcome::Updated { previous, current }) => {
                info!("record updated: {previous} -> {current}");
                LandnsExitCode::CleanExit
            }
            Err(e @ landns_core::Error::Config(_)) => {
                error!("startup failed: {e}");
                LandnsExitCode::ConfigError
            }
            Err(e) => {
                error!("reconcile failed: {e}");
                LandnsExitCode::ReconcileFailed
            }
        }
    });

    code.into()
}

/// Wire the concrete collaborators and run one reconcile cycle
async fn run(config: &Config) -> landns_core::Result<ReconcileOutcome> {
    let client = AlidnsClient::new(
        config.api_endpoint.clone(),
        config.access_key_id.clone(),
        config.access_key_secret.clone(),
    )?;

    let reconciler = Reconciler::new(
        Box::new(HostAddressSource::new()),
        Box::new(client),
        config,
    )?;

    reconciler.run().await
}
