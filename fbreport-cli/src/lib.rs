//! Argument, configuration and logging plumbing shared by the report binaries.

use anyhow::Context;
use clap::{App, Arg, ArgMatches};
use fbreport::{ChadoStore, ReportConfig};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Adds the Chado connection, config file and log level flags to `app`.
pub fn connection_args<'a, 'b>(app: App<'a, 'b>) -> App<'a, 'b> {
    app.arg(Arg::with_name("host")
            .long("host")
            .help("Chado database host")
            .takes_value(true))
        .arg(Arg::with_name("username")
            .long("username")
            .short("U")
            .help("Chado database user")
            .takes_value(true))
        .arg(Arg::with_name("password")
            .long("password")
            .short("W")
            .help("Chado database password")
            .takes_value(true))
        .arg(Arg::with_name("dbname")
            .long("dbname")
            .short("d")
            .help("Chado database name")
            .takes_value(true))
        .arg(Arg::with_name("port")
            .long("port")
            .short("p")
            .help("Chado database port")
            .takes_value(true))
        .arg(Arg::with_name("config")
            .long("config")
            .help("YAML file overriding the built-in report settings")
            .takes_value(true))
        .arg(log_level_arg())
}

pub fn log_level_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("log_level")
        .long("log-level")
        .help("Log filter, e.g. info or fbreport=debug (defaults to RUST_LOG, then info)")
        .takes_value(true)
}

/// Builds the report configuration.
///
/// Later sources win: built-in defaults, the `--config` file, `.env` and the
/// process environment, then command line flags.
pub fn load_config(args: &ArgMatches) -> anyhow::Result<ReportConfig> {
    let mut config = match args.value_of("config") {
        Some(path) => ReportConfig::from_yaml_path(path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => ReportConfig::default(),
    };

    dotenv::dotenv().ok();
    config.connection.apply_env().context("failed to read connection settings from environment")?;

    let connection = &mut config.connection;
    if let Some(host) = args.value_of("host") {
        connection.host = host.to_string();
    }
    if let Some(user) = args.value_of("username") {
        connection.user = user.to_string();
    }
    if let Some(password) = args.value_of("password") {
        connection.password = Some(password.to_string());
    }
    if let Some(dbname) = args.value_of("dbname") {
        connection.dbname = dbname.to_string();
    }
    if let Some(port) = args.value_of("port") {
        connection.port = port.parse()
            .with_context(|| format!("invalid port '{}'", port))?;
    }
    Ok(config)
}

/// Sends log output to stderr so stdout stays free for report rows.
pub fn init_logging(args: &ArgMatches) {
    let filter = match args.value_of("log_level") {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Connects to Chado, runs `report`, then closes the connection whether or
/// not the report succeeded.
pub fn with_chado<T, F>(config: &ReportConfig, report: F) -> anyhow::Result<T>
    where F: FnOnce(&mut ChadoStore) -> fbreport::Result<T>,
{
    let mut store = ChadoStore::connect(config)?;
    let result = report(&mut store);
    if let Err(e) = store.close() {
        warn!("failed to close chado connection: {}", e);
    }
    Ok(result?)
}
