use std::fs::File;
use std::io::BufReader;
use anyhow::Context;
use clap::{App, Arg, ArgMatches};
use fbreport::redfly::{count_citations, read_feature_ids, write_counts};
use fbreport_cli::{init_logging, log_level_arg};
use tracing::info;

fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("redfly-stats")
        .about("Counts genome annotation statistics rows citing each REDfly feature")
        .arg(Arg::with_name("stats")
            .help("CSV of genome annotation statistics")
            .required(true)
            .index(1))
        .arg(Arg::with_name("feature_ids")
            .help("REDfly FBsf ids, one per line")
            .required(true)
            .index(2))
        .arg(log_level_arg())
}

fn main() {
    let matches = app().get_matches();
    init_logging(&matches);

    if let Err(e) = run(&matches) {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

fn run(args: &ArgMatches) -> anyhow::Result<()> {
    let ids_path = args.value_of("feature_ids").context("missing feature id file")?;
    let ids_file = File::open(ids_path).with_context(|| format!("failed to open {}", ids_path))?;
    let feature_ids = read_feature_ids(BufReader::new(ids_file))?;
    info!(features = feature_ids.len(), "read REDfly feature ids");

    let stats_path = args.value_of("stats").context("missing statistics file")?;
    let stats = File::open(stats_path).with_context(|| format!("failed to open {}", stats_path))?;
    let counts = count_citations(BufReader::new(stats), feature_ids)?;

    let stdout = std::io::stdout();
    write_counts(&counts, stdout.lock())?;
    Ok(())
}
