use std::fs::File;
use std::io::BufReader;
use anyhow::Context;
use clap::{App, Arg, ArgMatches};
use fbreport::summaries::{described_genes, merge_summary_counts};
use fbreport_cli::{init_logging, log_level_arg};
use tracing::info;

fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("summary-selection")
        .about("Adds the selected gene summary source to each row of a Chado summary count file")
        .arg(Arg::with_name("chado_counts")
            .help("Tab separated summary counts per gene from Chado")
            .required(true)
            .index(1))
        .arg(Arg::with_name("alliance_descriptions")
            .help("Tab separated Alliance gene description file")
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

fn open(args: &ArgMatches, name: &str) -> anyhow::Result<BufReader<File>> {
    let path = args.value_of(name).with_context(|| format!("missing {}", name))?;
    let file = File::open(path).with_context(|| format!("failed to open {}", path))?;
    Ok(BufReader::new(file))
}

fn run(args: &ArgMatches) -> anyhow::Result<()> {
    let described = described_genes(open(args, "alliance_descriptions")?)
        .context("failed to read Alliance descriptions")?;
    info!(genes = described.len(), "read Alliance descriptions");

    let stdout = std::io::stdout();
    let rows = merge_summary_counts(open(args, "chado_counts")?, &described, stdout.lock())
        .context("failed to merge summary counts")?;
    info!(rows, "wrote summary selection");
    Ok(())
}
