use std::path::Path;
use anyhow::Context;
use clap::{App, Arg, ArgMatches};
use fbreport::conserved_dark_genes;
use fbreport_cli::{connection_args, init_logging, load_config, with_chado};
use tracing::info;

fn app<'a, 'b>() -> App<'a, 'b> {
    connection_args(App::new("conserved-dark-genes")
        .about("Lists conserved genes with experimental GO annotation in at most one aspect"))
        .arg(Arg::with_name("output_dir")
            .long("output-dir")
            .short("o")
            .help("Directory the four report tables are written into")
            .default_value(".")
            .takes_value(true))
        .arg(Arg::with_name("required_species")
            .long("required-species")
            .help("Number of reference species a gene must have orthologs in")
            .takes_value(true))
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
    let mut config = load_config(args)?;
    if let Some(count) = args.value_of("required_species") {
        let count = count.parse()
            .with_context(|| format!("invalid species count '{}'", count))?;
        config.conservation.required_species_count = Some(count);
    }
    let output_dir = Path::new(args.value_of("output_dir").unwrap_or("."));

    let report = with_chado(&config, |store| conserved_dark_genes(store, &config))?;
    let paths = report.write_to_dir(output_dir)
        .with_context(|| format!("failed to write report into {}", output_dir.display()))?;
    info!(tables = paths.len(), candidates = report.candidates.len(), "done");
    Ok(())
}
