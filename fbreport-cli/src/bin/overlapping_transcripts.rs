use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use anyhow::Context;
use clap::{App, Arg, ArgMatches};
use fbreport::OverlapBatch;
use fbreport_cli::{connection_args, init_logging, load_config, with_chado};

fn app<'a, 'b>() -> App<'a, 'b> {
    connection_args(App::new("overlapping-transcripts")
        .about("Finds the miRNA and mRNA transcripts overlapping each location in a file"))
        .arg(Arg::with_name("locations")
            .help("File with one scaffold:min..max location per line")
            .required(true)
            .index(1))
        .arg(Arg::with_name("output")
            .long("output")
            .short("o")
            .help("Write results here instead of stdout")
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
    let config = load_config(args)?;
    let locations_path = args.value_of("locations").context("missing location file")?;
    let locations = File::open(locations_path)
        .with_context(|| format!("failed to open location file {}", locations_path))?;

    let output: Box<dyn Write> = match args.value_of("output") {
        Some(path) => Box::new(BufWriter::new(File::create(path)
            .with_context(|| format!("failed to create output file {}", path))?)),
        None => Box::new(std::io::stdout()),
    };

    with_chado(&config, |store| {
        OverlapBatch::new(store, &config)?.run(BufReader::new(locations), output)
    })?;
    Ok(())
}
