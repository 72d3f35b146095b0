extern crate pretty_env_logger;

#[macro_use]
extern crate log;

use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;
use std::fs::File;
use std::io::{self, BufWriter, Write};

use qscore::{
    features_main, ChromDepthMap, Cli, Commands, HeaderArgs, QscoreParams, VcfHeaderWriter,
};

fn setup_logging(args: &dyn QscoreParams) {
    let level = if args.debug() {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    pretty_env_logger::formatted_timed_builder()
        .filter_level(level)
        .init();

    info!("starting");
    info!("params: {:#?}", args);
    if !args.validate() {
        error!("please fix arguments");
        std::process::exit(1);
    }
}

fn header_main(args: &HeaderArgs) -> Result<()> {
    let chrom_depth = match &args.chrom_depth {
        Some(path) => Some(ChromDepthMap::from_path(path)?),
        None => {
            warn!("no --chrom-depth, HighDepth filter omitted from header");
            None
        }
    };
    let cmdline = std::env::args().join(" ");

    let writer = VcfHeaderWriter {
        params: &args.filt,
        chrom_depth: chrom_depth.as_ref(),
        samples: &args.samples,
        cmdline: &cmdline,
    };

    let mut out: Box<dyn Write> = match &args.out {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("unable to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    };
    writer.write(&mut out)?;
    out.flush()?;
    Ok(())
}

fn main() {
    let args = Cli::parse();

    let result = match args.command {
        Commands::Header(args) => {
            setup_logging(&args);
            header_main(&args)
        }
        Commands::Features(args) => {
            setup_logging(&args);
            features_main(&args).map(|summary| {
                info!(
                    "featurized {} loci ({} sites, {} indels, {} passing)",
                    summary.total(),
                    summary.sites,
                    summary.indels,
                    summary.passing
                );
            })
        }
    };

    match result {
        Ok(()) => info!("finished"),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    }
}
