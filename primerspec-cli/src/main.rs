mod check;
mod regions;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "primerspec";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Design PCR primer pairs for a target region and validate their uniqueness against a reference set by calling primer3 and bowtie.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Be verbose by showing INFO messages"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .short('d')
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Print lots of DEBUG messages"),
        )
        .subcommand(check::cli::create_check_cli())
        .subcommand(regions::cli::create_regions_cli())
}

fn setup_logging(matches: &clap::ArgMatches) {
    let level = if matches.get_flag("debug") {
        log::LevelFilter::Debug
    } else if matches.get_flag("verbose") {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();
    setup_logging(&matches);

    match matches.subcommand() {
        //
        // CHECK
        //
        Some((check::cli::CHECK_CMD, matches)) => {
            check::handlers::run_check(matches)?;
        }

        //
        // REGIONS
        //
        Some((regions::cli::REGIONS_CMD, matches)) => {
            regions::handlers::run_regions(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
