use clap::{Arg, Command};

pub const REGIONS_CMD: &str = "regions";

pub fn create_regions_cli() -> Command {
    Command::new(REGIONS_CMD)
        .about("Solve and print the placement geometry for the given target position and product size, without calling any external tool")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("path_to_config")
                .help("TOML file with region settings"),
        )
        .arg(
            Arg::new("pos")
                .long("pos")
                .num_args(2)
                .value_names(["begin", "end"])
                .value_parser(clap::value_parser!(i64))
                .help("Region between the primers which is not overlapped by them"),
        )
        .arg(
            Arg::new("size")
                .long("size")
                .num_args(2)
                .value_names(["min_size", "max_size"])
                .value_parser(clap::value_parser!(i64))
                .help("Size range of the product including the primers"),
        )
}
