use clap::{Arg, ArgAction, Command};

use primerspec_core::align::DEFAULT_BOWTIE;
use primerspec_core::design::DEFAULT_PRIMER3;
use primerspec_core::pipeline::DEFAULT_PRIMER_PREFIX;

pub const CHECK_CMD: &str = "check";

pub fn create_check_cli() -> Command {
    Command::new(CHECK_CMD)
        .about("Design primer pairs (or re-use existing ones) and check their specificity against the sequences of a FASTA file")
        .arg(
            Arg::new("fasta")
                .value_name("path_to_fasta_file")
                .help("File containing the sequences in FASTA format")
                .required(true),
        )
        .arg(
            Arg::new("sequence")
                .long("sequence")
                .short('s')
                .value_name("prefix_of_seq_id")
                .help("Partial id of the sequence the primers shall be (or have been) generated for"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("path_to_config")
                .help("TOML file with region, threshold and primer3 settings"),
        )
        .arg(
            Arg::new("additional-fasta")
                .long("additional-fasta")
                .short('a')
                .value_name("path_to_file")
                .help("Design primers from the first sequence of this file instead; hits can then never be verified positionally"),
        )
        .arg(
            Arg::new("size")
                .long("size")
                .num_args(2)
                .value_names(["min_size", "max_size"])
                .value_parser(clap::value_parser!(i64))
                .help("Size range of the product including the primers"),
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
            Arg::new("index")
                .long("index")
                .short('i')
                .value_name("index_prefix")
                .help("Existing bowtie index; without it one is found or built next to the FASTA file"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("path")
                .help("Where the resulting report is written (default: stdout)"),
        )
        .arg(
            Arg::new("primerfiles")
                .long("primerfiles")
                .short('p')
                .value_name("prefix")
                .default_value(DEFAULT_PRIMER_PREFIX)
                .help("Prefix for the primer pair files, written on design or read back with --keep-primer"),
        )
        .arg(
            Arg::new("keep-primer")
                .long("keep-primer")
                .action(ArgAction::SetTrue)
                .help("Run against the primer files of a previous run (or custom ones) instead of designing new pairs"),
        )
        .arg(
            Arg::new("last-must-match")
                .long("last-must-match")
                .value_parser(clap::value_parser!(u32))
                .help("How many of the last bases of a primer have to match to consider an alignment a hit"),
        )
        .arg(
            Arg::new("last-to-check")
                .long("last-to-check")
                .value_parser(clap::value_parser!(u32))
                .help("How many of the last bases of a primer are checked against last-max-error"),
        )
        .arg(
            Arg::new("last-max-error")
                .long("last-max-error")
                .value_parser(clap::value_parser!(u32))
                .help("Maximum number of mismatches allowed within the last last-to-check bases"),
        )
        .arg(
            Arg::new("match-limit")
                .long("match-limit")
                .short('l')
                .value_parser(clap::value_parser!(usize))
                .help("Maximum number of hits of a primer pair before it is omitted from the results"),
        )
        .arg(
            Arg::new("bowtie")
                .long("bowtie")
                .value_name("path_to_bowtie_executable")
                .default_value(DEFAULT_BOWTIE)
                .help("The bowtie executable; bowtie-build is expected next to it"),
        )
        .arg(
            Arg::new("primer3")
                .long("primer3")
                .value_name("path_to_primer3_executable")
                .default_value(DEFAULT_PRIMER3)
                .help("The primer3 executable"),
        )
        .arg(
            Arg::new("show-bowtie-output")
                .long("show-bowtie-output")
                .action(ArgAction::SetTrue)
                .help("Write the raw bowtie records to standard error"),
        )
}
