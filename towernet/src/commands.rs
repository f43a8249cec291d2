use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("towernet")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("towernet")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(-v --"verbose" "Emit pipeline tracing to the terminal")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("analyze")
                .about(
                    "Link every measurement to its nearest tower, extract the minimum spanning \
                forest and classify signal quality.",
                )
                .arg(
                    arg!(-t --"towers" <PATH>)
                        .required(true)
                        .help("JSON array of towers: {longitude, latitude, max_signal_rsrp}"),
                )
                .arg(
                    arg!(-m --"measurements" <PATH>)
                        .required(true)
                        .help("JSON array of readings: {longitude, latitude, signal_strength}"),
                )
                .arg(
                    arg!(--"margin" <DBM>)
                        .required(false)
                        .help("Width of the Medium band above a tower's rated ceiling")
                        .value_parser(clap::value_parser!(f64))
                        .allow_negative_numbers(true)
                        .default_value("16"),
                )
                .arg(
                    arg!(-i --"index" <KIND>)
                        .required(false)
                        .help("Nearest-tower search backend")
                        .value_parser(["linear", "rtree"])
                        .default_value("linear"),
                )
                .arg(
                    arg!(-p --"provider" <NAME>)
                        .required(false)
                        .help("Network provider name shown in the report")
                        .default_value("Unknown"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, csv, markdown")
                        .value_parser(["text", "json", "csv", "markdown"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)"),
                ),
        )
        .subcommand(
            command!("classify")
                .about("Classify a single reading against a rated ceiling")
                .arg(
                    arg!(-c --"ceiling" <DBM>)
                        .required(true)
                        .help("Rated ceiling of the tower, e.g. -100")
                        .value_parser(clap::value_parser!(i32))
                        .allow_negative_numbers(true),
                )
                .arg(
                    arg!(-s --"observed" <DBM>)
                        .required(true)
                        .help("Observed signal strength, e.g. -95")
                        .value_parser(clap::value_parser!(f64))
                        .allow_negative_numbers(true),
                )
                .arg(
                    arg!(--"margin" <DBM>)
                        .required(false)
                        .help("Width of the Medium band above the rated ceiling")
                        .value_parser(clap::value_parser!(f64))
                        .allow_negative_numbers(true)
                        .default_value("16"),
                ),
        )
}
