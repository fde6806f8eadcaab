//! Command-line argument handling
//!
//! [`run`] is the real entrypoint of the program; `main` just calls it.

use crate::AppSettings;
use clap::{App, Arg, ArgGroup, ArgMatches};
use std::path::Path;
use std::process::exit;

/// Where the growth parameters come from
pub enum Model<'cli> {
    /// Parameters parsed (and validated) from a JSON model file
    FromJson { file: &'cli Path },
    /// The built-in sample model
    Sample,
}

/// How the generated skeleton gets written out
pub enum DisplayMethod<'cli> {
    /// CSV rows, to the given file or stdout. This is the default.
    Csv { file: Option<&'cli str> },
    /// The whole skeleton as a JSON document, to the given file or stdout
    Json { file: Option<&'cli str> },
    /// An orthographic PNG preview
    Png { file: &'cli str },
}

/// Parses the command-line arguments and runs the app
pub fn run() {
    let matches = App::new("arborgen")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Grows branching fractal tree skeletons as collections of tapered beams")
        .arg(
            Arg::with_name("model")
                .long("model")
                .short("m")
                .value_name("FILE")
                .takes_value(true)
                .help("JSON growth-parameter file; a built-in sample model is used if absent"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .short("s")
                .value_name("N")
                .takes_value(true)
                .help("Seed for the pseudorandom stream; overrides the model file's seed"),
        )
        .arg(
            Arg::with_name("csv")
                .long("csv")
                .value_name("FILE")
                .takes_value(true)
                .min_values(0)
                .max_values(1)
                .help("Write the skeleton as CSV, to FILE or stdout [default output]"),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .value_name("FILE")
                .takes_value(true)
                .min_values(0)
                .max_values(1)
                .help("Write the skeleton as JSON, to FILE or stdout"),
        )
        .arg(
            Arg::with_name("png")
                .long("png")
                .value_name("FILE")
                .takes_value(true)
                .help("Render an orthographic preview of the skeleton to FILE"),
        )
        .group(ArgGroup::with_name("output").args(&["csv", "json", "png"]))
        .get_matches();

    let settings = AppSettings {
        model: parse_model(&matches),
        seed: parse_seed(&matches),
        display_method: parse_display_method(&matches),
    };

    settings.run()
}

fn parse_model<'cli>(matches: &'cli ArgMatches) -> Model<'cli> {
    match matches.value_of("model") {
        Some(file) => Model::FromJson {
            file: Path::new(file),
        },
        None => Model::Sample,
    }
}

fn parse_seed(matches: &ArgMatches) -> Option<u64> {
    let value = matches.value_of("seed")?;

    match value.parse() {
        Ok(seed) => Some(seed),
        Err(_) => {
            eprintln!("invalid seed {:?}: expected an unsigned integer", value);
            exit(1)
        }
    }
}

fn parse_display_method<'cli>(matches: &'cli ArgMatches) -> DisplayMethod<'cli> {
    // The arg group guarantees at most one of these is present.
    if matches.is_present("png") {
        DisplayMethod::Png {
            // `--png` requires a value, so this can't fail
            file: matches.value_of("png").unwrap(),
        }
    } else if matches.is_present("json") {
        DisplayMethod::Json {
            file: matches.value_of("json"),
        }
    } else {
        DisplayMethod::Csv {
            file: matches.value_of("csv"),
        }
    }
}
