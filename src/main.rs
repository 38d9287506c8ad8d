//! `ode-rs <input-file> [--csv <path>]`
//!
//! Solves the problem described by an input file and prints the
//! approximation table, or writes it to a CSV file.

use std::error::Error;
use std::process::ExitCode;

use ode_rs::input::InputParameters;
use ode_rs::output::{export_result_csv, CsvConfig, CsvMetadata};

const USAGE: &str = "usage: ode-rs <input-file> [--csv <path>]";

struct Arguments {
    input: String,
    csv: Option<String>,
}

fn parse_arguments(args: impl Iterator<Item = String>) -> Result<Arguments, String> {
    let mut input = None;
    let mut csv = None;
    let mut args = args;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--csv" => {
                csv = Some(args.next().ok_or("--csv expects a path")?);
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ if input.is_none() => input = Some(arg),
            _ => return Err(format!("unexpected argument `{arg}`")),
        }
    }

    let input = input.ok_or_else(|| USAGE.to_string())?;
    Ok(Arguments { input, csv })
}

fn run(arguments: &Arguments) -> Result<(), Box<dyn Error>> {
    let params = InputParameters::from_file(&arguments.input)?;
    let problem = params.build()?;
    let result = problem.run()?;

    match &arguments.csv {
        Some(path) => {
            let mut metadata = CsvMetadata::from_result(&result);
            metadata.add_custom("Input", arguments.input.as_str());
            let config = CsvConfig::default().with_metadata(metadata);
            export_result_csv(&result, path, Some(&config))?;
            println!("{} time points written to {path}", result.len());
        }
        None => {
            println!("Method: {}", problem.solver.name());
            print!("{}", result.table("Approximations"));
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let arguments = match parse_arguments(std::env::args().skip(1)) {
        Ok(arguments) => arguments,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    match run(&arguments) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}
