mod debug_report;

use shorthand::{Engine, InputError, Options, RuleTable};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let engine = match build_engine(&config) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(&engine, &config) {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl RunError {
    fn exit_code(&self) -> i32 {
        match self {
            RunError::Input(_) => 2,
            RunError::Encode(_) => 1,
        }
    }
}

struct CliConfig {
    input: String,
    rules: Option<PathBuf>,
    options: Option<PathBuf>,
    color: bool,
    json: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn build_engine(config: &CliConfig) -> Result<Engine, Box<dyn std::error::Error>> {
    let table = match &config.rules {
        Some(path) => RuleTable::load(path)?,
        None => RuleTable::bundled()?,
    };
    let options = match &config.options {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    Ok(Engine::new(table, options))
}

fn run(engine: &Engine, config: &CliConfig) -> Result<(), RunError> {
    if config.json {
        let identification = engine.identify(&config.input, None)?;
        println!("{}", serde_json::to_string_pretty(&identification)?);
        return Ok(());
    }

    let report = engine.lookup_verbose(&config.input)?;
    let classification = engine.classify(&config.input)?;
    let tags = report.candidates.first().map(|top| engine.generate_tags(&config.input, top));
    debug_report::print_run(&report, tags.as_ref(), &classification, config.color);
    Ok(())
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut rules: Option<PathBuf> = None;
    let mut options: Option<PathBuf> = None;
    let mut color = io::stdout().is_terminal();
    let mut json = false;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("shorthand {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--json" => json = true,
            "--rules" => {
                let value = args.next().ok_or_else(|| "error: --rules expects a path".to_string())?;
                rules = Some(PathBuf::from(value));
            }
            "--options" => {
                let value = args.next().ok_or_else(|| "error: --options expects a path".to_string())?;
                options = Some(PathBuf::from(value));
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--rules=") => {
                rules = Some(PathBuf::from(arg.trim_start_matches("--rules=")));
            }
            _ if arg.starts_with("--options=") => {
                options = Some(PathBuf::from(arg.trim_start_matches("--options=")));
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                input = Some(std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" "));
                break;
            }
        }
    }

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, rules, options, color, json })
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "shorthand {version}

Identify vehicle shorthand and marketplace categories in listing text.

Usage:
  shorthand [OPTIONS] [--] <input...>
  echo <input> | shorthand [OPTIONS]

Options:
  --rules <path>             Rule table JSON. Default: the bundled table.
  --options <path>           Engine options JSON. Default: built-in values.
  --json                     Print the identification result as JSON.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  RUST_LOG                   Log filter, e.g. shorthand=debug. Default: warn.

Exit codes:
  0  Success.
  1  Rule table or options failed to load, or the result could not be encoded.
  2  Invalid arguments or input.
",
        version = env!("CARGO_PKG_VERSION"),
    )
}
