//! Recession probability simulator CLI.
//!
//! Usage:
//!   recession-sim [OPTIONS]
//!
//! Examples:
//!   recession-sim                                   # 20000 trials on the default baseline
//!   recession-sim --csv indicators.csv -n 50000     # baseline from a CSV file
//!   recession-sim --set unemploymentRate=7.5 -s 42  # reproducible what-if run

use recession_sim::build_info;
use recession_sim::context::{describe_or_notice, GeminiClient};
use recession_sim::input::{apply_override, load_indicator_csv, validate_indicators};
use recession_sim::logging;
use recession_sim::{run_simulation, IndicatorVector, SimConfig};
use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug)]
enum Action {
    Run,
    Help,
    Version,
}

#[derive(Debug)]
struct Cli {
    action: Action,
    config: SimConfig,
    csv: Option<PathBuf>,
    overrides: Vec<String>,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(msg) => {
            eprintln!("error: {}", msg);
            eprintln!("Run 'recession-sim --help' for usage.");
            return ExitCode::from(2);
        }
    };

    match cli.action {
        Action::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Action::Version => {
            println!("{}", build_info::version_line());
            ExitCode::SUCCESS
        }
        Action::Run => match run(cli) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = cli.config;
    logging::init_tracing(config.verbosity);

    let mut baseline = IndicatorVector::default();
    if let Some(path) = &cli.csv {
        baseline = load_indicator_csv(path, Some(&baseline))?;
    }
    for assignment in &cli.overrides {
        apply_override(assignment, &mut baseline)?;
    }
    validate_indicators(&baseline)?;

    if !config.json && config.verbosity > 0 {
        println!("Configuration:");
        println!("  Trials:         {}", config.trials);
        println!("  Workers:        {}", config.workers);
        if let Some(seed) = config.seed {
            println!("  Seed:           {}", seed);
        }
        if let Some(path) = &cli.csv {
            println!("  Baseline CSV:   {}", path.display());
        }
        println!();
    }

    let report = run_simulation(&config, &baseline)?;

    if config.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.to_text());
    }

    if config.with_context {
        let client = GeminiClient::from_env();
        let commentary = describe_or_notice(&client, &report.result);
        if config.json {
            eprintln!("{}", commentary);
        } else {
            println!("── CONTEXT ──────────────────────────────────────────────────────");
            println!("{}", commentary);
        }
    }

    Ok(())
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{} needs a value", flag))
}

fn parse_args(args: &[String]) -> Result<Cli, String> {
    let mut cli = Cli {
        action: Action::Run,
        config: SimConfig::default(),
        csv: None,
        overrides: Vec::new(),
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-n" | "--trials" => {
                let raw = next_value(args, &mut i, flag)?;
                cli.config.trials = raw
                    .parse()
                    .map_err(|_| format!("invalid trial count {:?}", raw))?;
            }
            "-s" | "--seed" => {
                let raw = next_value(args, &mut i, flag)?;
                cli.config.seed = Some(raw.parse().map_err(|_| format!("invalid seed {:?}", raw))?);
            }
            "-w" | "--workers" => {
                let raw = next_value(args, &mut i, flag)?;
                cli.config.workers = raw
                    .parse()
                    .ok()
                    .filter(|n: &usize| *n > 0)
                    .ok_or_else(|| format!("invalid worker count {:?}", raw))?;
            }
            "--csv" => {
                cli.csv = Some(PathBuf::from(next_value(args, &mut i, flag)?));
            }
            "--set" => {
                cli.overrides.push(next_value(args, &mut i, flag)?.to_string());
            }
            "--json" => cli.config.json = true,
            "--context" => cli.config.with_context = true,
            "--quick" => {
                cli.config.trials = SimConfig::quick().trials;
            }
            "--precise" => {
                let precise = SimConfig::precise();
                cli.config.trials = precise.trials;
                cli.config.workers = precise.workers;
            }
            "-v" | "--verbose" => cli.config.verbosity = 2,
            "-q" | "--quiet" => cli.config.verbosity = 0,
            "--version" | "-V" => cli.action = Action::Version,
            "-h" | "--help" => cli.action = Action::Help,
            other => return Err(format!("unknown option {:?}", other)),
        }
        i += 1;
    }

    Ok(cli)
}

fn print_help() {
    println!("Recession Probability Simulator");
    println!();
    println!("USAGE:");
    println!("    recession-sim [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --trials <N>      Number of trials (default: 20000)");
    println!("    -s, --seed <S>        Random seed for reproducibility");
    println!("    -w, --workers <N>     Split trials across N threads (default: 1)");
    println!("        --csv <PATH>      Read baseline indicators from a CSV file");
    println!("        --set <KEY=VAL>   Override one indicator (repeatable)");
    println!("        --json            Print the report as JSON");
    println!("        --context         Ask the AI service for a written analysis");
    println!("        --quick           2000 trials");
    println!("        --precise         100000 trials on all cores");
    println!("    -v, --verbose         Debug logging");
    println!("    -q, --quiet           Warnings only");
    println!("    -V, --version         Show version information");
    println!("    -h, --help            Show this help message");
    println!();
    println!("INDICATORS (CSV header / --set keys):");
    for indicator in recession_sim::Indicator::ALL {
        let range = indicator.input_range();
        println!(
            "    {:<24} {} [{} to {}]",
            indicator.key(),
            indicator.label(),
            range.min,
            range.max
        );
    }
    println!();
    println!("ENVIRONMENT:");
    println!("    GEMINI_API_KEY        API key for --context");
    println!("    RECESSION_SIM_LOG     Log filter, e.g. recession_sim=debug");
}
