//! gorest-suite CLI - End-to-end checks for the GoREST users/posts/comments API

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use gorest_client::{GorestClient, Scenario, run_suite, telemetry};
use gorest_core::validate::{self, validate_config};
use gorest_core::{Config, SeedData};

/// Config file written by `init`.
const INIT_CONFIG_PATH: &str = ".gorest.toml";

#[derive(Parser)]
#[command(name = "gorest-suite")]
#[command(about = "End-to-end test suite for the GoREST users/posts/comments API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "terminal")]
    output: OutputFormat,

    /// Verbose output (debug logs, including response bodies)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run scenarios against the service
    Run {
        /// Scenario to run, repeatable (default: all). See `list`.
        #[arg(short, long = "scenario", value_name = "NAME")]
        scenarios: Vec<Scenario>,

        /// Config file (default: .gorest.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seed user file (default: seed_data from config)
        #[arg(long)]
        seed: Option<PathBuf>,

        /// Dump all request/response pairs to JSONL files
        #[arg(long)]
        dump: bool,

        /// Directory for dump files (default: .gorest/dumps)
        #[arg(long)]
        dump_dir: Option<PathBuf>,
    },

    /// List available scenarios
    List,

    /// Initialize config file
    Init,

    /// Check configuration without sending requests
    Doctor {
        /// Config file (default: .gorest.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Export JSON Schema for the `--output json` report
    Schema,
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    Terminal,
    Json,
    Silent,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "debug"
    } else if cli.output == OutputFormat::Silent {
        "error"
    } else {
        "info"
    };
    telemetry::init_with_default(default_level);

    match run(cli) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(3)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let cfg = match path {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    Ok(cfg.with_env())
}

/// An explicit seed path must exist; the configured default may be absent.
fn load_seed(explicit: Option<&Path>, cfg: &Config) -> Result<SeedData> {
    if let Some(path) = explicit {
        return Ok(SeedData::load(path)?);
    }
    if cfg.seed_data.exists() {
        return Ok(SeedData::load(&cfg.seed_data)?);
    }
    info!(
        path = %cfg.seed_data.display(),
        "seed file not found, using built-in seed user"
    );
    Ok(SeedData::default())
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Run {
            scenarios,
            config,
            seed,
            dump,
            dump_dir,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            cfg.dump |= dump;
            if dump_dir.is_some() {
                cfg.dump_dir = dump_dir;
            }

            let seed = load_seed(seed.as_deref(), &cfg)?;
            let client = GorestClient::new(&cfg).context("cannot build GoREST client")?;

            let selected: Vec<Scenario> = if scenarios.is_empty() {
                Scenario::ALL.to_vec()
            } else {
                scenarios
            };

            if cli.output == OutputFormat::Terminal {
                eprintln!("Config:");
                eprintln!("  base_url:  {}", cfg.base_url);
                if !cfg.headers.is_empty() {
                    eprintln!("  headers:   {} configured", cfg.headers.len());
                }
                eprintln!("  seed:      {} user(s)", seed.users.len());
                eprintln!("  scenarios: {}", selected.len());
                eprintln!();
            }

            let report = run_suite(&client, &seed, &selected);

            if report.total == 0 {
                eprintln!("Error: No scenarios were run.");
                return Ok(3);
            }

            match cli.output {
                OutputFormat::Terminal => {
                    println!("{}", report.to_terminal());
                    println!("  Exit code: {}", report.exit_code());
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                OutputFormat::Silent => {}
            }

            if cfg.dump {
                let dump_path = cfg.dump_dir_or_default();
                match client.write_dump(&dump_path) {
                    Ok(Some(index)) => {
                        if cli.output != OutputFormat::Silent {
                            eprintln!(
                                "Dump: {} exchanges → {} ({})",
                                index.total,
                                dump_path.display(),
                                index
                                    .operations
                                    .iter()
                                    .map(|e| e.file.as_str())
                                    .collect::<Vec<_>>()
                                    .join(", "),
                            );
                        }
                    }
                    Ok(None) => {}
                    Err(e) => warn!("failed to write dump: {e}"),
                }
            }

            Ok(report.exit_code())
        }

        Commands::List => {
            match cli.output {
                OutputFormat::Json => {
                    let list: Vec<_> = Scenario::ALL
                        .iter()
                        .map(|s| {
                            serde_json::json!({
                                "name": s.name(),
                                "description": s.description(),
                            })
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&list)?);
                }
                OutputFormat::Terminal => {
                    for scenario in Scenario::ALL {
                        println!("{:<16} {}", scenario.name(), scenario.description());
                    }
                }
                OutputFormat::Silent => {}
            }
            Ok(0)
        }

        Commands::Init => {
            if Path::new(INIT_CONFIG_PATH).exists() {
                eprintln!("{INIT_CONFIG_PATH} already exists");
                return Ok(1);
            }

            std::fs::write(INIT_CONFIG_PATH, Config::example())
                .with_context(|| format!("cannot write {INIT_CONFIG_PATH}"))?;
            println!("Created {INIT_CONFIG_PATH}");
            println!("\nEdit the file to configure:");
            println!("  - base_url: GoREST endpoint");
            println!("  - seed_data: users used as creation templates");
            println!("  - headers: extra request headers");
            println!("\nSet the token via GOREST_BEARER_TOKEN rather than the file.");
            Ok(0)
        }

        Commands::Doctor { config } => {
            let cfg = load_config(config.as_deref())?;
            let validations = validate_config(&cfg);

            match cli.output {
                OutputFormat::Terminal => {
                    println!("gorest-suite doctor");
                    println!("===================\n");
                    println!("{}", validate::to_terminal(&validations));
                    if !Path::new(INIT_CONFIG_PATH).exists() && config.is_none() {
                        println!("\nNo {INIT_CONFIG_PATH} found; create one with:");
                        println!("  gorest-suite init");
                    }
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&validations)?);
                }
                OutputFormat::Silent => {}
            }

            Ok(i32::from(validate::has_errors(&validations)))
        }

        Commands::Schema => {
            let schema = gorest_core::report::generate_schema();
            println!("{schema}");
            Ok(0)
        }
    }
}
