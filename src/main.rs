//! prism-unpivot - Main Entry Point
//!
//! Plans SQL statements containing UNPIVOT and prints the logical plan.

use anyhow::Context;
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use prism_unpivot::{plan_sql, CliConfig, OutputFormat, PrismError, PrismResult};

const HISTORY_FILE: &str = ".prism_unpivot_history";

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn run_interactive_mode(config: &mut CliConfig) -> anyhow::Result<()> {
    println!("prism-unpivot v{}", env!("CARGO_PKG_VERSION"));
    println!("Enter '.help' for usage hints.");
    println!("Enter SQL statements terminated with a semicolon (;)");
    println!();

    let mut rl = DefaultEditor::new().context("failed to initialize line editor")?;
    let history_file = config.history.then(|| {
        dirs::home_dir()
            .map(|mut path| {
                path.push(HISTORY_FILE);
                path
            })
            .unwrap_or_else(|| PathBuf::from(HISTORY_FILE))
    });

    if let Some(history_file) = &history_file {
        let _ = rl.load_history(history_file);
    }

    let mut sql_buffer = String::new();

    loop {
        let prompt = if sql_buffer.is_empty() {
            "unpivot> "
        } else {
            "      -> "
        };

        match rl.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();

                if sql_buffer.is_empty() && trimmed.starts_with('.') {
                    let _ = rl.add_history_entry(trimmed);
                    if handle_special_command(trimmed, config) {
                        break;
                    }
                    continue;
                }

                if trimmed.is_empty() {
                    continue;
                }

                if !sql_buffer.is_empty() {
                    sql_buffer.push(' ');
                }
                sql_buffer.push_str(trimmed);

                if trimmed.ends_with(';') {
                    let _ = rl.add_history_entry(&sql_buffer);
                    if let Err(e) = explain_sql(&sql_buffer, config.format) {
                        report_error(&sql_buffer, &e);
                    }
                    sql_buffer.clear();
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                sql_buffer.clear();
            }
            Err(ReadlineError::Eof) => {
                println!("exit");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    if let Some(history_file) = &history_file {
        let _ = rl.save_history(history_file);
    }

    Ok(())
}

/// Returns true when the REPL should exit
fn handle_special_command(command: &str, config: &mut CliConfig) -> bool {
    let parts: Vec<&str> = command.split_whitespace().collect();
    let cmd = parts.first().copied().unwrap_or_default();

    match cmd {
        ".exit" | ".quit" => {
            println!("Goodbye!");
            return true;
        }
        ".help" => print_help(),
        ".format" => match parts.get(1).copied() {
            Some("tree") => config.format = OutputFormat::Tree,
            Some("json") => config.format = OutputFormat::Json,
            Some(other) => eprintln!("Invalid format '{}'. Use: tree or json", other),
            None => println!("Current format: {}", config.format),
        },
        ".show" => {
            println!("     format: {}", config.format);
            println!(" log_filter: {}", config.log_filter);
            println!("    history: {}", if config.history { "on" } else { "off" });
        }
        ".version" => println!("prism-unpivot v{}", env!("CARGO_PKG_VERSION")),
        _ => {
            println!("Unknown command: {}", cmd);
            println!("Type '.help' for list of available commands.");
        }
    }
    false
}

fn print_help() {
    println!(
        r#"
.help                    Show this help message
.quit                    Exit this program
.exit                    Exit this program
.format tree|json        Set plan output format
.show                    Show current settings
.version                 Show version information

Example:
  SELECT * FROM t UNPIVOT (val FOR col IN (a, b));
  SELECT * FROM t UNPIVOT INCLUDE NULLS ((v1, v2) FOR k IN ((a, b) AS ab, (c, d) AS cd)) up;

Keyboard Shortcuts:
  Ctrl+C                Cancel current statement
  Ctrl+D                Exit (same as .exit)
  Up/Down arrows        Navigate command history
"#
    );
}

fn explain_sql(sql: &str, format: OutputFormat) -> PrismResult<()> {
    let plan = plan_sql(sql)?;
    match format {
        OutputFormat::Tree => print!("{}", plan),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
    }
    Ok(())
}

/// Print an error; syntax errors also get the offending line with a caret
fn report_error(sql: &str, error: &PrismError) {
    eprintln!("Error: {}", error);
    if let Some(syntax) = error.as_syntax_error() {
        if let Some(line) = sql.lines().nth(syntax.position.line.saturating_sub(1)) {
            eprintln!("  {}", line);
            eprintln!("  {:>width$}", "^", width = syntax.position.column);
        }
    }
}

#[derive(Parser)]
#[command(name = "prism-unpivot")]
#[command(about = "Plan SQL UNPIVOT queries and print the logical plan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// SQL statement to plan (interactive mode if omitted)
    sql: Option<String>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Plan output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Log filter, e.g. `debug` or `prism_unpivot=trace`
    #[arg(long)]
    log: Option<String>,
}

fn load_config(cli: &Cli) -> PrismResult<CliConfig> {
    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    let mut config = config.with_env().with_log_override(cli.log.clone());
    if let Some(format) = cli.format {
        config.format = format;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };
    init_tracing(&config.log_filter);

    match &cli.sql {
        Some(sql) => {
            if let Err(e) = explain_sql(sql, config.format) {
                report_error(sql, &e);
                process::exit(1);
            }
        }
        None => run_interactive_mode(&mut config)?,
    }

    Ok(())
}
