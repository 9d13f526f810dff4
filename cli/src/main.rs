//! unsheet CLI - spreadsheet tabular extraction tool
//!
//! Reads an XLSX file and prints its rows, records, or a seeding plan as JSON.

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use unsheet::render::{to_json, JsonFormat};
use unsheet::seed::{plan_column_themes, plan_theme_rows, ThemeTable};
use unsheet::{ExtractOptions, XlsxReader};

/// Spreadsheet extraction into header-named records
#[derive(Parser)]
#[command(
    name = "unsheet",
    author = "iyulab",
    version,
    about = "Extract header-named records from XLSX workbooks",
    long_about = "unsheet - XLSX tabular extraction tool.\n\n\
                  Decodes every worksheet, takes the first non-blank row as the header,\n\
                  and emits the remaining rows as JSON records."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract header-named records as JSON
    Records {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,

        /// Apply Unicode NFC normalization to cell text
        #[arg(long)]
        nfc: bool,
    },

    /// Dump decoded rows as JSON
    Rows {
        /// Input file path
        input: PathBuf,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// List worksheet parts in processing order
    Parts {
        /// Input file path
        input: PathBuf,
    },

    /// Plan themes and questions for seeding
    Seed {
        /// Input file path
        input: PathBuf,

        /// Header naming each row's theme (long layout)
        #[arg(long, requires = "question_column")]
        theme_column: Option<String>,

        /// Header naming each row's question text (long layout)
        #[arg(long, requires = "theme_column")]
        question_column: Option<String>,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Records {
            input,
            output,
            compact,
            nfc,
        } => {
            let pb = create_spinner("Reading workbook...");

            let options = ExtractOptions::new().with_unicode_normalization(nfc);
            let reader = open_reader(&input, options)?;
            pb.set_message("Building records...");
            let table = reader.extract()?;
            let json = to_json(&table.records, json_format(compact))?;

            pb.finish_and_clear();
            write_output(output.as_ref(), &json)?;

            if let Some(path) = output {
                println!(
                    "{} Wrote {} records: {}",
                    "✓".green().bold(),
                    table.records.len(),
                    path.display()
                );
            }
        }

        Commands::Rows { input, compact } => {
            let reader = open_reader(&input, ExtractOptions::default())?;
            let rows = reader.read_rows()?;
            write_output(None, &to_json(&rows, json_format(compact))?)?;
        }

        Commands::Parts { input } => {
            let reader = open_reader(&input, ExtractOptions::default())?;

            println!("{}", "Worksheet parts".cyan().bold());
            println!("{}", "─".repeat(40));
            for (idx, part) in reader.worksheet_parts().iter().enumerate() {
                println!("{:>3}. {}", idx + 1, part);
            }
            println!(
                "\n{}: {}",
                "Shared strings".bold(),
                reader.shared_strings().len()
            );
        }

        Commands::Seed {
            input,
            theme_column,
            question_column,
            compact,
        } => {
            let pb = create_spinner("Reading workbook...");

            let reader = open_reader(&input, ExtractOptions::default())?;
            let table = reader.extract()?;

            let plan = match (theme_column, question_column) {
                (Some(theme), Some(question)) => {
                    plan_theme_rows(&table.records, &theme, &question, ThemeTable::new())
                }
                _ => match table.header {
                    Some(ref header) => {
                        plan_column_themes(header, &table.records, ThemeTable::new())
                    }
                    None => Default::default(),
                },
            };

            pb.finish_and_clear();
            write_output(None, &to_json(&plan, json_format(compact))?)?;
            eprintln!(
                "{} {} themes, {} questions",
                "✓".green().bold(),
                plan.themes.len(),
                plan.questions.len()
            );
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn open_reader(input: &Path, options: ExtractOptions) -> Result<XlsxReader, Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    Ok(XlsxReader::from_bytes_with_options(data, options)?)
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn print_version() {
    println!("{} {}", "unsheet".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("XLSX tabular extraction into header-named records");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_seed_columns_require_each_other() {
        let result = Cli::try_parse_from(["unsheet", "seed", "in.xlsx", "--theme-column", "Theme"]);
        assert!(result.is_err());

        let result = Cli::try_parse_from([
            "unsheet",
            "seed",
            "in.xlsx",
            "--theme-column",
            "Theme",
            "--question-column",
            "Question",
        ]);
        assert!(result.is_ok());
    }
}
