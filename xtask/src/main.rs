use anyhow::Context;
use clap::{Parser, Subcommand};
use fs_err as fs;
use importfix_types::report::{ImportfixReport, RunSummary};
use std::process::Command as ProcessCommand;

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Workspace helper tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print schema identifiers used by importfix.
    PrintSchemas,
    /// Scaffold tests/fixtures/<name> with an empty workspace and expected/ layout.
    NewFixture { name: String },
    /// Bless golden fixtures (overwrite expected outputs).
    BlessFixtures,
    /// Check that a report.json parses and its summary agrees with its file entries.
    ValidateReport {
        #[arg(default_value = "artifacts/importfix/report.json")]
        path: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::PrintSchemas => {
            println!("{}", importfix_types::schema::IMPORTFIX_REPORT_V1);
        }
        Command::NewFixture { name } => {
            let root = format!("tests/fixtures/{name}");
            if fs::metadata(&root).is_ok() {
                anyhow::bail!("{root} already exists");
            }
            fs::create_dir_all(format!("{root}/workspace/Pods"))
                .with_context(|| format!("create {root}"))?;
            fs::create_dir_all(format!("{root}/expected/after"))?;
            fs::write(format!("{root}/workspace/Podfile"), "platform :ios, '12.0'\n")?;
            println!("initialized {root}/{{workspace,expected}}; add a test to golden_fixtures.rs and bless");
        }
        Command::BlessFixtures => {
            let status = ProcessCommand::new("cargo")
                .args(["test", "-p", "importfix-core", "--test", "golden_fixtures"])
                .env("IMPORTFIX_BLESS", "1")
                .status()
                .context("run golden fixture blessing")?;
            if !status.success() {
                anyhow::bail!("bless-fixtures failed");
            }
        }
        Command::ValidateReport { path } => {
            let text = fs::read_to_string(&path)?;
            let report: ImportfixReport =
                serde_json::from_str(&text).with_context(|| format!("parse {path}"))?;
            if report.schema != importfix_types::schema::IMPORTFIX_REPORT_V1 {
                anyhow::bail!("{path}: unexpected schema {}", report.schema);
            }
            let recomputed = RunSummary::from_files(&report.files, report.failures.len() as u64);
            if recomputed != report.summary {
                anyhow::bail!(
                    "{path}: summary {:?} does not match file entries {:?}",
                    report.summary,
                    recomputed
                );
            }
            println!("{path}: ok ({} file(s))", report.files.len());
        }
    }
    Ok(())
}
