use anyhow::Context;
use clap::Parser;
use importfix_cli::args::{Cli, OutputFormat};
use importfix_cli::config::{self, ConfigMerger};
use importfix_core::adapters::FsWritePort;
use importfix_core::pipeline::{self, ToolError};
use importfix_core::FsSourceTree;
use importfix_render::render_summary_text;
use importfix_types::report::ToolInfo;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version print to stdout and succeed; usage errors are fatal.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    init_tracing(cli.verbose);

    match real_main(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{:?}", e);
            eprintln!("importfix: {:#}", e);
            let code = e.downcast_ref::<ToolError>().map_or(1, ToolError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn real_main(cli: Cli) -> anyhow::Result<u8> {
    cli.validate()?;

    let project_root = cli.project_root();
    let file_config =
        config::load_or_default(&project_root).context("load importfix.toml config")?;
    let merged = ConfigMerger::new(file_config).merge_run_args(
        &project_root,
        &cli.exclude,
        cli.patch_file.as_deref(),
        cli.dry_run,
    );
    debug!(
        "merged config: exclude={:?}, patch_file={:?}, dry_run={}",
        merged.exclude, merged.patch_file, merged.dry_run
    );

    let settings = cli.to_settings(merged);
    let outcome = pipeline::run(&settings, &FsSourceTree, &FsWritePort, tool_info())?;

    if !cli.no_artifacts {
        let out_dir = cli.out_dir.clone().unwrap_or_else(|| settings.default_out_dir());
        pipeline::write_run_artifacts(&outcome, &out_dir, &FsWritePort)
            .with_context(|| format!("write artifacts to {}", out_dir))?;
        info!("wrote report to {}", out_dir);
    }

    match cli.format {
        OutputFormat::Text => print!("{}", render_summary_text(&outcome.report)),
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&outcome.report).context("serialize report")?;
            println!("{}", json);
        }
    }

    Ok(outcome.exit_code())
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "importfix".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}
