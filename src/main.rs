// src/main.rs
mod cli;
mod config;
mod error;
mod evaluator;
mod file_utils;
mod models;
mod report_formatter;
mod system_discovery;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use config::{load_config, resolve_settings, validate_settings};
use evaluator::EvaluatorInvocation;
use report_formatter::format_report;
use std::fs;
use std::path::PathBuf;
use system_discovery::discover_systems;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    run(&cli)
}

/// 根据 -v 次数设置日志级别，RUST_LOG 优先
fn init_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level(verbose)))
        .format_timestamp(None)
        .init();
}

/// 默认 info，保证 "Adding system" 等发现信息无需 -v 即可见
fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn run(cli: &Cli) -> Result<()> {
    // 加载配置并合并命令行参数
    let config = load_config(cli.config.as_deref())?;
    let settings = resolve_settings(cli, &config, PathBuf::from("."))?;
    log::debug!("Settings: {:?}", settings);

    // 扫描目录之前先检查语言参数、参考译文和输出目录
    validate_settings(&settings)?;

    fs::create_dir_all(&settings.output_dir).with_context(|| {
        format!("Failed to create output folder: {}", settings.output_dir.display())
    })?;

    // 发现并过滤系统
    let discovery = discover_systems(
        &settings.search_root,
        settings.folders.as_deref(),
        &settings.baseline,
        &settings.pattern,
    )?;
    log::info!(
        "Found {} different models for {} (n_runs: {}, skipped: {})",
        discovery.table.len(),
        settings.test_set,
        discovery.run_count,
        discovery.skipped.len()
    );
    for system in discovery.table.iter() {
        log::debug!("{}: {:?}", system.name, system.files);
    }

    // 调用 multeval 并整理输出
    let invocation = EvaluatorInvocation::build(&settings, &discovery.table)?;
    let raw_output = invocation.run()?;
    let table = format_report(&raw_output, &settings.sort_by)?;

    let results_file = settings.results_file();
    fs::write(&results_file, format!("{}\n", table))
        .with_context(|| format!("Failed to write results: {}", results_file.display()))?;
    log::info!("Results written to {}", results_file.display());

    println!("{}", table);
    Ok(())
}
