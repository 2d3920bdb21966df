use anyhow::{Context, Result};
use clap::Parser;
use question_audit::cli::{Cli, Command};
use question_audit::orchestrator::{run_renumber, App, ReportOptions};
use question_audit::utils::logging;
use question_audit::workflow::DropMatching;
use question_audit::Config;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    // 加载配置
    let mut config = match &cli.config {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::default(),
    }
    .with_env();
    config.verbose_logging |= cli.verbose;

    // 初始化日志
    logging::init(config.verbose_logging);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Report(args) => {
            args.apply_to(&mut config);
            config.validate()?;

            let options = ReportOptions {
                list_failing: args.list_failing.clone(),
                sample_ids: args.samples.clone(),
            };
            let summary = App::new(config, options).run(&args.paths, &mut out).await?;

            if summary.has_failures() {
                eprintln!("❌ {} 个数据源无法解析", summary.failed_sources);
                return Ok(ExitCode::FAILURE);
            }
            if args.strict && summary.has_violations() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Renumber(args) => {
            config.validate()?;

            let scheme = args.id_scheme(&config);
            let mut rule = DropMatching::new(args.drop_ids.iter(), args.drop_containing.iter());
            run_renumber(&args.file, &mut rule, scheme, args.dry_run, &mut out)
                .await
                .with_context(|| format!("修正失败，原文件未改动: {}", args.file.display()))?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
