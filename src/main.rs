use anyhow::{Context, Result};
use clap::Parser;
use save_graph::cli::ExportArgs;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

fn main() -> Result<()> {
    // 日志走 stderr，stdout 只留给 --summary
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("日志初始化失败")?;

    let args = ExportArgs::parse();
    save_graph::export::run(&args).context("导出计算图失败")?;
    Ok(())
}
