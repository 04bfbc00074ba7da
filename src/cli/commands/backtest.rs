//! Backtest command implementation.

use anyhow::Result;
use scout_backtest::{BacktestEngine, BacktestOptions};
use scout_config::AppConfig;
use tracing::info;

use super::build_market_data;
use crate::cli::BacktestArgs;

pub async fn run(args: BacktestArgs, config: AppConfig) -> Result<()> {
    let data = build_market_data(&config, args.data.as_deref(), &args.symbols)?;

    let limit = if args.symbols.is_empty() {
        args.limit.unwrap_or(config.optimizer.full_limit)
    } else {
        args.symbols.len()
    };
    let options = BacktestOptions {
        limit,
        days: args.days.unwrap_or(config.optimizer.full_days),
    };

    info!(
        limit = options.limit,
        days = options.days,
        "backtest starting"
    );
    let engine = BacktestEngine::new(data);
    let report = engine.run(&config, &options).await?;

    match args.output.as_str() {
        "json" => println!("{}", report.to_json()?),
        _ => println!("{}", report.summary()),
    }

    if let Some(save_path) = &args.save {
        std::fs::write(save_path, report.to_json()?)?;
        info!("results saved to {:?}", save_path);
    }

    Ok(())
}
