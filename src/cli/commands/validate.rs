//! Validate configuration command.

use anyhow::Result;
use scout_config::AppConfig;
use scout_optimizer::ParamGrid;

use crate::cli::ValidateArgs;

pub async fn run(args: ValidateArgs, config: AppConfig) -> Result<()> {
    println!("Configuration is valid.");
    println!();

    if args.toml {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("Venue:        {}", config.data.base_url);
    println!(
        "Universe:     top {} {} pairs",
        config.scan.symbols, config.data.quote_asset
    );
    println!(
        "Timeframes:   {} trend / {} entry",
        config.scan.htf, config.scan.ltf
    );
    println!(
        "Batches:      {} symbols, {}ms pause",
        config.scan.batch_size, config.scan.batch_pause_ms
    );
    println!(
        "Thresholds:   save {} / trending {} / audit {}",
        config.scan.save_threshold, config.scan.trending_threshold, config.scan.audit_threshold
    );
    println!("Min score:    {} (forward test)", config.tracker.min_score);
    println!("Store:        {}", config.store.path);
    println!(
        "Optimizer:    {} grid points",
        ParamGrid::from_config(&config.optimizer).len()
    );

    Ok(())
}
