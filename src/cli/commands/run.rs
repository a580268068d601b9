//! Run the scan loop until interrupted.

use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::cli::RunArgs;

use super::build_engine;

pub async fn run(args: RunArgs, config_path: Option<&Path>) -> Result<()> {
    let config = scanner_config::load_config(config_path)?;
    let engine = build_engine(&config, &args.symbols, args.capital)?;

    engine.start().await?;
    info!("scan loop running, press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    info!("shutdown requested");
    engine.stop().await;

    let snapshot = engine.snapshot().await;
    let metrics = engine.metrics().await;

    println!();
    println!("Final state");
    println!("  Scans:          {}", snapshot.scan_count);
    println!("  Capital:        {}", snapshot.capital);
    println!("  Daily P&L:      {}", snapshot.daily_pnl);
    println!("  Open positions: {}", snapshot.open_positions);
    println!("  Closed trades:  {}", metrics.total_trades);
    println!("  Win rate:       {:.1}%", metrics.win_rate * 100.0);

    Ok(())
}
