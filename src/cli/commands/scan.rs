//! Single scan tick command.

use anyhow::Result;
use std::path::Path;

use crate::cli::ScanArgs;

use super::build_engine;

pub async fn run(args: ScanArgs, config_path: Option<&Path>) -> Result<()> {
    let config = scanner_config::load_config(config_path)?;
    let engine = build_engine(&config, &args.symbols, None)?;

    engine.tick_once().await;

    let signals = engine.recent_signals(usize::MAX).await;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&signals)?);
        return Ok(());
    }

    let snapshot = engine.snapshot().await;
    println!(
        "Scanned {} symbols, {} directional signals",
        engine.config().symbols.len(),
        signals.len()
    );
    for signal in &signals {
        println!(
            "  {:<12} {:?} score {:+.2} confidence {:.0}% @ {:.2} -> {}",
            signal.symbol,
            signal.decision,
            signal.score,
            signal.confidence * 100.0,
            signal.price,
            signal.action
        );
    }
    println!(
        "Capital {} | open positions {}",
        snapshot.capital, snapshot.open_positions
    );

    Ok(())
}
