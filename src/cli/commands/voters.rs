//! List voters command.

use anyhow::Result;
use scanner_voters::Voter;

pub async fn run() -> Result<()> {
    println!("Available voters");
    println!("───────────────────────────────────────");

    for voter in Voter::all_defaults() {
        println!("  {:<16} weight {:.1}", voter.kind(), voter.default_weight());
    }

    println!();
    println!("Strategy store entries reference voters by kind; a store");
    println!("weight overrides the default shown here.");

    Ok(())
}
