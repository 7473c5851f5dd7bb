use colored::Colorize;
use jv_journal::ChainReport;
use jv_types::LedgerDigest;
use serde::Serialize;
use serde_json::json;

use crate::config::OutputFormat;

/// Result of checking one revision or block against a digest.
#[derive(Debug, Serialize)]
pub struct Outcome {
    pub subject: &'static str,
    pub leaf: String,
    pub verified: bool,
    /// `None` when the self-check was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tamper_rejected: Option<bool>,
}

pub fn print_outcome(format: OutputFormat, outcome: &Outcome) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(outcome)?),
        OutputFormat::Text => {
            if outcome.verified {
                println!("{} {} verified against digest", "✓".green().bold(), outcome.subject);
            } else {
                println!("{} {} NOT verified against digest", "✗".red().bold(), outcome.subject);
            }
            println!("  Leaf: {}", outcome.leaf.cyan());
            match outcome.tamper_rejected {
                Some(true) => println!("  Tamper check: {}", "all tampered inputs rejected".green()),
                Some(false) => println!("  Tamper check: {}", "tampered input accepted".red()),
                None => {}
            }
        }
    }
    Ok(())
}

pub fn print_chain(format: OutputFormat, report: &ChainReport) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let value = json!({
                "blocksVerified": report.blocks_verified,
                "first": report.first,
                "last": report.last,
                "tipHash": report.tip_hash,
            });
            println!("{}", serde_json::to_string(&value)?);
        }
        OutputFormat::Text => {
            println!(
                "{} Hash chain intact: {} blocks",
                "✓".green().bold(),
                report.blocks_verified.to_string().bold()
            );
            if let (Some(first), Some(last)) = (&report.first, &report.last) {
                println!("  From: {first}");
                println!("  To:   {last}");
                println!("  Tip:  {}", report.tip_hash.to_base64().cyan());
            }
        }
    }
    Ok(())
}

pub fn print_digest(format: OutputFormat, digest: &LedgerDigest) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(digest)?),
        OutputFormat::Text => {
            println!("{digest}");
            println!("  Hex: {}", digest.digest.to_hex().cyan());
        }
    }
    Ok(())
}
