//! `groundcrew check`: fact-check text or a URL.

use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use groundcrew::scrapers::FirecrawlScraper;
use groundcrew::types::truncate_chars;
use groundcrew::{
    fetch_and_check, FactCheckConfig, FactChecker, PipelineState, ProviderCredentials,
    VerdictStatus,
};

use super::ConfigArgs;

const RULE_WIDTH: usize = 70;
const EVIDENCE_SHOWN: usize = 3;
const SNIPPET_PREVIEW_CHARS: usize = 150;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Text to fact-check (read from stdin when omitted)
    pub text: Vec<String>,

    /// Fetch and fact-check a web page instead (needs FIRECRAWL_API_KEY)
    #[arg(long, conflicts_with = "text")]
    pub url: Option<String>,

    /// Write the output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Emit the full pipeline state as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

pub async fn run(args: CheckArgs, config: FactCheckConfig) -> Result<()> {
    let credentials = ProviderCredentials::from_env().context("Missing API credentials")?;
    let checker = FactChecker::from_credentials(&credentials, config);

    let state = match &args.url {
        Some(url) => {
            let key = credentials.require_firecrawl()?;
            let scraper = FirecrawlScraper::new(key.expose())?;
            fetch_and_check(url, &scraper, &checker).await
        }
        None => {
            let input = read_input(&args.text)?;
            checker.run(&input).await
        }
    };

    if args.output.is_some() {
        colored::control::set_override(false);
    }
    let rendered = if args.json {
        serde_json::to_string_pretty(&state)?
    } else {
        render_state(&state)
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            colored::control::unset_override();
            println!("{} {}", "Saved results to".green(), path.display());
        }
        None => println!("{}", rendered),
    }

    if let Some(error) = &state.error {
        eprintln!("{} {}", "Warning:".yellow().bold(), error);
    }
    Ok(())
}

fn read_input(words: &[String]) -> Result<String> {
    let text = if words.is_empty() {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            bail!("Provide text to check, pipe it on stdin, or pass --url");
        }
        let mut buf = String::new();
        stdin
            .lock()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        words.join(" ")
    };

    let text = text.trim();
    if text.is_empty() {
        bail!("Input text is empty");
    }
    Ok(text.to_string())
}

fn status_label(status: VerdictStatus) -> colored::ColoredString {
    let label = status.as_str().to_uppercase();
    match status {
        VerdictStatus::Supported => label.green().bold(),
        VerdictStatus::Refuted => label.red().bold(),
        VerdictStatus::Mixed => label.yellow().bold(),
        VerdictStatus::NotEnoughInfo => label.dimmed().bold(),
    }
}

/// Report followed by the per-claim details.
pub fn render_state(state: &PipelineState) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = Vec::new();

    out.push(rule.clone());
    out.push("FACT-CHECK REPORT".bold().to_string());
    out.push(rule.clone());
    out.push(state.final_report.clone());
    out.push(String::new());
    out.push(rule.clone());
    out.push("DETAILED RESULTS:".bold().to_string());
    out.push(rule);

    for (i, verdict) in state.verdicts.iter().enumerate() {
        out.push(String::new());
        out.push(format!("[Claim {}] {}", i + 1, verdict.claim));
        out.push(format!(
            "Status: {} (Confidence: {})",
            status_label(verdict.status),
            verdict.confidence
        ));
        out.push(format!("Justification: {}", verdict.justification));

        if !verdict.evidence_used.is_empty() {
            out.push(String::new());
            out.push(format!("Evidence ({} sources):", verdict.evidence_used.len()));
            for (j, ev) in verdict.evidence_used.iter().take(EVIDENCE_SHOWN).enumerate() {
                out.push(format!("  {}. {}", j + 1, ev.source.cyan()));
                out.push(format!(
                    "     {}...",
                    truncate_chars(&ev.snippet, SNIPPET_PREVIEW_CHARS)
                ));
            }
        }
        out.push("-".repeat(RULE_WIDTH));
    }

    out.join("\n")
}
