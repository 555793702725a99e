//! Command-line interface for classmate.
//!
//! Thin adapter over the library: resolves highlight segments for an
//! analysis report and ranks mention candidates for a message.

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{self, ResolvedConfig};
use crate::domain::{AnalysisReport, MentionCandidate, TextSegment};
use crate::highlight::IssueSet;
use crate::mentions::{active_mention_query, RankedResult};

/// classmate - writing-assistant highlights and @mention ranking
#[derive(Parser, Debug)]
#[command(name = "classmate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Highlight issues from an analysis report on a document
    Highlight {
        /// Document text file
        #[arg(short, long)]
        text: PathBuf,

        /// Analysis report (JSON)
        #[arg(short, long)]
        issues: PathBuf,

        /// Print segments as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rank mention candidates for a message
    Mentions {
        /// Roster file (JSON array of candidates)
        #[arg(short, long)]
        roster: PathBuf,

        /// Message text (reads from stdin if not provided)
        #[arg(short, long)]
        message: Option<String>,

        /// Allow the external subject classifier
        #[arg(long)]
        external: bool,

        /// Maximum number of candidates to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Partial name after `@` (detected from the message end if omitted)
        #[arg(short, long)]
        query: Option<String>,

        /// Print the ranked result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Highlight { text, issues, json } => highlight(&text, &issues, json),
            Commands::Mentions {
                roster,
                message,
                external,
                limit,
                query,
                json,
            } => rank_mentions(&roster, message, external, limit, query, json).await,
            Commands::Config => show_config(),
        }
    }
}

/// Resolve and print highlight segments
fn highlight(text_path: &Path, report_path: &Path, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(text_path)
        .with_context(|| format!("Failed to read text file: {}", text_path.display()))?;
    let raw = std::fs::read_to_string(report_path)
        .with_context(|| format!("Failed to read report file: {}", report_path.display()))?;
    let report = AnalysisReport::from_json(&raw)
        .with_context(|| format!("Failed to parse report: {}", report_path.display()))?;

    let (score, readability) = (report.score, report.readability);
    let set = IssueSet::new(text, report.into_issues());
    let segments = set.segments();

    if json {
        let out = serde_json::to_string_pretty(&segments).context("Failed to serialize segments")?;
        println!("{}", out);
        return Ok(());
    }

    println!("{}", render_markup(&segments));
    println!();
    println!("Score: {}  Readability: {}", score, readability);
    for (category, count) in set.counts() {
        println!("  {:<12} {}", category, count);
    }

    let highlighted: Vec<_> = segments.iter().filter_map(|s| s.issue.map(|i| (s, i))).collect();
    if !highlighted.is_empty() {
        println!("\n{:<18} {:<12} {:<24} SUGGESTION", "ID", "CATEGORY", "TEXT");
        println!("{}", "-".repeat(75));
        for (segment, issue) in highlighted {
            println!(
                "{:<18} {:<12} {:<24} {}",
                issue.id,
                issue.category.as_str(),
                segment.text,
                issue.replacements.first().map(String::as_str).unwrap_or("-")
            );
        }
    }

    let unplaced = set.len() - segments.iter().filter(|s| s.is_highlighted()).count();
    if unplaced > 0 {
        eprintln!("\n[{} issue(s) could not be placed in the text]", unplaced);
    }

    Ok(())
}

/// Render segments with highlighted spans as `[text]{category}`
pub fn render_markup(segments: &[TextSegment<'_>]) -> String {
    segments
        .iter()
        .map(|segment| match segment.issue {
            Some(issue) => format!("[{}]{{{}}}", segment.text, issue.category.as_str()),
            None => segment.text.to_string(),
        })
        .collect()
}

/// Rank and print mention candidates
async fn rank_mentions(
    roster_path: &Path,
    message: Option<String>,
    external: bool,
    limit: Option<usize>,
    query: Option<String>,
    json: bool,
) -> Result<()> {
    let raw = std::fs::read_to_string(roster_path)
        .with_context(|| format!("Failed to read roster file: {}", roster_path.display()))?;
    let roster: Vec<MentionCandidate> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse roster: {}", roster_path.display()))?;

    let message = match message {
        Some(message) => message,
        None if !io::stdin().is_terminal() => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            buffer.trim_end_matches('\n').to_string()
        }
        None => String::new(),
    };

    let config = config::config()?;
    let ranker = config.mention_ranker();

    let mut options = ranker.settings().rank_options();
    options.use_external_classifier |= external;
    if let Some(limit) = limit {
        options.max_results = limit;
    }
    options.query = query.or_else(|| {
        active_mention_query(&message, message.len()).map(str::to_string)
    });

    let result = ranker.rank(&roster, &message, &options).await?;

    if json {
        let out = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
        println!("{}", out);
    } else {
        print_ranked(&result);
    }

    Ok(())
}

fn print_ranked(result: &RankedResult) {
    let subjects: Vec<&str> = result.detected_subjects.iter().map(|s| s.as_str()).collect();
    let source = if result.used_external_classifier {
        "classifier"
    } else {
        "keywords"
    };
    if subjects.is_empty() {
        println!("Subjects: none");
    } else {
        println!("Subjects: {} ({})", subjects.join(", "), source);
    }

    if result.candidates.is_empty() {
        println!("No candidates");
        return;
    }

    println!("\n{:<20} {:<24} {:>6}", "ID", "NAME", "SCORE");
    println!("{}", "-".repeat(52));
    for ranked in &result.candidates {
        println!(
            "{:<20} {:<24} {:>6}",
            ranked.candidate.id, ranked.candidate.name, ranked.score
        );
    }
}

/// Show the resolved configuration
fn show_config() -> Result<()> {
    let config: &ResolvedConfig = config::config()?;

    match &config.config_file {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (none, using defaults)"),
    }
    println!();

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config")?;
    println!("{}", yaml);

    Ok(())
}
