//! find-reviewer: rank roster reviewers for a submission.
//!
//! 1. Load the roster (cached export, refetched when older than the TTL)
//! 2. Score reviewers against the requested topics and languages
//! 3. Rank, then optionally look up each shortlisted reviewer's GitHub profile
//! 4. Print to stdout (text or JSON); logs go to stderr

use anyhow::{Context, Result};
use clap::Parser;
use enrich::{GithubProfiles, ProfileLookup};
use rand::rngs::StdRng;
use rand::SeedableRng;
use render::{render_json, Entry, TextRenderer};
use reviewer_roster::{HttpSnapshotFetcher, RosterSource, SnapshotCache};
use reviewer_scoring::{relative_scores, ReviewQuery, ScoringEngine, Shortlister};
use std::path::PathBuf;

mod config;
mod enrich;
mod render;

use config::FinderConfig;

/// Find me some reviewers!
///
/// Matches topic keywords against each reviewer's stated domains and,
/// optionally, programming languages against their preferred/other
/// languages. Busy reviewers are penalized by their active review count.
///
/// Examples:
///   find-reviewer astronomy "time series"
///   find-reviewer parsing -l Rust -l C -n 5
///   find-reviewer "machine learning" -l Python --json --no-github
#[derive(Parser, Debug)]
#[command(name = "find-reviewer")]
#[command(version)]
#[command(about, long_about = None)]
struct Cli {
    /// Keywords to compare against reviewers' topic areas
    #[arg(required = true, value_name = "KEYWORDS")]
    keywords: Vec<String>,

    /// The needed programming languages (repeatable)
    #[arg(short = 'l', long = "language", value_name = "LANGUAGE")]
    languages: Vec<String>,

    /// The number of reviewers to suggest
    #[arg(short = 'n', long = "num", default_value_t = 10, allow_negative_numbers = true)]
    num: i64,

    /// Don't list info from the GitHub API
    #[arg(long)]
    no_github: bool,

    /// Refetch the roster even if the cache is fresh
    #[arg(long)]
    refresh: bool,

    /// Seed for the tiebreak draws (reproducible ordering of equal scores)
    #[arg(long)]
    seed: Option<u64>,

    /// Print results as JSON (implies --quiet)
    #[arg(long)]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Configuration file (overrides REVIEWER_FINDER_CONFIG)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Roster cache file
    #[arg(long, value_name = "PATH")]
    cache_file: Option<PathBuf>,

    /// Roster CSV export URL
    #[arg(long, value_name = "URL")]
    roster_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut FinderConfig) {
        if let Some(path) = &self.cache_file {
            config.roster.cache_file = path.clone();
        }
        if let Some(url) = &self.roster_url {
            config.roster.url = url.clone();
        }
        if self.no_github {
            config.enrichment.enabled = false;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let mut config = FinderConfig::load(cli.config.as_deref())?;
    config.apply_env()?;
    cli.apply_overrides(&mut config);

    let query = ReviewQuery::new(&cli.keywords, &cli.languages).context("Invalid query")?;
    let engine =
        ScoringEngine::new(config.scoring.clone()).context("Invalid [scoring] configuration")?;

    let fetcher = HttpSnapshotFetcher::new(&config.roster.url, config.roster.timeout())?;
    let cache = SnapshotCache::new(&config.roster.cache_file, config.roster.max_age());
    let roster = RosterSource::new(fetcher, cache)
        .load(cli.refresh)
        .await
        .context("Failed to load reviewer roster")?;

    let count = usize::try_from(cli.num).unwrap_or(0);
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let ranked = Shortlister::new(engine).shortlist(&roster, &query, count, &mut rng)?;

    if count == 0 {
        log::debug!("Shortlist size {} leaves nothing to show", cli.num);
    } else if ranked.is_empty() {
        log::warn!(
            "No matching reviewers among {} for {:?}",
            roster.len(),
            query.keywords()
        );
    }

    let lookup = if config.enrichment.enabled {
        GithubProfiles::from_config(&config.enrichment)
    } else {
        None
    };

    let relative = relative_scores(&ranked);
    let mut entries = Vec::with_capacity(ranked.len());
    for (reviewer, relative_score) in ranked.iter().zip(relative) {
        let profile = match &lookup {
            Some(lookup) => lookup.lookup(&reviewer.record.username).await,
            None => None,
        };
        entries.push(Entry {
            reviewer,
            relative_score,
            profile,
        });
    }

    if cli.json {
        println!("{}", render_json(&entries)?);
    } else {
        let colors = !cli.no_color && console::colors_enabled();
        print!("{}", TextRenderer::new(colors).render(&entries));
    }
    Ok(())
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet || cli.json {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    if !cli.verbose {
        builder.filter_module("reqwest", log::LevelFilter::Warn);
        builder.filter_module("hyper", log::LevelFilter::Warn);
    }
    builder.target(env_logger::Target::Stderr).init();
}
