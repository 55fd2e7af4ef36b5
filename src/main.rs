use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use oddsline::{catalog, migration, OddsApiClient, OddsConfig, OddsQuery, Result};

#[derive(Parser)]
#[command(name = "oddsline", about = "Sports odds aggregation client")]
struct Cli {
    /// API key for the odds provider (overrides config)
    #[arg(long, env = "ODDSLINE_API_KEY")]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available sports
    Sports {
        /// Include out-of-season sports
        #[arg(long)]
        all: bool,
    },
    /// Fetch featured odds for a sport
    Odds {
        /// Sport key, e.g. basketball_nba
        sport: String,
        /// Market keys (legacy aliases accepted)
        #[arg(long, value_delimiter = ',', default_value = "h2h")]
        markets: Vec<String>,
        /// Region keys
        #[arg(long, value_delimiter = ',', default_value = "us")]
        regions: Vec<String>,
    },
    /// Fetch live and recent scores for a sport
    Scores {
        sport: String,
        /// Include finished games from the last N days (1-3)
        #[arg(long)]
        days_from: Option<u32>,
    },
    /// List upcoming events for a sport
    Events { sport: String },
    /// List participants for a sport
    Participants { sport: String },
    /// Report how a batch of legacy keys maps onto canonical keys
    Migrate {
        keys: Vec<String>,
        /// Treat the keys as bookmaker keys instead of market keys
        #[arg(long)]
        bookmakers: bool,
    },
    /// Show the embedded market catalog
    Catalog,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,oddsline=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn load_config(api_key: Option<String>) -> Result<OddsConfig> {
    let mut config = OddsConfig::load().unwrap_or_else(|_| OddsConfig::with_api_key(""));
    if let Some(key) = api_key {
        config.api_key = key;
    }
    config
        .validate()
        .map_err(|errors| oddsline::OddsLineError::Validation(errors.join("; ")))?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    // Catalog and migration commands work without a provider key
    match &cli.command {
        Command::Migrate { keys, bookmakers } => {
            let report = if *bookmakers {
                migration::bookmaker_migration_report(keys)
            } else {
                migration::market_migration_report(keys)
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }
        Command::Catalog => {
            print_catalog();
            return Ok(());
        }
        _ => {}
    }

    let config = load_config(cli.api_key)?;
    let client = OddsApiClient::new(config)?;

    match cli.command {
        Command::Sports { all } => {
            let result = client.get_sports(all).await?;
            for sport in &result.data {
                println!("{:<28} {} ({})", sport.key, sport.title, sport.group);
            }
            debug!(remaining = result.quota.requests_remaining, "quota");
        }
        Command::Odds {
            sport,
            markets,
            regions,
        } => {
            let query = OddsQuery {
                regions,
                markets,
                ..Default::default()
            };
            let result = client.get_odds(&sport, &query).await?;
            for event in &result.data {
                println!(
                    "{} @ {}  [{}]  books: {}",
                    event.away_team,
                    event.home_team,
                    event.commence_time,
                    event.bookmakers.len()
                );
            }
            println!(
                "cost={} cached={} quota_remaining={}",
                result.cost, result.cached, result.quota.requests_remaining
            );
        }
        Command::Scores { sport, days_from } => {
            let result = client.get_scores(&sport, days_from).await?;
            for event in &result.data {
                let score = event
                    .scores
                    .as_ref()
                    .map(|scores| {
                        scores
                            .iter()
                            .map(|s| format!("{} {}", s.name, s.score))
                            .collect::<Vec<_>>()
                            .join(" - ")
                    })
                    .unwrap_or_else(|| "no score yet".to_string());
                println!(
                    "{} @ {}: {}{}",
                    event.away_team,
                    event.home_team,
                    score,
                    if event.completed { " (final)" } else { "" }
                );
            }
        }
        Command::Events { sport } => {
            let result = client.get_events(&sport).await?;
            for event in &result.data {
                println!("{}  {} @ {}", event.id, event.away_team, event.home_team);
            }
        }
        Command::Participants { sport } => {
            let result = client.get_participants(&sport).await?;
            for participant in &result.data {
                println!("{}", participant.full_name);
            }
        }
        Command::Migrate { .. } | Command::Catalog => unreachable!(),
    }

    Ok(())
}

fn print_catalog() {
    println!("Featured markets (bulk odds endpoint):");
    for market in catalog::featured_markets() {
        println!("  {:<24} {}", market.market_key, market.market_name);
    }
    println!("\nPlayer props (event odds endpoint, 10x cost):");
    for market in catalog::player_prop_markets() {
        println!(
            "  {:<32} {:<18} {}",
            market.market_key, market.sport_group, market.market_name
        );
    }
    println!("\nGame periods (event odds endpoint, 10x cost):");
    for market in catalog::game_period_markets() {
        println!(
            "  {:<32} {:<18} {}",
            market.market_key, market.sport_group, market.market_name
        );
    }
    println!("\nRegions:");
    for region in catalog::regions() {
        println!("  {:<6} {}", region.key, region.description);
    }
}
