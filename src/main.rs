mod analysis;
mod api;
mod cache;
mod config;
mod display;
mod domain;
mod error;
mod sampling;
mod service;
#[cfg(test)]
mod testing;

use analysis::draft::DraftState;
use anyhow::Context;
use api::OpenDotaClient;
use cache::ReferenceCache;
use clap::{Parser, Subcommand};
use config::Config;
use display::output::{
    display_abilities, display_draft, display_error, display_hero_pool, display_heroes,
    display_info, display_item_builds, display_items, display_matchups, display_patterns,
    display_player_search, display_recent, display_success, display_warning,
};
use domain::{AccountId, HeroId};
use error::AppError;
use indicatif::ProgressBar;
use service::InsightService;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "Dota Insight")]
#[command(about = "Analyze Dota 2 match history, builds and drafts", long_about = None)]
struct Args {
    /// OpenDota API base URL (overrides OPENDOTA_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// OpenDota API key (overrides OPENDOTA_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every hero with its roles
    Heroes,

    /// List the item catalog
    Items,

    /// Find a player's account id by Steam name
    Search {
        /// Persona name to look up
        steam_name: String,
    },

    /// Most played and most effective heroes of a player
    PlayerHeroes {
        /// Steam32 account id
        account_id: AccountId,
    },

    /// Recent matches with win rate and average KDA
    Recent {
        account_id: AccountId,

        /// Number of matches to fetch
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Strengths and weaknesses detected in recent matches
    Patterns {
        account_id: AccountId,

        /// Number of matches to analyze
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Most common skill order on a hero, from detailed matches
    Abilities {
        account_id: AccountId,
        hero_id: HeroId,
    },

    /// Best and worst opponents for a hero
    Matchups { hero_id: HeroId },

    /// Item choices on a hero, from detailed matches
    ItemBuilds {
        account_id: AccountId,
        hero_id: HeroId,
    },

    /// Rank heroes for the next pick
    Draft {
        /// Hero ids already on your team, comma separated
        #[arg(long, value_delimiter = ',')]
        allies: Vec<HeroId>,

        /// Hero ids already on the enemy team, comma separated
        #[arg(long, value_delimiter = ',')]
        enemies: Vec<HeroId>,

        /// Account id whose hero history should weigh in
        #[arg(long)]
        player: Option<AccountId>,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "dota_insight=warn".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        match e.downcast_ref::<AppError>() {
            Some(AppError::DataUnavailable(message)) => display_warning(message),
            Some(app_error) if app_error.is_provider_failure() => {
                display_error(&format!("{:#}", e));
                display_info("OpenDota did not answer; check OPENDOTA_BASE_URL or retry later");
                std::process::exit(2);
            }
            _ => {
                display_error(&format!("{:#}", e));
                std::process::exit(1);
            }
        }
    }
}

fn detail_progress() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_message("Fetching match details");
    pb
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(base_url) = args.base_url {
        config.base_url = base_url.trim_end_matches('/').to_string();
    }
    if let Some(api_key) = args.api_key {
        config.api_key = Some(api_key);
    }

    display_info(&format!("Using OpenDota API at {}", config.base_url));

    let client = OpenDotaClient::new(config);
    let cache = ReferenceCache::new();
    let service = InsightService::new(&client, &cache);

    match args.command {
        Command::Heroes => {
            display_heroes(service.heroes()?);
        }
        Command::Items => {
            display_items(service.items()?);
        }
        Command::Search { steam_name } => {
            let report = service.search_player(&steam_name)?;
            display_player_search(&report);
        }
        Command::PlayerHeroes { account_id } => {
            let pool = service.player_heroes(account_id)?;
            display_hero_pool(account_id, &pool, service.heroes()?);
        }
        Command::Recent { account_id, limit } => {
            let report = service.recent(account_id, limit)?;
            display_success(&format!("Found {} matches", report.records.len()));
            display_recent(account_id, &report, service.heroes()?);
        }
        Command::Patterns { account_id, limit } => {
            let report = service.patterns(account_id, limit)?;
            display_success(&format!("Analyzed {} matches", report.baseline.games));
            display_patterns(account_id, &report);
        }
        Command::Abilities {
            account_id,
            hero_id,
        } => {
            let report = service
                .ability_builds(account_id, hero_id, &detail_progress())
                .with_context(|| format!("Ability analysis for hero {} failed", hero_id))?;
            display_abilities(&report, service.heroes()?);
        }
        Command::Matchups { hero_id } => {
            let ranking = service.matchups(hero_id)?;
            display_matchups(hero_id, &ranking, service.heroes()?);
        }
        Command::ItemBuilds {
            account_id,
            hero_id,
        } => {
            let report = service
                .item_builds(account_id, hero_id, &detail_progress())
                .with_context(|| format!("Item analysis for hero {} failed", hero_id))?;
            display_item_builds(&report, service.heroes()?);
        }
        Command::Draft {
            allies,
            enemies,
            player,
        } => {
            let draft = DraftState {
                ally_heroes: allies,
                enemy_heroes: enemies,
            };
            let report = service.draft(draft, player)?;
            display_draft(&report, service.heroes()?);
        }
    }

    Ok(())
}
