pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod rating;
pub mod services;

use std::io;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use cli::Cli;
use colored::Colorize;
use log::info;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::domain::models::StoreCategory;
use crate::rating::{StoreId, UserId};
use crate::services::prompt::TerminalJudge;
use crate::services::ranking::{NextComparison, RankingService, RankingSnapshot};
use crate::services::server::ServerService;
use crate::services::session::{ComparisonSession, SessionEnd};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::from_env()?;
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_init_db() -> Result<()> {
    let config = AppConfig::from_env()?;
    RankingService::open_sqlite(&config)?;
    println!("{} {}", "Database ready:".green(), config.database.path);
    Ok(())
}

pub fn handle_add_item(username: &str, store: &str, category: StoreCategory, notes: Option<&str>) -> Result<()> {
    let config = AppConfig::from_env()?;
    let pool = database::create_pool(&config.database)?;
    let conn = database::get_connection(&pool)?;
    database::setup::initialize_schema(&conn)?;

    let user = database::stores::ensure_user(&conn, username)?;
    let store = database::stores::upsert_store(&conn, store, category)?;
    let item = database::stores::insert_item(&conn, user.id, store.id, notes)?;
    info!("Logged item {} for user {} at store {}", item.id, user.id, store.id);

    println!(
        "{} {} (user {}) at {} (store {}, {})",
        "Added item for".green(),
        user.username,
        user.id,
        store.name,
        store.id,
        store.store_type
    );
    Ok(())
}

pub fn handle_rankings(user_id: UserId) -> Result<()> {
    let config = AppConfig::from_env()?;
    let service = RankingService::open_sqlite(&config)?;
    let snapshot = service.rankings(user_id)?;
    print_rankings(&snapshot);
    Ok(())
}

pub fn handle_compare(user_id: UserId, winner: StoreId, loser: StoreId) -> Result<()> {
    let config = AppConfig::from_env()?;
    let service = RankingService::open_sqlite(&config)?;
    let outcome = service.compare(user_id, winner, loser)?;

    println!(
        "{} store {} -> {:.2}, store {} -> {:.2}",
        "Recorded:".green(),
        outcome.winner.store_id,
        outcome.winner.value,
        outcome.loser.store_id,
        outcome.loser.value
    );
    Ok(())
}

pub fn handle_next_pair(user_id: UserId, refine: bool) -> Result<()> {
    let config = AppConfig::from_env()?;
    let service = RankingService::open_sqlite(&config)?;

    let next = if refine {
        service.refinement_pair(user_id)?
    } else {
        service.next_comparison(user_id)?
    };

    match next {
        NextComparison::Pair(first, second) => println!(
            "{} [{}] {} vs [{}] {}",
            "Next:".bold(),
            first.id,
            first.name,
            second.id,
            second.name
        ),
        NextComparison::Complete => println!("{}", "Every store is ranked.".green()),
        NextComparison::InsufficientStores => {
            println!("{}", "At least two stores are needed to compare.".yellow())
        }
    }
    Ok(())
}

pub fn handle_session(user_id: UserId) -> Result<()> {
    let config = AppConfig::from_env()?;
    let service = RankingService::open_sqlite(&config)?;

    let stdin = io::stdin();
    let mut judge = TerminalJudge::new(stdin.lock(), io::stdout());
    let report = ComparisonSession::new(&service, config.session.clone(), user_id)
        .run(&mut judge)
        .context("Comparison session failed")?;

    let summary = match report.end {
        SessionEnd::Complete => "Ranking complete.".green(),
        SessionEnd::InsufficientStores => "At least two stores are needed to compare.".yellow(),
        SessionEnd::Abandoned => "Session stopped, progress is saved.".yellow(),
    };
    println!("\n{} ({} comparisons)", summary, report.comparisons);
    print_rankings(&report.snapshot);
    Ok(())
}

pub fn handle_completions(shell: clap_complete::Shell) -> Result<()> {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, "wardrobe_rankings", &mut io::stdout());
    Ok(())
}

fn print_rankings(snapshot: &RankingSnapshot) {
    println!(
        "{} {}/{} stores ranked",
        "Progress:".bold(),
        snapshot.progress.ranked,
        snapshot.progress.candidates
    );
    for entry in &snapshot.entries {
        println!(
            "{:>3}. {:<30} {:>8.2}  ({} comparisons)",
            entry.ranked.rank,
            entry.store.name,
            entry.ranked.rating,
            entry.ranked.comparisons
        );
    }
}
