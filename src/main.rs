use anyhow::Result;

use wardrobe_rankings::cli::Command;
use wardrobe_rankings::{
    handle_add_item, handle_compare, handle_completions, handle_init_db, handle_next_pair,
    handle_rankings, handle_serve, handle_session, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::InitDb => handle_init_db(),
        Command::AddItem {
            username,
            store,
            category,
            notes,
        } => handle_add_item(username, store, *category, notes.as_deref()),
        Command::Rankings { user } => handle_rankings(*user),
        Command::Compare { user, winner, loser } => handle_compare(*user, *winner, *loser),
        Command::NextPair { user, refine } => handle_next_pair(*user, *refine),
        Command::Session { user } => handle_session(*user),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
