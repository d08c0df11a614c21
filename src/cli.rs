use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::domain::models::StoreCategory;
use crate::rating::{StoreId, UserId};

#[derive(Parser, Debug)]
#[command(author, version, about = "wardrobe store ranking engine")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Create the database schema if it does not exist
    InitDb,
    /// Log an item for a user at a store, creating both if needed
    AddItem {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        store: String,
        #[arg(short, long, value_parser = parse_category)]
        category: StoreCategory,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Print a user's current store ranking
    Rankings {
        #[arg(short, long)]
        user: UserId,
    },
    /// Record that one store is preferred over another
    Compare {
        #[arg(short, long)]
        user: UserId,
        #[arg(short, long)]
        winner: StoreId,
        #[arg(short, long)]
        loser: StoreId,
    },
    /// Show the next pair of stores to compare
    NextPair {
        #[arg(short, long)]
        user: UserId,
        /// Keep suggesting pairs after every store is ranked
        #[arg(short, long)]
        refine: bool,
    },
    /// Compare stores interactively until every store is ranked
    Session {
        #[arg(short, long)]
        user: UserId,
    },
    /// Print shell completions
    Completions {
        shell: Shell,
    },
}

fn parse_category(raw: &str) -> Result<StoreCategory, String> {
    raw.parse().map_err(|e: anyhow::Error| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compare() {
        let cli = Cli::try_parse_from(["wardrobe_rankings", "compare", "-u", "1", "-w", "4", "-l", "9"]).unwrap();
        assert_eq!(cli.command, Command::Compare { user: 1, winner: 4, loser: 9 });
    }

    #[test]
    fn test_parse_add_item_category() {
        let cli = Cli::try_parse_from([
            "wardrobe_rankings", "add-item", "--username", "alice", "--store", "Oxfam", "--category", "thrift",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::AddItem { category: StoreCategory::Thrift, .. }));
    }

    #[test]
    fn test_rejects_unknown_category() {
        let result = Cli::try_parse_from([
            "wardrobe_rankings", "add-item", "-u", "alice", "-s", "Oxfam", "-c", "outlet",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_next_pair_refine() {
        let cli = Cli::try_parse_from(["wardrobe_rankings", "next-pair", "-u", "3"]).unwrap();
        assert_eq!(cli.command, Command::NextPair { user: 3, refine: false });

        let cli = Cli::try_parse_from(["wardrobe_rankings", "next-pair", "-u", "3", "--refine"]).unwrap();
        assert_eq!(cli.command, Command::NextPair { user: 3, refine: true });
    }

    #[test]
    fn test_serve_default_port() {
        let cli = Cli::try_parse_from(["wardrobe_rankings", "serve"]).unwrap();
        assert_eq!(cli.command, Command::Serve { port: 3000 });
    }
}
