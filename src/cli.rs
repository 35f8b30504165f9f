use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Extensible CLI for debugging and development
#[derive(Parser)]
#[command(name = "collage")]
#[command(about = "A CLI tool for inspecting the content dashboard core", long_about = None)]
pub struct Cli {
    /// Database URL for the preferences store (defaults to a local SQLite file)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Path to a collage.toml config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch one section and print its items
    Fetch {
        /// Section to fetch: news, social, music or trending
        section: String,
        /// Page number (news and music only)
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Search news and music
    Search {
        /// Query to search for
        query: String,
    },
    /// Fetch all sections and print a summary
    Sections,
    /// Fetch, then move an item between sections (drag-and-drop dry run)
    Move {
        /// Id of the item to move
        item_id: String,
        /// Source section name
        from: String,
        /// Destination section name
        to: String,
    },
    /// Show persisted preferences, optionally updating them first
    Prefs {
        #[arg(long)]
        dark_mode: Option<bool>,
        #[arg(long)]
        auto_refresh: Option<bool>,
        /// Add an item id to the favorites list
        #[arg(long)]
        favorite: Option<String>,
        /// Remove an item id from the favorites list
        #[arg(long)]
        unfavorite: Option<String>,
    },
}
