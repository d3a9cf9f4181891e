//! Command-line interface parsing for quicknav
//!
//! This module handles parsing of CLI arguments using clap: the `links`
//! command for navigation sections, the `deals` command for the remote
//! collection, and the `tags`/`saved` commands for the local collection.

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Quicknav - curated navigation links and Black Week deal tracking
#[derive(Parser, Debug)]
#[command(name = "quicknav")]
#[command(about = "Curated navigation links and Black Week deal tracking")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show navigation links for a section
    Links {
        /// Section to show; defaults to the first section in the document
        section: Option<String>,

        /// URL of the navigation JSON document
        #[arg(long)]
        url: String,
    },

    /// Show ranked deals from the remote source
    ///
    /// Served from the local cache while it is fresh; requires
    /// QUICKNAV_DEALS_URL and QUICKNAV_DEALS_KEY to be set for a fetch.
    Deals {
        /// Bypass the local cache and fetch fresh data
        #[arg(long)]
        refresh: bool,

        /// Drop the cached snapshot instead of fetching
        #[arg(long, conflicts_with = "refresh")]
        clear_cache: bool,
    },

    /// Manage tags for saved deals
    #[command(subcommand)]
    Tags(TagsCommand),

    /// Manage locally saved deals
    #[command(subcommand)]
    Saved(SavedCommand),
}

#[derive(Subcommand, Debug)]
pub enum TagsCommand {
    /// Create a new tag
    Add {
        /// Tag name; must be unique (case-insensitive)
        name: String,
    },
    /// Remove a tag by id
    Remove {
        id: Uuid,
    },
    /// List all tags
    List,
    /// Remove all tags
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum SavedCommand {
    /// Save a new deal
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        url: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        price: Option<String>,

        #[arg(long)]
        original_price: Option<String>,

        #[arg(long)]
        discount: Option<String>,

        /// Tag name to attach; repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Remove a saved deal by id
    Remove {
        id: Uuid,
    },
    /// List saved deals, newest first
    List,
    /// Remove all saved deals
    Clear,
}
