//! Quicknav - curated navigation links and Black Week deal tracking
//!
//! A command-line front end over the store layer: it wires each store up
//! with its remote source and cache, runs one action, and prints the
//! resulting state.

use std::error::Error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use quicknav::cache::CacheManager;
use quicknav::cli::{Cli, Command, SavedCommand, TagsCommand};
use quicknav::data::{DealsClient, NavigationClient, NewSavedDeal};
use quicknav::store::{DealsStore, NavigationStore, SavedDealsStore, DEALS_CACHE_KEY};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Links { section, url } => run_links(section, url).await,
        Command::Deals {
            refresh,
            clear_cache,
        } => run_deals(refresh, clear_cache).await,
        Command::Tags(command) => run_tags(command),
        Command::Saved(command) => run_saved(command),
    }
}

/// Returns the cache manager, or None (with a warning) on odd platforms
fn open_cache() -> Option<CacheManager> {
    let cache = CacheManager::new();
    if cache.is_none() {
        tracing::warn!("no cache directory available; nothing will be persisted");
    }
    cache
}

async fn run_links(section: Option<String>, url: String) -> Result<(), Box<dyn Error>> {
    let mut store = NavigationStore::new(NavigationClient::new(url));

    store.load_navigation().await;
    if let Some(error) = store.error() {
        return Err(error.into());
    }

    // The CLI section argument plays the role of the route parameter
    if let Some(section) = &section {
        store.set_current_section(section);
        if store.current_section() != section.as_str() {
            eprintln!("Unknown section '{}', showing '{}'", section, store.current_section());
        }
    }

    println!("[{}]", store.current_section());
    for link in store.current_links() {
        println!("  {}  {}", link.label, link.url);
    }
    if store.current_links().is_empty() {
        println!("  (no links in this section)");
    }

    let others: Vec<&str> = store
        .sections()
        .into_iter()
        .filter(|name| *name != store.current_section())
        .collect();
    if !others.is_empty() {
        println!();
        println!("Other sections: {}", others.join(", "));
    }

    Ok(())
}

async fn run_deals(refresh: bool, clear_cache: bool) -> Result<(), Box<dyn Error>> {
    let cache = open_cache();

    if clear_cache {
        if let Some(cache) = &cache {
            cache.clear(DEALS_CACHE_KEY);
        }
        println!("Deal cache cleared.");
        return Ok(());
    }

    let client = DealsClient::from_env()?;
    let mut store = DealsStore::new(client, cache);

    store.fetch_deals(refresh).await;

    if let Some(error) = store.error() {
        // A stale snapshot may still be worth printing
        if store.deal_count() == 0 {
            return Err(error.into());
        }
        eprintln!("{} (showing cached deals)", error);
    }

    if let Some(fetched) = store.last_fetched() {
        println!("Last fetched: {}", fetched.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    println!("{} deals", store.deal_count());
    for deal in store.sorted_deals() {
        print_deal(deal);
    }

    Ok(())
}

fn print_deal(deal: &quicknav::data::Deal) {
    let title = deal.title.as_deref().unwrap_or("(untitled)");
    let temperature = deal.temperature.unwrap_or(0.0);
    print!(
        "  [{:>4}] {:<5} {}",
        temperature.round() as i64,
        deal.temperature_level().label(),
        title
    );
    if let Some(price) = deal.price {
        print!("  {:.2}", price);
    }
    println!();
    if let Some(url) = deal.detail_page_url.as_deref().or(deal.referral_link.as_deref()) {
        println!("         {}", url);
    }
}

fn run_tags(command: TagsCommand) -> Result<(), Box<dyn Error>> {
    let mut store = SavedDealsStore::new(open_cache());
    store.load();
    if let Some(error) = store.error() {
        return Err(error.into());
    }

    match command {
        TagsCommand::Add { name } => {
            let id = store.add_tag(&name)?;
            println!("Added tag {} ({})", name.trim(), id);
        }
        TagsCommand::Remove { id } => {
            store.remove_tag(id);
            println!("Removed tag {}", id);
        }
        TagsCommand::List => {
            for tag in store.tags() {
                println!("{}  {}", tag.id, tag.name);
            }
            if store.tags().is_empty() {
                println!("(no tags)");
            }
        }
        TagsCommand::Clear => {
            store.clear_tags();
            println!("All tags removed.");
        }
    }

    Ok(())
}

fn run_saved(command: SavedCommand) -> Result<(), Box<dyn Error>> {
    let mut store = SavedDealsStore::new(open_cache());
    store.load();
    if let Some(error) = store.error() {
        return Err(error.into());
    }

    match command {
        SavedCommand::Add {
            title,
            url,
            description,
            price,
            original_price,
            discount,
            tags,
        } => {
            let id = store.add_deal(NewSavedDeal {
                title,
                description,
                price,
                original_price,
                discount,
                url,
                tags,
            });
            println!("Saved deal {}", id);
        }
        SavedCommand::Remove { id } => {
            store.remove_deal(id);
            println!("Removed deal {}", id);
        }
        SavedCommand::List => {
            for deal in store.deals() {
                let price = deal.price.as_deref().unwrap_or("-");
                println!("{}  {}  {}", deal.id, price, deal.title);
                if !deal.tags.is_empty() {
                    println!("    tags: {}", deal.tags.join(", "));
                }
            }
            if store.deals().is_empty() {
                println!("(no saved deals)");
            }
        }
        SavedCommand::Clear => {
            store.clear_deals();
            println!("All saved deals removed.");
        }
    }

    Ok(())
}
