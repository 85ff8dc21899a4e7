use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use room_alerts::models::{format_price, SearchCriteria};
use room_alerts::sources::{HttpListingSource, JsonFileSource, ListingSource};
use room_alerts::{Config, NotificationEngine};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "room-alerts", about = "Saved-search alerts for room listings")]
struct Cli {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// State file, overrides storage.path from the config
    #[arg(short, long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch listings and run every check
    Check {
        /// Listings JSON file; falls back to source.url from the config
        #[arg(short, long)]
        listings: Option<PathBuf>,
        /// Favorited listing id, repeatable
        #[arg(short, long = "favorite")]
        favorites: Vec<String>,
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Save a search
    SaveSearch {
        location: String,
        #[arg(long)]
        min: Option<i64>,
        #[arg(long)]
        max: Option<i64>,
        /// Required amenity, repeatable
        #[arg(short, long = "amenity")]
        amenities: Vec<String>,
    },
    /// List saved searches
    Searches,
    /// Delete a saved search
    DeleteSearch { id: String },
    /// Follow an area for saved-area alerts
    Subscribe { area: String },
    /// Show the notification inbox
    Inbox,
    /// Mark a notification read, or all of them
    Read { id: Option<String> },
    /// Empty the inbox
    Clear,
    /// Record a listing view and print the viewer count
    View {
        listing: String,
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Add a listing to the compare list
    Compare { listing: String },
    /// Record a landlord contact click and print the badge
    Contact { landlord: String },
    /// Print the response-time badge for a landlord
    Badge { landlord: String },
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(store) = &cli.store {
        config.storage.path = Some(store.clone());
    }
    if config.storage.path.is_none() {
        config.storage.path = Some(PathBuf::from("room_alerts_state.json"));
    }
    Ok(config)
}

fn listing_source(config: &Config, listings: Option<PathBuf>) -> Result<Box<dyn ListingSource>> {
    if let Some(path) = listings {
        return Ok(Box::new(JsonFileSource::new(path)));
    }
    match &config.source.url {
        Some(url) => Ok(Box::new(HttpListingSource::new(
            url.clone(),
            Duration::from_secs(config.source.timeout_secs),
        )?)),
        None => bail!("No listings file given and no source.url configured"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let engine = NotificationEngine::from_config(&config);

    match cli.command {
        Command::Check {
            listings,
            favorites,
            user,
        } => {
            let source = listing_source(&config, listings)?;
            info!("Fetching listings from {} source", source.source_name());
            let listings = source.fetch().await?;

            let stored = engine.run_checks(&listings, &favorites, user.as_deref());
            info!("✅ {} new notification(s)", stored.len());
            for n in &stored {
                println!("[{:?}] {}", n.notification_type, n.title);
                println!("   {}", n.body);
            }
        }
        Command::SaveSearch {
            location,
            min,
            max,
            amenities,
        } => {
            let criteria = SearchCriteria {
                location,
                price_min: min,
                price_max: max,
                amenities: amenities.into_iter().collect(),
                ..Default::default()
            };
            match engine.searches.save_search(criteria) {
                Some(search) => println!("Saved search {}", search.id),
                None => bail!("Could not save search, storage rejected the write"),
            }
        }
        Command::Searches => {
            for search in engine.searches.get_saved_searches() {
                let (min, max) = search.criteria.price_bounds();
                let max = if max == i64::MAX {
                    "any".to_string()
                } else {
                    format_price(max)
                };
                println!("{}  '{}'  {} - {}", search.id, search.criteria.location, format_price(min), max);
                if !search.criteria.amenities.is_empty() {
                    let amenities: Vec<_> = search.criteria.amenities.iter().cloned().collect();
                    println!("   Amenities: {}", amenities.join(", "));
                }
            }
        }
        Command::DeleteSearch { id } => engine.searches.delete_saved_search(&id),
        Command::Subscribe { area } => match engine.areas.subscribe_to_area(&area) {
            Some(sub) => println!("Following {} ({})", sub.area, sub.id),
            None => bail!("Could not subscribe to '{}'", area),
        },
        Command::Inbox => {
            let notifications = engine.inbox.get_notifications();
            println!("{} unread", engine.inbox.unread_count());
            for n in notifications {
                let marker = if n.read { " " } else { "*" };
                println!("{} {} {} {}", marker, n.timestamp.format("%Y-%m-%d %H:%M"), n.id, n.title);
                println!("   {}", n.body);
            }
        }
        Command::Read { id } => match id {
            Some(id) => engine.inbox.mark_notification_read(&id),
            None => engine.inbox.mark_all_read(),
        },
        Command::Clear => engine.inbox.clear_notifications(),
        Command::View { listing, user } => {
            let count = engine.engagement.track_listing_view(&listing, user.as_deref());
            println!("{} people viewed {}", count, listing);
        }
        Command::Compare { listing } => {
            let result = engine.engagement.add_to_compare(&listing);
            println!("{}", result.message);
            println!("Comparing: {}", engine.engagement.get_compare_list().join(", "));
        }
        Command::Contact { landlord } => {
            engine.responses.track_landlord_contact_click(&landlord);
            if let Some(badge) = engine.responses.get_response_time_badge(&landlord) {
                println!("{} ({})", badge.text, badge.color);
            }
        }
        Command::Badge { landlord } => match engine.responses.get_response_time_badge(&landlord) {
            Some(badge) => println!("{} ({})", badge.text, badge.color),
            None => println!("No response data for {}", landlord),
        },
    }

    Ok(())
}
