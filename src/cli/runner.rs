//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, FilterArgs, OutputFormat};
use crate::config::FeedConfig;
use crate::controller::FeedController;
use crate::error::{Error, Result};
use crate::fetcher::{HttpListingFetcher, ListingFetcher};
use crate::pagination::Phase;
use crate::types::{FilterParams, Listing, PageToken};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch { cursor, filters } => self.fetch(cursor, filters).await,
            Commands::Browse { pages, filters } => self.browse(*pages, filters).await,
            Commands::Config => self.show_config(),
        }
    }

    /// Build the effective configuration from the file and flags
    pub fn load_config(&self) -> Result<FeedConfig> {
        let mut config = match (&self.cli.config, &self.cli.endpoint) {
            (Some(path), _) => FeedConfig::from_file(path)?,
            (None, Some(endpoint)) => FeedConfig::new(endpoint.clone()),
            (None, None) => {
                return Err(Error::config(
                    "No feed configured (use --config or --endpoint)",
                ))
            }
        };

        if let Some(endpoint) = &self.cli.endpoint {
            config.endpoint.clone_from(endpoint);
        }
        if let Some(token) = &self.cli.token {
            config.token.clone_from(token);
        }
        let config = config.with_env_token();

        config.validate()?;
        if config.token.is_empty() {
            warn!("No token configured; the endpoint may reject requests");
        }
        Ok(config)
    }

    /// Fetch one page
    async fn fetch(&self, cursor: &str, args: &FilterArgs) -> Result<()> {
        let config = self.load_config()?;
        let filters = apply_filter_args(config.filters.clone(), args);
        let fetcher = HttpListingFetcher::new(&config)?;

        let page = fetcher.fetch(&PageToken::from(cursor), &filters).await?;
        for listing in &page.listings {
            self.output_listing(listing);
        }

        info!(
            "Fetched {} listings, next cursor '{}'",
            page.len(),
            page.min_id().map(PageToken::from_id).unwrap_or_default()
        );
        Ok(())
    }

    /// Drive the controller until exhausted or the page limit is reached
    async fn browse(&self, max_pages: usize, args: &FilterArgs) -> Result<()> {
        let config = self.load_config()?;
        let filters = apply_filter_args(config.filters.clone(), args);
        let fetcher = Arc::new(HttpListingFetcher::new(&config)?);
        info!("Browsing {}", fetcher.endpoint());

        let started = Instant::now();
        let (mut handle, task) = FeedController::spawn(fetcher, filters);

        let mut printed = 0;
        let mut pages = 0;
        handle.load_initial();

        let outcome = loop {
            let view = handle.wait_until_settled().await;
            pages += 1;

            for listing in view.listings.iter().skip(printed) {
                self.output_listing(listing);
            }
            printed = view.listings.len();

            if view.phase == Phase::Error {
                break Err(Error::Other(
                    view.error
                        .unwrap_or_else(|| "Feed stopped with an error".to_string()),
                ));
            }
            if view.exhausted {
                info!("Feed exhausted");
                break Ok(());
            }
            if max_pages > 0 && pages >= max_pages {
                info!("Stopping after {pages} pages");
                break Ok(());
            }
            if !handle.is_running() {
                break Err(Error::Other("Feed controller stopped".to_string()));
            }

            handle.load_more();
        };

        handle.shutdown();
        if let Err(e) = task.await {
            warn!("Feed controller task failed: {e}");
        }

        info!(
            "Loaded {printed} listings in {pages} pages ({:.2}s)",
            started.elapsed().as_secs_f64()
        );
        outcome
    }

    /// Print the effective configuration with the token masked
    fn show_config(&self) -> Result<()> {
        let config = self.load_config()?;
        let mut value = serde_json::to_value(&config)?;
        if let Some(obj) = value.as_object_mut() {
            obj.insert("token".to_string(), Value::String(config.masked_token()));
        }
        self.output_value(&value);
        Ok(())
    }

    /// Output a listing
    fn output_listing(&self, listing: &Listing) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(listing).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!(
                    "{:>10}  {:<20} {:<40} {} {}",
                    listing.id,
                    listing.brand.as_deref().unwrap_or("-"),
                    listing.display_name.as_deref().unwrap_or("Listing"),
                    listing.currency.as_deref().unwrap_or(""),
                    listing.price_label()
                );
            }
        }
    }

    /// Output a JSON value
    fn output_value(&self, value: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(value).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
            }
        }
    }
}

/// Layer command-line filter overrides on top of configured filters
fn apply_filter_args(mut filters: FilterParams, args: &FilterArgs) -> FilterParams {
    if !args.categories.is_empty() {
        filters.categories.clone_from(&args.categories);
    }
    if let Some(search) = &args.search {
        filters.search.clone_from(search);
    }
    if let Some(sort) = &args.sort {
        filters.sort.clone_from(sort);
    }
    if let Some(min) = &args.min {
        filters.min.clone_from(min);
    }
    if let Some(max) = &args.max {
        filters.max.clone_from(max);
    }
    filters
}
