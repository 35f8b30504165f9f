mod cli;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use collage::config::Config;
use collage::prelude::*;
use collage::repository::Mutation;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let app = Collage::connect(config, cli.database_url.as_deref(), true).await?;

    match cli.command {
        Commands::Fetch { section, page } => {
            match section.as_str() {
                "news" => app.fetch_news(page).await?,
                "social" => app.fetch_social("technology").await?,
                "music" => app.fetch_music(page).await?,
                "trending" => app.fetch_trending().await?,
                other => return Err(anyhow!("unknown section: {other}")),
            }
            for id in Zone::parse(&section)
                .map(|z| z.sections())
                .unwrap_or_default()
            {
                print_section(&app, *id);
            }
        }
        Commands::Search { query } => {
            app.search(&query).await?;
            print_section(&app, SectionId::Search);
        }
        Commands::Sections => {
            app.fetch_news(1).await?;
            app.fetch_social("technology").await?;
            app.fetch_music(1).await?;
            app.fetch_trending().await?;
            for id in collage::repository::SCAN_ORDER {
                let section = app.section(id);
                println!(
                    "{:<14} {:>3} items  has_more={} {}",
                    id.as_str(),
                    section.items.len(),
                    section.has_more,
                    section.error.as_deref().unwrap_or("")
                );
            }
        }
        Commands::Move { item_id, from, to } => {
            let from = SectionId::parse(&from).ok_or_else(|| anyhow!("unknown section: {from}"))?;
            let to = SectionId::parse(&to).ok_or_else(|| anyhow!("unknown section: {to}"))?;
            app.fetch_news(1).await?;
            app.fetch_social("technology").await?;
            app.fetch_music(1).await?;
            match app.move_between(&item_id, from, to) {
                Mutation::Moved => println!("moved {item_id}: {} -> {}", from.as_str(), to.as_str()),
                _ => println!("no-op: {item_id} not found in {}", from.as_str()),
            }
            print_section(&app, to);
        }
        Commands::Prefs {
            dark_mode,
            auto_refresh,
            favorite,
            unfavorite,
        } => {
            let mut prefs = app.preferences();
            if let Some(v) = dark_mode {
                prefs.dark_mode = v;
            }
            if let Some(v) = auto_refresh {
                prefs.auto_refresh = v;
            }
            if let Some(id) = favorite {
                prefs.add_favorite(id);
            }
            if let Some(id) = unfavorite {
                prefs.remove_favorite(&id);
            }
            app.set_preferences(prefs.clone()).await?;
            println!("{}", serde_json::to_string_pretty(&prefs)?);
        }
    }

    Ok(())
}

fn print_section(app: &Collage, id: SectionId) {
    let section = app.section(id);
    println!("== {} ({} items) ==", id.as_str(), section.items.len());
    if let Some(err) = &section.error {
        println!("   error: {err}");
    }
    for item in &section.items {
        println!("  [{:>6}] {}  ({})", item.variant().as_str(), item.display_title(), item.id());
    }
}
