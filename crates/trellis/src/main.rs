mod app;
mod config;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use trellis_runtime::{MemoryStore, NavigationOutcome, Store};
use trellis_ssr::{
    load_manifest, load_template, render_page, render_route, sanitize_error, ClientManifest,
    PageTemplate, ServerRender,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    app::{render_app_html, shop},
    config::Config,
};

/// Trellis - route-scoped store modules and data fetching for SSR apps
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Server-render a URL of the demo shop and print the page
    Render {
        /// URL to render, e.g. /product/1?tab=reviews
        url: String,
    },
    /// Render the first URL, hydrate a client on it, then navigate through the rest
    Navigate {
        /// URLs to visit in order
        #[arg(required = true)]
        urls: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trellis=debug,trellis_runtime=debug,trellis_ssr=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    tracing::debug!(?config, "Loaded configuration");

    match cli.command {
        Command::Render { url } => render(&config, &url).await,
        Command::Navigate { urls } => navigate(&config, &urls).await,
    }
}

async fn render(config: &Config, url: &str) -> Result<()> {
    let options = config.ssr_options()?;
    let manifest = match &config.manifest_path {
        Some(path) => load_manifest(path)?,
        None => ClientManifest::default(),
    };
    let template = match &config.template_path {
        Some(path) => load_template(path)?,
        None => PageTemplate::default(),
    };

    let rendered = match render_route(shop(config), url, &options).await {
        Ok(ServerRender::Rendered(rendered)) => rendered,
        Ok(ServerRender::Redirect(target)) => {
            println!("Redirect: {target}");
            return Ok(());
        }
        Err(e) => {
            tracing::error!(error = %e, url, "Render failed");
            bail!(sanitize_error(&e));
        }
    };

    let html = render_page(
        &rendered,
        &render_app_html(&rendered),
        &manifest,
        &template,
        &options,
    );
    println!("{html}");
    Ok(())
}

async fn navigate(config: &Config, urls: &[String]) -> Result<()> {
    let Some((first, rest)) = urls.split_first() else {
        bail!("at least one URL is required");
    };

    let options = config.ssr_options()?;
    let payload = match render_route(shop(config), first, &options).await? {
        ServerRender::Rendered(rendered) => rendered
            .payload()
            .context("server render produced no payload")?,
        ServerRender::Redirect(target) => bail!("{first} redirects to {target}"),
    };

    let store = Arc::new(MemoryStore::default());
    let client = shop(config).store(store.clone()).build()?;
    let route = client.hydrate(&payload, first).await?;
    report(&route.full_path(), &store, &client.lifecycle().pending_removals());

    for url in rest {
        match client.router().push(url).await? {
            NavigationOutcome::Committed(route) => {
                report(&route.full_path(), &store, &client.lifecycle().pending_removals());
            }
            NavigationOutcome::Aborted => println!("{url}: aborted"),
            NavigationOutcome::Superseded => println!("{url}: superseded"),
        }
    }

    println!("{}", serde_json::to_string_pretty(&store.state())?);
    Ok(())
}

fn report(path: &str, store: &MemoryStore, pending: &[String]) {
    println!(
        "{path}: modules [{}], pending removal [{}]",
        store.module_names().join(", "),
        pending.join(", ")
    );
}
