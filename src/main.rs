//! Nylas CLI
//!
//! Thin command-line front end over the client library: OAuth helpers and
//! generic list/get/delete for every resource collection.

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use nylas_client::config::Config;
use nylas_client::error::Result;
use nylas_client::{Collection, NylasClient, Resource};

/// Nylas API command-line client
#[derive(Parser)]
#[command(name = "nylas")]
#[command(author, version, about = "Command-line client for the Nylas email and calendar API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Namespace to scope requests to
    #[arg(long, global = true)]
    namespace: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the OAuth authorization URL
    AuthUrl {
        #[arg(long)]
        redirect_uri: String,

        #[arg(long)]
        login_hint: Option<String>,
    },
    /// Exchange an authorization code for an access token
    ExchangeCode { code: String },
    /// Show the authenticated account
    Account,
    /// List objects in a collection
    List {
        resource: ResourceKind,

        #[arg(long)]
        limit: Option<u32>,

        /// Filter as key=value, may be repeated
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
    },
    /// Fetch one object
    Get { resource: ResourceKind, id: String },
    /// Delete one object
    Delete { resource: ResourceKind, id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum ResourceKind {
    Threads,
    Messages,
    Drafts,
    Labels,
    Files,
    Contacts,
    Calendars,
    Events,
}

fn parse_filter(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;
    let client = NylasClient::new(config);
    let namespace = cli.namespace.as_deref();

    match cli.command {
        Commands::AuthUrl {
            redirect_uri,
            login_hint,
        } => {
            println!("{}", client.auth_url(&redirect_uri, login_hint.as_deref()));
        }
        Commands::ExchangeCode { code } => {
            let token = client.exchange_code(&code).await?;
            println!("{}", token);
        }
        Commands::Account => print_json(&client.account().await?)?,
        Commands::List {
            resource,
            limit,
            filters,
        } => match resource {
            ResourceKind::Threads => list(client.threads(), namespace, limit, filters).await?,
            ResourceKind::Messages => list(client.messages(), namespace, limit, filters).await?,
            ResourceKind::Drafts => list(client.drafts(), namespace, limit, filters).await?,
            ResourceKind::Labels => list(client.labels(), namespace, limit, filters).await?,
            ResourceKind::Files => list(client.files(), namespace, limit, filters).await?,
            ResourceKind::Contacts => list(client.contacts(), namespace, limit, filters).await?,
            ResourceKind::Calendars => list(client.calendars(), namespace, limit, filters).await?,
            ResourceKind::Events => list(client.events(), namespace, limit, filters).await?,
        },
        Commands::Get { resource, id } => match resource {
            ResourceKind::Threads => get(client.threads(), namespace, &id).await?,
            ResourceKind::Messages => get(client.messages(), namespace, &id).await?,
            ResourceKind::Drafts => get(client.drafts(), namespace, &id).await?,
            ResourceKind::Labels => get(client.labels(), namespace, &id).await?,
            ResourceKind::Files => get(client.files(), namespace, &id).await?,
            ResourceKind::Contacts => get(client.contacts(), namespace, &id).await?,
            ResourceKind::Calendars => get(client.calendars(), namespace, &id).await?,
            ResourceKind::Events => get(client.events(), namespace, &id).await?,
        },
        Commands::Delete { resource, id } => {
            let deleted = match resource {
                ResourceKind::Threads => delete(client.threads(), namespace, &id).await?,
                ResourceKind::Messages => delete(client.messages(), namespace, &id).await?,
                ResourceKind::Drafts => delete(client.drafts(), namespace, &id).await?,
                ResourceKind::Labels => delete(client.labels(), namespace, &id).await?,
                ResourceKind::Files => delete(client.files(), namespace, &id).await?,
                ResourceKind::Contacts => delete(client.contacts(), namespace, &id).await?,
                ResourceKind::Calendars => delete(client.calendars(), namespace, &id).await?,
                ResourceKind::Events => delete(client.events(), namespace, &id).await?,
            };
            match deleted {
                Some(body) => print_json(&body)?,
                None => eprintln!("Deleted {}", id),
            }
        }
    }

    Ok(())
}

fn scoped<'a, T: Resource>(
    collection: Collection<'a, T>,
    namespace: Option<&str>,
) -> Collection<'a, T> {
    match namespace {
        Some(ns) => collection.namespace(ns),
        None => collection,
    }
}

async fn list<T: Resource>(
    collection: Collection<'_, T>,
    namespace: Option<&str>,
    limit: Option<u32>,
    filters: Vec<(String, String)>,
) -> Result<()> {
    let collection = filters
        .into_iter()
        .fold(scoped(collection, namespace), |c, (k, v)| c.filter(k, v));
    print_json(&collection.all(limit).await?)
}

async fn get<T: Resource>(
    collection: Collection<'_, T>,
    namespace: Option<&str>,
    id: &str,
) -> Result<()> {
    print_json(&scoped(collection, namespace).find(id).await?)
}

async fn delete<T: Resource>(
    collection: Collection<'_, T>,
    namespace: Option<&str>,
    id: &str,
) -> Result<Option<serde_json::Value>> {
    scoped(collection, namespace).delete(id).await
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
