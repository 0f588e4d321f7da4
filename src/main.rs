//! casenotes - a terminal client for the case-note management API.
//!
//! Lets a caseworker log in, search their assigned clients, read a client's
//! case notes, and file new ones without leaving the terminal.

use std::io;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use casenotes::api::{ApiClient, ApiError};
use casenotes::auth::{CredentialStore, SessionStore};
use casenotes::config::Config;
use casenotes::models::{CaseNoteCreateRequest, InteractionType};
use casenotes::utils::{format_timestamp, truncate};

/// Default page size for client search
const SEARCH_PAGE_SIZE: u32 = 10;

/// Maximum content width when listing notes
const NOTE_PREVIEW_WIDTH: usize = 72;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn print_usage() {
    eprintln!("Usage: casenotes <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  login [username]                       Log in and persist the session");
    eprintln!("  logout                                 Log out and clear the session");
    eprintln!("  status                                 Show who is logged in");
    eprintln!("  search [query] [page]                  Search assigned clients");
    eprintln!("  notes <client-id>                      List a client's case notes");
    eprintln!("  add-note <client-id> <type> <text...>  File a new case note");
    eprintln!();
    let types: Vec<&str> = InteractionType::ALL.iter().map(|t| t.as_str()).collect();
    eprintln!("Interaction types: {}", types.join(", "));
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let mut config = Config::load().context("Failed to load configuration")?;
    let session = Arc::new(SessionStore::file(config.session_path()?));
    let client = ApiClient::new(&config.api_base_url(), session)?;

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str);

    match command {
        Some("login") => cmd_login(&client, &mut config, args.get(2).cloned()).await,
        Some("logout") => cmd_logout(&client, &config).await,
        Some("status") => cmd_status(&client).await,
        Some("search") => {
            let query = args.get(2).cloned().unwrap_or_default();
            let page = match args.get(3) {
                Some(raw) => raw.parse().context("Page must be a number")?,
                None => 1,
            };
            cmd_search(&client, &query, page).await
        }
        Some("notes") => {
            let client_id = args.get(2).context("Usage: casenotes notes <client-id>")?;
            cmd_notes(&client, client_id).await
        }
        Some("add-note") => {
            if args.len() < 5 {
                bail!("Usage: casenotes add-note <client-id> <type> <text...>");
            }
            let interaction: InteractionType =
                args[3].parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let content = args[4..].join(" ");
            cmd_add_note(&client, &args[2], interaction, &content).await
        }
        _ => {
            print_usage();
            Ok(())
        }
    }
}

/// Resolve a password without echoing it to the terminal: environment
/// variable first, then the OS keychain, then an interactive prompt.
fn resolve_password(username: &str) -> Result<String> {
    if let Ok(password) = std::env::var("CASENOTES_PASSWORD") {
        if !password.is_empty() {
            debug!("Using password from CASENOTES_PASSWORD");
            return Ok(password);
        }
    }
    if let Ok(password) = CredentialStore::get_password(username) {
        debug!(username, "Using password from OS keychain");
        return Ok(password);
    }
    rpassword::prompt_password(format!("Password for {}: ", username))
        .context("Failed to read password")
}

async fn cmd_login(client: &ApiClient, config: &mut Config, username: Option<String>) -> Result<()> {
    let username = match username.or_else(|| config.last_username.clone()) {
        Some(u) => u,
        None => bail!("Usage: casenotes login <username>"),
    };
    let password = resolve_password(&username)?;

    let user = client.login(&username, &password).await?;
    info!(username, "Login successful");

    config.last_username = Some(username.clone());
    if let Err(error) = config.save() {
        warn!(%error, "Failed to save configuration");
    }
    // Remember the password so an expired session can re-login quietly
    if let Err(error) = CredentialStore::store(&username, &password) {
        debug!(%error, "Could not store password in keychain");
    }

    println!("Logged in as {}", user.display_name());
    if let Some(department) = user.department {
        println!("Department: {}", department);
    }
    Ok(())
}

async fn cmd_logout(client: &ApiClient, config: &Config) -> Result<()> {
    client.logout().await;
    // The stored password exists to revive expired sessions; an explicit
    // logout removes it too
    if let Some(ref username) = config.last_username {
        if let Err(error) = CredentialStore::delete(username) {
            debug!(%error, "Could not remove password from keychain");
        }
    }
    println!("Logged out");
    Ok(())
}

async fn cmd_status(client: &ApiClient) -> Result<()> {
    if !client.is_authenticated() {
        // A dead access token may still be refreshable
        if client.refresh_token().await {
            println!("Session refreshed");
        } else {
            println!("Not logged in");
            return Ok(());
        }
    }

    match client.session().user_identity() {
        Some(user) => {
            println!("Logged in as {} ({})", user.display_name(), user.username);
            if let Some(employee_id) = user.employee_id {
                println!("Employee ID: {}", employee_id);
            }
        }
        None => println!("Logged in (identity unavailable)"),
    }
    Ok(())
}

async fn cmd_search(client: &ApiClient, query: &str, page: u32) -> Result<()> {
    let results = client.search_clients(query, page, SEARCH_PAGE_SIZE).await?;

    if results.clients.is_empty() {
        println!("No clients found");
        return Ok(());
    }

    for c in &results.clients {
        println!("{:<12} {}", c.client_id, c.full_name());
    }
    println!();
    println!(
        "Page {} of {} ({} clients total)",
        results.page, results.total_pages, results.total
    );
    Ok(())
}

async fn cmd_notes(client: &ApiClient, client_id: &str) -> Result<()> {
    let notes = client.client_case_notes(client_id).await?;

    if notes.is_empty() {
        println!("No case notes for this client");
        return Ok(());
    }

    for note in &notes {
        println!(
            "{}  {}  by {}",
            format_timestamp(&note.created_at),
            note.interaction_type.label(),
            note.created_by.name
        );
        println!("  {}", truncate(&note.content, NOTE_PREVIEW_WIDTH));
    }
    Ok(())
}

async fn cmd_add_note(
    client: &ApiClient,
    client_id: &str,
    interaction_type: InteractionType,
    content: &str,
) -> Result<()> {
    let request = CaseNoteCreateRequest {
        client_id: client_id.to_string(),
        content: content.to_string(),
        interaction_type,
    };

    match client.create_case_note(&request).await {
        Ok(created) => {
            println!("Note {} created at {}", created.id, format_timestamp(&created.created_at));
            Ok(())
        }
        Err(ApiError::SessionExpired) => {
            bail!("Session expired - please run 'casenotes login' again")
        }
        Err(error) => Err(error.into()),
    }
}
