//! # ReWear Client
//!
//! Command-line driver over the client library.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin client -- items [search]
//! cargo run --bin client -- login <email> <password>
//! cargo run --bin client -- me
//! cargo run --bin client -- swaps
//! cargo run --bin client -- logout
//! ```
//!
//! The session is kept in `REWEAR_SESSION_FILE` between runs.

use client::app::{App, AppEvent};
use client::config::ClientConfig;
use shared::{ItemFilters, LoginRequest};

const USAGE: &str = "usage: client <items [search] | login <email> <password> | me | swaps | logout>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ClientConfig::from_env();
    let _guard = client::debug::init(&config);

    let app = App::new(&config)?;
    app.initialize().await;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let outcome = match args.as_slice() {
        ["items"] => list_items(&app, None).await,
        ["items", search @ ..] => list_items(&app, Some(search.join(" "))).await,
        ["login", email, password] => login(&app, email, password).await,
        ["me"] => show_me(&app),
        ["swaps"] => list_swaps(&app).await,
        ["logout"] => {
            app.logout();
            Ok(())
        }
        _ => {
            eprintln!("{}", USAGE);
            Ok(())
        }
    };

    print_events(&app);
    tracing::debug!(
        pending_tasks = client::debug::active_task_count(),
        "Exiting"
    );

    if let Err(e) = outcome {
        tracing::error!(error = %e, "Command failed");
        return Err(e.into());
    }
    Ok(())
}

async fn list_items(app: &App, search: Option<String>) -> client::core::Result<()> {
    let filters = ItemFilters {
        search,
        ..Default::default()
    };
    let listing = app.items(filters).await?;

    if listing.items.is_empty() {
        println!("No items found.");
    }
    for item in &listing.items {
        let status = if item.is_available { "available" } else { "unavailable" };
        println!(
            "{:<26} {:<32} {:>6} pts  {}",
            item.id, item.title, item.points_value, status
        );
    }
    if let Some(page) = listing.pagination {
        println!(
            "Page {} of {} ({} items)",
            page.current_page, page.total_pages, page.total_items
        );
    }
    Ok(())
}

async fn login(app: &App, email: &str, password: &str) -> client::core::Result<()> {
    let request = LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    };
    let user = app.login(&request, None).await?;
    println!("Logged in as {} ({} points)", user.display_name(), user.points);
    Ok(())
}

fn show_me(app: &App) -> client::core::Result<()> {
    match app.session().user() {
        Some(user) => {
            println!("{} <{}>", user.display_name(), user.email);
            println!("Username: {}", user.username);
            println!("Role:     {:?}", user.role);
            println!("Points:   {}", user.points);
            println!("Rating:   {:.1} ({} reviews)", user.rating, user.reviews_count);
        }
        None => println!("Not logged in."),
    }
    Ok(())
}

async fn list_swaps(app: &App) -> client::core::Result<()> {
    let lists = app.swap_lists().await?;

    println!(
        "Received ({} pending of {})",
        lists.pending_received(),
        lists.received.len()
    );
    for swap in &lists.received {
        println!("  {:<26} {:<10} from {}", swap.id, swap.status.as_str(), swap.requester_id());
    }

    println!("Sent ({} pending of {})", lists.pending_sent(), lists.sent.len());
    for swap in &lists.sent {
        println!(
            "  {:<26} {:<10} for item {}",
            swap.id,
            swap.status.as_str(),
            swap.requested_item.id()
        );
    }
    Ok(())
}

fn print_events(app: &App) {
    for event in app.drain_events() {
        match event {
            AppEvent::Toast { level, message } => println!("[{:?}] {}", level, message),
            AppEvent::Navigate(route) => println!("-> {}", route),
        }
    }
}
