//! Subcommand handlers. Each one builds a fresh [`Store`], drives it through
//! the same dialog flow a form would, and prints the reconciled table.

use crate::{
    api::ApiClient,
    cli::globals::GlobalArgs,
    users::{DialogMode, Store, User},
};
use anyhow::{anyhow, bail, Result};
use std::io::Write;
use tracing::{debug, instrument};

fn connect(globals: &GlobalArgs) -> Result<Store> {
    let config = globals.api_config()?;
    debug!("Using users API at {}", config.base_url);

    Ok(Store::new(ApiClient::new(&config)?))
}

/// Turns a `false` from the store into an error carrying the validation
/// messages, if there are any.
async fn failure(store: &Store, operation: &str) -> anyhow::Error {
    let state = store.snapshot().await;

    if state.validation_errors.is_empty() {
        anyhow!("failed to {operation}, see logs for details")
    } else {
        let details: Vec<String> = state
            .validation_errors
            .iter()
            .map(ToString::to_string)
            .collect();
        anyhow!("invalid user input\n{}", details.join("\n"))
    }
}

/// Renders users as a left-aligned table with an `ID NAME AGE` header.
#[must_use]
pub fn render_table(users: &[User]) -> String {
    let rows: Vec<[String; 3]> = users
        .iter()
        .map(|user| {
            [
                user.id.map_or_else(|| "-".to_string(), |id| id.to_string()),
                user.name.clone(),
                user.age.to_string(),
            ]
        })
        .collect();

    let header = ["ID", "NAME", "AGE"];
    let mut widths = header.map(|title| title.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: [&str; 3]| -> String {
        let line = format!(
            "{:<id$}  {:<name$}  {}",
            cells[0],
            cells[1],
            cells[2],
            id = widths[0],
            name = widths[1],
        );
        line.trim_end().to_string()
    };

    let mut table = format_row(header);
    table.push('\n');
    for row in &rows {
        table.push_str(&format_row([row[0].as_str(), row[1].as_str(), row[2].as_str()]));
        table.push('\n');
    }
    table
}

fn print_users(users: &[User]) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(render_table(users).as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Fetches and prints the table.
///
/// # Errors
/// Returns an error if the client cannot be configured or the list cannot be fetched.
#[instrument]
pub async fn list(globals: &GlobalArgs) -> Result<()> {
    let store = connect(globals)?;

    if !store.get_data_list().await {
        return Err(failure(&store, "fetch users").await);
    }

    print_users(&store.snapshot().await.users)
}

/// Validates and creates a user.
///
/// # Errors
/// Returns an error on invalid input or if the request fails.
#[instrument]
pub async fn add(globals: &GlobalArgs, name: String, age: String) -> Result<()> {
    let store = connect(globals)?;

    store.open_dialog(DialogMode::Add).await;
    store.set_draft(name, age).await;

    if !store.add_person().await {
        return Err(failure(&store, "add user").await);
    }

    print_users(&store.snapshot().await.users)
}

/// Loads user `id`, overrides the given fields, validates and updates.
///
/// # Errors
/// Returns an error if the user is unknown, the input is invalid or a request fails.
#[instrument]
pub async fn update(
    globals: &GlobalArgs,
    id: i64,
    name: Option<String>,
    age: Option<String>,
) -> Result<()> {
    let store = connect(globals)?;

    if !store.get_data_list().await {
        return Err(failure(&store, "fetch users").await);
    }
    if !store.edit_person(id).await {
        bail!("user {id} not found");
    }

    store.open_dialog(DialogMode::Update).await;
    let current = store.snapshot().await.draft;
    store
        .set_draft(
            name.unwrap_or(current.name),
            age.unwrap_or(current.age),
        )
        .await;

    if !store.update_person().await {
        return Err(failure(&store, "update user").await);
    }

    print_users(&store.snapshot().await.users)
}

/// Deletes user `id`.
///
/// # Errors
/// Returns an error if the request fails.
#[instrument]
pub async fn delete(globals: &GlobalArgs, id: i64) -> Result<()> {
    let store = connect(globals)?;

    store.open_dialog(DialogMode::Delete).await;

    if !store.delete_person(id).await {
        return Err(failure(&store, "delete user").await);
    }

    print_users(&store.snapshot().await.users)
}
