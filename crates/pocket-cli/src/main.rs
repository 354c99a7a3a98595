//! Pocket CLI - user account administration
//!
//! Usage:
//!   pocket users list [--search TEXT] [--inactive-only] [--json]
//!   pocket users show <username> [--json]
//!   pocket users create --username .. --password .. --first-name .. --last-name ..
//!   pocket users deactivate <username>
//!   pocket users activate <username>
//!
//! Requires `DATABASE_URL` (or a `POCKET_CONFIG` file naming a database).

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use pocket_core::{
    validate_registration, AppConfig, ConfigError, PgUserRepository, PocketError, RegisterPayload,
    User, UserFilter, UserStore,
};
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "pocket")]
#[command(about = "Pocket user account administration")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List users
    List {
        /// Match username, names, email or phone number (case-insensitive)
        #[arg(long)]
        search: Option<String>,
        /// Only show deactivated accounts
        #[arg(long)]
        inactive_only: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one user
    Show {
        username: String,
        #[arg(long)]
        json: bool,
    },
    /// Create a user, applying the same rules as registration
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone_number: Option<String>,
    },
    /// Block an account from logging in
    Deactivate { username: String },
    /// Allow an account to log in again
    Activate { username: String },
}

/// Administrative view of a user; never includes the password hash
#[derive(Debug, Serialize)]
struct UserRow {
    id: Uuid,
    username: String,
    first_name: String,
    last_name: String,
    email: Option<String>,
    phone_number: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = connect().await?;

    match cli.command {
        Commands::Users { action } => run_user_action(&store, action).await,
    }
}

async fn connect() -> anyhow::Result<UserStore> {
    let config = AppConfig::load()?;
    let url = config
        .database
        .postgres_url
        .clone()
        .ok_or_else(|| ConfigError::MissingRequired("DATABASE_URL".to_string()))?;

    let repo = PgUserRepository::connect(&url, config.database.pool_size).await?;
    repo.ensure_schema().await?;

    Ok(UserStore::new(Arc::new(repo), config.password))
}

async fn run_user_action(store: &UserStore, action: UserAction) -> anyhow::Result<()> {
    match action {
        UserAction::List {
            search,
            inactive_only,
            json,
        } => {
            let filter = UserFilter {
                search,
                is_active: inactive_only.then_some(false),
            };
            let users = store.list(&filter).await?;
            let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print!("{}", render_table(&rows));
            }
        }
        UserAction::Show { username, json } => {
            let user = store
                .find_by_username(&username)
                .await?
                .with_context(|| format!("No user named '{username}'"))?;
            let row = UserRow::from(&user);

            if json {
                println!("{}", serde_json::to_string_pretty(&row)?);
            } else {
                println!("{user}");
                print!("{}", render_details(&row));
            }
        }
        UserAction::Create {
            username,
            password,
            first_name,
            last_name,
            email,
            phone_number,
        } => {
            let payload = RegisterPayload {
                username: Some(username),
                password: Some(password),
                first_name: Some(first_name),
                last_name: Some(last_name),
                email,
                phone_number,
            };
            let fields = validate_registration(&payload).map_err(PocketError::from)?;
            let user = store.create_user(fields).await?;
            println!("Created {user} ({})", user.id);
        }
        UserAction::Deactivate { username } => {
            let user = store.set_active(&username, false).await?;
            println!("Deactivated {user}");
        }
        UserAction::Activate { username } => {
            let user = store.set_active(&username, true).await?;
            println!("Activated {user}");
        }
    }

    Ok(())
}

fn render_table(rows: &[UserRow]) -> String {
    let headers = ["USERNAME", "NAME", "EMAIL", "PHONE", "ACTIVE", "CREATED"];
    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|row| {
            [
                row.username.clone(),
                format!("{} {}", row.first_name, row.last_name).trim().to_string(),
                row.email.clone().unwrap_or_default(),
                row.phone_number.clone().unwrap_or_default(),
                if row.is_active { "yes" } else { "no" }.to_string(),
                row.created_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &headers.map(str::to_string), &widths);
    for line in &cells {
        push_row(&mut out, line, &widths);
    }
    out.push_str(&format!("{} user(s)\n", rows.len()));
    out
}

fn push_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

fn render_details(row: &UserRow) -> String {
    let dash = || "-".to_string();
    [
        ("id", row.id.to_string()),
        ("username", row.username.clone()),
        ("first name", row.first_name.clone()),
        ("last name", row.last_name.clone()),
        ("email", row.email.clone().unwrap_or_else(dash)),
        ("phone", row.phone_number.clone().unwrap_or_else(dash)),
        ("active", row.is_active.to_string()),
        ("created", row.created_at.to_rfc3339()),
    ]
    .iter()
    .map(|(label, value)| format!("  {label:<11}{value}\n"))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(username: &str, active: bool) -> UserRow {
        UserRow::from(&User {
            is_active: active,
            ..User::new(
                username.to_string(),
                "hash".to_string(),
                "Alice".to_string(),
                "A".to_string(),
                Some("a@x.com".to_string()),
                None,
            )
        })
    }

    #[test]
    fn test_parse_list_flags() {
        let cli = Cli::try_parse_from([
            "pocket",
            "users",
            "list",
            "--search",
            "ali",
            "--inactive-only",
        ])
        .unwrap();
        match cli.command {
            Commands::Users {
                action:
                    UserAction::List {
                        search,
                        inactive_only,
                        json,
                    },
            } => {
                assert_eq!(search.as_deref(), Some("ali"));
                assert!(inactive_only);
                assert!(!json);
            }
            _ => panic!("expected users list"),
        }
    }

    #[test]
    fn test_parse_create_requires_names() {
        let result = Cli::try_parse_from([
            "pocket", "users", "create", "--username", "alice", "--password", "secret1",
        ]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from([
            "pocket",
            "users",
            "create",
            "--username",
            "alice",
            "--password",
            "secret1",
            "--first-name",
            "Alice",
            "--last-name",
            "A",
            "--phone-number",
            "0912345678",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Users {
                action: UserAction::Create { phone_number: Some(_), email: None, .. }
            }
        ));
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&[row("alice", true), row("bob", false)]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("USERNAME"));
        assert!(lines[1].starts_with("alice"));
        assert!(lines[1].contains("Alice A"));
        assert!(lines[2].contains("no"));
        assert_eq!(lines[3], "2 user(s)");
    }

    #[test]
    fn test_row_json_has_no_password() {
        let json = serde_json::to_value(row("alice", true)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["is_active"], true);
    }

    #[test]
    fn test_render_details_dashes_missing_contact() {
        let details = render_details(&row("alice", true));
        assert!(details.contains("phone      -"));
    }
}
