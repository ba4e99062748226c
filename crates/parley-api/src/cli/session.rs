//! Session management commands: list, show, delete.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use parley_types::api::{DeleteSessionRequest, SessionResponse};
use parley_types::session::Session;

use crate::state::AppState;

#[derive(Subcommand)]
pub enum SessionCommand {
    /// List every stored session.
    #[command(alias = "ls")]
    List,

    /// Show one session's messages.
    Show {
        /// Session id.
        id: String,
    },

    /// Delete a session and count the deletion.
    #[command(alias = "rm")]
    Delete {
        /// Session id.
        id: String,

        /// Statistics date to count the deletion on (defaults to today, UTC).
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Skip confirmation prompt.
        #[arg(long, short)]
        force: bool,
    },
}

/// Dispatch a `parley session` subcommand.
pub async fn handle_session_command(
    action: SessionCommand,
    state: &AppState,
    json: bool,
) -> Result<()> {
    match action {
        SessionCommand::List => list_sessions(state, json).await,
        SessionCommand::Show { id } => show_session(state, &id, json).await,
        SessionCommand::Delete { id, date, force } => {
            delete_session(state, id, date, force, json).await
        }
    }
}

async fn list_sessions(state: &AppState, json: bool) -> Result<()> {
    let sessions = state.session_service.list().await?;

    if json {
        let out: Vec<SessionResponse> = sessions.into_iter().map(SessionResponse::from).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!();
        println!("  No sessions stored yet.");
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Session").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
        Cell::new("Created").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
    ]);

    for session in &sessions {
        table.add_row(vec![
            Cell::new(&session.id).fg(Color::Cyan),
            Cell::new(session.message_count()),
            Cell::new(session.created_at.format("%Y-%m-%d %H:%M")),
            Cell::new(session.updated_at.format("%Y-%m-%d %H:%M")).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!("  {} session(s)", style(sessions.len()).bold());
    println!();

    Ok(())
}

async fn show_session(state: &AppState, id: &str, json: bool) -> Result<()> {
    let session = state.session_service.get(id).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&SessionResponse::from(session))?
        );
        return Ok(());
    }

    print_session(&session);
    Ok(())
}

fn print_session(session: &Session) {
    println!();
    println!("  {} {}", style("Session").bold(), style(&session.id).cyan());
    println!(
        "  {}",
        style(format!(
            "created {}  updated {}",
            session.created_at.to_rfc3339(),
            session.updated_at.to_rfc3339()
        ))
        .dim()
    );
    println!();

    if session.messages.is_empty() {
        println!("  {}", style("(no messages)").dim());
    }

    for (i, message) in session.messages.iter().enumerate() {
        let role = message
            .0
            .get("role")
            .and_then(|r| r.as_str())
            .unwrap_or("message");
        let body = match message.0.get("content").and_then(|c| c.as_str()) {
            Some(content) => content.to_string(),
            None => message.0.to_string(),
        };
        println!("  {} {}", style(format!("{:>3}. {role}:", i + 1)).yellow(), body);
    }
    println!();
}

async fn delete_session(
    state: &AppState,
    id: String,
    date: Option<NaiveDate>,
    force: bool,
    json: bool,
) -> Result<()> {
    let req = DeleteSessionRequest {
        session_id: Some(id),
        date,
    };
    let (id, date) = req.validate(Utc::now().date_naive())?;

    if !force && !json {
        let session = state.session_service.get(id).await?;
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete session '{}' ({} messages, counted on {date})?",
                style(id).red().bold(),
                session.message_count()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let confirmation = state.session_service.delete(id, date).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&confirmation)?);
    } else {
        println!();
        println!("  {} {}", style("✓").green().bold(), confirmation.message);
        println!();
    }

    Ok(())
}
