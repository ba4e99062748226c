//! Statistics commands: show the daily counters, seed a date.

use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use parley_types::api::StatisticsResponse;

use crate::state::AppState;

#[derive(Subcommand)]
pub enum StatsCommand {
    /// Show every daily counter.
    Show,

    /// Create a zeroed counter for a date (no-op when it already exists).
    ///
    /// Needed before saving or deleting on that date when
    /// `statistics.missing_counter = "reject"`.
    Seed {
        /// Date in YYYY-MM-DD form.
        date: NaiveDate,
    },
}

/// Dispatch a `parley stats` subcommand.
pub async fn handle_stats_command(action: StatsCommand, state: &AppState, json: bool) -> Result<()> {
    match action {
        StatsCommand::Show => show_stats(state, json).await,
        StatsCommand::Seed { date } => seed_counter(state, date, json).await,
    }
}

async fn show_stats(state: &AppState, json: bool) -> Result<()> {
    let stats = state.session_service.stats().get_all().await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&StatisticsResponse { stats })?
        );
        return Ok(());
    }

    if stats.is_empty() {
        println!();
        println!("  No statistics recorded yet.");
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Date").fg(Color::White),
        Cell::new("Saved").fg(Color::White),
        Cell::new("Deleted").fg(Color::White),
    ]);

    for counter in &stats {
        table.add_row(vec![
            Cell::new(counter.date).fg(Color::Cyan),
            Cell::new(counter.saved_sessions).fg(Color::Green),
            Cell::new(counter.deleted_sessions).fg(Color::Red),
        ]);
    }

    println!();
    println!("{table}");
    println!();

    Ok(())
}

async fn seed_counter(state: &AppState, date: NaiveDate, json: bool) -> Result<()> {
    let counter = state.session_service.stats().seed(date).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&counter)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Counter for {} ready (saved {}, deleted {})",
        style("✓").green().bold(),
        style(counter.date).cyan(),
        counter.saved_sessions,
        counter.deleted_sessions
    );
    println!();

    Ok(())
}
