//! Status overview command.

use anyhow::Result;
use console::style;

use parley_core::repository::session::SessionRepository;

use crate::state::AppState;

/// Display session count, counter totals, and where data lives.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let session_count = state.session_service.sessions().count().await?;
    let document = state.session_service.stats().document().await?;
    let policy = state.session_service.stats().policy();

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "sessions": session_count,
            "statistics": {
                "days": document.total_sessions.len(),
                "saved": document.total_saved(),
                "deleted": document.total_deleted(),
                "missing_counter": policy.to_string(),
            },
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!("  {} Parley v{}", style("⚡").bold(), env!("CARGO_PKG_VERSION"));
    println!();

    println!("  {}", style("── Sessions ──").dim());
    println!("  Stored:   {}", style(session_count).bold());
    println!();

    println!("  {}", style("── Statistics ──").dim());
    println!("  Days:     {}", document.total_sessions.len());
    println!("  Saved:    {}", style(document.total_saved()).green());
    println!("  Deleted:  {}", style(document.total_deleted()).red());
    println!("  Missing counters: {}", style(policy).yellow());
    println!();

    println!("  {}", style("── Storage ──").dim());
    println!("  Data dir: {}", style(state.data_dir.display()).cyan());
    println!();

    Ok(())
}
