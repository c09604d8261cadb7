use super::ui;
use crate::session::PortfolioSession;
use anyhow::{Result, bail};
use tracing::{debug, info};

/// Runs one analysis through the session and prints the result.
pub async fn run(session: &mut PortfolioSession) -> Result<()> {
    info!("Analyzing portfolio...");

    let Some(request) = session.request_insight() else {
        if session.store().is_empty() {
            println!(
                "{}",
                ui::style_text(
                    "Add some holdings to your portfolio to get an analysis.",
                    ui::StyleType::Subtle
                )
            );
            return Ok(());
        }
        bail!("An analysis is already in progress");
    };

    let pb = ui::new_spinner("Analyzing...");
    let response = request.resolve().await;
    pb.finish_and_clear();

    if !session.complete_insight(response) {
        bail!("Analysis finished after being superseded");
    }

    let insight = session.latest_insight().unwrap_or_default();
    debug!("Insight: {insight}");
    println!(
        "{}\n\n{}",
        ui::style_text("Portfolio Analysis", ui::StyleType::Title),
        insight
    );
    Ok(())
}
