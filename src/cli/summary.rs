use super::ui;
use crate::core::insight::{format_amount, format_signed_amount, format_signed_percent};
use crate::core::metrics::PortfolioValuation;
use crate::session::PortfolioSession;
use anyhow::Result;
use comfy_table::Cell;
use tracing::info;

impl PortfolioValuation {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();

        table.set_header(vec![
            ui::header_cell("Symbol"),
            ui::header_cell("Name"),
            ui::header_cell("Shares"),
            ui::header_cell("Cost"),
            ui::header_cell("Price"),
            ui::header_cell("Value"),
            ui::header_cell("Gain/Loss"),
            ui::header_cell("Gain/Loss (%)"),
            ui::header_cell("Weight (%)"),
        ]);

        for valuation in &self.holdings {
            let holding = &valuation.holding;
            let metrics = &valuation.metrics;

            table.add_row(vec![
                Cell::new(holding.symbol()),
                Cell::new(holding.name()),
                ui::number_cell(format!("{:.2}", holding.shares())),
                ui::number_cell(format!("{:.2}", holding.purchase_price())),
                ui::number_cell(format!("{:.2}", holding.current_price())),
                ui::number_cell(format_amount(metrics.market_value)),
                ui::change_cell(metrics.gain_loss, format_signed_amount(metrics.gain_loss)),
                ui::change_cell(
                    metrics.gain_loss_percent,
                    format!("{}%", format_signed_percent(metrics.gain_loss_percent)),
                ),
                ui::format_optional_cell(valuation.weight, |w| format!("{w:.2}%")),
            ]);
        }

        let totals = &self.totals;
        let mut output = format!(
            "{} {}\n\n",
            ui::style_text("Holdings", ui::StyleType::Title),
            ui::style_text(
                &format!("({} positions)", self.holdings.len()),
                ui::StyleType::Subtle
            )
        );

        output.push_str(&table.to_string());

        output.push_str(&format!(
            "\n\n{} ${}\n{} {} ({}%)",
            ui::style_text("Total Value:", ui::StyleType::TotalLabel),
            format_amount(totals.total_value),
            ui::style_text("Total Gain/Loss:", ui::StyleType::TotalLabel),
            ui::style_text(
                &format_signed_amount(totals.total_gain_loss),
                ui::signed_style(totals.total_gain_loss)
            ),
            format_signed_percent(totals.total_gain_loss_percent),
        ));

        output
    }
}

pub fn run(session: &PortfolioSession) -> Result<()> {
    info!("Rendering portfolio summary");

    if session.store().is_empty() {
        println!(
            "{}",
            ui::style_text(
                "No holdings yet. Add some to your config to start tracking.",
                ui::StyleType::Subtle
            )
        );
        return Ok(());
    }

    println!("{}", session.valuation().display_as_table());
    Ok(())
}
