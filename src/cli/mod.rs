//! CLI Rendering
//!
//! Presentation for the binary: extracted items, the settlement
//! summary and failure display, phrased the way the assignment flow
//! phrases them. No algorithmic content lives here.

use console::style;
use std::path::Path;

use crate::ledger::{BillLedger, Totals};
use crate::types::CuentasError;

/// Two-decimal currency rendering; the only place amounts are rounded
fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    /// Progress line while the extraction request is in flight
    pub fn scanning(&self, path: &Path) {
        println!("{}", style(format!("Analizando {}...", path.display())).cyan());
    }

    /// Section heading
    pub fn heading(&self, title: &str) {
        println!("\n{}", style(title).bold());
    }

    /// Confirmation line for completed commands
    pub fn done(&self, message: &str) {
        println!("{}", style(message).green());
    }

    /// Failure display: the user-safe message first, the technical
    /// detail dimmed underneath for bug reports
    pub fn failure(&self, err: &CuentasError) {
        eprintln!("{}", style(err.user_message()).red());
        eprintln!("  {}", style(err).dim());
    }

    /// Failure without a domain error behind it
    pub fn failure_message(&self, message: &str) {
        eprintln!("{}", style(message).red());
    }

    /// Extracted items with per-share previews and the bill total
    pub fn items_table(&self, ledger: &BillLedger) {
        self.heading(&format!("Items ({})", ledger.items().len()));

        for item in ledger.items() {
            let share = if item.assigned_to.len() > 1 {
                style(format!("  ({} c/u)", money(item.share())))
                    .dim()
                    .to_string()
            } else {
                String::new()
            };
            println!("  {:<32} {:>9}{}", item.name, money(item.price), share);
        }

        let totals = ledger.totals();
        println!(
            "  {} {}",
            style(format!("{:<32}", "Total de la cuenta")).bold(),
            style(format!("{:>9}", money(totals.grand_total))).bold()
        );
    }

    /// Per-person settlement plus the assignment state line
    pub fn settlement_table(&self, ledger: &BillLedger, totals: &Totals) {
        self.heading("Resumen");

        for participant in ledger.participants() {
            let owed = totals.owed_by(participant.id);
            if owed == 0.0 {
                continue;
            }
            println!("  {:<32} {:>9}", participant.name, money(owed));
        }

        if totals.fully_assigned() {
            println!("  {}", style("¡Todo listo!").green());
        } else {
            println!(
                "  {} {}",
                style(format!("{:<32}", "Falta asignar")).yellow(),
                style(format!("{:>9}", money(totals.unassigned_total))).yellow()
            );
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
