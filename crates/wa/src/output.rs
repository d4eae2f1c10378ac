//! Colored terminal output for command results.

use console::{Style, Term};
use wa_resolver::Decision;
use wa_rules::SkippedAttachment;

/// Terminal output formatter.
///
/// Diagnostics go to stderr; command results go to stdout so they can be piped.
pub(crate) struct Output {
    diag: Term,
    out: Term,
    green: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
    dim: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            diag: Term::stderr(),
            out: Term::stdout(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
            dim: Style::new().dim(),
        }
    }

    fn line(&self, style: &Style, msg: &str) {
        let _ = self.diag.write_line(&style.apply_to(msg).to_string());
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        self.line(&self.green, msg);
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        self.line(&self.yellow, msg);
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        self.line(&self.red, msg);
    }

    /// One line per resolved target: winner, kind and rank, or unchanged.
    pub(crate) fn decision(&self, decision: &Decision) {
        match &decision.winner {
            Some(winner) => self.line(
                &self.cyan_bold,
                &format!(
                    "{} -> {} ({}, rank {})",
                    decision.target_area_id, winner.area_id, winner.kind, winner.rank
                ),
            ),
            None => self.line(
                &self.dim,
                &format!("{} -> (unchanged)", decision.target_area_id),
            ),
        }
    }

    /// A content list copied from `winner` into `target`.
    pub(crate) fn swapped(&self, target: &str, winner: &str) {
        self.line(&self.cyan_bold, &format!("{target} <- {winner}"));
    }

    /// An attachment dropped while loading rules.
    pub(crate) fn skipped(&self, skipped: &SkippedAttachment) {
        self.warning(&format!(
            "{}: attachment {} skipped: {}",
            skipped.area_id, skipped.index, skipped.error
        ));
    }

    /// Write a command result to stdout.
    pub(crate) fn result(&self, data: &str) {
        let _ = self.out.write_line(data);
    }
}
