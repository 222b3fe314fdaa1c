//! Output formatter trait

use council_domain::{Deliberation, OutputFormat};

/// Trait for formatting finished deliberations
pub trait OutputFormatter {
    /// Every round, response and vote, then the summary
    fn format_full(&self, deliberation: &Deliberation) -> String;

    /// Outcome, summary and key points
    fn format_summary(&self, deliberation: &Deliberation) -> String;

    /// The record as pretty-printed JSON
    fn format_json(&self, deliberation: &Deliberation) -> String;

    fn render(&self, deliberation: &Deliberation, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format_full(deliberation),
            OutputFormat::Summary => self.format_summary(deliberation),
            OutputFormat::Json => self.format_json(deliberation),
        }
    }
}
