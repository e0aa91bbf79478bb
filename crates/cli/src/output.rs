//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use rightsizer::models::{ResizeRecommendation, ResizeValidation};
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable format (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

#[derive(Tabled)]
struct RecommendationRow {
    #[tabled(rename = "Instance")]
    instance_id: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Current Type")]
    current_type: String,
    #[tabled(rename = "Avg CPU %")]
    cpu: String,
    #[tabled(rename = "Decision")]
    decision: String,
    #[tabled(rename = "Suggested")]
    suggested: String,
    #[tabled(rename = "Validated")]
    validated: String,
}

/// Render a recommendation as a one-row summary table.
pub fn recommendation_table(rec: &ResizeRecommendation) -> String {
    let row = RecommendationRow {
        instance_id: rec.instance_id.clone(),
        region: rec.region.clone(),
        current_type: rec.current_instance_type.to_string(),
        cpu: format!("{:.2}", rec.average_cpu_usage_percent),
        decision: rec.decision.to_string().to_uppercase(),
        suggested: rec
            .ai_suggested_instance_type
            .clone()
            .unwrap_or_else(|| "-".to_string()),
        validated: if rec.validated {
            "yes".green().to_string()
        } else {
            "no".red().to_string()
        },
    };
    Table::new([row]).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct ValidationRow {
    #[tabled(rename = "Instance")]
    instance_id: String,
    #[tabled(rename = "Current Type")]
    current_type: String,
    #[tabled(rename = "Requested Type")]
    requested_type: String,
    #[tabled(rename = "Decision")]
    decision: String,
}

/// Render a compatibility validation as a one-row summary table.
pub fn validation_table(validation: &ResizeValidation) -> String {
    let row = ValidationRow {
        instance_id: validation.instance_id.clone(),
        current_type: validation.current_instance_type.to_string(),
        requested_type: validation.requested_instance_type.to_string(),
        decision: if validation.is_valid_upgrade {
            validation.compatibility_decision.green().to_string()
        } else {
            validation.compatibility_decision.red().to_string()
        },
    };
    Table::new([row]).with(Style::rounded()).to_string()
}
