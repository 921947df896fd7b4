//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::models::{ReviewStatus, Role};
use crate::view_state::{SeverityFilter, SortKey};

#[derive(Parser, Debug)]
#[command(name = "herdview")]
#[command(version)]
#[command(about = "Terminal client for the cattle diagnosis backend", long_about = None)]
pub struct Cli {
    /// Backend origin (overrides HERDVIEW_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Token file (defaults to ~/.herdview/.credentials.json)
    #[arg(long, global = true)]
    pub credentials: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the token
    Login {
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Create an account
    Register(RegisterArgs),

    /// Forget the stored token
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Herd and diagnosis overview
    Dashboard,

    /// Manage cattle
    #[command(subcommand)]
    Cattle(CattleCommand),

    /// Browse, review and export diagnoses
    #[command(subcommand)]
    Diagnoses(DiagnosesCommand),
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(short, long)]
    pub username: String,

    #[arg(short, long)]
    pub email: String,

    #[arg(long, default_value = "")]
    pub full_name: String,

    /// farmer, vet or admin
    #[arg(long, default_value = "farmer", value_parser = parse_role)]
    pub role: Role,

    #[arg(long, default_value = "")]
    pub farm_name: String,
}

#[derive(Subcommand, Debug)]
pub enum CattleCommand {
    /// List the herd
    List {
        /// Match tag number, name or breed
        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// Add a head of cattle
    Add(CattleFields),

    /// Change a head of cattle; omitted fields keep their value
    Update {
        id: u64,
        #[command(flatten)]
        fields: CattleFields,
    },

    /// Remove a head of cattle
    Delete { id: u64 },
}

#[derive(Args, Debug, Default, Clone)]
pub struct CattleFields {
    #[arg(long)]
    pub tag: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub breed: Option<String>,

    #[arg(long)]
    pub age: Option<u32>,

    /// Weight in kilograms
    #[arg(long)]
    pub weight: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum DiagnosesCommand {
    /// One page of the diagnosis history
    List(HistoryArgs),

    /// Full detail of one diagnosis
    Show { id: u64 },

    /// Record a veterinarian review
    Review {
        id: u64,

        /// approve, edit or reject
        #[arg(long, value_parser = parse_review_status)]
        status: ReviewStatus,

        #[arg(long, default_value = "")]
        notes: String,

        #[arg(long, default_value = "")]
        recommendation: String,

        /// Corrected disease, with --status edit
        #[arg(long, default_value = "")]
        disease: String,
    },

    /// Write the filtered history to a dated CSV file
    Export {
        #[command(flatten)]
        filters: HistoryArgs,

        /// Directory for the CSV (overrides HERDVIEW_EXPORT_DIR)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    /// Match cattle name or disease
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// all, low, medium or high
    #[arg(long, default_value = "all", value_parser = parse_severity)]
    pub severity: SeverityFilter,

    /// newest, oldest, confidence_desc or confidence_asc
    #[arg(long, default_value = "newest", value_parser = parse_sort)]
    pub sort: SortKey,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    #[arg(long)]
    pub page_size: Option<usize>,

    /// Only diagnoses for this animal
    #[arg(long)]
    pub cattle_id: Option<u64>,
}

fn parse_severity(s: &str) -> Result<SeverityFilter, String> {
    s.parse().map_err(|e: crate::error::ValidationError| e.user_message())
}

fn parse_sort(s: &str) -> Result<SortKey, String> {
    s.parse().map_err(|e: crate::error::ValidationError| e.user_message())
}

fn parse_review_status(s: &str) -> Result<ReviewStatus, String> {
    s.parse().map_err(|e: crate::error::ValidationError| e.user_message())
}

fn parse_role(s: &str) -> Result<Role, String> {
    s.parse().map_err(|e: crate::error::ValidationError| e.user_message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_diagnoses_list() {
        let cli = Cli::try_parse_from([
            "herdview", "diagnoses", "list", "--query", "bossy", "--severity", "HIGH", "--sort",
            "confidence_desc", "--page", "2",
        ])
        .unwrap();

        match cli.command {
            Command::Diagnoses(DiagnosesCommand::List(args)) => {
                assert_eq!(args.query, "bossy");
                assert_eq!(args.severity, SeverityFilter::High);
                assert_eq!(args.sort, SortKey::ConfidenceDesc);
                assert_eq!(args.page, 2);
                assert_eq!(args.page_size, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_review_rejects_pending() {
        assert!(Cli::try_parse_from(["herdview", "diagnoses", "review", "3", "--status", "pending"]).is_err());

        let cli = Cli::try_parse_from(["herdview", "diagnoses", "review", "3", "--status", "approve"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Diagnoses(DiagnosesCommand::Review { id: 3, status: ReviewStatus::Approved, .. })
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["herdview", "whoami", "--api-url", "http://farm:8000", "-v"]).unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://farm:8000"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_unknown_severity_rejected() {
        assert!(Cli::try_parse_from(["herdview", "diagnoses", "list", "--severity", "critical"]).is_err());
    }
}
