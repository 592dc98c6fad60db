use crate::domain::model::{Language, SurveyResponse};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "museum-survey")]
#[command(about = "Generate and operate a museum visitor survey")]
pub struct Cli {
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render every deployment artifact for a museum
    Generate {
        /// Path to the museum TOML configuration
        #[arg(short, long, default_value = "museum.toml")]
        config: PathBuf,

        #[arg(short, long, default_value = "./dist")]
        output: PathBuf,

        /// Also write all artifacts into one zip archive
        #[arg(long)]
        bundle: bool,

        /// TOML table of extra `file_name = "template"` entries
        #[arg(long)]
        templates: Option<PathBuf>,
    },

    /// Send one survey response to the deployed backend
    Submit(SubmitArgs),

    /// Export the local backup log as CSV
    Export {
        #[arg(long, default_value = ".")]
        backup_dir: PathBuf,

        /// Defaults to museum-survey-all-data-<date>.csv in the backup dir
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show which email the backend would send for the given ratings
    Simulate {
        #[arg(short, long, default_value = "museum.toml")]
        config: PathBuf,

        #[arg(long = "rating", value_name = "QUESTION=VALUE")]
        ratings: Vec<String>,
    },

    /// Send one bare GET to the web app and print its status and body
    TestEndpoint {
        #[arg(short, long, default_value = "museum.toml")]
        config: PathBuf,
    },

    /// Print the configured endpoint and the backup log size
    Status {
        #[arg(short, long, default_value = "museum.toml")]
        config: PathBuf,

        #[arg(long, default_value = ".")]
        backup_dir: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
pub struct SubmitArgs {
    #[arg(short, long, default_value = "museum.toml")]
    pub config: PathBuf,

    /// Directory holding museumSurveyBackup.json
    #[arg(long, default_value = ".")]
    pub backup_dir: PathBuf,

    #[arg(long = "rating", value_name = "QUESTION=VALUE")]
    pub ratings: Vec<String>,

    #[arg(long = "visit-type", value_delimiter = ',')]
    pub visit_types: Vec<String>,

    #[arg(long = "how-found", value_delimiter = ',')]
    pub how_found: Vec<String>,

    #[arg(long, default_value = "")]
    pub future_activities: String,

    #[arg(long, default_value = "")]
    pub observations: String,

    /// es, en or ca; defaults to the museum's default language
    #[arg(long)]
    pub language: Option<String>,
}

impl SubmitArgs {
    pub fn to_response(&self, default_language: Language) -> Result<SurveyResponse> {
        let language = match &self.language {
            Some(code) => code.parse()?,
            None => default_language,
        };

        let mut response = SurveyResponse::new(language);
        for pair in &self.ratings {
            response.ratings.set_from_pair(pair)?;
        }
        response.visit_types = self.visit_types.clone();
        response.how_found = self.how_found.clone();
        response.future_activities = self.future_activities.clone();
        response.observations = self.observations.clone();
        Ok(response)
    }
}

impl Validate for SubmitArgs {
    fn validate(&self) -> Result<()> {
        validation::validate_path("config", &self.config.to_string_lossy())?;
        validation::validate_path("backup_dir", &self.backup_dir.to_string_lossy())
    }
}
