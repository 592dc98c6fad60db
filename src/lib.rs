pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::Cli;

pub use crate::adapters::{LocalStorage, StorageBackupLog};
pub use crate::config::MuseumConfig;
pub use crate::core::{
    catalog::{TemplateCatalog, TemplateKind},
    export::export_csv,
    generator::ArtifactGenerator,
    notify::NotificationPolicy,
    placeholder::{render, Token, TokenValues},
    submission::SurveySubmitter,
};
pub use crate::utils::error::{Result, SurveyError};
