use crate::domain::model::Language;
use crate::utils::error::{Result, SurveyError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

static NAME_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(museu de |museo de |museum of )").expect("valid name prefix pattern")
});

/// Per-museum settings stamped into the generated artifacts.
///
/// Text fields are optional; an absent one renders as an empty string.
/// Thresholds and switches always carry a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MuseumConfig {
    pub museum_name: Option<String>,
    pub museum_address: Option<String>,
    pub museum_contact: Option<String>,
    pub logo_file_name: Option<String>,
    pub google_sheet_id: Option<String>,
    pub apps_script_url: Option<String>,
    pub primary_email: Option<String>,
    pub alert_email: Option<String>,
    pub low_rating_threshold: u8,
    pub critical_rating_threshold: u8,
    pub send_email_on_every_submission: bool,
    pub send_alerts_only: bool,
    pub default_language: Language,
    pub supported_languages: Vec<Language>,
    pub email_frequency: Option<String>,
}

impl Default for MuseumConfig {
    fn default() -> Self {
        Self {
            museum_name: None,
            museum_address: None,
            museum_contact: None,
            logo_file_name: None,
            google_sheet_id: None,
            apps_script_url: None,
            primary_email: None,
            alert_email: None,
            low_rating_threshold: 3,
            critical_rating_threshold: 2,
            send_email_on_every_submission: true,
            send_alerts_only: false,
            default_language: Language::Es,
            supported_languages: Language::ALL.to_vec(),
            email_frequency: None,
        }
    }
}

impl MuseumConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SurveyError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses the configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    pub fn museum_name(&self) -> &str {
        self.museum_name.as_deref().unwrap_or("")
    }

    pub fn museum_name_upper(&self) -> String {
        self.museum_name().to_uppercase()
    }

    /// Museum name without a leading "Museu de" / "Museo de" / "Museum of".
    pub fn museum_short_name(&self) -> String {
        NAME_PREFIX.replace(self.museum_name(), "").into_owned()
    }

    pub fn supported_languages_label(&self) -> String {
        self.supported_languages
            .iter()
            .map(|l| l.code())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn validate_config(&self) -> Result<()> {
        let name = validation::validate_required_field("museum_name", &self.museum_name)?;
        validation::validate_non_empty_string("museum_name", name)?;

        validation::validate_range("low_rating_threshold", self.low_rating_threshold, 1, 5)?;
        validation::validate_range(
            "critical_rating_threshold",
            self.critical_rating_threshold,
            1,
            5,
        )?;
        if self.critical_rating_threshold > self.low_rating_threshold {
            return Err(SurveyError::ConfigValidationError {
                field: "critical_rating_threshold".to_string(),
                message: format!(
                    "critical threshold {} must not exceed low threshold {}",
                    self.critical_rating_threshold, self.low_rating_threshold
                ),
            });
        }

        if let Some(url) = &self.apps_script_url {
            validation::validate_url("apps_script_url", url)?;
        }
        if let Some(email) = &self.primary_email {
            validation::validate_email("primary_email", email)?;
        }
        if let Some(email) = &self.alert_email {
            validation::validate_email("alert_email", email)?;
        }

        if !self.supported_languages.is_empty()
            && !self.supported_languages.contains(&self.default_language)
        {
            return Err(SurveyError::InvalidConfigValueError {
                field: "default_language".to_string(),
                value: self.default_language.to_string(),
                reason: format!(
                    "Not among supported languages: {}",
                    self.supported_languages_label()
                ),
            });
        }

        Ok(())
    }
}

impl Validate for MuseumConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

/// Replaces `${VAR}` with the environment value; unset variables stay as written.
pub(crate) fn substitute_env_vars(content: &str) -> String {
    ENV_VAR
        .replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
}
