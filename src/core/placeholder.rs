//! `{{TOKEN}}` substitution over a closed token set.
//!
//! Rendering is a single regex pass: each match is looked up once and the
//! replacement text is never scanned again, so configuration values that
//! happen to contain `{{...}}` come out verbatim. Unknown tokens are left
//! untouched and absent values render as the empty string.

use crate::config::MuseumConfig;
use crate::utils::error::{Result, SurveyError};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Z_]+)\}\}").expect("valid placeholder pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Token {
    MuseumName,
    MuseumNameUpper,
    MuseumShortName,
    MuseumAddress,
    MuseumContact,
    LogoFilename,
    GoogleSheetId,
    AppsScriptUrl,
    PrimaryEmail,
    AlertEmail,
    LowRatingThreshold,
    CriticalRatingThreshold,
    SendEmailOnEverySubmission,
    SendAlertsOnly,
    DefaultLanguage,
    SupportedLanguages,
    EmailFrequency,
}

impl Token {
    pub const ALL: [Token; 17] = [
        Token::MuseumName,
        Token::MuseumNameUpper,
        Token::MuseumShortName,
        Token::MuseumAddress,
        Token::MuseumContact,
        Token::LogoFilename,
        Token::GoogleSheetId,
        Token::AppsScriptUrl,
        Token::PrimaryEmail,
        Token::AlertEmail,
        Token::LowRatingThreshold,
        Token::CriticalRatingThreshold,
        Token::SendEmailOnEverySubmission,
        Token::SendAlertsOnly,
        Token::DefaultLanguage,
        Token::SupportedLanguages,
        Token::EmailFrequency,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Token::MuseumName => "MUSEUM_NAME",
            Token::MuseumNameUpper => "MUSEUM_NAME_UPPER",
            Token::MuseumShortName => "MUSEUM_SHORT_NAME",
            Token::MuseumAddress => "MUSEUM_ADDRESS",
            Token::MuseumContact => "MUSEUM_CONTACT",
            Token::LogoFilename => "LOGO_FILENAME",
            Token::GoogleSheetId => "GOOGLE_SHEET_ID",
            Token::AppsScriptUrl => "APPS_SCRIPT_URL",
            Token::PrimaryEmail => "PRIMARY_EMAIL",
            Token::AlertEmail => "ALERT_EMAIL",
            Token::LowRatingThreshold => "LOW_RATING_THRESHOLD",
            Token::CriticalRatingThreshold => "CRITICAL_RATING_THRESHOLD",
            Token::SendEmailOnEverySubmission => "SEND_EMAIL_ON_EVERY_SUBMISSION",
            Token::SendAlertsOnly => "SEND_ALERTS_ONLY",
            Token::DefaultLanguage => "DEFAULT_LANGUAGE",
            Token::SupportedLanguages => "SUPPORTED_LANGUAGES",
            Token::EmailFrequency => "EMAIL_FREQUENCY",
        }
    }

    pub fn from_name(name: &str) -> Option<Token> {
        Token::ALL.into_iter().find(|t| t.name() == name)
    }

    /// The marker as it appears in a template, e.g. `{{MUSEUM_NAME}}`.
    pub fn placeholder(self) -> String {
        format!("{{{{{}}}}}", self.name())
    }
}

/// Resolved string for every token, derived fields included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenValues {
    values: BTreeMap<Token, String>,
}

impl TokenValues {
    pub fn from_config(config: &MuseumConfig) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();

        let values = Token::ALL
            .into_iter()
            .map(|token| {
                let value = match token {
                    Token::MuseumName => config.museum_name().to_string(),
                    Token::MuseumNameUpper => config.museum_name_upper(),
                    Token::MuseumShortName => config.museum_short_name(),
                    Token::MuseumAddress => text(&config.museum_address),
                    Token::MuseumContact => text(&config.museum_contact),
                    Token::LogoFilename => text(&config.logo_file_name),
                    Token::GoogleSheetId => text(&config.google_sheet_id),
                    Token::AppsScriptUrl => text(&config.apps_script_url),
                    Token::PrimaryEmail => text(&config.primary_email),
                    Token::AlertEmail => text(&config.alert_email),
                    Token::LowRatingThreshold => config.low_rating_threshold.to_string(),
                    Token::CriticalRatingThreshold => config.critical_rating_threshold.to_string(),
                    Token::SendEmailOnEverySubmission => {
                        config.send_email_on_every_submission.to_string()
                    }
                    Token::SendAlertsOnly => config.send_alerts_only.to_string(),
                    Token::DefaultLanguage => config.default_language.code().to_string(),
                    Token::SupportedLanguages => config.supported_languages_label(),
                    Token::EmailFrequency => text(&config.email_frequency),
                };
                (token, value)
            })
            .collect();

        Self { values }
    }

    pub fn get(&self, token: Token) -> &str {
        self.values.get(&token).map(String::as_str).unwrap_or("")
    }

    pub fn apply(&self, template: &str) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures| match Token::from_name(&caps[1]) {
                Some(token) => self.get(token).to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

pub fn render(template: &str, config: &MuseumConfig) -> String {
    TokenValues::from_config(config).apply(template)
}

/// Renders a template that arrived as loosely typed data. Anything other
/// than a string is rejected as malformed.
pub fn render_value(name: &str, template: &toml::Value, config: &MuseumConfig) -> Result<String> {
    let source = template_source(name, template.clone())?;
    Ok(render(&source, config))
}

pub(crate) fn template_source(name: &str, value: toml::Value) -> Result<String> {
    match value {
        toml::Value::String(source) => Ok(source),
        other => Err(SurveyError::MalformedTemplate {
            name: name.to_string(),
            found: other.type_str().to_string(),
        }),
    }
}
