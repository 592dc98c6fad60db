use crate::utils::error::{Result, SurveyError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The seven rating questions of the survey form, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Question {
    InfoActivity,
    ExhibitionInterest,
    InfoAdequate,
    StaffAttention,
    Accessibility,
    Cleanliness,
    OverallSatisfaction,
}

impl Question {
    pub const ALL: [Question; 7] = [
        Question::InfoActivity,
        Question::ExhibitionInterest,
        Question::InfoAdequate,
        Question::StaffAttention,
        Question::Accessibility,
        Question::Cleanliness,
        Question::OverallSatisfaction,
    ];

    /// Key used by the form widgets and the backup log.
    pub fn form_key(self) -> &'static str {
        match self {
            Question::InfoActivity => "info-activity",
            Question::ExhibitionInterest => "exhibition-interest",
            Question::InfoAdequate => "info-adequate",
            Question::StaffAttention => "staff-attention",
            Question::Accessibility => "accessibility",
            Question::Cleanliness => "cleanliness",
            Question::OverallSatisfaction => "overall-satisfaction",
        }
    }

    /// Query parameter name understood by the backend script.
    pub fn param_name(self) -> &'static str {
        match self {
            Question::InfoActivity => "infoActivity",
            Question::ExhibitionInterest => "exhibitionInterest",
            Question::InfoAdequate => "infoAdequate",
            Question::StaffAttention => "staffAttention",
            Question::Accessibility => "accessibility",
            Question::Cleanliness => "cleanliness",
            Question::OverallSatisfaction => "overallSatisfaction",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Question::InfoActivity => "Information Activity",
            Question::ExhibitionInterest => "Exhibition Interest",
            Question::InfoAdequate => "Information Adequate",
            Question::StaffAttention => "Staff Attention",
            Question::Accessibility => "Accessibility",
            Question::Cleanliness => "Cleanliness",
            Question::OverallSatisfaction => "Overall Satisfaction",
        }
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.form_key())
    }
}

impl FromStr for Question {
    type Err = SurveyError;

    /// Accepts either the form key (`overall-satisfaction`) or the backend
    /// parameter name (`overallSatisfaction`).
    fn from_str(s: &str) -> Result<Self> {
        Question::ALL
            .into_iter()
            .find(|q| q.form_key() == s || q.param_name() == s)
            .ok_or_else(|| SurveyError::InvalidRating {
                question: s.to_string(),
                value: String::new(),
            })
    }
}

/// A star rating, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Rating(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Rating::new(value).ok_or_else(|| format!("rating {} is outside 1..=5", value))
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ratings(BTreeMap<Question, Rating>);

impl Ratings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a rating, rejecting values outside 1..=5.
    pub fn set(&mut self, question: Question, value: u8) -> Result<()> {
        let rating = Rating::new(value).ok_or_else(|| SurveyError::InvalidRating {
            question: question.form_key().to_string(),
            value: value.to_string(),
        })?;
        self.0.insert(question, rating);
        Ok(())
    }

    /// Parses a `question=value` pair as given on the command line.
    pub fn set_from_pair(&mut self, pair: &str) -> Result<()> {
        let (key, value) = pair.split_once('=').ok_or_else(|| SurveyError::InvalidRating {
            question: pair.to_string(),
            value: String::new(),
        })?;
        let question: Question = key.trim().parse()?;
        let value: u8 = value.trim().parse().map_err(|_| SurveyError::InvalidRating {
            question: question.form_key().to_string(),
            value: value.to_string(),
        })?;
        self.set(question, value)
    }

    pub fn get(&self, question: Question) -> Option<Rating> {
        self.0.get(&question).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
    Ca,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Es, Language::En, Language::Ca];

    pub fn code(self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
            Language::Ca => "ca",
        }
    }

    pub fn submission_success_notice(self) -> &'static str {
        match self {
            Language::Es => "✅ Encuesta enviada correctamente. ¡Gracias!",
            Language::En => "✅ Survey sent successfully. Thank you!",
            Language::Ca => "✅ Enquesta enviada correctament. Gràcies!",
        }
    }

    pub fn submission_error_notice(self) -> &'static str {
        match self {
            Language::Es => {
                "Error al preparar el envío. Su respuesta se guardó localmente como respaldo."
            }
            Language::En => "Error preparing submission. Your response was saved locally as backup.",
            Language::Ca => {
                "Error al preparar l'enviament. La vostra resposta s'ha guardat localment com a còpia de seguretat."
            }
        }
    }

    /// The form shows this one bilingual regardless of the selected language.
    pub fn missing_ratings_alert() -> &'static str {
        "Por favor, califique al menos un aspecto del museo / Please rate at least one aspect of the museum"
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = SurveyError;

    fn from_str(s: &str) -> Result<Self> {
        Language::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SurveyError::InvalidConfigValueError {
                field: "language".to_string(),
                value: s.to_string(),
                reason: "Supported languages are es, en, ca".to_string(),
            })
    }
}

/// One visitor's answers. Serialized shape is the backup log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub visit_types: Vec<String>,
    #[serde(default)]
    pub how_found: Vec<String>,
    #[serde(default)]
    pub future_activities: String,
    #[serde(default)]
    pub observations: String,
    #[serde(default)]
    pub ratings: Ratings,
}

impl SurveyResponse {
    pub fn new(language: Language) -> Self {
        Self {
            timestamp: Utc::now(),
            language,
            visit_types: Vec::new(),
            how_found: Vec::new(),
            future_activities: String::new(),
            observations: String::new(),
            ratings: Ratings::new(),
        }
    }

    pub fn has_ratings(&self) -> bool {
        !self.ratings.is_empty()
    }
}
