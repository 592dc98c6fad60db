//! The backend script's alert rules, mirrored in Rust.
//!
//! The deployed script decides who gets an email and with which subject.
//! `NotificationPolicy` applies the same rules to the same inputs so they
//! can be previewed from the CLI and checked in tests without a deployment.

use crate::config::MuseumConfig;
use crate::domain::model::Question;
use serde::Serialize;
use std::collections::HashMap;

/// Spreadsheet columns, in the order the backend appends them.
pub const SHEET_HEADERS: [&str; 13] = [
    "Timestamp",
    "Visit Types",
    "Info Activity",
    "Exhibition Interest",
    "Info Adequate",
    "Staff Attention",
    "Accessibility",
    "Cleanliness",
    "Overall Satisfaction",
    "How Found Us",
    "Future Activities",
    "Observations",
    "Language",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Normal,
    Alert,
    Critical,
}

impl AlertLevel {
    pub fn priority(self) -> &'static str {
        match self {
            AlertLevel::Critical => "high",
            AlertLevel::Alert | AlertLevel::Normal => "normal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub level: AlertLevel,
    pub subject: String,
    pub recipients: Vec<String>,
    pub average_rating: f64,
    pub low_ratings: Vec<Question>,
}

/// Ratings as the backend reads them: unparseable or missing values count
/// as 0 and are ignored afterwards.
pub fn ratings_from_params(params: &HashMap<String, String>) -> Vec<(Question, u8)> {
    Question::ALL
        .into_iter()
        .map(|q| {
            let value = params
                .get(q.param_name())
                .and_then(|v| v.trim().parse::<u8>().ok())
                .unwrap_or(0);
            (q, value)
        })
        .collect()
}

/// The 13 spreadsheet cells for one request, timestamp first.
pub fn sheet_row(timestamp: &str, params: &HashMap<String, String>) -> Vec<String> {
    let param = |name: &str| params.get(name).cloned().unwrap_or_default();

    let mut row = vec![timestamp.to_string(), param("visitTypes")];
    row.extend(Question::ALL.into_iter().map(|q| param(q.param_name())));
    row.push(param("howFound"));
    row.push(param("futureActivities"));
    row.push(param("observations"));
    row.push(
        params
            .get("language")
            .filter(|l| !l.is_empty())
            .cloned()
            .unwrap_or_else(|| "es".to_string()),
    );
    row
}

/// Red below the threshold, orange at it, yellow one above, green otherwise.
pub fn rating_color(rating: f64, threshold: u8) -> &'static str {
    let threshold = f64::from(threshold);
    if rating <= threshold - 1.0 {
        "#f44336"
    } else if rating <= threshold {
        "#ff9800"
    } else if rating <= threshold + 1.0 {
        "#ffc107"
    } else {
        "#4caf50"
    }
}

#[derive(Debug, Clone)]
pub struct NotificationPolicy {
    museum_name: String,
    primary_email: String,
    alert_email: String,
    low_rating_threshold: u8,
    critical_rating_threshold: u8,
    send_alerts_only: bool,
}

impl NotificationPolicy {
    pub fn from_config(config: &MuseumConfig) -> Self {
        Self {
            museum_name: config.museum_name().to_string(),
            primary_email: config.primary_email.clone().unwrap_or_default(),
            alert_email: config.alert_email.clone().unwrap_or_default(),
            low_rating_threshold: config.low_rating_threshold,
            critical_rating_threshold: config.critical_rating_threshold,
            send_alerts_only: config.send_alerts_only,
        }
    }

    pub fn evaluate_params(&self, params: &HashMap<String, String>) -> Option<Notification> {
        self.evaluate(&ratings_from_params(params))
    }

    /// `None` means the backend sends no email for this submission.
    pub fn evaluate(&self, ratings: &[(Question, u8)]) -> Option<Notification> {
        let given: Vec<(Question, u8)> = ratings.iter().copied().filter(|(_, r)| *r > 0).collect();

        let average_rating = if given.is_empty() {
            0.0
        } else {
            given.iter().map(|(_, r)| f64::from(*r)).sum::<f64>() / given.len() as f64
        };

        let low_ratings: Vec<Question> = given
            .iter()
            .filter(|(_, r)| *r <= self.low_rating_threshold)
            .map(|(q, _)| *q)
            .collect();
        let has_low = !low_ratings.is_empty();
        let has_critical = given
            .iter()
            .any(|(_, r)| *r <= self.critical_rating_threshold);

        if self.send_alerts_only && !has_low {
            tracing::debug!("Alerts-only mode and no low ratings, skipping email");
            return None;
        }

        let (level, subject) = if has_critical {
            (
                AlertLevel::Critical,
                format!("🚨 CRITICAL: {} Survey - Low Satisfaction Alert", self.museum_name),
            )
        } else if has_low {
            (
                AlertLevel::Alert,
                format!("⚠️ ALERT: {} Survey - Below Expected Rating", self.museum_name),
            )
        } else {
            (
                AlertLevel::Normal,
                format!("📊 {} Survey - New Response", self.museum_name),
            )
        };

        let recipients = if has_low {
            vec![self.primary_email.clone(), self.alert_email.clone()]
        } else {
            vec![self.primary_email.clone()]
        };

        Some(Notification {
            level,
            subject,
            recipients,
            average_rating,
            low_ratings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(low: u8, alerts_only: bool) -> NotificationPolicy {
        NotificationPolicy::from_config(&MuseumConfig {
            museum_name: Some("Museu de Finestrat".to_string()),
            primary_email: Some("museum@finestrat.org".to_string()),
            alert_email: Some("manager@finestrat.org".to_string()),
            low_rating_threshold: low,
            critical_rating_threshold: 1,
            send_alerts_only: alerts_only,
            ..MuseumConfig::default()
        })
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_low_overall_rating_alerts_both_recipients() {
        let notification = policy(3, false)
            .evaluate_params(&params(&[("overallSatisfaction", "2")]))
            .unwrap();

        assert_eq!(notification.level, AlertLevel::Alert);
        assert_eq!(
            notification.recipients,
            vec!["museum@finestrat.org", "manager@finestrat.org"]
        );
        assert_eq!(notification.low_ratings, vec![Question::OverallSatisfaction]);
        assert!(notification.subject.starts_with("⚠️ ALERT: Museu de Finestrat"));
    }

    #[test]
    fn test_high_rating_goes_to_primary_only() {
        let notification = policy(3, false)
            .evaluate_params(&params(&[("overallSatisfaction", "5")]))
            .unwrap();

        assert_eq!(notification.level, AlertLevel::Normal);
        assert_eq!(notification.recipients, vec!["museum@finestrat.org"]);
        assert_eq!(notification.average_rating, 5.0);
    }

    #[test]
    fn test_critical_rating() {
        let notification = policy(3, false)
            .evaluate_params(&params(&[("cleanliness", "1"), ("staffAttention", "5")]))
            .unwrap();

        assert_eq!(notification.level, AlertLevel::Critical);
        assert_eq!(notification.level.priority(), "high");
        assert_eq!(notification.average_rating, 3.0);
    }

    #[test]
    fn test_alerts_only_skips_good_submissions() {
        let policy = policy(3, true);
        assert!(policy
            .evaluate_params(&params(&[("overallSatisfaction", "4")]))
            .is_none());
        assert!(policy
            .evaluate_params(&params(&[("overallSatisfaction", "3")]))
            .is_some());
    }

    #[test]
    fn test_unparseable_ratings_are_ignored() {
        let notification = policy(3, false)
            .evaluate_params(&params(&[("overallSatisfaction", ""), ("cleanliness", "abc")]))
            .unwrap();
        assert_eq!(notification.average_rating, 0.0);
        assert_eq!(notification.level, AlertLevel::Normal);
    }

    #[test]
    fn test_sheet_row_order() {
        let row = sheet_row(
            "2025-03-01 10:00:00",
            &params(&[("visitTypes", "conference"), ("overallSatisfaction", "4")]),
        );
        assert_eq!(row.len(), SHEET_HEADERS.len());
        assert_eq!(row[1], "conference");
        assert_eq!(row[8], "4");
        assert_eq!(row[12], "es");
    }

    #[test]
    fn test_rating_color_bands() {
        assert_eq!(rating_color(2.0, 3), "#f44336");
        assert_eq!(rating_color(3.0, 3), "#ff9800");
        assert_eq!(rating_color(4.0, 3), "#ffc107");
        assert_eq!(rating_color(4.5, 3), "#4caf50");
    }
}
