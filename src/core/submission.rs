use crate::domain::model::{Question, SurveyResponse};
use crate::domain::ports::BackupStore;
use crate::utils::error::{Result, SurveyError};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

/// Body the backend script answers with. Only `success` is required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendReply {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
    pub data_saved: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    pub message: String,
    pub notice: &'static str,
}

/// Status and body of a bare GET against the web app.
#[derive(Debug, Clone)]
pub struct EndpointCheck {
    pub status: u16,
    pub body: String,
}

impl EndpointCheck {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one GET without survey parameters, as a deployment smoke test.
/// Any HTTP status is reported back; only network failures are errors.
pub async fn check_endpoint(client: &Client, web_app_url: &str) -> Result<EndpointCheck> {
    tracing::info!("Testing Apps Script endpoint: {}", web_app_url);
    let response = client.get(web_app_url).send().await?;

    let status = response.status();
    tracing::debug!("GET Response status: {}", status);
    let body = response.text().await?;

    Ok(EndpointCheck {
        status: status.as_u16(),
        body,
    })
}

/// Flattens a response into the backend's query parameters, in the order
/// the form sends them.
pub fn query_pairs(response: &SurveyResponse) -> Vec<(&'static str, String)> {
    let rating = |q: Question| {
        response
            .ratings
            .get(q)
            .map(|r| r.to_string())
            .unwrap_or_default()
    };

    vec![
        ("visitTypes", response.visit_types.join(",")),
        ("infoActivity", rating(Question::InfoActivity)),
        ("exhibitionInterest", rating(Question::ExhibitionInterest)),
        ("infoAdequate", rating(Question::InfoAdequate)),
        ("staffAttention", rating(Question::StaffAttention)),
        ("accessibility", rating(Question::Accessibility)),
        ("cleanliness", rating(Question::Cleanliness)),
        ("overallSatisfaction", rating(Question::OverallSatisfaction)),
        ("howFound", response.how_found.join(",")),
        ("futureActivities", response.future_activities.clone()),
        ("observations", response.observations.clone()),
        ("language", response.language.code().to_string()),
    ]
}

/// Sends survey responses to the deployed backend.
///
/// One GET per submission and no retries. Every response that passes
/// validation also goes to the backup log, whatever the outcome.
pub struct SurveySubmitter<B: BackupStore> {
    web_app_url: String,
    backup: B,
    client: Client,
}

impl<B: BackupStore> SurveySubmitter<B> {
    pub fn new(web_app_url: impl Into<String>, backup: B) -> Self {
        Self {
            web_app_url: web_app_url.into(),
            backup,
            client: Client::new(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn backup(&self) -> &B {
        &self.backup
    }

    pub fn build_url(&self, response: &SurveyResponse) -> Result<Url> {
        let mut url = Url::parse(&self.web_app_url).map_err(|e| {
            SurveyError::InvalidConfigValueError {
                field: "apps_script_url".to_string(),
                value: self.web_app_url.clone(),
                reason: format!("Invalid URL format: {}", e),
            }
        })?;

        url.query_pairs_mut()
            .extend_pairs(query_pairs(response));
        Ok(url)
    }

    pub async fn submit(&self, response: &SurveyResponse) -> Result<SubmitReceipt> {
        if !response.has_ratings() {
            tracing::warn!("Submission blocked: no ratings given");
            return Err(SurveyError::ValidationError {
                message: "at least one rating is required".to_string(),
            });
        }

        let outcome = match self.build_url(response) {
            Ok(url) => self.send(url).await,
            Err(e) => Err(e),
        };

        let backup = self.backup.append(response).await;
        if let Err(e) = &backup {
            tracing::error!("❌ Could not write local backup: {}", e);
        }

        match (outcome, backup) {
            (Err(e), Err(backup_err)) => {
                tracing::error!("❌ Error submitting to Apps Script: {}", e);
                Err(SurveyError::BackupFailed {
                    cause: e.to_string(),
                    backup: backup_err.to_string(),
                })
            }
            (outcome, _) => Self::finish(response, outcome),
        }
    }

    fn finish(response: &SurveyResponse, outcome: Result<BackendReply>) -> Result<SubmitReceipt> {
        match outcome {
            Ok(reply) => {
                tracing::info!("✅ Survey submitted successfully");
                Ok(SubmitReceipt {
                    message: reply
                        .message
                        .unwrap_or_else(|| "Survey submitted successfully".to_string()),
                    notice: response.language.submission_success_notice(),
                })
            }
            Err(e) => {
                tracing::error!("❌ Error submitting to Apps Script: {}", e);
                tracing::warn!("{}", response.language.submission_error_notice());
                Err(e)
            }
        }
    }

    async fn send(&self, url: Url) -> Result<BackendReply> {
        tracing::debug!("GET URL: {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SurveyError::TransportError {
                status: status.as_u16(),
                body,
            });
        }

        let reply: BackendReply =
            serde_json::from_str(&body).map_err(|e| SurveyError::ResponseFormatError {
                message: format!("Invalid JSON response ({}): {}", e, body),
            })?;

        if !reply.success {
            return Err(SurveyError::ResponseFormatError {
                message: reply
                    .error
                    .or(reply.message)
                    .unwrap_or_else(|| "Unknown error".to_string()),
            });
        }

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Language;
    use async_trait::async_trait;
    use httpmock::prelude::*;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MemoryBackup {
        entries: Arc<Mutex<Vec<SurveyResponse>>>,
    }

    #[async_trait]
    impl BackupStore for MemoryBackup {
        async fn append(&self, response: &SurveyResponse) -> Result<()> {
            self.entries.lock().await.push(response.clone());
            Ok(())
        }

        async fn load_all(&self) -> Result<Vec<SurveyResponse>> {
            Ok(self.entries.lock().await.clone())
        }
    }

    fn rated_response() -> SurveyResponse {
        let mut response = SurveyResponse::new(Language::En);
        response.visit_types = vec!["general-visit".to_string(), "conference".to_string()];
        response.how_found = vec!["internet".to_string()];
        response.observations = "Great & clean".to_string();
        response.ratings.set(Question::OverallSatisfaction, 5).unwrap();
        response.ratings.set(Question::Cleanliness, 4).unwrap();
        response
    }

    #[test]
    fn test_query_pairs_flatten_answers() {
        let pairs = query_pairs(&rated_response());
        let get = |name: &str| pairs.iter().find(|(k, _)| *k == name).unwrap().1.clone();

        assert_eq!(pairs.len(), 12);
        assert_eq!(get("visitTypes"), "general-visit,conference");
        assert_eq!(get("overallSatisfaction"), "5");
        assert_eq!(get("infoActivity"), "");
        assert_eq!(get("language"), "en");
    }

    #[test]
    fn test_build_url_encodes_text() {
        let submitter = SurveySubmitter::new("https://example.com/exec", MemoryBackup::default());
        let url = submitter.build_url(&rated_response()).unwrap();
        let query = url.query().unwrap();

        assert!(query.starts_with("visitTypes=general-visit%2Cconference&infoActivity=&"));
        assert!(query.contains("observations=Great+%26+clean"));
        assert!(query.ends_with("language=en"));
    }

    #[tokio::test]
    async fn test_successful_submission_is_also_backed_up() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/exec")
                .query_param("overallSatisfaction", "5")
                .query_param("cleanliness", "4")
                .query_param("language", "en");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"success": true, "message": "Data saved successfully and email sent"}));
        });

        let backup = MemoryBackup::default();
        let submitter = SurveySubmitter::new(server.url("/exec"), backup.clone());

        let receipt = submitter.submit(&rated_response()).await.unwrap();

        api_mock.assert();
        assert_eq!(receipt.message, "Data saved successfully and email sent");
        assert_eq!(receipt.notice, Language::En.submission_success_notice());
        assert_eq!(backup.load_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_no_ratings_blocks_before_network() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/exec");
            then.status(200).json_body(serde_json::json!({"success": true}));
        });

        let backup = MemoryBackup::default();
        let submitter = SurveySubmitter::new(server.url("/exec"), backup.clone());
        let response = SurveyResponse::new(Language::Es);

        let err = submitter.submit(&response).await.unwrap_err();

        assert!(matches!(err, SurveyError::ValidationError { .. }));
        api_mock.assert_hits(0);
        assert!(backup.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_backs_up_once_without_retry() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/exec");
            then.status(500).body("Internal error");
        });

        let backup = MemoryBackup::default();
        let submitter = SurveySubmitter::new(server.url("/exec"), backup.clone());

        let err = submitter.submit(&rated_response()).await.unwrap_err();

        assert!(matches!(err, SurveyError::TransportError { status: 500, .. }));
        api_mock.assert_hits(1);
        let entries = backup.load_all().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].observations, "Great & clean");
    }

    #[tokio::test]
    async fn test_unparseable_body_is_a_response_format_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/exec");
            then.status(200).body("<html>Sign in</html>");
        });

        let backup = MemoryBackup::default();
        let submitter = SurveySubmitter::new(server.url("/exec"), backup.clone());

        let err = submitter.submit(&rated_response()).await.unwrap_err();
        assert!(matches!(err, SurveyError::ResponseFormatError { .. }));
        assert_eq!(backup.load_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unsuccessful_reply_is_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/exec");
            then.status(200)
                .json_body(serde_json::json!({"success": false, "error": "Sheet not found"}));
        });

        let submitter = SurveySubmitter::new(server.url("/exec"), MemoryBackup::default());

        match submitter.submit(&rated_response()).await {
            Err(SurveyError::ResponseFormatError { message }) => {
                assert_eq!(message, "Sheet not found")
            }
            other => panic!("unexpected outcome: {:?}", other.map(|r| r.message)),
        }
    }

    struct BrokenBackup;

    #[async_trait]
    impl BackupStore for BrokenBackup {
        async fn append(&self, _response: &SurveyResponse) -> Result<()> {
            Err(SurveyError::IoError(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only backup directory",
            )))
        }

        async fn load_all(&self) -> Result<Vec<SurveyResponse>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_failed_submission_without_backup_reports_both() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/exec");
            then.status(500).body("Internal error");
        });

        let submitter = SurveySubmitter::new(server.url("/exec"), BrokenBackup);

        match submitter.submit(&rated_response()).await {
            Err(SurveyError::BackupFailed { cause, backup }) => {
                assert!(cause.contains("500"));
                assert!(backup.contains("read-only backup directory"));
            }
            other => panic!("unexpected outcome: {:?}", other.map(|r| r.message)),
        }
    }

    #[tokio::test]
    async fn test_sent_submission_survives_backup_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/exec");
            then.status(200).json_body(serde_json::json!({"success": true}));
        });

        let submitter = SurveySubmitter::new(server.url("/exec"), BrokenBackup);
        let receipt = submitter.submit(&rated_response()).await.unwrap();
        assert_eq!(receipt.message, "Survey submitted successfully");
    }

    #[tokio::test]
    async fn test_check_endpoint_reports_status_and_body() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/exec");
            then.status(200).body("Museum Survey API is running");
        });

        let check = check_endpoint(&Client::new(), &server.url("/exec")).await.unwrap();

        api_mock.assert();
        assert!(check.is_success());
        assert_eq!(check.body, "Museum Survey API is running");
    }

    #[tokio::test]
    async fn test_check_endpoint_keeps_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/exec");
            then.status(404).body("Script function not found: doGet");
        });

        let check = check_endpoint(&Client::new(), &server.url("/exec")).await.unwrap();

        assert_eq!(check.status, 404);
        assert!(!check.is_success());
        assert!(check.body.contains("doGet"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_backed_up() {
        let backup = MemoryBackup::default();
        let submitter = SurveySubmitter::new("http://127.0.0.1:1/exec", backup.clone());

        let err = submitter.submit(&rated_response()).await.unwrap_err();
        assert!(matches!(err, SurveyError::HttpError(_)));
        assert_eq!(backup.load_all().await.unwrap().len(), 1);
    }
}
