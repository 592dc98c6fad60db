use crate::domain::model::SurveyResponse;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn location(&self, path: &str) -> String;
}

/// Append-only log of submissions kept for manual recovery.
#[async_trait]
pub trait BackupStore: Send + Sync {
    async fn append(&self, response: &SurveyResponse) -> Result<()>;
    async fn load_all(&self) -> Result<Vec<SurveyResponse>>;
}
