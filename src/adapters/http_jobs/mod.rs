// HTTP job adapter - Posts clip jobs to the backend build endpoint

use async_trait::async_trait;
use reqwest::multipart::Form;
use tracing::info;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::error::VideologResult;
use crate::ports::*;

/// Route of the build endpoint below the API base URL
pub const BUILD_ROUTE: &str = "/api/v1/build";

/// Backend job API over HTTP
pub struct HttpJobAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl HttpJobAdapter {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_url(&self) -> String {
        format!("{}{}", self.base_url, BUILD_ROUTE)
    }

    /// Multipart body with one text part per job field
    pub fn form_for(job: &ClipJob) -> Form {
        job.form_fields()
            .into_iter()
            .fold(Form::new(), |form, (field, value)| {
                form.text(field.form_name(), value.to_string())
            })
    }

    async fn post(&self, job: &ClipJob) -> VideologResult<JobReceipt> {
        let response = self
            .client
            .post(self.build_url())
            .multipart(Self::form_for(job))
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<JobReceipt>().await?)
    }
}

#[async_trait]
impl JobPort for HttpJobAdapter {
    async fn submit(&self, job: &ClipJob) -> Result<JobReceipt, DomainError> {
        let receipt = self
            .post(job)
            .await
            .map_err(|e| DomainError::JobSubmissionFailed(e.to_string()))?;

        info!("New job ID: {}", receipt.result_id);
        Ok(receipt)
    }
}
