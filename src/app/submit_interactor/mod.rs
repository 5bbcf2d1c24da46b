// Submit interactor - Orchestrates the clip job submission use case

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Job form being filled in by the operator.
///
/// Picking a talk from the catalog fills title, presenter and talk id and
/// locks them; clearing the pick empties and unlocks them again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobDraft {
    job: ClipJob,
    talk_locked: bool,
}

impl JobDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn job(&self) -> &ClipJob {
        &self.job
    }

    pub fn is_talk_locked(&self) -> bool {
        self.talk_locked
    }

    /// Fill a talk from the catalog, or clear the talk fields with `None`
    pub fn select_talk(
        &mut self,
        talk_id: Option<u64>,
        catalog: &TalkCatalog,
    ) -> Result<(), DomainError> {
        match talk_id {
            Some(id) => {
                let talk = catalog
                    .get(id)
                    .ok_or_else(|| DomainError::BadArgs(format!("Unknown talk id: {}", id)))?;
                self.job = std::mem::take(&mut self.job).with_talk(id, talk);
                self.talk_locked = true;
            }
            None => {
                self.job.talk_id.clear();
                self.job.title.clear();
                self.job.presenter.clear();
                self.talk_locked = false;
            }
        }
        Ok(())
    }

    /// Set one form field; talk fields are read-only while a talk is selected
    pub fn set_field(&mut self, field: JobField, value: &str) -> Result<(), DomainError> {
        let slot = match field {
            JobField::StartTc => &mut self.job.start_tc,
            JobField::EndTc => &mut self.job.end_tc,
            JobField::Video => &mut self.job.video,
            JobField::Presenter | JobField::Title | JobField::TalkId if self.talk_locked => {
                return Err(DomainError::BadArgs(format!(
                    "{} is filled from the selected talk",
                    field
                )))
            }
            JobField::Presenter => &mut self.job.presenter,
            JobField::Title => &mut self.job.title,
            JobField::TalkId => &mut self.job.talk_id,
        };
        *slot = value.to_string();
        Ok(())
    }

    /// Copy in/out points from the transport mark fields
    pub fn apply_marks(&mut self, marks: &MarkFields) {
        self.job = std::mem::take(&mut self.job).with_marks(marks);
    }
}

/// Interactor for clip job submission
pub struct SubmitInteractor {
    job_port: Arc<dyn JobPort>,
    validator: JobValidator,
}

impl SubmitInteractor {
    /// Create new submit interactor with injected ports
    pub fn new(job_port: Arc<dyn JobPort>, rate: FrameRate) -> Self {
        Self {
            job_port,
            validator: JobValidator::new(rate),
        }
    }

    /// Validate without submitting
    pub fn check(&self, job: &ClipJob) -> ValidationReport {
        self.validator.validate(job)
    }

    /// Validate the job and post it; nothing is sent unless every rule passes
    pub async fn execute(&self, job: &ClipJob) -> Result<JobReceipt, DomainError> {
        if let Err(e) = self.check(job).into_result() {
            warn!("Job not submitted: {}", e);
            return Err(e);
        }

        info!(
            "Submitting job {} -> {} for talk {}",
            job.start_tc, job.end_tc, job.talk_id
        );
        self.job_port.submit(job).await
    }
}
