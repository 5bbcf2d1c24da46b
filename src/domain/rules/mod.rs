// Domain rules - Business logic and policies

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::utils::time::TimestampParser;

/// Outcome of validating a job form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Offending fields, in the order they were found
    pub invalid: Vec<JobField>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty()
    }

    pub fn is_invalid(&self, field: JobField) -> bool {
        self.invalid.contains(&field)
    }

    fn mark(&mut self, field: JobField) {
        if !self.invalid.contains(&field) {
            self.invalid.push(field);
        }
    }

    /// Convert a failed report into a domain error naming every field
    pub fn into_result(self) -> Result<(), DomainError> {
        if self.is_valid() {
            return Ok(());
        }
        let fields: Vec<&str> = self.invalid.iter().map(|f| f.form_name()).collect();
        Err(DomainError::ValidationFailed(format!(
            "invalid fields: {}",
            fields.join(", ")
        )))
    }
}

/// Business rules for clip job submission
pub struct JobValidator {
    parser: TimestampParser,
}

impl JobValidator {
    pub fn new(rate: FrameRate) -> Self {
        Self {
            parser: TimestampParser::new(rate),
        }
    }

    /// Check every rule and collect all offending fields
    pub fn validate(&self, job: &ClipJob) -> ValidationReport {
        let mut report = ValidationReport::default();

        if job.start_tc.is_empty() {
            report.mark(JobField::StartTc);
        }
        if job.end_tc.is_empty() {
            report.mark(JobField::EndTc);
        }
        if !job.start_tc.is_empty() && !job.end_tc.is_empty() && !self.is_ordered(job) {
            report.mark(JobField::StartTc);
            report.mark(JobField::EndTc);
        }
        if job.presenter.is_empty() {
            report.mark(JobField::Presenter);
        }
        if job.title.is_empty() {
            report.mark(JobField::Title);
        }
        if job.talk_id.is_empty() {
            report.mark(JobField::TalkId);
        }

        report
    }

    /// In-point strictly before out-point; unreadable points count as disordered
    fn is_ordered(&self, job: &ClipJob) -> bool {
        match (
            self.parser.entry_to_seconds(&job.start_tc),
            self.parser.entry_to_seconds(&job.end_tc),
        ) {
            (Ok(start), Ok(end)) => start < end,
            _ => false,
        }
    }
}
