// Talk catalog - metadata used to autofill the job form

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Title and presenter of one scheduled talk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalkInfo {
    pub title: String,
    pub presenter: String,
}

#[derive(Debug, Deserialize)]
struct ScheduleEntry {
    id: u64,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    speaker: String,
}

/// Talks keyed by schedule id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TalkCatalog {
    talks: BTreeMap<u64, TalkInfo>,
}

impl TalkCatalog {
    /// Build a catalog from a schedule JSON array, keeping only `"talk"` entries
    pub fn from_schedule_json(json: &str) -> Result<Self, DomainError> {
        let entries: Vec<ScheduleEntry> = serde_json::from_str(json)
            .map_err(|e| DomainError::BadArgs(format!("Invalid schedule JSON: {}", e)))?;

        let talks = entries
            .into_iter()
            .filter(|entry| entry.kind == "talk")
            .map(|entry| {
                (
                    entry.id,
                    TalkInfo {
                        title: entry.title,
                        presenter: entry.speaker,
                    },
                )
            })
            .collect();

        Ok(Self { talks })
    }

    pub fn get(&self, talk_id: u64) -> Option<&TalkInfo> {
        self.talks.get(&talk_id)
    }

    pub fn len(&self) -> usize {
        self.talks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.talks.is_empty()
    }

    /// Talks ordered by title, as offered in the talk picker
    pub fn sorted_by_title(&self) -> Vec<(u64, &TalkInfo)> {
        let mut talks: Vec<(u64, &TalkInfo)> =
            self.talks.iter().map(|(id, talk)| (*id, talk)).collect();
        talks.sort_by(|a, b| a.1.title.cmp(&b.1.title));
        talks
    }
}
