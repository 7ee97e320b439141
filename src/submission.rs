use crate::cache::EnergyCache;
use crate::client::{EnergyClient, SAVE_FAILED_MESSAGE, SubmitError};
use crate::models::{NewEntry, Toast, ToastVariant};
use serde::Serialize;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tracing::{info, warn};

pub const MIN_NOTE_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Rate your day first.")]
    MissingScore,
    #[error("Score must be between 1 and 5.")]
    ScoreOutOfRange,
    #[error("Add a short note, at least 3 characters.")]
    NotesTooShort,
}

pub fn validate(score: Option<i64>, notes: &str) -> Result<NewEntry, ValidationError> {
    let score = score.ok_or(ValidationError::MissingScore)?;
    let score = u8::try_from(score)
        .ok()
        .filter(|score| (1..=5).contains(score))
        .ok_or(ValidationError::ScoreOutOfRange)?;

    let thoughts = notes.trim();
    if thoughts.chars().count() < MIN_NOTE_CHARS {
        return Err(ValidationError::NotesTooShort);
    }

    Ok(NewEntry {
        score,
        thoughts: thoughts.to_string(),
    })
}

/// Local state of the add-entry dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct DialogState {
    pub open: bool,
    pub score: Option<i64>,
    pub notes: String,
    pub error: Option<String>,
}

impl DialogState {
    pub fn opened_with(score: Option<i64>, notes: impl Into<String>) -> Self {
        Self {
            open: true,
            score,
            notes: notes.into(),
            error: None,
        }
    }

    pub fn select_score(&mut self, score: u8) {
        self.score = Some(i64::from(score));
        self.error = None;
    }

    pub fn edit_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
        self.error = None;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.error = None;
    }

    pub fn reset(&mut self) {
        self.score = None;
        self.notes.clear();
        self.error = None;
    }

    pub fn can_save(&self, pending: bool) -> bool {
        !pending && self.score.is_some() && self.notes.trim().chars().count() >= MIN_NOTE_CHARS
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Invalid(ValidationError),
    Busy,
    Saved(Toast),
    Failed { toast: Toast, error: SubmitError },
}

pub struct SubmissionFlow {
    client: EnergyClient,
    cache: EnergyCache,
    pending: AtomicBool,
}

struct PendingGuard<'a>(&'a AtomicBool);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SubmissionFlow {
    pub fn new(client: EnergyClient, cache: EnergyCache) -> Arc<Self> {
        Arc::new(Self {
            client,
            cache,
            pending: AtomicBool::new(false),
        })
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Option<PendingGuard<'_>> {
        self.pending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| PendingGuard(&self.pending))
    }

    pub async fn submit(&self, dialog: &mut DialogState) -> SubmitOutcome {
        let entry = match validate(dialog.score, &dialog.notes) {
            Ok(entry) => entry,
            Err(err) => {
                dialog.error = Some(err.to_string());
                return SubmitOutcome::Invalid(err);
            }
        };
        dialog.error = None;

        let Some(_guard) = self.begin() else {
            return SubmitOutcome::Busy;
        };

        match self.client.create_entry(&entry).await {
            Ok(_) => {
                info!(score = entry.score, "energy entry saved");
                self.cache.invalidate().await;
                dialog.reset();
                dialog.close();
                SubmitOutcome::Saved(Toast {
                    title: "Entry saved".into(),
                    description: "Statistics were refreshed with the new entry.".into(),
                    variant: ToastVariant::Default,
                })
            }
            Err(err) => {
                warn!(status = ?err.status(), error = %err, "saving energy entry failed");
                let message = err.to_string();
                let message = if message.trim().is_empty() {
                    SAVE_FAILED_MESSAGE.to_string()
                } else {
                    message
                };
                dialog.error = Some(message.clone());
                SubmitOutcome::Failed {
                    toast: Toast {
                        title: "Saving failed".into(),
                        description: message,
                        variant: ToastVariant::Destructive,
                    },
                    error: err,
                }
            }
        }
    }
}
