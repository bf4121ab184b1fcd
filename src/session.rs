//! Per-session console state: settings, form values and one submission
//! state machine per form.

use crate::config::Config;
use crate::models::{
    FormKind, FormState, FormView, RequestResult, Settings, SubmissionPhase, SubmissionView,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Submission state machine of a single form.
///
/// `Idle -> Loading -> (Succeeded | Failed)`, re-entered on every submit.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Idle,
    Loading {
        started_at: DateTime<Utc>,
    },
    Succeeded {
        result: RequestResult,
        finished_at: DateTime<Utc>,
    },
    Failed {
        result: RequestResult,
        finished_at: DateTime<Utc>,
    },
}

impl SubmissionState {
    fn completed(result: RequestResult) -> Self {
        let finished_at = Utc::now();
        if result.is_success() {
            SubmissionState::Succeeded {
                result,
                finished_at,
            }
        } else {
            SubmissionState::Failed {
                result,
                finished_at,
            }
        }
    }

    pub fn phase(&self) -> SubmissionPhase {
        match self {
            SubmissionState::Idle => SubmissionPhase::Idle,
            SubmissionState::Loading { .. } => SubmissionPhase::Loading,
            SubmissionState::Succeeded { .. } => SubmissionPhase::Succeeded,
            SubmissionState::Failed { .. } => SubmissionPhase::Failed,
        }
    }

    pub fn result(&self) -> Option<&RequestResult> {
        match self {
            SubmissionState::Succeeded { result, .. } | SubmissionState::Failed { result, .. } => {
                Some(result)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct FormSlot {
    values: FormState,
    state: SubmissionState,
    generation: u64,
}

impl FormSlot {
    fn new(kind: FormKind) -> Self {
        Self {
            values: FormState::defaults(kind),
            state: SubmissionState::Idle,
            generation: 0,
        }
    }

    fn view(&self) -> FormView {
        let updated_at = match &self.state {
            SubmissionState::Idle => None,
            SubmissionState::Loading { started_at } => Some(*started_at),
            SubmissionState::Succeeded { finished_at, .. }
            | SubmissionState::Failed { finished_at, .. } => Some(*finished_at),
        };

        FormView {
            form: self.values.kind(),
            values: self.values.to_json(),
            submission: SubmissionView {
                phase: self.state.phase(),
                generation: self.generation,
                result: self.state.result().cloned(),
                updated_at,
            },
        }
    }
}

/// Console session shared by all handlers.
#[derive(Debug, Clone)]
pub struct Session {
    settings: Settings,
    forms: HashMap<FormKind, FormSlot>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let forms = FormKind::ALL
            .iter()
            .map(|kind| (*kind, FormSlot::new(*kind)))
            .collect();
        Self { settings, forms }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Settings {
            base_url: config.base_url.clone(),
            auth_mode: config.auth_mode,
            use_stub: config.use_stub,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    fn slot(&self, kind: FormKind) -> &FormSlot {
        // Every kind is inserted at construction and never removed.
        &self.forms[&kind]
    }

    fn slot_mut(&mut self, kind: FormKind) -> &mut FormSlot {
        self.forms.entry(kind).or_insert_with(|| FormSlot::new(kind))
    }

    pub fn form(&self, kind: FormKind) -> &FormState {
        &self.slot(kind).values
    }

    pub fn view(&self, kind: FormKind) -> FormView {
        self.slot(kind).view()
    }

    pub fn state(&self, kind: FormKind) -> &SubmissionState {
        &self.slot(kind).state
    }

    /// Replaces a form's values. The submission state is left untouched.
    pub fn set_form(&mut self, values: FormState) {
        let kind = values.kind();
        self.slot_mut(kind).values = values;
    }

    /// Restores a form's default values.
    pub fn reset_form(&mut self, kind: FormKind) {
        self.slot_mut(kind).values = FormState::defaults(kind);
    }

    /// Enters `Loading` and returns the generation that owns the submission.
    pub fn begin(&mut self, kind: FormKind) -> u64 {
        let slot = self.slot_mut(kind);
        slot.generation += 1;
        slot.state = SubmissionState::Loading {
            started_at: Utc::now(),
        };
        slot.generation
    }

    /// Records the outcome of `generation`.
    ///
    /// Returns `false` and leaves the state alone when a newer submission
    /// has started since.
    pub fn complete(&mut self, kind: FormKind, generation: u64, result: RequestResult) -> bool {
        let slot = self.slot_mut(kind);
        if slot.generation != generation {
            tracing::debug!(
                "Dropping stale {} result (generation {} < {})",
                kind,
                generation,
                slot.generation
            );
            return false;
        }
        slot.state = SubmissionState::completed(result);
        true
    }

    /// Records a failure that happened before anything was dispatched.
    ///
    /// Takes a fresh generation so any in-flight result is discarded.
    pub fn reject(&mut self, kind: FormKind, result: RequestResult) -> u64 {
        let generation = self.begin(kind);
        self.complete(kind, generation, result);
        generation
    }
}
