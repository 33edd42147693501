//! UI-agnostic review state machine.
//!
//! [`ReviewShell`] holds what a front end displays (input, review, loading
//! flag, error) and decides what a "review" action does in each state. The
//! call itself happens outside: [`ReviewShell::trigger`] hands out a
//! [`ReviewTicket`], the caller runs the review however it likes, and
//! [`ReviewShell::resolve`] applies the result. Every ticket carries a
//! generation number; only the latest one is accepted, so a result that
//! arrives after [`ReviewShell::detach`] or after a newer trigger is dropped.

use crate::error::CriticError;
use crate::render::RenderPipeline;
use crate::review::ReviewClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

/// Everything a front end needs to draw the review screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub code: String,
    pub review: String,
    pub is_loading: bool,
    pub error: String,
}

/// Proof that a review was started; required to resolve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTicket {
    generation: u64,
    source_text: String,
}

impl ReviewTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The input as it was when the review started.
    pub fn source_text(&self) -> &str {
        &self.source_text
    }
}

/// Outcome of [`ReviewShell::trigger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// A review is now in flight.
    Started(ReviewTicket),
    /// Input was empty; the validation message is set and nothing was sent.
    Rejected,
    /// A review is already in flight; nothing changed.
    Busy,
}

#[derive(Debug, Clone)]
pub struct ReviewShell {
    state: UiState,
    phase: Phase,
    generation: u64,
}

impl Default for ReviewShell {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewShell {
    pub fn new() -> Self {
        Self {
            state: UiState::default(),
            phase: Phase::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the review action should be enabled.
    pub fn can_trigger(&self) -> bool {
        self.phase != Phase::Loading
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.state.code = code.into();
    }

    /// Start a review of the current input.
    pub fn trigger(&mut self) -> Trigger {
        if self.phase == Phase::Loading {
            log::debug!("[SHELL] Review already in flight, ignoring trigger");
            return Trigger::Busy;
        }

        if self.state.code.trim().is_empty() {
            self.state.error = CriticError::EmptyInput.to_string();
            return Trigger::Rejected;
        }

        self.generation += 1;
        self.phase = Phase::Loading;
        self.state.is_loading = true;
        self.state.error.clear();
        self.state.review.clear();
        log::debug!("[SHELL] Review {} started", self.generation);

        Trigger::Started(ReviewTicket {
            generation: self.generation,
            source_text: self.state.code.clone(),
        })
    }

    /// Apply the result of the review identified by `ticket`.
    ///
    /// Returns `false`, leaving the state untouched, when the ticket is not
    /// the one currently in flight.
    pub fn resolve(&mut self, ticket: &ReviewTicket, result: Result<String, CriticError>) -> bool {
        if self.phase != Phase::Loading || ticket.generation != self.generation {
            log::debug!(
                "[SHELL] Dropping stale result for review {} (current {})",
                ticket.generation,
                self.generation
            );
            return false;
        }

        match result {
            Ok(text) => {
                self.state.review = text;
                self.state.error.clear();
                self.phase = Phase::Success;
            }
            Err(e) => {
                self.state.error = e.to_string();
                self.state.review.clear();
                self.phase = Phase::Error;
            }
        }
        self.state.is_loading = false;
        true
    }

    /// Abandon any review in flight. Its eventual result will be ignored.
    pub fn detach(&mut self) {
        self.generation += 1;
        if self.phase == Phase::Loading {
            self.phase = Phase::Idle;
            self.state.is_loading = false;
        }
    }

    /// Trigger, run `review` on the ticket's input, and resolve, all inline.
    ///
    /// Returns `true` if a review was attempted.
    pub fn run<F>(&mut self, review: F) -> bool
    where
        F: FnOnce(&str) -> Result<String, CriticError>,
    {
        match self.trigger() {
            Trigger::Started(ticket) => {
                let result = review(ticket.source_text());
                self.resolve(&ticket, result);
                true
            }
            Trigger::Rejected | Trigger::Busy => false,
        }
    }

    /// [`run`](ReviewShell::run) against a [`ReviewClient`].
    pub fn run_client(&mut self, client: &ReviewClient) -> bool {
        self.run(|code| client.review(code))
    }

    /// The current review as sanitized HTML, or `None` when there is none.
    pub fn rendered_review(&self, pipeline: &RenderPipeline) -> Result<Option<String>, CriticError> {
        if self.state.review.is_empty() {
            return Ok(None);
        }
        pipeline.render(&self.state.review).map(Some)
    }
}
