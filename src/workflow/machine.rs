use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::auth::Session;
use crate::backend::{BackendApi, ConversionRequest, ConversionResult};
use crate::error::{AppError, Result};
use crate::workflow::stages::{self, StagePacer};

/// Phase of a conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    Validating,
    Submitting,
    AwaitingStage1,
    AwaitingStage2,
    Completed,
    Failed,
}

impl WorkflowState {
    /// A run is underway; a new submission must be rejected.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            Self::Validating | Self::Submitting | Self::AwaitingStage1 | Self::AwaitingStage2
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// What a run emits as it advances. The boundary folds these into the UI
/// snapshot through the reducer; emission order is the display order.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    RunStarted,
    Stage(String),
    Completed(ConversionResult),
    Failed(String),
}

/// Raw submission input, untrimmed.
#[derive(Debug, Clone, Default)]
pub struct SubmitInput {
    pub playlist_url: String,
    pub playlist_name: String,
}

/// Drives one conversion at a time from validation to a terminal state.
pub struct ConversionWorkflow<A, P> {
    api: A,
    pacer: P,
    state: Mutex<WorkflowState>,
    run_lock: Mutex<()>,
    events: UnboundedSender<WorkflowEvent>,
}

impl<A: BackendApi, P: StagePacer> ConversionWorkflow<A, P> {
    pub fn new(api: A, pacer: P, events: UnboundedSender<WorkflowEvent>) -> Self {
        Self {
            api,
            pacer,
            state: Mutex::new(WorkflowState::Idle),
            run_lock: Mutex::new(()),
            events,
        }
    }

    pub async fn state(&self) -> WorkflowState {
        *self.state.lock().await
    }

    /// Run one conversion. Every failure is reported through the event
    /// stream as well as the returned error, so the boundary only needs to
    /// watch the stream.
    ///
    /// A call while another run is in flight is rejected with `Busy` and
    /// leaves the running conversion untouched.
    pub async fn submit(&self, input: &SubmitInput, session: Option<&Session>) -> Result<()> {
        let Ok(_running) = self.run_lock.try_lock() else {
            warn!("submit rejected: a conversion is already in progress");
            return Err(AppError::Busy);
        };

        self.set_state(WorkflowState::Validating).await;
        let request =
            match ConversionRequest::new(&input.playlist_url, &input.playlist_name, session) {
                Ok(request) => request,
                Err(e) => {
                    // Pre-flight rejection: nothing was started, back to Idle.
                    self.set_state(WorkflowState::Idle).await;
                    self.emit(WorkflowEvent::Failed(e.to_string()));
                    return Err(e);
                }
            };

        self.emit(WorkflowEvent::RunStarted);
        match self.run(&request).await {
            Ok(result) => {
                self.set_state(WorkflowState::Completed).await;
                self.emit(WorkflowEvent::Completed(result));
                Ok(())
            }
            Err(e) => {
                self.set_state(WorkflowState::Failed).await;
                self.emit(WorkflowEvent::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    async fn run(&self, request: &ConversionRequest) -> Result<ConversionResult> {
        self.set_state(WorkflowState::Submitting).await;
        self.emit(WorkflowEvent::Stage(stages::STAGE_FETCHING.to_string()));

        let result = self.api.convert(request).await?;

        self.set_state(WorkflowState::AwaitingStage1).await;
        self.emit(WorkflowEvent::Stage(stages::stage_total_found(
            result.summary.total,
        )));
        self.emit(WorkflowEvent::Stage(stages::STAGE_MATCHING.to_string()));

        self.pacer.pace().await;
        self.set_state(WorkflowState::AwaitingStage2).await;
        self.emit(WorkflowEvent::Stage(stages::stage_matched(
            result.summary.matched,
        )));
        self.emit(WorkflowEvent::Stage(stages::STAGE_CREATING.to_string()));

        self.pacer.pace().await;
        self.emit(WorkflowEvent::Stage(stages::STAGE_COMPLETED.to_string()));

        info!(
            "conversion completed: {}/{} tracks matched",
            result.summary.matched, result.summary.total
        );
        Ok(result)
    }

    async fn set_state(&self, next: WorkflowState) {
        *self.state.lock().await = next;
    }

    fn emit(&self, event: WorkflowEvent) {
        // A dropped receiver means the boundary is gone; nothing to render to.
        let _ = self.events.send(event);
    }
}
