use std::sync::Arc;
use std::time::Duration;

use lettervideo_domain::{
    BackendGateway, GatewayError, GenerationRequest, JobHandle, JobStatus, JobStatusSnapshot,
    LetterLimits, Navigator, Route, SubmitAcknowledgement, VoiceCategory, VoiceOption,
};
use serde::Serialize;
use tokio::sync::{watch, Mutex};

use crate::{
    ApplicationError, CreateWizard, FailureReasonTable, GenerationDraft, PageEvent,
    PersistentJobHandle, PollFlow, PollingTask, SubmitDisposition, SubmitMessages, UiPageState,
    UserMessages,
};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub limits: LetterLimits,
    pub poll_interval: Duration,
    pub submit_messages: SubmitMessages,
    pub failures: FailureReasonTable,
    pub messages: UserMessages,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            limits: LetterLimits::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            submit_messages: SubmitMessages::default(),
            failures: FailureReasonTable::default(),
            messages: UserMessages::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    InvalidPayload,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend queued the job; it is persisted and being polled.
    Queued { job: JobHandle, queue_position: u32 },
    /// A job was already tracked, so it was resumed instead of submitting again.
    Resumed { job: JobHandle },
    /// The backend answered but did not queue the job.
    Rejected {
        reason: RejectionReason,
        message: String,
    },
    /// The request did not get a usable answer.
    Failed { message: String },
}

/// What a view needs to render the create flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerSnapshot {
    pub page: UiPageState,
    pub draft: GenerationDraft,
    pub category: Option<VoiceCategory>,
    pub queue_position: u32,
    pub status_message: Option<String>,
    pub error: Option<String>,
    pub tracked_job: Option<JobHandle>,
    pub polling_active: bool,
    /// False when the tracked job could not be persisted and would be lost on restart.
    pub handle_persisted: bool,
}

struct ActivePoll {
    job: JobHandle,
    generation: u64,
    task: PollingTask,
    persisted: bool,
}

struct ControllerState {
    wizard: CreateWizard,
    queue_position: u32,
    status_message: Option<String>,
    error: Option<String>,
    submitting: bool,
    polling: Option<ActivePoll>,
    generation: u64,
}

impl ControllerState {
    fn new(limits: LetterLimits) -> Self {
        Self {
            wizard: CreateWizard::new(limits),
            queue_position: 0,
            status_message: None,
            error: None,
            submitting: false,
            polling: None,
            generation: 0,
        }
    }

    fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            page: self.wizard.page(),
            draft: self.wizard.draft().clone(),
            category: self.wizard.category(),
            queue_position: self.queue_position,
            status_message: self.status_message.clone(),
            error: self.error.clone(),
            tracked_job: self.polling.as_ref().map(|active| active.job.clone()),
            polling_active: self.polling.is_some(),
            handle_persisted: self
                .polling
                .as_ref()
                .map_or(true, |active| active.persisted),
        }
    }

    fn move_to(&mut self, event: PageEvent) {
        if let Err(err) = self.wizard.apply(event) {
            tracing::warn!(error = %err, "ignoring page transition");
        }
    }

    fn fail(&mut self, message: String) {
        self.error = Some(message);
        self.status_message = None;
        self.move_to(PageEvent::JobFailed);
    }

    fn stop_polling(&mut self) -> Option<JobHandle> {
        self.polling.take().map(|active| {
            active.task.cancel();
            active.job
        })
    }
}

struct ControllerInner {
    gateway: Arc<dyn BackendGateway>,
    handle: PersistentJobHandle,
    navigator: Arc<dyn Navigator>,
    settings: ControllerSettings,
    state: Mutex<ControllerState>,
    updates: watch::Sender<ControllerSnapshot>,
}

/// Drives a generation job from submission to a terminal outcome.
///
/// At most one job is tracked at a time. Its id is persisted through
/// [`PersistentJobHandle`] while it runs, so a new controller built over the same
/// store picks it up again with [`JobLifecycleController::resume_if_pending`].
#[derive(Clone)]
pub struct JobLifecycleController {
    inner: Arc<ControllerInner>,
}

impl JobLifecycleController {
    pub fn new(
        gateway: Arc<dyn BackendGateway>,
        handle: PersistentJobHandle,
        navigator: Arc<dyn Navigator>,
        settings: ControllerSettings,
    ) -> Self {
        let state = ControllerState::new(settings.limits);
        let (updates, _) = watch::channel(state.snapshot());
        Self {
            inner: Arc::new(ControllerInner {
                gateway,
                handle,
                navigator,
                settings,
                state: Mutex::new(state),
                updates,
            }),
        }
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.inner.settings
    }

    pub fn subscribe(&self) -> watch::Receiver<ControllerSnapshot> {
        self.inner.updates.subscribe()
    }

    pub async fn snapshot(&self) -> ControllerSnapshot {
        self.inner.state.lock().await.snapshot()
    }

    pub async fn set_letter(&self, text: impl Into<String>) -> Result<(), ApplicationError> {
        let text = text.into();
        self.inner
            .update(move |state| state.wizard.set_letter(text))
            .await
    }

    pub async fn advance_to_voice_category(&self) -> Result<(), ApplicationError> {
        self.inner
            .update(|state| state.wizard.advance_to_voice_category())
            .await
    }

    pub async fn choose_category(
        &self,
        category: VoiceCategory,
    ) -> Result<&'static [VoiceOption], ApplicationError> {
        self.inner
            .update(move |state| state.wizard.choose_category(category))
            .await
    }

    pub async fn choose_voice(&self, key: &str) -> Result<(), ApplicationError> {
        self.inner
            .update(|state| state.wizard.choose_voice(key))
            .await
    }

    pub async fn set_options(
        &self,
        include_subtitles: bool,
        include_music: bool,
    ) -> Result<(), ApplicationError> {
        self.inner
            .update(move |state| state.wizard.set_options(include_subtitles, include_music))
            .await
    }

    pub async fn go_back(&self, target: UiPageState) -> Result<(), ApplicationError> {
        self.inner
            .update(move |state| state.wizard.go_back(target))
            .await
    }

    /// Leaves a terminal page for a fresh, empty draft.
    pub async fn start_new_cycle(&self) -> Result<(), ApplicationError> {
        self.inner
            .update(|state| {
                state.wizard.restart()?;
                state.error = None;
                state.status_message = None;
                state.queue_position = 0;
                Ok(())
            })
            .await
    }

    /// Submits the request assembled by the wizard steps.
    pub async fn submit_draft(&self) -> Result<SubmitOutcome, ApplicationError> {
        let request = {
            let state = self.inner.state.lock().await;
            state.wizard.build_request()?
        };
        self.submit(request).await
    }

    /// Submits a job unless one is already tracked, in which case that job is resumed.
    ///
    /// A job counts as tracked when it is being polled or its handle is persisted. If the
    /// handle cannot be written after the backend queued the job, the job is still polled
    /// and reported as queued, but it does not survive a restart;
    /// [`ControllerSnapshot::handle_persisted`] is false in that case.
    ///
    /// Local validation failures are returned as errors and leave the state untouched.
    /// Every backend answer, including transport failures, is reported through the
    /// returned outcome and the page state.
    pub async fn submit(&self, request: GenerationRequest) -> Result<SubmitOutcome, ApplicationError> {
        let inner = &self.inner;
        {
            let mut state = inner.state.lock().await;
            if state.submitting {
                return Err(ApplicationError::SubmissionInFlight);
            }
            if let Some(active) = &state.polling {
                let job = active.job.clone();
                tracing::info!(job_id = %job.job_id, "job already polled; not submitting again");
                return Ok(SubmitOutcome::Resumed { job });
            }
            if let Some(job) = inner.handle.get()? {
                tracing::info!(job_id = %job.job_id, "job already tracked; resuming instead of submitting");
                inner.resume_locked(&mut state, job.clone());
                inner.publish(&state);
                return Ok(SubmitOutcome::Resumed { job });
            }
            request.validate(&inner.settings.limits)?;
            state.submitting = true;
        }

        tracing::debug!(
            voice = %request.voice_key,
            letter_chars = request.letter_text.trim().chars().count(),
            subtitles = request.include_subtitles,
            music = request.include_music,
            "submitting generation request"
        );
        let response = inner.gateway.submit_job(&request).await;

        let mut state = inner.state.lock().await;
        state.submitting = false;
        let outcome = match response {
            Ok(acknowledgement) => inner.accept(&mut state, &request, acknowledgement),
            Err(err) => {
                tracing::warn!(error = %err, "generation request failed");
                let message = inner.settings.messages.submit_error(&err);
                state.fail(message.clone());
                SubmitOutcome::Failed { message }
            }
        };
        inner.publish(&state);
        Ok(outcome)
    }

    /// Starts polling a persisted job, if any, without submitting anything.
    pub async fn resume_if_pending(&self) -> Result<Option<JobHandle>, ApplicationError> {
        let inner = &self.inner;
        let mut state = inner.state.lock().await;
        let Some(job) = inner.handle.get()? else {
            tracing::debug!("no pending job to resume");
            return Ok(None);
        };
        inner.resume_locked(&mut state, job.clone());
        inner.publish(&state);
        Ok(Some(job))
    }

    /// Stops the local timer and keeps the persisted handle for a later resume.
    pub async fn shutdown(&self) {
        let mut state = self.inner.state.lock().await;
        if let Some(job) = state.stop_polling() {
            tracing::info!(job_id = %job.job_id, "stopped polling; job stays pending");
        }
        self.inner.publish(&state);
    }

    #[cfg(test)]
    async fn active_generation(&self) -> Option<u64> {
        let state = self.inner.state.lock().await;
        state.polling.as_ref().map(|active| active.generation)
    }

    #[cfg(test)]
    async fn deliver_poll_outcome(
        &self,
        generation: u64,
        outcome: Result<JobStatusSnapshot, GatewayError>,
    ) -> PollFlow {
        self.inner.apply_poll_outcome(generation, outcome).await
    }
}

impl ControllerInner {
    fn publish(&self, state: &ControllerState) {
        self.updates.send_replace(state.snapshot());
    }

    async fn update<T>(
        &self,
        change: impl FnOnce(&mut ControllerState) -> Result<T, ApplicationError>,
    ) -> Result<T, ApplicationError> {
        let mut state = self.state.lock().await;
        let result = change(&mut state);
        if result.is_ok() {
            self.publish(&state);
        }
        result
    }

    fn accept(
        self: &Arc<Self>,
        state: &mut ControllerState,
        request: &GenerationRequest,
        acknowledgement: SubmitAcknowledgement,
    ) -> SubmitOutcome {
        let SubmitAcknowledgement {
            job_id,
            message,
            queue_position,
        } = acknowledgement;

        match self.settings.submit_messages.classify(&message) {
            SubmitDisposition::Queued => {
                let Some(job_id) = job_id.filter(|id| !id.trim().is_empty()) else {
                    tracing::warn!(%message, "queued acknowledgement carried no job id");
                    let message = self.settings.messages.malformed_acknowledgement.clone();
                    state.fail(message.clone());
                    return SubmitOutcome::Rejected {
                        reason: RejectionReason::Other,
                        message,
                    };
                };
                let job = JobHandle::new(job_id);
                let persisted = match self.handle.set(&job) {
                    Ok(()) => true,
                    Err(err) => {
                        tracing::warn!(job_id = %job.job_id, error = %err, "could not persist job handle; job will not survive a restart");
                        false
                    }
                };
                tracing::info!(job_id = %job.job_id, queue_position, "job queued for generation");

                state.wizard.adopt_request(request);
                state.queue_position = queue_position;
                state.status_message = Some(self.settings.messages.queued.clone());
                state.error = None;
                state.move_to(PageEvent::JobAccepted);
                self.start_polling(state, job.clone(), persisted);
                SubmitOutcome::Queued {
                    job,
                    queue_position,
                }
            }
            SubmitDisposition::InvalidPayload => {
                tracing::warn!(%message, "backend rejected the payload");
                state.fail(message.clone());
                SubmitOutcome::Rejected {
                    reason: RejectionReason::InvalidPayload,
                    message,
                }
            }
            SubmitDisposition::Other => {
                tracing::warn!(%message, "backend did not queue the job");
                state.fail(message.clone());
                SubmitOutcome::Rejected {
                    reason: RejectionReason::Other,
                    message,
                }
            }
        }
    }

    fn resume_locked(self: &Arc<Self>, state: &mut ControllerState, job: JobHandle) {
        if self.start_polling(state, job.clone(), true) {
            tracing::info!(job_id = %job.job_id, "resuming pending job");
        }
        if state.wizard.page() != UiPageState::InProgress {
            state.error = None;
            state.move_to(PageEvent::JobAccepted);
        }
    }

    /// Returns false when a poller is already live; a second one is never started.
    fn start_polling(
        self: &Arc<Self>,
        state: &mut ControllerState,
        job: JobHandle,
        persisted: bool,
    ) -> bool {
        if let Some(active) = &state.polling {
            if active.job != job {
                tracing::warn!(
                    active_job_id = %active.job.job_id,
                    requested_job_id = %job.job_id,
                    "another job is already being polled"
                );
            }
            return false;
        }

        state.generation += 1;
        let generation = state.generation;
        let weak = Arc::downgrade(self);
        let job_id = job.job_id.clone();
        let task = PollingTask::spawn(self.settings.poll_interval, move || {
            let weak = weak.clone();
            let job_id = job_id.clone();
            async move {
                let Some(inner) = weak.upgrade() else {
                    return PollFlow::Stop;
                };
                let outcome = inner.gateway.poll_job(&job_id).await;
                inner.apply_poll_outcome(generation, outcome).await
            }
        });
        state.polling = Some(ActivePoll {
            job,
            generation,
            task,
            persisted,
        });
        true
    }

    async fn apply_poll_outcome(
        &self,
        generation: u64,
        outcome: Result<JobStatusSnapshot, GatewayError>,
    ) -> PollFlow {
        let mut state = self.state.lock().await;
        let Some(job) = state
            .polling
            .as_ref()
            .filter(|active| active.generation == generation)
            .map(|active| active.job.clone())
        else {
            tracing::debug!(generation, "discarding response from a stopped poller");
            return PollFlow::Stop;
        };

        let snapshot = match outcome {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(job_id = %job.job_id, error = %err, "status check failed; dropping job");
                let message = self.settings.messages.poll_error(&err);
                self.finish(&mut state);
                state.fail(message);
                self.publish(&state);
                return PollFlow::Stop;
            }
        };

        tracing::debug!(
            job_id = %job.job_id,
            status = ?snapshot.status,
            queue_position = snapshot.queue_position,
            "job status received"
        );

        match snapshot.status {
            JobStatus::Queued | JobStatus::Processing | JobStatus::Other(_) => {
                if let JobStatus::Other(status) = &snapshot.status {
                    tracing::warn!(job_id = %job.job_id, %status, "unknown job status; still waiting");
                }
                let message = match snapshot.status {
                    JobStatus::Queued => &self.settings.messages.queued,
                    _ => &self.settings.messages.processing,
                };
                state.status_message = Some(message.clone());
                state.queue_position = snapshot.queue_position;
                state.move_to(PageEvent::JobProgressed);
                self.publish(&state);
                PollFlow::Continue
            }
            JobStatus::Completed => {
                self.finish(&mut state);
                state.queue_position = 0;
                state.status_message = None;
                state.move_to(PageEvent::JobCompleted);
                let route = Route::Result {
                    job_id: job.job_id.clone(),
                    letter: state.wizard.draft().letter_text.clone(),
                };
                self.publish(&state);
                drop(state);

                tracing::info!(job_id = %job.job_id, "job completed; opening result view");
                self.navigator.navigate(route);
                PollFlow::Stop
            }
            JobStatus::Failed => {
                let classified = self
                    .settings
                    .failures
                    .classify(snapshot.error_reason.as_deref());
                tracing::warn!(
                    job_id = %job.job_id,
                    reason = snapshot.error_reason.as_deref().unwrap_or("none"),
                    kind = ?classified.kind,
                    "job failed"
                );
                self.finish(&mut state);
                state.fail(classified.message);
                self.publish(&state);
                PollFlow::Stop
            }
        }
    }

    /// Ends tracking of the current job: the timer and the persisted handle both go.
    fn finish(&self, state: &mut ControllerState) {
        state.stop_polling();
        if let Err(err) = self.handle.clear() {
            tracing::warn!(error = %err, "could not clear job handle");
        }
    }
}
