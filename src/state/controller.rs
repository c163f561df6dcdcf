use super::dispatcher::{dispatch_event, Dispatch, COMPLETE_MESSAGE, COMPLETE_PERCENT};
use super::job::{clamp_lookback, Job, JobStatus, TokenCounter};
use crate::api::logging::{emit_job_failure, emit_status_check_failure};
use crate::api::stream::StreamParser;
use crate::api::{ApiClient, JobError};
use crate::types::{StreamEvent, SummaryRequest};
use crate::ui::{Presenter, TriggerState};
use futures::StreamExt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub const STARTING_MESSAGE: &str = "Scraping news articles...";
pub const STARTING_PERCENT: f64 = 10.0;
pub const STOPPED_MESSAGE: &str = "Stopped by user";
pub const STOPPED_PERCENT: f64 = 100.0;
/// UI pacing between `result` and revealing it, then between reveal and idle.
pub const REVEAL_DELAY: Duration = Duration::from_millis(500);
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Message from a background task to the controller. Job messages are
/// tagged with their job.
#[derive(Debug)]
pub enum JobUpdate {
    Capability(Result<bool, JobError>),
    Event { job_id: u64, event: StreamEvent },
    Finished {
        job_id: u64,
        outcome: Result<(), JobError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Unknown,
    Available,
    Unavailable,
    CheckFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerAction {
    Started(u64),
    CancelRequested,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PacingStage {
    Reveal,
    Settle,
}

#[derive(Debug, Clone, Copy)]
struct Pacing {
    stage: PacingStage,
    due: Instant,
    tokens: TokenCounter,
}

/// Owns the single job and every transition of its lifecycle.
pub struct JobController {
    client: Arc<ApiClient>,
    job: Job,
    next_job_id: u64,
    availability: Availability,
    pacing: Option<Pacing>,
    update_tx: mpsc::UnboundedSender<JobUpdate>,
}

impl JobController {
    pub fn new(client: ApiClient) -> (Self, mpsc::UnboundedReceiver<JobUpdate>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let controller = Self {
            client: Arc::new(client),
            job: Job::idle(),
            next_job_id: 1,
            availability: Availability::Unknown,
            pacing: None,
            update_tx,
        };
        (controller, update_rx)
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn availability(&self) -> Availability {
        self.availability
    }

    /// Starts the capability check in the background; the answer comes back
    /// as `JobUpdate::Capability` so input stays live while it is pending.
    pub fn check_summarizer(&mut self, presenter: &mut dyn Presenter) {
        self.availability = Availability::Unknown;
        presenter.set_trigger(TriggerState::Checking);

        let client = Arc::clone(&self.client);
        let update_tx = self.update_tx.clone();
        tokio::spawn(async move {
            let status = client.check_summarizer().await;
            let _ = update_tx.send(JobUpdate::Capability(status));
        });
    }

    pub fn apply_capability(
        &mut self,
        status: Result<bool, JobError>,
        presenter: &mut dyn Presenter,
    ) {
        match status {
            Ok(true) => {
                self.availability = Availability::Available;
                presenter.clear_capability_warning();
                presenter.set_trigger(self.idle_trigger());
            }
            Ok(false) => {
                self.availability = Availability::Unavailable;
                presenter.show_capability_warning();
                presenter.set_trigger(TriggerState::ConfigureToEnable);
            }
            Err(error) => {
                emit_status_check_failure(&error);
                self.availability = Availability::CheckFailed;
                presenter.set_trigger(TriggerState::StatusCheckFailed);
            }
        }
    }

    /// The single fetch/stop control: starts when idle, cancels when running.
    pub fn trigger(
        &mut self,
        lookback_input: &str,
        summary_type: &str,
        presenter: &mut dyn Presenter,
    ) -> TriggerAction {
        match self.job.status {
            JobStatus::Running => {
                if self.cancel() {
                    TriggerAction::CancelRequested
                } else {
                    TriggerAction::Ignored
                }
            }
            JobStatus::Cancelling | JobStatus::Finalizing => TriggerAction::Ignored,
            _ => self
                .start(lookback_input, summary_type, presenter)
                .map(TriggerAction::Started)
                .unwrap_or(TriggerAction::Ignored),
        }
    }

    /// Starts a job unless one is active or the summarizer is unavailable.
    pub fn start(
        &mut self,
        lookback_input: &str,
        summary_type: &str,
        presenter: &mut dyn Presenter,
    ) -> Option<u64> {
        if self.job.status.is_active() || self.availability != Availability::Available {
            return None;
        }

        let job_id = self.next_job_id;
        self.next_job_id += 1;
        self.pacing = None;
        self.job = Job::start(job_id, clamp_lookback(lookback_input), summary_type.to_string());

        presenter.hide_all_sections();
        presenter.render_results(self.job.results.as_slice());
        presenter.show_tokens(self.job.tokens);
        presenter.show_loading(STARTING_MESSAGE, STARTING_PERCENT);
        presenter.set_trigger(TriggerState::Stop);

        let request = SummaryRequest {
            lookback_minutes: self.job.lookback_minutes,
            summary_type: self.job.summary_type.clone(),
        };
        let cancel = self.job.cancel_token().cloned()?;
        tokio::spawn(drive(
            Arc::clone(&self.client),
            request,
            cancel,
            self.update_tx.clone(),
            job_id,
        ));
        Some(job_id)
    }

    /// Signals the live token. The job finishes as Aborted once the drive
    /// task reports back.
    pub fn cancel(&mut self) -> bool {
        self.job.signal_cancel()
    }

    pub fn handle_update(
        &mut self,
        update: JobUpdate,
        now: Instant,
        presenter: &mut dyn Presenter,
    ) {
        match update {
            JobUpdate::Capability(status) => self.apply_capability(status, presenter),
            JobUpdate::Event { job_id, event } => {
                if job_id != self.job.id || self.job.status != JobStatus::Running {
                    return;
                }
                match dispatch_event(event, &mut self.job, presenter) {
                    Dispatch::Continue => {}
                    Dispatch::Finalize { tokens } => {
                        self.job.status = JobStatus::Finalizing;
                        self.pacing = Some(Pacing {
                            stage: PacingStage::Reveal,
                            due: now + REVEAL_DELAY,
                            tokens,
                        });
                    }
                    Dispatch::Fail(message) => {
                        self.finish_failed(&JobError::Server(message), presenter);
                    }
                }
            }
            JobUpdate::Finished { job_id, outcome } => {
                if job_id != self.job.id {
                    return;
                }
                match (self.job.status, outcome) {
                    (JobStatus::Cancelling, _) => self.finish_aborted(presenter),
                    (JobStatus::Running, Err(error)) if error.is_cancelled() => {
                        self.finish_aborted(presenter)
                    }
                    (JobStatus::Running, Err(error)) => self.finish_failed(&error, presenter),
                    (JobStatus::Running, Ok(())) => {
                        self.finish_failed(&JobError::IncompleteStream, presenter)
                    }
                    // Finalizing, or already terminal via a server error event.
                    _ => {}
                }
            }
        }
    }

    /// Advances the post-`result` pacing once its deadline has passed.
    pub fn tick(&mut self, now: Instant, presenter: &mut dyn Presenter) {
        let Some(pacing) = self.pacing else {
            return;
        };
        if now < pacing.due {
            return;
        }

        match pacing.stage {
            PacingStage::Reveal => {
                presenter.render_results(self.job.results.as_slice());
                presenter.show_tokens(pacing.tokens);
                presenter.show_loading(COMPLETE_MESSAGE, COMPLETE_PERCENT);
                self.pacing = Some(Pacing {
                    stage: PacingStage::Settle,
                    due: now + SETTLE_DELAY,
                    tokens: pacing.tokens,
                });
            }
            PacingStage::Settle => {
                self.pacing = None;
                presenter.hide_loading();
                presenter.reveal_results();
                self.job.status = JobStatus::Completed;
                self.job.release_token();
                presenter.set_trigger(self.idle_trigger());
            }
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pacing.map(|pacing| pacing.due)
    }

    fn finish_aborted(&mut self, presenter: &mut dyn Presenter) {
        self.job.status = JobStatus::Aborted;
        self.job.release_token();
        presenter.render_results(self.job.results.as_slice());
        presenter.show_tokens(self.job.tokens);
        presenter.show_loading(STOPPED_MESSAGE, STOPPED_PERCENT);
        presenter.hide_loading();
        presenter.reveal_results();
        presenter.set_trigger(self.idle_trigger());
    }

    fn finish_failed(&mut self, error: &JobError, presenter: &mut dyn Presenter) {
        emit_job_failure(self.job.id, error);
        self.job.status = JobStatus::Failed;
        self.job.release_token();
        self.job.results.clear();
        presenter.hide_results();
        presenter.render_results(self.job.results.as_slice());
        presenter.show_error(&error.to_string());
        presenter.set_trigger(self.idle_trigger());
    }

    fn idle_trigger(&self) -> TriggerState {
        if self.job.status.is_active() {
            TriggerState::Stop
        } else {
            TriggerState::Fetch
        }
    }
}

/// Runs one job: opens the stream and forwards decoded events until the
/// body ends, the transport fails, or `cancel` fires.
pub async fn drive(
    client: Arc<ApiClient>,
    request: SummaryRequest,
    cancel: CancellationToken,
    update_tx: mpsc::UnboundedSender<JobUpdate>,
    job_id: u64,
) {
    let outcome = stream_events(&client, &request, &cancel, |event| {
        let _ = update_tx.send(JobUpdate::Event { job_id, event });
    })
    .await;
    let _ = update_tx.send(JobUpdate::Finished { job_id, outcome });
}

async fn stream_events(
    client: &ApiClient,
    request: &SummaryRequest,
    cancel: &CancellationToken,
    mut on_event: impl FnMut(StreamEvent),
) -> Result<(), JobError> {
    let mut stream = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(JobError::Cancelled),
        opened = client.create_stream(request) => opened?,
    };

    let mut parser = StreamParser::new();
    let mut saw_terminal_event = false;
    let mut forward = |event: StreamEvent| {
        saw_terminal_event |= matches!(event, StreamEvent::Result { .. } | StreamEvent::Error { .. });
        on_event(event);
    };

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(JobError::Cancelled),
            next = stream.next() => next,
        };
        let Some(chunk) = next else {
            break;
        };
        for event in parser.process(&chunk?) {
            forward(event);
        }
    }
    for event in parser.finish() {
        forward(event);
    }

    if saw_terminal_event {
        Ok(())
    } else {
        Err(JobError::IncompleteStream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock_client::{MockApiClient, MockResponse};
    use crate::api::error::REQUEST_REJECTED_MESSAGE;
    use crate::state::dispatcher::FINALIZING_MESSAGE;
    use crate::types::Summary;
    use crate::ui::ViewState;

    const PROGRESS_10: &str = r#"{"type":"progress","message":"Processing articles...","progress":10}"#;
    const TOKENS_5_0: &str = r#"{"type":"tokens","input_tokens":5,"output_tokens":0}"#;
    const SUMMARY_A: &str =
        r#"{"type":"summary","summary":"A","published_time":"2024-05-01T10:00:00"}"#;
    const SUMMARY_B: &str =
        r#"{"type":"summary","summary":"B","published_time":"2024-05-01T10:05:00"}"#;
    const RESULT_AB: &str = r#"{"type":"result","status":"success","summaries":[{"summary":"A","published_time":"2024-05-01T10:00:00"},{"summary":"B","published_time":"2024-05-01T10:05:00"}],"total_input_tokens":50,"total_output_tokens":20,"summarizer_available":true}"#;

    fn setup(
        responses: Vec<MockResponse>,
    ) -> (
        JobController,
        mpsc::UnboundedReceiver<JobUpdate>,
        ViewState,
        Arc<MockApiClient>,
    ) {
        let mock = Arc::new(MockApiClient::new(responses));
        let client = ApiClient::new_mock(mock.clone());
        let (mut controller, rx) = JobController::new(client);
        let mut view = ViewState::default();
        controller.apply_capability(Ok(true), &mut view);
        (controller, rx, view, mock)
    }

    async fn pump_until_finished(
        controller: &mut JobController,
        rx: &mut mpsc::UnboundedReceiver<JobUpdate>,
        view: &mut ViewState,
        now: Instant,
    ) {
        while let Some(update) = rx.recv().await {
            let finished = matches!(update, JobUpdate::Finished { .. });
            controller.handle_update(update, now, view);
            if finished {
                break;
            }
        }
    }

    async fn pump_events(
        controller: &mut JobController,
        rx: &mut mpsc::UnboundedReceiver<JobUpdate>,
        view: &mut ViewState,
        count: usize,
    ) {
        for _ in 0..count {
            let update = rx.recv().await.expect("update");
            assert!(matches!(update, JobUpdate::Event { .. }));
            controller.handle_update(update, Instant::now(), view);
        }
    }

    #[tokio::test]
    async fn test_full_stream_reaches_completed_state_after_pacing() {
        let (mut controller, mut rx, mut view, _mock) = setup(vec![MockResponse::events(&[
            PROGRESS_10,
            TOKENS_5_0,
            SUMMARY_A,
            SUMMARY_B,
            RESULT_AB,
        ])]);

        let base = Instant::now();
        assert!(matches!(
            controller.trigger("60", "sentence", &mut view),
            TriggerAction::Started(1)
        ));
        assert_eq!(view.trigger, TriggerState::Stop);
        pump_until_finished(&mut controller, &mut rx, &mut view, base).await;

        assert_eq!(controller.job().status, JobStatus::Finalizing);
        assert_eq!(view.loading.message, FINALIZING_MESSAGE);
        assert_eq!(controller.next_deadline(), Some(base + REVEAL_DELAY));

        controller.tick(base + REVEAL_DELAY - Duration::from_millis(1), &mut view);
        assert_eq!(view.loading.message, FINALIZING_MESSAGE, "reveal waits for its delay");

        controller.tick(base + REVEAL_DELAY, &mut view);
        assert_eq!(view.loading.message, COMPLETE_MESSAGE);
        assert_eq!(view.trigger, TriggerState::Stop);

        controller.tick(base + REVEAL_DELAY + SETTLE_DELAY, &mut view);
        assert_eq!(controller.job().status, JobStatus::Completed);
        assert!(controller.job().cancel_token().is_none());
        assert_eq!(view.progress_percent(), 100.0);
        assert_eq!(view.tokens, Some(TokenCounter::new(50, 20)));
        assert_eq!(view.result_texts(), vec!["A", "B"]);
        assert!(view.results_visible);
        assert!(!view.loading.visible);
        assert!(!view.warning_visible);
        assert!(view.error.is_none());
        assert_eq!(view.trigger, TriggerState::Fetch);
    }

    #[tokio::test]
    async fn test_result_list_supersedes_any_number_of_partials() {
        let result_only_c = r#"{"type":"result","summaries":[{"summary":"C","published_time":"t"}],"total_input_tokens":1,"total_output_tokens":1,"summarizer_available":true}"#;
        let (mut controller, mut rx, mut view, _mock) = setup(vec![MockResponse::events(&[
            SUMMARY_A,
            SUMMARY_B,
            SUMMARY_A,
            result_only_c,
        ])]);

        let base = Instant::now();
        controller.trigger("60", "sentence", &mut view);
        pump_until_finished(&mut controller, &mut rx, &mut view, base).await;
        controller.tick(base + REVEAL_DELAY, &mut view);
        controller.tick(base + REVEAL_DELAY + SETTLE_DELAY, &mut view);

        assert_eq!(controller.job().results.as_slice(), &[Summary::new("C", "t")]);
        assert_eq!(view.result_texts(), vec!["C"]);
    }

    #[tokio::test]
    async fn test_cancel_preserves_partials_and_reports_stop() {
        let (mut controller, mut rx, mut view, _mock) = setup(vec![MockResponse::stalled_after(&[
            PROGRESS_10,
            SUMMARY_A,
            TOKENS_5_0,
            SUMMARY_B,
        ])]);

        controller.trigger("30", "sentence", &mut view);
        pump_events(&mut controller, &mut rx, &mut view, 4).await;

        assert_eq!(
            controller.trigger("30", "sentence", &mut view),
            TriggerAction::CancelRequested
        );
        assert_eq!(controller.job().status, JobStatus::Cancelling);
        assert_eq!(
            controller.trigger("30", "sentence", &mut view),
            TriggerAction::Ignored,
            "no second start while the stop is pending"
        );

        pump_until_finished(&mut controller, &mut rx, &mut view, Instant::now()).await;

        assert_eq!(controller.job().status, JobStatus::Aborted);
        assert!(controller.job().cancel_token().is_none());
        assert_eq!(view.result_texts(), vec!["A", "B"]);
        assert!(view.results_visible);
        assert_eq!(view.loading.message, STOPPED_MESSAGE);
        assert!(view.error.is_none(), "cancellation is not an error");
        assert_eq!(view.tokens, Some(TokenCounter::new(5, 0)));
        assert_eq!(view.trigger, TriggerState::Fetch);
    }

    #[tokio::test]
    async fn test_cancel_before_any_partial_shows_empty_state() {
        let (mut controller, mut rx, mut view, _mock) =
            setup(vec![MockResponse::stalled_after(&[])]);

        controller.trigger("60", "sentence", &mut view);
        assert!(controller.cancel());
        pump_until_finished(&mut controller, &mut rx, &mut view, Instant::now()).await;

        assert_eq!(controller.job().status, JobStatus::Aborted);
        assert!(view.result_texts().is_empty());
        assert_eq!(view.loading.message, STOPPED_MESSAGE);
    }

    #[tokio::test]
    async fn test_rejected_request_clears_results_and_restores_trigger() {
        let (mut controller, mut rx, mut view, _mock) = setup(vec![MockResponse::Rejected(403)]);

        controller.trigger("60", "sentence", &mut view);
        pump_until_finished(&mut controller, &mut rx, &mut view, Instant::now()).await;

        assert_eq!(controller.job().status, JobStatus::Failed);
        assert!(controller.job().results.is_empty());
        assert!(view.result_texts().is_empty());
        assert_eq!(view.error.as_deref(), Some(REQUEST_REJECTED_MESSAGE));
        assert_eq!(view.trigger, TriggerState::Fetch);
        assert!(view.trigger.is_enabled());
    }

    #[tokio::test]
    async fn test_transport_failure_discards_partials() {
        let (mut controller, mut rx, mut view, _mock) = setup(vec![MockResponse::Broken {
            chunks: vec![format!("data: {SUMMARY_A}\n")],
            message: "connection reset".to_string(),
        }]);

        controller.trigger("60", "sentence", &mut view);
        pump_until_finished(&mut controller, &mut rx, &mut view, Instant::now()).await;

        assert_eq!(controller.job().status, JobStatus::Failed);
        assert!(view.result_texts().is_empty());
        assert!(!view.results_visible);
        assert_eq!(view.error.as_deref(), Some("connection reset"));
    }

    #[tokio::test]
    async fn test_stream_without_result_fails() {
        let (mut controller, mut rx, mut view, _mock) =
            setup(vec![MockResponse::events(&[PROGRESS_10, SUMMARY_A])]);

        controller.trigger("60", "sentence", &mut view);
        pump_until_finished(&mut controller, &mut rx, &mut view, Instant::now()).await;

        assert_eq!(controller.job().status, JobStatus::Failed);
        assert_eq!(
            view.error.as_deref(),
            Some("Stream ended before final result")
        );
    }

    #[tokio::test]
    async fn test_server_error_envelope_surfaces_message() {
        let (mut controller, mut rx, mut view, _mock) = setup(vec![MockResponse::Stream {
            chunks: vec![
                r#"{"status": "error", "message": "No articles found in the specified time range"}"#
                    .to_string(),
            ],
            stall: false,
        }]);

        controller.trigger("60", "sentence", &mut view);
        pump_until_finished(&mut controller, &mut rx, &mut view, Instant::now()).await;

        assert_eq!(controller.job().status, JobStatus::Failed);
        assert_eq!(
            view.error.as_deref(),
            Some("No articles found in the specified time range")
        );
    }

    #[tokio::test]
    async fn test_malformed_line_is_skipped() {
        let (mut controller, mut rx, mut view, _mock) = setup(vec![MockResponse::Stream {
            chunks: vec![
                format!("data: {SUMMARY_A}\n\ndata: {{not json}}\n\n"),
                format!("data: {SUMMARY_B}\n\n"),
            ],
            stall: true,
        }]);

        controller.trigger("60", "sentence", &mut view);
        pump_events(&mut controller, &mut rx, &mut view, 2).await;
        assert_eq!(view.result_texts(), vec!["A", "B"]);
        assert!(view.error.is_none());
        controller.cancel();
    }

    #[tokio::test]
    async fn test_lookback_is_clamped_before_sending() {
        let (mut controller, mut rx, mut view, mock) = setup(vec![
            MockResponse::events(&[RESULT_AB]),
            MockResponse::events(&[RESULT_AB]),
        ]);

        let base = Instant::now();
        controller.trigger("500", "paragraph", &mut view);
        pump_until_finished(&mut controller, &mut rx, &mut view, base).await;
        controller.tick(base + REVEAL_DELAY, &mut view);
        controller.tick(base + REVEAL_DELAY + SETTLE_DELAY, &mut view);

        controller.trigger("", "sentence", &mut view);
        pump_until_finished(&mut controller, &mut rx, &mut view, base).await;

        let requests = mock.recorded_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].lookback_minutes, 120);
        assert_eq!(requests[0].summary_type, "paragraph");
        assert_eq!(requests[1].lookback_minutes, 60);
    }

    #[tokio::test]
    async fn test_stale_updates_from_previous_job_are_ignored() {
        let (mut controller, mut rx, mut view, _mock) = setup(vec![
            MockResponse::Rejected(500),
            MockResponse::stalled_after(&[]),
        ]);

        controller.trigger("60", "sentence", &mut view);
        pump_until_finished(&mut controller, &mut rx, &mut view, Instant::now()).await;
        controller.trigger("60", "sentence", &mut view);
        assert_eq!(controller.job().id, 2);

        controller.handle_update(
            JobUpdate::Event {
                job_id: 1,
                event: StreamEvent::Summary {
                    summary: "stale".to_string(),
                    published_time: "t".to_string(),
                },
            },
            Instant::now(),
            &mut view,
        );
        controller.handle_update(
            JobUpdate::Finished {
                job_id: 1,
                outcome: Err(JobError::Transport("late".to_string())),
            },
            Instant::now(),
            &mut view,
        );

        assert!(controller.job().results.is_empty());
        assert_eq!(controller.job().status, JobStatus::Running);
        assert!(view.error.is_none());
        controller.cancel();
    }

    async fn await_capability(
        controller: &mut JobController,
        rx: &mut mpsc::UnboundedReceiver<JobUpdate>,
        view: &mut ViewState,
    ) {
        let update = rx.recv().await.expect("capability update");
        assert!(matches!(update, JobUpdate::Capability(_)));
        controller.handle_update(update, Instant::now(), view);
    }

    #[tokio::test]
    async fn test_unavailable_summarizer_blocks_start_and_warns() {
        let mock = Arc::new(MockApiClient::new(vec![]).with_availability(Ok(false)));
        let (mut controller, mut rx) = JobController::new(ApiClient::new_mock(mock));
        let mut view = ViewState::default();

        controller.check_summarizer(&mut view);
        assert_eq!(view.trigger, TriggerState::Checking);
        await_capability(&mut controller, &mut rx, &mut view).await;

        assert_eq!(controller.availability(), Availability::Unavailable);
        assert_eq!(view.trigger, TriggerState::ConfigureToEnable);
        assert!(!view.trigger.is_enabled());
        assert!(view.warning_visible);
        assert_eq!(
            controller.trigger("60", "sentence", &mut view),
            TriggerAction::Ignored
        );
    }

    #[tokio::test]
    async fn test_failed_status_check_disables_trigger() {
        let mock = Arc::new(
            MockApiClient::new(vec![]).with_availability(Err("connection refused".to_string())),
        );
        let (mut controller, mut rx) = JobController::new(ApiClient::new_mock(mock));
        let mut view = ViewState::default();

        controller.check_summarizer(&mut view);
        await_capability(&mut controller, &mut rx, &mut view).await;

        assert_eq!(controller.availability(), Availability::CheckFailed);
        assert_eq!(view.trigger, TriggerState::StatusCheckFailed);
        assert!(!view.warning_visible);
    }

    #[tokio::test]
    async fn test_start_waits_for_capability_answer() {
        let (mut controller, mut rx) =
            JobController::new(ApiClient::new_mock(Arc::new(MockApiClient::new(vec![]))));
        let mut view = ViewState::default();

        controller.check_summarizer(&mut view);
        assert_eq!(
            controller.trigger("60", "sentence", &mut view),
            TriggerAction::Ignored
        );
        await_capability(&mut controller, &mut rx, &mut view).await;
        assert_eq!(controller.availability(), Availability::Available);
        assert_eq!(view.trigger, TriggerState::Fetch);
    }

    #[tokio::test]
    async fn test_result_reporting_unavailable_summarizer_warns_but_keeps_fetch() {
        let result = r#"{"type":"result","summaries":[],"total_input_tokens":0,"total_output_tokens":0,"summarizer_available":false}"#;
        let (mut controller, mut rx, mut view, mock) = setup(vec![
            MockResponse::events(&[result]),
            MockResponse::Rejected(500),
        ]);

        let base = Instant::now();
        controller.trigger("60", "sentence", &mut view);
        pump_until_finished(&mut controller, &mut rx, &mut view, base).await;
        controller.tick(base + REVEAL_DELAY, &mut view);
        controller.tick(base + REVEAL_DELAY + SETTLE_DELAY, &mut view);

        assert!(view.warning_visible);
        assert_eq!(controller.job().status, JobStatus::Completed);
        assert!(view.result_texts().is_empty());
        assert_eq!(view.trigger, TriggerState::Fetch);
        assert!(view.trigger.is_enabled());

        assert_eq!(
            controller.trigger("60", "sentence", &mut view),
            TriggerAction::Started(2)
        );
        pump_until_finished(&mut controller, &mut rx, &mut view, base).await;
        assert_eq!(mock.recorded_requests().len(), 2);
    }
}
