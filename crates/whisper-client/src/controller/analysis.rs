//! Analysis controller: start a job, poll it, show its whispers
//!
//! ```text
//! Idle --click--> Starting --task_id--> Polling --SUCCESS/FAILURE/error--> Idle
//!                    |                     |
//!                    +--error--> Idle      +--abort()--> Idle
//! ```
//!
//! Every click opens a new run. Transitions out of Starting or Polling only
//! apply to the run that is current, so a start request that answers after
//! an abort never takes over a later run.

use crate::api::WhisperApi;
use crate::error::{ClientError, Result};
use crate::models::TaskState;
use crate::poller::{PollHandle, Tick, spawn_repeating};
use crate::view::render::{POLL_FAILED_MESSAGE, START_FAILED_MESSAGE};
use crate::view::{
    ANALYZING_LABEL, LISTEN_LABEL, LISTENING_LABEL, Results, ViewBindings, render_whispers,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, warn};

/// Where the analysis controller is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Starting,
    Polling,
}

/// Phase plus the id of the run that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RunState {
    phase: Phase,
    run: u64,
}

type RunSender = watch::Sender<RunState>;

/// Drives the listen button and the results region
pub struct AnalysisController {
    api: Arc<dyn WhisperApi>,
    view: ViewBindings,
    poll_interval: Duration,
    state: Arc<RunSender>,
    poll: Mutex<Option<PollHandle>>,
}

impl AnalysisController {
    pub fn new(api: Arc<dyn WhisperApi>, view: ViewBindings, poll_interval: Duration) -> Self {
        let (state, _) = watch::channel(RunState {
            phase: Phase::Idle,
            run: 0,
        });
        Self {
            api,
            view,
            poll_interval,
            state: Arc::new(state),
            poll: Mutex::new(None),
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    /// Start an analysis run and begin polling it
    ///
    /// Returns [`ClientError::AnalysisInProgress`] when a run is already
    /// starting or polling; every other failure is shown in the view and the
    /// controller goes back to idle.
    pub async fn analyze_market(&self) -> Result<()> {
        let mut run = None;
        self.state.send_if_modified(|state| {
            if state.phase != Phase::Idle {
                return false;
            }
            state.phase = Phase::Starting;
            state.run += 1;
            run = Some(state.run);
            true
        });
        let Some(run) = run else {
            warn!(phase = ?self.phase(), "analysis already in progress");
            return Err(ClientError::AnalysisInProgress);
        };

        self.view.listen_button.set_label(LISTENING_LABEL);
        self.view.listen_button.set_enabled(false);
        self.view.results_section.show(&Results::Cleared);

        let task = match self.api.start_analysis().await {
            Ok(task) => task,
            Err(err) => {
                error!(run, error = %err, "failed to start analysis");
                let failed = Results::Error(START_FAILED_MESSAGE.to_string());
                settle(&self.view, &self.state, run, Some(failed));
                return Ok(());
            }
        };

        // Held until the handle is stored so abort() cannot slip in between.
        let mut poll = self.poll.lock().await;

        let polling = self.state.send_if_modified(|state| {
            if state.phase == Phase::Starting && state.run == run {
                state.phase = Phase::Polling;
                true
            } else {
                false
            }
        });
        if !polling {
            info!(run, task_id = %task.task_id, "analysis aborted before polling began");
            return Ok(());
        }

        info!(run, task_id = %task.task_id, "analysis started");

        let api = Arc::clone(&self.api);
        let view = self.view.clone();
        let state = Arc::clone(&self.state);
        let task_id = task.task_id;

        let handle = spawn_repeating(self.poll_interval, move |tick| {
            let api = Arc::clone(&api);
            let view = view.clone();
            let state = Arc::clone(&state);
            let task_id = task_id.clone();
            async move {
                debug!(%task_id, tick, "polling analysis status");
                poll_once(api.as_ref(), &view, &state, run, &task_id).await
            }
        });

        if let Some(previous) = poll.replace(handle) {
            previous.abort();
        }

        Ok(())
    }

    /// Cancel a run in progress and go back to idle
    ///
    /// Returns `false` when there was nothing to cancel.
    pub async fn abort(&self) -> bool {
        let mut poll = self.poll.lock().await;
        if let Some(handle) = poll.take() {
            handle.abort();
        }

        let run = self.state.borrow().run;
        let aborted = settle(&self.view, &self.state, run, None);
        if aborted {
            info!(run, "analysis aborted");
        }
        aborted
    }

    /// Wait until the controller is idle again
    pub async fn wait_idle(&self) {
        let mut state = self.state.subscribe();
        if state.wait_for(|s| s.phase == Phase::Idle).await.is_err() {
            debug!("analysis state closed while waiting");
        }
    }

    /// Whether the last poll loop has ended
    pub async fn poll_finished(&self) -> bool {
        self.poll
            .lock()
            .await
            .as_ref()
            .is_none_or(PollHandle::is_finished)
    }
}

impl std::fmt::Debug for AnalysisController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisController")
            .field("poll_interval", &self.poll_interval)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

/// End `run`, showing `results` if given
///
/// Returns `false` and leaves the view alone when `run` is no longer current.
fn settle(view: &ViewBindings, state: &RunSender, run: u64, results: Option<Results>) -> bool {
    let ended = state.send_if_modified(|s| {
        if s.run == run && s.phase != Phase::Idle {
            s.phase = Phase::Idle;
            true
        } else {
            false
        }
    });
    if !ended {
        debug!(run, "run already settled");
        return false;
    }

    if let Some(results) = results {
        view.results_section.show(&results);
    }
    view.listen_button.set_label(LISTEN_LABEL);
    view.listen_button.set_enabled(true);
    true
}

/// One status request and its effect on the view
async fn poll_once(
    api: &dyn WhisperApi,
    view: &ViewBindings,
    state: &RunSender,
    run: u64,
    task_id: &str,
) -> Tick {
    let status = match api.analysis_status(task_id).await {
        Ok(status) => status,
        Err(err) => {
            error!(%task_id, error = %err, "analysis status request failed");
            let failed = Results::Error(POLL_FAILED_MESSAGE.to_string());
            settle(view, state, run, Some(failed));
            return Tick::Stop;
        }
    };

    match status.state {
        TaskState::Success => {
            let results = match status.whispers() {
                Ok(whispers) => {
                    info!(%task_id, count = whispers.len(), "analysis finished");
                    render_whispers(&whispers)
                }
                Err(err) => {
                    error!(%task_id, error = %err, "analysis result could not be decoded");
                    Results::Error(POLL_FAILED_MESSAGE.to_string())
                }
            };
            settle(view, state, run, Some(results));
            Tick::Stop
        }
        TaskState::Failure => {
            let reason = status.error.as_deref().unwrap_or("unknown error");
            warn!(%task_id, %reason, "analysis failed");
            let failed = Results::Error(format!("Analysis failed: {reason}"));
            settle(view, state, run, Some(failed));
            Tick::Stop
        }
        TaskState::Pending | TaskState::Other => {
            debug!(
                %task_id,
                state = ?status.state,
                note = ?status.status,
                "analysis still running"
            );
            view.listen_button.set_label(ANALYZING_LABEL);
            Tick::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockWhisperApi;
    use crate::models::{AnalysisTask, Stock, TaskStatus, Whisper};
    use crate::view::render::SILENT_MESSAGE;
    use crate::view::testing::RecordingView;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    const PERIOD: Duration = Duration::from_millis(2000);

    fn task() -> AnalysisTask {
        AnalysisTask {
            task_id: "task-1".to_string(),
        }
    }

    fn tsla() -> Whisper {
        Whisper {
            symbol: "TSLA".to_string(),
            kind: "Spike".to_string(),
            severity: "high".to_string(),
            message: "m".to_string(),
            reasoning: "r".to_string(),
            action: "buy".to_string(),
        }
    }

    /// Mock that answers status polls from `script`, counting calls
    fn scripted(script: Vec<TaskStatus>) -> (MockWhisperApi, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut api = MockWhisperApi::new();
        api.expect_start_analysis().times(1).returning(|| Ok(task()));
        api.expect_analysis_status().returning(move |task_id| {
            assert_eq!(task_id, "task-1");
            let n = counter.fetch_add(1, Ordering::SeqCst);
            Ok(script[n.min(script.len() - 1)].clone())
        });

        (api, calls)
    }

    fn controller(api: MockWhisperApi, view: &RecordingView) -> AnalysisController {
        AnalysisController::new(Arc::new(api), view.bindings(), PERIOD)
    }

    #[tokio::test(start_paused = true)]
    async fn test_listening_state_set_before_response() {
        let view = RecordingView::new();
        let button = Arc::clone(&view.listen_button);

        let mut api = MockWhisperApi::new();
        api.expect_start_analysis().times(1).returning(move || {
            assert_eq!(button.label(), LISTENING_LABEL);
            assert!(!button.enabled());
            Ok(task())
        });
        api.expect_analysis_status()
            .returning(|_| Ok(TaskStatus::pending()));

        let controller = controller(api, &view);
        controller.analyze_market().await.unwrap();

        assert_eq!(controller.phase(), Phase::Polling);
        assert_eq!(view.results.history().first(), Some(&Results::Cleared));
        controller.abort().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_pending_success_is_silent_after_three_ticks() {
        let (api, calls) = scripted(vec![
            TaskStatus::pending(),
            TaskStatus::pending(),
            TaskStatus::success(&[]).unwrap(),
        ]);
        let view = RecordingView::new();
        let controller = controller(api, &view);

        let start = Instant::now();
        controller.analyze_market().await.unwrap();
        controller.wait_idle().await;

        assert_eq!(start.elapsed(), Duration::from_millis(6000));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(view.results.last(), Some(Results::Silent));
        assert_eq!(
            view.results.last().unwrap().message(),
            Some(SILENT_MESSAGE)
        );
        assert_eq!(
            view.listen_button.labels(),
            vec![
                LISTENING_LABEL,
                ANALYZING_LABEL,
                ANALYZING_LABEL,
                LISTEN_LABEL
            ]
        );
        assert!(view.listen_button.enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_shows_reason_and_stops_timer() {
        let (api, calls) = scripted(vec![TaskStatus::failure("timeout")]);
        let view = RecordingView::new();
        let controller = controller(api, &view);

        controller.analyze_market().await.unwrap();
        controller.wait_idle().await;

        let Some(Results::Error(message)) = view.results.last() else {
            panic!("Expected an error message");
        };
        assert!(message.contains("timeout"));
        assert_eq!(view.listen_button.label(), LISTEN_LABEL);
        assert!(view.listen_button.enabled());

        tokio::time::sleep(PERIOD * 5).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(controller.poll_finished().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_renders_cards() {
        let (api, _) = scripted(vec![TaskStatus::success(&[tsla()]).unwrap()]);
        let view = RecordingView::new();
        let controller = controller(api, &view);

        controller.analyze_market().await.unwrap();
        controller.wait_idle().await;

        let Some(Results::Cards(cards)) = view.results.last() else {
            panic!("Expected cards");
        };
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].texts(), ["TSLA", "Spike", "high", "m", "r", "buy"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_failure_shows_inline_error() {
        let mut api = MockWhisperApi::new();
        api.expect_start_analysis().times(1).returning(|| {
            Err(ClientError::UnexpectedStatus {
                status: 500,
                body: "worker offline".to_string(),
            })
        });
        api.expect_analysis_status().never();

        let view = RecordingView::new();
        let controller = controller(api, &view);
        controller.analyze_market().await.unwrap();

        assert_eq!(
            view.results.last(),
            Some(Results::Error(START_FAILED_MESSAGE.to_string()))
        );
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(view.listen_button.label(), LISTEN_LABEL);
        assert!(view.listen_button.enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_error_resets_and_informs() {
        let mut api = MockWhisperApi::new();
        api.expect_start_analysis().times(1).returning(|| Ok(task()));
        api.expect_analysis_status().times(1).returning(|_| {
            Err(ClientError::UnexpectedStatus {
                status: 502,
                body: String::new(),
            })
        });

        let view = RecordingView::new();
        let controller = controller(api, &view);
        controller.analyze_market().await.unwrap();
        controller.wait_idle().await;

        assert_eq!(
            view.results.last(),
            Some(Results::Error(POLL_FAILED_MESSAGE.to_string()))
        );
        assert!(view.listen_button.enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_listen_is_rejected_while_polling() {
        let (api, _) = scripted(vec![TaskStatus::pending()]);
        let view = RecordingView::new();
        let controller = controller(api, &view);

        tokio_test::assert_ok!(controller.analyze_market().await);
        let second = tokio_test::assert_err!(controller.analyze_market().await);

        assert!(matches!(second, ClientError::AnalysisInProgress));
        assert_eq!(controller.phase(), Phase::Polling);
        controller.abort().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_abort_stops_polling() {
        let (api, calls) = scripted(vec![TaskStatus::pending()]);
        let view = RecordingView::new();
        let controller = controller(api, &view);

        controller.analyze_market().await.unwrap();
        tokio::time::sleep(PERIOD * 2 + PERIOD / 2).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        assert!(controller.abort().await);
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(view.listen_button.label(), LISTEN_LABEL);

        tokio::time::sleep(PERIOD * 3).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!controller.abort().await);
    }

    /// Backend whose start request takes a second and whose tasks never finish
    #[derive(Default)]
    struct SlowStart {
        started: AtomicUsize,
        polled: std::sync::Mutex<Vec<String>>,
    }

    impl SlowStart {
        fn polled(&self) -> Vec<String> {
            self.polled.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WhisperApi for SlowStart {
        async fn list_stocks(&self) -> Result<Vec<Stock>> {
            Ok(Vec::new())
        }

        async fn add_stock(&self, _symbol: &str) -> Result<()> {
            Ok(())
        }

        async fn remove_stock(&self, _symbol: &str) -> Result<()> {
            Ok(())
        }

        async fn start_analysis(&self) -> Result<AnalysisTask> {
            let n = self.started.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(AnalysisTask {
                task_id: format!("run-{n}"),
            })
        }

        async fn analysis_status(&self, task_id: &str) -> Result<TaskStatus> {
            self.polled.lock().unwrap().push(task_id.to_string());
            Ok(TaskStatus::pending())
        }
    }

    fn listen(controller: &Arc<AnalysisController>) -> tokio::task::JoinHandle<Result<()>> {
        let controller = Arc::clone(controller);
        tokio::spawn(async move { controller.analyze_market().await })
    }

    #[tokio::test(start_paused = true)]
    async fn test_abort_while_starting_drops_the_task() {
        let api = Arc::new(SlowStart::default());
        let view = RecordingView::new();
        let controller = Arc::new(AnalysisController::new(
            api.clone(),
            view.bindings(),
            PERIOD,
        ));

        let first = listen(&controller);
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(controller.phase(), Phase::Starting);

        assert!(controller.abort().await);
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(view.listen_button.label(), LISTEN_LABEL);
        assert!(view.listen_button.enabled());

        first.await.unwrap().unwrap();
        tokio::time::sleep(PERIOD * 2).await;

        assert!(api.polled().is_empty());
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(view.listen_button.enabled());
        assert!(!matches!(view.results.last(), Some(Results::Error(_))));
        assert!(controller.poll_finished().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_relisten_after_abort_while_starting_polls_new_task() {
        let api = Arc::new(SlowStart::default());
        let view = RecordingView::new();
        let controller = Arc::new(AnalysisController::new(
            api.clone(),
            view.bindings(),
            PERIOD,
        ));

        let first = listen(&controller);
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(controller.abort().await);

        let second = listen(&controller);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(controller.phase(), Phase::Starting);

        // The first start answers here and must not take over the second run.
        first.await.unwrap().unwrap();
        assert_eq!(controller.phase(), Phase::Starting);

        second.await.unwrap().unwrap();
        assert_eq!(controller.phase(), Phase::Polling);

        tokio::time::sleep(PERIOD * 2 + PERIOD / 2).await;
        assert_eq!(api.polled(), vec!["run-2", "run-2"]);
        assert_eq!(controller.phase(), Phase::Polling);
        assert!(!view.listen_button.enabled());

        assert!(controller.abort().await);
        assert!(view.listen_button.enabled());
    }
}
