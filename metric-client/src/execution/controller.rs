//! Execution controller
//!
//! Submits one task at a time and polls its status on a repeating timer
//! until the backend reports a terminal state.
//!
//! Phases: `Idle -> Running -> {Completed, Failed}`. A new submission from
//! `Completed` or `Failed` goes back to `Running`; teardown returns to `Idle`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use metric_core::domain::task::{TaskId, TaskState, TaskStatus};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::api::TaskApi;
use super::config::{ConfigError, PollConfig};
use super::error::ExecutionError;
use super::observer::ExecutionObserver;

/// Caller-visible controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    Idle,
    Running,
    Completed,
    Failed,
}

/// What the controller currently holds
enum Slot {
    Empty,
    /// Submission request outstanding; no id yet
    Submitting,
    Tracking {
        task_id: TaskId,
        timer: JoinHandle<()>,
    },
}

struct State {
    phase: ControllerPhase,
    slot: Slot,
    /// Bumped on every submission and teardown; work tagged with an older
    /// generation is stale and must not touch the state
    generation: u64,
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Tracks model-execution tasks for one consumer
///
/// Holds at most one in-flight task. The poll timer is a spawned tokio task
/// owned by the controller; it is stopped on the terminal transition, on
/// [`teardown`](Self::teardown) and when the controller is dropped.
pub struct ExecutionController {
    api: Arc<dyn TaskApi>,
    observer: Arc<dyn ExecutionObserver>,
    config: PollConfig,
    state: Arc<Mutex<State>>,
}

impl ExecutionController {
    /// Creates an idle controller
    ///
    /// Fails if `config` does not pass [`PollConfig::validate`].
    pub fn new(
        api: Arc<dyn TaskApi>,
        observer: Arc<dyn ExecutionObserver>,
        config: PollConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            api,
            observer,
            config,
            state: Arc::new(Mutex::new(State {
                phase: ControllerPhase::Idle,
                slot: Slot::Empty,
                generation: 0,
            })),
        })
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    pub fn phase(&self) -> ControllerPhase {
        lock(&self.state).phase
    }

    /// Identifier of the task being polled, if any
    pub fn current_task(&self) -> Option<TaskId> {
        match &lock(&self.state).slot {
            Slot::Tracking { task_id, .. } => Some(task_id.clone()),
            Slot::Empty | Slot::Submitting => None,
        }
    }

    /// Whether a task is submitted (or being submitted) and not yet finished
    pub fn is_in_flight(&self) -> bool {
        !matches!(lock(&self.state).slot, Slot::Empty)
    }

    /// Submits a task over `inputs` and starts polling it
    ///
    /// Refused without contacting the backend when `inputs` is empty or a
    /// task is already in flight. A failed submission leaves nothing tracked
    /// and restores the previous phase.
    ///
    /// Must be called within a tokio runtime.
    pub async fn submit(&self, inputs: Vec<String>) -> Result<TaskHandle, ExecutionError> {
        if inputs.is_empty() {
            return Err(ExecutionError::Validation(
                "at least one model must be selected".to_string(),
            ));
        }

        let reservation = {
            let mut state = lock(&self.state);
            if !matches!(state.slot, Slot::Empty) {
                return Err(ExecutionError::AlreadyRunning);
            }
            let previous = state.phase;
            state.slot = Slot::Submitting;
            state.phase = ControllerPhase::Running;
            state.generation += 1;
            Reservation {
                state: &self.state,
                generation: state.generation,
                previous,
                armed: true,
            }
        };

        info!("Submitting task with {} input(s)", inputs.len());

        let task_id = match self.api.submit(&inputs).await {
            Ok(task_id) => task_id,
            Err(e) => {
                error!("Task submission failed: {}", e);
                return Err(ExecutionError::SubmissionTransport(Arc::new(e)));
            }
        };

        let mut reservation = reservation;
        let mut state = lock(&self.state);
        if state.generation != reservation.generation {
            reservation.armed = false;
            info!("Discarding task {}: tracking was torn down", task_id);
            return Err(ExecutionError::TrackingStopped);
        }

        let (progress, receiver) = watch::channel(Progress::default());
        let poll = PollLoop {
            api: Arc::clone(&self.api),
            observer: Arc::clone(&self.observer),
            state: Arc::clone(&self.state),
            config: self.config.clone(),
            task_id: task_id.clone(),
            generation: reservation.generation,
            progress,
        };
        let timer = tokio::spawn(poll.run());

        state.slot = Slot::Tracking {
            task_id: task_id.clone(),
            timer,
        };
        reservation.armed = false;
        drop(state);

        info!(
            "Started task {} (poll interval: {:?})",
            task_id, self.config.poll_interval
        );

        Ok(TaskHandle {
            task_id,
            progress: receiver,
        })
    }

    /// Stops tracking the in-flight task, if any
    ///
    /// No status request is issued after this returns. Responses still in
    /// flight are discarded. Calling it with nothing in flight has no effect.
    pub fn teardown(&self) {
        let mut state = lock(&self.state);

        match std::mem::replace(&mut state.slot, Slot::Empty) {
            Slot::Empty => return,
            Slot::Submitting => {
                debug!("Teardown during submission");
            }
            Slot::Tracking { task_id, timer } => {
                timer.abort();
                info!("Stopped tracking task {}", task_id);
            }
        }

        state.generation += 1;
        state.phase = ControllerPhase::Idle;
    }
}

impl Drop for ExecutionController {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Releases a `Submitting` slot unless the submission went through
struct Reservation<'a> {
    state: &'a Mutex<State>,
    generation: u64,
    previous: ControllerPhase,
    armed: bool,
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = lock(self.state);
        if state.generation == self.generation && matches!(state.slot, Slot::Submitting) {
            state.slot = Slot::Empty;
            state.phase = self.previous;
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Progress {
    latest: Option<TaskStatus>,
    outcome: Option<Result<TaskStatus, ExecutionError>>,
}

/// View of one submitted task
#[derive(Debug)]
pub struct TaskHandle {
    task_id: TaskId,
    progress: watch::Receiver<Progress>,
}

impl TaskHandle {
    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Most recent status received from the backend
    pub fn latest(&self) -> Option<TaskStatus> {
        self.progress.borrow().latest.clone()
    }

    /// Final outcome, once known
    pub fn outcome(&self) -> Option<Result<TaskStatus, ExecutionError>> {
        self.progress.borrow().outcome.clone()
    }

    /// Waits for the task to finish
    ///
    /// Resolves to the terminal status on completion, `JobFailure` when the
    /// backend reports a failure, and `TrackingStopped` if the controller was
    /// torn down first.
    pub async fn wait(mut self) -> Result<TaskStatus, ExecutionError> {
        let outcome = match self.progress.wait_for(|p| p.outcome.is_some()).await {
            Ok(progress) => progress.outcome.clone(),
            Err(_) => None,
        };
        outcome.unwrap_or(Err(ExecutionError::TrackingStopped))
    }
}

/// The repeating status check of one submission
struct PollLoop {
    api: Arc<dyn TaskApi>,
    observer: Arc<dyn ExecutionObserver>,
    state: Arc<Mutex<State>>,
    config: PollConfig,
    task_id: TaskId,
    generation: u64,
    progress: watch::Sender<Progress>,
}

impl PollLoop {
    async fn run(self) {
        let started = Instant::now();
        let period = self.config.poll_interval;
        let mut ticker = time::interval_at(started + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut failures = 0u32;

        loop {
            ticker.tick().await;

            if let Some(max) = self.config.max_duration {
                if started.elapsed() >= max {
                    warn!("Task {} still running after {:?}", self.task_id, max);
                    self.abandon(ExecutionError::PollTimeout(max));
                    return;
                }
            }

            debug!("Polling status of task {}", self.task_id);

            match self.api.status(&self.task_id).await {
                Ok(status) if status.status.is_terminal() => {
                    self.finish(status);
                    return;
                }
                Ok(status) => {
                    failures = 0;
                    if !self.is_current() {
                        return;
                    }
                    debug!(
                        "Task {}: {} ({}/{})",
                        self.task_id, status.current, status.progress, status.total
                    );
                    self.observer.on_progress(&status);
                    self.progress.send_modify(|p| p.latest = Some(status));
                }
                Err(e) if failures < self.config.max_poll_retries => {
                    failures += 1;
                    warn!(
                        "Status request for task {} failed (attempt {}/{}): {}",
                        self.task_id, failures, self.config.max_poll_retries, e
                    );
                }
                Err(e) => {
                    error!("Status request for task {} failed: {}", self.task_id, e);
                    self.abandon(ExecutionError::PollingTransport(Arc::new(e)));
                    return;
                }
            }
        }
    }

    fn is_current(&self) -> bool {
        lock(&self.state).generation == self.generation
    }

    /// Clears the in-flight task and moves to `phase`, unless superseded
    fn release(&self, phase: ControllerPhase) -> bool {
        let mut state = lock(&self.state);
        if state.generation != self.generation {
            return false;
        }
        // Dropping our own JoinHandle only detaches the task.
        state.slot = Slot::Empty;
        state.phase = phase;
        true
    }

    fn finish(&self, status: TaskStatus) {
        let (phase, outcome) = match status.status {
            TaskState::Failed => (
                ControllerPhase::Failed,
                Err(ExecutionError::JobFailure(
                    status
                        .error
                        .clone()
                        .unwrap_or_else(|| "unknown error".to_string()),
                )),
            ),
            _ => (ControllerPhase::Completed, Ok(status.clone())),
        };

        if !self.release(phase) {
            debug!("Discarding stale status of task {}", self.task_id);
            return;
        }

        info!("Task {} finished: {:?}", self.task_id, status.status);

        self.observer.on_progress(&status);
        self.observer.on_terminal(&status);
        self.progress.send_modify(|p| {
            p.latest = Some(status);
            p.outcome = Some(outcome);
        });
    }

    fn abandon(&self, err: ExecutionError) {
        if !self.release(ControllerPhase::Failed) {
            return;
        }

        self.observer.on_error(&err);
        self.progress.send_modify(|p| p.outcome = Some(Err(err)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ClientError, Result as ClientResult};
    use async_trait::async_trait;
    use std::collections::{BTreeMap, VecDeque};
    use std::time::Duration;
    use tokio::sync::Notify;

    fn status(state: TaskState, progress: u32) -> TaskStatus {
        TaskStatus {
            status: state,
            current: format!("step {}", progress),
            progress,
            total: 2,
            elapsed_time: Some(f64::from(progress)),
            results: BTreeMap::new(),
            error: None,
        }
    }

    fn running(progress: u32) -> ClientResult<TaskStatus> {
        Ok(status(TaskState::Running, progress))
    }

    fn completed() -> ClientResult<TaskStatus> {
        let mut done = status(TaskState::Completed, 2);
        done.results.insert("Models/cells.json".to_string(), 42);
        Ok(done)
    }

    fn failed(message: &str) -> ClientResult<TaskStatus> {
        let mut failed = status(TaskState::Failed, 0);
        failed.error = Some(message.to_string());
        Ok(failed)
    }

    fn unavailable() -> ClientResult<TaskStatus> {
        Err(ClientError::api_error(503, "Service Unavailable"))
    }

    /// Backend that replays a script of status responses, then reports
    /// `running` forever
    struct ScriptedApi {
        script: Mutex<VecDeque<ClientResult<TaskStatus>>>,
        submits: Mutex<Vec<Vec<String>>>,
        polls: Mutex<Vec<Instant>>,
        submit_gate: Option<Notify>,
    }

    impl ScriptedApi {
        fn new(script: Vec<ClientResult<TaskStatus>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                submits: Mutex::new(Vec::new()),
                polls: Mutex::new(Vec::new()),
                submit_gate: None,
            })
        }

        fn gated(script: Vec<ClientResult<TaskStatus>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                submits: Mutex::new(Vec::new()),
                polls: Mutex::new(Vec::new()),
                submit_gate: Some(Notify::new()),
            })
        }

        fn open_gate(&self) {
            if let Some(gate) = &self.submit_gate {
                gate.notify_one();
            }
        }

        fn submit_count(&self) -> usize {
            self.submits.lock().unwrap().len()
        }

        fn poll_times(&self) -> Vec<Instant> {
            self.polls.lock().unwrap().clone()
        }

        fn poll_count(&self) -> usize {
            self.polls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TaskApi for ScriptedApi {
        async fn submit(&self, inputs: &[String]) -> ClientResult<TaskId> {
            let number = {
                let mut submits = self.submits.lock().unwrap();
                submits.push(inputs.to_vec());
                submits.len()
            };
            if let Some(gate) = &self.submit_gate {
                gate.notified().await;
            }
            Ok(TaskId::new(format!("task-{}", number)))
        }

        async fn status(&self, _task_id: &TaskId) -> ClientResult<TaskStatus> {
            self.polls.lock().unwrap().push(Instant::now());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| running(1))
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        progress: Mutex<Vec<TaskStatus>>,
        terminal: Mutex<Vec<TaskStatus>>,
        errors: Mutex<Vec<ExecutionError>>,
    }

    impl ExecutionObserver for RecordingObserver {
        fn on_progress(&self, status: &TaskStatus) {
            self.progress.lock().unwrap().push(status.clone());
        }

        fn on_terminal(&self, status: &TaskStatus) {
            self.terminal.lock().unwrap().push(status.clone());
        }

        fn on_error(&self, error: &ExecutionError) {
            self.errors.lock().unwrap().push(error.clone());
        }
    }

    fn controller_with(
        api: &Arc<ScriptedApi>,
        observer: &Arc<RecordingObserver>,
        config: PollConfig,
    ) -> ExecutionController {
        ExecutionController::new(api.clone(), observer.clone(), config).unwrap()
    }

    fn controller(
        api: &Arc<ScriptedApi>,
        observer: &Arc<RecordingObserver>,
    ) -> ExecutionController {
        controller_with(api, observer, PollConfig::default())
    }

    fn inputs() -> Vec<String> {
        vec![
            "Models/cells.json".to_string(),
            "Models/sites.json".to_string(),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_once_per_interval_until_completed() {
        let api = ScriptedApi::new(vec![running(0), running(1), completed()]);
        let observer = Arc::new(RecordingObserver::default());
        let controller = controller(&api, &observer);

        let started = Instant::now();
        let handle = controller.submit(inputs()).await.unwrap();
        assert_eq!(controller.phase(), ControllerPhase::Running);
        assert_eq!(controller.current_task(), Some(TaskId::new("task-1")));

        let done = handle.wait().await.unwrap();
        assert_eq!(done.status, TaskState::Completed);
        assert_eq!(done.results.get("Models/cells.json"), Some(&42));

        let polls = api.poll_times();
        assert_eq!(polls.len(), 3);
        for (i, at) in polls.iter().enumerate() {
            let expected = Duration::from_secs(i as u64 + 1);
            let elapsed = at.duration_since(started);
            assert!(
                elapsed >= expected && elapsed < expected + Duration::from_millis(10),
                "poll {} at {:?}",
                i,
                elapsed
            );
        }

        let progress = observer.progress.lock().unwrap().clone();
        assert_eq!(progress.len(), 3);
        assert_eq!(progress[0].status, TaskState::Running);
        assert_eq!(progress[1].status, TaskState::Running);

        let terminal = observer.terminal.lock().unwrap().clone();
        assert_eq!(terminal.len(), 1);
        assert_eq!(terminal[0].status, TaskState::Completed);

        assert_eq!(controller.phase(), ControllerPhase::Completed);
        assert!(!controller.is_in_flight());
        assert_eq!(controller.current_task(), None);

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(api.poll_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submit_while_running_is_refused() {
        let api = ScriptedApi::new(vec![running(0), running(1), completed()]);
        let observer = Arc::new(RecordingObserver::default());
        let controller = controller(&api, &observer);

        let first = controller.submit(inputs()).await.unwrap();
        let second = controller.submit(inputs()).await;

        assert!(matches!(second, Err(ExecutionError::AlreadyRunning)));
        assert_eq!(api.submit_count(), 1);
        assert_eq!(controller.current_task(), Some(first.task_id().clone()));

        first.wait().await.unwrap();
        assert_eq!(api.poll_count(), 3);
        assert_eq!(observer.terminal.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_submission_makes_no_calls() {
        let api = ScriptedApi::new(vec![]);
        let observer = Arc::new(RecordingObserver::default());
        let controller = controller(&api, &observer);

        let result = controller.submit(Vec::new()).await;

        assert!(matches!(result, Err(ExecutionError::Validation(_))));
        assert!(result.unwrap_err().is_rejected());
        assert_eq!(controller.phase(), ControllerPhase::Idle);

        time::sleep(Duration::from_secs(3)).await;
        assert_eq!(api.submit_count(), 0);
        assert_eq!(api.poll_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_on_first_check_stops_polling() {
        let api = ScriptedApi::new(vec![failed("Table 'cells' missing")]);
        let observer = Arc::new(RecordingObserver::default());
        let controller = controller(&api, &observer);

        let handle = controller.submit(inputs()).await.unwrap();
        let result = handle.wait().await;

        match result {
            Err(ExecutionError::JobFailure(message)) => {
                assert_eq!(message, "Table 'cells' missing")
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let terminal = observer.terminal.lock().unwrap().clone();
        assert_eq!(terminal.len(), 1);
        assert_eq!(terminal[0].status, TaskState::Failed);
        assert_eq!(controller.phase(), ControllerPhase::Failed);

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(api.poll_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_stops_polling() {
        let api = ScriptedApi::new(vec![]);
        let observer = Arc::new(RecordingObserver::default());
        let controller = controller(&api, &observer);

        let handle = controller.submit(inputs()).await.unwrap();
        time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(api.poll_count(), 2);
        assert_eq!(handle.latest().map(|s| s.status), Some(TaskState::Running));

        controller.teardown();
        assert_eq!(controller.phase(), ControllerPhase::Idle);
        assert!(!controller.is_in_flight());

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(api.poll_count(), 2);
        assert!(observer.terminal.lock().unwrap().is_empty());
        assert!(matches!(
            handle.wait().await,
            Err(ExecutionError::TrackingStopped)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_is_idempotent() {
        let api = ScriptedApi::new(vec![completed()]);
        let observer = Arc::new(RecordingObserver::default());
        let controller = controller(&api, &observer);

        controller.teardown();
        assert_eq!(controller.phase(), ControllerPhase::Idle);

        controller.submit(inputs()).await.unwrap().wait().await.unwrap();
        controller.teardown();
        controller.teardown();
        assert_eq!(controller.phase(), ControllerPhase::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_controller_stops_polling() {
        let api = ScriptedApi::new(vec![]);
        let observer = Arc::new(RecordingObserver::default());
        let controller = controller(&api, &observer);

        let _handle = controller.submit(inputs()).await.unwrap();
        time::sleep(Duration::from_millis(1500)).await;
        drop(controller);

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(api.poll_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_after_terminal_state_succeeds() {
        let api = ScriptedApi::new(vec![failed("boom"), running(0), completed()]);
        let observer = Arc::new(RecordingObserver::default());
        let controller = controller(&api, &observer);

        let first = controller.submit(inputs()).await.unwrap();
        assert!(first.wait().await.is_err());
        assert_eq!(controller.phase(), ControllerPhase::Failed);

        let second = controller.submit(inputs()).await.unwrap();
        assert_eq!(second.task_id(), &TaskId::new("task-2"));
        assert_eq!(controller.phase(), ControllerPhase::Running);

        let done = second.wait().await.unwrap();
        assert_eq!(done.status, TaskState::Completed);
        assert_eq!(controller.phase(), ControllerPhase::Completed);
        assert_eq!(api.submit_count(), 2);
        assert_eq!(observer.terminal.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_request_failure_aborts_tracking() {
        let api = ScriptedApi::new(vec![running(0), unavailable(), completed()]);
        let observer = Arc::new(RecordingObserver::default());
        let controller = controller(&api, &observer);

        let handle = controller.submit(inputs()).await.unwrap();
        let result = handle.wait().await;

        assert!(matches!(result, Err(ExecutionError::PollingTransport(_))));
        assert_eq!(controller.phase(), ControllerPhase::Failed);
        assert!(!controller.is_in_flight());
        assert_eq!(observer.errors.lock().unwrap().len(), 1);
        assert!(observer.terminal.lock().unwrap().is_empty());

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(api.poll_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_retry_tolerates_transient_failures() {
        let api = ScriptedApi::new(vec![unavailable(), unavailable(), running(1), completed()]);
        let observer = Arc::new(RecordingObserver::default());
        let config = PollConfig::default().with_max_poll_retries(2);
        let controller = controller_with(&api, &observer, config);

        let done = controller.submit(inputs()).await.unwrap().wait().await.unwrap();

        assert_eq!(done.status, TaskState::Completed);
        assert_eq!(api.poll_count(), 4);
        assert!(observer.errors.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_budget_counts_consecutive_failures() {
        let api = ScriptedApi::new(vec![unavailable(), running(0), unavailable(), unavailable()]);
        let observer = Arc::new(RecordingObserver::default());
        let config = PollConfig::default().with_max_poll_retries(1);
        let controller = controller_with(&api, &observer, config);

        let result = controller.submit(inputs()).await.unwrap().wait().await;

        assert!(matches!(result, Err(ExecutionError::PollingTransport(_))));
        assert_eq!(api.poll_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_duration_cutoff() {
        let api = ScriptedApi::new(vec![]);
        let observer = Arc::new(RecordingObserver::default());
        let config = PollConfig::default().with_max_duration(Some(Duration::from_secs(3)));
        let controller = controller_with(&api, &observer, config);

        let result = controller.submit(inputs()).await.unwrap().wait().await;

        match result {
            Err(ExecutionError::PollTimeout(limit)) => assert_eq!(limit, Duration::from_secs(3)),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(api.poll_count(), 2);
        assert_eq!(controller.phase(), ControllerPhase::Failed);
        assert_eq!(observer.errors.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_during_submission_discards_task() {
        let api = ScriptedApi::gated(vec![completed()]);
        let observer = Arc::new(RecordingObserver::default());
        let controller = Arc::new(controller(&api, &observer));

        let pending = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.submit(inputs()).await })
        };
        tokio::task::yield_now().await;

        assert!(controller.is_in_flight());
        assert!(matches!(
            controller.submit(inputs()).await,
            Err(ExecutionError::AlreadyRunning)
        ));

        controller.teardown();
        api.open_gate();

        let result = pending.await.unwrap();
        assert!(matches!(result, Err(ExecutionError::TrackingStopped)));

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(api.poll_count(), 0);
        assert_eq!(controller.phase(), ControllerPhase::Idle);
        assert!(!controller.is_in_flight());
    }

    /// Backend whose submission endpoint is down
    struct UnreachableApi;

    #[async_trait]
    impl TaskApi for UnreachableApi {
        async fn submit(&self, _inputs: &[String]) -> ClientResult<TaskId> {
            Err(ClientError::api_error(500, "Internal Server Error"))
        }

        async fn status(&self, _task_id: &TaskId) -> ClientResult<TaskStatus> {
            running(0)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_failure_tracks_nothing() {
        let observer = Arc::new(RecordingObserver::default());
        let controller = ExecutionController::new(
            Arc::new(UnreachableApi),
            observer.clone(),
            PollConfig::default(),
        )
        .unwrap();

        let result = controller.submit(inputs()).await;

        assert!(matches!(result, Err(ExecutionError::SubmissionTransport(_))));
        assert_eq!(controller.phase(), ControllerPhase::Idle);
        assert!(!controller.is_in_flight());
        assert!(observer.progress.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_config_is_rejected_up_front() {
        let api = ScriptedApi::new(vec![]);
        let observer = Arc::new(RecordingObserver::default());

        let zero_interval = PollConfig::default().with_poll_interval(Duration::ZERO);
        let result = ExecutionController::new(api.clone(), observer.clone(), zero_interval);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let short_limit = PollConfig::default()
            .with_poll_interval(Duration::from_secs(2))
            .with_max_duration(Some(Duration::from_secs(1)));
        let result = ExecutionController::new(api.clone(), observer.clone(), short_limit);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        assert_eq!(api.submit_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmit_after_tracking_stopped_mid_poll() {
        let api = ScriptedApi::new(vec![running(0)]);
        let observer = Arc::new(RecordingObserver::default());
        let controller = controller(&api, &observer);

        let first = controller.submit(inputs()).await.unwrap();
        time::sleep(Duration::from_millis(1500)).await;
        controller.teardown();
        assert!(matches!(first.wait().await, Err(ExecutionError::TrackingStopped)));

        let second = controller.submit(inputs()).await.unwrap();
        assert_eq!(second.task_id(), &TaskId::new("task-2"));
        assert_eq!(controller.phase(), ControllerPhase::Running);
    }
}
