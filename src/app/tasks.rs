//! Starts builds on background tasks and forwards their events to the caller.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use super::proxy::EventProxy;
use super::state::{lock_state, AppState, StopHandle};
use crate::core::{BuildError, BuildEvent, CoreError, TreeMaterializer};

/// The two inputs of a build: the tree diagram and where to create it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub tree_text: String,
    pub output_dir: PathBuf,
}

/// A request that cannot be started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no directory tree was provided")]
    MissingTree,
    #[error("no output directory was selected")]
    MissingOutput,
}

#[derive(Debug, Error)]
pub enum StartError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("a build is already running")]
    AlreadyRunning,
}

impl BuildRequest {
    pub fn new(tree_text: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            tree_text: tree_text.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.tree_text.trim().is_empty() {
            return Err(ValidationError::MissingTree);
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingOutput);
        }
        Ok(())
    }
}

/// Validates `request` and starts building it on a background task.
///
/// Every event of the run is forwarded to `proxy` in order, ending with
/// exactly one [`BuildEvent::Complete`]. Only one build may run per state;
/// a second call while one is active fails with [`StartError::AlreadyRunning`].
///
/// Must be called from within a Tokio runtime.
pub fn start_build<P: EventProxy>(
    request: BuildRequest,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) -> Result<StopHandle, StartError> {
    request.validate()?;

    let mut state_guard = lock_state(&state);
    if state_guard.is_building {
        tracing::warn!("Refusing to start a build while another one is running.");
        return Err(StartError::AlreadyRunning);
    }

    let cancel_flag = Arc::new(AtomicBool::new(false));
    state_guard.build_cancellation_flag = cancel_flag.clone();
    state_guard.is_building = true;

    let materializer = TreeMaterializer::new().with_line_delay(state_guard.config.line_delay());

    tracing::info!("Spawning build task for {:?}", request.output_dir);
    let task_state = state.clone();
    let task_flag = cancel_flag.clone();
    let handle = tokio::spawn(async move {
        build_tree_task(materializer, request, task_flag, proxy, task_state).await;
    });
    state_guard.build_task = Some(handle);

    Ok(StopHandle::new(cancel_flag))
}

/// Runs one build and guarantees a single completion event, even if the
/// run itself panics.
async fn build_tree_task<P: EventProxy>(
    materializer: TreeMaterializer,
    request: BuildRequest,
    cancel_flag: Arc<AtomicBool>,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let completed = Arc::new(AtomicBool::new(false));

    let sink_proxy = proxy.clone();
    let sink_state = state.clone();
    let sink_completed = completed.clone();
    let emit = move |event: BuildEvent| {
        if event.is_complete() {
            finish_build(&sink_state);
            sink_completed.store(true, Ordering::SeqCst);
        }
        sink_proxy.send_event(event);
    };

    let run = tokio::spawn(async move {
        materializer
            .run(&request.tree_text, &request.output_dir, cancel_flag, emit)
            .await
    });

    match run.await {
        Ok(summary) => {
            tracing::info!("Build task finished: {:?}", summary);
        }
        Err(e) => {
            let error = CoreError::from(e);
            tracing::error!("Build task failed: {}", error);
            if !completed.load(Ordering::SeqCst) {
                finish_build(&state);
                proxy.send_event(BuildEvent::Error(BuildError::Critical(error.to_string())));
                proxy.send_event(BuildEvent::Complete);
            }
        }
    }
}

/// Marks the state idle so a new build can start once completion is seen.
fn finish_build(state: &Mutex<AppState>) {
    let mut state_guard = lock_state(state);
    state_guard.is_building = false;
    state_guard.build_task = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_rejects_missing_inputs() {
        assert_eq!(
            BuildRequest::new("  \n\t", "/out").validate(),
            Err(ValidationError::MissingTree)
        );
        assert_eq!(
            BuildRequest::new("a/", "").validate(),
            Err(ValidationError::MissingOutput)
        );
        assert_eq!(BuildRequest::new("a/", "/out").validate(), Ok(()));
    }

    #[tokio::test]
    async fn invalid_requests_never_start() {
        let state = Arc::new(Mutex::new(AppState::default()));
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel::<BuildEvent>();

        let result = start_build(BuildRequest::new("", "/out"), tx, state.clone());

        assert!(matches!(
            result,
            Err(StartError::Invalid(ValidationError::MissingTree))
        ));
        assert!(!lock_state(&state).is_building());
    }
}
