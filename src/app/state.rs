//! Defines the mutable state that owns the active build.

use crate::app::messages::Messages;
use crate::config::AppConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

/// Holds the application's configuration and the bookkeeping for at most
/// one running build.
///
/// This struct is wrapped in an `Arc<Mutex<...>>` so the caller's task and
/// the build task can both reach it.
pub struct AppState {
    /// The application's configuration settings.
    pub config: AppConfig,
    /// `true` while a build is running. Cleared before its completion event
    /// is delivered.
    pub is_building: bool,
    /// A handle to the currently running build task.
    pub build_task: Option<JoinHandle<()>>,
    /// The flag the running build checks before every line.
    pub build_cancellation_flag: Arc<AtomicBool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            is_building: false,
            build_task: None,
            build_cancellation_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_building(&self) -> bool {
        self.is_building
    }

    /// Asks the running build to stop at the next line boundary.
    ///
    /// Safe to call at any time and any number of times. The task is never
    /// aborted, so the completion event is still delivered.
    pub fn request_stop(&self) {
        self.stop_handle().request_stop();
    }

    /// A lock-free handle to the current build's cancellation flag.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(self.build_cancellation_flag.clone())
    }

    /// Message formatter for the configured language.
    pub fn messages(&self) -> Messages {
        Messages::new(self.config.language)
    }
}

/// Requests cancellation of one build without touching the shared state.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub(crate) fn new(flag: Arc<AtomicBool>) -> Self {
        Self(flag)
    }

    pub fn request_stop(&self) {
        if !self.0.swap(true, Ordering::SeqCst) {
            tracing::info!("Stop requested for the running build.");
        }
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Locks the shared state, recovering the data if a previous holder panicked.
pub fn lock_state(state: &Mutex<AppState>) -> MutexGuard<'_, AppState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
