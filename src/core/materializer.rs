//! Turns tree text into real directories and empty files, one line at a time.

use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::error::{BuildError, CoreError};
use super::events::{percent_of, BuildEvent, ProgressMessage};
use super::parser::{classify_line, InputLine, ParsedEntry};
use super::path_stack::PathStack;

/// Counts of what a run did, returned after the completion event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub directories_created: usize,
    pub files_created: usize,
    /// Non-fatal error events emitted.
    pub errors: usize,
    pub cancelled: bool,
    /// The run was aborted by a critical error.
    pub aborted: bool,
}

/// Builds a directory tree from its textual diagram.
///
/// A materializer holds only settings; all run state (the path stack, the
/// cancellation flag) is created per call to [`TreeMaterializer::run`].
#[derive(Debug, Clone, Default)]
pub struct TreeMaterializer {
    line_delay: Duration,
}

impl TreeMaterializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pauses for `delay` after each line that reached the filesystem, so
    /// observers can follow progress. Zero disables pacing.
    pub fn with_line_delay(mut self, delay: Duration) -> Self {
        self.line_delay = delay;
        self
    }

    pub fn line_delay(&self) -> Duration {
        self.line_delay
    }

    /// Materializes `tree_text` below `output_root`.
    ///
    /// Events are passed to `emit` in the order they happen. Per-line problems
    /// are reported and skipped; only a failure outside line handling (such as
    /// an unusable output root) ends the run early. [`BuildEvent::Complete`] is
    /// always the last event, emitted exactly once.
    ///
    /// `cancel_flag` is checked before every line. Once it is set no further
    /// filesystem changes are made.
    pub async fn run<F>(
        &self,
        tree_text: &str,
        output_root: &Path,
        cancel_flag: Arc<AtomicBool>,
        mut emit: F,
    ) -> RunSummary
    where
        F: FnMut(BuildEvent) + Send,
    {
        let mut summary = RunSummary::default();

        if let Err(e) = self
            .process_lines(tree_text, output_root, &cancel_flag, &mut emit, &mut summary)
            .await
        {
            tracing::error!("Tree build aborted: {}", e);
            summary.aborted = true;
            emit(BuildEvent::Error(BuildError::Critical(e.to_string())));
        }

        tracing::info!(
            "Tree build finished: {} directories, {} files, {} errors (cancelled: {})",
            summary.directories_created,
            summary.files_created,
            summary.errors,
            summary.cancelled
        );
        emit(BuildEvent::Complete);
        summary
    }

    async fn process_lines<F>(
        &self,
        tree_text: &str,
        output_root: &Path,
        cancel_flag: &AtomicBool,
        emit: &mut F,
        summary: &mut RunSummary,
    ) -> Result<(), CoreError>
    where
        F: FnMut(BuildEvent) + Send,
    {
        tokio::fs::create_dir_all(output_root)
            .await
            .map_err(|source| CoreError::Io {
                path: output_root.to_path_buf(),
                source,
            })?;
        emit(BuildEvent::progress(0, ProgressMessage::Starting));

        let lines = input_lines(tree_text);
        let total = lines.len();
        tracing::info!("Building {} lines into {:?}", total, output_root);

        let mut stack = PathStack::new(output_root);

        for (idx, text) in lines.iter().enumerate() {
            if cancel_flag.load(Ordering::SeqCst) {
                tracing::info!("🛑 Build stopped before line {}", idx + 1);
                summary.cancelled = true;
                emit(BuildEvent::progress(
                    percent_of(idx, total),
                    ProgressMessage::StoppedByUser,
                ));
                return Ok(());
            }

            let line = InputLine::new(idx + 1, text);
            if line.is_blank() {
                continue;
            }

            let entry = match classify_line(&line) {
                Ok(entry) => entry,
                Err(err) => {
                    if let Some(event) = err.into_event() {
                        tracing::warn!("{}", event);
                        summary.errors += 1;
                        emit(BuildEvent::Error(event));
                    }
                    continue;
                }
            };

            let resolution = stack.resolve(entry.depth);
            for _ in 0..resolution.synthesized_levels {
                tracing::warn!("Unusual indentation on line {}", line.number);
                summary.errors += 1;
                emit(BuildEvent::Error(BuildError::IndentationAnomaly {
                    line: line.number,
                }));
            }

            let current_path = resolution.parent.join(&entry.sanitized_name);
            match create_entry(&entry, &current_path).await {
                Ok(()) => {
                    let percent = percent_of(idx + 1, total);
                    let message = if entry.is_directory {
                        tracing::debug!("Created directory {:?}", current_path);
                        summary.directories_created += 1;
                        stack.push_directory(current_path);
                        ProgressMessage::DirectoryCreated {
                            name: entry.sanitized_name,
                        }
                    } else {
                        tracing::debug!("Created file {:?}", current_path);
                        summary.files_created += 1;
                        ProgressMessage::FileCreated {
                            name: entry.sanitized_name,
                        }
                    };
                    emit(BuildEvent::progress(percent, message));
                }
                Err(source) => {
                    let event = BuildError::from_io(line.number, current_path, source);
                    tracing::warn!("{}", event);
                    summary.errors += 1;
                    emit(BuildEvent::Error(event));
                }
            }

            if !self.line_delay.is_zero() {
                tokio::time::sleep(self.line_delay).await;
            }
        }

        emit(BuildEvent::progress(100, ProgressMessage::Done));
        Ok(())
    }
}

/// Splits input into lines, dropping leading and trailing blank lines.
/// Interior blank lines are kept and count toward progress.
fn input_lines(text: &str) -> Vec<&str> {
    let lines: Vec<&str> = text.lines().collect();
    let is_content = |line: &&str| !line.trim().is_empty();
    let Some(first) = lines.iter().position(is_content) else {
        return Vec::new();
    };
    let last = lines.iter().rposition(is_content).unwrap_or(first);
    lines[first..=last].to_vec()
}

/// Creates the directory or empty file for `entry` at `path`.
///
/// Both operations are idempotent: existing directories are kept and existing
/// files are truncated.
async fn create_entry(entry: &ParsedEntry, path: &Path) -> io::Result<()> {
    if entry.is_directory {
        return tokio::fs::create_dir_all(path).await;
    }
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::File::create(path).await.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::core::events::ProgressEvent;
    use crate::utils::test_helpers::running_as_root;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use tracing_test::traced_test;

    const SAMPLE_TREE: &str = "root/\n├── src/\n│   └── main.txt\n└── README.md";

    async fn build(text: &str, root: &Path) -> (Vec<BuildEvent>, RunSummary) {
        let mut events = Vec::new();
        let summary = TreeMaterializer::new()
            .run(text, root, Arc::new(AtomicBool::new(false)), |e| {
                events.push(e)
            })
            .await;
        (events, summary)
    }

    fn progress(events: &[BuildEvent]) -> Vec<&ProgressEvent> {
        events
            .iter()
            .filter_map(|e| match e {
                BuildEvent::Progress(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    fn error_kinds(events: &[BuildEvent]) -> Vec<ErrorKind> {
        events
            .iter()
            .filter_map(|e| match e {
                BuildEvent::Error(err) => Some(err.kind()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn input_lines_trims_outer_blank_lines_only() {
        assert_eq!(input_lines("\n\n a\n\nb\n  \n"), vec![" a", "", "b"]);
        assert!(input_lines("  \n\t\n").is_empty());
        assert_eq!(input_lines("a\r\nb"), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn builds_a_small_tree() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("OUT");

        let (events, summary) = build(SAMPLE_TREE, &out).await;

        assert!(out.join("root").is_dir());
        assert!(out.join("root/src").is_dir());
        assert!(out.join("root/src/main.txt").is_file());
        assert!(out.join("root/README.md").is_file());
        assert!(!out.join("root/src/README.md").exists());
        assert_eq!(fs::metadata(out.join("root/README.md")).unwrap().len(), 0);

        assert_eq!(summary.directories_created, 2);
        assert_eq!(summary.files_created, 2);
        assert_eq!(summary.errors, 0);
        assert!(error_kinds(&events).is_empty());

        let percents: Vec<u8> = progress(&events).iter().map(|p| p.percent).collect();
        assert_eq!(percents, vec![0, 25, 50, 75, 100, 100]);
        assert!(events.last().unwrap().is_complete());
        assert_eq!(events.iter().filter(|e| e.is_complete()).count(), 1);
    }

    #[tokio::test]
    async fn progress_messages_name_the_created_entries() {
        let tmp = TempDir::new().unwrap();
        let (events, _) = build("docs/\n└── guide.md", tmp.path()).await;

        let messages: Vec<ProgressMessage> =
            progress(&events).into_iter().map(|p| p.message.clone()).collect();
        assert_eq!(
            messages,
            vec![
                ProgressMessage::Starting,
                ProgressMessage::DirectoryCreated {
                    name: "docs".into()
                },
                ProgressMessage::FileCreated {
                    name: "guide.md".into()
                },
                ProgressMessage::Done,
            ]
        );
    }

    #[tokio::test]
    async fn annotation_lines_are_skipped_silently() {
        let tmp = TempDir::new().unwrap();
        let (events, summary) = build("app/\n├── (placeholder)\n└── real.txt", tmp.path()).await;

        assert!(error_kinds(&events).is_empty());
        assert_eq!(summary.files_created, 1);
        let names: Vec<_> = fs::read_dir(tmp.path().join("app"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["real.txt"]);
    }

    #[tokio::test]
    async fn unparseable_lines_report_once_and_continue() {
        let tmp = TempDir::new().unwrap();
        let (events, summary) = build("┣━━ bad\nok.txt", tmp.path()).await;

        assert_eq!(error_kinds(&events), vec![ErrorKind::Unparseable]);
        assert_eq!(summary.errors, 1);
        assert!(tmp.path().join("ok.txt").is_file());
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn indentation_jumps_attach_to_the_last_directory() {
        let tmp = TempDir::new().unwrap();
        // Depth 3 right after a depth-0 directory: two levels are synthesized.
        let text = "top/\n            lost.txt";
        let (events, summary) = build(text, tmp.path()).await;

        assert_eq!(
            error_kinds(&events),
            vec![ErrorKind::IndentationAnomaly, ErrorKind::IndentationAnomaly]
        );
        assert_eq!(summary.errors, 2);
        assert!(tmp.path().join("top/lost.txt").is_file());
    }

    #[tokio::test]
    #[traced_test]
    async fn anomalies_and_failures_are_logged() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("taken"), "").unwrap();

        build("dir/\n            deep.txt\ntaken/", tmp.path()).await;

        assert!(logs_contain("Unusual indentation on line 2"));
        assert!(logs_contain("failed to create"));
        assert!(logs_contain("Tree build finished: 1 directories, 1 files, 3 errors"));
    }

    #[tokio::test]
    async fn files_never_become_parents() {
        let tmp = TempDir::new().unwrap();
        let text = "a.txt\n    b.txt";
        let (events, _) = build(text, tmp.path()).await;

        assert_eq!(error_kinds(&events), vec![ErrorKind::IndentationAnomaly]);
        assert!(tmp.path().join("a.txt").is_file());
        assert!(tmp.path().join("b.txt").is_file());
    }

    #[tokio::test]
    async fn rerunning_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        build(SAMPLE_TREE, tmp.path()).await;
        fs::write(tmp.path().join("root/README.md"), "stale").unwrap();

        let (events, summary) = build(SAMPLE_TREE, tmp.path()).await;

        assert!(error_kinds(&events).is_empty());
        assert_eq!(summary.files_created, 2);
        assert_eq!(fs::metadata(tmp.path().join("root/README.md")).unwrap().len(), 0);
        assert_eq!(fs::read_dir(tmp.path().join("root")).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn filesystem_errors_do_not_stop_the_run() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("clash"), "").unwrap();

        // `clash` exists as a file, so the directory cannot be created.
        let (events, summary) = build("clash/\nafter.txt", tmp.path()).await;

        assert_eq!(error_kinds(&events), vec![ErrorKind::FilesystemError]);
        match &events[1] {
            BuildEvent::Error(BuildError::Filesystem { line, path, .. }) => {
                assert_eq!(*line, 1);
                assert_eq!(path, &tmp.path().join("clash"));
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(tmp.path().join("after.txt").is_file());
        assert!(!summary.aborted);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn permission_errors_are_reported_per_entry() {
        use std::os::unix::fs::PermissionsExt;

        if running_as_root() {
            return;
        }
        let tmp = TempDir::new().unwrap();
        let locked = tmp.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        let (events, summary) = build("locked/\n    inner.txt\nfree.txt", tmp.path()).await;
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(error_kinds(&events), vec![ErrorKind::PermissionDenied]);
        assert_eq!(summary.errors, 1);
        assert!(!locked.join("inner.txt").exists());
        assert!(tmp.path().join("free.txt").is_file());
    }

    #[tokio::test]
    async fn unusable_output_root_is_critical() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, "").unwrap();
        let out: PathBuf = blocker.join("out");

        let (events, summary) = build(SAMPLE_TREE, &out).await;

        assert!(summary.aborted);
        assert_eq!(events.len(), 2);
        assert_eq!(error_kinds(&events), vec![ErrorKind::Critical]);
        assert!(events[1].is_complete());
    }

    #[tokio::test]
    async fn cancellation_before_start_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let mut events = Vec::new();

        let summary = TreeMaterializer::new()
            .run(SAMPLE_TREE, &out, Arc::new(AtomicBool::new(true)), |e| {
                events.push(e)
            })
            .await;

        assert!(summary.cancelled);
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
        let stops: Vec<_> = progress(&events)
            .into_iter()
            .filter(|p| p.message == ProgressMessage::StoppedByUser)
            .collect();
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].percent, 0);
        assert!(events.last().unwrap().is_complete());
    }

    #[tokio::test]
    async fn cancellation_takes_effect_at_the_next_line() {
        let tmp = TempDir::new().unwrap();
        let flag = Arc::new(AtomicBool::new(false));
        let flag_in_sink = flag.clone();
        let mut events = Vec::new();

        // Stop as soon as the first directory has been created.
        let summary = TreeMaterializer::new()
            .run(SAMPLE_TREE, tmp.path(), flag, |e| {
                if matches!(
                    &e,
                    BuildEvent::Progress(ProgressEvent {
                        message: ProgressMessage::DirectoryCreated { .. },
                        ..
                    })
                ) {
                    flag_in_sink.store(true, Ordering::SeqCst);
                }
                events.push(e);
            })
            .await;

        assert!(summary.cancelled);
        assert!(tmp.path().join("root").is_dir());
        assert!(!tmp.path().join("root/src").exists());

        let last_progress = progress(&events).last().copied().cloned().unwrap();
        assert_eq!(
            last_progress,
            ProgressEvent {
                percent: 25,
                message: ProgressMessage::StoppedByUser
            }
        );
        assert_eq!(events.iter().filter(|e| e.is_complete()).count(), 1);
    }

    #[tokio::test]
    async fn empty_input_completes_at_full_progress() {
        let tmp = TempDir::new().unwrap();
        let (events, summary) = build("\n   \n", tmp.path()).await;

        assert_eq!(summary, RunSummary::default());
        let percents: Vec<u8> = progress(&events).iter().map(|p| p.percent).collect();
        assert_eq!(percents, vec![0, 100]);
    }

    #[tokio::test]
    async fn pacing_delay_is_applied() {
        let tmp = TempDir::new().unwrap();
        let materializer = TreeMaterializer::new().with_line_delay(Duration::from_millis(5));
        assert_eq!(materializer.line_delay(), Duration::from_millis(5));

        let started = std::time::Instant::now();
        materializer
            .run("a\nb\nc", tmp.path(), Arc::new(AtomicBool::new(false)), |_| {})
            .await;
        assert!(started.elapsed() >= Duration::from_millis(15));
    }
}
