//! Debounced text input
//!
//! Keystrokes update a local echo immediately; the committed value only moves
//! once no keystroke has arrived for the debounce period. Dropping the input
//! cancels any pending commit.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Debounce period used when none is configured
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

type CommitCallback = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Debug)]
enum Command {
    /// A keystroke: restart the timer with this value pending
    Input(String, u64),
    /// The upstream value changed: drop any pending value without committing
    Sync(String),
}

/// A text input whose committed value trails keystrokes by a quiet period
///
/// Must be created inside a tokio runtime; the timer runs on a task owned by
/// this value and is aborted when it is dropped.
pub struct DebouncedInput {
    value: String,
    commands: mpsc::UnboundedSender<Command>,
    committed: watch::Receiver<String>,
    /// Bumped by every input and sync; a pending value only commits while
    /// its generation is still current
    generation: Arc<AtomicU64>,
    worker: JoinHandle<()>,
}

impl DebouncedInput {
    pub fn new(initial: impl Into<String>, debounce: Duration) -> Self {
        Self::build(initial.into(), debounce, None)
    }

    /// Like [`DebouncedInput::new`], also calling `on_commit` for every commit
    pub fn with_callback(
        initial: impl Into<String>,
        debounce: Duration,
        on_commit: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        Self::build(initial.into(), debounce, Some(Arc::new(on_commit)))
    }

    fn build(initial: String, debounce: Duration, on_commit: Option<CommitCallback>) -> Self {
        let (commands, rx) = mpsc::unbounded_channel();
        let (tx, committed) = watch::channel(initial.clone());
        let generation = Arc::new(AtomicU64::new(0));
        let worker = tokio::spawn(run(rx, tx, generation.clone(), debounce, on_commit));

        Self {
            value: initial,
            commands,
            committed,
            generation,
            worker,
        }
    }

    /// The always-current local echo of what was typed
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The last committed value
    pub fn committed(&self) -> String {
        self.committed.borrow().clone()
    }

    /// Receiver notified on every commit
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.committed.clone()
    }

    /// Record a keystroke
    pub fn input(&mut self, value: impl Into<String>) {
        self.value = value.into();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        // Only fails once the worker is gone, in which case nothing may propagate
        let _ = self.commands.send(Command::Input(self.value.clone(), generation));
    }

    /// Adopt a value set from upstream, cancelling any pending commit
    ///
    /// No earlier keystroke commits once this returns, even if its timer has
    /// already fired and the worker has not yet seen the sync.
    pub fn sync(&mut self, value: impl Into<String>) {
        self.value = value.into();
        {
            // Commits happen under the watch write lock, so holding a read
            // borrow orders this bump before or after any in-flight commit
            let _current = self.committed.borrow();
            self.generation.fetch_add(1, Ordering::SeqCst);
        }
        let _ = self.commands.send(Command::Sync(self.value.clone()));
    }
}

impl Drop for DebouncedInput {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

async fn run(
    mut commands: mpsc::UnboundedReceiver<Command>,
    committed: watch::Sender<String>,
    generation: Arc<AtomicU64>,
    debounce: Duration,
    on_commit: Option<CommitCallback>,
) {
    let mut pending: Option<(String, u64)> = None;
    let timer = tokio::time::sleep(debounce);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Input(value, generation)) => {
                    trace!(value = %value, "Keystroke, debounce timer restarted");
                    pending = Some((value, generation));
                    timer.as_mut().reset(Instant::now() + debounce);
                }
                Some(Command::Sync(value)) => {
                    pending = None;
                    committed.send_if_modified(|current| {
                        *current = value;
                        false
                    });
                }
                None => break,
            },
            () = &mut timer, if pending.is_some() => {
                if let Some((value, pending_generation)) = pending.take() {
                    let accepted = committed.send_if_modified(|current| {
                        if generation.load(Ordering::SeqCst) != pending_generation {
                            return false;
                        }
                        current.clone_from(&value);
                        true
                    });
                    if !accepted {
                        trace!(value = %value, "Superseded input dropped");
                        continue;
                    }
                    debug!(value = %value, "Debounced input committed");
                    if let Some(callback) = &on_commit {
                        callback(&value);
                    }
                }
            }
        }
    }
}
