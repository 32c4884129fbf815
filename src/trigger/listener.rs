//! Trigger listener on a named pipe
//!
//! Runs on a dedicated thread because opening and reading a FIFO blocks.
//! Each line read is one press. When the writer closes the pipe the listener
//! reopens it and waits for the next writer.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::gate::{PressResult, StartGate};

/// Events sent from the trigger listener to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    Pressed,
}

/// Listens for button presses written to a FIFO
pub struct TriggerListener {
    fifo_path: PathBuf,
    event_tx: mpsc::Sender<TriggerEvent>,
    gate: StartGate,
    running: Arc<AtomicBool>,
}

impl TriggerListener {
    pub fn new(
        fifo_path: impl Into<PathBuf>,
        event_tx: mpsc::Sender<TriggerEvent>,
        gate: StartGate,
    ) -> Self {
        Self {
            fifo_path: fifo_path.into(),
            event_tx,
            gate,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the listener thread.
    ///
    /// The path must already exist and be a FIFO; a regular file would be
    /// re-read forever.
    pub fn start(&self) -> Result<(), TriggerError> {
        check_fifo(&self.fifo_path)?;

        if self.running.swap(true, Ordering::SeqCst) {
            return Err(TriggerError::AlreadyRunning);
        }

        let event_tx = self.event_tx.clone();
        let gate = self.gate.clone();
        let running = Arc::clone(&self.running);
        let path = self.fifo_path.clone();

        thread::Builder::new()
            .name("trigger-listener".to_string())
            .spawn(move || {
                info!(path = %path.display(), "trigger listener thread started");

                if let Err(e) = read_presses(&path, &event_tx, &gate, &running) {
                    error!(?e, "trigger listener error");
                }

                running.store(false, Ordering::SeqCst);
                info!("trigger listener thread stopped");
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                TriggerError::ThreadSpawn(e.to_string())
            })?;

        Ok(())
    }

    /// Ask the listener to stop. A thread blocked waiting for a writer exits
    /// once the next writer opens the pipe, or with the process.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Errors that can occur in the trigger listener
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    #[error("trigger listener is already running")]
    AlreadyRunning,

    #[error("{0} is not a named pipe")]
    NotAFifo(PathBuf),

    #[error("failed to open trigger pipe {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to spawn listener thread: {0}")]
    ThreadSpawn(String),

    #[error("session stopped receiving trigger events")]
    ChannelClosed,
}

fn check_fifo(path: &Path) -> Result<(), TriggerError> {
    let metadata = std::fs::metadata(path).map_err(|source| TriggerError::Open {
        path: path.to_owned(),
        source,
    })?;

    if !metadata.file_type().is_fifo() {
        return Err(TriggerError::NotAFifo(path.to_owned()));
    }
    Ok(())
}

fn read_presses(
    path: &Path,
    event_tx: &mpsc::Sender<TriggerEvent>,
    gate: &StartGate,
    running: &AtomicBool,
) -> Result<(), TriggerError> {
    while running.load(Ordering::SeqCst) {
        // Blocks until a writer opens the pipe
        let file = File::open(path).map_err(|source| TriggerError::Open {
            path: path.to_owned(),
            source,
        })?;

        for line in BufReader::new(file).lines() {
            if !running.load(Ordering::SeqCst) {
                return Ok(());
            }
            if let Err(e) = line {
                warn!(?e, "failed to read trigger pipe");
                break;
            }

            debug!("trigger pressed");
            if gate.press(event_tx) == PressResult::Disconnected {
                return Err(TriggerError::ChannelClosed);
            }
        }

        debug!("trigger writer closed pipe, reopening");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    fn make_fifo(dir: &Path) -> PathBuf {
        let path = dir.join("button");
        let status = std::process::Command::new("mkfifo")
            .arg(&path)
            .status()
            .unwrap();
        assert!(status.success());
        path
    }

    #[test]
    fn test_listener_creation() {
        let (tx, _rx) = mpsc::channel(4);
        let listener = TriggerListener::new("/nonexistent/button", tx, StartGate::new());
        assert!(!listener.is_running());
    }

    #[test]
    fn test_rejects_missing_path() {
        let (tx, _rx) = mpsc::channel(4);
        let listener = TriggerListener::new("/nonexistent/button", tx, StartGate::new());
        assert!(matches!(listener.start(), Err(TriggerError::Open { .. })));
        assert!(!listener.is_running());
    }

    #[test]
    fn test_rejects_regular_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let (tx, _rx) = mpsc::channel(4);
        let listener = TriggerListener::new(file.path(), tx, StartGate::new());
        assert!(matches!(listener.start(), Err(TriggerError::NotAFifo(_))));
    }

    fn write_presses(path: PathBuf, data: &'static [u8]) -> tokio::task::JoinHandle<()> {
        tokio::task::spawn_blocking(move || {
            let mut pipe = std::fs::OpenOptions::new().write(true).open(path).unwrap();
            pipe.write_all(data).unwrap();
        })
    }

    #[tokio::test]
    async fn test_each_line_is_a_press() {
        let dir = tempfile::tempdir().unwrap();
        let path = make_fifo(dir.path());

        let gate = StartGate::new();
        gate.open();
        let (tx, mut rx) = mpsc::channel(4);
        let listener = TriggerListener::new(&path, tx, gate);
        listener.start().unwrap();
        assert!(matches!(listener.start(), Err(TriggerError::AlreadyRunning)));

        write_presses(path.clone(), b"press\npress\n").await.unwrap();

        for _ in 0..2 {
            let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .unwrap();
            assert_eq!(event, Some(TriggerEvent::Pressed));
        }

        listener.stop();
    }

    #[tokio::test]
    async fn test_press_with_closed_gate_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = make_fifo(dir.path());

        let gate = StartGate::new();
        let (tx, mut rx) = mpsc::channel(4);
        let listener = TriggerListener::new(&path, tx, gate.clone());
        listener.start().unwrap();

        write_presses(path.clone(), b"press\n").await.unwrap();
        let early = tokio::time::timeout(Duration::from_millis(300), rx.recv()).await;
        assert!(early.is_err());

        gate.open();
        write_presses(path.clone(), b"press\n").await.unwrap();
        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap();
        assert_eq!(event, Some(TriggerEvent::Pressed));

        listener.stop();
    }
}
