//! Worker thread for folio's document I/O.
//!
//! Opening and saving documents happens off the UI thread. Requests [WorkerTask] come in from the
//! AppState via a channel, and results or errors [WorkerResponse] go back the same way.
//!
//! Every task carries a `request_id`. The app only applies a response whose id matches the
//! request it is still waiting for, so a slow open that the user has already backed out of is
//! dropped instead of replacing the current screen.
//!
//! # Caution:
//! This module is a protocol boundary. Adding or changing variants requires matching changes in
//! the response handling in `app::state`.

use crate::core::error::Error;
use crate::core::loader::{ContentLoader, FileSession};
use crate::core::locator::Locator;

use crossbeam_channel::{Receiver, Sender, unbounded};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// Channels to the I/O worker.
pub struct Workers {
    io_tx: Sender<WorkerTask>,
    response_rx: Receiver<WorkerResponse>,
    active: Arc<AtomicUsize>,
}

impl Workers {
    /// Spawns the I/O worker thread. It runs until every sender is dropped.
    pub fn spawn(loader: Arc<ContentLoader>) -> Self {
        let (io_tx, io_rx) = unbounded::<WorkerTask>();
        let (res_tx, response_rx) = unbounded::<WorkerResponse>();
        let active = Arc::new(AtomicUsize::new(0));

        start_io_worker(io_rx, res_tx, loader, Arc::clone(&active));

        Self {
            io_tx,
            response_rx,
            active,
        }
    }

    pub fn io_tx(&self) -> &Sender<WorkerTask> {
        &self.io_tx
    }

    pub fn response_rx(&self) -> &Receiver<WorkerResponse> {
        &self.response_rx
    }

    /// Queues a task, counting it as in flight until its response is sent.
    ///
    /// Returns false when the worker is gone.
    pub fn submit(&self, task: WorkerTask) -> bool {
        self.active.fetch_add(1, Ordering::SeqCst);
        if self.io_tx.send(task).is_err() {
            self.active.fetch_sub(1, Ordering::SeqCst);
            log::error!("I/O worker is not running");
            return false;
        }
        true
    }

    /// Tasks submitted but not yet answered.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn is_busy(&self) -> bool {
        self.active() > 0
    }
}

/// Tasks sent to the worker thread.
#[derive(Debug)]
pub enum WorkerTask {
    Open {
        locator: Locator,
        request_id: u64,
    },
    Save {
        locator: Locator,
        content: String,
        request_id: u64,
    },
}

impl WorkerTask {
    pub fn request_id(&self) -> u64 {
        match self {
            WorkerTask::Open { request_id, .. } | WorkerTask::Save { request_id, .. } => {
                *request_id
            }
        }
    }
}

/// Responses sent from the worker thread back to the main thread.
#[derive(Debug)]
pub enum WorkerResponse {
    Opened {
        session: Box<FileSession>,
        request_id: u64,
    },
    OpenFailed {
        locator: Locator,
        error: Error,
        request_id: u64,
    },
    Saved {
        locator: Locator,
        content: String,
        request_id: u64,
    },
    SaveFailed {
        locator: Locator,
        error: Error,
        request_id: u64,
    },
}

impl WorkerResponse {
    pub fn request_id(&self) -> u64 {
        match self {
            WorkerResponse::Opened { request_id, .. }
            | WorkerResponse::OpenFailed { request_id, .. }
            | WorkerResponse::Saved { request_id, .. }
            | WorkerResponse::SaveFailed { request_id, .. } => *request_id,
        }
    }
}

/// Starts the io worker thread, which listens for [WorkerTask] and answers with [WorkerResponse].
///
/// # Arguments
/// * `task_rx` - Receiver channel for incoming tasks
/// * `res_tx` - Sender channel for outgoing responses
/// * `loader` - Loader doing the actual reads and writes
/// * `active` - In-flight counter shared with [Workers]
fn start_io_worker(
    task_rx: Receiver<WorkerTask>,
    res_tx: Sender<WorkerResponse>,
    loader: Arc<ContentLoader>,
    active: Arc<AtomicUsize>,
) {
    thread::spawn(move || {
        while let Ok(task) = task_rx.recv() {
            log::trace!("worker picked up request {}", task.request_id());
            let response = match task {
                WorkerTask::Open {
                    locator,
                    request_id,
                } => match loader.open(&locator) {
                    Ok(session) => WorkerResponse::Opened {
                        session: Box::new(session),
                        request_id,
                    },
                    Err(error) => {
                        log::warn!("open {} failed: {}", locator, error);
                        WorkerResponse::OpenFailed {
                            locator,
                            error,
                            request_id,
                        }
                    }
                },
                WorkerTask::Save {
                    locator,
                    content,
                    request_id,
                } => match loader.save(&locator, &content) {
                    Ok(()) => WorkerResponse::Saved {
                        locator,
                        content,
                        request_id,
                    },
                    Err(error) => {
                        log::error!("save {} failed: {}", locator, error);
                        WorkerResponse::SaveFailed {
                            locator,
                            error,
                            request_id,
                        }
                    }
                },
            };
            active.fetch_sub(1, Ordering::SeqCst);
            let _ = res_tx.send(response);
        }
    });
}
