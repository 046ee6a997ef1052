use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::{DataFetcher, TokenProvider, load_page};
use crate::model::ODataPage;
use crate::pagination::PageRequest;

/// A finished fetch, tagged with the sequence of the request that caused it.
#[derive(Debug)]
pub struct FetchOutcome {
    pub seq: u64,
    pub result: anyhow::Result<ODataPage>,
}

/// Runs page fetches on a background thread so the caller's loop never blocks
/// on the network.
///
/// Requests are served in submission order. Nothing is cancelled: an
/// outcome for a superseded request still arrives and must be discarded by
/// the receiver.
pub struct FetchWorker {
    requests: Option<Sender<PageRequest>>,
    outcomes: Receiver<FetchOutcome>,
    handle: Option<JoinHandle<()>>,
}

impl FetchWorker {
    /// Start the worker thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn<T, F>(tokens: T, fetcher: F) -> anyhow::Result<Self>
    where
        T: TokenProvider + 'static,
        F: DataFetcher + 'static,
    {
        let (req_tx, req_rx) = mpsc::channel::<PageRequest>();
        let (out_tx, out_rx) = mpsc::channel::<FetchOutcome>();
        let handle = thread::Builder::new()
            .name("dftrack-fetch".to_string())
            .spawn(move || {
                for req in req_rx {
                    let result = load_page(&tokens, &fetcher, &req.cursor);
                    if out_tx.send(FetchOutcome { seq: req.seq, result }).is_err() {
                        break;
                    }
                }
            })
            .map_err(|e| anyhow::anyhow!("could not start fetch worker: {e}"))?;
        Ok(Self {
            requests: Some(req_tx),
            outcomes: out_rx,
            handle: Some(handle),
        })
    }

    /// Queue a fetch.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread has exited.
    pub fn submit(&self, req: PageRequest) -> anyhow::Result<()> {
        self.requests
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("fetch worker is shut down"))?
            .send(req)
            .map_err(|_| anyhow::anyhow!("fetch worker has stopped"))
    }

    /// A finished fetch, if one is ready.
    pub fn try_recv(&self) -> Option<FetchOutcome> {
        match self.outcomes.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Wait up to `timeout` for a finished fetch.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<FetchOutcome> {
        match self.outcomes.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for FetchWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.requests.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::warn!("fetch worker panicked");
        }
    }
}
