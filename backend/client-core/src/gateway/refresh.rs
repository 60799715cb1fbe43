//! Single-flight coordination of session refreshes.
//!
//! The first request that sees an expired session becomes the episode
//! *leader* and receives the [`RefreshLease`]. The lease is handed to a
//! detached task that performs the refresh call, so cancelling the leader's
//! own request does not cancel the refresh. Every request, leader included,
//! parks on a oneshot channel. When the episode settles the leader is
//! released first, then waiters in the order they joined, all with the same
//! outcome.

use common::HttpStatusCode;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, warn};
use tokio::sync::oneshot;
use tokio::time::timeout;

pub type RefreshOutcome = Result<(), RefreshRejection>;

/// Why a refresh episode failed. Cloned to every waiter of the episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshRejection {
    pub status: Option<HttpStatusCode>,
    pub message: String,
    pub timed_out: bool,
}

impl RefreshRejection {
    pub fn rejected(status: HttpStatusCode, body: &str) -> Self {
        Self {
            status: Some(status),
            message: format!("refresh endpoint answered HTTP {status}: {body}"),
            timed_out: false,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timed_out(after: Duration) -> Self {
        Self {
            status: None,
            message: format!("refresh did not settle within {}ms", after.as_millis()),
            timed_out: true,
        }
    }

    /// The refresh task went away (panicked, or its runtime shut down)
    /// before settling.
    pub fn abandoned() -> Self {
        Self {
            status: None,
            message: String::from("refresh abandoned before it settled"),
            timed_out: false,
        }
    }
}

#[derive(Debug, Default)]
struct EpisodeState {
    in_progress: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
    episodes: u64,
}

/// Per-gateway refresh state: the in-progress flag and the waiter queue.
///
/// Both live behind one mutex so that "check the flag, then either claim it
/// or enqueue" is a single critical section on a multi-threaded runtime.
/// The lock is never held across an await.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    state: Mutex<EpisodeState>,
}

/// What a request must do after observing an expired session.
pub enum RefreshTicket {
    /// Start the refresh, settle it through `lease`, and wait on `outcome`.
    Leader {
        lease: RefreshLease,
        outcome: oneshot::Receiver<RefreshOutcome>,
    },
    /// Wait for the episode's outcome.
    Waiter(oneshot::Receiver<RefreshOutcome>),
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, EpisodeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Join the current refresh episode, opening one if none is in flight.
    pub fn join(self: &Arc<Self>) -> RefreshTicket {
        let mut state = self.lock();
        let (sender, receiver) = oneshot::channel();

        if state.in_progress {
            state.waiters.push(sender);
            debug!(
                "Refresh already in flight, request queued (position {})",
                state.waiters.len()
            );
            return RefreshTicket::Waiter(receiver);
        }

        state.in_progress = true;
        state.episodes += 1;
        debug!("Opened refresh episode #{}", state.episodes);

        RefreshTicket::Leader {
            lease: RefreshLease {
                coordinator: Arc::clone(self),
                leader: Some(sender),
                settled: false,
            },
            outcome: receiver,
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.lock().in_progress
    }

    /// Number of requests parked on the current episode, leader excluded.
    pub fn queued(&self) -> usize {
        self.lock().waiters.len()
    }

    /// Number of episodes opened since construction.
    pub fn episodes(&self) -> u64 {
        self.lock().episodes
    }

    /// Close the episode: clear the flag, then release the leader and the
    /// waiters in join order. Returns the number of waiters released.
    fn settle(
        &self,
        leader: Option<oneshot::Sender<RefreshOutcome>>,
        outcome: &RefreshOutcome,
    ) -> usize {
        let waiters = {
            let mut state = self.lock();
            state.in_progress = false;
            std::mem::take(&mut state.waiters)
        };

        if let Some(leader) = leader
            && leader.send(outcome.clone()).is_err()
        {
            debug!("Leading request stopped waiting before the episode settled");
        }

        let released = waiters.len();
        for waiter in waiters {
            if waiter.send(outcome.clone()).is_err() {
                debug!("Queued request stopped waiting before the episode settled");
            }
        }

        released
    }
}

/// Exclusive right to settle the current episode.
///
/// Owns its coordinator so it can move into a spawned task. Dropping the
/// lease without calling [`RefreshLease::resolve`] settles the episode as
/// abandoned, so the flag is cleared on every exit path.
pub struct RefreshLease {
    coordinator: Arc<RefreshCoordinator>,
    leader: Option<oneshot::Sender<RefreshOutcome>>,
    settled: bool,
}

impl RefreshLease {
    /// Settle the episode and return how many waiters were released.
    pub fn resolve(mut self, outcome: &RefreshOutcome) -> usize {
        self.settled = true;
        self.coordinator.settle(self.leader.take(), outcome)
    }
}

impl Drop for RefreshLease {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Refresh lease dropped before settling, rejecting queued requests");
            self.coordinator
                .settle(self.leader.take(), &Err(RefreshRejection::abandoned()));
        }
    }
}

/// Wait at most `limit` for an episode's outcome.
///
/// A closed channel means the episode was abandoned; an elapsed `limit`
/// yields a timed-out rejection while the episode itself may still settle.
pub(crate) async fn await_outcome(
    receiver: oneshot::Receiver<RefreshOutcome>,
    limit: Duration,
) -> RefreshOutcome {
    match timeout(limit, receiver).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(_)) => Err(RefreshRejection::abandoned()),
        Err(_) => {
            warn!(
                "Request gave up after {}ms waiting for refresh",
                limit.as_millis()
            );
            Err(RefreshRejection::timed_out(limit))
        }
    }
}
