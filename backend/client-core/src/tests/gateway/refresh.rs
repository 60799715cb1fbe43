// Unit tests for the refresh coordinator's episode bookkeeping.
// End-to-end behaviour against a mock backend lives in integration_tests/gateway/.

use crate::gateway::refresh::{
    RefreshCoordinator, RefreshLease, RefreshOutcome, RefreshRejection, RefreshTicket,
    await_outcome,
};

use common::HttpStatusCode;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot::{self, Receiver};

fn coordinator() -> Arc<RefreshCoordinator> {
    Arc::new(RefreshCoordinator::new())
}

fn expect_leader(ticket: RefreshTicket) -> (RefreshLease, Receiver<RefreshOutcome>) {
    match ticket {
        RefreshTicket::Leader { lease, outcome } => (lease, outcome),
        RefreshTicket::Waiter(_) => panic!("Expected to lead the episode, got queued"),
    }
}

fn expect_waiter(ticket: RefreshTicket) -> Receiver<RefreshOutcome> {
    match ticket {
        RefreshTicket::Waiter(receiver) => receiver,
        RefreshTicket::Leader { .. } => panic!("Expected to queue, got leadership"),
    }
}

/// **VALUE**: Verifies that only the first joiner leads; later joiners queue.
///
/// **WHY THIS MATTERS**: This is the at-most-one-refresh invariant. Two leaders means two
/// concurrent refresh calls, and the second can invalidate the cookie the first just set.
///
/// **BUG THIS CATCHES**: Would catch if the flag check and set stop happening under the
/// same lock, or if `join()` forgets to set the flag.
#[test]
fn given_open_episode_when_others_join_then_they_queue() {
    // GIVEN: A fresh coordinator
    let coordinator = coordinator();

    // WHEN: Three requests join
    let _leader = expect_leader(coordinator.join());
    let _second = expect_waiter(coordinator.join());
    let _third = expect_waiter(coordinator.join());

    // THEN: One episode, two waiters
    assert!(coordinator.is_refreshing());
    assert_eq!(coordinator.queued(), 2);
    assert_eq!(coordinator.episodes(), 1);
}

/// **VALUE**: Verifies that a successful refresh releases every waiter and clears the flag.
///
/// **BUG THIS CATCHES**: Would catch waiters left parked forever because the queue is not
/// flushed, or a flag left set so the next expiry never refreshes.
#[tokio::test]
async fn given_waiters_when_episode_succeeds_then_all_released_with_ok() {
    // GIVEN: A leader and two waiters
    let coordinator = coordinator();
    let (lease, leader) = expect_leader(coordinator.join());
    let first = expect_waiter(coordinator.join());
    let second = expect_waiter(coordinator.join());

    // WHEN: The leader settles with success
    let released = lease.resolve(&Ok(()));

    // THEN: Leader and both waiters get Ok and the episode is closed
    assert_eq!(released, 2);
    assert_eq!(leader.await.unwrap(), Ok(()));
    assert_eq!(first.await.unwrap(), Ok(()));
    assert_eq!(second.await.unwrap(), Ok(()));
    assert!(!coordinator.is_refreshing());
    assert_eq!(coordinator.queued(), 0);
}

/// **VALUE**: Verifies that a failed refresh rejects every waiter with the same reason.
///
/// **WHY THIS MATTERS**: Refresh failure ends the session for the whole batch. Each caller
/// needs the status the refresh endpoint returned to decide whether to sign the user out.
#[tokio::test]
async fn given_waiters_when_episode_fails_then_all_receive_rejection() {
    let coordinator = coordinator();
    let (lease, _leader) = expect_leader(coordinator.join());
    let first = expect_waiter(coordinator.join());
    let second = expect_waiter(coordinator.join());
    let rejection = RefreshRejection::rejected(HttpStatusCode(403), "refresh token revoked");

    lease.resolve(&Err(rejection.clone()));

    assert_eq!(first.await.unwrap(), Err(rejection.clone()));
    assert_eq!(second.await.unwrap(), Err(rejection));
    assert!(!coordinator.is_refreshing());
}

/// **VALUE**: Verifies that a lease dropped mid-refresh still closes the episode.
///
/// **WHY THIS MATTERS**: If the refresh task dies, nothing else would ever clear the flag.
/// Every later 401 would queue behind a refresh that no longer exists.
///
/// **BUG THIS CATCHES**: Would catch removal of the `Drop` impl on `RefreshLease`.
#[tokio::test]
async fn given_lease_dropped_when_unsettled_then_everyone_rejected_and_flag_cleared() {
    // GIVEN: A leader and one waiter
    let coordinator = coordinator();
    let (lease, leader) = expect_leader(coordinator.join());
    let waiter = expect_waiter(coordinator.join());

    // WHEN: The lease goes away without resolve()
    drop(lease);

    // THEN: Both are rejected as abandoned and the flag is clear
    assert_eq!(leader.await.unwrap(), Err(RefreshRejection::abandoned()));
    assert_eq!(waiter.await.unwrap(), Err(RefreshRejection::abandoned()));
    assert!(!coordinator.is_refreshing());
}

/// **VALUE**: Verifies that the leading request walking away does not end the episode.
///
/// **WHY THIS MATTERS**: The leading request may be wrapped in its caller's own timeout or
/// `select!`. The refresh runs on a separate task holding the lease, so the batch must
/// still receive the real outcome.
///
/// **BUG THIS CATCHES**: Would catch the lease being tied to the leading request's
/// receiver, which would reject every waiter as abandoned when that request is cancelled.
#[tokio::test]
async fn given_leader_receiver_dropped_when_lease_resolves_then_waiters_get_outcome() {
    // GIVEN: A lease moved to its own task, and one waiter
    let coordinator = coordinator();
    let (lease, leader) = expect_leader(coordinator.join());
    let waiter = expect_waiter(coordinator.join());

    // WHEN: The leading request stops waiting, then the task settles with success
    drop(leader);
    let released = tokio::spawn(async move { lease.resolve(&Ok(())) })
        .await
        .unwrap();

    // THEN: The waiter still sees the success
    assert_eq!(released, 1);
    assert_eq!(waiter.await.unwrap(), Ok(()));
    assert!(!coordinator.is_refreshing());
}

/// **VALUE**: Verifies that a closed episode lets the next expiry open a new one.
#[test]
fn given_settled_episode_when_joining_again_then_new_episode_opens() {
    let coordinator = coordinator();
    let (first, _) = expect_leader(coordinator.join());
    first.resolve(&Err(RefreshRejection::transport("offline")));

    let (lease, _) = expect_leader(coordinator.join());

    assert_eq!(coordinator.episodes(), 2);
    lease.resolve(&Ok(()));
}

/// **VALUE**: Verifies that a waiter that stopped listening does not break the flush.
///
/// **BUG THIS CATCHES**: Would catch an `unwrap()` on `Sender::send`, which panics when a
/// queued request timed out before the episode settled.
#[test]
fn given_waiter_gone_when_settling_then_flush_completes() {
    let coordinator = coordinator();
    let (lease, leader) = expect_leader(coordinator.join());
    drop(leader);
    drop(expect_waiter(coordinator.join()));

    let released = lease.resolve(&Ok(()));

    assert_eq!(released, 1);
    assert!(!coordinator.is_refreshing());
}

/// **VALUE**: Verifies that a queued request gives up after its own bound, flagged as a
/// timeout, while the episode is still open.
///
/// **WHY THIS MATTERS**: The queue bound is the last line of defence against a refresh that
/// never settles. Callers distinguish "gave up waiting" from a rejected refresh by the
/// `timed_out` flag.
///
/// **BUG THIS CATCHES**: Would catch an unbounded wait, or a timeout reported as a plain
/// rejection.
#[tokio::test]
async fn given_unsettled_episode_when_queue_bound_elapses_then_waiter_times_out() {
    // GIVEN: A leader that never settles and one waiter
    let coordinator = coordinator();
    let (_lease, _leader) = expect_leader(coordinator.join());
    let waiter = expect_waiter(coordinator.join());

    // WHEN: The waiter's bound elapses
    let outcome = await_outcome(waiter, Duration::from_millis(50)).await;

    // THEN: Timed out, episode still open for the leader to settle
    let rejection = outcome.unwrap_err();
    assert!(rejection.timed_out);
    assert!(rejection.message.contains("50ms"));
    assert!(coordinator.is_refreshing());
}

/// **VALUE**: Verifies that a closed channel is reported as an abandoned episode.
#[tokio::test]
async fn given_sender_dropped_when_awaiting_outcome_then_abandoned() {
    let (sender, receiver) = oneshot::channel::<RefreshOutcome>();
    drop(sender);

    let outcome = await_outcome(receiver, Duration::from_secs(1)).await;

    assert_eq!(outcome, Err(RefreshRejection::abandoned()));
}

#[tokio::test]
async fn given_settled_outcome_when_awaiting_then_returned_unchanged() {
    let (sender, receiver) = oneshot::channel::<RefreshOutcome>();
    sender.send(Ok(())).unwrap();

    assert_eq!(await_outcome(receiver, Duration::from_secs(1)).await, Ok(()));
}
