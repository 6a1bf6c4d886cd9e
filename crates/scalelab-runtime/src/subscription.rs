#![forbid(unsafe_code)]

//! Subscription system for periodic messages.
//!
//! Subscriptions provide a declarative way to receive ticks. The runtime
//! manages their lifecycles based on what the model declares as active.
//!
//! # How it works
//!
//! 1. `Model::subscriptions()` returns the set of active subscriptions
//! 2. After each `update()`, the runtime compares active vs previous subscriptions
//! 3. New subscriptions are started, removed ones are stopped
//! 4. Unchanged subscriptions keep running with their phase intact
//! 5. Subscription messages are routed through `Model::update()`
//!
//! Time is virtual: the manager never sleeps. A driver asks for the next
//! due tick up to some instant and feeds the message to the model.

use std::collections::HashSet;
use std::time::Duration;

/// A unique identifier for a subscription.
///
/// Used by the runtime to track which subscriptions are active and
/// to deduplicate subscriptions across update cycles.
pub type SubId = u64;

/// Shortest interval the manager will schedule.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// A subscription that fires at a fixed interval.
///
/// The first message is due one full interval after the subscription
/// starts.
///
/// # Example
///
/// ```ignore
/// fn subscriptions(&self) -> Vec<Every<Msg>> {
///     vec![Every::new(Duration::from_secs(1), || Msg::Tick)]
/// }
/// ```
pub struct Every<M: 'static> {
    id: SubId,
    interval: Duration,
    make_msg: Box<dyn Fn() -> M + Send + Sync>,
}

impl<M: 'static> Every<M> {
    /// Create a tick subscription with the given interval and message factory.
    pub fn new(interval: Duration, make_msg: impl Fn() -> M + Send + Sync + 'static) -> Self {
        // Stable ID from the interval so identical declarations dedupe.
        let id = interval.as_nanos() as u64 ^ 0x5449_434B; // "TICK" magic
        Self::with_id(id, interval, make_msg)
    }

    /// Create a tick subscription with an explicit ID.
    pub fn with_id(
        id: SubId,
        interval: Duration,
        make_msg: impl Fn() -> M + Send + Sync + 'static,
    ) -> Self {
        Self {
            id,
            interval: interval.max(MIN_INTERVAL),
            make_msg: Box::new(make_msg),
        }
    }

    #[inline]
    pub fn id(&self) -> SubId {
        self.id
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl<M: 'static> std::fmt::Debug for Every<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Every")
            .field("id", &self.id)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

/// A started subscription and its next due instant.
struct RunningSubscription<M: 'static> {
    sub: Every<M>,
    next_due: Duration,
}

/// Manages the lifecycle of subscriptions for a program.
///
/// At most one running entry exists per [`SubId`]. Entries are kept in
/// start order, which also breaks ties between ticks due at the same
/// instant.
pub struct SubscriptionManager<M: 'static> {
    active: Vec<RunningSubscription<M>>,
    started_total: u64,
    stopped_total: u64,
}

impl<M: 'static> Default for SubscriptionManager<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: 'static> SubscriptionManager<M> {
    pub fn new() -> Self {
        Self {
            active: Vec::new(),
            started_total: 0,
            stopped_total: 0,
        }
    }

    /// Update the set of active subscriptions.
    ///
    /// Compares the new set against currently running subscriptions:
    /// - Stops subscriptions that are no longer declared (ID not in new set)
    /// - Starts subscriptions that are new (ID not in active set), first due at `now + interval`
    /// - Leaves unchanged subscriptions running
    ///
    /// Stopping happens before starting.
    pub fn reconcile(&mut self, subscriptions: Vec<Every<M>>, now: Duration) {
        let new_ids: HashSet<SubId> = subscriptions.iter().map(Every::id).collect();

        let before = self.active.len();
        self.active.retain(|running| {
            let keep = new_ids.contains(&running.sub.id);
            if !keep {
                tracing::debug!(
                    target: "scalelab.runtime",
                    sub_id = running.sub.id,
                    "Stopping subscription"
                );
            }
            keep
        });
        self.stopped_total += (before - self.active.len()) as u64;

        let mut active_ids: HashSet<SubId> = self.active.iter().map(|r| r.sub.id).collect();
        for sub in subscriptions {
            if !active_ids.insert(sub.id) {
                continue;
            }
            tracing::debug!(
                target: "scalelab.runtime",
                sub_id = sub.id,
                interval_ms = sub.interval.as_millis() as u64,
                "Starting subscription"
            );
            self.started_total += 1;
            let next_due = now.saturating_add(sub.interval);
            self.active.push(RunningSubscription { sub, next_due });
        }
    }

    /// Earliest instant at which any subscription is due.
    pub fn next_due(&self) -> Option<Duration> {
        self.active.iter().map(|r| r.next_due).min()
    }

    /// Take the earliest tick due at or before `until`.
    ///
    /// Returns the instant the tick was due and its message. The fired
    /// subscription is rescheduled one interval later.
    pub fn pop_due(&mut self, until: Duration) -> Option<(Duration, M)> {
        let mut best: Option<usize> = None;
        for (idx, running) in self.active.iter().enumerate() {
            // A schedule pushed to the end of representable time never fires.
            if running.next_due > until || running.next_due == Duration::MAX {
                continue;
            }
            match best {
                Some(b) if self.active[b].next_due <= running.next_due => {}
                _ => best = Some(idx),
            }
        }

        let running = &mut self.active[best?];
        let due = running.next_due;
        running.next_due = due.saturating_add(running.sub.interval);
        Some((due, (running.sub.make_msg)()))
    }

    /// Stop all running subscriptions.
    pub fn stop_all(&mut self) {
        for running in self.active.drain(..) {
            tracing::debug!(
                target: "scalelab.runtime",
                sub_id = running.sub.id,
                "Stopping subscription"
            );
            self.stopped_total += 1;
        }
    }

    pub fn is_active(&self, id: SubId) -> bool {
        self.active.iter().any(|r| r.sub.id == id)
    }

    /// Running ids in start order.
    pub fn active_ids(&self) -> Vec<SubId> {
        self.active.iter().map(|r| r.sub.id).collect()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Total subscriptions started over the manager's lifetime.
    pub fn started_total(&self) -> u64 {
        self.started_total
    }

    /// Total subscriptions stopped over the manager's lifetime.
    pub fn stopped_total(&self) -> u64 {
        self.stopped_total
    }
}
