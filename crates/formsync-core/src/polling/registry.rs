use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::runtime::Handle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::errors::PollingError;
use super::task::PollTask;

tokio::task_local! {
    /// Key whose callback is running on the current task.
    static TICKING_KEY: String;
}

/// Outcome of [`PollingRegistry::start_polling`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStart {
    Started,
    /// The key already had a running entry; nothing was scheduled.
    AlreadyActive,
}

/// Keyed set of recurring fetch tasks.
///
/// Each key runs on its own tokio task with its own interval. Cloning the
/// registry yields another handle to the same entries. Entries whose
/// registry has been dropped stop at their next tick.
#[derive(Debug, Clone, Default)]
pub struct PollingRegistry {
    inner: Arc<Mutex<RegistryState>>,
}

#[derive(Debug, Default)]
struct RegistryState {
    entries: HashMap<String, EntryHandle>,
    next_generation: u64,
}

#[derive(Debug)]
struct EntryHandle {
    generation: u64,
    cancel: CancellationToken,
    /// Held while a callback runs. Stopping waits on it.
    gate: Arc<Mutex<()>>,
}

impl PollingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `task` and schedule its first fetch one interval from now.
    ///
    /// A key that is already polling is left untouched and reported as
    /// [`PollStart::AlreadyActive`].
    pub fn start_polling<T>(&self, task: PollTask<T>) -> Result<PollStart, PollingError>
    where
        T: Clone + Send + Sync + 'static,
    {
        if task.interval.is_zero() {
            return Err(PollingError::InvalidInterval { key: task.key });
        }
        let runtime = Handle::try_current().map_err(|_| PollingError::NoRuntime {
            key: task.key.clone(),
        })?;

        let mut state = lock(&self.inner);
        if state.entries.contains_key(&task.key) {
            warn!(
                event = "core.polling.duplicate_registration",
                key = %task.key,
            );
            return Ok(PollStart::AlreadyActive);
        }

        state.next_generation += 1;
        let generation = state.next_generation;
        let cancel = CancellationToken::new();
        let gate = Arc::new(Mutex::new(()));
        state.entries.insert(
            task.key.clone(),
            EntryHandle {
                generation,
                cancel: cancel.clone(),
                gate: gate.clone(),
            },
        );
        drop(state);

        info!(
            event = "core.polling.started",
            key = %task.key,
            interval_ms = task.interval.as_millis() as u64,
            generation = generation,
            change_detection = task.change.is_some(),
        );

        let entry = RunningEntry {
            state: Arc::downgrade(&self.inner),
            generation,
            cancel,
            gate,
        };
        runtime.spawn(entry.run(task));
        Ok(PollStart::Started)
    }

    /// Cancel `key` and wait for any callback it is running to return.
    ///
    /// Returns false when the key was not polling. Once this returns, no
    /// callback of the stopped registration fires, including one whose fetch
    /// was already in flight.
    pub fn stop_polling(&self, key: &str) -> bool {
        let removed = lock(&self.inner).entries.remove(key);
        let Some(entry) = removed else {
            debug!(event = "core.polling.stop_skipped", key = key, reason = "not_active");
            return false;
        };

        shut_down(key, &entry);
        info!(
            event = "core.polling.stopped",
            key = key,
            generation = entry.generation,
        );
        true
    }

    /// Stop every key. Returns how many were running.
    pub fn stop_all_polling(&self) -> usize {
        let drained: Vec<(String, EntryHandle)> = lock(&self.inner).entries.drain().collect();
        for (key, entry) in &drained {
            shut_down(key, entry);
        }
        info!(event = "core.polling.stopped_all", count = drained.len());
        drained.len()
    }

    pub fn is_polling(&self, key: &str) -> bool {
        lock(&self.inner).entries.contains_key(key)
    }

    /// Keys with a running entry, sorted.
    pub fn active_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = lock(&self.inner).entries.keys().cloned().collect();
        keys.sort();
        keys
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn shut_down(key: &str, entry: &EntryHandle) {
    entry.cancel.cancel();
    // A callback stopping its own key already holds the gate.
    let reentrant = TICKING_KEY.try_with(|k| k == key).unwrap_or(false);
    if !reentrant {
        drop(lock(&entry.gate));
    }
}

fn remove_if_current(state: &Weak<Mutex<RegistryState>>, key: &str, generation: u64) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let mut state = lock(&state);
    if state
        .entries
        .get(key)
        .is_some_and(|entry| entry.generation == generation)
    {
        state.entries.remove(key);
    }
}

/// The task side of one registration.
struct RunningEntry {
    state: Weak<Mutex<RegistryState>>,
    generation: u64,
    cancel: CancellationToken,
    gate: Arc<Mutex<()>>,
}

enum Delivery {
    Continue,
    Finished,
}

impl RunningEntry {
    async fn run<T>(self, task: PollTask<T>)
    where
        T: Clone + Send + Sync + 'static,
    {
        let PollTask {
            key,
            interval,
            fetch,
            on_update,
            change,
            seed,
        } = task;
        let _cleanup = EntryCleanup {
            state: self.state.clone(),
            key: key.clone(),
            generation: self.generation,
        };

        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut previous = seed;
        let mut seq: u64 = 0;

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }
            if self.state.strong_count() == 0 {
                debug!(event = "core.polling.registry_dropped", key = %key);
                break;
            }

            seq += 1;
            debug!(event = "core.polling.tick_started", key = %key, seq = seq);

            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                result = fetch() => result,
            };
            let data = match result {
                Ok(data) => data,
                Err(e) => {
                    error!(
                        event = "core.polling.tick_failed",
                        key = %key,
                        seq = seq,
                        error = %e,
                    );
                    continue;
                }
            };

            let changed = change
                .as_ref()
                .is_some_and(|c| (c.has_changed)(&data, previous.as_ref()));

            let delivery = {
                let _held = lock(&self.gate);
                if self.cancel.is_cancelled() {
                    debug!(event = "core.polling.stale_result_discarded", key = %key, seq = seq);
                    Delivery::Finished
                } else {
                    previous = Some(data.clone());
                    match change.as_ref().filter(|_| changed) {
                        Some(detection) => {
                            // Retire the entry before notifying so the callback
                            // may register the key again.
                            self.cancel.cancel();
                            remove_if_current(&self.state, &key, self.generation);
                            info!(event = "core.polling.change_detected", key = %key, seq = seq);
                            TICKING_KEY.sync_scope(key.clone(), || (detection.on_change)(data));
                            Delivery::Finished
                        }
                        None => {
                            TICKING_KEY.sync_scope(key.clone(), || on_update(data));
                            Delivery::Continue
                        }
                    }
                }
            };

            if let Delivery::Finished = delivery {
                break;
            }
        }

        debug!(event = "core.polling.task_exited", key = %key, ticks = seq);
    }
}

/// Drops the registry entry when its task ends for any reason, unless a
/// newer registration has taken the key.
struct EntryCleanup {
    state: Weak<Mutex<RegistryState>>,
    key: String,
    generation: u64,
}

impl Drop for EntryCleanup {
    fn drop(&mut self) {
        remove_if_current(&self.state, &self.key, self.generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    fn counting_task(
        key: &str,
        fetches: &Arc<AtomicUsize>,
        updates: &Arc<AtomicUsize>,
    ) -> PollTask<usize> {
        let fetches = fetches.clone();
        let updates = updates.clone();
        PollTask::new(
            key,
            Duration::from_secs(1),
            move || {
                let n = fetches.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Ok::<_, std::io::Error>(n) }
            },
            move |_| {
                updates.fetch_add(1, Ordering::SeqCst);
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_fetch_waits_one_interval() {
        let registry = PollingRegistry::new();
        let fetches = counter();
        let updates = counter();
        registry
            .start_polling(counting_task("k", &fetches, &updates))
            .unwrap();

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(updates.load(Ordering::SeqCst), 1);
        registry.stop_all_polling();
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_start_schedules_one_timer() {
        let registry = PollingRegistry::new();
        let first_fetches = counter();
        let second_fetches = counter();
        let updates = counter();

        let first = registry
            .start_polling(counting_task("k", &first_fetches, &updates))
            .unwrap();
        let second = registry
            .start_polling(counting_task("k", &second_fetches, &updates))
            .unwrap();
        assert_eq!(first, PollStart::Started);
        assert_eq!(second, PollStart::AlreadyActive);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(first_fetches.load(Ordering::SeqCst), 3);
        assert_eq!(second_fetches.load(Ordering::SeqCst), 0);
        assert_eq!(registry.active_keys(), vec!["k".to_string()]);
        registry.stop_all_polling();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_discards_in_flight_fetch() {
        let registry = PollingRegistry::new();
        let fetches = counter();
        let updates = counter();
        let (f, u) = (fetches.clone(), updates.clone());
        let task = PollTask::new(
            "slow",
            Duration::from_secs(1),
            move || {
                f.fetch_add(1, Ordering::SeqCst);
                async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok::<_, std::io::Error>(1u32)
                }
            },
            move |_| {
                u.fetch_add(1, Ordering::SeqCst);
            },
        );
        registry.start_polling(task).unwrap();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert!(registry.stop_polling("slow"));

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(updates.load(Ordering::SeqCst), 0);
        assert!(!registry.is_polling("slow"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_change_fires_once_and_stops_key() {
        let registry = PollingRegistry::new();
        let fetches = counter();
        let updates = counter();
        let changes = Arc::new(Mutex::new(Vec::new()));

        let f = fetches.clone();
        let u = updates.clone();
        let c = changes.clone();
        let task = PollTask::new(
            "tok123",
            Duration::from_secs(1),
            move || {
                let n = f.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Ok::<_, std::io::Error>(n >= 2) }
            },
            move |_| {
                u.fetch_add(1, Ordering::SeqCst);
            },
        )
        .with_change_detection(
            |new, prev| prev.is_some_and(|p| p != new),
            move |validated| c.lock().unwrap().push(validated),
        );
        registry.start_polling(task).unwrap();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert_eq!(updates.load(Ordering::SeqCst), 1);
        assert_eq!(*changes.lock().unwrap(), vec![true]);
        assert!(!registry.is_polling("tok123"));

        let again = registry
            .start_polling(counting_task("tok123", &counter(), &counter()))
            .unwrap();
        assert_eq!(again, PollStart::Started);
        registry.stop_all_polling();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_tick_keeps_schedule_and_previous() {
        let registry = PollingRegistry::new();
        let fetches = counter();
        let updates = counter();
        let changes = Arc::new(Mutex::new(Vec::new()));

        let f = fetches.clone();
        let u = updates.clone();
        let c = changes.clone();
        let task = PollTask::new(
            "k",
            Duration::from_secs(1),
            move || {
                let n = f.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    match n {
                        2 => Err(std::io::Error::other("connection reset")),
                        4 => Ok(2u32),
                        _ => Ok(1u32),
                    }
                }
            },
            move |_| {
                u.fetch_add(1, Ordering::SeqCst);
            },
        )
        .with_change_detection(
            |new, prev| prev != Some(new),
            move |value| c.lock().unwrap().push(value),
        )
        .seeded(1);
        registry.start_polling(task).unwrap();

        tokio::time::sleep(Duration::from_millis(4500)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 4);
        assert_eq!(updates.load(Ordering::SeqCst), 2);
        assert_eq!(*changes.lock().unwrap(), vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_seeded_task_detects_change_on_first_tick() {
        let registry = PollingRegistry::new();
        let changes = counter();
        let c = changes.clone();
        let task = PollTask::new(
            "tok",
            Duration::from_secs(1),
            || async { Ok::<_, std::io::Error>(true) },
            |_| {},
        )
        .with_change_detection(
            |new, prev| prev.is_some_and(|p| p != new),
            move |_| {
                c.fetch_add(1, Ordering::SeqCst);
            },
        )
        .seeded(false);
        registry.start_polling(task).unwrap();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(changes.load(Ordering::SeqCst), 1);
        assert!(registry.active_keys().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_from_own_callback_does_not_block() {
        let registry = PollingRegistry::new();
        let fetches = counter();
        let f = fetches.clone();
        let handle = registry.clone();
        let task = PollTask::new(
            "self-stop",
            Duration::from_secs(1),
            move || {
                f.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, std::io::Error>(()) }
            },
            move |_| {
                handle.stop_polling("self-stop");
            },
        );
        registry.start_polling(task).unwrap();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert!(!registry.is_polling("self-stop"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_all_polling() {
        let registry = PollingRegistry::new();
        let fetches = counter();
        let updates = counter();
        registry
            .start_polling(counting_task("a", &fetches, &updates))
            .unwrap();
        registry
            .start_polling(counting_task("b", &fetches, &updates))
            .unwrap();
        assert_eq!(registry.active_keys(), vec!["a".to_string(), "b".to_string()]);

        assert_eq!(registry.stop_all_polling(), 2);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
        assert!(registry.active_keys().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_registries_are_independent() {
        let first = PollingRegistry::new();
        let second = PollingRegistry::new();
        let fetches = counter();
        let updates = counter();
        first
            .start_polling(counting_task("k", &fetches, &updates))
            .unwrap();
        let started = second
            .start_polling(counting_task("k", &fetches, &updates))
            .unwrap();
        assert_eq!(started, PollStart::Started);

        assert!(!second.stop_polling("other"));
        assert!(first.is_polling("k"));
        first.stop_all_polling();
        second.stop_all_polling();
    }

    #[tokio::test]
    async fn test_stop_unknown_key_is_noop() {
        let registry = PollingRegistry::new();
        assert!(!registry.stop_polling("nonexistent"));
        assert!(registry.active_keys().is_empty());
    }

    #[tokio::test]
    async fn test_zero_interval_rejected() {
        let registry = PollingRegistry::new();
        let task = PollTask::new(
            "k",
            Duration::ZERO,
            || async { Ok::<_, std::io::Error>(()) },
            |_| {},
        );
        let err = registry.start_polling(task).unwrap_err();
        assert!(matches!(err, PollingError::InvalidInterval { .. }));
        assert!(!registry.is_polling("k"));
    }

    #[test]
    fn test_start_without_runtime_fails() {
        let registry = PollingRegistry::new();
        let err = registry
            .start_polling(counting_task("k", &counter(), &counter()))
            .unwrap_err();
        assert!(matches!(err, PollingError::NoRuntime { .. }));
    }
}
