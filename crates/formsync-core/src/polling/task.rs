use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::TryFutureExt;
use futures::future::BoxFuture;

/// Error type a fetch may fail with. Any `std::error::Error` converts.
pub type FetchError = Box<dyn std::error::Error + Send + Sync>;

pub(crate) type FetchFn<T> =
    Arc<dyn Fn() -> BoxFuture<'static, Result<T, FetchError>> + Send + Sync>;
pub(crate) type DeliverFn<T> = Arc<dyn Fn(T) + Send + Sync>;
pub(crate) type ChangeFn<T> = Arc<dyn Fn(&T, Option<&T>) -> bool + Send + Sync>;

pub(crate) struct ChangeDetection<T> {
    pub has_changed: ChangeFn<T>,
    pub on_change: DeliverFn<T>,
}

/// Everything the registry needs to run one recurring fetch.
///
/// Built with [`PollTask::new`] and optionally extended with change
/// detection and a seed for the previous snapshot.
///
/// ```rust,no_run
/// # use std::time::Duration;
/// # use formsync_core::polling::PollTask;
/// let task = PollTask::new(
///     "tablePolling",
///     Duration::from_secs(15),
///     || async { Ok::<_, std::io::Error>(vec![1u32, 2, 3]) },
///     |rows: Vec<u32>| println!("{} rows", rows.len()),
/// );
/// ```
pub struct PollTask<T> {
    pub(crate) key: String,
    pub(crate) interval: Duration,
    pub(crate) fetch: FetchFn<T>,
    pub(crate) on_update: DeliverFn<T>,
    pub(crate) change: Option<ChangeDetection<T>>,
    pub(crate) seed: Option<T>,
}

impl<T> PollTask<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// A task that calls `fetch` every `interval` and hands each successful
    /// result to `on_update`.
    pub fn new<F, Fut, E, U>(
        key: impl Into<String>,
        interval: Duration,
        fetch: F,
        on_update: U,
    ) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<FetchError> + 'static,
        U: Fn(T) + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            interval,
            fetch: Arc::new(move || {
                fetch()
                    .map_err(|e| -> FetchError { e.into() })
                    .boxed()
            }),
            on_update: Arc::new(on_update),
            change: None,
            seed: None,
        }
    }

    /// Route results through `has_changed(new, previous)`.
    ///
    /// When it returns true, `on_change` receives the new value instead of
    /// `on_update`, and the registry stops polling this key. Polling resumes
    /// only when the key is started again.
    pub fn with_change_detection<H, C>(mut self, has_changed: H, on_change: C) -> Self
    where
        H: Fn(&T, Option<&T>) -> bool + Send + Sync + 'static,
        C: Fn(T) + Send + Sync + 'static,
    {
        self.change = Some(ChangeDetection {
            has_changed: Arc::new(has_changed),
            on_change: Arc::new(on_change),
        });
        self
    }

    /// Start with `previous` as the last observed snapshot instead of none,
    /// so the very first tick is compared against what is already on screen.
    pub fn seeded(mut self, previous: T) -> Self {
        self.seed = Some(previous);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn has_change_detection(&self) -> bool {
        self.change.is_some()
    }
}

impl<T> std::fmt::Debug for PollTask<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollTask")
            .field("key", &self.key)
            .field("interval", &self.interval)
            .field("change_detection", &self.change.is_some())
            .field("seeded", &self.seed.is_some())
            .finish()
    }
}
