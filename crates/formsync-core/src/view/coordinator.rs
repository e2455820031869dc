use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::errors::ViewError;
use super::types::{Route, TABLE_POLLING_KEY, UpdateNotice, ViewSettings, ViewState};
use crate::api::{ContainerPage, CreatedContainer, FormApi, ListFilter, Mutation, NewContainer};
use crate::config::FormsyncConfig;
use crate::polling::{PollStart, PollTask, PollingRegistry};
use crate::snapshots::{ContainerDetail, ContainerSummary, ListDiff, TimelineEntry, detail_changed};

/// Everything a view renders. Polling callbacks write here; readers
/// subscribe.
#[derive(Debug)]
struct ViewChannels {
    state: watch::Sender<ViewState>,
    list: watch::Sender<Arc<Vec<ContainerSummary>>>,
    total: watch::Sender<u64>,
    detail: watch::Sender<Option<Arc<ContainerDetail>>>,
    timeline: watch::Sender<Arc<Vec<TimelineEntry>>>,
    notice: watch::Sender<Option<UpdateNotice>>,
}

impl ViewChannels {
    fn new() -> Self {
        Self {
            state: watch::Sender::new(ViewState::Loading),
            list: watch::Sender::new(Arc::new(Vec::new())),
            total: watch::Sender::new(0),
            detail: watch::Sender::new(None),
            timeline: watch::Sender::new(Arc::new(Vec::new())),
            notice: watch::Sender::new(None),
        }
    }

    /// Write a fetched page into the list. Returns whether the list was
    /// replaced; an unchanged list keeps its `Arc`.
    fn apply_page(&self, page: ContainerPage, diff: ListDiff) -> bool {
        self.total.send_if_modified(|total| {
            let modified = *total != page.total;
            *total = page.total;
            modified
        });

        let rows = page.form_containers;
        self.list.send_if_modified(|current| {
            if diff.differs(current.as_slice(), &rows) {
                *current = Arc::new(rows);
                true
            } else {
                false
            }
        })
    }

    fn raise_notice(&self, key: &str) {
        self.notice.send_if_modified(|notice| {
            if notice.is_some() {
                return false;
            }
            *notice = Some(UpdateNotice::new(key));
            true
        });
    }
}

/// Binds one view's lifecycle to a [`PollingRegistry`].
///
/// The table polls the list and silently swaps in changed rows. The detail
/// view polls its container but never replaces what is on screen: a change
/// raises an [`UpdateNotice`] and suspends polling until [`refresh`].
///
/// Dropping the coordinator stops every key it started.
///
/// [`refresh`]: ViewCoordinator::refresh
pub struct ViewCoordinator<A: FormApi> {
    api: Arc<A>,
    registry: PollingRegistry,
    settings: ViewSettings,
    filter: Arc<RwLock<ListFilter>>,
    channels: Arc<ViewChannels>,
    detail_key: Option<String>,
}

impl<A: FormApi> ViewCoordinator<A> {
    pub fn new(
        api: Arc<A>,
        registry: PollingRegistry,
        settings: ViewSettings,
        filter: ListFilter,
    ) -> Self {
        Self {
            api,
            registry,
            settings,
            filter: Arc::new(RwLock::new(filter)),
            channels: Arc::new(ViewChannels::new()),
            detail_key: None,
        }
    }

    /// Coordinator with intervals, diff policy and initial query taken from
    /// `config`.
    pub fn from_config(api: Arc<A>, registry: PollingRegistry, config: &FormsyncConfig) -> Self {
        Self::new(
            api,
            registry,
            ViewSettings::from_config(config),
            config.table.initial_filter(),
        )
    }

    pub fn state(&self) -> ViewState {
        *self.channels.state.borrow()
    }

    pub fn list(&self) -> Arc<Vec<ContainerSummary>> {
        self.channels.list.borrow().clone()
    }

    pub fn total(&self) -> u64 {
        *self.channels.total.borrow()
    }

    pub fn detail(&self) -> Option<Arc<ContainerDetail>> {
        self.channels.detail.borrow().clone()
    }

    /// History of the open container, refreshed along with the detail.
    pub fn timeline(&self) -> Arc<Vec<TimelineEntry>> {
        self.channels.timeline.borrow().clone()
    }

    pub fn notice(&self) -> Option<UpdateNotice> {
        self.channels.notice.borrow().clone()
    }

    pub fn filter(&self) -> ListFilter {
        self.filter
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn registry(&self) -> &PollingRegistry {
        &self.registry
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ViewState> {
        self.channels.state.subscribe()
    }

    pub fn subscribe_list(&self) -> watch::Receiver<Arc<Vec<ContainerSummary>>> {
        self.channels.list.subscribe()
    }

    pub fn subscribe_total(&self) -> watch::Receiver<u64> {
        self.channels.total.subscribe()
    }

    pub fn subscribe_detail(&self) -> watch::Receiver<Option<Arc<ContainerDetail>>> {
        self.channels.detail.subscribe()
    }

    pub fn subscribe_timeline(&self) -> watch::Receiver<Arc<Vec<TimelineEntry>>> {
        self.channels.timeline.subscribe()
    }

    pub fn subscribe_notice(&self) -> watch::Receiver<Option<UpdateNotice>> {
        self.channels.notice.subscribe()
    }

    /// Enter the view addressed by `route`.
    pub async fn mount(&mut self, route: Route) -> Result<(), ViewError> {
        info!(
            event = "core.view.mount_started",
            access_token = route.access_token.as_deref().unwrap_or(""),
        );
        match route.access_token {
            Some(token) => self.open_detail(&token).await,
            None => self.show_table().await,
        }
    }

    /// Switch to the table, load the first page and start `tablePolling`.
    ///
    /// Polling starts even when the initial load fails; the error is
    /// returned so the caller can report it.
    pub async fn show_table(&mut self) -> Result<(), ViewError> {
        self.leave_current();
        self.set_state(ViewState::Table);
        self.reload_table().await
    }

    /// Load one container with its timeline and poll it for remote changes.
    ///
    /// The view stays in `Loading` when the first fetch fails. A timeline
    /// that fails to load is logged and left empty.
    pub async fn open_detail(&mut self, access_token: &str) -> Result<(), ViewError> {
        self.leave_current();
        self.set_state(ViewState::Loading);

        let detail = self.api.fetch_detail(access_token).await?;
        let detail = Arc::new(detail);
        self.channels.detail.send_replace(Some(detail.clone()));
        self.set_state(ViewState::Questions);
        self.start_detail_polling(access_token, &detail)?;
        self.load_timeline(detail.id).await;
        Ok(())
    }

    /// Switch to the form builder. Nothing polls in this state.
    pub fn open_create_form(&mut self) {
        self.leave_current();
        self.set_state(ViewState::CreateForm);
    }

    /// Create a container with its first form.
    ///
    /// From the form builder the view then returns to the table, which lists
    /// the new container. A failed list reload there is logged; the
    /// container exists either way.
    pub async fn create_container(
        &mut self,
        container: &NewContainer,
    ) -> Result<CreatedContainer, ViewError> {
        let created = self.api.create_container(container).await?;
        info!(
            event = "core.view.container_created",
            container_id = created.container_id,
            access_token = %created.access_token,
        );

        if self.state() == ViewState::CreateForm
            && let Err(e) = self.show_table().await
        {
            warn!(event = "core.view.list_reload_failed", error = %e);
        }
        Ok(created)
    }

    /// Re-fetch what the current view shows.
    ///
    /// In `Questions` this replaces the rendered detail, clears the notice
    /// and re-arms polling for the container, in that order and only once
    /// the fetch has succeeded. A failed refresh leaves the notice up.
    pub async fn refresh(&mut self) -> Result<(), ViewError> {
        match self.state() {
            ViewState::Table => self.reload_table().await,
            ViewState::Questions => {
                let Some(key) = self.detail_key.clone() else {
                    return Err(ViewError::NothingToRefresh {
                        state: ViewState::Questions,
                    });
                };
                let detail = Arc::new(self.api.fetch_detail(&key).await?);

                self.registry.stop_polling(&key);
                self.channels.detail.send_replace(Some(detail.clone()));
                self.channels.notice.send_replace(None);
                self.start_detail_polling(&key, &detail)?;
                self.load_timeline(detail.id).await;
                info!(event = "core.view.refresh_completed", key = %key);
                Ok(())
            }
            state => Err(ViewError::NothingToRefresh { state }),
        }
    }

    /// Replace the table query and reload the list with it. Later ticks use
    /// the new query too.
    pub async fn set_filter(&mut self, filter: ListFilter) -> Result<(), ViewError> {
        *self.filter.write().unwrap_or_else(PoisonError::into_inner) = filter;
        debug!(event = "core.view.filter_changed");
        if self.state() == ViewState::Table {
            self.reload_table().await
        } else {
            Ok(())
        }
    }

    /// Apply `mutation` on the server, then refresh the current view.
    pub async fn mutate(&mut self, mutation: Mutation) -> Result<(), ViewError> {
        let name = mutation.name();
        self.api.mutate(mutation).await?;
        info!(event = "core.view.mutation_applied", mutation = name);

        match self.state() {
            ViewState::Table | ViewState::Questions => self.refresh().await,
            _ => Ok(()),
        }
    }

    /// Stop every key this coordinator started.
    pub fn teardown(&mut self) {
        if let Some(key) = self.detail_key.take() {
            self.registry.stop_polling(&key);
        }
        self.registry.stop_polling(TABLE_POLLING_KEY);
        debug!(event = "core.view.teardown_completed");
    }

    fn leave_current(&mut self) {
        match self.state() {
            ViewState::Questions | ViewState::Loading => {
                if let Some(key) = self.detail_key.take() {
                    self.registry.stop_polling(&key);
                }
                self.channels.notice.send_replace(None);
                self.channels.detail.send_replace(None);
                self.channels.timeline.send_replace(Arc::new(Vec::new()));
            }
            ViewState::Table => {
                self.registry.stop_polling(TABLE_POLLING_KEY);
            }
            ViewState::CreateForm => {}
        }
    }

    fn set_state(&self, next: ViewState) {
        let previous = self.channels.state.send_replace(next);
        if previous != next {
            info!(
                event = "core.view.state_changed",
                from = previous.as_str(),
                to = next.as_str(),
            );
        }
    }

    /// Manual list load. `tablePolling` is disarmed for the duration so a
    /// tick already in flight cannot land after the fresher page.
    async fn reload_table(&mut self) -> Result<(), ViewError> {
        self.registry.stop_polling(TABLE_POLLING_KEY);
        let loaded = self.load_list().await;
        self.start_table_polling()?;
        loaded
    }

    async fn load_list(&self) -> Result<(), ViewError> {
        let filter = self.filter();
        let page = self.api.fetch_list(&filter).await?;
        let replaced = self.channels.apply_page(page, self.settings.list_diff);
        debug!(event = "core.view.list_loaded", replaced = replaced);
        Ok(())
    }

    async fn load_timeline(&self, container_id: u64) {
        match self.api.fetch_timeline(container_id).await {
            Ok(entries) => {
                debug!(
                    event = "core.view.timeline_loaded",
                    container_id = container_id,
                    entries = entries.len(),
                );
                self.channels.timeline.send_replace(Arc::new(entries));
            }
            Err(e) => warn!(
                event = "core.view.timeline_load_failed",
                container_id = container_id,
                error = %e,
            ),
        }
    }

    fn start_table_polling(&self) -> Result<(), ViewError> {
        let api = self.api.clone();
        let filter = self.filter.clone();
        let channels = self.channels.clone();
        let diff = self.settings.list_diff;

        let task = PollTask::new(
            TABLE_POLLING_KEY,
            self.settings.table_interval,
            move || {
                let api = api.clone();
                let filter = filter
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone();
                async move { api.fetch_list(&filter).await }
            },
            move |page| {
                if channels.apply_page(page, diff) {
                    debug!(event = "core.view.list_updated", key = TABLE_POLLING_KEY);
                }
            },
        );

        if self.registry.start_polling(task)? == PollStart::AlreadyActive {
            debug!(event = "core.view.table_polling_kept", key = TABLE_POLLING_KEY);
        }
        Ok(())
    }

    fn start_detail_polling(
        &mut self,
        access_token: &str,
        shown: &ContainerDetail,
    ) -> Result<(), ViewError> {
        let api = self.api.clone();
        let channels = self.channels.clone();
        let token = access_token.to_string();
        let key = access_token.to_string();

        let task = PollTask::new(
            access_token,
            self.settings.detail_interval,
            move || {
                let api = api.clone();
                let token = token.clone();
                async move { api.fetch_detail(&token).await }
            },
            |_| {},
        )
        .with_change_detection(detail_changed, move |_| {
            info!(event = "core.view.remote_change_detected", key = %key);
            channels.raise_notice(&key);
        })
        .seeded(shown.clone());

        self.registry.start_polling(task)?;
        self.detail_key = Some(access_token.to_string());
        Ok(())
    }
}

impl<A: FormApi> Drop for ViewCoordinator<A> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<A: FormApi> std::fmt::Debug for ViewCoordinator<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewCoordinator")
            .field("state", &self.state())
            .field("detail_key", &self.detail_key)
            .field("settings", &self.settings)
            .finish()
    }
}
