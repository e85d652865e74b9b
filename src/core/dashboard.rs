//! Dashboard controller.
//!
//! Composes the shared stores, the API key panel and the dialog flow behind
//! an explicit lifecycle: [`Dashboard::start`] once per mount,
//! [`Dashboard::stop`] on teardown. Hosts feed it navigation changes and
//! user actions, read [`Dashboard::view`], and receive [`UiEvent`]s for the
//! things the controller cannot do itself (routing, toasts).
//!
//! A pending connection failure is resumed only on two inputs: the location
//! changing and the sources catalog changing. Each (location, catalog)
//! pair is evaluated at most once.

use super::api_key::{ApiKeyState, fetch_first_api_key};
use super::collections::SourceConnectionMap;
use super::dialog::{DialogExit, DialogFlow, DialogState, Transition};
use super::events::Subscription;
use super::navigation::{CONNECTED_PARAM, Location};
use super::registry::StoreRegistry;
use super::view::{
    CollectionsPanel, DashboardView, EXAMPLE_PROJECTS, ExampleProject, SourcesPanel,
    sort_sources, top_collections,
};
use crate::api::models::{Collection, Source};
use crate::error::ChannelError;
use crate::storage::error_channel::ErrorChannel;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const COLLECTIONS_PATH: &str = "/collections";
pub const NEW_API_KEY_NOTICE: &str = "New API key feature coming soon";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toast {
    Info(String),
}

/// Requests the controller sends to its host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Navigate(String),
    /// Swap the visible location without reloading
    ReplaceLocation(Location),
    Toast(Toast),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumptionOutcome {
    NoSignal,
    /// This location and catalog were already looked at
    AlreadyEvaluated,
    /// Signal present but the sources catalog has not settled yet
    Deferred,
    Resumed(Transition),
    /// Signal present without a readable record; the signal was stripped
    Normalized,
    /// Controller is stopped
    Inactive,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    stores: Arc<StoreRegistry>,
    dialog: Mutex<DialogFlow>,
    location: Mutex<Location>,
    location_generation: AtomicU64,
    last_evaluated: Mutex<Option<(u64, u64)>>,
    sources_settled: AtomicBool,
    api_key: Mutex<ApiKeyState>,
    subscription: Mutex<Option<Subscription>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    sources_watch: Mutex<Option<JoinHandle<()>>>,
    mounted: AtomicBool,
    started: AtomicBool,
    top_n: usize,
    ui: mpsc::UnboundedSender<UiEvent>,
}

impl Dashboard {
    pub fn new(
        stores: Arc<StoreRegistry>,
        channel: ErrorChannel,
        location: Location,
        top_n: usize,
    ) -> (Self, mpsc::UnboundedReceiver<UiEvent>) {
        let (ui, events) = mpsc::unbounded_channel();
        let dialog = DialogFlow::new(channel, Arc::clone(&stores.collections));

        let inner = Arc::new(DashboardInner {
            stores,
            dialog: Mutex::new(dialog),
            location: Mutex::new(location),
            location_generation: AtomicU64::new(0),
            last_evaluated: Mutex::new(None),
            sources_settled: AtomicBool::new(false),
            api_key: Mutex::new(ApiKeyState::Loading),
            subscription: Mutex::new(None),
            tasks: Mutex::new(Vec::new()),
            sources_watch: Mutex::new(None),
            mounted: AtomicBool::new(true),
            started: AtomicBool::new(false),
            top_n,
            ui,
        });

        (Self { inner }, events)
    }

    /// Subscribe to collection events and kick off the initial loads.
    ///
    /// Collections, sources and the API key load independently. Calling
    /// `start` again, or after `stop`, does nothing.
    pub fn start(&self) {
        let inner = &self.inner;
        if !inner.is_mounted() || inner.started.swap(true, Ordering::SeqCst) {
            return;
        }

        log::debug!("Starting dashboard");
        *lock(&inner.subscription) = Some(inner.stores.collections.subscribe_to_events());

        let collections = Arc::clone(&inner.stores.collections);
        let collections_task = tokio::spawn(async move {
            let loaded = collections.fetch(false).await;
            log::info!("Collections ready: {} available", loaded.len());
        });

        // any later replacement of the shared catalog, whoever triggered it
        let mut catalog = inner.stores.sources.changes();
        let weak: Weak<DashboardInner> = Arc::downgrade(inner);
        let watch_task = tokio::spawn(async move {
            while catalog.changed().await.is_ok() {
                let Some(inner) = weak.upgrade() else { break };
                if !inner.is_mounted() {
                    break;
                }
                log::debug!("Sources catalog changed, re-checking resumption");
                inner.on_sources_changed();
            }
        });
        *lock(&inner.sources_watch) = Some(watch_task);

        let sources = Arc::clone(&inner.stores.sources);
        let weak: Weak<DashboardInner> = Arc::downgrade(inner);
        let sources_task = tokio::spawn(async move {
            let loaded = sources.fetch(false).await;
            log::info!("Sources ready: {} available", loaded.len());
            if let Some(inner) = weak.upgrade() {
                inner.on_sources_changed();
            }
        });

        let backend = inner.stores.backend();
        let weak: Weak<DashboardInner> = Arc::downgrade(inner);
        let api_key_task = tokio::spawn(async move {
            let key = fetch_first_api_key(backend.as_ref()).await;
            if let Some(inner) = weak.upgrade() {
                if inner.is_mounted() {
                    *lock(&inner.api_key) = ApiKeyState::from(key);
                }
            }
        });

        lock(&inner.tasks).extend([collections_task, sources_task, api_key_task]);
    }

    /// Tear down. Returns `false` when already stopped.
    pub fn stop(&self) -> bool {
        self.inner.stop()
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.is_mounted()
    }

    /// Wait for the loads spawned by `start`
    pub async fn wait_until_loaded(&self) {
        let tasks: Vec<JoinHandle<()>> = lock(&self.inner.tasks).drain(..).collect();
        for task in tasks {
            if let Err(e) = task.await {
                log::warn!("Dashboard load task failed: {}", e);
            }
        }
    }

    /// The host navigated; resumption is checked against the new location
    pub fn navigate(&self, location: Location) -> ResumptionOutcome {
        let inner = &self.inner;
        if !inner.is_mounted() {
            return ResumptionOutcome::Inactive;
        }

        let signals = location.signals_resumption();
        inner.set_location(location);

        if !signals {
            ResumptionOutcome::NoSignal
        } else if inner.sources_settled.load(Ordering::SeqCst) {
            inner.check_resumption()
        } else {
            log::debug!("Resumption deferred until sources load");
            ResumptionOutcome::Deferred
        }
    }

    /// The sources catalog changed; re-check a pending resumption
    pub fn on_sources_changed(&self) -> ResumptionOutcome {
        self.inner.on_sources_changed()
    }

    /// Evaluate the resumption signal now, whether or not sources have loaded
    pub fn check_resumption(&self) -> ResumptionOutcome {
        self.inner.check_resumption()
    }

    pub fn select_source(&self, source: &Source) -> Transition {
        if !self.inner.is_mounted() {
            return Transition::Ignored;
        }
        lock(&self.inner.dialog).open_with_source(source)
    }

    pub fn close_dialog(&self) -> DialogExit {
        self.inner.leave_dialog(false)
    }

    pub fn complete_dialog(&self) -> DialogExit {
        self.inner.leave_dialog(true)
    }

    pub fn open_collection(&self, collection: &Collection) {
        self.inner.emit(UiEvent::Navigate(collection.detail_path()));
    }

    pub fn see_all_collections(&self) {
        self.inner
            .emit(UiEvent::Navigate(COLLECTIONS_PATH.to_string()));
    }

    pub fn request_new_api_key(&self) {
        self.inner
            .emit(UiEvent::Toast(Toast::Info(NEW_API_KEY_NOTICE.to_string())));
    }

    pub fn open_example_project(&self, project: &ExampleProject) {
        self.inner.emit(UiEvent::Toast(Toast::Info(format!(
            "Opening {} template",
            project.title
        ))));
    }

    /// Fetch connections for the collections the view shows
    pub async fn load_connections_for_top_collections(&self) -> SourceConnectionMap {
        let collections = &self.inner.stores.collections;
        let ids: Vec<String> = top_collections(&collections.collections(), self.inner.top_n)
            .into_iter()
            .map(|c| c.id)
            .collect();
        collections.fetch_source_connections_for_collections(&ids).await
    }

    pub fn location(&self) -> Location {
        lock(&self.inner.location).clone()
    }

    pub fn api_key(&self) -> ApiKeyState {
        lock(&self.inner.api_key).clone()
    }

    pub fn dialog_state(&self) -> DialogState {
        lock(&self.inner.dialog).state().clone()
    }

    pub fn view(&self) -> DashboardView {
        let inner = &self.inner;
        let collections = &inner.stores.collections;
        let sources = &inner.stores.sources;

        let all = collections.collections();
        let top = top_collections(&all, inner.top_n);
        let connections = top
            .iter()
            .filter_map(|c| {
                collections
                    .source_connections_for(&c.id)
                    .map(|list| (c.id.clone(), list))
            })
            .collect();

        DashboardView {
            collections: CollectionsPanel {
                loading: collections.is_loading(),
                top,
                total: all.len(),
                connections,
            },
            sources: SourcesPanel {
                loading: sources.is_loading(),
                sources: sort_sources(&sources.items()),
            },
            api_key: self.api_key(),
            example_projects: EXAMPLE_PROJECTS,
            dialog: self.dialog_state(),
        }
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.inner.stop();
    }
}

impl DashboardInner {
    fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    fn stop(&self) -> bool {
        if !self.mounted.swap(false, Ordering::SeqCst) {
            return false;
        }
        if let Some(mut subscription) = lock(&self.subscription).take() {
            subscription.unsubscribe();
        }
        if let Some(watch_task) = lock(&self.sources_watch).take() {
            watch_task.abort();
        }
        log::debug!("Dashboard stopped");
        true
    }

    fn emit(&self, event: UiEvent) {
        if !self.is_mounted() {
            return;
        }
        if self.ui.send(event).is_err() {
            log::debug!("UI event dropped: no receiver");
        }
    }

    fn set_location(&self, location: Location) {
        let mut current = lock(&self.location);
        if *current != location {
            *current = location;
            self.location_generation.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn on_sources_changed(&self) -> ResumptionOutcome {
        self.sources_settled.store(true, Ordering::SeqCst);
        self.check_resumption()
    }

    fn check_resumption(&self) -> ResumptionOutcome {
        if !self.is_mounted() {
            return ResumptionOutcome::Inactive;
        }

        let location = lock(&self.location).clone();
        if !location.signals_resumption() {
            return ResumptionOutcome::NoSignal;
        }

        let key = (
            self.location_generation.load(Ordering::SeqCst),
            self.stores.sources.version(),
        );
        {
            let mut last = lock(&self.last_evaluated);
            if *last == Some(key) {
                return ResumptionOutcome::AlreadyEvaluated;
            }
            *last = Some(key);
        }

        let mut dialog = lock(&self.dialog);
        let stored = dialog.channel().read();
        match stored {
            Ok(Some(details)) => {
                let sources = self.stores.sources.items();
                ResumptionOutcome::Resumed(dialog.resume_from_error(details, &sources))
            }
            Ok(None) => {
                log::warn!("Resumption requested but no connection error is stored");
                drop(dialog);
                self.strip_signal(&location)
            }
            Err(ChannelError::Corrupt { path, message }) => {
                log::warn!("Discarding unreadable connection error in {}: {}", path, message);
                if let Err(e) = dialog.channel().clear() {
                    log::warn!("Failed to clear connection error channel: {}", e);
                }
                drop(dialog);
                self.strip_signal(&location)
            }
            Err(e) => {
                log::warn!("Failed to read connection error channel: {}", e);
                drop(dialog);
                self.strip_signal(&location)
            }
        }
    }

    fn strip_signal(&self, location: &Location) -> ResumptionOutcome {
        let cleaned = location.without_param(CONNECTED_PARAM);
        {
            let mut current = lock(&self.location);
            if *current != *location {
                // the host navigated meanwhile; the new location gets its own check
                return ResumptionOutcome::AlreadyEvaluated;
            }
            *current = cleaned.clone();
            self.location_generation.fetch_add(1, Ordering::SeqCst);
        }
        log::debug!("Normalized location to {}", cleaned);
        self.emit(UiEvent::ReplaceLocation(cleaned));
        ResumptionOutcome::Normalized
    }

    fn leave_dialog(&self, completed: bool) -> DialogExit {
        if !self.is_mounted() {
            return DialogExit {
                transition: Transition::Ignored,
                refresh: None,
            };
        }

        let exit = {
            let mut dialog = lock(&self.dialog);
            if completed {
                dialog.complete()
            } else {
                dialog.close()
            }
        };

        // a handled failure must not be resumed again from the same location
        let location = lock(&self.location).clone();
        if location.signals_resumption() {
            self.strip_signal(&location);
        }
        exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::ApiKey;
    use crate::core::dialog::DialogOrigin;
    use crate::core::testing::{FakeApi, collection, connection, source};
    use crate::storage::error_channel::ResumedErrorDetails;
    use std::time::Duration;
    use tempfile::TempDir;

    struct Harness {
        api: Arc<FakeApi>,
        stores: Arc<StoreRegistry>,
        channel: ErrorChannel,
        _dir: TempDir,
    }

    impl Harness {
        fn new(api: FakeApi) -> Self {
            let api = Arc::new(api);
            let dir = TempDir::new().expect("Failed to create temp dir");
            Self {
                stores: StoreRegistry::new(api.clone()),
                channel: ErrorChannel::in_dir(dir.path()),
                api,
                _dir: dir,
            }
        }

        fn default_data() -> Self {
            Self::new(FakeApi::with_data(
                vec![collection("c1", "Docs", "docs-1", "ready")],
                vec![source("s1", "Notion", "notion")],
            ))
        }

        fn mount(&self, location: &str) -> (Dashboard, mpsc::UnboundedReceiver<UiEvent>) {
            Dashboard::new(
                Arc::clone(&self.stores),
                self.channel.clone(),
                Location::parse(location),
                3,
            )
        }
    }

    fn drain(events: &mut mpsc::UnboundedReceiver<UiEvent>) -> Vec<UiEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = events.try_recv() {
            drained.push(event);
        }
        drained
    }

    #[tokio::test]
    async fn test_cold_load() {
        let harness = Harness::default_data();
        let (dashboard, _events) = harness.mount("/dashboard");

        dashboard.start();
        dashboard.wait_until_loaded().await;
        let view = dashboard.view();

        let top: Vec<&str> = view.collections.top.iter().map(|c| c.name.as_str()).collect();
        let sources: Vec<&str> = view.sources.sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(top, vec!["Docs"]);
        assert_eq!(sources, vec!["Notion"]);
        assert_eq!(view.collections.total, 1);
        assert_eq!(view.dialog, DialogState::Closed);
        assert_eq!(view.example_projects.len(), 5);
        assert_eq!(harness.api.collection_calls(), 1);
        assert_eq!(harness.api.source_calls(), 1);
    }

    #[tokio::test]
    async fn test_api_key_failure_leaves_rest_intact() {
        let harness = Harness::default_data();
        harness.api.fail_api_keys.store(true, Ordering::SeqCst);
        let (dashboard, _events) = harness.mount("/dashboard");

        dashboard.start();
        dashboard.wait_until_loaded().await;
        let view = dashboard.view();

        assert_eq!(view.api_key, ApiKeyState::Missing);
        assert_eq!(view.collections.top.len(), 1);
        assert_eq!(view.sources.sources.len(), 1);
    }

    #[tokio::test]
    async fn test_api_key_first_element_shown() {
        let harness = Harness::default_data();
        *harness.api.api_keys.lock().unwrap() = vec![ApiKey {
            decrypted_key: "sk-123456".to_string(),
        }];
        let (dashboard, _events) = harness.mount("/dashboard");

        dashboard.start();
        dashboard.wait_until_loaded().await;

        assert_eq!(
            dashboard.api_key().key().map(|k| k.decrypted_key.clone()),
            Some("sk-123456".to_string())
        );
    }

    #[tokio::test]
    async fn test_signal_without_record_is_stripped_once() {
        let harness = Harness::default_data();
        let (dashboard, mut events) = harness.mount("/dashboard?connected=error");

        dashboard.start();
        dashboard.wait_until_loaded().await;

        assert_eq!(dashboard.dialog_state(), DialogState::Closed);
        assert_eq!(
            drain(&mut events),
            vec![UiEvent::ReplaceLocation(Location::parse("/dashboard"))]
        );

        assert_eq!(dashboard.check_resumption(), ResumptionOutcome::NoSignal);
        assert_eq!(dashboard.on_sources_changed(), ResumptionOutcome::NoSignal);
        assert!(drain(&mut events).is_empty());
        assert_eq!(dashboard.location().to_string(), "/dashboard");
    }

    #[tokio::test]
    async fn test_corrupt_record_is_discarded() {
        let harness = Harness::default_data();
        std::fs::write(harness.channel.path(), "{not json").expect("Failed to write channel file");
        let (dashboard, mut events) = harness.mount("/dashboard?connected=error");

        dashboard.start();
        dashboard.wait_until_loaded().await;

        assert_eq!(dashboard.dialog_state(), DialogState::Closed);
        assert_eq!(drain(&mut events).len(), 1);
        assert!(!harness.channel.path().exists());
    }

    #[tokio::test]
    async fn test_resumed_error_opens_dialog_for_source() {
        let harness = Harness::default_data();
        harness
            .channel
            .write(&ResumedErrorDetails::for_service("Notion").with_message("token expired"))
            .expect("Failed to write channel");
        let (dashboard, _events) = harness.mount("/dashboard?connected=error");

        dashboard.start();
        dashboard.wait_until_loaded().await;
        let state = dashboard.dialog_state();

        assert_eq!(state.origin(), Some(DialogOrigin::ResumedError));
        assert_eq!(state.selection().map(|s| s.short_name.as_str()), Some("notion"));
        assert_eq!(
            state.error().and_then(|e| e.error_message.as_deref()),
            Some("token expired")
        );
        // the same inputs are not evaluated twice
        assert_eq!(dashboard.on_sources_changed(), ResumptionOutcome::AlreadyEvaluated);
    }

    #[tokio::test]
    async fn test_early_resumption_refined_when_sources_arrive() {
        let harness = Harness::default_data();
        *harness.api.sources_delay.lock().unwrap() = Duration::from_millis(50);
        harness
            .channel
            .write(&ResumedErrorDetails::for_service("notion"))
            .expect("Failed to write channel");
        let (dashboard, _events) = harness.mount("/dashboard?connected=error");

        dashboard.start();
        assert_eq!(
            dashboard.check_resumption(),
            ResumptionOutcome::Resumed(Transition::Opened)
        );
        assert!(dashboard.dialog_state().selection().is_none());

        dashboard.wait_until_loaded().await;
        assert_eq!(
            dashboard.dialog_state().selection().map(|s| s.id.as_str()),
            Some("s1")
        );
    }

    #[tokio::test]
    async fn test_later_catalog_refresh_refines_resumed_dialog() {
        let harness = Harness::default_data();
        harness.api.fail_sources.store(true, Ordering::SeqCst);
        harness
            .channel
            .write(&ResumedErrorDetails::for_service("Notion"))
            .expect("Failed to write channel");
        let (dashboard, _events) = harness.mount("/dashboard?connected=error");

        dashboard.start();
        dashboard.wait_until_loaded().await;
        assert!(dashboard.dialog_state().is_open());
        assert!(dashboard.dialog_state().selection().is_none());

        harness.api.fail_sources.store(false, Ordering::SeqCst);
        harness.stores.sources.fetch(true).await;

        let refined = tokio::time::timeout(Duration::from_secs(2), async {
            while dashboard.dialog_state().selection().is_none() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(refined.is_ok(), "dialog was not refined after the catalog loaded");
        assert_eq!(
            dashboard.dialog_state().selection().map(|s| s.short_name.as_str()),
            Some("notion")
        );
    }

    #[tokio::test]
    async fn test_stop_ends_catalog_watch() {
        let harness = Harness::default_data();
        harness
            .channel
            .write(&ResumedErrorDetails::for_service("Notion"))
            .expect("Failed to write channel");
        let (dashboard, _events) = harness.mount("/dashboard");
        dashboard.start();
        dashboard.wait_until_loaded().await;
        dashboard.stop();

        dashboard.navigate(Location::parse("/dashboard?connected=error"));
        harness.stores.sources.fetch(true).await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(dashboard.dialog_state(), DialogState::Closed);
        assert!(harness.channel.read().expect("Failed to read channel").is_some());
    }

    #[tokio::test]
    async fn test_navigation_before_sources_load_is_deferred() {
        let harness = Harness::default_data();
        let (dashboard, _events) = harness.mount("/dashboard");

        assert_eq!(
            dashboard.navigate(Location::parse("/dashboard?connected=error")),
            ResumptionOutcome::Deferred
        );
        assert_eq!(
            dashboard.navigate(Location::parse("/dashboard?tab=1")),
            ResumptionOutcome::NoSignal
        );
    }

    #[tokio::test]
    async fn test_close_clears_record_and_signal() {
        let harness = Harness::default_data();
        harness
            .channel
            .write(&ResumedErrorDetails::for_service("Notion"))
            .expect("Failed to write channel");
        let (dashboard, mut events) = harness.mount("/dashboard?connected=error");
        dashboard.start();
        dashboard.wait_until_loaded().await;
        assert!(dashboard.dialog_state().is_open());

        let transition = dashboard.close_dialog().settled().await;

        assert_eq!(transition, Transition::Closed);
        assert!(harness.channel.read().expect("Failed to read channel").is_none());
        assert_eq!(
            drain(&mut events),
            vec![UiEvent::ReplaceLocation(Location::parse("/dashboard"))]
        );
        assert_eq!(dashboard.check_resumption(), ResumptionOutcome::NoSignal);
    }

    #[tokio::test]
    async fn test_mounts_share_caches() {
        let harness = Harness::default_data();
        let (first, _first_events) = harness.mount("/dashboard");
        first.start();
        first.wait_until_loaded().await;
        first.stop();

        let (second, _second_events) = harness.mount("/dashboard");
        second.start();
        second.wait_until_loaded().await;

        assert_eq!(harness.api.collection_calls(), 1);
        assert_eq!(harness.api.source_calls(), 1);
        assert_eq!(second.view().collections.top.len(), 1);
    }

    #[tokio::test]
    async fn test_stop_is_idempotent_and_silences_controller() {
        let harness = Harness::default_data();
        let (dashboard, mut events) = harness.mount("/dashboard");
        dashboard.start();
        dashboard.wait_until_loaded().await;
        assert_eq!(harness.stores.collections.listener_count(), 1);

        assert!(dashboard.stop());
        assert!(!dashboard.stop());
        assert_eq!(harness.stores.collections.listener_count(), 0);

        dashboard.request_new_api_key();
        assert_eq!(
            dashboard.select_source(&source("s1", "Notion", "notion")),
            Transition::Ignored
        );
        assert_eq!(dashboard.check_resumption(), ResumptionOutcome::Inactive);
        assert!(drain(&mut events).is_empty());
    }

    #[tokio::test]
    async fn test_drop_unsubscribes() {
        let harness = Harness::default_data();
        {
            let (dashboard, _events) = harness.mount("/dashboard");
            dashboard.start();
            assert_eq!(harness.stores.collections.listener_count(), 1);
        }
        assert_eq!(harness.stores.collections.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_outbound_events() {
        let harness = Harness::default_data();
        let (dashboard, mut events) = harness.mount("/dashboard");

        dashboard.open_collection(&collection("c1", "Docs", "docs-1", "ready"));
        dashboard.see_all_collections();
        dashboard.request_new_api_key();
        dashboard.open_example_project(&EXAMPLE_PROJECTS[0]);

        assert_eq!(
            drain(&mut events),
            vec![
                UiEvent::Navigate("/collections/docs-1".to_string()),
                UiEvent::Navigate("/collections".to_string()),
                UiEvent::Toast(Toast::Info("New API key feature coming soon".to_string())),
                UiEvent::Toast(Toast::Info(
                    "Opening Integrate Google Drive template".to_string()
                )),
            ]
        );
    }

    #[tokio::test]
    async fn test_top_collection_connections() {
        let harness = Harness::new(FakeApi::with_data(
            vec![
                collection("c1", "Docs", "docs-1", "ready"),
                collection("c2", "Tickets", "tickets-1", "ready"),
            ],
            vec![],
        ));
        harness
            .api
            .connections
            .lock()
            .unwrap()
            .insert("c1".to_string(), vec![connection("sc1", "notion", "c1")]);
        harness
            .api
            .failing_connections
            .lock()
            .unwrap()
            .insert("c2".to_string());
        let (dashboard, _events) = harness.mount("/dashboard");
        dashboard.start();
        dashboard.wait_until_loaded().await;

        let mapping = dashboard.load_connections_for_top_collections().await;

        assert_eq!(mapping["c1"].len(), 1);
        assert!(mapping["c2"].is_empty());
        assert_eq!(dashboard.view().collections.connections.len(), 2);
    }
}
