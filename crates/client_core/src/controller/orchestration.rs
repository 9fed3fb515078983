//! Single-threaded page actor: applies events, runs commands, and posts
//! network results back onto its own event queue.

use std::{future::Future, sync::Arc};

use shared::domain::{Intern, InternId};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::{
    controller::{
        events::{PageCommand, PageEvent, CONFIRM_DELETE_PROMPT},
        reducer::{PageState, PageView},
    },
    error::ApiFailure,
    filters::InternFilters,
    ports::PagePorts,
    query_cache::{QueryCache, QueryKey},
    InternsApi,
};

pub struct InternsPage {
    api: Arc<dyn InternsApi>,
    ports: PagePorts,
    state: PageState,
    cache: QueryCache<Vec<Intern>>,
    events_tx: UnboundedSender<PageEvent>,
    events_rx: UnboundedReceiver<PageEvent>,
    in_flight: usize,
}

impl InternsPage {
    pub fn new(api: Arc<dyn InternsApi>, ports: PagePorts) -> Self {
        Self::with_filters(api, ports, InternFilters::default())
    }

    pub fn with_filters(api: Arc<dyn InternsApi>, ports: PagePorts, filters: InternFilters) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            api,
            ports,
            state: PageState::with_filters(filters),
            cache: QueryCache::new(),
            events_tx,
            events_rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn view(&self) -> PageView {
        let interns = self.cache.get(self.state.active_key()).map(Vec::as_slice);
        self.state.view(interns)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Starts the initial list fetch. Must be called inside a tokio runtime.
    pub fn open(&mut self) {
        for command in self.state.open() {
            self.execute(command);
        }
    }

    pub fn dispatch(&mut self, event: PageEvent) {
        debug!(event = event.name(), "page event");
        if let PageEvent::ListResolved { key, result } = event {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.store_list(key, result);
            return;
        }
        if matches!(
            event,
            PageEvent::DeleteResolved { .. } | PageEvent::StartThreadResolved { .. }
        ) {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
        for command in self.state.reduce(event) {
            self.execute(command);
        }
    }

    /// Processes one queued network result. Returns `false` once nothing is
    /// outstanding.
    pub async fn pump(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.events_rx.recv().await {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Drains network results until no request is outstanding.
    pub async fn settle(&mut self) {
        while self.pump().await {}
    }

    fn store_list(&mut self, key: QueryKey, result: Result<Vec<Intern>, ApiFailure>) {
        match result {
            Ok(interns) => {
                debug!(%key, count = interns.len(), "interns list resolved");
                self.cache.complete(&key, interns);
                if &key == self.state.active_key() && self.cache.is_stale(&key) {
                    self.fetch_list(key);
                }
                self.prune_cache();
            }
            Err(error) => {
                warn!(%key, %error, "interns list fetch failed");
                self.cache.fail(&key);
            }
        }
    }

    fn prune_cache(&mut self) {
        let evicted = self.cache.prune(self.state.active_key());
        if evicted > 0 {
            debug!(evicted, "pruned cached lists");
        }
    }

    fn execute(&mut self, command: PageCommand) {
        match command {
            PageCommand::FetchList(key) => self.fetch_list(key),
            PageCommand::Refetch(key) => {
                self.cache.invalidate(|cached| cached == &key);
                self.fetch_list(key);
            }
            PageCommand::ConfirmDelete(intern_id) => {
                let event = if self.ports.confirmer.confirm(CONFIRM_DELETE_PROMPT) {
                    PageEvent::DeleteConfirmed(intern_id)
                } else {
                    PageEvent::DeleteDeclined(intern_id)
                };
                self.dispatch(event);
            }
            PageCommand::DeleteIntern(intern_id) => self.delete_intern(intern_id),
            PageCommand::InvalidateScope(scope) => {
                let invalidated = self.cache.invalidate_scope(scope);
                info!(scope, count = invalidated.len(), "invalidated cached lists");
                let active = self.state.active_key().clone();
                self.fetch_list(active);
                self.prune_cache();
            }
            PageCommand::CreateThread(intern_id) => self.create_thread(intern_id),
            PageCommand::Alert(message) => self.ports.notifier.alert(&message),
            PageCommand::Navigate(location) => {
                info!(path = %location.path(), "navigating");
                self.ports.navigator.navigate(location);
            }
        }
    }

    fn fetch_list(&mut self, key: QueryKey) {
        if !self.cache.begin_fetch(&key) {
            debug!(%key, "list served from cache or already loading");
            return;
        }
        let api = self.api.clone();
        let params = key.params().to_string();
        self.spawn_request(
            async move { api.list_interns(&params).await },
            move |result| PageEvent::ListResolved { key, result },
        );
    }

    fn delete_intern(&mut self, intern_id: InternId) {
        let api = self.api.clone();
        self.spawn_request(
            async move { api.delete_intern(intern_id).await },
            move |result| PageEvent::DeleteResolved { intern_id, result },
        );
    }

    fn create_thread(&mut self, intern_id: InternId) {
        let api = self.api.clone();
        self.spawn_request(
            async move { api.create_thread(intern_id).await },
            move |result| PageEvent::StartThreadResolved { intern_id, result },
        );
    }

    /// Runs `request` on its own task and always posts exactly one resolved
    /// event, even when the task panics or is cancelled.
    fn spawn_request<T, F, R>(&mut self, request: F, resolve: R)
    where
        T: Send + 'static,
        F: Future<Output = Result<T, ApiFailure>> + Send + 'static,
        R: FnOnce(Result<T, ApiFailure>) -> PageEvent + Send + 'static,
    {
        self.in_flight += 1;
        let events_tx = self.events_tx.clone();
        let task = tokio::spawn(request);
        tokio::spawn(async move {
            let result = match task.await {
                Ok(result) => result,
                Err(join_error) => {
                    warn!(%join_error, "request task ended abnormally");
                    Err(ApiFailure::Aborted(join_error.to_string()))
                }
            };
            let _ = events_tx.send(resolve(result));
        });
    }
}

#[cfg(test)]
#[path = "../tests/orchestration_tests.rs"]
mod tests;
