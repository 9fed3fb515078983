//! Pure page state transitions and the render-neutral view model.

use std::collections::BTreeSet;

use shared::{
    domain::{Intern, InternId},
    protocol::Location,
};

use crate::{
    controller::events::{
        failure_commands, Mutation, PageCommand, PageEvent, DELETE_LABEL, DELETING_LABEL,
    },
    filters::{FilterField, InternFilters, INTERNS_SCOPE},
    query_cache::QueryKey,
};

#[derive(Debug, Clone)]
pub struct PageState {
    filters: InternFilters,
    active_key: QueryKey,
    deleting: BTreeSet<InternId>,
    thread_start_pending: bool,
}

impl Default for PageState {
    fn default() -> Self {
        Self::with_filters(InternFilters::default())
    }
}

impl PageState {
    pub fn with_filters(filters: InternFilters) -> Self {
        let active_key = filters.query_key();
        Self {
            filters,
            active_key,
            deleting: BTreeSet::new(),
            thread_start_pending: false,
        }
    }

    pub fn filters(&self) -> &InternFilters {
        &self.filters
    }

    pub fn active_key(&self) -> &QueryKey {
        &self.active_key
    }

    pub fn is_deleting(&self, intern_id: InternId) -> bool {
        self.deleting.contains(&intern_id)
    }

    pub fn thread_start_pending(&self) -> bool {
        self.thread_start_pending
    }

    /// Commands that load the page for the first time.
    pub fn open(&self) -> Vec<PageCommand> {
        vec![PageCommand::FetchList(self.active_key.clone())]
    }

    pub fn reduce(&mut self, event: PageEvent) -> Vec<PageCommand> {
        match event {
            PageEvent::SearchChanged(value) => self.set_filter(FilterField::Search, value),
            PageEvent::SkillsChanged(value) => self.set_filter(FilterField::Skills, value),
            PageEvent::SchoolChanged(value) => self.set_filter(FilterField::School, value),
            PageEvent::FiltersCleared => {
                self.filters.clear();
                self.rederive_key()
            }
            PageEvent::RefreshRequested => vec![PageCommand::Refetch(self.active_key.clone())],
            PageEvent::HomeRequested => vec![PageCommand::Navigate(Location::Home)],
            // Cache bookkeeping happens in the orchestrator.
            PageEvent::ListResolved { .. } => Vec::new(),
            PageEvent::DeleteClicked(intern_id) => {
                if self.is_deleting(intern_id) {
                    return Vec::new();
                }
                vec![PageCommand::ConfirmDelete(intern_id)]
            }
            PageEvent::DeleteDeclined(_) => Vec::new(),
            PageEvent::DeleteConfirmed(intern_id) => {
                if !self.deleting.insert(intern_id) {
                    return Vec::new();
                }
                vec![PageCommand::DeleteIntern(intern_id)]
            }
            PageEvent::DeleteResolved { intern_id, result } => {
                self.deleting.remove(&intern_id);
                match result {
                    Ok(()) => vec![PageCommand::InvalidateScope(INTERNS_SCOPE)],
                    Err(failure) => failure_commands(Mutation::Delete, &failure),
                }
            }
            PageEvent::StartThreadClicked(intern_id) => {
                if self.thread_start_pending {
                    return Vec::new();
                }
                self.thread_start_pending = true;
                vec![PageCommand::CreateThread(intern_id)]
            }
            PageEvent::StartThreadResolved { result, .. } => {
                self.thread_start_pending = false;
                match result {
                    Ok(thread) => vec![PageCommand::Navigate(Location::Thread(thread.id))],
                    Err(failure) => failure_commands(Mutation::StartThread, &failure),
                }
            }
        }
    }

    fn set_filter(&mut self, field: FilterField, value: String) -> Vec<PageCommand> {
        self.filters.set(field, value);
        self.rederive_key()
    }

    fn rederive_key(&mut self) -> Vec<PageCommand> {
        let key = self.filters.query_key();
        if key == self.active_key {
            return Vec::new();
        }
        self.active_key = key.clone();
        vec![PageCommand::FetchList(key)]
    }

    /// `interns` is the cached result for the active key, if any has arrived.
    pub fn view(&self, interns: Option<&[Intern]>) -> PageView {
        let rows = interns
            .unwrap_or_default()
            .iter()
            .map(|intern| {
                let deleting = self.is_deleting(intern.id);
                InternRow {
                    id: intern.id,
                    display_name: intern.display_name().to_string(),
                    subtitle: intern.subtitle(),
                    detail_path: Location::InternDetail(intern.id).path(),
                    delete_label: if deleting { DELETING_LABEL } else { DELETE_LABEL },
                    delete_disabled: deleting,
                    dm_disabled: self.thread_start_pending,
                }
            })
            .collect();

        PageView {
            rows,
            loaded: interns.is_some(),
            no_results: interns.is_some_and(|list| list.is_empty()) && self.filters.has_active(),
            show_clear: self.filters.is_dirty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternRow {
    pub id: InternId,
    pub display_name: String,
    pub subtitle: String,
    pub detail_path: String,
    pub delete_label: &'static str,
    pub delete_disabled: bool,
    pub dm_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub rows: Vec<InternRow>,
    pub loaded: bool,
    pub no_results: bool,
    pub show_clear: bool,
}

#[cfg(test)]
#[path = "../tests/reducer_tests.rs"]
mod tests;
