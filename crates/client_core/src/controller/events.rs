//! Page events, commands, and failure-to-alert mapping for the interns page.

use shared::{
    domain::{Intern, InternId},
    error::ApiError,
    protocol::{Location, ThreadCreated},
};

use crate::{error::ApiFailure, query_cache::QueryKey};

pub const CONFIRM_DELETE_PROMPT: &str = "このインターン生登録を削除しますか？";
pub const LOGIN_REQUIRED_ALERT: &str = "ログインが必要です。";
pub const COMPANY_ONLY_ALERT: &str = "企業ユーザーのみDMを開始できます";
pub const NO_RESULTS_NOTICE: &str =
    "検索条件に一致するインターンシップ生が見つかりませんでした。";
pub const DELETE_LABEL: &str = "削除";
pub const DELETING_LABEL: &str = "削除中…";

#[derive(Debug)]
pub enum PageEvent {
    SearchChanged(String),
    SkillsChanged(String),
    SchoolChanged(String),
    FiltersCleared,
    RefreshRequested,
    HomeRequested,
    ListResolved {
        key: QueryKey,
        result: Result<Vec<Intern>, ApiFailure>,
    },
    DeleteClicked(InternId),
    DeleteConfirmed(InternId),
    DeleteDeclined(InternId),
    DeleteResolved {
        intern_id: InternId,
        result: Result<(), ApiFailure>,
    },
    StartThreadClicked(InternId),
    StartThreadResolved {
        intern_id: InternId,
        result: Result<ThreadCreated, ApiFailure>,
    },
}

impl PageEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SearchChanged(_) => "search_changed",
            Self::SkillsChanged(_) => "skills_changed",
            Self::SchoolChanged(_) => "school_changed",
            Self::FiltersCleared => "filters_cleared",
            Self::RefreshRequested => "refresh_requested",
            Self::HomeRequested => "home_requested",
            Self::ListResolved { .. } => "list_resolved",
            Self::DeleteClicked(_) => "delete_clicked",
            Self::DeleteConfirmed(_) => "delete_confirmed",
            Self::DeleteDeclined(_) => "delete_declined",
            Self::DeleteResolved { .. } => "delete_resolved",
            Self::StartThreadClicked(_) => "start_thread_clicked",
            Self::StartThreadResolved { .. } => "start_thread_resolved",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCommand {
    FetchList(QueryKey),
    Refetch(QueryKey),
    ConfirmDelete(InternId),
    DeleteIntern(InternId),
    InvalidateScope(&'static str),
    CreateThread(InternId),
    Alert(String),
    Navigate(Location),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Delete,
    StartThread,
}

impl Mutation {
    fn failure_prefix(self) -> &'static str {
        match self {
            Self::Delete => "削除に失敗しました",
            Self::StartThread => "DM開始に失敗しました",
        }
    }
}

pub fn generic_failure_message(mutation: Mutation, status: Option<u16>) -> String {
    match status {
        Some(status) => format!("{} (HTTP {status})", mutation.failure_prefix()),
        None => mutation.failure_prefix().to_string(),
    }
}

/// Commands raised when a mutation fails. 403 is only special for thread starts.
pub fn failure_commands(mutation: Mutation, failure: &ApiFailure) -> Vec<PageCommand> {
    let error = ApiError::from(failure);
    if error.is_unauthenticated() {
        return vec![
            PageCommand::Alert(LOGIN_REQUIRED_ALERT.to_string()),
            PageCommand::Navigate(Location::Login),
        ];
    }
    if error.is_forbidden() && mutation == Mutation::StartThread {
        return vec![PageCommand::Alert(COMPANY_ONLY_ALERT.to_string())];
    }
    vec![PageCommand::Alert(generic_failure_message(mutation, error.status))]
}
