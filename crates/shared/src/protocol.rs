use serde::{Deserialize, Serialize};

use crate::domain::{InternId, ThreadId};

pub const INTERNS_PATH: &str = "/api/interns";
pub const THREADS_PATH: &str = "/api/threads";

pub fn intern_path(intern_id: InternId) -> String {
    format!("{INTERNS_PATH}/{intern_id}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateThreadRequest {
    pub intern_id: InternId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadCreated {
    pub id: ThreadId,
}

/// Places the page can send the visitor to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Home,
    Login,
    InternDetail(InternId),
    Thread(ThreadId),
}

impl Location {
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::InternDetail(intern_id) => format!("/interns/{intern_id}"),
            Self::Thread(thread_id) => format!("/threads/{thread_id}"),
        }
    }
}
