use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(InternId);
id_newtype!(ThreadId);

/// Optional profile metadata attached to an intern account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intern {
    pub id: InternId,
    pub email: String,
    #[serde(default)]
    pub profile: Option<InternProfile>,
}

impl Intern {
    /// Profile name when present, otherwise the account email.
    pub fn display_name(&self) -> &str {
        self.profile
            .as_ref()
            .and_then(|profile| profile.name.as_deref())
            .unwrap_or(&self.email)
    }

    pub fn school(&self) -> &str {
        self.profile
            .as_ref()
            .and_then(|profile| profile.school.as_deref())
            .unwrap_or_default()
    }

    pub fn skills_line(&self) -> String {
        self.profile
            .as_ref()
            .and_then(|profile| profile.skills.as_ref())
            .map(|skills| skills.join(", "))
            .unwrap_or_default()
    }

    /// `"{school} / {skills}"`; the separator is kept even when both halves are empty.
    pub fn subtitle(&self) -> String {
        format!("{} / {}", self.school(), self.skills_line())
    }
}
