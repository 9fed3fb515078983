//! Free-text search filters and the query string derived from them.

use url::form_urlencoded;

use crate::query_cache::QueryKey;

pub const INTERNS_SCOPE: &str = "interns";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Search,
    Skills,
    School,
}

impl FilterField {
    pub const ALL: [FilterField; 3] = [Self::Search, Self::Skills, Self::School];

    pub fn param_name(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Skills => "skills",
            Self::School => "school",
        }
    }
}

/// Name/email, skills and school text as typed by the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InternFilters {
    pub search: String,
    pub skills: String,
    pub school: String,
}

impl InternFilters {
    pub fn new(
        search: impl Into<String>,
        skills: impl Into<String>,
        school: impl Into<String>,
    ) -> Self {
        Self {
            search: search.into(),
            skills: skills.into(),
            school: school.into(),
        }
    }

    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Search => &self.search,
            FilterField::Skills => &self.skills,
            FilterField::School => &self.school,
        }
    }

    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let slot = match field {
            FilterField::Search => &mut self.search,
            FilterField::Skills => &mut self.skills,
            FilterField::School => &mut self.school,
        };
        *slot = value.into();
    }

    pub fn clear(&mut self) {
        self.search.clear();
        self.skills.clear();
        self.school.clear();
    }

    /// True when any field has text left after trimming.
    pub fn has_active(&self) -> bool {
        FilterField::ALL
            .iter()
            .any(|field| !self.get(*field).trim().is_empty())
    }

    /// True when any field holds text at all, whitespace included.
    pub fn is_dirty(&self) -> bool {
        FilterField::ALL
            .iter()
            .any(|field| !self.get(*field).is_empty())
    }

    pub fn query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for field in FilterField::ALL {
            let value = self.get(field).trim();
            if !value.is_empty() {
                serializer.append_pair(field.param_name(), value);
            }
        }
        serializer.finish()
    }

    pub fn query_key(&self) -> QueryKey {
        QueryKey::new(INTERNS_SCOPE, self.query_string())
    }
}
