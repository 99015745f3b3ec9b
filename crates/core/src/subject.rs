//! The (user, group) pair grants are evaluated against.

use serde::{Deserialize, Serialize};

/// Identity of the caller a resolution pass runs for.
///
/// Either part may be absent (anonymous user, no active group). The subject is
/// fixed for a whole pass; nothing in the theme tree can replace it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    pub user: Option<String>,
    pub group: Option<String>,
}

impl Subject {
    pub fn new(user: Option<String>, group: Option<String>) -> Self {
        Self { user, group }
    }

    pub fn user(name: impl Into<String>) -> Self {
        Self {
            user: Some(name.into()),
            group: None,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn group_name(&self) -> Option<&str> {
        self.group.as_deref()
    }
}

impl core::fmt::Display for Subject {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "user={} group={}",
            self.user.as_deref().unwrap_or("-"),
            self.group.as_deref().unwrap_or("-")
        )
    }
}
