use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{context::Credentials, error::FireqlResult, store::StoreSession};

/// Per-query configuration.
///
/// - `project_id` identifies the target store.
/// - `service_account` is an optional credential blob, forwarded to the store.
/// - `default_limit` bounds queries without a LIMIT clause; `0` disables it.
///
/// A statement owns its own copy for the duration of one execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Context {
    pub project_id: String,
    pub service_account: Option<String>,
    pub default_limit: usize,
}

impl Context {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self { project_id: project_id.into(), ..Default::default() }
    }

    pub fn with_service_account(mut self, json: impl Into<String>) -> Self {
        self.service_account = Some(json.into());
        self
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> FireqlResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// The configured default limit, if one applies.
    pub fn limit(&self) -> Option<usize> {
        (self.default_limit > 0).then_some(self.default_limit)
    }

    /// Validate the service account, if any.
    pub fn credentials(&self) -> FireqlResult<Option<Credentials>> {
        self.service_account.as_deref().map(Credentials::from_json).transpose()
    }

    pub fn session(&self) -> FireqlResult<StoreSession> {
        Ok(StoreSession::new(self.project_id.clone(), self.credentials()?))
    }
}
