use crate::auth::Session;
use crate::backend::ConversionResult;

/// Ordered log of staged progress messages for the current run. Append-only
/// while a run is underway; cleared at run start and on any error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressLog {
    entries: Vec<String>,
}

impl ProgressLog {
    pub fn append(&mut self, entry: String) {
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Transient login-success banner. The generation ties the banner to its
/// pending expiry timer; an expiry carrying a stale generation is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub generation: u64,
}

/// The single renderable snapshot. Only the reducer produces new values;
/// the boundary renders the difference between consecutive snapshots.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub session: Option<Session>,
    pub loading: bool,
    pub error: Option<String>,
    pub progress: ProgressLog,
    pub result: Option<ConversionResult>,
    pub banner: Option<Banner>,
    pub theme_dark: bool,
    /// Monotonic banner counter; never reset, so a stale timer can never
    /// alias a newer banner.
    pub banner_generation: u64,
}
