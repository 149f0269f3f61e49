use std::fmt;
use std::sync::Arc;

use crate::entry::ExtractProgress;

/// Knobs for [`crate::extract_safely_with_options`].
#[derive(Clone)]
pub struct ExtractOptions {
    /// Replace files that already exist in the destination. Default: true.
    pub overwrite: bool,
    /// Apply the mode bits stored in the archive verbatim. Default: false.
    pub preserve_permissions: bool,
    pub on_progress: Option<Arc<dyn Fn(&ExtractProgress) + Send + Sync>>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            overwrite: true,
            preserve_permissions: false,
            on_progress: None,
        }
    }
}

impl fmt::Debug for ExtractOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractOptions")
            .field("overwrite", &self.overwrite)
            .field("preserve_permissions", &self.preserve_permissions)
            .field("on_progress", &"{ ... }")
            .finish()
    }
}

impl ExtractOptions {
    #[must_use]
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    #[must_use]
    pub fn preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    #[must_use]
    pub fn on_progress(mut self, callback: Arc<dyn Fn(&ExtractProgress) + Send + Sync>) -> Self {
        self.on_progress = Some(callback);
        self
    }

    pub(crate) fn report(&self, progress: &ExtractProgress) {
        if let Some(ref callback) = self.on_progress {
            callback(progress);
        }
    }
}
