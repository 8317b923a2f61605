use std::fmt::Debug;

/// Sink for soft-error warnings raised while resolving options or scanning
/// input. The plugin never fails hard; anything unexpected degrades to a
/// safe fallback and a message through this channel.
pub trait Diagnostics: Debug + Send + Sync {
    fn warn(&self, message: &str);
}

/// Default sink, forwards to the `log` facade.
#[derive(Debug, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn warn(&self, message: &str) {
        log::warn!("markdown-it-wikilinks: {message}");
    }
}
