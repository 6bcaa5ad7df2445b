//! Output sink for the session transcript.

/// Where the session writes user-visible lines.
///
/// Fire-and-forget: the session never reads anything back.
pub trait DisplaySink: Send + Sync {
    /// Show one line of text.
    fn display(&self, text: &str);
}

impl<F> DisplaySink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn display(&self, text: &str) {
        self(text);
    }
}
