use std::future::Future;

/// Blocking user prompts: a yes/no confirmation and an alert.
///
/// The users view awaits `confirm` before any destructive remote call and
/// reports user-visible failures through `alert`.
pub trait Prompt {
    fn confirm(&self, message: &str) -> impl Future<Output = bool>;

    fn alert(&self, message: &str);
}
