//! Browser implementation of [`store::Prompt`].

use store::Prompt;

/// `window.confirm` / `window.alert` on the web. Elsewhere there is no
/// blocking dialog to show, so confirmations are declined and alerts logged.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BrowserPrompt;

impl Prompt for BrowserPrompt {
    async fn confirm(&self, message: &str) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::window()
                .and_then(|window| window.confirm_with_message(message).ok())
                .unwrap_or(false)
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            tracing::warn!("No dialog available, declining: {}", message);
            false
        }
    }

    fn alert(&self, message: &str) {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(message);
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            tracing::warn!("{}", message);
        }
    }
}
