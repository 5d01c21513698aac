use dioxus::prelude::*;

use crate::activity_log::{LogEntry, LogLevel, use_activity_log};
use crate::icons::{FaCircleCheck, FaCircleInfo, FaCircleXmark, FaTriangleExclamation};
use crate::Icon;

const ACTIVITY_LOG_CSS: Asset = asset!("/assets/styling/activity_log.css");

/// Newest entries shown; older ones stay in the log until cleared.
const SHOWN: usize = 50;

/// Collapsible list of notices raised by the users view.
#[component]
pub fn ActivityLogPanel() -> Element {
    let mut log = use_activity_log();

    if !log().visible {
        return rsx! {};
    }

    let entries: Vec<LogEntry> = log().entries.iter().rev().take(SHOWN).cloned().collect();

    rsx! {
        document::Stylesheet { href: ACTIVITY_LOG_CSS }

        aside {
            class: "activity-log-panel",
            header {
                class: "activity-log-header",
                span { "Activity" }
                button {
                    onclick: move |_| log.write().entries.clear(),
                    "Clear"
                }
                button {
                    onclick: move |_| log.write().visible = false,
                    "Close"
                }
            }
            if entries.is_empty() {
                p { class: "activity-log-empty", "Nothing yet." }
            }
            ul {
                class: "activity-log-entries",
                for (i, entry) in entries.into_iter().enumerate() {
                    LogRow { key: "{i}", entry }
                }
            }
        }
    }
}

#[component]
fn LogRow(entry: LogEntry) -> Element {
    let class = match entry.level {
        LogLevel::Error => "activity-log-entry error",
        LogLevel::Warning => "activity-log-entry warning",
        LogLevel::Success => "activity-log-entry success",
        LogLevel::Info => "activity-log-entry info",
    };

    rsx! {
        li {
            class,
            match entry.level {
                LogLevel::Error => rsx! { Icon { icon: FaCircleXmark, width: 12, height: 12 } },
                LogLevel::Warning => rsx! { Icon { icon: FaTriangleExclamation, width: 12, height: 12 } },
                LogLevel::Success => rsx! { Icon { icon: FaCircleCheck, width: 12, height: 12 } },
                LogLevel::Info => rsx! { Icon { icon: FaCircleInfo, width: 12, height: 12 } },
            }
            span { class: "activity-log-time", "{entry.timestamp}" }
            span { " {entry.message}" }
        }
    }
}

/// Badge button that opens the panel; red while the log holds errors.
#[component]
pub fn ActivityLogToggle() -> Element {
    let mut log = use_activity_log();
    let count = log().entries.len();
    let has_errors = log().has_errors();

    rsx! {
        button {
            class: if has_errors { "activity-log-toggle has-errors" } else { "activity-log-toggle" },
            title: "Activity",
            onclick: move |_| {
                let visible = log().visible;
                log.write().visible = !visible;
            },
            "Activity ({count})"
        }
    }
}
