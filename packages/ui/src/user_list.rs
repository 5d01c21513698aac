use api::HttpStore;
use dioxus::prelude::*;
use store::{RemoteStore, SlotJob, UserManager, UsersConfig};

use crate::activity_log::{log_activity, ActivityLog, LogLevel};
use crate::BrowserPrompt;

/// The users view state as wired in the browser.
pub type Users = UserManager<HttpStore, BrowserPrompt>;

/// Consume the `Signal<Users>` from context.
pub fn use_users() -> Signal<Users> {
    use_context::<Signal<Users>>()
}

/// Provides `Signal<Users>` and `Signal<ActivityLog>` to its children and
/// loads the list on mount.
#[component]
pub fn UsersProvider(config: UsersConfig, children: Element) -> Element {
    let log: Signal<ActivityLog> = use_context_provider(|| Signal::new(ActivityLog::default()));
    let users: Signal<Users> = use_context_provider(|| {
        let store = HttpStore::new(&config.remote);
        Signal::new(UserManager::from_config(store, BrowserPrompt, &config))
    });

    use_effect(move || {
        spawn(reload(users, log));
    });

    rsx! {
        {children}
    }
}

/// Fetch the list again and start hydrating it.
pub async fn reload(mut users: Signal<Users>, mut log: Signal<ActivityLog>) {
    let store = users.peek().store().clone();
    match store.list_users().await {
        Ok(list) => {
            let jobs = users.write().apply_load(list);
            spawn_hydration(users, jobs);
        }
        Err(e) => log_activity(&mut log, LogLevel::Error, &format!("Could not load users: {e}")),
    }
}

/// One task per experience slot. Each outcome is applied as soon as its own
/// fetch returns.
pub fn spawn_hydration(users: Signal<Users>, jobs: Vec<SlotJob>) {
    for job in jobs {
        let mut users = users;
        let store = users.peek().store().clone();
        spawn(async move {
            let outcome = job.run(&store).await;
            users.write().apply(outcome);
        });
    }
}
