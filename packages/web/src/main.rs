use dioxus::prelude::*;

use store::UsersConfig;
use ui::UsersProvider;
use views::Users;

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Root {},
    #[route("/users")]
    Users {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

/// Baked in at build time; edit and rebuild to point at another backend.
const USERS_TOML: &str = include_str!("../users.toml");

fn main() {
    dioxus::launch(App);
}

fn load_config() -> UsersConfig {
    match UsersConfig::from_toml(USERS_TOML) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Invalid {}, using defaults: {}", UsersConfig::filename(), e);
            UsersConfig::default()
        }
    }
}

#[component]
fn App() -> Element {
    let config = use_hook(load_config);

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        UsersProvider {
            config,
            Router::<Route> {}
        }
    }
}

/// Redirect `/` to `/users`
#[component]
fn Root() -> Element {
    let nav = use_navigator();
    nav.replace(Route::Users {});
    rsx! {}
}
