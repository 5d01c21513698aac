use dioxus::prelude::*;
use store::{ExperienceRef, Prompt, Row, Toggle};

use crate::activity_log::{log_activity, use_activity_log, LogLevel};
use crate::icons::{
    FaChevronDown, FaChevronRight, FaEye, FaEyeSlash, FaPen, FaRotate, FaTrashCan, FaUserPlus,
};
use crate::user_list::{reload, spawn_hydration, use_users};
use crate::{ActivityLogPanel, ActivityLogToggle, Icon};

const VIEWS_CSS: Asset = asset!("/src/views/views.css");

/// Biography length shown while collapsed.
const BIOGRAPHY_PREVIEW: usize = 80;

/// The user management page: list on the left, create/edit form on the right.
///
/// Expects `UsersProvider` above it.
#[component]
pub fn UsersView() -> Element {
    let mut users = use_users();
    let mut log = use_activity_log();

    let rows: Vec<(String, Row)> = users
        .read()
        .list()
        .rows()
        .iter()
        .map(|row| (format!("{:?}", row.key), row.clone()))
        .collect();
    let empty = rows.is_empty();
    let editing = users.read().session().map(|s| s.index);
    let form = users.read().form().clone();
    let mismatch = form.submitted && !form.passwords_match();
    let submitting = users.read().is_submitting();

    let on_toggle = move |(kind, index): (Toggle, usize)| {
        if let Err(e) = users.write().toggle(kind, index) {
            tracing::debug!("Ignored toggle: {}", e);
        }
    };

    let on_edit = move |index: usize| {
        if let Err(e) = users.write().begin_edit(index) {
            log_activity(&mut log, LogLevel::Warning, &e.to_string());
        }
    };

    let on_delete = move |index: usize| {
        // NotPersisted has already been alerted
        let Ok(request) = users.read().begin_delete(index) else {
            return;
        };
        spawn(async move {
            let prompt = *users.peek().prompt();
            if !prompt.confirm(&request.confirmation()).await {
                return;
            }
            let store = users.peek().store().clone();
            let result = request.dispatch(&store).await;
            let name = request.name.clone();
            if users.write().finish_delete(request, result).is_ok() {
                log_activity(&mut log, LogLevel::Success, &format!("Deleted {name}"));
            }
        });
    };

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let Ok(request) = users.write().begin_submit() else {
            return;
        };
        spawn(async move {
            let store = users.peek().store().clone();
            let result = request.dispatch(&store).await;
            let finished = users.write().finish_submit(request, result);
            match finished {
                Ok(jobs) => {
                    log_activity(&mut log, LogLevel::Success, "User saved");
                    spawn_hydration(users, jobs);
                }
                Err(e) => log_activity(
                    &mut log,
                    LogLevel::Error,
                    &format!("Could not save user: {e}"),
                ),
            }
        });
    };

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "view-page users-page",

            header {
                class: "users-header",
                h1 { class: "view-title", "Users" }
                button {
                    class: "icon-button",
                    title: "Reload",
                    onclick: move |_| {
                        spawn(reload(users, log));
                    },
                    Icon { icon: FaRotate, width: 14, height: 14 }
                }
                ActivityLogToggle {}
            }

            div {
                class: "users-layout",

                section {
                    class: "users-list",
                    if empty {
                        p { class: "users-empty", "No users yet." }
                    }
                    ul {
                        for (index, (row_key, row)) in rows.into_iter().enumerate() {
                            UserRow {
                                key: "{row_key}",
                                index,
                                editing: editing == Some(index),
                                row,
                                on_toggle,
                                on_edit,
                                on_delete,
                            }
                        }
                    }
                }

                form {
                    class: "users-form",
                    onsubmit: on_submit,

                    h2 {
                        if editing.is_some() {
                            "Edit user"
                        } else {
                            Icon { icon: FaUserPlus, width: 14, height: 14 }
                            " New user"
                        }
                    }

                    label { r#for: "user-name", "Name" }
                    input {
                        id: "user-name",
                        r#type: "text",
                        required: true,
                        value: "{form.draft.name}",
                        oninput: move |evt: FormEvent| users.write().form_mut().draft.name = evt.value(),
                    }

                    label { r#for: "user-mail", "Mail" }
                    input {
                        id: "user-mail",
                        r#type: "email",
                        required: true,
                        value: "{form.draft.mail}",
                        oninput: move |evt: FormEvent| users.write().form_mut().draft.mail = evt.value(),
                    }

                    label { r#for: "user-password", "Password" }
                    input {
                        id: "user-password",
                        r#type: "password",
                        required: true,
                        value: "{form.draft.password}",
                        oninput: move |evt: FormEvent| users.write().form_mut().draft.password = evt.value(),
                    }

                    label { r#for: "user-confirm", "Confirm password" }
                    input {
                        id: "user-confirm",
                        r#type: "password",
                        required: true,
                        class: if mismatch { "invalid" } else { "" },
                        value: "{form.confirm_password}",
                        oninput: move |evt: FormEvent| users.write().form_mut().confirm_password = evt.value(),
                    }
                    if mismatch {
                        p { class: "form-error", "Passwords do not match." }
                    }

                    label { r#for: "user-comment", "Biography" }
                    textarea {
                        id: "user-comment",
                        rows: 4,
                        value: "{form.draft.comment}",
                        oninput: move |evt: FormEvent| users.write().form_mut().draft.comment = evt.value(),
                    }

                    div {
                        class: "form-actions",
                        button {
                            r#type: "submit",
                            class: "primary",
                            disabled: submitting,
                            if editing.is_some() { "Save changes" } else { "Create" }
                        }
                        if editing.is_some() {
                            button {
                                r#type: "button",
                                onclick: move |_| users.write().cancel_edit(),
                                "Cancel"
                            }
                        } else {
                            button {
                                r#type: "button",
                                onclick: move |_| users.write().form_mut().reset(),
                                "Clear"
                            }
                        }
                    }
                }
            }

            ActivityLogPanel {}
        }
    }
}

#[component]
fn UserRow(
    index: usize,
    row: Row,
    editing: bool,
    on_toggle: EventHandler<(Toggle, usize)>,
    on_edit: EventHandler<usize>,
    on_delete: EventHandler<usize>,
) -> Element {
    let flags = row.flags;
    let user = &row.user;
    let password = if flags.password {
        user.password.clone()
    } else {
        masked(&user.password)
    };
    let (preview, truncated) = truncate(&user.comment, BIOGRAPHY_PREVIEW);
    let biography = if flags.biography { user.comment.clone() } else { preview };

    rsx! {
        li {
            class: if editing { "user-row editing" } else { "user-row" },

            div {
                class: "user-row-header",
                button {
                    class: "user-row-toggle",
                    onclick: move |_| on_toggle.call((Toggle::Details, index)),
                    if flags.expanded {
                        Icon { icon: FaChevronDown, width: 12, height: 12 }
                    } else {
                        Icon { icon: FaChevronRight, width: 12, height: 12 }
                    }
                    span { class: "user-name", "{user.name}" }
                }
                button {
                    class: "icon-button",
                    title: "Edit",
                    onclick: move |_| on_edit.call(index),
                    Icon { icon: FaPen, width: 12, height: 12 }
                }
                button {
                    class: "icon-button danger",
                    title: "Delete",
                    onclick: move |_| on_delete.call(index),
                    Icon { icon: FaTrashCan, width: 12, height: 12 }
                }
            }

            if flags.expanded {
                dl {
                    class: "user-details",

                    dt { "Mail" }
                    dd { "{user.mail}" }

                    dt { "Password" }
                    dd {
                        span { class: "password", "{password}" }
                        button {
                            class: "icon-button",
                            title: if flags.password { "Hide password" } else { "Show password" },
                            onclick: move |_| on_toggle.call((Toggle::Password, index)),
                            if flags.password {
                                Icon { icon: FaEyeSlash, width: 12, height: 12 }
                            } else {
                                Icon { icon: FaEye, width: 12, height: 12 }
                            }
                        }
                    }

                    dt { "Biography" }
                    dd {
                        "{biography}"
                        if truncated {
                            button {
                                class: "link-button",
                                onclick: move |_| on_toggle.call((Toggle::Biography, index)),
                                if flags.biography { "less" } else { "more" }
                            }
                        }
                    }

                    dt { "Experiences" }
                    dd {
                        if user.experiences.is_empty() {
                            "None"
                        }
                        ul {
                            class: "experiences",
                            for (slot, experience) in user.experiences.iter().enumerate() {
                                li {
                                    key: "{slot}",
                                    class: experience_class(experience),
                                    {experience_label(experience)}
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn masked(password: &str) -> String {
    "•".repeat(password.chars().count())
}

/// First `max` characters of `text`, and whether anything was cut.
fn truncate(text: &str, max: usize) -> (String, bool) {
    match text.char_indices().nth(max) {
        Some((cut, _)) => (format!("{}…", &text[..cut]), true),
        None => (text.to_string(), false),
    }
}

fn experience_label(slot: &ExperienceRef) -> String {
    match slot {
        ExperienceRef::Resolved(experience) => ["title", "name", "description"]
            .iter()
            .find_map(|key| experience.fields.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)
            .or_else(|| experience.id.clone())
            .unwrap_or_else(|| "(untitled)".to_string()),
        ExperienceRef::Unresolved(id) => format!("Loading {id}…"),
        ExperienceRef::Failed { id, .. } => format!("{id} (unavailable)"),
    }
}

fn experience_class(slot: &ExperienceRef) -> &'static str {
    match slot {
        ExperienceRef::Resolved(_) => "experience",
        ExperienceRef::Unresolved(_) => "experience pending",
        ExperienceRef::Failed { .. } => "experience failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::Experience;

    #[test]
    fn test_masked_counts_chars() {
        assert_eq!(masked("abc"), "•••");
        assert_eq!(masked("ñé"), "••");
        assert_eq!(masked(""), "");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), ("short".to_string(), false));
        assert_eq!(truncate("exactly", 7), ("exactly".to_string(), false));
        assert_eq!(truncate("àbcdef", 3), ("àbc…".to_string(), true));
    }

    #[test]
    fn test_experience_labels() {
        let titled = ExperienceRef::Resolved(Experience::new("e1").with_field("title", "Hike"));
        assert_eq!(experience_label(&titled), "Hike");

        let bare = ExperienceRef::Resolved(Experience::new("e2"));
        assert_eq!(experience_label(&bare), "e2");

        assert_eq!(
            experience_label(&ExperienceRef::Unresolved("e3".to_string())),
            "Loading e3…"
        );
        let failed = ExperienceRef::Failed {
            id: "e4".to_string(),
            reason: "not found".to_string(),
        };
        assert_eq!(experience_label(&failed), "e4 (unavailable)");
        assert_eq!(experience_class(&failed), "experience failed");
    }
}
