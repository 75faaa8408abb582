use crate::controllers::form::{LineEdit, LineField, LineItemFields};
use crate::events::Action;
use crate::notify::ModalId;
use crate::ui::use_ui;
use dioxus::prelude::*;

/// Put `text` on the system clipboard. Does nothing in the browser build.
pub fn copy_to_clipboard(text: String) {
    spawn(async move {
        #[cfg(any(feature = "desktop", feature = "mobile"))]
        {
            match arboard::Clipboard::new() {
                Ok(mut cb) => {
                    if let Err(err) = cb.set_text(text) {
                        tracing::warn!(error = %err, "clipboard write failed");
                    }
                }
                Err(err) => tracing::warn!(error = %err, "clipboard unavailable"),
            }
        }
        #[cfg(not(any(feature = "desktop", feature = "mobile")))]
        {
            let _ = text;
        }
    });
}

#[component]
pub fn Toasts() -> Element {
    let ui = use_ui();
    let toasts = ui.shell.notify().toasts();

    rsx! {
        div { class: "toast-container",
            for toast in toasts {
                div {
                    key: "{toast.id}",
                    class: format_args!("toast {} show", toast.severity.class()),
                    span { class: "toast-icon", "{toast.severity.icon()}" }
                    span { class: "toast-message", "{toast.message}" }
                    button {
                        class: "toast-close",
                        onclick: ui.on(Action::DismissToast(toast.id)),
                        dangerous_inner_html: "&times;"
                    }
                }
            }
        }
    }
}

#[component]
pub fn LoadingSpinner() -> Element {
    let ui = use_ui();
    if !ui.shell.notify().is_loading() {
        return rsx! {};
    }
    rsx! {
        div { class: "loading-spinner show",
            div { class: "spinner" }
        }
    }
}

/// Overlay with a title bar and close button. Clicking the backdrop closes it.
#[component]
pub fn Modal(id: ModalId, title: String, children: Element) -> Element {
    let ui = use_ui();
    if !ui.shell.notify().is_open(id) {
        return rsx! {};
    }

    rsx! {
        div { class: "modal show", onclick: ui.on(Action::CloseModal(id)),
            div {
                class: "modal-content",
                onclick: move |ev: Event<MouseData>| ev.stop_propagation(),
                div { class: "modal-header",
                    h3 { "{title}" }
                    button {
                        class: "modal-close",
                        onclick: ui.on(Action::CloseModal(id)),
                        dangerous_inner_html: "&times;"
                    }
                }
                div { class: "modal-body", {children} }
            }
        }
    }
}

#[component]
pub fn ConfirmDialog() -> Element {
    let ui = use_ui();
    let Some(confirmation) = ui.shell.notify().confirmation() else {
        return rsx! {};
    };

    rsx! {
        Modal { id: ModalId::Confirm, title: "Confirm".to_string(),
            div { class: "confirm-message",
                for line in confirmation.message.split('\n') {
                    p { "{line}" }
                }
            }
            div { class: "modal-actions",
                button { class: "btn btn-secondary", onclick: ui.on(Action::CancelPending), "Cancel" }
                button { class: "btn btn-danger", onclick: ui.on(Action::ConfirmPending), "Delete" }
            }
        }
    }
}

#[component]
pub fn SearchOverlay() -> Element {
    let ui = use_ui();
    let mut query = use_signal(String::new);
    let results = ui.shell.search_results();
    let on_input = {
        let ui = ui.clone();
        move |ev: FormEvent| {
            let value = ev.value();
            query.set(value.clone());
            ui.run(Action::Search(value));
        }
    };

    rsx! {
        Modal { id: ModalId::Search, title: "Search".to_string(),
            div { class: "search-box",
                i { class: "fas fa-search" }
                input {
                    r#type: "text",
                    placeholder: "Search recipes, meal plans, shopping lists...",
                    value: "{query}",
                    autofocus: true,
                    oninput: on_input,
                }
            }
            div { class: "search-results",
                if results.is_empty() && !query().trim().is_empty() {
                    p { class: "empty-state", "No results found" }
                }
                for (index, result) in results.into_iter().enumerate() {
                    div {
                        key: "{index}",
                        class: "search-result",
                        onclick: ui.on(result.action.clone()),
                        i { class: format_args!("fas fa-{}", result.kind.icon()) }
                        div { class: "search-result-text",
                            h4 { "{result.title}" }
                            p { "{result.description}" }
                        }
                    }
                }
            }
        }
    }
}

/// Name / quantity / unit rows with add and remove buttons.
#[component]
pub fn LineItemsEditor(
    fields: LineItemFields,
    name_placeholder: String,
    on_edit: EventHandler<LineEdit>,
) -> Element {
    let rows = fields.len();
    rsx! {
        div { class: "line-items",
            for row in 0..rows {
                div { key: "{row}", class: "line-item-row",
                    input {
                        r#type: "text",
                        class: "line-name",
                        placeholder: "{name_placeholder}",
                        value: "{fields.get(row, LineField::Name)}",
                        oninput: move |ev: FormEvent| on_edit.call(LineEdit::Set {
                            row,
                            field: LineField::Name,
                            value: ev.value(),
                        }),
                    }
                    input {
                        r#type: "number",
                        class: "line-quantity",
                        step: "any",
                        placeholder: "Qty",
                        value: "{fields.get(row, LineField::Quantity)}",
                        oninput: move |ev: FormEvent| on_edit.call(LineEdit::Set {
                            row,
                            field: LineField::Quantity,
                            value: ev.value(),
                        }),
                    }
                    input {
                        r#type: "text",
                        class: "line-unit",
                        placeholder: "Unit",
                        value: "{fields.get(row, LineField::Unit)}",
                        oninput: move |ev: FormEvent| on_edit.call(LineEdit::Set {
                            row,
                            field: LineField::Unit,
                            value: ev.value(),
                        }),
                    }
                    button {
                        r#type: "button",
                        class: "btn btn-icon remove-row",
                        title: "Remove",
                        onclick: move |_| on_edit.call(LineEdit::RemoveRow(row)),
                        i { class: "fas fa-times" }
                    }
                }
            }
            button {
                r#type: "button",
                class: "btn btn-secondary add-row",
                onclick: move |_| on_edit.call(LineEdit::AddRow),
                i { class: "fas fa-plus" }
                " Add"
            }
        }
    }
}

/// `-` / `+` stepper around a count.
#[component]
pub fn CountStepper(count: u32, on_change: EventHandler<u32>) -> Element {
    rsx! {
        div { class: "people-counter",
            button {
                r#type: "button",
                class: "counter-btn",
                onclick: move |_| on_change.call(count.saturating_sub(1)),
                "-"
            }
            span { class: "people-count", "{count}" }
            button {
                r#type: "button",
                class: "counter-btn",
                onclick: move |_| on_change.call(count + 1),
                "+"
            }
        }
    }
}
