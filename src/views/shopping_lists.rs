use crate::controllers::form::{LineEdit, format_quantity};
use crate::controllers::shopping_lists::{as_plain_text, preview_items};
use crate::events::{Action, ExportFormat};
use crate::notify::ModalId;
use crate::types::ShoppingList;
use crate::ui::use_ui;
use crate::views::shared::{LineItemsEditor, Modal, copy_to_clipboard};
use dioxus::prelude::*;

#[component]
pub fn ShoppingListsView() -> Element {
    let ui = use_ui();
    let lists = ui.shell.shopping_lists.lists();

    rsx! {
        div { class: "page-header",
            h1 { "Shopping Lists" }
            button { class: "btn btn-primary", onclick: ui.on(Action::NewShoppingList),
                i { class: "fas fa-plus" }
                " New List"
            }
        }
        if lists.is_empty() {
            div { class: "empty-state",
                i { class: "fas fa-shopping-cart" }
                h3 { "No shopping lists yet" }
                p { "Create one here or generate one from your meal plan." }
            }
        } else {
            div { class: "shopping-lists-grid",
                for list in lists {
                    ShoppingListCard { key: "{list.id}", list }
                }
            }
        }
        ShoppingListEditor {}
        ShoppingListDetails {}
        ExportOptions {}
    }
}

#[component]
fn ShoppingListCard(list: ShoppingList) -> Element {
    let ui = use_ui();
    let preview = preview_items(&list);
    let created = list.created_on().unwrap_or("").to_string();

    rsx! {
        div { class: "shopping-list-card",
            div { class: "card-body", onclick: ui.on(Action::ViewShoppingList(list.id)),
                h3 { "{list.name}" }
                if !created.is_empty() {
                    span { class: "list-date", "Created {created}" }
                }
                ul { class: "list-preview",
                    for (index, item) in preview.items.iter().enumerate() {
                        li { key: "{index}",
                            "{format_quantity(item.quantity)} {item.unit} {item.name}"
                        }
                    }
                }
                if let Some(more) = preview.more_label() {
                    span { class: "more-items", "{more}" }
                }
            }
            div { class: "card-actions",
                button { class: "btn btn-icon", title: "Edit", onclick: ui.on(Action::EditShoppingList(list.id)),
                    i { class: "fas fa-edit" }
                }
                button { class: "btn btn-icon", title: "Export", onclick: ui.on(Action::ShowExportOptions(list.id)),
                    i { class: "fas fa-download" }
                }
                button { class: "btn btn-icon btn-danger", title: "Delete", onclick: ui.on(Action::DeleteShoppingList(list.id)),
                    i { class: "fas fa-trash" }
                }
            }
        }
    }
}

#[component]
fn ShoppingListEditor() -> Element {
    let ui = use_ui();
    let draft = ui.shell.shopping_lists.draft();
    let title = if ui.shell.shopping_lists.editing().is_some() {
        "Edit Shopping List"
    } else {
        "New Shopping List"
    };
    let on_name = {
        let ui = ui.clone();
        move |ev: FormEvent| {
            let name = ev.value();
            ui.shell.shopping_lists.update_draft(|draft| draft.name = name);
            ui.sync();
        }
    };
    let on_item = {
        let ui = ui.clone();
        move |edit: LineEdit| {
            ui.shell
                .shopping_lists
                .update_draft(|draft| edit.apply(&mut draft.items));
            ui.sync();
        }
    };

    rsx! {
        Modal { id: ModalId::ShoppingListEditor, title: title.to_string(),
            form {
                onsubmit: {
                    let ui = ui.clone();
                    move |ev: FormEvent| {
                        ev.prevent_default();
                        ui.run(Action::SaveShoppingList);
                    }
                },
                div { class: "form-group",
                    label { "Name *" }
                    input { r#type: "text", required: true, value: "{draft.name}", oninput: on_name }
                }
                div { class: "form-group",
                    label { "Items" }
                    LineItemsEditor {
                        fields: draft.items.clone(),
                        name_placeholder: "Item".to_string(),
                        on_edit: on_item,
                    }
                }
                div { class: "modal-actions",
                    button {
                        r#type: "button",
                        class: "btn btn-secondary",
                        onclick: ui.on(Action::CloseModal(ModalId::ShoppingListEditor)),
                        "Cancel"
                    }
                    button { r#type: "submit", class: "btn btn-primary", "Save List" }
                }
            }
        }
    }
}

#[component]
fn ShoppingListDetails() -> Element {
    let ui = use_ui();
    let Some(list) = ui.shell.shopping_lists.details() else {
        return rsx! {};
    };
    let clipboard_text = as_plain_text(&list);

    rsx! {
        Modal { id: ModalId::ShoppingListDetails, title: list.name.clone(),
            if list.items.is_empty() {
                p { class: "empty-state", "This list has no items." }
            } else {
                ul { class: "checklist",
                    for (index, item) in list.items.iter().enumerate() {
                        ChecklistItem {
                            key: "{index}",
                            index,
                            label: format!("{} {} {}", format_quantity(item.quantity), item.unit, item.name),
                        }
                    }
                }
            }
            div { class: "modal-actions",
                button {
                    class: "btn btn-secondary",
                    onclick: move |_| copy_to_clipboard(clipboard_text.clone()),
                    i { class: "fas fa-copy" }
                    " Copy"
                }
                button { class: "btn btn-secondary", onclick: ui.on(Action::ShowExportOptions(list.id)),
                    i { class: "fas fa-download" }
                    " Export"
                }
                button { class: "btn btn-primary", onclick: ui.on(Action::EditShoppingList(list.id)),
                    i { class: "fas fa-edit" }
                    " Edit"
                }
            }
        }
    }
}

#[component]
fn ChecklistItem(index: usize, label: String) -> Element {
    let ui = use_ui();
    let checked = ui.shell.shopping_lists.is_checked(index);
    let on_toggle = {
        let ui = ui.clone();
        move |_| {
            ui.shell.shopping_lists.toggle_item(index);
            ui.sync();
        }
    };

    rsx! {
        li { class: if checked { "checklist-item checked" } else { "checklist-item" },
            label {
                input { r#type: "checkbox", checked, onchange: on_toggle }
                span { "{label}" }
            }
        }
    }
}

#[component]
fn ExportOptions() -> Element {
    let ui = use_ui();
    let Some(id) = ui.shell.shopping_lists.export_target() else {
        return rsx! {};
    };

    rsx! {
        Modal { id: ModalId::ExportOptions, title: "Export Shopping List".to_string(),
            div { class: "export-options",
                for format in ExportFormat::ALL {
                    div {
                        key: "{format.extension()}",
                        class: "export-option",
                        onclick: ui.on(Action::Export(id, format)),
                        i { class: format_args!("fas fa-file-{}", if format == ExportFormat::Pdf { "pdf" } else { "excel" }) }
                        div {
                            h4 { "{format.title()}" }
                            p { "{format.blurb()}" }
                        }
                    }
                }
            }
        }
    }
}
