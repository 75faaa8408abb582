use crate::controllers::categories::icon_for;
use crate::events::Action;
use crate::notify::ModalId;
use crate::types::{Category, CategoryKind};
use crate::ui::use_ui;
use crate::views::shared::Modal;
use dioxus::prelude::*;

fn tab_title(kind: CategoryKind) -> &'static str {
    match kind {
        CategoryKind::Recipe => "Recipe Categories",
        CategoryKind::Meal => "Meal Categories",
    }
}

#[component]
pub fn CategoriesView() -> Element {
    let ui = use_ui();
    let categories = &ui.shell.categories;
    let current = categories.current_kind();
    let shown = categories.displayed();

    rsx! {
        div { class: "page-header",
            h1 { "Categories" }
            button { class: "btn btn-primary", onclick: ui.on(Action::NewCategory),
                i { class: "fas fa-plus" }
                " Add Category"
            }
        }
        div { class: "category-tabs",
            for kind in CategoryKind::ALL {
                button {
                    key: "{kind}",
                    class: if kind == current { "tab-btn active" } else { "tab-btn" },
                    onclick: ui.on(Action::SelectCategoryKind(kind)),
                    "{tab_title(kind)}"
                }
            }
        }
        if shown.is_empty() {
            div { class: "empty-state",
                i { class: "fas fa-tags" }
                h3 { "No categories yet" }
            }
        } else {
            div { class: "categories-grid",
                for category in shown {
                    CategoryCard { key: "{category.id}", category }
                }
            }
        }
        CategoryEditor {}
    }
}

#[component]
fn CategoryCard(category: Category) -> Element {
    let ui = use_ui();
    let count = ui
        .shell
        .categories
        .count_text(category.id)
        .unwrap_or_else(|| "Loading...".to_string());

    rsx! {
        div { class: "category-card",
            div { class: "category-icon",
                i { class: format_args!("fas fa-{}", icon_for(&category.name)) }
            }
            div { class: "category-info",
                h3 { "{category.name}" }
                span { class: "category-count", "{count}" }
            }
            div { class: "category-actions",
                button { class: "btn btn-icon", title: "Edit", onclick: ui.on(Action::EditCategory(category.id)),
                    i { class: "fas fa-edit" }
                }
                button { class: "btn btn-icon btn-danger", title: "Delete", onclick: ui.on(Action::DeleteCategory(category.id)),
                    i { class: "fas fa-trash" }
                }
            }
        }
    }
}

#[component]
fn CategoryEditor() -> Element {
    let ui = use_ui();
    let draft = ui.shell.categories.draft();
    let title = if ui.shell.categories.editing().is_some() {
        "Edit Category"
    } else {
        "Add Category"
    };
    let selected = draft.kind.map(|kind| kind.as_str()).unwrap_or("");
    let on_name = {
        let ui = ui.clone();
        move |ev: FormEvent| {
            let name = ev.value();
            ui.shell.categories.update_draft(|draft| draft.name = name);
            ui.sync();
        }
    };
    let on_kind = {
        let ui = ui.clone();
        move |ev: FormEvent| {
            let kind = CategoryKind::parse(&ev.value());
            ui.shell.categories.update_draft(|draft| draft.kind = kind);
            ui.sync();
        }
    };

    rsx! {
        Modal { id: ModalId::CategoryEditor, title: title.to_string(),
            form {
                onsubmit: {
                    let ui = ui.clone();
                    move |ev: FormEvent| {
                        ev.prevent_default();
                        ui.run(Action::SaveCategory);
                    }
                },
                div { class: "form-group",
                    label { "Name *" }
                    input { r#type: "text", required: true, value: "{draft.name}", oninput: on_name }
                }
                div { class: "form-group",
                    label { "Type *" }
                    select { value: "{selected}", onchange: on_kind,
                        option { value: "", "Select type" }
                        option { value: "recipe", selected: selected == "recipe", "Recipe" }
                        option { value: "meal", selected: selected == "meal", "Meal" }
                    }
                }
                div { class: "modal-actions",
                    button {
                        r#type: "button",
                        class: "btn btn-secondary",
                        onclick: ui.on(Action::CloseModal(ModalId::CategoryEditor)),
                        "Cancel"
                    }
                    button { r#type: "submit", class: "btn btn-primary", "Save Category" }
                }
            }
        }
    }
}
