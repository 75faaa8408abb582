use crate::calendar;
use crate::controllers::form::format_quantity;
use crate::controllers::meal_planning::Slot;
use crate::events::Action;
use crate::notify::ModalId;
use crate::ui::use_ui;
use crate::views::shared::{CountStepper, Modal};
use dioxus::prelude::*;

#[component]
pub fn MealPlanningView() -> Element {
    let ui = use_ui();
    let planner = &ui.shell.meal_planning;
    let week = planner.week();
    let grid = planner.grid();
    let preselected = planner
        .preselected()
        .and_then(|id| planner.recipe(id))
        .map(|recipe| recipe.name);
    let today = calendar::today();

    rsx! {
        div { class: "page-header",
            h1 { "Meal Planning" }
            button { class: "btn btn-primary", onclick: ui.on(Action::GenerateShoppingList),
                i { class: "fas fa-shopping-cart" }
                " Generate Shopping List"
            }
        }
        div { class: "week-nav",
            button { class: "btn btn-icon", title: "Previous week", onclick: ui.on(Action::PreviousWeek),
                i { class: "fas fa-chevron-left" }
            }
            span { class: "week-label", "{week.label()}" }
            button { class: "btn btn-icon", title: "Next week", onclick: ui.on(Action::NextWeek),
                i { class: "fas fa-chevron-right" }
            }
        }
        if let Some(name) = preselected {
            div { class: "preselected-banner",
                i { class: "fas fa-info-circle" }
                " Adding \"{name}\": click an empty slot."
            }
        }
        div { class: "meal-grid",
            for column in grid {
                div {
                    key: "{column.date}",
                    class: if column.date == today { "day-column today" } else { "day-column" },
                    div { class: "day-header",
                        span { class: "day-name", "{column.date.weekday()}" }
                        span { class: "day-date", "{calendar::short_label(column.date)}" }
                    }
                    for slot in column.slots {
                        MealSlot { key: "{slot.category.id}", slot }
                    }
                }
            }
        }
        RecipeSelection {}
        MealEditor {}
    }
}

#[component]
fn MealSlot(slot: Slot) -> Element {
    let ui = use_ui();
    match slot.meal {
        Some(meal) => rsx! {
            div { class: "meal-slot filled", onclick: ui.on(Action::EditMeal(meal.id)),
                span { class: "slot-category", "{slot.category.name}" }
                span { class: "slot-recipe", "{meal.recipe_label()}" }
                span { class: "slot-people",
                    i { class: "fas fa-users" }
                    " {meal.people_count}"
                }
            }
        },
        None => rsx! {
            div {
                class: "meal-slot empty",
                onclick: ui.on(Action::OpenSlot {
                    date: slot.date,
                    category_id: slot.category.id,
                }),
                span { class: "slot-category", "{slot.category.name}" }
                i { class: "fas fa-plus" }
            }
        },
    }
}

#[component]
fn RecipeSelection() -> Element {
    let ui = use_ui();
    let planner = &ui.shell.meal_planning;
    let Some(selection) = planner.selection() else {
        return rsx! {};
    };
    let recipes = planner.selectable_recipes();
    let category = planner
        .categories()
        .into_iter()
        .find(|c| c.id == selection.category_id)
        .map(|c| c.name)
        .unwrap_or_default();
    let on_filter = {
        let ui = ui.clone();
        move |ev: FormEvent| {
            ui.shell.meal_planning.set_selection_filter(ev.value());
            ui.sync();
        }
    };
    let on_people = {
        let ui = ui.clone();
        move |people: u32| {
            ui.shell.meal_planning.set_selection_people(people);
            ui.sync();
        }
    };

    rsx! {
        Modal { id: ModalId::RecipeSelection, title: "Select Recipe".to_string(),
            p { class: "selection-slot", "{category} on {calendar::long_label(selection.date)}" }
            div { class: "form-row",
                input {
                    r#type: "text",
                    class: "search-input",
                    placeholder: "Filter recipes...",
                    value: "{selection.filter}",
                    oninput: on_filter,
                }
                div { class: "form-group",
                    label { "People" }
                    CountStepper { count: selection.people, on_change: on_people }
                }
            }
            if recipes.is_empty() {
                p { class: "empty-state", "No recipes match." }
            } else {
                div { class: "recipe-selection-list",
                    for recipe in recipes {
                        div {
                            key: "{recipe.id}",
                            class: "selectable-recipe",
                            onclick: ui.on(Action::ChooseRecipe(recipe.id)),
                            h4 { "{recipe.name}" }
                            if let Some(description) = recipe.description.as_deref().filter(|d| !d.is_empty()) {
                                p { "{description}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn MealEditor() -> Element {
    let ui = use_ui();
    let Some(edit) = ui.shell.meal_planning.editing() else {
        return rsx! {};
    };
    let meal = edit.meal.clone();
    let on_people = {
        let ui = ui.clone();
        move |people: u32| ui.run(Action::SetMealPeople(people))
    };

    rsx! {
        Modal { id: ModalId::MealEditor, title: "Edit Meal".to_string(),
            div { class: "meal-details",
                h4 { "{meal.recipe_label()}" }
                p { class: "text-muted",
                    "{meal.category_label()} on {calendar::long_label(meal.date)}"
                }
                div { class: "form-group",
                    label { "People" }
                    CountStepper { count: edit.people, on_change: on_people }
                }
                if let Some(preview) = edit.preview.as_ref() {
                    div { class: "portion-preview",
                        h5 { "Ingredients for {preview.adjusted_servings} people" }
                        ul {
                            for (index, ingredient) in preview.adjusted_ingredients.iter().enumerate() {
                                li { key: "{index}",
                                    "{format_quantity(ingredient.adjusted_quantity)} {ingredient.unit} {ingredient.name}"
                                }
                            }
                        }
                    }
                }
            }
            div { class: "modal-actions",
                button { class: "btn btn-danger", onclick: ui.on(Action::DeleteMeal(meal.id)),
                    i { class: "fas fa-trash" }
                    " Delete"
                }
                button { class: "btn btn-secondary", onclick: ui.on(Action::CloseModal(ModalId::MealEditor)), "Cancel" }
                button { class: "btn btn-primary", onclick: ui.on(Action::SaveMeal), "Update Meal" }
            }
        }
    }
}
