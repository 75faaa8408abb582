use crate::calendar::format_minutes;
use crate::controllers::form::{LineEdit, format_quantity};
use crate::controllers::recipes::RecipeDraft;
use crate::events::Action;
use crate::notify::ModalId;
use crate::types::{Category, Recipe};
use crate::ui::{UiHandle, use_ui};
use crate::views::shared::{LineItemsEditor, Modal};
use dioxus::prelude::*;

fn draft_input(ui: &UiHandle, set: fn(&mut RecipeDraft, String)) -> impl FnMut(FormEvent) + 'static {
    let ui = ui.clone();
    move |ev: FormEvent| {
        let value = ev.value();
        ui.shell.recipes.update_draft(|draft| set(draft, value));
        ui.sync();
    }
}

#[component]
pub fn RecipesView() -> Element {
    let ui = use_ui();
    let recipes = &ui.shell.recipes;
    let categories = recipes.categories();
    let filter = recipes.category_filter();
    let search = recipes.search();
    let shown = recipes.filtered();
    let on_search = {
        let ui = ui.clone();
        move |ev: FormEvent| ui.run(Action::SearchRecipes(ev.value()))
    };

    rsx! {
        div { class: "page-header",
            h1 { "Recipes" }
            button { class: "btn btn-primary", onclick: ui.on(Action::NewRecipe),
                i { class: "fas fa-plus" }
                " Add Recipe"
            }
        }
        div { class: "filter-bar",
            input {
                r#type: "text",
                class: "search-input",
                placeholder: "Search recipes...",
                value: "{search}",
                oninput: on_search,
            }
            div { class: "category-filters",
                button {
                    class: if filter.is_none() { "filter-btn active" } else { "filter-btn" },
                    onclick: ui.on(Action::FilterRecipes(None)),
                    "All"
                }
                for category in categories.iter() {
                    button {
                        key: "{category.id}",
                        class: if filter == Some(category.id) { "filter-btn active" } else { "filter-btn" },
                        onclick: ui.on(Action::FilterRecipes(Some(category.id))),
                        "{category.name}"
                    }
                }
            }
        }
        if shown.is_empty() {
            div { class: "empty-state",
                i { class: "fas fa-book-open" }
                h3 { "No recipes found" }
                p { "Try a different search or add a new recipe." }
            }
        } else {
            div { class: "recipes-grid",
                for recipe in shown {
                    RecipeCard { key: "{recipe.id}", recipe }
                }
            }
        }
        RecipeEditor { categories }
        RecipeDetails {}
    }
}

#[component]
fn RecipeCard(recipe: Recipe) -> Element {
    let ui = use_ui();
    let total = recipe.prep_time.unwrap_or(0) + recipe.cook_time.unwrap_or(0);
    let time_label = format_minutes(total);

    rsx! {
        div { class: "recipe-card",
            div { class: "recipe-card-body", onclick: ui.on(Action::ViewRecipe(recipe.id)),
                h3 { "{recipe.name}" }
                if let Some(category) = recipe.category_name.as_deref() {
                    span { class: "recipe-category", "{category}" }
                }
                if let Some(description) = recipe.description.as_deref().filter(|d| !d.is_empty()) {
                    p { class: "recipe-description", "{description}" }
                }
                div { class: "recipe-meta",
                    if !time_label.is_empty() {
                        span { i { class: "fas fa-clock" } " {time_label}" }
                    }
                    if let Some(servings) = recipe.servings {
                        span { i { class: "fas fa-users" } " {servings} servings" }
                    }
                    span { i { class: "fas fa-list" } " {recipe.ingredients.len()} ingredients" }
                }
            }
            div { class: "recipe-card-actions",
                button { class: "btn btn-icon", title: "Edit", onclick: ui.on(Action::EditRecipe(recipe.id)),
                    i { class: "fas fa-edit" }
                }
                button { class: "btn btn-icon btn-danger", title: "Delete", onclick: ui.on(Action::DeleteRecipe(recipe.id)),
                    i { class: "fas fa-trash" }
                }
            }
        }
    }
}

#[component]
fn RecipeEditor(categories: Vec<Category>) -> Element {
    let ui = use_ui();
    let draft = ui.shell.recipes.draft();
    let title = if ui.shell.recipes.editing().is_some() {
        "Edit Recipe"
    } else {
        "Add Recipe"
    };
    let selected = draft.category_id.map(|id| id.to_string()).unwrap_or_default();
    let on_category = {
        let ui = ui.clone();
        move |ev: FormEvent| {
            let category = ev.value().parse().ok();
            ui.shell.recipes.update_draft(|draft| draft.category_id = category);
            ui.sync();
        }
    };
    let on_ingredient = {
        let ui = ui.clone();
        move |edit: LineEdit| {
            ui.shell
                .recipes
                .update_draft(|draft| edit.apply(&mut draft.ingredients));
            ui.sync();
        }
    };

    rsx! {
        Modal { id: ModalId::RecipeEditor, title: title.to_string(),
            form {
                class: "recipe-form",
                onsubmit: {
                    let ui = ui.clone();
                    move |ev: FormEvent| {
                        ev.prevent_default();
                        ui.run(Action::SaveRecipe);
                    }
                },
                div { class: "form-group",
                    label { "Name *" }
                    input {
                        r#type: "text",
                        required: true,
                        value: "{draft.name}",
                        oninput: draft_input(&ui, |d, v| d.name = v),
                    }
                }
                div { class: "form-group",
                    label { "Description" }
                    textarea {
                        rows: "2",
                        value: "{draft.description}",
                        oninput: draft_input(&ui, |d, v| d.description = v),
                    }
                }
                div { class: "form-row",
                    div { class: "form-group",
                        label { "Prep time (min)" }
                        input {
                            r#type: "number",
                            min: "0",
                            value: "{draft.prep_time}",
                            oninput: draft_input(&ui, |d, v| d.prep_time = v),
                        }
                    }
                    div { class: "form-group",
                        label { "Cook time (min)" }
                        input {
                            r#type: "number",
                            min: "0",
                            value: "{draft.cook_time}",
                            oninput: draft_input(&ui, |d, v| d.cook_time = v),
                        }
                    }
                    div { class: "form-group",
                        label { "Servings" }
                        input {
                            r#type: "number",
                            min: "1",
                            value: "{draft.servings}",
                            oninput: draft_input(&ui, |d, v| d.servings = v),
                        }
                    }
                }
                div { class: "form-group",
                    label { "Category" }
                    select { value: "{selected}", onchange: on_category,
                        option { value: "", "Select category" }
                        for category in categories.iter() {
                            option {
                                key: "{category.id}",
                                value: "{category.id}",
                                selected: draft.category_id == Some(category.id),
                                "{category.name}"
                            }
                        }
                    }
                }
                div { class: "form-group",
                    label { "Ingredients" }
                    LineItemsEditor {
                        fields: draft.ingredients.clone(),
                        name_placeholder: "Ingredient".to_string(),
                        on_edit: on_ingredient,
                    }
                }
                div { class: "form-group",
                    label { "Instructions" }
                    textarea {
                        rows: "6",
                        value: "{draft.instructions}",
                        oninput: draft_input(&ui, |d, v| d.instructions = v),
                    }
                }
                div { class: "modal-actions",
                    button {
                        r#type: "button",
                        class: "btn btn-secondary",
                        onclick: ui.on(Action::CloseModal(ModalId::RecipeEditor)),
                        "Cancel"
                    }
                    button { r#type: "submit", class: "btn btn-primary", "Save Recipe" }
                }
            }
        }
    }
}

#[component]
fn RecipeDetails() -> Element {
    let ui = use_ui();
    let Some(recipe) = ui.shell.recipes.details() else {
        return rsx! {};
    };
    let prep = format_minutes(recipe.prep_time.unwrap_or(0));
    let cook = format_minutes(recipe.cook_time.unwrap_or(0));
    let instructions = recipe.instructions.clone().unwrap_or_default();

    rsx! {
        Modal { id: ModalId::RecipeDetails, title: recipe.name.clone(),
            div { class: "recipe-details",
                if let Some(description) = recipe.description.as_deref().filter(|d| !d.is_empty()) {
                    p { class: "recipe-description", "{description}" }
                }
                div { class: "recipe-meta",
                    if !prep.is_empty() {
                        span { "Prep: {prep}" }
                    }
                    if !cook.is_empty() {
                        span { "Cook: {cook}" }
                    }
                    if let Some(servings) = recipe.servings {
                        span { "Serves {servings}" }
                    }
                    if let Some(category) = recipe.category_name.as_deref() {
                        span { class: "recipe-category", "{category}" }
                    }
                }
                h4 { "Ingredients" }
                if recipe.ingredients.is_empty() {
                    p { class: "text-muted", "No ingredients listed." }
                } else {
                    ul { class: "ingredient-list",
                        for (index, ingredient) in recipe.ingredients.iter().enumerate() {
                            li { key: "{index}",
                                "{format_quantity(ingredient.quantity)} {ingredient.unit} {ingredient.name}"
                                if let Some(notes) = ingredient.notes.as_deref().filter(|n| !n.is_empty()) {
                                    span { class: "ingredient-notes", " ({notes})" }
                                }
                                button {
                                    class: "btn btn-link btn-sm",
                                    title: "Ask for substitutes",
                                    onclick: ui.on(Action::AskSubstitutions(ingredient.name.clone())),
                                    i { class: "fas fa-exchange-alt" }
                                }
                            }
                        }
                    }
                }
                h4 { "Instructions" }
                div { class: "instructions",
                    for (index, line) in instructions.lines().enumerate() {
                        p { key: "{index}", "{line}" }
                    }
                }
            }
            div { class: "modal-actions",
                button { class: "btn btn-secondary", onclick: ui.on(Action::AskAboutRecipe(recipe.id)),
                    i { class: "fas fa-robot" }
                    " Ask AI"
                }
                button { class: "btn btn-secondary", onclick: ui.on(Action::AskCookingTips(recipe.name.clone())),
                    i { class: "fas fa-lightbulb" }
                    " Cooking Tips"
                }
                button { class: "btn btn-secondary", onclick: ui.on(Action::AddRecipeToMealPlan(recipe.id)),
                    i { class: "fas fa-calendar-plus" }
                    " Add to Meal Plan"
                }
                button { class: "btn btn-primary", onclick: ui.on(Action::EditRecipe(recipe.id)),
                    i { class: "fas fa-edit" }
                    " Edit"
                }
            }
        }
    }
}
