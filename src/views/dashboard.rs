use crate::calendar;
use crate::controllers::Page;
use crate::events::Action;
use crate::ui::use_ui;
use dioxus::prelude::*;

#[component]
pub fn DashboardView() -> Element {
    let ui = use_ui();
    let dashboard = ui.shell.dashboard();
    let stats = dashboard.stats.clone();
    let has_meals = dashboard.has_planned_meals();

    rsx! {
        div { class: "page-header",
            h1 { "Dashboard" }
        }
        div { class: "stats-grid",
            StatCard { icon: "book", value: stats.recipes, label: "Recipes" }
            StatCard { icon: "calendar-alt", value: stats.meal_plans, label: "Planned Meals" }
            StatCard { icon: "shopping-cart", value: stats.shopping_lists, label: "Shopping Lists" }
            StatCard { icon: "tags", value: stats.categories, label: "Categories" }
        }
        div { class: "dashboard-grid",
            div { class: "dashboard-card",
                div { class: "card-header",
                    h3 { "Recent Recipes" }
                    button { class: "btn btn-link", onclick: ui.on(Action::Navigate(Page::Recipes)), "View all" }
                }
                if dashboard.recent.is_empty() {
                    p { class: "empty-state", "No recipes yet. Add your first recipe!" }
                } else {
                    ul { class: "recent-recipes",
                        for recipe in dashboard.recent.iter() {
                            li {
                                key: "{recipe.id}",
                                class: "recent-recipe",
                                onclick: ui.on(Action::OpenRecipe(recipe.id)),
                                span { class: "recipe-name", "{recipe.name}" }
                                if let Some(category) = recipe.category_name.as_deref() {
                                    span { class: "recipe-category", "{category}" }
                                }
                            }
                        }
                    }
                }
            }
            div { class: "dashboard-card",
                div { class: "card-header",
                    h3 { "This Week" }
                    button { class: "btn btn-link", onclick: ui.on(Action::Navigate(Page::MealPlanning)), "Plan meals" }
                }
                if !has_meals {
                    p { class: "empty-state", "No meals planned for this week." }
                } else {
                    div { class: "week-preview",
                        for day in dashboard.week.iter().filter(|day| !day.meals.is_empty()) {
                            div { key: "{day.date}", class: "preview-day",
                                h4 { "{calendar::short_label(day.date)}" }
                                for meal in day.meals.iter() {
                                    p { key: "{meal.id}", class: "preview-meal",
                                        span { class: "meal-category", "{meal.category_label()}: " }
                                        "{meal.recipe_label()}"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn StatCard(icon: &'static str, value: usize, label: &'static str) -> Element {
    rsx! {
        div { class: "stat-card",
            i { class: format_args!("fas fa-{}", icon) }
            div { class: "stat-content",
                span { class: "stat-value", "{value}" }
                span { class: "stat-label", "{label}" }
            }
        }
    }
}
