//! Recipe CRUD through the app shell against the in-memory backend.

use recipe_manager::api::Method;
use recipe_manager::controllers::Page;
use recipe_manager::controllers::form::{LineField, LineItemFields};
use recipe_manager::events::Action;
use recipe_manager::notify::ModalId;
use time::macros::date;

mod common;

#[tokio::test]
async fn created_recipe_shows_up_after_reload() {
    let backend = common::backend();
    let breakfast = backend.seed_category("Breakfast", "recipe");
    backend.seed_recipe("Pancakes", Some(breakfast));
    let shell = common::shell(&backend, date!(2024 - 01 - 17));

    shell.dispatch(Action::Navigate(Page::Recipes)).await;
    assert_eq!(shell.recipes.recipes().len(), 1);
    assert_eq!(shell.recipes.categories().len(), 1);

    shell.dispatch(Action::NewRecipe).await;
    assert!(shell.notify().is_open(ModalId::RecipeEditor));
    shell.recipes.update_draft(|draft| {
        draft.name = "Omelette".into();
        draft.prep_time = "5".into();
        draft.category_id = Some(breakfast);
        draft.ingredients = LineItemFields::from_rows([("Eggs", 3.0, "pcs"), ("Butter", 1.0, "tbsp")]);
    });
    shell.dispatch(Action::SaveRecipe).await;

    assert_eq!(shell.recipes.recipes().len(), 2);
    assert!(!shell.notify().is_open(ModalId::RecipeEditor));
    assert!(common::toasts(&shell).contains(&"Recipe created successfully!".to_string()));

    let body = backend
        .body_of_last(Method::Post, "/api/recipes")
        .expect("create body");
    assert_eq!(body["name"], "Omelette");
    assert_eq!(body["prep_time"], 5);
    assert_eq!(body["servings"], 4);
    assert_eq!(body["ingredients"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn ingredient_row_with_missing_unit_is_not_sent() {
    let backend = common::backend();
    let shell = common::shell(&backend, date!(2024 - 01 - 17));

    shell.dispatch(Action::NewRecipe).await;
    shell.recipes.update_draft(|draft| {
        draft.name = "Cake".into();
        let rows = [("Flour", "500", "g"), ("Sugar", "200", "g"), ("Eggs", "3", ""), ("Milk", "1", "l")];
        let mut fields = LineItemFields::empty();
        for (index, (name, quantity, unit)) in rows.into_iter().enumerate() {
            fields.add_row();
            fields.set(index, LineField::Name, name.into());
            fields.set(index, LineField::Quantity, quantity.into());
            fields.set(index, LineField::Unit, unit.into());
        }
        draft.ingredients = fields;
    });
    shell.dispatch(Action::SaveRecipe).await;

    let body = backend
        .body_of_last(Method::Post, "/api/recipes")
        .expect("create body");
    let names: Vec<&str> = body["ingredients"]
        .as_array()
        .expect("ingredients")
        .iter()
        .filter_map(|i| i["name"].as_str())
        .collect();
    assert_eq!(names, ["Flour", "Sugar", "Milk"]);
}

#[tokio::test]
async fn blank_name_is_rejected_before_any_request() {
    let backend = common::backend();
    let shell = common::shell(&backend, date!(2024 - 01 - 17));

    shell.dispatch(Action::NewRecipe).await;
    shell.dispatch(Action::SaveRecipe).await;

    assert_eq!(backend.count(Method::Post, "/api/recipes"), 0);
    assert_eq!(common::toasts(&shell), ["Please fill in all required fields"]);
    assert!(shell.notify().is_open(ModalId::RecipeEditor));
}

#[tokio::test]
async fn editing_prefills_and_puts() {
    let backend = common::backend();
    let id = backend.seed_recipe("Soup", None);
    let shell = common::shell(&backend, date!(2024 - 01 - 17));
    shell.dispatch(Action::Navigate(Page::Recipes)).await;

    shell.dispatch(Action::EditRecipe(id)).await;
    assert_eq!(shell.recipes.editing(), Some(id));
    assert_eq!(shell.recipes.draft().name, "Soup");

    shell.recipes.update_draft(|draft| draft.name = "Tomato Soup".into());
    shell.dispatch(Action::SaveRecipe).await;

    assert_eq!(backend.count(Method::Put, &format!("/api/recipes/{id}")), 1);
    assert_eq!(shell.recipes.recipes()[0].name, "Tomato Soup");
    assert!(common::toasts(&shell).contains(&"Recipe updated successfully!".to_string()));
}

#[tokio::test]
async fn delete_waits_for_confirmation() {
    let backend = common::backend();
    let id = backend.seed_recipe("Salad", None);
    let shell = common::shell(&backend, date!(2024 - 01 - 17));
    shell.dispatch(Action::Navigate(Page::Recipes)).await;

    shell.dispatch(Action::DeleteRecipe(id)).await;
    assert!(shell.notify().confirmation().is_some());
    assert_eq!(backend.count(Method::Delete, &format!("/api/recipes/{id}")), 0);

    shell.dispatch(Action::CancelPending).await;
    assert_eq!(backend.recipe_count(), 1);

    shell.dispatch(Action::DeleteRecipe(id)).await;
    shell.dispatch(Action::ConfirmPending).await;
    assert_eq!(backend.recipe_count(), 0);
    assert!(shell.recipes.recipes().is_empty());
    assert!(common::toasts(&shell).contains(&"Recipe deleted successfully!".to_string()));
}

#[tokio::test]
async fn failed_load_reports_and_keeps_cache() {
    let backend = common::backend();
    backend.seed_recipe("Stew", None);
    let shell = common::shell(&backend, date!(2024 - 01 - 17));
    shell.dispatch(Action::Navigate(Page::Recipes)).await;

    backend.fail(Method::Get, "/api/recipes", 500);
    shell.recipes.load().await;

    assert_eq!(shell.recipes.recipes().len(), 1);
    assert_eq!(common::toasts(&shell), ["Error loading recipes"]);
    assert!(!shell.notify().is_loading());
}

#[tokio::test]
async fn filter_and_search_narrow_the_grid() {
    let backend = common::backend();
    let dinner = backend.seed_category("Dinner", "recipe");
    backend.seed_recipe("Beef Stew", Some(dinner));
    backend.seed_recipe("Fruit Salad", None);
    let shell = common::shell(&backend, date!(2024 - 01 - 17));
    shell.dispatch(Action::Navigate(Page::Recipes)).await;

    shell.dispatch(Action::FilterRecipes(Some(dinner))).await;
    assert_eq!(shell.recipes.filtered().len(), 1);

    shell.dispatch(Action::FilterRecipes(None)).await;
    shell.dispatch(Action::SearchRecipes("SALAD".into())).await;
    let names: Vec<_> = shell.recipes.filtered().into_iter().map(|r| r.name).collect();
    assert_eq!(names, ["Fruit Salad"]);
}
