use recipe_manager::api::Method;
use recipe_manager::controllers::Page;
use recipe_manager::events::Action;
use recipe_manager::notify::ModalId;
use recipe_manager::types::CategoryKind;
use serde_json::json;
use time::macros::date;

mod common;

#[tokio::test]
async fn week_query_starts_on_sunday() {
    let backend = common::backend();
    let shell = common::shell(&backend, date!(2024 - 01 - 17));

    shell.dispatch(Action::Navigate(Page::MealPlanning)).await;

    assert_eq!(shell.meal_planning.week().start, date!(2024 - 01 - 14));
    let urls: Vec<String> = backend
        .requests()
        .into_iter()
        .map(|r| r.url)
        .filter(|url| url.contains("/api/meal-plans"))
        .collect();
    assert_eq!(
        urls,
        [format!(
            "{}/api/meal-plans?start_date=2024-01-14&end_date=2024-01-20",
            common::BASE_URL
        )]
    );
}

#[tokio::test]
async fn week_navigation_reloads_the_planner() {
    let backend = common::backend();
    let shell = common::shell(&backend, date!(2024 - 01 - 17));
    shell.dispatch(Action::Navigate(Page::MealPlanning)).await;
    backend.clear_log();

    shell.dispatch(Action::NextWeek).await;
    assert_eq!(shell.meal_planning.week().start, date!(2024 - 01 - 21));
    assert_eq!(backend.count(Method::Get, "/api/meal-plans"), 1);

    shell.dispatch(Action::PreviousWeek).await;
    shell.dispatch(Action::PreviousWeek).await;
    assert_eq!(shell.meal_planning.week().start, date!(2024 - 01 - 07));
}

#[tokio::test]
async fn empty_slot_opens_picker_and_books_the_meal() {
    let backend = common::backend();
    let dinner = backend.seed_category("Dinner", "meal");
    let recipe = backend.seed_recipe("Lasagna", None);
    let shell = common::shell(&backend, date!(2024 - 01 - 17));
    shell.dispatch(Action::Navigate(Page::MealPlanning)).await;

    shell
        .dispatch(Action::OpenSlot {
            date: date!(2024 - 01 - 18),
            category_id: dinner,
        })
        .await;
    assert!(shell.notify().is_open(ModalId::RecipeSelection));
    assert_eq!(shell.meal_planning.selection().map(|s| s.people), Some(4));

    shell.dispatch(Action::ChooseRecipe(recipe)).await;

    let body = backend
        .body_of_last(Method::Post, "/api/meal-plans")
        .expect("create body");
    assert_eq!(body["name"], "Lasagna - Dinner");
    assert_eq!(body["date"], "2024-01-18");
    assert_eq!(body["people_count"], 4);
    assert!(!shell.notify().is_open(ModalId::RecipeSelection));
    assert!(common::toasts(&shell).contains(&"Meal added successfully!".to_string()));

    let grid = shell.meal_planning.grid();
    let thursday = &grid[4];
    assert_eq!(thursday.date, date!(2024 - 01 - 18));
    assert!(thursday.slots[0].meal.is_some());
}

#[tokio::test]
async fn taken_slot_shows_conflict_toast() {
    let backend = common::backend();
    let dinner = backend.seed_category("Dinner", "meal");
    let recipe = backend.seed_recipe("Tacos", None);
    backend.seed_meal("2024-01-18", dinner, recipe, 2);
    let shell = common::shell(&backend, date!(2024 - 01 - 17));
    shell.dispatch(Action::Navigate(Page::MealPlanning)).await;

    let created = shell
        .meal_planning
        .create_meal(date!(2024 - 01 - 18), dinner, recipe, 2)
        .await;

    assert!(!created);
    assert_eq!(
        common::toasts(&shell),
        ["A meal is already planned for this time slot"]
    );
    assert_eq!(backend.meal_plan_count(), 1);
}

#[tokio::test]
async fn recipe_picked_elsewhere_fills_next_slot() {
    let backend = common::backend();
    let lunch = backend.seed_category("Lunch", "meal");
    let recipe = backend.seed_recipe("Burrito", None);
    let shell = common::shell(&backend, date!(2024 - 01 - 17));

    shell.dispatch(Action::AddRecipeToMealPlan(recipe)).await;
    assert_eq!(shell.page(), Page::MealPlanning);
    assert_eq!(shell.meal_planning.preselected(), Some(recipe));

    shell.dispatch(Action::IncreasePeople).await;
    shell
        .dispatch(Action::OpenSlot {
            date: date!(2024 - 01 - 16),
            category_id: lunch,
        })
        .await;

    assert!(!shell.notify().is_open(ModalId::RecipeSelection));
    assert_eq!(shell.meal_planning.preselected(), None);
    let body = backend
        .body_of_last(Method::Post, "/api/meal-plans")
        .expect("create body");
    assert_eq!(body["people_count"], 5);
}

#[tokio::test]
async fn editing_people_refreshes_preview_and_saves() {
    let backend = common::backend();
    let dinner = backend.seed_category("Dinner", "meal");
    let recipe = backend.seed_recipe_with(
        "Risotto",
        None,
        json!([{"name": "Rice", "quantity": 400.0, "unit": "g"}]),
    );
    let meal = backend.seed_meal("2024-01-15", dinner, recipe, 4);
    let shell = common::shell(&backend, date!(2024 - 01 - 17));
    shell.dispatch(Action::Navigate(Page::MealPlanning)).await;

    shell.dispatch(Action::EditMeal(meal)).await;
    shell.dispatch(Action::SetMealPeople(2)).await;

    let edit = shell.meal_planning.editing().expect("editor open");
    assert_eq!(edit.people, 2);
    let preview = edit.preview.expect("preview");
    assert_eq!(preview.adjusted_ingredients[0].adjusted_quantity, 200.0);

    shell.dispatch(Action::SaveMeal).await;
    let body = backend
        .body_of_last(Method::Put, &format!("/api/meal-plans/{meal}"))
        .expect("update body");
    assert_eq!(body, json!({"people_count": 2}));
    assert_eq!(shell.meal_planning.meals()[0].people_count, 2);
}

#[tokio::test]
async fn empty_week_generates_nothing() {
    let backend = common::backend();
    let shell = common::shell(&backend, date!(2024 - 01 - 17));
    shell.dispatch(Action::Navigate(Page::MealPlanning)).await;

    shell.dispatch(Action::GenerateShoppingList).await;

    assert_eq!(backend.count(Method::Post, "/api/shopping-lists/generate"), 0);
    assert_eq!(common::toasts(&shell), ["No meals planned for this week"]);
    assert_eq!(shell.page(), Page::MealPlanning);
}

#[tokio::test]
async fn week_generates_a_list_and_switches_page() {
    let backend = common::backend();
    let dinner = backend.seed_category("Dinner", "meal");
    let recipe = backend.seed_recipe_with(
        "Chili",
        None,
        json!([{"name": "Beans", "quantity": 2.0, "unit": "cans"}]),
    );
    let first = backend.seed_meal("2024-01-14", dinner, recipe, 4);
    let second = backend.seed_meal("2024-01-20", dinner, recipe, 4);
    backend.seed_meal("2024-01-21", dinner, recipe, 4);
    let shell = common::shell(&backend, date!(2024 - 01 - 17));
    shell.dispatch(Action::Navigate(Page::MealPlanning)).await;

    shell.dispatch(Action::GenerateShoppingList).await;

    let body = backend
        .body_of_last(Method::Post, "/api/shopping-lists/generate")
        .expect("generate body");
    assert_eq!(body["name"], "Shopping List - Jan 14 to Jan 20");
    assert_eq!(body["meal_plan_ids"], json!([first, second]));
    assert_eq!(shell.page(), Page::ShoppingLists);
    assert_eq!(shell.shopping_lists.lists().len(), 1);
}

#[tokio::test]
async fn recipe_created_after_planner_visit_can_be_booked() {
    let backend = common::backend();
    let dinner = backend.seed_category("Dinner", "meal");
    backend.seed_recipe("Old", None);
    let shell = common::shell(&backend, date!(2024 - 01 - 17));
    shell.dispatch(Action::Navigate(Page::MealPlanning)).await;

    shell.dispatch(Action::Navigate(Page::Recipes)).await;
    shell.dispatch(Action::NewRecipe).await;
    shell.recipes.update_draft(|draft| draft.name = "Fresh".into());
    shell.dispatch(Action::SaveRecipe).await;
    let fresh = shell
        .recipes
        .recipes()
        .into_iter()
        .find(|recipe| recipe.name == "Fresh")
        .expect("saved recipe")
        .id;

    shell.dispatch(Action::AddRecipeToMealPlan(fresh)).await;
    shell
        .dispatch(Action::OpenSlot {
            date: date!(2024 - 01 - 19),
            category_id: dinner,
        })
        .await;

    let body = backend
        .body_of_last(Method::Post, "/api/meal-plans")
        .expect("create body");
    assert_eq!(body["recipe_id"], fresh);
    assert_eq!(body["name"], "Fresh - Dinner");
    assert!(common::toasts(&shell).contains(&"Meal added successfully!".to_string()));
    assert_eq!(shell.meal_planning.preselected(), None);
    assert!(shell.meal_planning.recipe(fresh).is_some());
}

#[tokio::test]
async fn uncached_recipe_is_fetched_before_booking() {
    let backend = common::backend();
    let dinner = backend.seed_category("Dinner", "meal");
    let shell = common::shell(&backend, date!(2024 - 01 - 17));
    shell.dispatch(Action::Navigate(Page::MealPlanning)).await;
    let late = backend.seed_recipe("Late", None);

    let created = shell
        .meal_planning
        .create_meal(date!(2024 - 01 - 18), dinner, late, 3)
        .await;

    assert!(created);
    assert_eq!(backend.count(Method::Get, &format!("/api/recipes/{late}")), 1);
    let body = backend
        .body_of_last(Method::Post, "/api/meal-plans")
        .expect("create body");
    assert_eq!(body["name"], "Late - Dinner");
}

#[tokio::test]
async fn failed_booking_keeps_the_preselected_recipe() {
    let backend = common::backend();
    let lunch = backend.seed_category("Lunch", "meal");
    let recipe = backend.seed_recipe("Soup", None);
    backend.fail(Method::Post, "/api/meal-plans", 500);
    let shell = common::shell(&backend, date!(2024 - 01 - 17));

    shell.dispatch(Action::AddRecipeToMealPlan(recipe)).await;
    shell
        .dispatch(Action::OpenSlot {
            date: date!(2024 - 01 - 16),
            category_id: lunch,
        })
        .await;

    assert!(common::toasts(&shell).contains(&"Error adding meal".to_string()));
    assert_eq!(shell.meal_planning.preselected(), Some(recipe));
}

#[tokio::test]
async fn planner_picks_up_category_changes_from_other_pages() {
    let backend = common::backend();
    let lunch = backend.seed_category("Lunch", "meal");
    backend.seed_category("Dinner", "meal");
    let shell = common::shell(&backend, date!(2024 - 01 - 17));
    shell.dispatch(Action::Navigate(Page::MealPlanning)).await;
    assert_eq!(shell.meal_planning.categories().len(), 2);

    shell.dispatch(Action::Navigate(Page::Categories)).await;
    shell
        .dispatch(Action::SelectCategoryKind(CategoryKind::Meal))
        .await;
    shell.dispatch(Action::DeleteCategory(lunch)).await;
    shell.dispatch(Action::ConfirmPending).await;
    shell.dispatch(Action::NewCategory).await;
    shell.categories.update_draft(|draft| draft.name = "Brunch".into());
    shell.dispatch(Action::SaveCategory).await;

    shell.dispatch(Action::Navigate(Page::MealPlanning)).await;
    let names: Vec<String> = shell
        .meal_planning
        .categories()
        .into_iter()
        .map(|category| category.name)
        .collect();
    assert_eq!(names, ["Dinner", "Brunch"]);
    assert_eq!(shell.meal_planning.grid()[0].slots.len(), 2);
}
