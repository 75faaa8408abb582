//! The weekly meal calendar.
//!
//! A slot is one (day, meal category) cell. The backend owns slot
//! uniqueness and answers 409 when a slot is taken.

use super::recipes::adjust_portions;
use super::report_failure;
use crate::api::{ApiClient, ApiResult, with_query};
use crate::calendar::{Week, short_label};
use crate::events::Deletion;
use crate::notify::{ModalId, NotificationCenter};
use crate::state::Shared;
use crate::types::{Category, CategoryId, MealPlan, MealPlanId, PortionAdjustment, Recipe, RecipeId};
use serde::Serialize;
use std::collections::BTreeMap;
use time::Date;

pub const MIN_PEOPLE: u32 = 1;
pub const MAX_PEOPLE: u32 = 20;

pub fn clamp_people(count: u32) -> u32 {
    count.clamp(MIN_PEOPLE, MAX_PEOPLE)
}

/// Group plans by calendar day, in date order.
pub fn group_by_date(meals: &[MealPlan]) -> BTreeMap<Date, Vec<MealPlan>> {
    let mut grouped: BTreeMap<Date, Vec<MealPlan>> = BTreeMap::new();
    for meal in meals {
        grouped.entry(meal.date).or_default().push(meal.clone());
    }
    grouped
}

#[derive(Clone, Debug, PartialEq)]
pub struct Slot {
    pub date: Date,
    pub category: Category,
    pub meal: Option<MealPlan>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DayColumn {
    pub date: Date,
    pub slots: Vec<Slot>,
}

/// An empty slot waiting for a recipe.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotSelection {
    pub date: Date,
    pub category_id: CategoryId,
    pub filter: String,
    pub people: u32,
}

/// A filled slot open in the editor.
#[derive(Clone, Debug, PartialEq)]
pub struct MealEdit {
    pub meal: MealPlan,
    pub people: u32,
    pub preview: Option<PortionAdjustment>,
}

#[derive(Serialize)]
struct NewMealPlan {
    name: String,
    #[serde(with = "crate::calendar::iso_date")]
    date: Date,
    meal_category_id: CategoryId,
    recipe_id: RecipeId,
    people_count: u32,
}

#[derive(Serialize)]
struct PeopleUpdate {
    people_count: u32,
}

#[derive(Serialize)]
struct GenerateRequest {
    name: String,
    meal_plan_ids: Vec<MealPlanId>,
}

struct PlannerState {
    week: Week,
    categories: Vec<Category>,
    recipes: Vec<Recipe>,
    meals: Vec<MealPlan>,
    selection: Option<SlotSelection>,
    editing: Option<MealEdit>,
    preselected: Option<RecipeId>,
}

#[derive(Clone)]
pub struct MealPlanningController {
    api: ApiClient,
    notify: NotificationCenter,
    state: Shared<PlannerState>,
}

impl MealPlanningController {
    pub fn new(api: ApiClient, notify: NotificationCenter, anchor: Date) -> Self {
        let state = PlannerState {
            week: Week::containing(anchor),
            categories: Vec::new(),
            recipes: Vec::new(),
            meals: Vec::new(),
            selection: None,
            editing: None,
            preselected: None,
        };
        let state = Shared::new(state, notify.revision());
        Self { api, notify, state }
    }

    pub fn week(&self) -> Week {
        self.state.read(|s| s.week)
    }

    /// Move the visible window to the week containing `anchor`.
    pub fn set_week(&self, anchor: Date) {
        self.state.update(|s| s.week = Week::containing(anchor));
    }

    pub fn meals(&self) -> Vec<MealPlan> {
        self.state.read(|s| s.meals.clone())
    }

    pub fn categories(&self) -> Vec<Category> {
        self.state.read(|s| s.categories.clone())
    }

    pub fn selection(&self) -> Option<SlotSelection> {
        self.state.read(|s| s.selection.clone())
    }

    pub fn editing(&self) -> Option<MealEdit> {
        self.state.read(|s| s.editing.clone())
    }

    pub fn preselected(&self) -> Option<RecipeId> {
        self.state.read(|s| s.preselected)
    }

    pub fn recipe(&self, id: RecipeId) -> Option<Recipe> {
        self.state
            .read(|s| s.recipes.iter().find(|recipe| recipe.id == id).cloned())
    }

    /// Meal categories, recipes and the week's plans are all refetched, so
    /// edits made on other pages show up here.
    pub async fn load_week(&self) {
        let _loading = self.notify.loading();
        if let Err(err) = self.reload_lookups().await {
            report_failure(&self.notify, "Error loading meal plans", &err);
            return;
        }

        let week = self.week();
        let [start, end] = week.query();
        let path = with_query(
            "/api/meal-plans",
            &[(start.0, start.1.as_str()), (end.0, end.1.as_str())],
        );
        match self.api.get::<Vec<MealPlan>>(&path).await {
            Ok(meals) => self.state.update(|s| s.meals = meals),
            Err(err) => report_failure(&self.notify, "Error loading meal plans", &err),
        }
    }

    async fn reload_lookups(&self) -> ApiResult<()> {
        let category_path = with_query("/api/categories", &[("type", "meal")]);
        let (categories, recipes) = futures::try_join!(
            self.api.get::<Vec<Category>>(&category_path),
            self.api.get::<Vec<Recipe>>("/api/recipes"),
        )?;
        self.state.update(|s| {
            s.categories = categories;
            s.recipes = recipes;
        });
        Ok(())
    }

    /// Seven columns, one slot per meal category in each.
    pub fn grid(&self) -> Vec<DayColumn> {
        self.state.read(|s| {
            s.week
                .days()
                .into_iter()
                .map(|date| DayColumn {
                    date,
                    slots: s
                        .categories
                        .iter()
                        .map(|category| Slot {
                            date,
                            category: category.clone(),
                            meal: s
                                .meals
                                .iter()
                                .find(|m| m.date == date && m.meal_category_id == category.id)
                                .cloned(),
                        })
                        .collect(),
                })
                .collect()
        })
    }

    // ---------------
    // Empty slot: pick a recipe
    // ---------------

    /// Remember a recipe picked on the recipes page for the next empty slot.
    pub fn select_recipe_for_meal(&self, recipe_id: RecipeId) {
        self.state.update(|s| s.preselected = Some(recipe_id));
        self.notify
            .success("Recipe selected! Click on a meal slot to add it.");
    }

    /// Click on an empty slot. A preselected recipe is planned straight away
    /// and stays selected until a booking succeeds. Otherwise the recipe
    /// picker opens.
    pub async fn open_slot(&self, date: Date, category_id: CategoryId, default_people: u32) -> bool {
        if !self.state.read(|s| s.categories.iter().any(|c| c.id == category_id)) {
            return false;
        }
        let people = clamp_people(default_people);
        if let Some(recipe_id) = self.preselected() {
            let created = self.create_meal(date, category_id, recipe_id, people).await;
            if created {
                self.state.update(|s| {
                    if s.preselected == Some(recipe_id) {
                        s.preselected = None;
                    }
                });
            }
            return created;
        }
        self.state.update(|s| {
            s.selection = Some(SlotSelection {
                date,
                category_id,
                filter: String::new(),
                people,
            })
        });
        self.notify.open_modal(ModalId::RecipeSelection);
        true
    }

    pub fn close_selection(&self) {
        self.state.update(|s| s.selection = None);
        self.notify.close_modal(ModalId::RecipeSelection);
    }

    pub fn set_selection_filter(&self, filter: String) {
        self.state.update(|s| {
            if let Some(selection) = s.selection.as_mut() {
                selection.filter = filter;
            }
        });
    }

    pub fn set_selection_people(&self, people: u32) {
        self.state.update(|s| {
            if let Some(selection) = s.selection.as_mut() {
                selection.people = clamp_people(people);
            }
        });
    }

    /// Recipes shown in the picker, by case-insensitive name match.
    pub fn selectable_recipes(&self) -> Vec<Recipe> {
        self.state.read(|s| {
            let needle = s
                .selection
                .as_ref()
                .map(|sel| sel.filter.trim().to_lowercase())
                .unwrap_or_default();
            s.recipes
                .iter()
                .filter(|recipe| recipe.name.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        })
    }

    pub async fn choose_recipe(&self, recipe_id: RecipeId) -> bool {
        let Some(selection) = self.selection() else {
            return false;
        };
        self.create_meal(
            selection.date,
            selection.category_id,
            recipe_id,
            selection.people,
        )
        .await
    }

    pub async fn create_meal(
        &self,
        date: Date,
        category_id: CategoryId,
        recipe_id: RecipeId,
        people: u32,
    ) -> bool {
        let _loading = self.notify.loading();
        let recipe = match self.recipe(recipe_id) {
            Some(recipe) => recipe,
            None => match self.api.get::<Recipe>(&format!("/api/recipes/{recipe_id}")).await {
                Ok(recipe) => recipe,
                Err(err) => {
                    report_failure(&self.notify, "Recipe not found", &err);
                    return false;
                }
            },
        };
        let category = self.state.read(|s| {
            s.categories
                .iter()
                .find(|c| c.id == category_id)
                .map(|c| c.name.clone())
                .unwrap_or_default()
        });

        let body = NewMealPlan {
            name: format!("{} - {}", recipe.name, category),
            date,
            meal_category_id: category_id,
            recipe_id,
            people_count: clamp_people(people),
        };
        match self
            .api
            .post::<_, serde_json::Value>("/api/meal-plans", &body)
            .await
        {
            Ok(_) => {
                self.notify.success("Meal added successfully!");
                self.close_selection();
                self.load_week().await;
                true
            }
            Err(err) if err.is_conflict() => {
                report_failure(&self.notify, "A meal is already planned for this time slot", &err);
                false
            }
            Err(err) => {
                report_failure(&self.notify, "Error adding meal", &err);
                false
            }
        }
    }

    // ---------------
    // Filled slot: edit
    // ---------------

    pub async fn edit_meal(&self, id: MealPlanId) {
        let Some(meal) = self
            .state
            .read(|s| s.meals.iter().find(|m| m.id == id).cloned())
        else {
            self.notify.error("Meal not found");
            return;
        };
        let people = meal.people_count;
        self.state.update(|s| {
            s.editing = Some(MealEdit {
                meal,
                people,
                preview: None,
            })
        });
        self.notify.open_modal(ModalId::MealEditor);
        self.refresh_preview().await;
    }

    pub fn close_editor(&self) {
        self.state.update(|s| s.editing = None);
        self.notify.close_modal(ModalId::MealEditor);
    }

    pub async fn set_edit_people(&self, people: u32) {
        let changed = self.state.update(|s| match s.editing.as_mut() {
            Some(edit) => {
                edit.people = clamp_people(people);
                true
            }
            None => false,
        });
        if changed {
            self.refresh_preview().await;
        }
    }

    /// Ask the backend for the scaled ingredient list. Failure only logs.
    pub async fn refresh_preview(&self) {
        let Some(edit) = self.editing() else {
            return;
        };
        match adjust_portions(&self.api, edit.meal.recipe_id, edit.people).await {
            Ok(preview) => self.state.update(|s| {
                if let Some(current) = s.editing.as_mut()
                    && current.meal.id == edit.meal.id
                    && current.people == edit.people
                {
                    current.preview = Some(preview);
                }
            }),
            Err(err) => tracing::error!(error = %err, "loading portion preview failed"),
        }
    }

    pub async fn update_meal(&self) -> bool {
        let Some(edit) = self.editing() else {
            return false;
        };
        let _loading = self.notify.loading();
        let body = PeopleUpdate {
            people_count: edit.people,
        };
        match self
            .api
            .put::<_, serde_json::Value>(&format!("/api/meal-plans/{}", edit.meal.id), &body)
            .await
        {
            Ok(_) => {
                self.notify.success("Meal updated successfully!");
                self.close_editor();
                self.load_week().await;
                true
            }
            Err(err) => {
                report_failure(&self.notify, "Error updating meal", &err);
                false
            }
        }
    }

    pub fn request_delete_meal(&self, id: MealPlanId) {
        self.notify.ask_confirm(
            "Are you sure you want to delete this meal plan?",
            Deletion::MealPlan(id),
        );
    }

    pub async fn delete_meal(&self, id: MealPlanId) -> bool {
        let _loading = self.notify.loading();
        match self.api.delete(&format!("/api/meal-plans/{id}")).await {
            Ok(()) => {
                self.notify.success("Meal deleted successfully!");
                self.close_editor();
                self.load_week().await;
                true
            }
            Err(err) => {
                report_failure(&self.notify, "Error deleting meal", &err);
                false
            }
        }
    }

    // ---------------
    // Shopping list generation
    // ---------------

    /// Batch every plan of the visible week into one generated list.
    /// An empty week is refused before any request goes out.
    pub async fn generate_shopping_list(&self) -> bool {
        let (week, ids) = self.state.read(|s| {
            let ids: Vec<MealPlanId> = s
                .meals
                .iter()
                .filter(|meal| s.week.contains(meal.date))
                .map(|meal| meal.id)
                .collect();
            (s.week, ids)
        });
        if ids.is_empty() {
            self.notify.warning("No meals planned for this week");
            return false;
        }

        let _loading = self.notify.loading();
        let body = GenerateRequest {
            name: format!(
                "Shopping List - {} to {}",
                short_label(week.start),
                short_label(week.end())
            ),
            meal_plan_ids: ids,
        };
        match self
            .api
            .post::<_, serde_json::Value>("/api/shopping-lists/generate", &body)
            .await
        {
            Ok(_) => {
                self.notify.success("Shopping list generated successfully!");
                true
            }
            Err(err) => {
                report_failure(&self.notify, "Error generating shopping list", &err);
                false
            }
        }
    }
}
