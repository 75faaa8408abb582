use super::form::{LineItemFields, parse_count};
use super::report_failure;
use crate::api::{ApiClient, ApiResult, with_query};
use crate::events::Deletion;
use crate::notify::{ModalId, NotificationCenter};
use crate::state::Shared;
use crate::types::{Category, CategoryId, LineItem, PortionAdjustment, Recipe, RecipeId};
use serde::Serialize;

pub const DEFAULT_SERVINGS: u32 = 4;

const DELETE_PROMPT: &str =
    "Are you sure you want to delete this recipe? This action cannot be undone.";

/// Raw editor fields. Numbers stay strings until save.
#[derive(Clone, Debug, PartialEq)]
pub struct RecipeDraft {
    pub name: String,
    pub description: String,
    pub instructions: String,
    pub prep_time: String,
    pub cook_time: String,
    pub servings: String,
    pub category_id: Option<CategoryId>,
    pub ingredients: LineItemFields,
}

impl Default for RecipeDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            instructions: String::new(),
            prep_time: String::new(),
            cook_time: String::new(),
            servings: DEFAULT_SERVINGS.to_string(),
            category_id: None,
            ingredients: LineItemFields::default(),
        }
    }
}

impl RecipeDraft {
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            name: recipe.name.clone(),
            description: recipe.description.clone().unwrap_or_default(),
            instructions: recipe.instructions.clone().unwrap_or_default(),
            prep_time: recipe.prep_time.map(|v| v.to_string()).unwrap_or_default(),
            cook_time: recipe.cook_time.map(|v| v.to_string()).unwrap_or_default(),
            servings: recipe.servings.unwrap_or(DEFAULT_SERVINGS).to_string(),
            category_id: recipe.category_id,
            ingredients: LineItemFields::from_rows(
                recipe
                    .ingredients
                    .iter()
                    .map(|i| (i.name.as_str(), i.quantity, i.unit.as_str())),
            ),
        }
    }

    pub fn payload(&self) -> RecipePayload {
        let servings = if self.servings.trim().is_empty() {
            Some(DEFAULT_SERVINGS)
        } else {
            parse_count(&self.servings)
        };
        RecipePayload {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
            instructions: self.instructions.clone(),
            prep_time: parse_count(&self.prep_time),
            cook_time: parse_count(&self.cook_time),
            servings,
            category_id: self.category_id,
            ingredients: self.ingredients.collect(),
        }
    }
}

/// Body of `POST /api/recipes` and `PUT /api/recipes/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecipePayload {
    pub name: String,
    pub description: String,
    pub instructions: String,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub servings: Option<u32>,
    pub category_id: Option<CategoryId>,
    pub ingredients: Vec<LineItem>,
}

#[derive(Serialize)]
struct PortionRequest {
    recipe_id: RecipeId,
    people_count: u32,
}

#[derive(Default)]
struct RecipesState {
    recipes: Vec<Recipe>,
    categories: Vec<Category>,
    search: String,
    category_filter: Option<CategoryId>,
    editing: Option<RecipeId>,
    draft: RecipeDraft,
    details: Option<Recipe>,
}

#[derive(Clone)]
pub struct RecipesController {
    api: ApiClient,
    notify: NotificationCenter,
    state: Shared<RecipesState>,
}

impl RecipesController {
    pub fn new(api: ApiClient, notify: NotificationCenter) -> Self {
        let state = Shared::new(RecipesState::default(), notify.revision());
        Self { api, notify, state }
    }

    pub fn recipes(&self) -> Vec<Recipe> {
        self.state.read(|s| s.recipes.clone())
    }

    pub fn categories(&self) -> Vec<Category> {
        self.state.read(|s| s.categories.clone())
    }

    pub fn search(&self) -> String {
        self.state.read(|s| s.search.clone())
    }

    pub fn category_filter(&self) -> Option<CategoryId> {
        self.state.read(|s| s.category_filter)
    }

    pub fn draft(&self) -> RecipeDraft {
        self.state.read(|s| s.draft.clone())
    }

    pub fn editing(&self) -> Option<RecipeId> {
        self.state.read(|s| s.editing)
    }

    pub fn details(&self) -> Option<Recipe> {
        self.state.read(|s| s.details.clone())
    }

    // ---------------
    // Load
    // ---------------

    pub async fn load(&self) {
        let _loading = self.notify.loading();
        match self.api.get::<Vec<Recipe>>("/api/recipes").await {
            Ok(recipes) => self.state.update(|s| s.recipes = recipes),
            Err(err) => report_failure(&self.notify, "Error loading recipes", &err),
        }
    }

    /// Categories for the filter bar and the editor select. Failure only logs.
    pub async fn load_categories(&self) {
        let path = with_query("/api/categories", &[("type", "recipe")]);
        match self.api.get::<Vec<Category>>(&path).await {
            Ok(categories) => self.state.update(|s| s.categories = categories),
            Err(err) => tracing::error!(error = %err, "loading recipe categories failed"),
        }
    }

    // ---------------
    // Filtering
    // ---------------

    pub fn set_search(&self, search: String) {
        self.state.update(|s| s.search = search);
    }

    pub fn set_category_filter(&self, category: Option<CategoryId>) {
        self.state.update(|s| s.category_filter = category);
    }

    /// Cached recipes narrowed by the category filter and the search box.
    pub fn filtered(&self) -> Vec<Recipe> {
        self.state.read(|s| {
            let needle = s.search.trim().to_lowercase();
            s.recipes
                .iter()
                .filter(|recipe| match s.category_filter {
                    Some(category) => recipe.category_id == Some(category),
                    None => true,
                })
                .filter(|recipe| needle.is_empty() || matches_search(recipe, &needle))
                .cloned()
                .collect()
        })
    }

    // ---------------
    // Editor
    // ---------------

    pub fn open_editor(&self, recipe: Option<&Recipe>) {
        let draft = recipe.map(RecipeDraft::from_recipe).unwrap_or_default();
        let editing = recipe.map(|r| r.id);
        self.state.update(|s| {
            s.draft = draft;
            s.editing = editing;
        });
        self.notify.open_modal(ModalId::RecipeEditor);
    }

    pub fn close_editor(&self) {
        self.state.update(|s| s.editing = None);
        self.notify.close_modal(ModalId::RecipeEditor);
    }

    pub fn update_draft(&self, edit: impl FnOnce(&mut RecipeDraft)) {
        self.state.update(|s| edit(&mut s.draft));
    }

    pub async fn view(&self, id: RecipeId) {
        match self.fetch(id).await {
            Ok(recipe) => {
                self.state.update(|s| s.details = Some(recipe));
                self.notify.open_modal(ModalId::RecipeDetails);
            }
            Err(err) => report_failure(&self.notify, "Error loading recipe details", &err),
        }
    }

    pub fn close_details(&self) {
        self.state.update(|s| s.details = None);
        self.notify.close_modal(ModalId::RecipeDetails);
    }

    /// Fetch the full record, then open it in the editor.
    pub async fn edit(&self, id: RecipeId) {
        match self.fetch(id).await {
            Ok(recipe) => self.open_editor(Some(&recipe)),
            Err(err) => report_failure(&self.notify, "Error loading recipe", &err),
        }
    }

    pub async fn fetch(&self, id: RecipeId) -> ApiResult<Recipe> {
        self.api.get(&format!("/api/recipes/{id}")).await
    }

    // ---------------
    // Save / delete
    // ---------------

    /// Submit the editor. Returns true when the backend accepted it.
    pub async fn save(&self) -> bool {
        let (payload, editing) = self.state.read(|s| (s.draft.payload(), s.editing));
        if payload.name.is_empty() {
            self.notify.error("Please fill in all required fields");
            return false;
        }

        let _loading = self.notify.loading();
        let result = match editing {
            Some(id) => {
                self.api
                    .put::<_, serde_json::Value>(&format!("/api/recipes/{id}"), &payload)
                    .await
            }
            None => {
                self.api
                    .post::<_, serde_json::Value>("/api/recipes", &payload)
                    .await
            }
        };

        match result {
            Ok(_) => {
                self.notify.success(if editing.is_some() {
                    "Recipe updated successfully!"
                } else {
                    "Recipe created successfully!"
                });
                self.close_editor();
                self.load().await;
                true
            }
            Err(err) => {
                report_failure(&self.notify, "Error saving recipe", &err);
                false
            }
        }
    }

    pub fn request_delete(&self, id: RecipeId) {
        self.notify.ask_confirm(DELETE_PROMPT, Deletion::Recipe(id));
    }

    pub async fn delete(&self, id: RecipeId) -> bool {
        let _loading = self.notify.loading();
        match self.api.delete(&format!("/api/recipes/{id}")).await {
            Ok(()) => {
                self.notify.success("Recipe deleted successfully!");
                self.load().await;
                true
            }
            Err(err) => {
                report_failure(&self.notify, "Error deleting recipe", &err);
                false
            }
        }
    }
}

/// Server-side ingredient scaling for `people_count` eaters.
pub async fn adjust_portions(
    api: &ApiClient,
    recipe_id: RecipeId,
    people_count: u32,
) -> ApiResult<PortionAdjustment> {
    let request = PortionRequest {
        recipe_id,
        people_count,
    };
    api.post("/api/recipes/adjust-portions", &request).await
}

fn matches_search(recipe: &Recipe, needle: &str) -> bool {
    recipe.name.to_lowercase().contains(needle)
        || recipe
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
        || recipe
            .ingredients
            .iter()
            .any(|i| i.name.to_lowercase().contains(needle))
}
