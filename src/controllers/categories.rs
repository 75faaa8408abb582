use super::recipes::RecipesController;
use super::report_failure;
use crate::api::{ApiClient, ApiResult, with_query};
use crate::events::Deletion;
use crate::notify::{ModalId, NotificationCenter};
use crate::state::Shared;
use crate::types::{Category, CategoryId, CategoryKind, MealPlan, Recipe};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

pub const FALLBACK_ICON: &str = "tag";

static CATEGORY_ICONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("breakfast", "coffee"),
        ("lunch", "hamburger"),
        ("dinner", "utensils"),
        ("desserts", "ice-cream"),
        ("snacks", "cookie-bite"),
        ("beverages", "glass-whiskey"),
        ("appetizers", "cheese"),
        ("soups", "bowl-hot"),
        ("salads", "leaf"),
        ("main courses", "drumstick-bite"),
        ("side dishes", "bread-slice"),
        ("vegetarian", "seedling"),
        ("vegan", "carrot"),
        ("quick & easy", "clock"),
        ("brunch", "egg"),
    ])
});

/// Icon name for a category card, matched case-insensitively.
pub fn icon_for(name: &str) -> &'static str {
    CATEGORY_ICONS
        .get(name.to_lowercase().as_str())
        .copied()
        .unwrap_or(FALLBACK_ICON)
}

/// `1 recipe`, `3 meals`.
pub fn count_label(kind: CategoryKind, count: usize) -> String {
    let noun = match kind {
        CategoryKind::Recipe => "recipe",
        CategoryKind::Meal => "meal",
    };
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{plural}")
}

pub fn delete_prompt(category: &Category, dependents: usize) -> String {
    let mut message = format!(
        "Are you sure you want to delete the category \"{}\"?",
        category.name
    );
    if dependents > 0 {
        let noun = match category.kind {
            CategoryKind::Recipe => "recipe",
            CategoryKind::Meal => "meal plan",
        };
        let plural = if dependents == 1 { "" } else { "s" };
        message.push_str(&format!(
            "\n\nThis category contains {dependents} {noun}{plural}. They will be moved to \"Uncategorized\"."
        ));
    }
    message.push_str("\n\nThis action cannot be undone.");
    message
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryDraft {
    pub name: String,
    pub kind: Option<CategoryKind>,
}

#[derive(Serialize)]
struct CategoryPayload<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    kind: CategoryKind,
}

#[derive(Default)]
struct CategoriesState {
    recipe: Vec<Category>,
    meal: Vec<Category>,
    current: CategoryKind,
    counts: HashMap<CategoryId, String>,
    editing: Option<CategoryId>,
    draft: CategoryDraft,
}

impl CategoriesState {
    fn list(&self, kind: CategoryKind) -> &[Category] {
        match kind {
            CategoryKind::Recipe => &self.recipe,
            CategoryKind::Meal => &self.meal,
        }
    }

    fn find(&self, id: CategoryId) -> Option<Category> {
        self.recipe
            .iter()
            .chain(self.meal.iter())
            .find(|category| category.id == id)
            .cloned()
    }
}

/// Recipe and meal categories behind a two-tab switch.
#[derive(Clone)]
pub struct CategoriesController {
    api: ApiClient,
    notify: NotificationCenter,
    recipes: RecipesController,
    state: Shared<CategoriesState>,
}

impl CategoriesController {
    pub fn new(api: ApiClient, notify: NotificationCenter, recipes: RecipesController) -> Self {
        let state = Shared::new(CategoriesState::default(), notify.revision());
        Self {
            api,
            notify,
            recipes,
            state,
        }
    }

    pub fn current_kind(&self) -> CategoryKind {
        self.state.read(|s| s.current)
    }

    pub fn list(&self, kind: CategoryKind) -> Vec<Category> {
        self.state.read(|s| s.list(kind).to_vec())
    }

    /// Categories of the selected tab.
    pub fn displayed(&self) -> Vec<Category> {
        self.state.read(|s| s.list(s.current).to_vec())
    }

    pub fn find(&self, id: CategoryId) -> Option<Category> {
        self.state.read(|s| s.find(id))
    }

    pub fn name_of(&self, id: CategoryId) -> Option<String> {
        self.find(id).map(|category| category.name)
    }

    /// `None` while the count is still loading.
    pub fn count_text(&self, id: CategoryId) -> Option<String> {
        self.state.read(|s| s.counts.get(&id).cloned())
    }

    pub fn draft(&self) -> CategoryDraft {
        self.state.read(|s| s.draft.clone())
    }

    pub fn editing(&self) -> Option<CategoryId> {
        self.state.read(|s| s.editing)
    }

    pub async fn load(&self) {
        let _loading = self.notify.loading();
        let recipe_path = with_query("/api/categories", &[("type", "recipe")]);
        let meal_path = with_query("/api/categories", &[("type", "meal")]);
        let fetched = futures::try_join!(
            self.api.get::<Vec<Category>>(&recipe_path),
            self.api.get::<Vec<Category>>(&meal_path),
        );
        match fetched {
            Ok((recipe, meal)) => {
                self.state.update(|s| {
                    s.recipe = recipe;
                    s.meal = meal;
                    s.counts.clear();
                });
                self.load_counts().await;
            }
            Err(err) => report_failure(&self.notify, "Error loading categories", &err),
        }
    }

    pub async fn select_kind(&self, kind: CategoryKind) {
        self.state.update(|s| s.current = kind);
        self.load_counts().await;
    }

    /// Fill the per-card count labels of the visible tab, one at a time.
    pub async fn load_counts(&self) {
        for category in self.displayed() {
            let label = match self.dependent_count(&category).await {
                Ok(count) => count_label(category.kind, count),
                Err(err) => {
                    tracing::error!(error = %err, category = category.id, "loading category count failed");
                    "0 items".to_string()
                }
            };
            self.state.update(|s| s.counts.insert(category.id, label));
        }
    }

    /// How many recipes or meal plans point at this category. Recipe counts
    /// come from a filtered query; meal counts from the full plan list.
    pub async fn dependent_count(&self, category: &Category) -> ApiResult<usize> {
        match category.kind {
            CategoryKind::Recipe => {
                let id = category.id.to_string();
                let path = with_query("/api/recipes", &[("category_id", id.as_str())]);
                Ok(self.api.get::<Vec<Recipe>>(&path).await?.len())
            }
            CategoryKind::Meal => {
                let plans = self.api.get::<Vec<MealPlan>>("/api/meal-plans").await?;
                Ok(plans
                    .iter()
                    .filter(|plan| plan.meal_category_id == category.id)
                    .count())
            }
        }
    }

    // ---------------
    // Editor
    // ---------------

    /// New categories start on the visible tab's type.
    pub fn open_editor(&self, category: Option<&Category>) {
        self.state.update(|s| {
            s.editing = category.map(|c| c.id);
            s.draft = match category {
                Some(c) => CategoryDraft {
                    name: c.name.clone(),
                    kind: Some(c.kind),
                },
                None => CategoryDraft {
                    name: String::new(),
                    kind: Some(s.current),
                },
            };
        });
        self.notify.open_modal(ModalId::CategoryEditor);
    }

    pub fn close_editor(&self) {
        self.state.update(|s| s.editing = None);
        self.notify.close_modal(ModalId::CategoryEditor);
    }

    pub fn update_draft(&self, edit: impl FnOnce(&mut CategoryDraft)) {
        self.state.update(|s| edit(&mut s.draft));
    }

    pub fn edit(&self, id: CategoryId) {
        match self.find(id) {
            Some(category) => self.open_editor(Some(&category)),
            None => {
                self.notify.error("Category not found");
            }
        }
    }

    pub async fn save(&self) -> bool {
        let (draft, editing) = self.state.read(|s| (s.draft.clone(), s.editing));
        let name = draft.name.trim();
        let Some(kind) = draft.kind.filter(|_| !name.is_empty()) else {
            self.notify.error("Please fill in all required fields");
            return false;
        };

        let _loading = self.notify.loading();
        let payload = CategoryPayload { name, kind };
        let result = match editing {
            Some(id) => {
                self.api
                    .put::<_, serde_json::Value>(&format!("/api/categories/{id}"), &payload)
                    .await
            }
            None => {
                self.api
                    .post::<_, serde_json::Value>("/api/categories", &payload)
                    .await
            }
        };

        match result {
            Ok(_) => {
                self.notify.success(if editing.is_some() {
                    "Category updated successfully!"
                } else {
                    "Category created successfully!"
                });
                self.close_editor();
                self.load().await;
                self.recipes.load_categories().await;
                true
            }
            Err(err) if err.is_conflict() => {
                report_failure(&self.notify, "A category with this name already exists", &err);
                false
            }
            Err(err) => {
                report_failure(&self.notify, "Error saving category", &err);
                false
            }
        }
    }

    /// Count the dependents, then ask before deleting.
    pub async fn request_delete(&self, id: CategoryId) {
        let Some(category) = self.find(id) else {
            self.notify.error("Category not found");
            return;
        };
        match self.dependent_count(&category).await {
            Ok(count) => self
                .notify
                .ask_confirm(delete_prompt(&category, count), Deletion::Category(id)),
            Err(err) => report_failure(&self.notify, "Error deleting category", &err),
        }
    }

    pub async fn delete(&self, id: CategoryId) -> bool {
        let _loading = self.notify.loading();
        match self.api.delete(&format!("/api/categories/{id}")).await {
            Ok(()) => {
                self.notify.success("Category deleted successfully!");
                self.load().await;
                self.recipes.load_categories().await;
                self.recipes.load().await;
                true
            }
            Err(err) => {
                report_failure(&self.notify, "Error deleting category", &err);
                false
            }
        }
    }
}
