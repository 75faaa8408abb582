use super::assistant::AssistantController;
use super::categories::CategoriesController;
use super::meal_planning::{MealPlanningController, group_by_date};
use super::recipes::RecipesController;
use super::report_failure;
use super::shopping_lists::ShoppingListsController;
use crate::api::{ApiClient, HttpTransport, with_query};
use crate::calendar::{self, Week};
use crate::config::AppConfig;
use crate::events::{Action, Deletion};
use crate::notify::{ModalId, NotificationCenter};
use crate::state::{Revision, Shared};
use crate::types::{Category, MealPlan, Recipe, ShoppingList};
use std::sync::Arc;
use time::{Date, Duration};

pub const RECENT_RECIPES: usize = 6;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Page {
    #[default]
    Dashboard,
    Recipes,
    MealPlanning,
    ShoppingLists,
    Categories,
    Assistant,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Dashboard,
        Page::Recipes,
        Page::MealPlanning,
        Page::ShoppingLists,
        Page::Categories,
        Page::Assistant,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Recipes => "recipes",
            Page::MealPlanning => "meal-planning",
            Page::ShoppingLists => "shopping-lists",
            Page::Categories => "categories",
            Page::Assistant => "ai-assistant",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Recipes => "Recipes",
            Page::MealPlanning => "Meal Planning",
            Page::ShoppingLists => "Shopping Lists",
            Page::Categories => "Categories",
            Page::Assistant => "AI Assistant",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardStats {
    pub recipes: usize,
    pub meal_plans: usize,
    pub shopping_lists: usize,
    pub categories: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PreviewDay {
    pub date: Date,
    pub meals: Vec<MealPlan>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent: Vec<Recipe>,
    /// This real week, Sunday first. Empty until loaded.
    pub week: Vec<PreviewDay>,
}

impl Dashboard {
    pub fn has_planned_meals(&self) -> bool {
        self.week.iter().any(|day| !day.meals.is_empty())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchKind {
    Recipe,
    Meal,
    Shopping,
}

impl SearchKind {
    pub fn icon(self) -> &'static str {
        match self {
            SearchKind::Recipe => "book",
            SearchKind::Meal => "calendar-alt",
            SearchKind::Shopping => "shopping-cart",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub kind: SearchKind,
    pub title: String,
    pub description: String,
    pub action: Action,
}

struct ShellState {
    page: Page,
    anchor: Date,
    today: Date,
    people: u32,
    dashboard: Dashboard,
    search_results: Vec<SearchResult>,
}

/// Page routing plus the widgets every page shares.
#[derive(Clone)]
pub struct AppShell {
    api: ApiClient,
    notify: NotificationCenter,
    pub recipes: RecipesController,
    pub categories: CategoriesController,
    pub meal_planning: MealPlanningController,
    pub shopping_lists: ShoppingListsController,
    pub assistant: AssistantController,
    state: Shared<ShellState>,
}

impl AppShell {
    pub fn new(api: ApiClient, today: Date, default_people: u32) -> Self {
        let notify = NotificationCenter::new(Revision::new());
        let recipes = RecipesController::new(api.clone(), notify.clone());
        let categories = CategoriesController::new(api.clone(), notify.clone(), recipes.clone());
        let meal_planning = MealPlanningController::new(api.clone(), notify.clone(), today);
        let shopping_lists = ShoppingListsController::new(api.clone(), notify.clone());
        let assistant = AssistantController::new(api.clone(), notify.clone());
        let state = ShellState {
            page: Page::Dashboard,
            anchor: today,
            today,
            people: default_people.max(1),
            dashboard: Dashboard::default(),
            search_results: Vec::new(),
        };
        let state = Shared::new(state, notify.revision());
        Self {
            api,
            notify,
            recipes,
            categories,
            meal_planning,
            shopping_lists,
            assistant,
            state,
        }
    }

    /// Wire the real HTTP transport from configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        let api = ApiClient::new(Arc::new(HttpTransport::new()), config.api_base_url.clone());
        let shell = Self::new(api, calendar::today(), config.default_people);
        if let Some(dir) = &config.download_dir {
            shell.shopping_lists.set_download_dir(dir.clone());
        }
        shell
    }

    pub fn notify(&self) -> &NotificationCenter {
        &self.notify
    }

    pub fn revision(&self) -> Revision {
        self.notify.revision()
    }

    pub fn page(&self) -> Page {
        self.state.read(|s| s.page)
    }

    pub fn people(&self) -> u32 {
        self.state.read(|s| s.people)
    }

    pub fn week(&self) -> Week {
        self.state.read(|s| Week::containing(s.anchor))
    }

    pub fn dashboard(&self) -> Dashboard {
        self.state.read(|s| s.dashboard.clone())
    }

    pub fn search_results(&self) -> Vec<SearchResult> {
        self.state.read(|s| s.search_results.clone())
    }

    // ---------------
    // Navigation
    // ---------------

    /// Show `page` and run its loads. Every page is reachable from every page.
    pub async fn navigate(&self, page: Page) {
        tracing::debug!(page = page.slug(), "navigate");
        self.state.update(|s| s.page = page);
        match page {
            Page::Dashboard => self.load_dashboard().await,
            Page::Recipes => {
                futures::join!(self.recipes.load(), self.recipes.load_categories());
            }
            Page::MealPlanning => {
                self.meal_planning.set_week(self.week().start);
                self.meal_planning.load_week().await;
            }
            Page::ShoppingLists => self.shopping_lists.load().await,
            Page::Categories => self.categories.load().await,
            Page::Assistant => {}
        }
    }

    pub async fn load_dashboard(&self) {
        let _loading = self.notify.loading();
        let fetched = futures::try_join!(
            self.api.get::<Vec<Recipe>>("/api/recipes"),
            self.api.get::<Vec<MealPlan>>("/api/meal-plans"),
            self.api.get::<Vec<ShoppingList>>("/api/shopping-lists"),
            self.api.get::<Vec<Category>>("/api/categories"),
        );
        let (recipes, meal_plans, lists, categories) = match fetched {
            Ok(fetched) => fetched,
            Err(err) => {
                report_failure(&self.notify, "Error loading dashboard", &err);
                return;
            }
        };

        let stats = DashboardStats {
            recipes: recipes.len(),
            meal_plans: meal_plans.len(),
            shopping_lists: lists.len(),
            categories: categories.len(),
        };
        let recent: Vec<Recipe> = recipes.into_iter().take(RECENT_RECIPES).collect();
        self.state.update(|s| {
            s.dashboard.stats = stats;
            s.dashboard.recent = recent;
        });
        self.load_week_preview().await;
    }

    /// Meals of the real current week, whatever week the planner shows.
    async fn load_week_preview(&self) {
        let week = Week::containing(self.state.read(|s| s.today));
        let [start, end] = week.query();
        let path = with_query(
            "/api/meal-plans",
            &[(start.0, start.1.as_str()), (end.0, end.1.as_str())],
        );
        match self.api.get::<Vec<MealPlan>>(&path).await {
            Ok(meals) => {
                let mut grouped = group_by_date(&meals);
                let days = week
                    .days()
                    .into_iter()
                    .map(|date| PreviewDay {
                        date,
                        meals: grouped.remove(&date).unwrap_or_default(),
                    })
                    .collect();
                self.state.update(|s| s.dashboard.week = days);
            }
            Err(err) => tracing::error!(error = %err, "loading week preview failed"),
        }
    }

    // ---------------
    // Week pointer and people counter
    // ---------------

    pub async fn previous_week(&self) {
        self.shift_week(-1).await;
    }

    pub async fn next_week(&self) {
        self.shift_week(1).await;
    }

    async fn shift_week(&self, weeks: i64) {
        let anchor = self.state.update(|s| {
            s.anchor += Duration::days(calendar::DAYS_PER_WEEK * weeks);
            s.anchor
        });
        self.meal_planning.set_week(anchor);
        if self.page() == Page::MealPlanning {
            self.meal_planning.load_week().await;
        }
    }

    pub fn increase_people(&self) {
        self.state.update(|s| s.people += 1);
    }

    /// Never goes below one person.
    pub fn decrease_people(&self) {
        self.state.update(|s| {
            if s.people > 1 {
                s.people -= 1;
            }
        });
    }

    // ---------------
    // Global search
    // ---------------

    /// Recipes are matched by the backend; meal plans and shopping lists are
    /// fetched whole and matched here. A blank query only clears results.
    pub async fn search(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            self.state.update(|s| s.search_results.clear());
            return;
        }

        let recipe_path = with_query("/api/recipes", &[("search", query)]);
        let fetched = futures::try_join!(
            self.api.get::<Vec<Recipe>>(&recipe_path),
            self.api.get::<Vec<MealPlan>>("/api/meal-plans"),
            self.api.get::<Vec<ShoppingList>>("/api/shopping-lists"),
        );
        let (recipes, meals, lists) = match fetched {
            Ok(fetched) => fetched,
            Err(err) => {
                tracing::error!(error = %err, "search failed");
                return;
            }
        };

        let needle = query.to_lowercase();
        let mut results: Vec<SearchResult> = recipes
            .into_iter()
            .map(|recipe| SearchResult {
                kind: SearchKind::Recipe,
                description: recipe
                    .description
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| "No description".to_string()),
                title: recipe.name,
                action: Action::OpenRecipe(recipe.id),
            })
            .collect();
        results.extend(
            meals
                .iter()
                .filter(|meal| {
                    meal.recipe_label().to_lowercase().contains(&needle)
                        || meal
                            .meal_category_name
                            .as_deref()
                            .unwrap_or("")
                            .to_lowercase()
                            .contains(&needle)
                })
                .map(|meal| SearchResult {
                    kind: SearchKind::Meal,
                    title: format!("{}: {}", meal.category_label(), meal.recipe_label()),
                    description: format!("Planned for {}", calendar::format_date(meal.date)),
                    action: Action::Navigate(Page::MealPlanning),
                }),
        );
        results.extend(
            lists
                .iter()
                .filter(|list| list.name.to_lowercase().contains(&needle))
                .map(|list| SearchResult {
                    kind: SearchKind::Shopping,
                    title: list.name.clone(),
                    description: format!("{} items", list.items.len()),
                    action: Action::Navigate(Page::ShoppingLists),
                }),
        );
        self.state.update(|s| s.search_results = results);
    }

    // ---------------
    // Event binding
    // ---------------

    pub async fn dispatch(&self, action: Action) {
        tracing::trace!(?action, "dispatch");
        match action {
            Action::Navigate(page) => self.navigate(page).await,
            Action::OpenSearch => self.notify.open_modal(ModalId::Search),
            Action::Search(query) => self.search(&query).await,
            Action::IncreasePeople => self.increase_people(),
            Action::DecreasePeople => self.decrease_people(),
            Action::PreviousWeek => self.previous_week().await,
            Action::NextWeek => self.next_week().await,
            Action::DismissToast(id) => {
                self.notify.dismiss(id);
            }
            Action::CloseModal(modal) => self.close_modal(modal),
            Action::ConfirmPending => self.confirm_pending().await,
            Action::CancelPending => {
                self.notify.take_confirmation();
            }

            Action::NewRecipe => self.recipes.open_editor(None),
            Action::ViewRecipe(id) => self.recipes.view(id).await,
            Action::OpenRecipe(id) => {
                self.notify.close_modal(ModalId::Search);
                self.navigate(Page::Recipes).await;
                self.recipes.view(id).await;
            }
            Action::EditRecipe(id) => {
                self.recipes.close_details();
                self.recipes.edit(id).await;
            }
            Action::DeleteRecipe(id) => self.recipes.request_delete(id),
            Action::SaveRecipe => {
                self.recipes.save().await;
            }
            Action::SearchRecipes(query) => self.recipes.set_search(query),
            Action::FilterRecipes(category) => self.recipes.set_category_filter(category),
            Action::AddRecipeToMealPlan(id) => {
                self.recipes.close_details();
                self.navigate(Page::MealPlanning).await;
                self.meal_planning.select_recipe_for_meal(id);
            }

            Action::SelectCategoryKind(kind) => self.categories.select_kind(kind).await,
            Action::NewCategory => self.categories.open_editor(None),
            Action::EditCategory(id) => self.categories.edit(id),
            Action::DeleteCategory(id) => self.categories.request_delete(id).await,
            Action::SaveCategory => {
                self.categories.save().await;
            }

            Action::OpenSlot { date, category_id } => {
                self.meal_planning
                    .open_slot(date, category_id, self.people())
                    .await;
            }
            Action::ChooseRecipe(id) => {
                self.meal_planning.choose_recipe(id).await;
            }
            Action::EditMeal(id) => self.meal_planning.edit_meal(id).await,
            Action::SetMealPeople(people) => self.meal_planning.set_edit_people(people).await,
            Action::SaveMeal => {
                self.meal_planning.update_meal().await;
            }
            Action::DeleteMeal(id) => self.meal_planning.request_delete_meal(id),
            Action::GenerateShoppingList => {
                if self.meal_planning.generate_shopping_list().await {
                    self.navigate(Page::ShoppingLists).await;
                }
            }

            Action::NewShoppingList => self.shopping_lists.open_editor(None),
            Action::ViewShoppingList(id) => self.shopping_lists.view(id).await,
            Action::EditShoppingList(id) => {
                self.shopping_lists.close_details();
                self.shopping_lists.edit(id).await;
            }
            Action::DeleteShoppingList(id) => self.shopping_lists.request_delete(id),
            Action::SaveShoppingList => {
                self.shopping_lists.save().await;
            }
            Action::ShowExportOptions(id) => {
                self.shopping_lists.close_details();
                self.shopping_lists.show_export_options(id);
            }
            Action::Export(id, format) => {
                self.shopping_lists.export(id, format).await;
            }

            Action::SendChat => self.assistant.send_input().await,
            Action::QuickAction(quick) => self.assistant.quick_action(quick).await,
            Action::ClearChat => self.assistant.request_clear(),
            Action::AskAboutRecipe(id) => {
                self.recipes.close_details();
                self.navigate(Page::Assistant).await;
                self.assistant.ask_about_recipe(id).await;
            }
            Action::AskSubstitutions(ingredient) => {
                self.recipes.close_details();
                self.navigate(Page::Assistant).await;
                self.assistant.ask_substitutions(&ingredient).await;
            }
            Action::AskCookingTips(technique) => {
                self.recipes.close_details();
                self.navigate(Page::Assistant).await;
                self.assistant.ask_cooking_tips(&technique).await;
            }
        }
    }

    fn close_modal(&self, modal: ModalId) {
        match modal {
            ModalId::RecipeEditor => self.recipes.close_editor(),
            ModalId::RecipeDetails => self.recipes.close_details(),
            ModalId::CategoryEditor => self.categories.close_editor(),
            ModalId::ShoppingListEditor => self.shopping_lists.close_editor(),
            ModalId::ShoppingListDetails => self.shopping_lists.close_details(),
            ModalId::ExportOptions => self.shopping_lists.close_export_options(),
            ModalId::RecipeSelection => self.meal_planning.close_selection(),
            ModalId::MealEditor => self.meal_planning.close_editor(),
            ModalId::Confirm => {
                self.notify.take_confirmation();
            }
            ModalId::Search => self.notify.close_modal(ModalId::Search),
        }
    }

    /// Carry out the deletion the open prompt was guarding.
    async fn confirm_pending(&self) {
        let Some(confirmation) = self.notify.take_confirmation() else {
            return;
        };
        match confirmation.target {
            Deletion::Recipe(id) => {
                self.recipes.delete(id).await;
            }
            Deletion::Category(id) => {
                self.categories.delete(id).await;
            }
            Deletion::MealPlan(id) => {
                self.meal_planning.delete_meal(id).await;
            }
            Deletion::ShoppingList(id) => {
                self.shopping_lists.delete(id).await;
            }
            Deletion::ChatHistory => self.assistant.clear(),
        }
    }
}
