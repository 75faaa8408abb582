pub mod assistant;
pub mod categories;
pub mod dashboard;
pub mod meal_planning;
pub mod recipes;
pub mod shared;
pub mod shopping_lists;

pub use assistant::AssistantView;
pub use categories::CategoriesView;
pub use dashboard::DashboardView;
pub use meal_planning::MealPlanningView;
pub use recipes::RecipesView;
pub use shopping_lists::ShoppingListsView;
