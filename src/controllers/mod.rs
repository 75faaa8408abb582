//! Page controllers
//!
//! Each controller mirrors one backend collection in memory and owns the
//! editor, modal and toast behavior around it. [`AppShell`] wires them
//! together over one [`crate::api::ApiClient`] and one
//! [`crate::notify::NotificationCenter`].
//!
//! Mutations never patch the cache. A successful create, update or delete is
//! always followed by a full reload of the collection.

pub mod assistant;
pub mod categories;
pub mod form;
pub mod meal_planning;
pub mod recipes;
pub mod shell;
pub mod shopping_lists;

pub use assistant::{AssistantController, ChatEntry, Suggestion};
pub use categories::CategoriesController;
pub use meal_planning::MealPlanningController;
pub use recipes::RecipesController;
pub use shell::{AppShell, Dashboard, Page, SearchKind, SearchResult};
pub use shopping_lists::ShoppingListsController;

use crate::notify::NotificationCenter;
use std::fmt::Display;

/// Log a failed operation and show its toast.
fn report_failure(notify: &NotificationCenter, toast: &str, err: &dyn Display) {
    tracing::error!(error = %err, "{toast}");
    notify.error(toast);
}
