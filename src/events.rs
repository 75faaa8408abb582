//! Everything a click can do.
//!
//! Views never call controllers by name. Each button maps to one [`Action`]
//! carrying the ids it needs, and [`crate::controllers::AppShell::dispatch`]
//! routes it.

use crate::controllers::Page;
use crate::notify::{ModalId, ToastId};
use crate::types::{CategoryId, CategoryKind, MealPlanId, RecipeId, ShoppingListId};
use time::Date;

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Navigate(Page),

    // Global widgets
    OpenSearch,
    Search(String),
    IncreasePeople,
    DecreasePeople,
    PreviousWeek,
    NextWeek,
    DismissToast(ToastId),
    CloseModal(ModalId),
    ConfirmPending,
    CancelPending,

    // Recipes
    NewRecipe,
    ViewRecipe(RecipeId),
    /// Switch to the recipes page, then show the record.
    OpenRecipe(RecipeId),
    EditRecipe(RecipeId),
    DeleteRecipe(RecipeId),
    SaveRecipe,
    SearchRecipes(String),
    FilterRecipes(Option<CategoryId>),
    AddRecipeToMealPlan(RecipeId),

    // Categories
    SelectCategoryKind(CategoryKind),
    NewCategory,
    EditCategory(CategoryId),
    DeleteCategory(CategoryId),
    SaveCategory,

    // Meal planning
    OpenSlot { date: Date, category_id: CategoryId },
    ChooseRecipe(RecipeId),
    EditMeal(MealPlanId),
    SetMealPeople(u32),
    SaveMeal,
    DeleteMeal(MealPlanId),
    GenerateShoppingList,

    // Shopping lists
    NewShoppingList,
    ViewShoppingList(ShoppingListId),
    EditShoppingList(ShoppingListId),
    DeleteShoppingList(ShoppingListId),
    SaveShoppingList,
    ShowExportOptions(ShoppingListId),
    Export(ShoppingListId, ExportFormat),

    // Assistant
    SendChat,
    QuickAction(QuickAction),
    ClearChat,
    AskAboutRecipe(RecipeId),
    /// Ask for substitutes for one ingredient.
    AskSubstitutions(String),
    /// Ask for tips on a dish or technique.
    AskCookingTips(String),
}

/// The record a pending confirmation prompt will delete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deletion {
    Recipe(RecipeId),
    Category(CategoryId),
    MealPlan(MealPlanId),
    ShoppingList(ShoppingListId),
    ChatHistory,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Pdf,
    Excel,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Pdf, ExportFormat::Excel];

    /// Value of the `format` query parameter.
    pub fn query(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Excel => "excel",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Excel => "xlsx",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "PDF",
            ExportFormat::Excel => "EXCEL",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "PDF Document",
            ExportFormat::Excel => "Excel Spreadsheet",
        }
    }

    pub fn blurb(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "Perfect for printing and taking to the store",
            ExportFormat::Excel => "Editable format for further customization",
        }
    }

    pub fn default_filename(self) -> String {
        format!("shopping-list.{}", self.extension())
    }
}

/// Canned prompts offered next to the chat input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QuickAction {
    RecipeSuggestions,
    Substitutions,
    CookingTips,
    MealPlanning,
}

impl QuickAction {
    pub const ALL: [QuickAction; 4] = [
        QuickAction::RecipeSuggestions,
        QuickAction::Substitutions,
        QuickAction::CookingTips,
        QuickAction::MealPlanning,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            QuickAction::RecipeSuggestions => "recipe-suggestions",
            QuickAction::Substitutions => "substitutions",
            QuickAction::CookingTips => "cooking-tips",
            QuickAction::MealPlanning => "meal-planning",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuickAction::RecipeSuggestions => "Recipe Suggestions",
            QuickAction::Substitutions => "Substitutions",
            QuickAction::CookingTips => "Cooking Tips",
            QuickAction::MealPlanning => "Meal Planning",
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            QuickAction::RecipeSuggestions => {
                "Can you suggest some recipes based on common ingredients?"
            }
            QuickAction::Substitutions => {
                "What are some common ingredient substitutions I should know?"
            }
            QuickAction::CookingTips => "Can you give me some essential cooking tips?",
            QuickAction::MealPlanning => "How can I plan my meals more effectively?",
        }
    }
}
