use crate::calendar::iso_date;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::{Date, OffsetDateTime};

pub type RecipeId = i64;
pub type CategoryId = i64;
pub type MealPlanId = i64;
pub type ShoppingListId = i64;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub prep_time: Option<u32>,
    #[serde(default)]
    pub cook_time: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    #[default]
    Recipe,
    Meal,
}

impl CategoryKind {
    pub const ALL: [CategoryKind; 2] = [CategoryKind::Recipe, CategoryKind::Meal];

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryKind::Recipe => "recipe",
            CategoryKind::Meal => "meal",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "recipe" => Some(CategoryKind::Recipe),
            "meal" => Some(CategoryKind::Meal),
            _ => None,
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub id: MealPlanId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub meal_category_id: CategoryId,
    pub recipe_id: RecipeId,
    pub people_count: u32,
    #[serde(default)]
    pub recipe_name: Option<String>,
    #[serde(default)]
    pub meal_category_name: Option<String>,
}

impl MealPlan {
    pub fn recipe_label(&self) -> &str {
        self.recipe_name.as_deref().unwrap_or("")
    }

    pub fn category_label(&self) -> &str {
        self.meal_category_name.as_deref().unwrap_or("Uncategorized")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    #[serde(alias = "ingredient_name")]
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub checked: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub id: ShoppingListId,
    pub name: String,
    #[serde(default)]
    pub items: Vec<ShoppingItem>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ShoppingList {
    /// Calendar part of `created_at`, which the backend sends as ISO-8601.
    pub fn created_on(&self) -> Option<&str> {
        self.created_at
            .as_deref()
            .map(|raw| raw.split('T').next().unwrap_or(raw))
    }
}

/// One row of an ingredient or shopping-item sub-form, ready to submit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdjustedIngredient {
    pub name: String,
    #[serde(default)]
    pub original_quantity: Option<f64>,
    pub adjusted_quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Server-computed ingredient scaling for a people count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortionAdjustment {
    pub recipe_id: RecipeId,
    #[serde(default)]
    pub recipe_name: Option<String>,
    #[serde(default)]
    pub original_servings: Option<u32>,
    pub adjusted_servings: u32,
    #[serde(default)]
    pub scaling_factor: Option<f64>,
    #[serde(default)]
    pub adjusted_ingredients: Vec<AdjustedIngredient>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "type")]
    pub role: Role,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}
