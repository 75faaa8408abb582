//! Chat panel talking to the backend's cooking assistant.
//!
//! The transcript is what the panel shows. The history is what goes back to
//! the backend as context: user turns and real assistant replies, never the
//! welcome text or the apology.

use crate::api::ApiClient;
use crate::controllers::Page;
use crate::events::{Action, Deletion, QuickAction};
use crate::notify::NotificationCenter;
use crate::state::Shared;
use crate::types::{ChatMessage, Recipe, RecipeId, Role};
use serde::{Deserialize, Serialize};

/// How many history entries accompany each message.
pub const CONTEXT_WINDOW: usize = 10;

pub const WELCOME: &str = "Hello! I'm your AI recipe assistant. I can help you with:
• Recipe suggestions based on your ingredients
• Ingredient substitutions and alternatives
• Cooking tips and techniques
• Meal planning advice
• Nutritional information
• Cooking time and temperature guidance

What would you like to know?";

pub const APOLOGY: &str =
    "I apologize, but I'm having trouble responding right now. Please try again in a moment.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    chat_history: &'a [ChatMessage],
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub suggested_actions: Vec<SuggestedAction>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SuggestedAction {
    AddToMealPlan {
        #[serde(default)]
        recipe_id: Option<RecipeId>,
    },
    ViewRecipe {
        #[serde(default)]
        recipe_id: Option<RecipeId>,
    },
    CreateShoppingList {
        #[serde(default)]
        ingredients: Vec<serde_json::Value>,
    },
    #[serde(other)]
    Unknown,
}

/// A follow-up button the assistant offers under its reply.
#[derive(Clone, Debug, PartialEq)]
pub struct Suggestion {
    pub icon: &'static str,
    pub text: &'static str,
    pub button: &'static str,
    pub action: Action,
}

impl SuggestedAction {
    pub fn suggestion(&self) -> Option<Suggestion> {
        match self {
            SuggestedAction::AddToMealPlan { recipe_id } => Some(Suggestion {
                icon: "calendar-plus",
                text: "Would you like to add this recipe to your meal plan?",
                button: "Go to Meal Planning",
                action: match recipe_id {
                    Some(id) => Action::AddRecipeToMealPlan(*id),
                    None => Action::Navigate(Page::MealPlanning),
                },
            }),
            SuggestedAction::ViewRecipe {
                recipe_id: Some(id),
            } => Some(Suggestion {
                icon: "eye",
                text: "Would you like to view this recipe?",
                button: "View Recipe",
                action: Action::OpenRecipe(*id),
            }),
            SuggestedAction::CreateShoppingList { .. } => Some(Suggestion {
                icon: "shopping-cart",
                text: "Would you like to create a shopping list with these ingredients?",
                button: "Create Shopping List",
                action: Action::Navigate(Page::ShoppingLists),
            }),
            SuggestedAction::ViewRecipe { recipe_id: None } | SuggestedAction::Unknown => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChatEntry {
    Message(ChatMessage),
    Suggestion(Suggestion),
}

struct ChatState {
    transcript: Vec<ChatEntry>,
    history: Vec<ChatMessage>,
    typing: bool,
    input: String,
}

impl ChatState {
    fn fresh() -> Self {
        Self {
            transcript: vec![ChatEntry::Message(ChatMessage::new(
                Role::Assistant,
                WELCOME,
            ))],
            history: Vec::new(),
            typing: false,
            input: String::new(),
        }
    }
}

#[derive(Clone)]
pub struct AssistantController {
    api: ApiClient,
    notify: NotificationCenter,
    state: Shared<ChatState>,
}

impl AssistantController {
    pub fn new(api: ApiClient, notify: NotificationCenter) -> Self {
        let state = Shared::new(ChatState::fresh(), notify.revision());
        Self { api, notify, state }
    }

    pub fn transcript(&self) -> Vec<ChatEntry> {
        self.state.read(|s| s.transcript.clone())
    }

    pub fn history(&self) -> Vec<ChatMessage> {
        self.state.read(|s| s.history.clone())
    }

    pub fn is_typing(&self) -> bool {
        self.state.read(|s| s.typing)
    }

    pub fn input(&self) -> String {
        self.state.read(|s| s.input.clone())
    }

    pub fn set_input(&self, input: String) {
        self.state.update(|s| s.input = input);
    }

    /// Send whatever is in the input box and clear it.
    pub async fn send_input(&self) {
        let input = self.state.update(|s| std::mem::take(&mut s.input));
        self.send(&input).await;
    }

    /// Append the user turn, ask the backend, append its answer or an
    /// apology. Blank messages are ignored.
    pub async fn send(&self, message: &str) {
        let message = message.trim();
        if message.is_empty() {
            return;
        }

        let context = self.state.update(|s| {
            let turn = ChatMessage::new(Role::User, message);
            s.transcript.push(ChatEntry::Message(turn.clone()));
            s.history.push(turn);
            s.typing = true;
            let start = s.history.len().saturating_sub(CONTEXT_WINDOW);
            s.history[start..].to_vec()
        });

        let request = ChatRequest {
            message,
            chat_history: &context,
        };
        let reply = self
            .api
            .post::<_, ChatReply>("/api/ai-assistant/chat", &request)
            .await;

        self.state.update(|s| {
            s.typing = false;
            match reply {
                Ok(reply) => {
                    let answer = ChatMessage::new(Role::Assistant, reply.response);
                    s.transcript.push(ChatEntry::Message(answer.clone()));
                    s.history.push(answer);
                    s.transcript.extend(
                        reply
                            .suggested_actions
                            .iter()
                            .filter_map(SuggestedAction::suggestion)
                            .map(ChatEntry::Suggestion),
                    );
                }
                Err(err) => {
                    tracing::error!(error = %err, "assistant chat failed");
                    s.transcript
                        .push(ChatEntry::Message(ChatMessage::new(Role::Assistant, APOLOGY)));
                }
            }
        });
    }

    pub async fn quick_action(&self, action: QuickAction) {
        self.send(action.prompt()).await;
    }

    pub fn request_clear(&self) {
        self.notify.ask_confirm(
            "Are you sure you want to clear the chat history?",
            Deletion::ChatHistory,
        );
    }

    pub fn clear(&self) {
        self.state.update(|s| *s = ChatState::fresh());
        self.notify.success("Chat history cleared");
    }

    /// Returns false when the recipe could not be fetched.
    pub async fn ask_about_recipe(&self, id: RecipeId) -> bool {
        match self.api.get::<Recipe>(&format!("/api/recipes/{id}")).await {
            Ok(recipe) => {
                self.send(&format!(
                    "Can you tell me more about this recipe: {}? Any tips for making it better?",
                    recipe.name
                ))
                .await;
                true
            }
            Err(err) => {
                tracing::error!(error = %err, recipe = id, "asking about recipe failed");
                false
            }
        }
    }

    pub async fn ask_substitutions(&self, ingredient: &str) {
        self.send(&format!("What can I substitute for {ingredient} in cooking?"))
            .await;
    }

    pub async fn ask_cooking_tips(&self, technique: &str) {
        self.send(&format!("Can you give me tips for {technique}?"))
            .await;
    }
}

/// Render assistant text as HTML: line breaks become `<br>` and each run of
/// `• ` lines becomes one `<ul>`. Text is escaped first.
pub fn format_message_content(content: &str) -> String {
    let mut html = String::new();
    let mut in_list = false;
    let mut after_text = false;
    for line in content.split('\n') {
        if let Some(item) = line.strip_prefix("• ") {
            if !in_list {
                html.push_str("<ul>");
                in_list = true;
            }
            html.push_str("<li>");
            html.push_str(&escape_html(item));
            html.push_str("</li>");
            after_text = false;
        } else {
            if in_list {
                html.push_str("</ul>");
                in_list = false;
            } else if after_text {
                html.push_str("<br>");
            }
            html.push_str(&escape_html(line));
            after_text = true;
        }
    }
    if in_list {
        html.push_str("</ul>");
    }
    html
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
