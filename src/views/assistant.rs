use crate::controllers::assistant::format_message_content;
use crate::controllers::{ChatEntry, Suggestion};
use crate::events::{Action, QuickAction};
use crate::types::{ChatMessage, Role};
use crate::ui::use_ui;
use crate::views::shared::copy_to_clipboard;
use dioxus::events::Key;
use dioxus::prelude::*;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

fn format_message_timestamp(timestamp: OffsetDateTime) -> String {
    let mut datetime = timestamp;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(MESSAGE_TIME_FORMAT).unwrap_or_default()
}

#[component]
pub fn AssistantView() -> Element {
    let ui = use_ui();
    let assistant = &ui.shell.assistant;
    let transcript = assistant.transcript();
    let typing = assistant.is_typing();
    let input = assistant.input();
    let on_input = {
        let ui = ui.clone();
        move |ev: FormEvent| {
            ui.shell.assistant.set_input(ev.value());
            ui.sync();
        }
    };
    let on_keydown = {
        let ui = ui.clone();
        move |ev: KeyboardEvent| {
            if ev.key() == Key::Enter && !ev.modifiers().shift() {
                ev.prevent_default();
                ui.run(Action::SendChat);
            }
        }
    };

    rsx! {
        div { class: "page-header",
            h1 { "AI Assistant" }
            button { class: "btn btn-secondary", onclick: ui.on(Action::ClearChat),
                i { class: "fas fa-trash" }
                " Clear Chat"
            }
        }
        div { class: "chat-container",
            div { class: "chat-messages",
                for (index, entry) in transcript.into_iter().enumerate() {
                    match entry {
                        ChatEntry::Message(message) => rsx! {
                            MessageBubble { key: "{index}", message }
                        },
                        ChatEntry::Suggestion(suggestion) => rsx! {
                            SuggestionCard { key: "{index}", suggestion }
                        },
                    }
                }
                if typing {
                    div { class: "message assistant typing-indicator",
                        span {}
                        span {}
                        span {}
                    }
                }
            }
            div { class: "quick-actions",
                for quick in QuickAction::ALL {
                    button {
                        key: "{quick.slug()}",
                        class: "quick-action-btn",
                        onclick: ui.on(Action::QuickAction(quick)),
                        "{quick.label()}"
                    }
                }
            }
            div { class: "chat-input",
                textarea {
                    rows: "1",
                    placeholder: "Ask me anything about cooking...",
                    value: "{input}",
                    oninput: on_input,
                    onkeydown: on_keydown,
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: input.trim().is_empty(),
                    onclick: ui.on(Action::SendChat),
                    i { class: "fas fa-paper-plane" }
                }
            }
        }
    }
}

#[component]
fn MessageBubble(message: ChatMessage) -> Element {
    let is_user = matches!(message.role, Role::User);
    let html = format_message_content(&message.content);
    let ts = format_message_timestamp(message.timestamp);
    let copy_payload = message.content.clone();

    rsx! {
        div { class: if is_user { "message user" } else { "message assistant" },
            div { class: "message-avatar",
                i { class: if is_user { "fas fa-user" } else { "fas fa-robot" } }
            }
            div { class: "message-content",
                div { class: "message-text", dangerous_inner_html: "{html}" }
                div { class: "message-meta",
                    span { class: "message-timestamp", "{ts}" }
                    if !is_user {
                        button {
                            class: "action-btn",
                            title: "Copy",
                            onclick: move |_| copy_to_clipboard(copy_payload.clone()),
                            "Copy"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn SuggestionCard(suggestion: Suggestion) -> Element {
    let ui = use_ui();
    rsx! {
        div { class: "suggestion-card",
            i { class: format_args!("fas fa-{}", suggestion.icon) }
            span { "{suggestion.text}" }
            button { class: "btn btn-primary btn-sm", onclick: ui.on(suggestion.action.clone()),
                "{suggestion.button}"
            }
        }
    }
}
