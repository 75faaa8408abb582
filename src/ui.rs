use crate::config::AppConfig;
use crate::controllers::{AppShell, Page};
use crate::events::Action;
use crate::views::shared::{ConfirmDialog, LoadingSpinner, SearchOverlay, Toasts};
use crate::views::{
    AssistantView, CategoriesView, DashboardView, MealPlanningView, RecipesView,
    ShoppingListsView,
};
use dioxus::prelude::*;
use std::time::Duration;

const MAIN_CSS: Asset = asset!("/assets/main.css");
const FONT_AWESOME: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css";
const REVISION_POLL: Duration = Duration::from_millis(80);

/// Shared by every component: the controller graph plus the last revision
/// the UI rendered.
#[derive(Clone)]
pub struct UiHandle {
    pub shell: AppShell,
    seen: Signal<u64>,
}

impl UiHandle {
    /// Dispatch in the background, then re-render.
    pub fn run(&self, action: Action) {
        let handle = self.clone();
        spawn(async move {
            handle.shell.dispatch(action).await;
            handle.sync();
        });
    }

    /// Event handler that dispatches `action`, whatever the event.
    pub fn on<E: 'static>(&self, action: Action) -> impl FnMut(Event<E>) + 'static {
        let handle = self.clone();
        move |_| handle.run(action.clone())
    }

    /// Re-render if any controller changed since the last frame.
    pub fn sync(&self) {
        let mut seen = self.seen;
        let current = self.shell.revision().current();
        if *seen.peek() != current {
            seen.set(current);
        }
    }
}

/// Fetch the handle and subscribe the calling component to state changes.
pub fn use_ui() -> UiHandle {
    let handle = use_context::<UiHandle>();
    let _ = (handle.seen)();
    handle
}

/// Root component. Expects the launch-time [`AppConfig`] in context.
#[component]
pub fn App() -> Element {
    let config = use_context::<AppConfig>();
    let seen = use_signal(|| 0u64);
    let handle = use_context_provider(|| UiHandle {
        shell: AppShell::from_config(&config),
        seen,
    });

    use_revision_poll(handle.clone());
    use_hook({
        let handle = handle.clone();
        move || handle.run(Action::Navigate(Page::Dashboard))
    });

    let _ = seen();
    let shell = &handle.shell;
    let page = shell.page();
    let scroll_class = if shell.notify().scroll_locked() {
        "app scroll-locked"
    } else {
        "app"
    };

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Link { rel: "stylesheet", href: FONT_AWESOME }
        div { class: scroll_class,
            AppHeader { page }
            main { class: "main-content",
                PagePanel { page, target: Page::Dashboard, children: rsx!( DashboardView {} ) }
                PagePanel { page, target: Page::Recipes, children: rsx!( RecipesView {} ) }
                PagePanel { page, target: Page::MealPlanning, children: rsx!( MealPlanningView {} ) }
                PagePanel { page, target: Page::ShoppingLists, children: rsx!( ShoppingListsView {} ) }
                PagePanel { page, target: Page::Categories, children: rsx!( CategoriesView {} ) }
                PagePanel { page, target: Page::Assistant, children: rsx!( AssistantView {} ) }
            }
            SearchOverlay {}
            ConfirmDialog {}
            LoadingSpinner {}
            Toasts {}
        }
    }
}

/// Poll the shared revision counter and hand new toasts their timers.
fn use_revision_poll(handle: UiHandle) {
    use_future(move || {
        let handle = handle.clone();
        async move {
            loop {
                for id in handle.shell.notify().take_unscheduled() {
                    let notify = handle.shell.notify().clone();
                    let toast_handle = handle.clone();
                    spawn(async move {
                        notify.auto_dismiss(id).await;
                        toast_handle.sync();
                    });
                }
                handle.sync();
                tokio::time::sleep(REVISION_POLL).await;
            }
        }
    });
}

#[component]
fn PagePanel(page: Page, target: Page, children: Element) -> Element {
    let is_active = page == target;
    let class_suffix = if is_active { "active" } else { "" };
    rsx! {
        section {
            id: format_args!("{}-page", target.slug()),
            class: format_args!("page {}", class_suffix),
            aria_hidden: (!is_active).to_string(),
            if is_active {
                {children}
            }
        }
    }
}

#[component]
fn AppHeader(page: Page) -> Element {
    let ui = use_ui();
    let people = ui.shell.people();

    rsx! {
        header { class: "header",
            div { class: "nav-container",
                div { class: "nav-brand",
                    i { class: "fas fa-utensils" }
                    span { "Recipe Manager" }
                }
                nav { class: "nav-menu",
                    for target in Page::ALL {
                        NavLink { page, target }
                    }
                }
                div { class: "nav-actions",
                    div { class: "people-counter",
                        button { class: "counter-btn", onclick: ui.on(Action::DecreasePeople), "-" }
                        span { class: "people-count", "{people}" }
                        button { class: "counter-btn", onclick: ui.on(Action::IncreasePeople), "+" }
                        span { class: "people-label", "people" }
                    }
                    button { class: "search-btn", title: "Search", onclick: ui.on(Action::OpenSearch),
                        i { class: "fas fa-search" }
                    }
                }
            }
        }
    }
}

#[component]
fn NavLink(page: Page, target: Page) -> Element {
    let ui = use_context::<UiHandle>();
    let class = if page == target {
        "nav-link active"
    } else {
        "nav-link"
    };
    rsx! {
        a {
            class: class,
            href: format_args!("#{}", target.slug()),
            onclick: move |ev: Event<MouseData>| {
                ev.prevent_default();
                ui.run(Action::Navigate(target));
            },
            "{target.title()}"
        }
    }
}
