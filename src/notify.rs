//! Toasts, the loading spinner, modals and confirmation prompts.

use crate::events::Deletion;
use crate::state::{Revision, Shared};
use std::time::Duration;

pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Error,
    Warning,
}

impl Severity {
    pub fn class(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Severity::Success => "✓",
            Severity::Error => "!",
            Severity::Warning => "⚠",
        }
    }
}

pub type ToastId = u64;

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub severity: Severity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModalId {
    RecipeEditor,
    RecipeDetails,
    CategoryEditor,
    ShoppingListEditor,
    ShoppingListDetails,
    ExportOptions,
    RecipeSelection,
    MealEditor,
    Confirm,
    Search,
}

/// A yes/no prompt waiting for the user.
#[derive(Clone, Debug, PartialEq)]
pub struct Confirmation {
    pub message: String,
    pub target: Deletion,
}

#[derive(Default)]
struct NotifyState {
    loading_depth: usize,
    toasts: Vec<Toast>,
    next_toast: ToastId,
    unscheduled: Vec<ToastId>,
    open_modals: Vec<ModalId>,
    confirmation: Option<Confirmation>,
}

#[derive(Clone)]
pub struct NotificationCenter {
    state: Shared<NotifyState>,
}

impl NotificationCenter {
    pub fn new(revision: Revision) -> Self {
        Self {
            state: Shared::new(NotifyState::default(), revision),
        }
    }

    /// The app-wide change counter; controllers build their own cells on it.
    pub fn revision(&self) -> Revision {
        self.state.revision().clone()
    }

    // ---------------
    // Loading spinner
    // ---------------

    /// Show the spinner until the returned guard drops.
    pub fn loading(&self) -> LoadingGuard {
        self.state.update(|s| s.loading_depth += 1);
        LoadingGuard {
            center: self.clone(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state.read(|s| s.loading_depth > 0)
    }

    // ---------------
    // Toasts
    // ---------------

    pub fn show_toast(&self, message: impl Into<String>, severity: Severity) -> ToastId {
        let message = message.into();
        match severity {
            Severity::Success => tracing::info!(toast = %message),
            Severity::Warning => tracing::warn!(toast = %message),
            Severity::Error => tracing::error!(toast = %message),
        }
        self.state.update(|s| {
            let id = s.next_toast;
            s.next_toast += 1;
            s.toasts.push(Toast {
                id,
                message,
                severity,
            });
            s.unscheduled.push(id);
            id
        })
    }

    pub fn success(&self, message: impl Into<String>) -> ToastId {
        self.show_toast(message, Severity::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> ToastId {
        self.show_toast(message, Severity::Error)
    }

    pub fn warning(&self, message: impl Into<String>) -> ToastId {
        self.show_toast(message, Severity::Warning)
    }

    /// Remove one toast. Returns false when it was already gone.
    pub fn dismiss(&self, id: ToastId) -> bool {
        self.state.update(|s| {
            let before = s.toasts.len();
            s.toasts.retain(|toast| toast.id != id);
            s.toasts.len() != before
        })
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.state.read(|s| s.toasts.clone())
    }

    /// Toasts that have no dismiss timer yet. Draining hands them to the
    /// caller, which is expected to run [`Self::auto_dismiss`] for each.
    pub fn take_unscheduled(&self) -> Vec<ToastId> {
        if self.state.read(|s| s.unscheduled.is_empty()) {
            return Vec::new();
        }
        self.state.update(|s| std::mem::take(&mut s.unscheduled))
    }

    pub async fn auto_dismiss(&self, id: ToastId) {
        tokio::time::sleep(TOAST_DURATION).await;
        self.dismiss(id);
    }

    // ---------------
    // Modals
    // ---------------

    pub fn open_modal(&self, id: ModalId) {
        self.state.update(|s| {
            if !s.open_modals.contains(&id) {
                s.open_modals.push(id);
            }
        });
    }

    pub fn close_modal(&self, id: ModalId) {
        self.state.update(|s| s.open_modals.retain(|open| *open != id));
    }

    pub fn is_open(&self, id: ModalId) -> bool {
        self.state.read(|s| s.open_modals.contains(&id))
    }

    /// Page scroll stays blocked while any modal is open.
    pub fn scroll_locked(&self) -> bool {
        self.state.read(|s| !s.open_modals.is_empty())
    }

    // ---------------
    // Confirmation prompt
    // ---------------

    pub fn ask_confirm(&self, message: impl Into<String>, target: Deletion) {
        let confirmation = Confirmation {
            message: message.into(),
            target,
        };
        self.state.update(|s| s.confirmation = Some(confirmation));
        self.open_modal(ModalId::Confirm);
    }

    pub fn confirmation(&self) -> Option<Confirmation> {
        self.state.read(|s| s.confirmation.clone())
    }

    /// Close the prompt and hand back what it was guarding.
    pub fn take_confirmation(&self) -> Option<Confirmation> {
        let taken = self.state.update(|s| s.confirmation.take());
        self.close_modal(ModalId::Confirm);
        taken
    }
}

/// Clears the loading flag on drop, however the operation ended.
pub struct LoadingGuard {
    center: NotificationCenter,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.center
            .state
            .update(|s| s.loading_depth = s.loading_depth.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center() -> NotificationCenter {
        NotificationCenter::new(Revision::new())
    }

    #[test]
    fn toasts_coexist_and_dismiss_independently() {
        let center = center();
        let first = center.success("Saved");
        let second = center.error("Oops");
        assert_eq!(center.toasts().len(), 2);

        assert!(center.dismiss(first));
        let remaining = center.toasts();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second);
        assert!(!center.dismiss(first));
    }

    #[test]
    fn unscheduled_toasts_drain_once() {
        let center = center();
        let id = center.warning("Careful");
        assert_eq!(center.take_unscheduled(), vec![id]);
        assert!(center.take_unscheduled().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn toast_expires_after_three_seconds() {
        let center = center();
        let id = center.success("Done");
        let timer = {
            let center = center.clone();
            tokio::spawn(async move { center.auto_dismiss(id).await })
        };

        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert_eq!(center.toasts().len(), 1);
        tokio::time::sleep(Duration::from_millis(200)).await;
        timer.await.expect("timer task");
        assert!(center.toasts().is_empty());
    }

    #[test]
    fn loading_guard_nests() {
        let center = center();
        assert!(!center.is_loading());
        let outer = center.loading();
        {
            let _inner = center.loading();
            assert!(center.is_loading());
        }
        assert!(center.is_loading());
        drop(outer);
        assert!(!center.is_loading());
    }

    #[test]
    fn modals_lock_scroll_while_open() {
        let center = center();
        center.open_modal(ModalId::RecipeEditor);
        center.open_modal(ModalId::Confirm);
        assert!(center.scroll_locked());
        center.close_modal(ModalId::Confirm);
        assert!(center.scroll_locked());
        center.close_modal(ModalId::RecipeEditor);
        assert!(!center.scroll_locked());
    }

    #[test]
    fn confirmation_round_trip() {
        let center = center();
        center.ask_confirm("Delete?", Deletion::Recipe(4));
        assert!(center.is_open(ModalId::Confirm));
        let taken = center.take_confirmation().expect("pending prompt");
        assert_eq!(taken.target, Deletion::Recipe(4));
        assert!(!center.is_open(ModalId::Confirm));
        assert!(center.take_confirmation().is_none());
    }
}
