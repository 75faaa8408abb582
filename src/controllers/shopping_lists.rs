use super::form::{LineItemFields, format_quantity};
use super::report_failure;
use crate::api::{ApiClient, Download, with_query};
use crate::events::{Deletion, ExportFormat};
use crate::notify::{ModalId, NotificationCenter};
use crate::state::Shared;
use crate::types::{LineItem, ShoppingItem, ShoppingList, ShoppingListId};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const PREVIEW_ITEMS: usize = 3;

const DELETE_PROMPT: &str =
    "Are you sure you want to delete this shopping list? This action cannot be undone.";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShoppingListDraft {
    pub name: String,
    pub items: LineItemFields,
}

impl ShoppingListDraft {
    pub fn from_list(list: &ShoppingList) -> Self {
        Self {
            name: list.name.clone(),
            items: LineItemFields::from_rows(
                list.items
                    .iter()
                    .map(|item| (item.name.as_str(), item.quantity, item.unit.as_str())),
            ),
        }
    }

    pub fn payload(&self) -> ShoppingListPayload {
        ShoppingListPayload {
            name: self.name.trim().to_string(),
            items: self.items.collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShoppingListPayload {
    pub name: String,
    pub items: Vec<LineItem>,
}

/// First few items of a card plus how many were left out.
#[derive(Clone, Debug, PartialEq)]
pub struct ListPreview {
    pub items: Vec<ShoppingItem>,
    pub more: usize,
}

impl ListPreview {
    pub fn more_label(&self) -> Option<String> {
        (self.more > 0).then(|| format!("+{} more items", self.more))
    }
}

pub fn preview_items(list: &ShoppingList) -> ListPreview {
    ListPreview {
        items: list.items.iter().take(PREVIEW_ITEMS).cloned().collect(),
        more: list.items.len().saturating_sub(PREVIEW_ITEMS),
    }
}

/// One `- 2 kg Flour` line per item, for the clipboard.
pub fn as_plain_text(list: &ShoppingList) -> String {
    let mut text = format!("{}\n", list.name);
    for item in &list.items {
        text.push_str(&format!(
            "- {} {} {}\n",
            format_quantity(item.quantity),
            item.unit,
            item.name
        ));
    }
    text
}

/// Write an export under `dir`, keeping only the final path component of
/// the server-supplied name.
pub fn save_download(dir: &Path, download: &Download) -> std::io::Result<PathBuf> {
    let name = Path::new(&download.filename)
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("shopping-list"));
    std::fs::create_dir_all(dir)?;
    let path = dir.join(name);
    std::fs::write(&path, &download.bytes)?;
    Ok(path)
}

fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(std::env::temp_dir)
}

#[derive(Default)]
struct ListsState {
    lists: Vec<ShoppingList>,
    editing: Option<ShoppingListId>,
    draft: ShoppingListDraft,
    details: Option<ShoppingList>,
    checked: BTreeSet<usize>,
    export_target: Option<ShoppingListId>,
    download_dir: Option<PathBuf>,
}

#[derive(Clone)]
pub struct ShoppingListsController {
    api: ApiClient,
    notify: NotificationCenter,
    state: Shared<ListsState>,
}

impl ShoppingListsController {
    pub fn new(api: ApiClient, notify: NotificationCenter) -> Self {
        let state = Shared::new(ListsState::default(), notify.revision());
        Self { api, notify, state }
    }

    pub fn lists(&self) -> Vec<ShoppingList> {
        self.state.read(|s| s.lists.clone())
    }

    pub fn draft(&self) -> ShoppingListDraft {
        self.state.read(|s| s.draft.clone())
    }

    pub fn editing(&self) -> Option<ShoppingListId> {
        self.state.read(|s| s.editing)
    }

    pub fn details(&self) -> Option<ShoppingList> {
        self.state.read(|s| s.details.clone())
    }

    pub fn export_target(&self) -> Option<ShoppingListId> {
        self.state.read(|s| s.export_target)
    }

    /// Where exports land. Defaults to the user's download directory.
    pub fn set_download_dir(&self, dir: PathBuf) {
        self.state.update(|s| s.download_dir = Some(dir));
    }

    pub fn download_dir(&self) -> PathBuf {
        self.state
            .read(|s| s.download_dir.clone())
            .unwrap_or_else(default_download_dir)
    }

    pub async fn load(&self) {
        let _loading = self.notify.loading();
        match self.api.get::<Vec<ShoppingList>>("/api/shopping-lists").await {
            Ok(lists) => self.state.update(|s| s.lists = lists),
            Err(err) => report_failure(&self.notify, "Error loading shopping lists", &err),
        }
    }

    // ---------------
    // Editor
    // ---------------

    pub fn open_editor(&self, list: Option<&ShoppingList>) {
        let draft = list.map(ShoppingListDraft::from_list).unwrap_or_default();
        let editing = list.map(|l| l.id);
        self.state.update(|s| {
            s.draft = draft;
            s.editing = editing;
        });
        self.notify.open_modal(ModalId::ShoppingListEditor);
    }

    pub fn close_editor(&self) {
        self.state.update(|s| s.editing = None);
        self.notify.close_modal(ModalId::ShoppingListEditor);
    }

    pub fn update_draft(&self, edit: impl FnOnce(&mut ShoppingListDraft)) {
        self.state.update(|s| edit(&mut s.draft));
    }

    pub async fn edit(&self, id: ShoppingListId) {
        match self
            .api
            .get::<ShoppingList>(&format!("/api/shopping-lists/{id}"))
            .await
        {
            Ok(list) => self.open_editor(Some(&list)),
            Err(err) => report_failure(&self.notify, "Error loading shopping list", &err),
        }
    }

    pub async fn save(&self) -> bool {
        let (payload, editing) = self.state.read(|s| (s.draft.payload(), s.editing));
        if payload.name.is_empty() {
            self.notify.error("Please fill in all required fields");
            return false;
        }

        let _loading = self.notify.loading();
        let result = match editing {
            Some(id) => {
                self.api
                    .put::<_, serde_json::Value>(&format!("/api/shopping-lists/{id}"), &payload)
                    .await
            }
            None => {
                self.api
                    .post::<_, serde_json::Value>("/api/shopping-lists", &payload)
                    .await
            }
        };

        match result {
            Ok(_) => {
                self.notify.success(if editing.is_some() {
                    "Shopping list updated successfully!"
                } else {
                    "Shopping list created successfully!"
                });
                self.close_editor();
                self.load().await;
                true
            }
            Err(err) => {
                report_failure(&self.notify, "Error saving shopping list", &err);
                false
            }
        }
    }

    // ---------------
    // Details checklist
    // ---------------

    pub async fn view(&self, id: ShoppingListId) {
        match self
            .api
            .get::<ShoppingList>(&format!("/api/shopping-lists/{id}"))
            .await
        {
            Ok(list) => {
                self.state.update(|s| {
                    s.details = Some(list);
                    s.checked.clear();
                });
                self.notify.open_modal(ModalId::ShoppingListDetails);
            }
            Err(err) => report_failure(
                &self.notify,
                "Error loading shopping list details",
                &err,
            ),
        }
    }

    pub fn close_details(&self) {
        self.state.update(|s| {
            s.details = None;
            s.checked.clear();
        });
        self.notify.close_modal(ModalId::ShoppingListDetails);
    }

    /// Tick marks are local to the open details pane and never saved.
    pub fn toggle_item(&self, index: usize) {
        self.state.update(|s| {
            if !s.checked.remove(&index) {
                s.checked.insert(index);
            }
        });
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.state.read(|s| s.checked.contains(&index))
    }

    // ---------------
    // Delete
    // ---------------

    pub fn request_delete(&self, id: ShoppingListId) {
        self.notify
            .ask_confirm(DELETE_PROMPT, Deletion::ShoppingList(id));
    }

    pub async fn delete(&self, id: ShoppingListId) -> bool {
        let _loading = self.notify.loading();
        match self.api.delete(&format!("/api/shopping-lists/{id}")).await {
            Ok(()) => {
                self.notify.success("Shopping list deleted successfully!");
                self.load().await;
                true
            }
            Err(err) => {
                report_failure(&self.notify, "Error deleting shopping list", &err);
                false
            }
        }
    }

    // ---------------
    // Export
    // ---------------

    pub fn show_export_options(&self, id: ShoppingListId) {
        self.state.update(|s| s.export_target = Some(id));
        self.notify.open_modal(ModalId::ExportOptions);
    }

    pub fn close_export_options(&self) {
        self.state.update(|s| s.export_target = None);
        self.notify.close_modal(ModalId::ExportOptions);
    }

    /// Download the rendered list and store it in the download directory.
    pub async fn export(&self, id: ShoppingListId, format: ExportFormat) -> Option<PathBuf> {
        let _loading = self.notify.loading();
        let path = with_query(
            &format!("/api/shopping-lists/{id}/export"),
            &[("format", format.query())],
        );
        let download = match self.api.download(&path, &format.default_filename()).await {
            Ok(download) => download,
            Err(err) => {
                report_failure(&self.notify, "Error downloading shopping list", &err);
                return None;
            }
        };

        match save_download(&self.download_dir(), &download) {
            Ok(saved) => {
                tracing::info!(path = %saved.display(), "shopping list exported");
                self.notify.success(format!(
                    "Shopping list downloaded as {}!",
                    format.label()
                ));
                self.close_export_options();
                Some(saved)
            }
            Err(err) => {
                report_failure(&self.notify, "Error downloading shopping list", &err);
                None
            }
        }
    }
}
