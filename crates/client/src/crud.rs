use std::future::Future;

use tracing::warn;

use mes_domain::Page;

use crate::error::{ClientError, ClientResult};
use crate::notice::Notice;

/// Create/edit form state of a list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState<T> {
    /// No form open.
    Closed,
    /// Blank form for a new entity.
    Creating,
    /// Form pre-filled from an existing entity.
    Editing(T),
}

/// Headless state of a CRUD list screen.
///
/// Loads replace the rows wholesale. Failed loads degrade to an empty list and
/// an error notice rather than surfacing an error.
#[derive(Debug)]
pub struct CrudList<T> {
    items: Vec<T>,
    total_elements: usize,
    editor: EditorState<T>,
    pending_delete: Option<T>,
    notices: Vec<Notice>,
}

impl<T> Default for CrudList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_elements: 0,
            editor: EditorState::Closed,
            pending_delete: None,
            notices: Vec::new(),
        }
    }
}

impl<T: Clone> CrudList<T> {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces rows with the result of a full list fetch.
    pub async fn reload<Fut>(&mut self, fetch: Fut)
    where
        Fut: Future<Output = ClientResult<Vec<T>>>,
    {
        match fetch.await {
            Ok(items) => {
                self.total_elements = items.len();
                self.items = items;
            }
            Err(error) => self.degrade(&error),
        }
    }

    /// Replaces rows with one fetched page.
    pub async fn reload_page<Fut>(&mut self, fetch: Fut)
    where
        Fut: Future<Output = ClientResult<Page<T>>>,
    {
        match fetch.await {
            Ok(page) => {
                self.total_elements = page.total_elements;
                self.items = page.content;
            }
            Err(error) => self.degrade(&error),
        }
    }

    /// Returns the loaded rows.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Returns the unpaged row count of the last load.
    pub fn total_elements(&self) -> usize {
        self.total_elements
    }

    /// Returns the form state.
    pub fn editor(&self) -> &EditorState<T> {
        &self.editor
    }

    /// Opens a blank form.
    pub fn open_create(&mut self) {
        self.editor = EditorState::Creating;
    }

    /// Opens a form for an existing row.
    pub fn open_edit(&mut self, item: T) {
        self.editor = EditorState::Editing(item);
    }

    /// Closes the form without saving.
    pub fn close_editor(&mut self) {
        self.editor = EditorState::Closed;
    }

    /// Asks for delete confirmation.
    pub fn request_delete(&mut self, item: T) {
        self.pending_delete = Some(item);
    }

    /// Drops a pending delete.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Returns the row awaiting confirmation.
    pub fn pending_delete(&self) -> Option<&T> {
        self.pending_delete.as_ref()
    }

    /// Confirms and takes the pending delete.
    pub fn take_pending_delete(&mut self) -> Option<T> {
        self.pending_delete.take()
    }

    /// Runs a mutation.
    ///
    /// On success the form closes and a success notice is recorded. On failure
    /// the form stays open, the error notice carries the server message and the
    /// error is returned so the caller can skip its reload.
    pub async fn submit<R, Fut>(&mut self, action: Fut, success_message: &str) -> ClientResult<R>
    where
        Fut: Future<Output = ClientResult<R>>,
    {
        match action.await {
            Ok(value) => {
                self.editor = EditorState::Closed;
                self.notices.push(Notice::success(success_message));
                Ok(value)
            }
            Err(error) => {
                self.notices.push(Notice::error(&error));
                Err(error)
            }
        }
    }

    /// Drains pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn degrade(&mut self, error: &ClientError) {
        warn!(error = %error, "list load failed");
        self.items.clear();
        self.total_elements = 0;
        self.notices.push(Notice::error(error));
    }
}

/// Rejects a form whose required fields are blank, naming the first one.
pub fn require_fields(fields: &[(&str, &str)]) -> ClientResult<()> {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((label, _)) => Err(ClientError::Validation(format!("{label} is required"))),
        None => Ok(()),
    }
}
