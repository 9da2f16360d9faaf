//! Per-screen state for the admin CRUD pages.
//!
//! Every screen is server-rendered from two pieces of state: the result of
//! its list read, and which dialog (if any) is open. The dialog is driven by
//! query parameters, so `?dialog=edit&id=…` is a linkable URL.

use std::fmt::Display;

use serde::Deserialize;

/// Outcome of a screen's list read.
#[derive(Debug, Clone)]
pub enum ListState<T> {
    Loaded(Vec<T>),
    Errored(String),
}

impl<T> ListState<T> {
    /// Build from a read result, logging failures.
    pub fn from_result<E: Display>(result: Result<Vec<T>, E>, what: &str) -> Self {
        match result {
            Ok(items) => Self::Loaded(items),
            Err(e) => {
                tracing::error!("Failed to fetch {what}: {e}");
                Self::Errored(e.to_string())
            }
        }
    }

    /// Loaded rows; empty when the read failed.
    #[must_use]
    pub fn items(&self) -> &[T] {
        match self {
            Self::Loaded(items) => items,
            Self::Errored(_) => &[],
        }
    }

    /// The read failure message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Loaded(_) => None,
            Self::Errored(message) => Some(message),
        }
    }

    /// Whether the read succeeded but found nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Loaded(items) if items.is_empty())
    }
}

/// Query parameters selecting the open dialog.
#[derive(Debug, Default, Deserialize)]
pub struct ScreenQuery {
    pub dialog: Option<String>,
    pub id: Option<String>,
}

/// The dialog open on top of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog<T> {
    Closed,
    /// Blank add form.
    Add,
    /// Edit form pre-populated from the row.
    Edit(T),
    /// Delete confirmation for the row.
    ConfirmDelete(T),
}

impl ScreenQuery {
    /// Resolve the requested dialog against the loaded rows.
    ///
    /// Unknown dialogs and ids that are not in the list close the dialog.
    pub fn dialog<T: Clone>(&self, items: &[T], id_of: impl Fn(&T) -> &str) -> Dialog<T> {
        let find = || {
            let id = self.id.as_deref()?;
            items.iter().find(|item| id_of(item) == id).cloned()
        };

        match self.dialog.as_deref() {
            Some("add") => Dialog::Add,
            Some("edit") => find().map_or(Dialog::Closed, Dialog::Edit),
            Some("delete") => find().map_or(Dialog::Closed, Dialog::ConfirmDelete),
            _ => Dialog::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Row {
        id: String,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: "a".to_string() },
            Row { id: "b".to_string() },
        ]
    }

    fn id_of(row: &Row) -> &str {
        &row.id
    }

    fn query(dialog: Option<&str>, id: Option<&str>) -> ScreenQuery {
        ScreenQuery {
            dialog: dialog.map(String::from),
            id: id.map(String::from),
        }
    }

    #[test]
    fn test_dialog_resolution() {
        let rows = rows();

        assert_eq!(query(None, None).dialog(&rows, id_of), Dialog::Closed);
        assert_eq!(query(Some("add"), None).dialog(&rows, id_of), Dialog::Add);
        assert_eq!(
            query(Some("edit"), Some("b")).dialog(&rows, id_of),
            Dialog::Edit(Row { id: "b".to_string() })
        );
        assert_eq!(
            query(Some("delete"), Some("a")).dialog(&rows, id_of),
            Dialog::ConfirmDelete(Row { id: "a".to_string() })
        );
    }

    #[test]
    fn test_unknown_id_closes_dialog() {
        let rows = rows();
        assert_eq!(query(Some("edit"), Some("zz")).dialog(&rows, id_of), Dialog::Closed);
        assert_eq!(query(Some("delete"), None).dialog(&rows, id_of), Dialog::Closed);
        assert_eq!(query(Some("explode"), Some("a")).dialog(&rows, id_of), Dialog::Closed);
    }

    #[test]
    fn test_list_state() {
        let loaded: ListState<u8> = ListState::from_result(Ok::<_, String>(vec![]), "rows");
        assert!(loaded.is_empty());
        assert!(loaded.error().is_none());

        let errored: ListState<u8> =
            ListState::from_result(Err("permission denied for table products"), "rows");
        assert!(!errored.is_empty());
        assert!(errored.items().is_empty());
        assert_eq!(errored.error(), Some("permission denied for table products"));
    }
}
