//! List dialog and the checklist model behind radio lists

use serde::Serialize;
use tracing::warn;

use crate::args::{self, Token, TokenCursor};
use crate::error::ConfigError;

use super::DEFAULT_SEPARATOR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    Single,
    Multiple,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListDescriptor {
    pub text: String,
    pub columns: Vec<String>,
    pub hidden_columns: Vec<usize>,
    pub selection: Selection,
    pub rows: Vec<Vec<String>>,
    pub editable: bool,
    /// Rows carry a check mark in the first column
    pub checkable: bool,
    /// At most one row checked at a time (radio list)
    pub exclusive: bool,
    /// First cell of each row names an image file
    pub images: bool,
    pub hide_header: bool,
    pub separator: String,
}

impl ListDescriptor {
    /// Cell reported for a selected or checked row.
    pub fn result_column(&self) -> usize {
        usize::from(self.checkable)
    }
}

pub fn build(tokens: &[Token]) -> Result<ListDescriptor, ConfigError> {
    let mut descriptor = ListDescriptor {
        text: String::new(),
        columns: Vec::new(),
        hidden_columns: Vec::new(),
        selection: Selection::Single,
        rows: Vec::new(),
        editable: false,
        checkable: false,
        exclusive: false,
        images: false,
        hide_header: false,
        separator: DEFAULT_SEPARATOR.to_string(),
    };
    let mut values = Vec::new();

    let mut cursor = TokenCursor::new(tokens);
    while let Some(flag) = cursor.next_token() {
        match flag {
            "--text" => descriptor.text = cursor.value(),
            "--multiple" => descriptor.selection = Selection::Multiple,
            "--column" => descriptor.columns.push(cursor.value()),
            "--editable" => descriptor.editable = true,
            "--hide-header" => descriptor.hide_header = true,
            "--separator" => descriptor.separator = cursor.value(),
            "--hide-column" => descriptor
                .hidden_columns
                .push(cursor.unsigned("--hide-column")?),
            "--print-column" => {
                let column = cursor.value();
                warn!("--print-column {} is not supported, printing the default column", column);
            }
            "--checklist" => {
                descriptor.selection = Selection::None;
                descriptor.checkable = true;
            }
            "--radiolist" => {
                descriptor.selection = Selection::None;
                descriptor.checkable = true;
                descriptor.exclusive = true;
            }
            "--imagelist" => descriptor.images = true,
            other if other.starts_with("--") => args::unrecognized(other, &["--list"]),
            value => values.push(value.to_string()),
        }
    }

    if descriptor.checkable {
        descriptor.editable = false;
    }
    descriptor.rows = chunk_rows(values, descriptor.columns.len());

    Ok(descriptor)
}

/// Group a flat value list into rows of `max(columns, 1)` cells. The last
/// row keeps whatever remains.
pub fn chunk_rows(values: Vec<String>, columns: usize) -> Vec<Vec<String>> {
    values
        .chunks(columns.max(1))
        .map(|row| row.to_vec())
        .collect()
}

/// Check state of a checkable list.
///
/// In exclusive mode, checking a row unchecks all others. Unchecking the
/// siblings fires the same change handler again, so the handler carries
/// an in-progress flag and ignores the changes it causes itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistModel {
    checked: Vec<bool>,
    exclusive: bool,
    toggling: bool,
}

impl ChecklistModel {
    pub fn new(rows: usize, exclusive: bool) -> Self {
        Self {
            checked: vec![false; rows],
            exclusive,
            toggling: false,
        }
    }

    pub fn is_checked(&self, row: usize) -> bool {
        self.checked.get(row).copied().unwrap_or(false)
    }

    pub fn set_checked(&mut self, row: usize, checked: bool) {
        let Some(state) = self.checked.get_mut(row) else {
            return;
        };
        if *state == checked {
            return;
        }
        *state = checked;
        self.item_changed(row);
    }

    pub fn toggle(&mut self, row: usize) {
        let checked = !self.is_checked(row);
        self.set_checked(row, checked);
    }

    fn item_changed(&mut self, row: usize) {
        if !self.exclusive || self.toggling {
            return;
        }
        self.toggling = true;
        for other in 0..self.checked.len() {
            if other != row {
                self.set_checked(other, false);
            }
        }
        self.toggling = false;
    }

    /// Indices of checked rows, in row order.
    pub fn checked_rows(&self) -> Vec<usize> {
        self.checked
            .iter()
            .enumerate()
            .filter_map(|(i, checked)| checked.then_some(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::tokenize;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_chunk_rows_short_last_row() {
        let rows = chunk_rows(strings(&["a", "b", "c", "d", "e"]), 2);
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"], vec!["e"]]);
        let flat: Vec<String> = rows.into_iter().flatten().collect();
        assert_eq!(flat, strings(&["a", "b", "c", "d", "e"]));
    }

    #[test]
    fn test_chunk_rows_without_columns() {
        let rows = chunk_rows(strings(&["a", "b"]), 0);
        assert_eq!(rows, vec![vec!["a"], vec!["b"]]);
        assert!(chunk_rows(Vec::new(), 3).is_empty());
    }

    #[test]
    fn test_checklist_is_never_editable() {
        let tokens = tokenize(["--list", "--editable", "--radiolist", "--column", "x", "--column", "y", "FALSE", "a"]);
        let list = build(&tokens).unwrap();
        assert!(list.checkable && list.exclusive && !list.editable);
        assert_eq!(list.selection, Selection::None);
        assert_eq!(list.result_column(), 1);
    }

    #[test]
    fn test_flags_and_unknowns() {
        let tokens = tokenize([
            "--list", "--multiple", "--separator=,", "--hide-column", "2", "--print-column", "ALL", "--bogus", "v",
        ]);
        let list = build(&tokens).unwrap();
        assert_eq!(list.selection, Selection::Multiple);
        assert_eq!(list.separator, ",");
        assert_eq!(list.hidden_columns, vec![2]);
        // --print-column consumed "ALL", --bogus is not a value
        assert_eq!(list.rows, vec![vec!["v"]]);
    }

    #[test]
    fn test_hide_column_must_be_numeric() {
        assert!(build(&tokenize(["--hide-column", "two"])).is_err());
    }

    #[test]
    fn test_exclusive_checklist_keeps_one_checked() {
        let mut model = ChecklistModel::new(3, true);
        model.set_checked(0, true);
        model.set_checked(2, true);
        assert_eq!(model.checked_rows(), vec![2]);
        model.toggle(1);
        assert_eq!(model.checked_rows(), vec![1]);
        model.toggle(1);
        assert!(model.checked_rows().is_empty());
    }

    #[test]
    fn test_plain_checklist_allows_many() {
        let mut model = ChecklistModel::new(3, false);
        model.set_checked(0, true);
        model.set_checked(2, true);
        model.set_checked(7, true);
        assert_eq!(model.checked_rows(), vec![0, 2]);
    }
}
