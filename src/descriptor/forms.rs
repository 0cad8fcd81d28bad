//! Forms dialog
//!
//! Lists and combos collect their values from flags that may come before or
//! after the field itself, so the builder keeps a little pending state.

use serde::Serialize;

use crate::args::{self, Token, TokenCursor};

use super::{list::chunk_rows, split_values, DEFAULT_SEPARATOR};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormField {
    Entry {
        label: String,
    },
    Password {
        label: String,
    },
    Calendar {
        label: String,
    },
    List {
        label: String,
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
        show_header: bool,
    },
    Combo {
        label: String,
        options: Vec<String>,
    },
    Checkbox {
        label: String,
    },
}

impl FormField {
    pub fn label(&self) -> &str {
        match self {
            FormField::Entry { label }
            | FormField::Password { label }
            | FormField::Calendar { label }
            | FormField::List { label, .. }
            | FormField::Combo { label, .. }
            | FormField::Checkbox { label } => label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormsDescriptor {
    pub text: String,
    pub fields: Vec<FormField>,
    pub separator: String,
    pub date_format: Option<String>,
}

/// Values and header flag waiting for the next list flush.
#[derive(Default)]
struct PendingList {
    field: Option<usize>,
    values: Vec<String>,
    columns: Vec<String>,
    show_header: bool,
}

impl PendingList {
    /// Commit the pending values into the current list field, if any.
    /// Without a list field the values stay pending.
    fn flush(&mut self, fields: &mut [FormField]) {
        let Some(index) = self.field.take() else {
            return;
        };
        if let Some(FormField::List {
            columns,
            rows,
            show_header,
            ..
        }) = fields.get_mut(index)
        {
            let pending = std::mem::take(self);
            *rows = chunk_rows(pending.values, pending.columns.len());
            *columns = pending.columns;
            *show_header = pending.show_header;
        }
    }
}

pub fn build(tokens: &[Token]) -> FormsDescriptor {
    let mut descriptor = FormsDescriptor {
        text: String::new(),
        fields: Vec::new(),
        separator: DEFAULT_SEPARATOR.to_string(),
        date_format: None,
    };
    let mut list = PendingList::default();
    let mut combo_values: Vec<String> = Vec::new();
    let mut open_combo: Option<usize> = None;

    let mut cursor = TokenCursor::new(tokens);
    while let Some(flag) = cursor.next_token() {
        let fields = &mut descriptor.fields;
        match flag {
            "--add-entry" => fields.push(FormField::Entry {
                label: cursor.value(),
            }),
            "--add-password" => fields.push(FormField::Password {
                label: cursor.value(),
            }),
            "--add-calendar" => fields.push(FormField::Calendar {
                label: cursor.value(),
            }),
            "--add-list" => {
                list.flush(fields);
                fields.push(FormField::List {
                    label: cursor.value(),
                    columns: Vec::new(),
                    rows: Vec::new(),
                    show_header: false,
                });
                list.field = Some(fields.len() - 1);
            }
            "--list-values" => list.values = split_values(&cursor.value()),
            "--column-values" => list.columns = split_values(&cursor.value()),
            "--show-header" => list.show_header = true,
            "--add-combo" => {
                fields.push(FormField::Combo {
                    label: cursor.value(),
                    options: std::mem::take(&mut combo_values),
                });
                open_combo = Some(fields.len() - 1);
            }
            "--combo-values" => {
                combo_values = split_values(&cursor.value());
                if let Some(index) = open_combo.take() {
                    if let Some(FormField::Combo { options, .. }) = fields.get_mut(index) {
                        options.append(&mut combo_values);
                    }
                }
            }
            "--add-checkbox" => fields.push(FormField::Checkbox {
                label: cursor.value(),
            }),
            "--text" => descriptor.text = cursor.value(),
            "--separator" => descriptor.separator = cursor.value(),
            "--forms-date-format" => descriptor.date_format = Some(cursor.value()),
            other => args::unrecognized(other, &["--forms"]),
        }
    }
    list.flush(&mut descriptor.fields);

    descriptor
}
