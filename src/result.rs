//! Result extraction
//!
//! Turns how the dialog ended into the line printed on stdout and the
//! process exit code.

use tracing::{debug, warn};

use crate::descriptor::calendar::format_date;
use crate::descriptor::{DialogDescriptor, FormField, FormsDescriptor, ListDescriptor};
use crate::error::ResultError;
use crate::host::{Answer, FieldAnswer};

/// How the user left the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Accepted(Answer),
    Rejected,
}

/// Values to print, joined by a separator on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub values: Vec<String>,
    pub separator: String,
}

impl Output {
    fn single(value: impl Into<String>) -> Self {
        Self {
            values: vec![value.into()],
            separator: String::new(),
        }
    }

    fn joined(values: Vec<String>, separator: &str) -> Self {
        Self {
            values,
            separator: separator.to_string(),
        }
    }

    pub fn render(&self) -> String {
        format!("{}\n", self.values.join(&self.separator))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResult {
    /// Accepted; dialogs without a value carry no output
    Accepted(Option<Output>),
    Rejected { kill_parent: bool },
}

/// Final process status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exit {
    pub code: i32,
    pub stdout: Option<String>,
    /// Send SIGTERM to the parent process before exiting
    pub kill_parent: bool,
}

impl Exit {
    /// Exit 0 without output: timeouts, auto-close, finished notifications.
    pub fn silent() -> Self {
        Self {
            code: 0,
            stdout: None,
            kill_parent: false,
        }
    }

    pub fn failure() -> Self {
        Self {
            code: 1,
            stdout: None,
            kill_parent: false,
        }
    }
}

impl DialogResult {
    pub fn into_exit(self) -> Exit {
        match self {
            DialogResult::Accepted(output) => Exit {
                code: 0,
                stdout: output.map(|o| o.render()),
                kill_parent: false,
            },
            DialogResult::Rejected { kill_parent } => Exit {
                code: 1,
                stdout: None,
                kill_parent,
            },
        }
    }
}

/// Build the result for `descriptor` from the way the dialog ended.
pub fn extract(descriptor: &DialogDescriptor, outcome: Outcome) -> Result<DialogResult, ResultError> {
    let answer = match outcome {
        Outcome::Rejected => {
            let kill_parent = matches!(descriptor, DialogDescriptor::Progress(p) if p.auto_kill);
            return Ok(DialogResult::Rejected { kill_parent });
        }
        Outcome::Accepted(answer) => answer,
    };

    let mismatch = |answer: &Answer| ResultError {
        mode: descriptor.mode().name(),
        answer: answer.kind(),
    };

    let output = match (descriptor, answer) {
        (DialogDescriptor::Message(_) | DialogDescriptor::Progress(_) | DialogDescriptor::Notification(_), _) => {
            None
        }
        (DialogDescriptor::TextInfo(text), answer) if !text.editable => {
            debug!("Read-only text accepted with {}", answer.kind());
            None
        }
        (DialogDescriptor::TextInfo(_), Answer::Text(text)) => Some(Output::single(text)),
        (DialogDescriptor::Calendar(calendar), Answer::Date(date)) => {
            Some(Output::single(format_date(date, calendar.date_format.as_deref())))
        }
        (DialogDescriptor::Entry(_), Answer::Text(text)) => Some(Output::single(text)),
        (DialogDescriptor::Password(password), Answer::Credentials { username, password: secret }) => {
            let line = if password.username {
                format!("{}|{}", username.unwrap_or_default(), secret)
            } else {
                secret
            };
            Some(Output::single(line))
        }
        (DialogDescriptor::FileSelection(selection), Answer::Paths(paths)) => {
            let values = paths.iter().map(|p| p.display().to_string()).collect();
            Some(Output::joined(values, &selection.separator))
        }
        (DialogDescriptor::ColorSelection(_), Answer::Color(color)) => Some(Output::single(color.to_string())),
        (DialogDescriptor::Scale(_), Answer::Value(value)) => Some(Output::single(value.to_string())),
        (DialogDescriptor::List(list), Answer::Rows(rows)) => Some(list_output(list, &rows)),
        (DialogDescriptor::Forms(forms), Answer::Form(fields)) => Some(forms_output(forms, fields)),
        (_, answer) => return Err(mismatch(&answer)),
    };

    Ok(DialogResult::Accepted(output))
}

fn list_output(list: &ListDescriptor, rows: &[usize]) -> Output {
    let column = list.result_column();
    let values = rows
        .iter()
        .map(|&row| {
            list.rows
                .get(row)
                .and_then(|cells| cells.get(column))
                .cloned()
                .unwrap_or_default()
        })
        .collect();
    Output::joined(values, &list.separator)
}

fn forms_output(forms: &FormsDescriptor, answers: Vec<FieldAnswer>) -> Output {
    if answers.len() != forms.fields.len() {
        warn!("Form has {} fields but {} answers", forms.fields.len(), answers.len());
    }
    let values = answers
        .into_iter()
        .enumerate()
        .map(|(i, answer)| match answer {
            FieldAnswer::Text(text) | FieldAnswer::Choice(text) => text,
            FieldAnswer::Date(date) => format_date(date, forms.date_format.as_deref()),
            FieldAnswer::Checked(checked) => checked.to_string(),
            FieldAnswer::Rows(selected) => match forms.fields.get(i) {
                Some(FormField::List { rows, .. }) => selected
                    .iter()
                    .filter_map(|&row| rows.get(row))
                    .map(|cells| cells.concat())
                    .collect(),
                _ => String::new(),
            },
        })
        .collect();
    Output::joined(values, &forms.separator)
}

/// The line printed for an intermediate scale value, if the dialog asked
/// for partial output.
pub fn partial_line(descriptor: &DialogDescriptor, value: i32) -> Option<String> {
    match descriptor {
        DialogDescriptor::Scale(scale) if scale.print_partial => Some(format!("{}\n", value)),
        _ => None,
    }
}

/// Send SIGTERM to the parent process.
#[cfg(unix)]
pub fn signal_parent() {
    // SAFETY: getppid has no preconditions; kill only sends a signal.
    let result = unsafe { libc::kill(libc::getppid(), libc::SIGTERM) };
    if result != 0 {
        warn!("Failed to signal parent process: {}", std::io::Error::last_os_error());
    }
}

#[cfg(not(unix))]
pub fn signal_parent() {
    warn!("Signalling the parent process is not supported on this platform");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::tokenize;
    use crate::descriptor::{self, Rgb};
    use crate::dispatch::{dispatch, Dispatch};
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn describe(args: &[&str]) -> DialogDescriptor {
        match dispatch(&tokenize(args.iter().copied())).unwrap() {
            Dispatch::Run(invocation) => descriptor::build(invocation.mode, &invocation.remaining).unwrap(),
            other => panic!("expected a dialog, got {:?}", other),
        }
    }

    fn accept(args: &[&str], answer: Answer) -> Exit {
        extract(&describe(args), Outcome::Accepted(answer)).unwrap().into_exit()
    }

    fn stdout(args: &[&str], answer: Answer) -> String {
        accept(args, answer).stdout.unwrap()
    }

    #[test]
    fn test_rejection_exits_one_silently() {
        let exit = extract(&describe(&["--entry"]), Outcome::Rejected).unwrap().into_exit();
        assert_eq!(exit, Exit { code: 1, stdout: None, kill_parent: false });
    }

    #[test]
    fn test_auto_kill_signals_parent_on_rejection() {
        let exit = extract(&describe(&["--progress", "--auto-kill"]), Outcome::Rejected)
            .unwrap()
            .into_exit();
        assert!(exit.kill_parent);
        assert_eq!(exit.code, 1);
    }

    #[test]
    fn test_valueless_modes_print_nothing() {
        for args in [&["--info"][..], &["--question"], &["--progress"], &["--notification"], &["--text-info"]] {
            let exit = accept(args, Answer::Acknowledged);
            assert_eq!(exit, Exit::silent(), "{:?}", args);
        }
    }

    #[test]
    fn test_editable_text_prints_everything() {
        let out = stdout(&["--text-info", "--editable"], Answer::Text("a\nb".into()));
        assert_eq!(out, "a\nb\n");
    }

    #[test]
    fn test_calendar_uses_date_format() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 24).unwrap();
        assert_eq!(stdout(&["--calendar", "--date-format", "%d.%m.%Y"], Answer::Date(date)), "24.12.2023\n");
        assert_eq!(stdout(&["--calendar"], Answer::Date(date)), format!("{}\n", format_date(date, None)));
    }

    #[test]
    fn test_password_with_and_without_username() {
        let credentials = || Answer::Credentials {
            username: Some("me".into()),
            password: "pw".into(),
        };
        assert_eq!(stdout(&["--password", "--username"], credentials()), "me|pw\n");
        assert_eq!(stdout(&["--password"], credentials()), "pw\n");
    }

    #[test]
    fn test_files_joined_by_separator() {
        let paths = Answer::Paths(vec![PathBuf::from("/a"), PathBuf::from("/b c")]);
        assert_eq!(stdout(&["--file-selection", "--multiple", "--separator", ":"], paths), "/a:/b c\n");
    }

    #[test]
    fn test_scalar_answers() {
        assert_eq!(stdout(&["--entry"], Answer::Text("typed".into())), "typed\n");
        assert_eq!(stdout(&["--scale"], Answer::Value(-4)), "-4\n");
        assert_eq!(
            stdout(&["--color-selection"], Answer::Color(Rgb { r: 255, g: 0, b: 16 })),
            "#ff0010\n"
        );
    }

    #[test]
    fn test_list_prints_first_column_of_selection() {
        let args = ["--list", "--multiple", "--column", "Id", "--column", "Name", "1", "one", "2", "two"];
        assert_eq!(stdout(&args, Answer::Rows(vec![0, 1])), "1|2\n");
        assert_eq!(stdout(&args, Answer::Rows(vec![])), "\n");
    }

    #[test]
    fn test_checklist_prints_second_column() {
        let args = ["--list", "--checklist", "--column", "", "--column", "Fruit", "FALSE", "apple", "TRUE", "pear"];
        assert_eq!(stdout(&args, Answer::Rows(vec![1])), "pear\n");
    }

    #[test]
    fn test_forms_values_in_field_order() {
        let args = [
            "--forms", "--add-entry", "Name", "--add-list", "L", "--column-values", "A|B", "--list-values",
            "a1|b1|a2|b2", "--add-combo", "C", "--combo-values", "x|y", "--add-checkbox", "Ok?",
            "--add-calendar", "When", "--forms-date-format", "%Y",
        ];
        let answer = Answer::Form(vec![
            FieldAnswer::Text("Ann".into()),
            FieldAnswer::Rows(vec![1]),
            FieldAnswer::Choice("y".into()),
            FieldAnswer::Checked(false),
            FieldAnswer::Date(NaiveDate::from_ymd_opt(2020, 2, 2).unwrap()),
        ]);
        assert_eq!(stdout(&args, answer), "Ann|a2b2|y|false|2020\n");
    }

    #[test]
    fn test_mismatched_answer_is_an_error() {
        let err = extract(&describe(&["--scale"]), Outcome::Accepted(Answer::Text("x".into()))).unwrap_err();
        assert_eq!(err, ResultError { mode: "scale", answer: "text" });
    }

    #[test]
    fn test_partial_line() {
        assert_eq!(partial_line(&describe(&["--scale", "--print-partial"]), 7).as_deref(), Some("7\n"));
        assert_eq!(partial_line(&describe(&["--scale"]), 7), None);
    }
}
