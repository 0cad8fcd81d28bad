//! Usage text
//!
//! `-h`, `--help` and `--help-<category>` print option tables; `--version`
//! and `--about` print a single line. All exit 0 without showing a dialog.

use crate::args::Token;

type Entry = (&'static str, &'static str);

struct Category {
    key: &'static str,
    heading: &'static str,
    entries: &'static [Entry],
}

const CATEGORIES: &[Category] = &[
    Category {
        key: "help",
        heading: "Help options",
        entries: &[
            ("-h, --help", "Show help options"),
            ("--help-all", "Show all help options"),
            ("--help-general", "Show general options"),
            ("--help-calendar", "Show calendar options"),
            ("--help-entry", "Show text entry options"),
            ("--help-error", "Show error options"),
            ("--help-info", "Show info options"),
            ("--help-file-selection", "Show file selection options"),
            ("--help-list", "Show list options"),
            ("--help-notification", "Show notification icon options"),
            ("--help-progress", "Show progress options"),
            ("--help-question", "Show question options"),
            ("--help-warning", "Show warning options"),
            ("--help-scale", "Show scale options"),
            ("--help-text-info", "Show text information options"),
            ("--help-color-selection", "Show color selection options"),
            ("--help-password", "Show password dialog options"),
            ("--help-forms", "Show forms dialog options"),
            ("--help-misc", "Show miscellaneous options"),
        ],
    },
    Category {
        key: "general",
        heading: "General options",
        entries: &[
            ("--title=TITLE", "Set the dialog title"),
            ("--window-icon=ICONPATH", "Set the window icon"),
            ("--width=WIDTH", "Set the width"),
            ("--height=HEIGHT", "Set the height"),
            ("--timeout=TIMEOUT", "Set dialog timeout in seconds"),
            ("--ok-label=TEXT", "Sets the label of the Ok button"),
            ("--cancel-label=TEXT", "Sets the label of the Cancel button"),
            ("--modal", "Set the modal hint"),
            ("--attach=WINDOW", "Set the parent window to attach to"),
        ],
    },
    Category {
        key: "calendar",
        heading: "Calendar options",
        entries: &[
            ("--text=TEXT", "Set the dialog text"),
            ("--day=DAY", "Set the calendar day"),
            ("--month=MONTH", "Set the calendar month"),
            ("--year=YEAR", "Set the calendar year"),
            ("--timeout=TIMEOUT", "Set dialog timeout in seconds"),
            ("--date-format=PATTERN", "Set the format for the returned date"),
        ],
    },
    Category {
        key: "entry",
        heading: "Text entry options",
        entries: &[
            ("--text=TEXT", "Set the dialog text"),
            ("--entry-text=TEXT", "Set the entry text"),
            ("--hide-text", "Hide the entry text"),
        ],
    },
    Category {
        key: "error",
        heading: "Error options",
        entries: MESSAGE_ENTRIES,
    },
    Category {
        key: "info",
        heading: "Info options",
        entries: MESSAGE_ENTRIES,
    },
    Category {
        key: "file-selection",
        heading: "File selection options",
        entries: &[
            ("--filename=FILENAME", "Set the filename"),
            ("--multiple", "Allow multiple files to be selected"),
            ("--directory", "Activate directory-only selection"),
            ("--save", "Activate save mode"),
            ("--separator=SEPARATOR", "Set output separator character"),
            ("--confirm-overwrite", "Confirm file selection if filename already exists"),
            ("--file-filter=NAME | PATTERN1 PATTERN2 ...", "Sets a filename filter"),
        ],
    },
    Category {
        key: "list",
        heading: "List options",
        entries: &[
            ("--text=TEXT", "Set the dialog text"),
            ("--column=COLUMN", "Set the column header"),
            ("--checklist", "Use check boxes for first column"),
            ("--radiolist", "Use radio buttons for first column"),
            ("--imagelist", "Use an image for first column"),
            ("--separator=SEPARATOR", "Set output separator character"),
            ("--multiple", "Allow multiple rows to be selected"),
            ("--editable", "Allow changes to text"),
            ("--print-column=NUMBER", "Print a specific column (not supported)"),
            ("--hide-column=NUMBER", "Hide a specific column"),
            ("--hide-header", "Hides the column headers"),
        ],
    },
    Category {
        key: "notification",
        heading: "Notification icon options",
        entries: &[
            ("--text=TEXT", "Set the dialog text"),
            ("--listen", "Listen for commands on stdin"),
            ("--hint=TEXT", "Set the notification hints"),
        ],
    },
    Category {
        key: "progress",
        heading: "Progress options",
        entries: &[
            ("--text=TEXT", "Set the dialog text"),
            ("--percentage=PERCENTAGE", "Set initial percentage"),
            ("--pulsate", "Pulsate progress bar"),
            ("--auto-close", "Dismiss the dialog when 100% has been reached"),
            ("--auto-kill", "Kill parent process if Cancel button is pressed"),
            ("--no-cancel", "Hide Cancel button"),
        ],
    },
    Category {
        key: "question",
        heading: "Question options",
        entries: &[
            ("--text=TEXT", "Set the dialog text"),
            ("--icon-name=ICON-NAME", "Set the dialog icon"),
            ("--no-wrap", "Do not enable text wrapping"),
            ("--no-markup", "Do not enable html markup"),
            ("--default-cancel", "Give cancel button focus by default"),
        ],
    },
    Category {
        key: "warning",
        heading: "Warning options",
        entries: MESSAGE_ENTRIES,
    },
    Category {
        key: "scale",
        heading: "Scale options",
        entries: &[
            ("--text=TEXT", "Set the dialog text"),
            ("--value=VALUE", "Set initial value"),
            ("--min-value=VALUE", "Set minimum value"),
            ("--max-value=VALUE", "Set maximum value"),
            ("--step=VALUE", "Set step size"),
            ("--print-partial", "Print partial values"),
            ("--hide-value", "Hide value"),
        ],
    },
    Category {
        key: "text-info",
        heading: "Text information options",
        entries: &[
            ("--filename=FILENAME", "Open file"),
            ("--editable", "Allow changes to text"),
            ("--font=TEXT", "Set the text font"),
            ("--checkbox=TEXT", "Enable an I read and agree checkbox"),
            ("--auto-scroll", "Auto scroll the text to the end. Only when text is captured from stdin"),
        ],
    },
    Category {
        key: "color-selection",
        heading: "Color selection options",
        entries: &[
            ("--color=VALUE", "Set the color"),
            ("--show-palette", "Show the palette"),
        ],
    },
    Category {
        key: "password",
        heading: "Password dialog options",
        entries: &[("--username", "Display the username option")],
    },
    Category {
        key: "forms",
        heading: "Forms dialog options",
        entries: &[
            ("--add-entry=Field name", "Add a new Entry in forms dialog"),
            ("--add-password=Field name", "Add a new Password Entry in forms dialog"),
            ("--add-calendar=Calendar field name", "Add a new Calendar in forms dialog"),
            ("--add-list=List field and header name", "Add a new List in forms dialog"),
            ("--list-values=List of values separated by |", "List of values for List"),
            ("--column-values=List of values separated by |", "List of values for columns"),
            ("--add-combo=Combo box field name", "Add a new combo box in forms dialog"),
            ("--combo-values=List of values separated by |", "List of values for combo box"),
            ("--show-header", "Show the columns header"),
            ("--text=TEXT", "Set the dialog text"),
            ("--separator=SEPARATOR", "Set output separator character"),
            ("--forms-date-format=PATTERN", "Set the format for the returned date"),
            ("--add-checkbox=Checkbox label", "Add a new Checkbox forms dialog"),
        ],
    },
    Category {
        key: "misc",
        heading: "Miscellaneous options",
        entries: &[("--about", "About rdialog"), ("--version", "Print version")],
    },
    Category {
        key: "application",
        heading: "Application Options",
        entries: &[
            ("--calendar", "Display calendar dialog"),
            ("--entry", "Display text entry dialog"),
            ("--error", "Display error dialog"),
            ("--info", "Display info dialog"),
            ("--file-selection", "Display file selection dialog"),
            ("--list", "Display list dialog"),
            ("--notification", "Display notification"),
            ("--progress", "Display progress indication dialog"),
            ("--question", "Display question dialog"),
            ("--warning", "Display warning dialog"),
            ("--scale", "Display scale dialog"),
            ("--text-info", "Display text information dialog"),
            ("--color-selection", "Display color selection dialog"),
            ("--password", "Display password dialog"),
            ("--forms", "Display forms dialog"),
        ],
    },
];

const MESSAGE_ENTRIES: &[Entry] = &[
    ("--text=TEXT", "Set the dialog text"),
    ("--icon-name=ICON-NAME", "Set the dialog icon"),
    ("--no-wrap", "Do not enable text wrapping"),
    ("--no-markup", "Do not enable html markup"),
];

/// What the user asked to be printed instead of a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpRequest {
    /// `-h`, `--help` or `--help-<category>`; an empty category means the overview.
    Usage(String),
    Version,
    About,
}

/// Find the first help-like token, if any.
pub fn detect(tokens: &[Token]) -> Option<HelpRequest> {
    tokens.iter().find_map(|token| match token.text.as_str() {
        "-h" | "--help" => Some(HelpRequest::Usage(String::new())),
        "--version" => Some(HelpRequest::Version),
        "--about" => Some(HelpRequest::About),
        text => text
            .strip_prefix("--help-")
            .map(|category| HelpRequest::Usage(category.to_string())),
    })
}

pub fn render(request: &HelpRequest) -> String {
    match request {
        HelpRequest::Version => format!("{}\n", env!("CARGO_PKG_VERSION")),
        HelpRequest::About => format!(
            "rdialog {} - {}\n",
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_DESCRIPTION")
        ),
        HelpRequest::Usage(category) if category == "all" => {
            CATEGORIES.iter().map(render_category).collect()
        }
        HelpRequest::Usage(category) => match CATEGORIES.iter().find(|c| c.key == category) {
            Some(found) => render_category(found),
            None => overview(),
        },
    }
}

fn overview() -> String {
    let mut out = String::from("Usage:\n  rdialog [OPTION ...]\n\n");
    for key in ["help", "application"] {
        if let Some(category) = CATEGORIES.iter().find(|c| c.key == key) {
            out.push_str(&render_category(category));
        }
    }
    out
}

fn render_category(category: &Category) -> String {
    let mut out = format!("{}\n", category.heading);
    for (option, description) in category.entries {
        out.push_str(&format!("  {:<53}{}\n", option, description));
    }
    out.push('\n');
    out
}
