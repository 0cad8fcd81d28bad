//! Terminal dialog host
//!
//! Renders dialogs as prompts on the controlling terminal. Everything is
//! drawn on stderr so stdout stays reserved for the result line.
//!
//! - Prompt dialogs run on the blocking pool and report one event.
//! - Progress, text-info and notification dialogs also run a task that
//!   applies live [`HostCommand`]s as they arrive.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Duration;

use chrono::NaiveDate;
use console::{style, Emoji, Key, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Editor, Input, MultiSelect, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::descriptor::{
    CalendarDescriptor, ChecklistModel, ColorDescriptor, DialogDescriptor, EntryDescriptor, FileMode,
    FileSelectionDescriptor, FormField, FormsDescriptor, ListDescriptor, MessageDescriptor, NotificationDescriptor,
    PasswordDescriptor, ProgressDescriptor, Rgb, ScaleDescriptor, Selection, TextInfoDescriptor, Button,
};
use crate::dispatch::{GeneralConfig, MessageKind};
use crate::error::HostError;
use crate::protocol::text_info::scroll_duration;

use super::{Answer, DialogHost, FieldAnswer, HostCommand, HostEvent, HostLink, HostRequest};

static CROSS: Emoji<'_, '_> = Emoji("✗ ", "x ");
static INFO: Emoji<'_, '_> = Emoji("ℹ ", "i ");
static QUESTION: Emoji<'_, '_> = Emoji("? ", "? ");
static WARNING: Emoji<'_, '_> = Emoji("⚠ ", "! ");
static ARROW: Emoji<'_, '_> = Emoji("→ ", "-> ");
static BELL: Emoji<'_, '_> = Emoji("🔔 ", "* ");

/// Nominal height of one text line, for scroll pacing.
const LINE_HEIGHT: i64 = 16;

/// Date layout used for typed dates.
const DATE_INPUT: &str = "%Y-%m-%d";

type PromptResult = Result<Option<Answer>, HostError>;

/// Shows dialogs as terminal prompts.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalHost;

impl TerminalHost {
    pub fn new() -> Self {
        Self
    }
}

impl DialogHost for TerminalHost {
    fn launch(self, request: HostRequest, link: HostLink) -> Result<(), HostError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| HostError::Task(e.to_string()))?;
        let HostRequest {
            general,
            descriptor,
            initial_text,
        } = request;
        let HostLink { commands, events } = link;

        print_header(&general);

        match descriptor {
            DialogDescriptor::Progress(progress) => {
                run_progress(&runtime, progress, commands, events);
            }
            DialogDescriptor::TextInfo(text) => {
                run_text_info(&runtime, text, general, initial_text, commands, events);
            }
            DialogDescriptor::Notification(notification) => {
                run_notification(&runtime, notification, general, commands, events);
            }
            descriptor => {
                runtime.spawn_blocking(move || {
                    let result = prompt(&descriptor, &general, &events);
                    report(&events, result);
                });
            }
        }
        Ok(())
    }
}

fn print_header(general: &GeneralConfig) {
    if let Some(title) = &general.title {
        eprintln!("{}", style(title).bold().underlined());
    }
    if general.modal || general.attach.is_some() || general.width.is_some() || general.height.is_some() {
        debug!("Window geometry and parenting do not apply to the terminal");
    }
    if let Some(icon) = &general.window_icon {
        debug!("Ignoring window icon {}", icon);
    }
}

fn report(events: &UnboundedSender<HostEvent>, result: PromptResult) {
    let event = match result {
        Ok(Some(answer)) => HostEvent::Accepted(answer),
        Ok(None) => HostEvent::Cancelled,
        Err(e) if interrupted(&e) => HostEvent::Cancelled,
        Err(e) => HostEvent::Failed(e),
    };
    if events.send(event).is_err() {
        debug!("Dialog finished after the event loop stopped");
    }
}

/// Ctrl+C while a prompt holds the terminal in raw mode.
fn interrupted(error: &HostError) -> bool {
    match error {
        HostError::Prompt(dialoguer::Error::IO(e)) | HostError::Io(e) => e.kind() == io::ErrorKind::Interrupted,
        HostError::Task(_) => false,
    }
}

fn prompt(descriptor: &DialogDescriptor, general: &GeneralConfig, events: &UnboundedSender<HostEvent>) -> PromptResult {
    let theme = ColorfulTheme::default();
    match descriptor {
        DialogDescriptor::Calendar(calendar) => prompt_calendar(&theme, calendar),
        DialogDescriptor::Entry(entry) => prompt_entry(&theme, entry),
        DialogDescriptor::Message(message) => prompt_message(&theme, message, general),
        DialogDescriptor::FileSelection(selection) => prompt_files(&theme, selection),
        DialogDescriptor::List(list) => prompt_list(&theme, list, general),
        DialogDescriptor::Scale(scale) => prompt_scale(scale, events),
        DialogDescriptor::ColorSelection(color) => prompt_color(&theme, color),
        DialogDescriptor::Password(password) => prompt_password(&theme, password),
        DialogDescriptor::Forms(forms) => prompt_forms(&theme, forms),
        DialogDescriptor::Progress(_) | DialogDescriptor::TextInfo(_) | DialogDescriptor::Notification(_) => {
            Err(HostError::Task(format!("{} is not a prompt dialog", descriptor.mode().name())))
        }
    }
}

fn label_or<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.is_empty() {
        fallback
    } else {
        text
    }
}

/// Ok/Cancel choice. `Some(true)` for Ok, `None` when dismissed.
fn confirm_buttons(theme: &ColorfulTheme, general: &GeneralConfig, default: usize) -> Result<Option<bool>, HostError> {
    let items = [general.ok_label(), general.cancel_label()];
    let choice = Select::with_theme(theme).items(&items).default(default).interact_opt()?;
    Ok(choice.map(|i| i == 0))
}

fn prompt_date(theme: &ColorfulTheme, prompt: &str, initial: NaiveDate) -> Result<NaiveDate, HostError> {
    let text: String = Input::with_theme(theme)
        .with_prompt(format!("{} (YYYY-MM-DD)", prompt))
        .with_initial_text(initial.format(DATE_INPUT).to_string())
        .validate_with(|input: &String| -> Result<(), String> {
            NaiveDate::parse_from_str(input.trim(), DATE_INPUT)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;
    NaiveDate::parse_from_str(text.trim(), DATE_INPUT)
        .map_err(|e| HostError::Io(io::Error::new(io::ErrorKind::InvalidInput, e)))
}

fn prompt_calendar(theme: &ColorfulTheme, calendar: &CalendarDescriptor) -> PromptResult {
    let initial = calendar.date().unwrap_or_else(|| {
        warn!(
            "{}-{}-{} is not a valid date, starting from today",
            calendar.year, calendar.month, calendar.day
        );
        chrono::Local::now().date_naive()
    });
    let date = prompt_date(theme, label_or(&calendar.text, "Date"), initial)?;
    Ok(Some(Answer::Date(date)))
}

fn prompt_entry(theme: &ColorfulTheme, entry: &EntryDescriptor) -> PromptResult {
    let prompt = label_or(&entry.text, "Text");
    let text = if entry.hide_text {
        Password::with_theme(theme)
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?
    } else {
        Input::<String>::with_theme(theme)
            .with_prompt(prompt)
            .with_initial_text(entry.entry_text.clone())
            .allow_empty(true)
            .interact_text()?
    };
    Ok(Some(Answer::Text(text)))
}

fn prompt_password(theme: &ColorfulTheme, password: &PasswordDescriptor) -> PromptResult {
    let username = if password.username {
        Some(
            Input::<String>::with_theme(theme)
                .with_prompt("Username")
                .allow_empty(true)
                .interact_text()?,
        )
    } else {
        None
    };
    let secret = Password::with_theme(theme)
        .with_prompt("Password")
        .allow_empty_password(true)
        .interact()?;
    Ok(Some(Answer::Credentials {
        username,
        password: secret,
    }))
}

fn strip_markup(text: &str) -> String {
    static TAG: OnceLock<Option<Regex>> = OnceLock::new();
    let stripped = match TAG.get_or_init(|| Regex::new(r"<[^>]*>").ok()) {
        Some(tag) => tag.replace_all(text, "").into_owned(),
        None => text.to_string(),
    };
    stripped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> String {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn prompt_message(theme: &ColorfulTheme, message: &MessageDescriptor, general: &GeneralConfig) -> PromptResult {
    debug!("Message icon {}", message.icon_name());
    let mut body = if message.markup {
        strip_markup(&message.text)
    } else {
        message.text.clone()
    };
    if message.wrap {
        let width = usize::from(Term::stderr().size().1).saturating_sub(4).max(20);
        body = wrap(&body, width);
    }

    let body = style(body);
    match message.kind {
        MessageKind::Error => eprintln!("{}{}", CROSS, body.red()),
        MessageKind::Info => eprintln!("{}{}", INFO, body.cyan()),
        MessageKind::Question => eprintln!("{}{}", QUESTION, body.bold()),
        MessageKind::Warning => eprintln!("{}{}", WARNING, body.yellow()),
    }

    let buttons = message.buttons();
    let items: Vec<&str> = buttons
        .iter()
        .map(|button| match button {
            Button::Ok => general.ok_label(),
            Button::Cancel => general.cancel_label(),
        })
        .collect();
    let default = buttons.iter().position(|b| *b == message.default_button).unwrap_or(0);
    let choice = Select::with_theme(theme).items(&items).default(default).interact_opt()?;

    Ok(match choice.and_then(|i| buttons.get(i)) {
        Some(Button::Ok) => Some(Answer::Acknowledged),
        _ => None,
    })
}

fn check_path(selection: &FileSelectionDescriptor, path: &Path) -> Result<(), String> {
    match selection.mode {
        FileMode::ExistingFile | FileMode::ExistingFiles if !path.is_file() => {
            return Err(format!("{} is not an existing file", path.display()));
        }
        FileMode::Directory if !path.is_dir() => {
            return Err(format!("{} is not a directory", path.display()));
        }
        _ => {}
    }
    if let (Some(filter), FileMode::ExistingFile | FileMode::ExistingFiles) = (&selection.filter, selection.mode) {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        if !filter.matches(&name) {
            return Err(format!("{} does not match {}", name, filter.patterns.join(" ")));
        }
    }
    Ok(())
}

fn split_paths(input: &str, selection: &FileSelectionDescriptor) -> Vec<PathBuf> {
    if selection.mode == FileMode::ExistingFiles && !selection.separator.is_empty() {
        input
            .split(selection.separator.as_str())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .collect()
    } else {
        vec![PathBuf::from(input.trim())]
    }
}

fn prompt_files(theme: &ColorfulTheme, selection: &FileSelectionDescriptor) -> PromptResult {
    let prompt = match selection.mode {
        FileMode::ExistingFile => "File".to_string(),
        FileMode::ExistingFiles => format!("Files (separated by {})", selection.separator),
        FileMode::Directory => "Directory".to_string(),
        FileMode::Save => "Save as".to_string(),
    };
    if let Some(filter) = &selection.filter {
        eprintln!(
            "{}{} {}",
            ARROW,
            filter.name.as_deref().unwrap_or("Filter"),
            style(filter.patterns.join(" ")).dim()
        );
    }

    let input: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .with_initial_text(selection.filename.clone().unwrap_or_default())
        .validate_with(|input: &String| -> Result<(), String> {
            let paths = split_paths(input, selection);
            if paths.is_empty() {
                return Err("No file given".to_string());
            }
            paths.iter().try_for_each(|p| check_path(selection, p))
        })
        .interact_text()?;
    let paths = split_paths(&input, selection);

    if selection.mode == FileMode::Save && selection.confirm_overwrite {
        if let Some(existing) = paths.iter().find(|p| p.exists()) {
            let overwrite = Confirm::with_theme(theme)
                .with_prompt(format!("{} already exists. Overwrite?", existing.display()))
                .default(false)
                .interact_opt()?;
            if overwrite != Some(true) {
                return Ok(None);
            }
        }
    }

    let paths = paths
        .into_iter()
        .map(|p| std::path::absolute(&p).unwrap_or(p))
        .collect();
    Ok(Some(Answer::Paths(paths)))
}

fn prompt_color(theme: &ColorfulTheme, color: &ColorDescriptor) -> PromptResult {
    let input: String = Input::with_theme(theme)
        .with_prompt("Color")
        .with_initial_text(color.color.to_string())
        .validate_with(|input: &String| -> Result<(), String> {
            Rgb::parse(input)
                .map(|_| ())
                .ok_or_else(|| format!("{} is not a color", input))
        })
        .interact_text()?;
    Ok(Rgb::parse(&input).map(Answer::Color))
}

fn prompt_scale(scale: &ScaleDescriptor, events: &UnboundedSender<HostEvent>) -> PromptResult {
    let term = Term::stderr();
    if !term.is_term() {
        return Err(HostError::Io(io::Error::new(io::ErrorKind::NotConnected, "not a terminal")));
    }

    let (min, max, step) = (scale.min, scale.upper(), scale.step());
    let mut value = scale.initial_value();
    term.write_line(&format!("{} {}", scale.text, style("(←/→, Enter, Esc)").dim()))?;

    loop {
        term.clear_line()?;
        let shown = if scale.hide_value {
            String::new()
        } else {
            format!(" {}", style(value).cyan().bold())
        };
        term.write_str(&format!("{} [{}..{}]{}", ARROW, min, max, shown))?;

        let next = match term.read_key()? {
            Key::ArrowLeft | Key::ArrowDown | Key::Char('h') | Key::Char('-') => value.saturating_sub(step).max(min),
            Key::ArrowRight | Key::ArrowUp | Key::Char('l') | Key::Char('+') => value.saturating_add(step).min(max),
            Key::Home => min,
            Key::End => max,
            Key::Enter => {
                term.write_line("")?;
                return Ok(Some(Answer::Value(value)));
            }
            Key::Escape => {
                term.write_line("")?;
                return Ok(None);
            }
            _ => continue,
        };

        if next != value {
            value = next;
            // The loop may already be gone if --timeout fired
            let _ = events.send(HostEvent::ValueChanged(value));
        }
    }
}

fn visible_cells(list: &ListDescriptor, row: &[String]) -> String {
    row.iter()
        .enumerate()
        .filter(|(i, _)| !list.hidden_columns.contains(i) && !(list.checkable && *i == 0))
        .map(|(_, cell)| cell.as_str())
        .collect::<Vec<_>>()
        .join("  ")
}

fn prompt_list(theme: &ColorfulTheme, list: &ListDescriptor, general: &GeneralConfig) -> PromptResult {
    if !list.text.is_empty() {
        eprintln!("{}", style(&list.text).bold());
    }
    if !list.hide_header && !list.columns.is_empty() {
        eprintln!("  {}", style(visible_cells(list, &list.columns)).dim());
    }
    if list.editable {
        debug!("Editable cells are not supported in the terminal");
    }
    if list.images {
        debug!("Image cells are shown as file names");
    }

    if list.rows.is_empty() {
        return Ok(confirm_buttons(theme, general, 0)?
            .filter(|ok| *ok)
            .map(|_| Answer::Rows(Vec::new())));
    }

    let items: Vec<String> = list.rows.iter().map(|row| visible_cells(list, row)).collect();

    if list.checkable {
        let mut model = ChecklistModel::new(list.rows.len(), list.exclusive);
        for (row, cells) in list.rows.iter().enumerate() {
            if cells.first().is_some_and(|cell| cell.eq_ignore_ascii_case("true")) {
                model.set_checked(row, true);
            }
        }

        if list.exclusive {
            let default = model.checked_rows().first().copied().unwrap_or(0);
            let Some(row) = Select::with_theme(theme).items(&items).default(default).interact_opt()? else {
                return Ok(None);
            };
            model.set_checked(row, true);
        } else {
            let defaults: Vec<bool> = (0..list.rows.len()).map(|row| model.is_checked(row)).collect();
            let Some(rows) = MultiSelect::with_theme(theme)
                .items(&items)
                .defaults(&defaults)
                .interact_opt()?
            else {
                return Ok(None);
            };
            for row in 0..list.rows.len() {
                model.set_checked(row, rows.contains(&row));
            }
        }
        return Ok(Some(Answer::Rows(model.checked_rows())));
    }

    let rows = match list.selection {
        Selection::Multiple => MultiSelect::with_theme(theme).items(&items).interact_opt()?,
        Selection::Single | Selection::None => Select::with_theme(theme)
            .items(&items)
            .default(0)
            .interact_opt()?
            .map(|row| vec![row]),
    };
    Ok(rows.map(Answer::Rows))
}

fn prompt_forms(theme: &ColorfulTheme, forms: &FormsDescriptor) -> PromptResult {
    if !forms.text.is_empty() {
        eprintln!("{}", style(&forms.text).bold());
    }

    let mut answers = Vec::with_capacity(forms.fields.len());
    for field in &forms.fields {
        let label = field.label();
        let answer = match field {
            FormField::Entry { .. } => FieldAnswer::Text(
                Input::<String>::with_theme(theme)
                    .with_prompt(label)
                    .allow_empty(true)
                    .interact_text()?,
            ),
            FormField::Password { .. } => FieldAnswer::Text(
                Password::with_theme(theme)
                    .with_prompt(label)
                    .allow_empty_password(true)
                    .interact()?,
            ),
            FormField::Calendar { .. } => {
                FieldAnswer::Date(prompt_date(theme, label, chrono::Local::now().date_naive())?)
            }
            FormField::List {
                columns,
                rows,
                show_header,
                ..
            } => {
                if *show_header && !columns.is_empty() {
                    eprintln!("  {}", style(columns.join("  ")).dim());
                }
                if rows.is_empty() {
                    FieldAnswer::Rows(Vec::new())
                } else {
                    let items: Vec<String> = rows.iter().map(|row| row.join("  ")).collect();
                    let Some(row) = Select::with_theme(theme)
                        .with_prompt(label)
                        .items(&items)
                        .default(0)
                        .interact_opt()?
                    else {
                        return Ok(None);
                    };
                    FieldAnswer::Rows(vec![row])
                }
            }
            FormField::Combo { options, .. } => {
                if options.is_empty() {
                    FieldAnswer::Choice(String::new())
                } else {
                    let Some(choice) = Select::with_theme(theme)
                        .with_prompt(label)
                        .items(options)
                        .default(0)
                        .interact_opt()?
                    else {
                        return Ok(None);
                    };
                    FieldAnswer::Choice(options[choice].clone())
                }
            }
            FormField::Checkbox { .. } => {
                let Some(checked) = Confirm::with_theme(theme)
                    .with_prompt(label)
                    .default(false)
                    .interact_opt()?
                else {
                    return Ok(None);
                };
                FieldAnswer::Checked(checked)
            }
        };
        answers.push(answer);
    }

    Ok(Some(Answer::Form(answers)))
}

fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos:>3}%")
        .map(|s| s.progress_chars("█▓░"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

fn pulse_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Enter or Esc triggers the cancel control. Needs a terminal to read from.
fn watch_cancel_key(term: Term, events: UnboundedSender<HostEvent>) {
    loop {
        match term.read_key() {
            Ok(Key::Enter | Key::Escape) => break,
            Ok(_) => continue,
            Err(e) => {
                if e.kind() != io::ErrorKind::Interrupted {
                    warn!("Stopped reading the terminal: {}", e);
                    return;
                }
                break;
            }
        }
    }
    let _ = events.send(HostEvent::Cancelled);
}

fn run_progress(
    runtime: &tokio::runtime::Handle,
    progress: ProgressDescriptor,
    mut commands: UnboundedReceiver<HostCommand>,
    events: UnboundedSender<HostEvent>,
) {
    let bar = ProgressBar::new(100);
    bar.set_style(progress_style());
    bar.set_message(progress.text.clone());

    let term = Term::stderr();
    if !progress.no_cancel && term.is_term() {
        let events = events.clone();
        runtime.spawn_blocking(move || watch_cancel_key(term, events));
    }

    runtime.spawn(async move {
        // Holding `events` keeps the loop waiting while the bar is shown
        let _events = events;
        while let Some(command) = commands.recv().await {
            match command {
                HostCommand::SetProgress(value) => bar.set_position(u64::from(value)),
                HostCommand::Pulsate => {
                    bar.set_style(pulse_style());
                    bar.enable_steady_tick(Duration::from_millis(100));
                }
                HostCommand::SetCancelBehavior { label, .. } => {
                    if !progress.no_cancel {
                        bar.println(format!("{}Press Enter to {}", ARROW, style(label).bold()));
                    }
                }
                other => debug!("Progress host ignores {:?}", other),
            }
        }
        bar.finish_and_clear();
    });
}

fn run_text_info(
    runtime: &tokio::runtime::Handle,
    text: TextInfoDescriptor,
    general: GeneralConfig,
    initial_text: String,
    mut commands: UnboundedReceiver<HostCommand>,
    events: UnboundedSender<HostEvent>,
) {
    if let Some(font) = &text.font {
        debug!("Ignoring font {}", font);
    }
    eprint!("{}", initial_text);
    let contents = Arc::new(Mutex::new(initial_text));

    let shown = Arc::clone(&contents);
    let settled = events.clone();
    runtime.spawn(async move {
        while let Some(command) = commands.recv().await {
            match command {
                HostCommand::AppendText { text, scroll } => {
                    eprint!("{}", text);
                    append(&shown, &text);
                    if scroll {
                        // Paced like an animated scroll
                        let distance = i64::try_from(text.lines().count()).unwrap_or(i64::MAX);
                        if let Some(pause) = scroll_duration(distance.saturating_mul(LINE_HEIGHT)) {
                            tokio::time::sleep(pause).await;
                        }
                        if settled.send(HostEvent::ScrollSettled).is_err() {
                            debug!("Scroll settled after the dialog closed");
                        }
                    }
                }
                other => debug!("Text host ignores {:?}", other),
            }
        }
    });

    runtime.spawn_blocking(move || {
        let result = prompt_text_done(&text, &general, &contents);
        report(&events, result);
    });
}

fn append(contents: &Mutex<String>, text: &str) {
    contents.lock().unwrap_or_else(PoisonError::into_inner).push_str(text);
}

fn prompt_text_done(text: &TextInfoDescriptor, general: &GeneralConfig, contents: &Mutex<String>) -> PromptResult {
    let theme = ColorfulTheme::default();
    loop {
        if confirm_buttons(&theme, general, 0)? != Some(true) {
            return Ok(None);
        }
        if let Some(label) = &text.checkbox {
            let agreed = Confirm::with_theme(&theme)
                .with_prompt(label.as_str())
                .default(false)
                .interact_opt()?;
            if agreed != Some(true) {
                eprintln!("{}{} must be ticked first", WARNING, style(label).bold());
                continue;
            }
        }
        break;
    }

    if !text.editable {
        return Ok(Some(Answer::Acknowledged));
    }
    let current = contents.lock().unwrap_or_else(PoisonError::into_inner).clone();
    let edited = Editor::new().edit(&current)?;
    Ok(Some(Answer::Text(edited.unwrap_or(current))))
}

fn run_notification(
    runtime: &tokio::runtime::Handle,
    notification: NotificationDescriptor,
    general: GeneralConfig,
    mut commands: UnboundedReceiver<HostCommand>,
    events: UnboundedSender<HostEvent>,
) {
    let handle = runtime.clone();
    runtime.spawn(async move {
        let mut awaiting_dismissal = false;
        while let Some(command) = commands.recv().await {
            match command {
                HostCommand::ShowFallback { text, dismissable } => {
                    eprintln!("{}{}", BELL, style(&text).bold());
                    if dismissable && !awaiting_dismissal {
                        awaiting_dismissal = true;
                        let events = events.clone();
                        let general = general.clone();
                        handle.spawn_blocking(move || dismiss_fallback(&general, &events));
                    }
                }
                HostCommand::SetFallbackVisible(visible) => {
                    let state = if visible { "shown" } else { "hidden" };
                    eprintln!("{}", style(format!("(notification {})", state)).dim());
                }
                other => debug!("Notification host ignores {:?}", other),
            }
        }
        debug!("Notification host for {:?} done", notification.text);
    });
}

fn dismiss_fallback(general: &GeneralConfig, events: &UnboundedSender<HostEvent>) {
    if !Term::stderr().is_term() {
        let _ = events.send(HostEvent::Accepted(Answer::Acknowledged));
        return;
    }
    let theme = ColorfulTheme::default();
    let result = Select::with_theme(&theme)
        .items(&[general.ok_label()])
        .default(0)
        .interact_opt()
        .map(|choice| choice.map(|_| Answer::Acknowledged))
        .map_err(HostError::from);
    report(events, result);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("<b>bold</b> &amp; <i>it</i> &lt;3"), "bold & it <3");
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("aa bb cc", 5), "aa bb\ncc");
        assert_eq!(wrap("one\n\ntwo", 80), "one\n\ntwo");
        assert_eq!(wrap("averyveryverylongword x", 5), "averyveryverylongword\nx");
    }

    #[test]
    fn test_append_survives_poisoned_contents() {
        let contents = Arc::new(Mutex::new("one\n".to_string()));
        let poisoner = Arc::clone(&contents);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison");
        })
        .join();
        assert!(contents.is_poisoned());

        append(&contents, "two\n");
        assert_eq!(*contents.lock().unwrap_or_else(PoisonError::into_inner), "one\ntwo\n");
    }

    #[test]
    fn test_visible_cells_skip_hidden_and_check_columns() {
        let list = ListDescriptor {
            text: String::new(),
            columns: vec![],
            hidden_columns: vec![2],
            selection: Selection::None,
            rows: vec![],
            editable: false,
            checkable: true,
            exclusive: false,
            images: false,
            hide_header: false,
            separator: "|".into(),
        };
        let row: Vec<String> = ["TRUE", "apple", "secret", "red"].iter().map(|s| s.to_string()).collect();
        assert_eq!(visible_cells(&list, &row), "apple  red");
    }

    #[test]
    fn test_split_paths() {
        let mut selection = FileSelectionDescriptor {
            filename: None,
            mode: FileMode::ExistingFiles,
            separator: "|".into(),
            confirm_overwrite: false,
            filter: None,
        };
        assert_eq!(split_paths("/a | /b|", &selection), vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        selection.mode = FileMode::Save;
        assert_eq!(split_paths(" /a|b ", &selection), vec![PathBuf::from("/a|b")]);
    }

    #[test]
    fn test_check_path_modes() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "x").unwrap();
        let mut selection = FileSelectionDescriptor {
            filename: None,
            mode: FileMode::ExistingFile,
            separator: "|".into(),
            confirm_overwrite: false,
            filter: Some(crate::descriptor::FileFilter::parse("Text | *.txt")),
        };
        assert!(check_path(&selection, &file).is_ok());
        assert!(check_path(&selection, dir.path()).is_err());
        selection.filter = Some(crate::descriptor::FileFilter::parse("*.md"));
        assert!(check_path(&selection, &file).is_err());
        selection.mode = FileMode::Directory;
        assert!(check_path(&selection, dir.path()).is_ok());
    }
}
