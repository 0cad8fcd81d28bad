//! The dialog event loop
//!
//! Launches the host, then multiplexes live stdin, host events and the
//! close timers on one task until the dialog reaches an outcome.

use std::io::Write;
use std::time::Duration;

use tokio::io::AsyncBufRead;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::descriptor::DialogDescriptor;
use crate::dispatch::GeneralConfig;
use crate::error::{HostError, NotifyError};
use crate::host::{self, Answer, DialogHost, HostCommand, HostEvent, HostLink, HostRequest};
use crate::notify::{Notification, NotificationTransport};
use crate::protocol::{Effect, LiveInput, LiveState};
use crate::result::{self, Exit, Outcome};

/// Show one dialog and return how the process should exit.
///
/// `transport` is `None` when desktop notifications are disabled; `input`
/// is `None` for dialogs that do not read stdin. Partial scale values are
/// written to `out` as they happen.
pub async fn run<H, T, R, W>(
    general: GeneralConfig,
    descriptor: DialogDescriptor,
    host: H,
    transport: Option<T>,
    mut input: Option<LiveInput<R>>,
    out: &mut W,
) -> Exit
where
    H: DialogHost,
    T: NotificationTransport,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (link, handle) = host::link();
    let mut events = handle.events;

    let initial_text = match &descriptor {
        DialogDescriptor::TextInfo(text) => text.load_initial_text(),
        _ => String::new(),
    };
    let request = HostRequest {
        general: general.clone(),
        descriptor: descriptor.clone(),
        initial_text,
    };

    let deadline = general.timeout.map(|secs| Instant::now() + Duration::from_secs(secs));
    let mut session = Session {
        state: LiveState::new(&descriptor, &general),
        descriptor,
        general,
        commands: handle.commands,
        pending: Some((host, request, link)),
        transport,
        available: None,
        close_at: None,
    };

    // Notifications only need the host once something falls back to it
    if !matches!(session.descriptor, DialogDescriptor::Notification(_)) {
        if let Err(e) = session.launch() {
            error!("Failed to show dialog: {}", e);
            return Exit::failure();
        }
    }

    let effects = session.state.start();
    if let Some(exit) = session.apply(effects).await {
        return exit;
    }
    let effects = session.state.started();
    if let Some(exit) = session.apply(effects).await {
        return exit;
    }

    loop {
        let close_at = session.close_at;
        let reading = input.as_ref().is_some_and(LiveInput::is_open);

        let effects = tokio::select! {
            line = next_line(&mut input), if reading => match line {
                Some(line) => session.state.on_line(&line),
                None => session.state.on_end_of_stream(),
            },
            event = events.recv() => match event {
                Some(event) => match session.on_event(event, out) {
                    Ok(effects) => effects,
                    Err(exit) => return exit,
                },
                None => {
                    error!("Dialog host went away without an answer");
                    return Exit::failure();
                }
            },
            _ = wait_until(close_at) => {
                debug!("Auto-close delay elapsed");
                return Exit::silent();
            }
            _ = wait_until(deadline) => {
                info!("Timed out");
                return Exit::silent();
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                return session.finish(Outcome::Rejected);
            }
        };

        if let Some(exit) = session.apply(effects).await {
            return exit;
        }
    }
}

async fn next_line<R: AsyncBufRead + Unpin>(input: &mut Option<LiveInput<R>>) -> Option<String> {
    match input {
        Some(input) => input.next_line().await,
        None => None,
    }
}

async fn wait_until(at: Option<Instant>) {
    match at {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

struct Session<H, T> {
    descriptor: DialogDescriptor,
    general: GeneralConfig,
    state: LiveState,
    commands: UnboundedSender<HostCommand>,
    /// Host, request and link until the host has been launched
    pending: Option<(H, HostRequest, HostLink)>,
    transport: Option<T>,
    /// Cached result of the first availability probe
    available: Option<bool>,
    close_at: Option<Instant>,
}

impl<H: DialogHost, T: NotificationTransport> Session<H, T> {
    fn launch(&mut self) -> Result<(), HostError> {
        if let Some((host, request, link)) = self.pending.take() {
            debug!("Launching {} dialog", self.descriptor.mode().name());
            host.launch(request, link)?;
        }
        Ok(())
    }

    fn send(&self, command: HostCommand) {
        if self.commands.send(command).is_err() {
            debug!("Dialog host stopped listening for commands");
        }
    }

    fn finish(&self, outcome: Outcome) -> Exit {
        match result::extract(&self.descriptor, outcome) {
            Ok(result) => result.into_exit(),
            Err(e) => {
                error!("{}", e);
                Exit::failure()
            }
        }
    }

    /// Handle one host event. `Err` carries the exit when the dialog is over.
    fn on_event<W: Write>(&mut self, event: HostEvent, out: &mut W) -> Result<Vec<Effect>, Exit> {
        match event {
            HostEvent::Accepted(answer) => Err(self.finish(Outcome::Accepted(answer))),
            HostEvent::Cancelled if self.state.cancel_accepts() => {
                Err(self.finish(Outcome::Accepted(Answer::Acknowledged)))
            }
            HostEvent::Cancelled => Err(self.finish(Outcome::Rejected)),
            HostEvent::ValueChanged(value) => {
                if let Some(line) = result::partial_line(&self.descriptor, value) {
                    if let Err(e) = out.write_all(line.as_bytes()).and_then(|_| out.flush()) {
                        warn!("Failed to write partial value: {}", e);
                    }
                }
                Ok(Vec::new())
            }
            HostEvent::ScrollSettled => Ok(self.state.on_scroll_settled()),
            HostEvent::Failed(e) => {
                error!("Dialog failed: {}", e);
                Err(Exit::failure())
            }
        }
    }

    /// Carry out effects in order. Returns the exit if one of them ends
    /// the dialog.
    async fn apply(&mut self, effects: Vec<Effect>) -> Option<Exit> {
        for effect in effects {
            match effect {
                Effect::Host(command) => self.send(command),
                Effect::Notify(text) => {
                    if let Err(e) = self.notify(text).await {
                        error!("Failed to show notification: {}", e);
                        return Some(Exit::failure());
                    }
                }
                Effect::CloseAfter(delay) => {
                    let at = Instant::now() + delay;
                    self.close_at = Some(self.close_at.map_or(at, |current| current.min(at)));
                }
                Effect::Finish => return Some(Exit::silent()),
            }
        }
        None
    }

    /// Deliver a notification, falling back to the dialog host when the
    /// desktop service cannot take it.
    async fn notify(&mut self, text: String) -> Result<(), HostError> {
        let (hints, listening) = match &self.state {
            LiveState::Notification(state) => (state.hints().to_string(), state.listening()),
            _ => (String::new(), false),
        };
        let notification = Notification::new(&text, &hints, self.general.timeout);

        if let Some(transport) = self.transport.as_mut() {
            let available = match self.available {
                Some(available) => available,
                None => *self.available.insert(transport.is_available().await),
            };
            if available {
                match transport.notify(&notification).await {
                    Ok(_) => return Ok(()),
                    Err(e) => warn!("Failed to send notification: {}", e),
                }
            } else {
                warn!("{}, showing it in the terminal", NotifyError::Unavailable);
            }
        }

        self.launch()?;
        self.send(HostCommand::ShowFallback {
            text,
            dismissable: !listening,
        });
        if let LiveState::Notification(state) = &mut self.state {
            state.fallback_shown();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{EntryDescriptor, NotificationDescriptor, ProgressDescriptor, ScaleDescriptor};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    type Respond = Box<dyn Fn(&HostCommand) -> Option<HostEvent> + Send>;

    /// Host that replays events and answers commands from a script.
    struct ScriptedHost {
        initial: Vec<HostEvent>,
        respond: Respond,
        log: Arc<Mutex<Vec<HostCommand>>>,
        launched: Arc<AtomicBool>,
    }

    impl ScriptedHost {
        fn new(initial: Vec<HostEvent>) -> Self {
            Self {
                initial,
                respond: Box::new(|_| None),
                log: Arc::default(),
                launched: Arc::default(),
            }
        }

        fn responding(mut self, respond: impl Fn(&HostCommand) -> Option<HostEvent> + Send + 'static) -> Self {
            self.respond = Box::new(respond);
            self
        }
    }

    impl DialogHost for ScriptedHost {
        fn launch(self, _request: HostRequest, link: HostLink) -> Result<(), HostError> {
            self.launched.store(true, Ordering::SeqCst);
            let HostLink { mut commands, events } = link;
            let ScriptedHost { initial, respond, log, .. } = self;
            tokio::spawn(async move {
                for event in initial {
                    let _ = events.send(event);
                }
                while let Some(command) = commands.recv().await {
                    log.lock().unwrap().push(command.clone());
                    if let Some(event) = respond(&command) {
                        let _ = events.send(event);
                    }
                }
            });
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct FakeTransport {
        available: bool,
        sent: Arc<Mutex<Vec<Notification>>>,
    }

    impl NotificationTransport for FakeTransport {
        async fn is_available(&mut self) -> bool {
            self.available
        }

        async fn notify(&mut self, notification: &Notification) -> Result<u32, NotifyError> {
            let mut sent = self.sent.lock().unwrap();
            sent.push(notification.clone());
            Ok(u32::try_from(sent.len()).unwrap())
        }
    }

    async fn run_with(
        general: GeneralConfig,
        descriptor: DialogDescriptor,
        host: ScriptedHost,
        transport: Option<FakeTransport>,
        input: Option<&'static [u8]>,
    ) -> (Exit, String) {
        let mut out = Vec::new();
        let input = input.map(LiveInput::new);
        let exit = run(general, descriptor, host, transport, input, &mut out).await;
        (exit, String::from_utf8(out).unwrap())
    }

    fn progress(auto_close: bool, auto_kill: bool) -> DialogDescriptor {
        DialogDescriptor::Progress(ProgressDescriptor {
            auto_close,
            auto_kill,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_progress_auto_close() {
        let host = ScriptedHost::new(vec![]);
        let log = Arc::clone(&host.log);
        let input = Some(&b"10\n50\n100\n"[..]);
        let (exit, _) = run_with(GeneralConfig::default(), progress(true, false), host, None, input).await;
        assert_eq!(exit, Exit::silent());

        let log = log.lock().unwrap();
        assert_eq!(
            *log,
            vec![
                HostCommand::SetProgress(0),
                HostCommand::SetProgress(10),
                HostCommand::SetProgress(50),
                HostCommand::SetProgress(100),
            ]
        );
    }

    #[tokio::test]
    async fn test_cancel_after_complete_is_acceptance() {
        let host = ScriptedHost::new(vec![]).responding(|command| match command {
            HostCommand::SetCancelBehavior { accepts: true, .. } => Some(HostEvent::Cancelled),
            _ => None,
        });
        let (exit, out) = run_with(GeneralConfig::default(), progress(false, false), host, None, Some(&b"100\n"[..])).await;
        assert_eq!(exit.code, 0);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_before_complete_kills_parent() {
        let host = ScriptedHost::new(vec![HostEvent::Cancelled]);
        let (exit, _) = run_with(GeneralConfig::default(), progress(false, true), host, None, None).await;
        assert_eq!(
            exit,
            Exit {
                code: 1,
                stdout: None,
                kill_parent: true
            }
        );
    }

    #[tokio::test]
    async fn test_timeout_exits_silently() {
        let general = GeneralConfig {
            timeout: Some(0),
            ..Default::default()
        };
        let descriptor = DialogDescriptor::Entry(EntryDescriptor::default());
        let (exit, _) = run_with(general, descriptor, ScriptedHost::new(vec![]), None, None).await;
        assert_eq!(exit, Exit::silent());
    }

    #[tokio::test]
    async fn test_accepted_entry_prints_text() {
        let host = ScriptedHost::new(vec![HostEvent::Accepted(Answer::Text("hello".into()))]);
        let descriptor = DialogDescriptor::Entry(EntryDescriptor::default());
        let (exit, _) = run_with(GeneralConfig::default(), descriptor, host, None, None).await;
        assert_eq!(exit.code, 0);
        assert_eq!(exit.stdout.as_deref(), Some("hello\n"));
    }

    #[tokio::test]
    async fn test_scale_partial_values() {
        let host = ScriptedHost::new(vec![
            HostEvent::ValueChanged(3),
            HostEvent::ValueChanged(4),
            HostEvent::Accepted(Answer::Value(4)),
        ]);
        let descriptor = DialogDescriptor::Scale(ScaleDescriptor {
            print_partial: true,
            ..Default::default()
        });
        let (exit, out) = run_with(GeneralConfig::default(), descriptor, host, None, None).await;
        assert_eq!(out, "3\n4\n");
        assert_eq!(exit.stdout.as_deref(), Some("4\n"));
    }

    #[tokio::test]
    async fn test_host_failure_exits_one() {
        let failure = HostError::Task("no terminal".into());
        let host = ScriptedHost::new(vec![HostEvent::Failed(failure)]);
        let descriptor = DialogDescriptor::Entry(EntryDescriptor::default());
        let (exit, _) = run_with(GeneralConfig::default(), descriptor, host, None, None).await;
        assert_eq!(exit, Exit::failure());
    }

    #[tokio::test]
    async fn test_notification_delivered_without_host() {
        let host = ScriptedHost::new(vec![]);
        let launched = Arc::clone(&host.launched);
        let transport = FakeTransport {
            available: true,
            ..Default::default()
        };
        let sent = Arc::clone(&transport.sent);
        let descriptor = DialogDescriptor::Notification(NotificationDescriptor {
            text: "Backup finished".into(),
            ..Default::default()
        });

        let (exit, _) = run_with(GeneralConfig::default(), descriptor, host, Some(transport), None).await;
        assert_eq!(exit, Exit::silent());
        assert!(!launched.load(Ordering::SeqCst));
        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].summary, "Backup finished");
    }

    #[tokio::test]
    async fn test_notification_falls_back_to_host() {
        let host = ScriptedHost::new(vec![]).responding(|command| match command {
            HostCommand::ShowFallback { dismissable: true, .. } => Some(HostEvent::Accepted(Answer::Acknowledged)),
            _ => None,
        });
        let log = Arc::clone(&host.log);
        let descriptor = DialogDescriptor::Notification(NotificationDescriptor {
            text: "hello".into(),
            ..Default::default()
        });

        let transport = FakeTransport::default();
        let (exit, _) = run_with(GeneralConfig::default(), descriptor, host, Some(transport), None).await;
        assert_eq!(exit, Exit::silent());
        assert_eq!(
            log.lock().unwrap()[0],
            HostCommand::ShowFallback {
                text: "hello".into(),
                dismissable: true
            }
        );
    }

    #[tokio::test]
    async fn test_listening_notification_until_end_of_stream() {
        let transport = FakeTransport {
            available: true,
            ..Default::default()
        };
        let sent = Arc::clone(&transport.sent);
        let descriptor = DialogDescriptor::Notification(NotificationDescriptor {
            listen: true,
            ..Default::default()
        });
        let input = Some(&b"message: one\nbogus\ntooltip:  two \n"[..]);

        let (exit, _) =
            run_with(GeneralConfig::default(), descriptor, ScriptedHost::new(vec![]), Some(transport), input).await;
        assert_eq!(exit, Exit::silent());
        let bodies: Vec<String> = sent.lock().unwrap().iter().map(|n| n.body.clone()).collect();
        assert_eq!(bodies, vec!["one", "two"]);
    }
}
