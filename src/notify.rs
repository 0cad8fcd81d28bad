//! Desktop notifications
//!
//! Notifications go to `org.freedesktop.Notifications` on the session bus.
//! Each call replaces the previous bubble by passing its id back, so a
//! listening notification updates in place instead of stacking.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use tracing::{debug, info};
use zbus::names::{BusName, WellKnownName};
use zbus::zvariant::Value;
use zbus::Connection;

use crate::error::NotifyError;

const SERVICE: &str = "org.freedesktop.Notifications";
const OBJECT_PATH: &str = "/org/freedesktop/Notifications";
const APP_NAME: &str = "rdialog";
const APP_ICON: &str = "dialog-information";
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Longest message used as its own summary.
const SUMMARY_MAX: usize = 32;
/// Length of a truncated summary, before the ellipsis.
const SUMMARY_CUT: usize = 25;

/// Short title for a message: the message itself when short enough,
/// otherwise its first characters and an ellipsis.
pub fn summarize(message: &str) -> String {
    if message.chars().count() <= SUMMARY_MAX {
        return message.to_string();
    }
    let mut summary: String = message.chars().take(SUMMARY_CUT).collect();
    summary.push_str("...");
    summary
}

/// Split a `key:value:key:value` string into pairs. A trailing key
/// without a value is dropped.
pub fn parse_hints(hints: &str) -> BTreeMap<String, String> {
    if hints.is_empty() {
        return BTreeMap::new();
    }
    let parts: Vec<&str> = hints.split(':').collect();
    parts
        .chunks_exact(2)
        .map(|pair| (pair[0].to_string(), pair[1].to_string()))
        .collect()
}

/// One notification, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub summary: String,
    pub body: String,
    pub hints: BTreeMap<String, String>,
    /// Milliseconds, or -1 for the server default
    pub expire_timeout: i32,
}

impl Notification {
    pub fn new(message: &str, hints: &str, timeout_secs: Option<u64>) -> Self {
        let expire_timeout = timeout_secs
            .and_then(|secs| i32::try_from(secs.saturating_mul(1000)).ok())
            .unwrap_or(-1);
        Self {
            summary: summarize(message),
            body: message.to_string(),
            hints: parse_hints(hints),
            expire_timeout,
        }
    }
}

/// Something that can put a notification on screen.
#[allow(async_fn_in_trait)]
pub trait NotificationTransport {
    /// Whether notifications can currently be delivered.
    async fn is_available(&mut self) -> bool;

    /// Deliver `notification`, replacing the previous one. Returns its id.
    async fn notify(&mut self, notification: &Notification) -> Result<u32, NotifyError>;
}

/// Notification transport over the D-Bus session bus.
#[derive(Default)]
pub struct DbusNotifier {
    connection: Option<Connection>,
    last_id: u32,
}

impl DbusNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    async fn connection(&mut self) -> Result<&Connection, NotifyError> {
        let connection = match self.connection.take() {
            Some(connection) => connection,
            None => Connection::session().await?,
        };
        Ok(self.connection.insert(connection))
    }

    async fn probe(&mut self) -> Result<bool, NotifyError> {
        let connection = self.connection().await?;
        let dbus = zbus::fdo::DBusProxy::new(connection).await?;
        let name = BusName::from(WellKnownName::from_static_str_unchecked(SERVICE));
        Ok(dbus.name_has_owner(name).await?)
    }
}

impl NotificationTransport for DbusNotifier {
    async fn is_available(&mut self) -> bool {
        match tokio::time::timeout(PROBE_TIMEOUT, self.probe()).await {
            Ok(Ok(owned)) => {
                debug!("{} has owner: {}", SERVICE, owned);
                owned
            }
            Ok(Err(e)) => {
                info!("Notification service unreachable: {}", e);
                false
            }
            Err(_) => {
                info!("{}", NotifyError::ProbeTimeout);
                false
            }
        }
    }

    async fn notify(&mut self, notification: &Notification) -> Result<u32, NotifyError> {
        let replaces_id = self.last_id;
        let connection = self.connection().await?.clone();
        let proxy = zbus::Proxy::new(&connection, SERVICE, OBJECT_PATH, SERVICE).await?;

        let hints: HashMap<&str, Value<'_>> = notification
            .hints
            .iter()
            .map(|(key, value)| (key.as_str(), Value::from(value.as_str())))
            .collect();
        let actions: Vec<&str> = Vec::new();

        let id: u32 = proxy
            .call(
                "Notify",
                &(
                    APP_NAME,
                    replaces_id,
                    APP_ICON,
                    notification.summary.as_str(),
                    notification.body.as_str(),
                    actions,
                    hints,
                    notification.expire_timeout,
                ),
            )
            .await?;

        debug!("Notification {} shown (replaced {})", id, replaces_id);
        self.last_id = id;
        Ok(id)
    }
}
