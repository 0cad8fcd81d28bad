//! Text streamed into a text-info dialog

use std::time::Duration;

use crate::descriptor::TextInfoDescriptor;
use crate::host::HostCommand;

use super::{Effect, UpdateEvent};

const MIN_SCROLL: i64 = 200;
const MAX_SCROLL: i64 = 2500;

/// Duration of the scroll animation over `distance` pixels, in
/// milliseconds per pixel within bounds. Nothing to animate when the
/// view is already at the end.
pub fn scroll_duration(distance: i64) -> Option<Duration> {
    if distance <= 0 {
        return None;
    }
    let millis = distance.clamp(MIN_SCROLL, MAX_SCROLL);
    u64::try_from(millis).ok().map(Duration::from_millis)
}

/// Buffers text while a scroll animation runs so that appends never
/// fight the animation.
#[derive(Debug, Clone, Default)]
pub struct TextInfoState {
    pending: String,
    animating: bool,
    auto_scroll: bool,
}

impl TextInfoState {
    pub fn new(descriptor: &TextInfoDescriptor) -> Self {
        Self {
            auto_scroll: descriptor.auto_scroll,
            ..Default::default()
        }
    }

    pub fn apply(&mut self, event: UpdateEvent) -> Vec<Effect> {
        match event {
            UpdateEvent::AppendText(text) => {
                self.pending.push_str(&text);
                self.flush()
            }
            _ => Vec::new(),
        }
    }

    /// The host finished (or skipped) a scroll animation.
    pub fn scroll_settled(&mut self) -> Vec<Effect> {
        self.animating = false;
        self.flush()
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    fn flush(&mut self) -> Vec<Effect> {
        if self.animating || self.pending.is_empty() {
            return Vec::new();
        }
        self.animating = self.auto_scroll;
        vec![Effect::Host(HostCommand::AppendText {
            text: std::mem::take(&mut self.pending),
            scroll: self.auto_scroll,
        })]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TextSource;

    fn descriptor(auto_scroll: bool) -> TextInfoDescriptor {
        TextInfoDescriptor {
            source: TextSource::Stdin,
            editable: false,
            font: None,
            checkbox: None,
            auto_scroll,
        }
    }

    fn append(text: &str) -> UpdateEvent {
        UpdateEvent::AppendText(text.to_string())
    }

    #[test]
    fn test_scroll_duration_bounds() {
        assert_eq!(scroll_duration(0), None);
        assert_eq!(scroll_duration(-20), None);
        assert_eq!(scroll_duration(5), Some(Duration::from_millis(200)));
        assert_eq!(scroll_duration(800), Some(Duration::from_millis(800)));
        assert_eq!(scroll_duration(90_000), Some(Duration::from_millis(2500)));
    }

    #[test]
    fn test_without_auto_scroll_every_line_flushes() {
        let mut text = TextInfoState::new(&descriptor(false));
        assert_eq!(text.apply(append("a\n")).len(), 1);
        assert_eq!(text.apply(append("b\n")).len(), 1);
        assert!(text.pending().is_empty());
    }

    #[test]
    fn test_text_waits_for_scroll_to_settle() {
        let mut text = TextInfoState::new(&descriptor(true));
        let first = text.apply(append("a\n"));
        assert_eq!(
            first,
            vec![Effect::Host(HostCommand::AppendText {
                text: "a\n".into(),
                scroll: true
            })]
        );
        assert!(text.apply(append("b\n")).is_empty());
        assert!(text.apply(append("c\n")).is_empty());
        assert_eq!(text.pending(), "b\nc\n");

        let flushed = text.scroll_settled();
        assert_eq!(
            flushed,
            vec![Effect::Host(HostCommand::AppendText {
                text: "b\nc\n".into(),
                scroll: true
            })]
        );
        assert!(text.scroll_settled().is_empty());
    }
}
