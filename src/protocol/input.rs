//! Line source for the live protocol

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tracing::{debug, warn};

/// Set once the process stdin has been handed to a [`LiveInput`].
static STDIN_CLAIMED: AtomicBool = AtomicBool::new(false);

/// Delivers input one line at a time until end-of-stream, then stays
/// closed.
///
/// `next_line` is cancel safe: bytes read before the future is dropped
/// stay in the buffer and are returned by the next call.
pub struct LiveInput<R> {
    reader: Option<R>,
    buffer: Vec<u8>,
}

impl LiveInput<BufReader<Stdin>> {
    /// Claim the process stdin. Only the first call gets it; stdin is
    /// never opened twice and never reopened after it closes.
    pub fn stdin() -> Option<Self> {
        if STDIN_CLAIMED.swap(true, Ordering::SeqCst) {
            debug!("stdin already claimed");
            return None;
        }
        Some(Self::new(BufReader::new(tokio::io::stdin())))
    }
}

impl<R: AsyncBufRead + Unpin> LiveInput<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: Some(source),
            buffer: Vec::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    /// The next line, newline included when present. `None` once the
    /// stream has ended.
    pub async fn next_line(&mut self) -> Option<String> {
        let reader = self.reader.as_mut()?;
        match reader.read_until(b'\n', &mut self.buffer).await {
            Ok(0) if self.buffer.is_empty() => {
                debug!("stdin reached end of stream");
                self.reader = None;
                None
            }
            Ok(_) => {
                let line = String::from_utf8_lossy(&self.buffer).into_owned();
                self.buffer.clear();
                Some(line)
            }
            Err(e) => {
                warn!("Failed to read stdin: {}", e);
                self.reader = None;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lines_then_closed() {
        let mut input = LiveInput::new(&b"one\ntwo\nlast"[..]);
        assert_eq!(input.next_line().await.as_deref(), Some("one\n"));
        assert_eq!(input.next_line().await.as_deref(), Some("two\n"));
        assert_eq!(input.next_line().await.as_deref(), Some("last"));
        assert!(input.is_open());
        assert_eq!(input.next_line().await, None);
        assert!(!input.is_open());
        assert_eq!(input.next_line().await, None);
    }

    #[tokio::test]
    async fn test_empty_source() {
        let mut input = LiveInput::new(&b""[..]);
        assert_eq!(input.next_line().await, None);
        assert!(!input.is_open());
    }

    #[tokio::test]
    async fn test_stdin_is_claimed_once() {
        let _first = LiveInput::stdin();
        assert!(LiveInput::stdin().is_none());
    }
}
