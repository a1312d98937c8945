//! Splitting a streamed response body into events
//!
//! Streaming operations write one JSON document per event and terminate
//! each event with a blank line (`\n\n`). Chunks from the network arrive with
//! arbitrary boundaries, so [`EventFramer`] buffers until a separator is seen.

use bytes::{Buf, Bytes, BytesMut};

const SEPARATOR: &[u8] = b"\n\n";

/// Incremental event splitter for streamed bodies
#[derive(Debug, Default)]
pub struct EventFramer {
    buffer: BytesMut,
    // Bytes of `buffer` already known not to contain a separator
    scanned: usize,
}

impl EventFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every event it completed, in order
    ///
    /// Blank events (stray separators, keep-alive newlines) are dropped.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Bytes> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.find_separator() {
            let event = self.buffer.split_to(pos).freeze();
            self.buffer.advance(SEPARATOR.len());
            self.scanned = 0;
            if !is_blank(&event) {
                events.push(event);
            }
        }
        events
    }

    /// Flush the trailing partial event once the stream has closed
    pub fn finish(&mut self) -> Option<Bytes> {
        self.scanned = 0;
        let rest = self.buffer.split().freeze();
        (!is_blank(&rest)).then_some(rest)
    }

    /// Number of buffered bytes not yet emitted
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    fn find_separator(&mut self) -> Option<usize> {
        // A separator may straddle the previous scan boundary
        let start = self.scanned.saturating_sub(SEPARATOR.len() - 1);
        let found = self.buffer[start..]
            .windows(SEPARATOR.len())
            .position(|w| w == SEPARATOR)
            .map(|offset| start + offset);
        if found.is_none() {
            self.scanned = self.buffer.len();
        }
        found
    }
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}
