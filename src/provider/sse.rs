//! Incremental Server-Sent Events decoding for streamed completions.

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SseEvent {
    /// Joined `data:` lines of one event.
    Data(String),
    /// The OpenAI-style `data: [DONE]` terminator.
    Done,
}

/// Line-buffered SSE decoder.
///
/// - Bytes may arrive split anywhere, including inside a UTF-8 sequence
/// - An event ends at a blank line
/// - Fields other than `data:` are ignored
#[derive(Debug, Default)]
pub(crate) struct SseDecoder {
    buf: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, chunk: &[u8]) -> anyhow::Result<Vec<SseEvent>> {
        self.buf.extend_from_slice(chunk);
        let mut out = Vec::new();

        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }

            if line.is_empty() {
                if let Some(ev) = self.flush() {
                    out.push(ev);
                }
                continue;
            }

            let line = String::from_utf8(line)
                .map_err(|e| anyhow::anyhow!(e).context("SSE line is not valid UTF-8"))?;
            if let Some(rest) = line.strip_prefix("data:") {
                self.data.push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
            }
        }

        Ok(out)
    }

    /// Emit whatever event is pending once the body has ended.
    pub(crate) fn finish(&mut self) -> Option<SseEvent> {
        self.flush()
    }

    fn flush(&mut self) -> Option<SseEvent> {
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        if data.trim() == "[DONE]" {
            Some(SseEvent::Done)
        } else {
            Some(SseEvent::Data(data))
        }
    }
}
