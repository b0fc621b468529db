//! Scripted transport doubles for unit tests.
//!
//! Stand-ins for a real socket pair: a reader that serves a fixed script of
//! chunk-or-error results (one per read call) and a writer that records
//! what it accepts, optionally limiting or failing individual writes.

use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// Serves one scripted result per read call; end of script is EOF.
pub(crate) struct ScriptedReader {
    script: VecDeque<io::Result<Vec<u8>>>,
    /// Panic instead of returning EOF, for tests asserting no read happens.
    panic_on_read: bool,
}

impl ScriptedReader {
    pub(crate) fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            script: chunks.into_iter().map(Ok).collect(),
            panic_on_read: false,
        }
    }

    pub(crate) fn with_results(results: Vec<io::Result<Vec<u8>>>) -> Self {
        Self {
            script: results.into_iter().collect(),
            panic_on_read: false,
        }
    }

    pub(crate) fn panicking() -> Self {
        Self {
            script: VecDeque::new(),
            panic_on_read: true,
        }
    }
}

impl AsyncRead for ScriptedReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.script.pop_front() {
            Some(Ok(mut chunk)) => {
                let n = chunk.len().min(buf.remaining());
                buf.put_slice(&chunk[..n]);
                if n < chunk.len() {
                    // Keep what did not fit for the next read call.
                    chunk.drain(..n);
                    self.script.push_front(Ok(chunk));
                }
                Poll::Ready(Ok(()))
            }
            Some(Err(e)) => Poll::Ready(Err(e)),
            None => {
                assert!(!self.panic_on_read, "unexpected transport read");
                Poll::Ready(Ok(()))
            }
        }
    }
}

/// Records written bytes; each write call consumes one scripted result.
///
/// `Ok(n)` accepts at most `n` bytes (a short write), `Err` fails the
/// call. An exhausted script accepts everything.
pub(crate) struct ScriptedWriter {
    script: VecDeque<io::Result<usize>>,
    pub(crate) written: Vec<u8>,
}

impl ScriptedWriter {
    pub(crate) fn accepting() -> Self {
        Self {
            script: VecDeque::new(),
            written: Vec::new(),
        }
    }

    pub(crate) fn with_results(results: Vec<io::Result<usize>>) -> Self {
        Self {
            script: results.into_iter().collect(),
            written: Vec::new(),
        }
    }

    pub(crate) fn failing() -> Self {
        Self::with_results(vec![Err(io::Error::from(io::ErrorKind::ConnectionRefused))])
    }
}

impl AsyncWrite for ScriptedWriter {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.script.pop_front() {
            Some(Ok(limit)) => {
                let n = limit.min(buf.len());
                self.written.extend_from_slice(&buf[..n]);
                Poll::Ready(Ok(n))
            }
            Some(Err(e)) => Poll::Ready(Err(e)),
            None => {
                self.written.extend_from_slice(buf);
                Poll::Ready(Ok(buf.len()))
            }
        }
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
