// src/output/mod.rs

//! Output multiplexing for subprocess output.
//!
//! A [`Multiplexer`] is built once per pipeline run. It owns one writer
//! thread per destination and hands out cloneable [`OutputSink`]s that the
//! invoker writes raw subprocess bytes into.
//!
//! - The console destination goes through [`annotations::AnnotationWriter`].
//! - The log file destination receives the raw bytes verbatim.
//! - With neither, the sink discards everything.
//!
//! Each destination has its own unbounded channel, so a slow or failing
//! destination never blocks the others. Chunks reach every destination in the
//! order they were written to the sink.
//!
//! Sources mark where their output ends with [`OutputSink::end_line`], so an
//! unterminated last line is closed on the console instead of being joined
//! with the next source's first line. The raw destination ignores the mark.

pub mod annotations;

use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::Configuration;
use crate::errors::Result;
use crate::fs::FileSystem;

use self::annotations::AnnotationWriter;

type Chunk = Arc<[u8]>;

/// What travels through a destination channel.
struct Frame {
    bytes: Chunk,
    /// `bytes` end a line, newline or not.
    ends_line: bool,
}

/// Where a copy of the output stream goes.
pub enum Destination {
    /// Line-split, annotation-duplicating console output.
    Console(Box<dyn Write + Send>),
    /// Verbatim copy, e.g. the log file.
    Raw(Box<dyn Write + Send>),
}

impl Destination {
    fn label(&self) -> &'static str {
        match self {
            Destination::Console(_) => "console",
            Destination::Raw(_) => "log file",
        }
    }
}

/// Writable handle fanning bytes out to every destination.
#[derive(Clone, Default)]
pub struct OutputSink {
    senders: Arc<[mpsc::UnboundedSender<Frame>]>,
}

impl std::fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSink")
            .field("destinations", &self.senders.len())
            .finish()
    }
}

impl OutputSink {
    /// A sink that drops everything written to it.
    pub fn discard() -> Self {
        Self::default()
    }

    pub fn is_discarding(&self) -> bool {
        self.senders.is_empty()
    }

    /// Queue `bytes` for every destination. Never blocks.
    pub fn write(&self, bytes: &[u8]) {
        if !bytes.is_empty() {
            self.send(bytes, false);
        }
    }

    /// Close the current line, if it was left unterminated.
    pub fn end_line(&self) {
        self.send(&[], true);
    }

    /// Write `bytes` as the last piece of a line, terminated or not.
    pub fn write_line_end(&self, bytes: &[u8]) {
        self.send(bytes, true);
    }

    fn send(&self, bytes: &[u8], ends_line: bool) {
        if self.is_discarding() {
            return;
        }
        let chunk: Chunk = Arc::from(bytes);
        for tx in self.senders.iter() {
            // A closed channel means the destination is gone; others still
            // get their copy.
            let _ = tx.send(Frame {
                bytes: Arc::clone(&chunk),
                ends_line,
            });
        }
    }
}

/// Owns the destination writers for one pipeline run.
pub struct Multiplexer {
    sink: OutputSink,
    done: Vec<(&'static str, oneshot::Receiver<()>)>,
}

impl Multiplexer {
    /// Spawn one writer thread per destination.
    pub fn new(destinations: Vec<Destination>) -> Result<Self> {
        let mut senders = Vec::with_capacity(destinations.len());
        let mut done = Vec::with_capacity(destinations.len());

        for destination in destinations {
            let label = destination.label();
            let (tx, rx) = mpsc::unbounded_channel::<Frame>();
            let (done_tx, done_rx) = oneshot::channel::<()>();

            thread::Builder::new()
                .name(format!("output-{}", label.replace(' ', "-")))
                .spawn(move || {
                    drain(destination, rx);
                    let _ = done_tx.send(());
                })?;

            senders.push(tx);
            done.push((label, done_rx));
        }

        Ok(Self {
            sink: OutputSink {
                senders: senders.into(),
            },
            done,
        })
    }

    /// Build the destinations a configuration asks for.
    ///
    /// The log file is created (truncated) right away. Failing to create it
    /// only drops that destination: output is diagnostic and must not decide
    /// the outcome of a deployment.
    pub fn for_config(
        config: &Configuration,
        fs: &dyn FileSystem,
        console: Box<dyn Write + Send>,
    ) -> Result<Self> {
        let mut destinations = Vec::new();

        if !config.quiet {
            destinations.push(Destination::Console(console));
        }

        if let Some(path) = &config.log_file {
            match fs.create_truncated(path) {
                Ok(file) => {
                    debug!(path = %path.display(), "writing CLI output to log file");
                    destinations.push(Destination::Raw(file));
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "cannot create log file; continuing without it"
                    );
                }
            }
        }

        Self::new(destinations)
    }

    pub fn sink(&self) -> OutputSink {
        self.sink.clone()
    }

    /// Stop accepting output and wait for the destinations to drain.
    ///
    /// Sinks still held elsewhere (e.g. by a deploy process left running
    /// after a timeout) keep their destinations alive; waiting for those is
    /// bounded by `grace`.
    pub async fn close(self, grace: Duration) {
        let Multiplexer { sink, done } = self;
        drop(sink);

        let deadline = Instant::now() + grace;
        for (label, rx) in done {
            if tokio::time::timeout_at(deadline, rx).await.is_err() {
                debug!(
                    destination = label,
                    "output destination still attached to a running process"
                );
            }
        }
    }
}

/// Writer thread body: apply chunks in order until every sink is dropped.
fn drain(destination: Destination, mut rx: mpsc::UnboundedReceiver<Frame>) {
    let label = destination.label();
    let mut failed = false;

    let mut report = |err: std::io::Error| {
        if !failed {
            warn!(
                destination = label,
                error = %err,
                "output destination failed; dropping its output"
            );
            failed = true;
        }
    };

    match destination {
        Destination::Console(out) => {
            let mut writer = AnnotationWriter::new(out);
            while let Some(frame) = rx.blocking_recv() {
                let mut written = writer.push(&frame.bytes);
                if frame.ends_line {
                    written = written.and_then(|()| writer.end_line());
                }
                if let Err(err) = written {
                    report(err);
                    break;
                }
            }
            if let Err(err) = writer.finish() {
                report(err);
            }
        }
        Destination::Raw(mut out) => {
            while let Some(frame) = rx.blocking_recv() {
                if let Err(err) = out.write_all(&frame.bytes) {
                    report(err);
                    break;
                }
            }
            if let Err(err) = out.flush() {
                report(err);
            }
        }
    }

    // Keep consuming after a failure so queued chunks do not pile up.
    while rx.blocking_recv().is_some() {}
}
