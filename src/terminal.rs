//! Terminal host
//!
//! Plays the browser: asks for the field values on stdin, fires a submit for
//! every filled in form and prints the list of created links.

use std::cell::RefCell;
use std::future::Future;
use std::io::BufRead;
use std::io::Write;
use std::pin::Pin;

use anyhow::Result;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

use crate::controller::Controller;
use crate::controller::Error;
use crate::endpoint::Endpoint;
use crate::page::Notifier;
use crate::page::Page;

/// Lines buffered between the stdin thread and the form
const LINE_BUFFER: usize = 16;

/// Notifications are written to `out`, stdout by default
pub struct Terminal<W = std::io::Stdout> {
    out: RefCell<W>,
}

impl Terminal {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W> Terminal<W>
where
    W: Write,
{
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }
}

impl<W> Notifier for Terminal<W>
where
    W: Write,
{
    fn alert(&self, message: &str) {
        let mut out = self.out.borrow_mut();

        if let Err(err) = writeln!(out, "!! {message}").and_then(|()| out.flush()) {
            tracing::warn!(r#"Could not show "{message}": {err}"#);
        }
    }
}

/// Read stdin on its own thread, line by line
///
/// A blocking read can not be cancelled, so it must not live on the runtime:
/// the runtime would wait for it on shutdown. The thread ends when stdin
/// closes or the receiver is dropped; at exit it is simply abandoned.
pub fn stdin_lines() -> mpsc::Receiver<String> {
    let (sender, receiver) = mpsc::channel(LINE_BUFFER);

    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };

            if sender.blocking_send(line).is_err() {
                break;
            }
        }
    });

    receiver
}

/// Run the form until the lines run out or `shutdown` resolves
///
/// A submission still in flight at shutdown is dropped, which unlocks the
/// form like any other ending.
pub async fn run<N, E, W, S>(
    page: &Page<N>,
    controller: &Controller<'_, N, E>,
    lines: &mut mpsc::Receiver<String>,
    out: &mut W,
    shutdown: S,
) -> Result<()>
where
    N: Notifier,
    E: Endpoint,
    W: AsyncWrite + Unpin,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    if let (Some(min), Some(max)) = (page.expiry.min(), page.expiry.max()) {
        write(out, &format!("Links expire between {min} and {max} (UTC)\n")).await?;
    }

    loop {
        write(out, "Destination: ").await?;
        let Some(destination) = next_line(lines, shutdown.as_mut()).await else {
            break;
        };
        page.destination.set_value(&destination);

        write(out, &format!("Expires [{}]: ", page.expiry.value())).await?;
        let Some(expiry) = next_line(lines, shutdown.as_mut()).await else {
            break;
        };

        // keep the current value when nothing is entered
        if !expiry.trim().is_empty() {
            page.expiry.set_value(&expiry);
        }

        let result = tokio::select! {
            () = shutdown.as_mut() => break,
            result = controller.submit() => result,
        };

        match result {
            Ok(()) => {
                for row in page.list.rows() {
                    write(out, &format!("  {row}\n")).await?;
                }
            }
            Err(Error::Invalid { field, validity }) => {
                write(out, &format!("{field}: {validity}\n")).await?;
            }
            Err(err) => tracing::debug!("Submission ended without a link: {err}"),
        }
    }

    Ok(())
}

/// Next line, `None` once the lines run out or shutdown wins
async fn next_line<S>(lines: &mut mpsc::Receiver<String>, shutdown: Pin<&mut S>) -> Option<String>
where
    S: Future<Output = ()>,
{
    tokio::select! {
        () = shutdown => None,
        line = lines.recv() => line,
    }
}

async fn write<W>(out: &mut W, text: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(text.as_bytes()).await?;
    out.flush().await?;

    Ok(())
}
