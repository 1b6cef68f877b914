//! Async adapters that drive a reader or writer from tokio I/O.
//!
//! The framing types never touch I/O themselves. These helpers pull chunks
//! from an `AsyncRead` or push framed records to an `AsyncWrite`.

use crate::streaming::channel::{FrameStats, ReadEvent};
use crate::streaming::receiver::FrameReader;
use crate::streaming::sender::FrameWriter;
use anyhow::{Context, Result};
use bytes::BytesMut;
use futures::stream::{self, Stream};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::VecDeque;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Read buffer size per `read` call (64KB)
pub const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Encoded records are batched up to this size before a write (64KB)
pub const WRITE_BATCH_SIZE: usize = 64 * 1024;

/// Read `r` to EOF, feeding every chunk to `frames`.
///
/// Each resolved record is passed to `on_event`; an error from the callback
/// stops the loop. A record left unterminated at EOF stays in the reader.
pub async fn read_stream<R, T, F>(
    r: &mut R,
    frames: &mut FrameReader<T>,
    mut on_event: F,
) -> Result<FrameStats>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
    F: FnMut(ReadEvent<T>) -> Result<()>,
{
    let mut buf = vec![0u8; READ_CHUNK_SIZE];
    let mut resolved = Vec::new();

    loop {
        let n = r.read(&mut buf).await.context("Failed to read from stream")?;
        if n == 0 {
            break;
        }

        frames.process_with(&buf[..n], |event| resolved.push(event));
        for event in resolved.drain(..) {
            on_event(event)?;
        }
    }

    if frames.has_pending() {
        tracing::debug!(
            "Stream ended with {} bytes of unterminated record",
            frames.pending_len()
        );
    }

    Ok(frames.stats().clone())
}

/// Frame every value and write it to `w`, then flush.
///
/// A value that fails to serialize is skipped and counted in
/// `serialize_failures`; the values after it are still written.
pub async fn write_values<W, I, V>(
    w: &mut W,
    frames: &mut FrameWriter,
    values: I,
) -> Result<FrameStats>
where
    W: AsyncWrite + Unpin,
    I: IntoIterator<Item = V>,
    V: Serialize,
{
    let mut batch = BytesMut::with_capacity(WRITE_BATCH_SIZE);

    for value in values {
        if let Err(e) = frames.encode_into(&value, &mut batch) {
            tracing::warn!("Skipping value: {}", e);
            continue;
        }

        if batch.len() >= WRITE_BATCH_SIZE {
            w.write_all(&batch).await.context("Failed to write records")?;
            batch.clear();
        }
    }

    if !batch.is_empty() {
        w.write_all(&batch).await.context("Failed to write records")?;
    }
    w.flush().await.context("Failed to flush writer")?;

    Ok(frames.stats().clone())
}

struct EventStreamState<R, T> {
    reader: R,
    frames: FrameReader<T>,
    queue: VecDeque<ReadEvent<T>>,
    buf: Vec<u8>,
    done: bool,
}

/// Turn an `AsyncRead` into a stream of resolved records.
///
/// The stream ends at EOF or after yielding the first read error.
pub fn event_stream<R, T>(reader: R, frames: FrameReader<T>) -> impl Stream<Item = Result<ReadEvent<T>>>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let state = EventStreamState {
        reader,
        frames,
        queue: VecDeque::new(),
        buf: vec![0u8; READ_CHUNK_SIZE],
        done: false,
    };

    stream::unfold(state, |mut s| async move {
        loop {
            if let Some(event) = s.queue.pop_front() {
                return Some((Ok(event), s));
            }
            if s.done {
                return None;
            }

            match s.reader.read(&mut s.buf).await {
                Ok(0) => s.done = true,
                Ok(n) => {
                    let EventStreamState {
                        frames, queue, buf, ..
                    } = &mut s;
                    frames.process_with(&buf[..n], |event| queue.push_back(event));
                }
                Err(e) => {
                    s.done = true;
                    let err = anyhow::Error::new(e).context("Failed to read from stream");
                    return Some((Err(err), s));
                }
            }
        }
    })
}

// =============================================================================
// Tests
// =============================================================================
