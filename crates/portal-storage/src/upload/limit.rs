//! Byte-counting stream wrapper that stops at a size limit.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future;
use futures::stream::{self, StreamExt};

use portal_core::traits::storage::ByteStream;

/// Set when a [`limit_stream`] gives up because the limit was exceeded.
#[derive(Debug, Clone, Default)]
pub struct LimitTripped(Arc<AtomicBool>);

impl LimitTripped {
    /// Whether the limit was exceeded.
    pub fn is_tripped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn trip(&self) {
        self.0.store(true, Ordering::Release);
    }
}

/// Wrap `inner` so it fails once more than `max_bytes` have passed through.
///
/// An upstream error of kind [`io::ErrorKind::FileTooLarge`] (e.g. a body
/// limit hit by the HTTP layer) counts as exceeding the limit as well.
pub fn limit_stream(inner: ByteStream, max_bytes: u64) -> (ByteStream, LimitTripped) {
    let tripped = LimitTripped::default();
    let flag = tripped.clone();
    let mut seen = 0u64;

    let limited = inner.map(move |chunk| {
        let chunk = chunk.inspect_err(|e| {
            if e.kind() == io::ErrorKind::FileTooLarge {
                flag.trip();
            }
        })?;
        seen += chunk.len() as u64;
        if seen > max_bytes {
            flag.trip();
            return Err(too_large(max_bytes));
        }
        Ok(chunk)
    });

    (Box::pin(limited), tripped)
}

/// Cap a whole request body at `max_bytes`.
///
/// Unlike [`limit_stream`], the part of an oversized chunk that still fits is
/// passed on before the error, so a parser reading the stream sees every
/// byte up to the cap. Nothing is yielded after the error.
pub fn cap_stream(inner: ByteStream, max_bytes: u64) -> (ByteStream, LimitTripped) {
    let tripped = LimitTripped::default();
    let flag = tripped.clone();
    let mut remaining = max_bytes;

    let capped = inner
        .scan(false, move |exhausted, chunk| {
            if *exhausted {
                return future::ready(None);
            }
            let items = match chunk {
                Ok(chunk) if chunk.len() as u64 <= remaining => {
                    remaining -= chunk.len() as u64;
                    vec![Ok(chunk)]
                }
                Ok(chunk) => {
                    *exhausted = true;
                    flag.trip();
                    // remaining < chunk.len() here, so it fits in usize.
                    let head = chunk.slice(..remaining as usize);
                    remaining = 0;
                    let mut items = Vec::with_capacity(2);
                    if !head.is_empty() {
                        items.push(Ok(head));
                    }
                    items.push(Err(too_large(max_bytes)));
                    items
                }
                Err(e) => vec![Err(e)],
            };
            future::ready(Some(stream::iter(items)))
        })
        .flatten();

    (Box::pin(capped), tripped)
}

fn too_large(max_bytes: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::FileTooLarge,
        format!("upload exceeds {max_bytes} bytes"),
    )
}
