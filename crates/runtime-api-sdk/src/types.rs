// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! High-level types for the SDK.

use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use runtime_api_protocol::InvocationMetadata;
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};

/// Boxed byte stream used for payloads and streamed responses.
pub type ByteReader = Pin<Box<dyn AsyncRead + Send>>;

/// Input bytes of an invocation.
///
/// The stream is handed over unbuffered and can be read exactly once.
pub struct Payload {
    inner: ByteReader,
}

impl Payload {
    /// Wrap a reader.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + 'static,
    {
        Self {
            inner: Box::pin(reader),
        }
    }

    /// Payload backed by an in-memory buffer.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self::from_reader(io::Cursor::new(bytes.into()))
    }

    /// Payload with no bytes.
    pub fn empty() -> Self {
        Self::from_bytes(Bytes::new())
    }

    /// Read the whole payload into memory.
    pub async fn into_bytes(mut self) -> io::Result<Bytes> {
        let mut buf = Vec::new();
        self.inner.read_to_end(&mut buf).await?;
        Ok(Bytes::from(buf))
    }
}

impl AsyncRead for Payload {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        self.inner.as_mut().poll_read(cx, buf)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload").finish_non_exhaustive()
    }
}

/// One unit of work delivered by the host.
///
/// Metadata is read-only. The payload is moved out with
/// [`Invocation::into_parts`] so it cannot be consumed twice.
#[derive(Debug)]
pub struct Invocation {
    metadata: InvocationMetadata,
    payload: Payload,
}

impl Invocation {
    pub fn new(metadata: InvocationMetadata, payload: Payload) -> Self {
        Self { metadata, payload }
    }

    pub fn metadata(&self) -> &InvocationMetadata {
        &self.metadata
    }

    /// Unique id of this invocation.
    pub fn request_id(&self) -> &str {
        self.metadata.request_id()
    }

    /// Time left until the deadline, measured against the system clock.
    pub fn remaining_time(&self) -> Option<Duration> {
        self.metadata.remaining_time(chrono::Utc::now())
    }

    /// Split into metadata and the payload stream.
    pub fn into_parts(self) -> (InvocationMetadata, Payload) {
        (self.metadata, self.payload)
    }
}

/// Output of an invocation.
pub enum ResponseBody {
    /// Fully buffered output, sent with a known length.
    Bytes(Bytes),
    /// Output of unknown size, streamed chunk by chunk.
    Stream(ByteReader),
}

impl ResponseBody {
    /// Zero-length output.
    pub fn empty() -> Self {
        ResponseBody::Bytes(Bytes::new())
    }

    /// Stream output from a reader.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + 'static,
    {
        ResponseBody::Stream(Box::pin(reader))
    }

    /// Size in bytes when known up front.
    pub fn known_len(&self) -> Option<usize> {
        match self {
            ResponseBody::Bytes(bytes) => Some(bytes.len()),
            ResponseBody::Stream(_) => None,
        }
    }
}

impl From<Bytes> for ResponseBody {
    fn from(bytes: Bytes) -> Self {
        ResponseBody::Bytes(bytes)
    }
}

impl From<Vec<u8>> for ResponseBody {
    fn from(bytes: Vec<u8>) -> Self {
        ResponseBody::Bytes(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for ResponseBody {
    fn from(bytes: &'static [u8]) -> Self {
        ResponseBody::Bytes(Bytes::from_static(bytes))
    }
}

impl From<String> for ResponseBody {
    fn from(text: String) -> Self {
        ResponseBody::Bytes(Bytes::from(text))
    }
}

impl From<Payload> for ResponseBody {
    fn from(payload: Payload) -> Self {
        ResponseBody::Stream(payload.inner)
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            ResponseBody::Stream(_) => f.debug_tuple("Stream").finish(),
        }
    }
}
