//! Data sources accepted by a save.
//!
//! 保存操作接受的数据源。
//!
//! A source is resolved once, when the save starts, into a [`WriteSource`]
//! following [`WritePath::PRIORITY`]: a stream capability wins over a body
//! capability, and everything else is read fully and written in one call.

use std::fmt;
use std::future::Future;

use bytes::{Bytes, BytesMut};
use futures::future::BoxFuture;
use futures::stream::{self, BoxStream, StreamExt};

use crate::{HostError, MimeType};

/// Chunked byte stream fed into a writable destination.
pub type ByteStream = BoxStream<'static, Result<Bytes, HostError>>;

/// Chunk size used when an in-memory blob is turned into a stream.
pub const BLOB_STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// In-memory bytes with an optional declared media type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blob {
    data: Bytes,
    mime: Option<MimeType>,
}

impl Blob {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            mime: None,
        }
    }

    /// An empty `mime` leaves the blob untyped.
    pub fn with_type(data: impl Into<Bytes>, mime: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime: MimeType::non_empty(mime),
        }
    }

    pub fn mime(&self) -> Option<&MimeType> {
        self.mime.as_ref()
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    /// Streams the blob in [`BLOB_STREAM_CHUNK_SIZE`] slices without copying.
    pub fn stream(&self) -> ByteStream {
        let data = self.data.clone();
        let chunks: Vec<Bytes> = (0..data.len())
            .step_by(BLOB_STREAM_CHUNK_SIZE)
            .map(|start| data.slice(start..(start + BLOB_STREAM_CHUNK_SIZE).min(data.len())))
            .collect();
        stream::iter(chunks.into_iter().map(Ok)).boxed()
    }
}

/// Response headers. Lookups are case-insensitive and return the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A response-like source: header access plus an optional body stream.
pub struct ResponseSource {
    pub headers: Headers,
    pub body: Option<ByteStream>,
}

impl ResponseSource {
    pub fn new(headers: Headers, body: Option<ByteStream>) -> Self {
        Self { headers, body }
    }

    pub fn content_type(&self) -> Option<MimeType> {
        self.headers
            .get("content-type")
            .and_then(MimeType::non_empty)
    }
}

impl fmt::Debug for ResponseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseSource")
            .field("headers", &self.headers)
            .field("body", &self.body.as_ref().map(|_| "<stream>"))
            .finish()
    }
}

/// Everything a save can consume.
pub enum DataSource {
    /// In-memory bytes with an optional declared type. Streamable.
    Blob(Blob),
    /// Response-like source; its `content-type` header feeds type inference.
    Response(ResponseSource),
    /// Raw byte stream without type information.
    Stream(ByteStream),
    /// A blob that is still being produced. Only readable as a whole.
    Pending(BoxFuture<'static, Result<Blob, HostError>>),
    /// Plain buffer without stream capability.
    Bytes(Bytes),
}

/// Write strategy chosen for a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePath {
    /// Pipe a stream produced by the source itself.
    Stream,
    /// Pipe the body stream of a response-like source.
    Body,
    /// Read fully, write once, close.
    Buffer,
}

impl WritePath {
    /// Capability checks in descending order of preference.
    pub const PRIORITY: [WritePath; 3] = [WritePath::Stream, WritePath::Body, WritePath::Buffer];
}

impl DataSource {
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<Blob, HostError>> + Send + 'static,
    {
        Self::Pending(Box::pin(future))
    }

    /// The media type the source declares about itself.
    pub fn declared_type(&self) -> Option<MimeType> {
        match self {
            DataSource::Blob(blob) => blob.mime().cloned(),
            _ => None,
        }
    }

    /// Declared type first, then the `content-type` header of a response.
    pub fn inferred_type(&self) -> Option<MimeType> {
        self.declared_type().or_else(|| match self {
            DataSource::Response(response) => response.content_type(),
            _ => None,
        })
    }

    pub fn supports(&self, path: WritePath) -> bool {
        match path {
            WritePath::Stream => matches!(self, DataSource::Blob(_) | DataSource::Stream(_)),
            WritePath::Body => {
                matches!(self, DataSource::Response(response) if response.body.is_some())
            }
            WritePath::Buffer => true,
        }
    }

    pub fn write_path(&self) -> WritePath {
        WritePath::PRIORITY
            .into_iter()
            .find(|path| self.supports(*path))
            .unwrap_or(WritePath::Buffer)
    }

    /// Resolves the source into the payload for its [`write_path`](Self::write_path).
    pub fn into_write_source(self) -> WriteSource {
        match (self.write_path(), self) {
            (WritePath::Stream, DataSource::Blob(blob)) => WriteSource::Stream(blob.stream()),
            (WritePath::Stream, DataSource::Stream(stream)) => WriteSource::Stream(stream),
            (
                WritePath::Body,
                DataSource::Response(ResponseSource {
                    body: Some(body), ..
                }),
            ) => WriteSource::Body(body),
            (_, other) => WriteSource::Buffer(other.into_buffer()),
        }
    }

    fn into_buffer(self) -> BufferSource {
        match self {
            DataSource::Blob(blob) => BufferSource::Bytes(blob.into_bytes()),
            DataSource::Bytes(bytes) => BufferSource::Bytes(bytes),
            DataSource::Pending(future) => BufferSource::Pending(future),
            DataSource::Stream(stream) => BufferSource::Collect(stream),
            DataSource::Response(ResponseSource { body, .. }) => match body {
                Some(body) => BufferSource::Collect(body),
                None => BufferSource::Bytes(Bytes::new()),
            },
        }
    }
}

impl fmt::Debug for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Blob(blob) => f
                .debug_struct("Blob")
                .field("size", &blob.size())
                .field("mime", &blob.mime())
                .finish(),
            DataSource::Response(response) => response.fmt(f),
            DataSource::Stream(_) => f.write_str("Stream(<stream>)"),
            DataSource::Pending(_) => f.write_str("Pending(<future>)"),
            DataSource::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
        }
    }
}

impl From<Blob> for DataSource {
    fn from(blob: Blob) -> Self {
        DataSource::Blob(blob)
    }
}

impl From<ResponseSource> for DataSource {
    fn from(response: ResponseSource) -> Self {
        DataSource::Response(response)
    }
}

impl From<Bytes> for DataSource {
    fn from(bytes: Bytes) -> Self {
        DataSource::Bytes(bytes)
    }
}

impl From<Vec<u8>> for DataSource {
    fn from(bytes: Vec<u8>) -> Self {
        DataSource::Bytes(Bytes::from(bytes))
    }
}

/// Payload of a save after capability resolution.
pub enum WriteSource {
    Stream(ByteStream),
    Body(ByteStream),
    Buffer(BufferSource),
}

impl WriteSource {
    pub fn path(&self) -> WritePath {
        match self {
            WriteSource::Stream(_) => WritePath::Stream,
            WriteSource::Body(_) => WritePath::Body,
            WriteSource::Buffer(_) => WritePath::Buffer,
        }
    }
}

/// Something that can only be read as a whole.
pub enum BufferSource {
    Bytes(Bytes),
    Pending(BoxFuture<'static, Result<Blob, HostError>>),
    Collect(ByteStream),
}

impl BufferSource {
    pub async fn read_all(self) -> Result<Bytes, HostError> {
        match self {
            BufferSource::Bytes(bytes) => Ok(bytes),
            BufferSource::Pending(future) => Ok(future.await?.into_bytes()),
            BufferSource::Collect(mut stream) => {
                let mut buf = BytesMut::new();
                while let Some(chunk) = stream.next().await {
                    buf.extend_from_slice(&chunk?);
                }
                Ok(buf.freeze())
            }
        }
    }
}
