use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;

use crate::{ByteStream, HostError};

/// Sink opened on a file handle.
///
/// Writes are only committed by [`close`](Self::close); [`abort`](Self::abort)
/// discards them.
#[async_trait]
pub trait WritableFileStreamPort: Send {
    async fn write(&mut self, data: Bytes) -> Result<(), HostError>;

    async fn close(&mut self) -> Result<(), HostError>;

    async fn abort(&mut self) -> Result<(), HostError>;

    /// Pipes `stream` into this writable and closes it afterwards.
    ///
    /// A failing chunk aborts the writable and its error is returned. A
    /// failing abort is ignored in favour of the source's error.
    async fn pipe_from(&mut self, mut stream: ByteStream) -> Result<(), HostError> {
        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(err) => {
                    let _ = self.abort().await;
                    return Err(err);
                }
            };
            if let Err(err) = self.write(chunk).await {
                let _ = self.abort().await;
                return Err(err);
            }
        }
        self.close().await
    }
}
