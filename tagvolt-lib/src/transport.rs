use crate::command::CommandFrame;
use crate::error::TagError;
use crate::response::ResponseFrame;
use bytes::Bytes;
use tracing::debug;

/// Capability the host platform supplies for talking to the physical tag.
///
/// The engine never holds the link open: every protocol exchange is one
/// scoped connect, transceive, close. Timeout behavior belongs entirely to
/// the implementation.
#[allow(async_fn_in_trait)]
pub trait TagTransport {
    /// Establish the link. Fails with [`TagError::TransportUnavailable`]
    /// when the tag cannot be reached.
    async fn connect(&mut self) -> Result<(), TagError>;

    /// Exchange one frame. Fails with [`TagError::TransportIo`] on timeout
    /// or link error.
    async fn transceive(&mut self, frame: &[u8]) -> Result<Bytes, TagError>;

    /// Release the link. Idempotent.
    async fn close(&mut self);
}

/// Perform one scoped command exchange: connect, transceive, close.
///
/// `close` is always called once `connect` succeeded, even when the
/// transceive itself failed.
pub async fn exchange<T: TagTransport>(
    transport: &mut T,
    frame: CommandFrame,
) -> Result<ResponseFrame, TagError> {
    transport.connect().await?;
    let result = transport.transceive(frame.as_bytes()).await;
    transport.close().await;
    let bytes = result?;
    debug!("exchanged {} -> {} response bytes", frame, bytes.len());
    Ok(ResponseFrame::new(bytes))
}
