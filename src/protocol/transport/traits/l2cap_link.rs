//! Minimal abstraction for the ACL link underneath one L2CAP channel. Allows the
//! driver to plug into an HCI transport, a socket, or an in-memory loopback.
use bytes::Bytes;
use futures_util::Future;

/// Contract to send and receive complete L2CAP PDUs (basic header included)
/// asynchronously.
pub trait L2capLink {
    type Error: core::fmt::Debug;
    /// Emit a PDU. Asynchronous to accommodate non-blocking controllers.
    fn send<'a>(&'a mut self, pdu: &'a [u8]) -> impl Future<Output = Result<(), Self::Error>> + 'a;
    /// Retrieve the next PDU addressed to this channel. Waits until data arrives.
    fn recv<'a>(&'a mut self) -> impl core::future::Future<Output = Result<Bytes, Self::Error>> + 'a;
}
