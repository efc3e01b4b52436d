use crate::codec::CodecError;
use crate::message_types::{
    NegotiationReply, NegotiationRequest, Reply, Request, UserPassReply, UserPassRequest,
};
use bytes::BytesMut;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::trace;

impl NegotiationReply {
    /// Writes `VER METHOD` in a single write.
    pub async fn write_to<W>(&self, writer: &mut W) -> Result<(), CodecError>
    where
        W: AsyncWrite + Unpin,
    {
        let bytes = self.to_bytes();
        writer.write_all(&bytes).await?;
        writer.flush().await?;

        trace!(version = bytes[0], method = bytes[1], "Sent negotiation reply");
        Ok(())
    }
}

impl UserPassReply {
    /// Writes `VER STATUS` in a single write.
    pub async fn write_to<W>(&self, writer: &mut W) -> Result<(), CodecError>
    where
        W: AsyncWrite + Unpin,
    {
        let bytes = self.to_bytes();
        writer.write_all(&bytes).await?;
        writer.flush().await?;

        trace!(version = bytes[0], status = bytes[1], "Sent username/password reply");
        Ok(())
    }
}

impl Reply {
    /// Writes the reply as three consecutive writes: the 4-byte header, the
    /// bound address (length-prefixed for domains) and the bound port.
    ///
    /// A failure in any of them leaves the reply partially sent; nothing is
    /// retried.
    pub async fn write_to<W>(&self, writer: &mut W) -> Result<(), CodecError>
    where
        W: AsyncWrite + Unpin,
    {
        let header = self.header();
        let address = self.address.to_bytes();

        writer.write_all(&header).await?;
        writer.write_all(&address).await?;
        writer.write_all(&self.port.to_be_bytes()).await?;
        writer.flush().await?;

        trace!(
            version = header[0],
            code = header[1],
            reserved = header[2],
            atyp = header[3],
            address = %self.address,
            port = self.port,
            "Sent reply"
        );
        Ok(())
    }
}

impl NegotiationRequest {
    pub async fn write_to<W>(&self, writer: &mut W) -> Result<(), CodecError>
    where
        W: AsyncWrite + Unpin,
    {
        let mut buf = BytesMut::with_capacity(2 + self.methods().len());
        self.encode(&mut buf);
        writer.write_all(&buf).await?;
        writer.flush().await?;

        trace!(
            method_count = self.method_count(),
            methods = ?self.methods(),
            "Sent negotiation request"
        );
        Ok(())
    }
}

impl UserPassRequest {
    pub async fn write_to<W>(&self, writer: &mut W) -> Result<(), CodecError>
    where
        W: AsyncWrite + Unpin,
    {
        let mut buf = BytesMut::with_capacity(3 + self.username().len() + self.password().len());
        self.encode(&mut buf);
        writer.write_all(&buf).await?;
        writer.flush().await?;

        trace!(
            username_len = self.username_len(),
            password_len = self.password_len(),
            "Sent username/password request"
        );
        Ok(())
    }
}

impl Request {
    pub async fn write_to<W>(&self, writer: &mut W) -> Result<(), CodecError>
    where
        W: AsyncWrite + Unpin,
    {
        let mut buf = BytesMut::with_capacity(4 + self.destination.encoded_len() + 2);
        self.encode(&mut buf);
        writer.write_all(&buf).await?;
        writer.flush().await?;

        trace!(
            command = ?self.command,
            destination = %self.destination,
            port = self.port,
            "Sent request"
        );
        Ok(())
    }
}
