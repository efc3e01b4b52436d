use crate::codec::{BadRequest, CodecError};
use crate::message_types::{
    Address, AuthMethod, Command, DomainName, NegotiationReply, NegotiationRequest, Reply,
    ReplyCode, Request, UserPassReply, UserPassRequest, ATYP_DOMAIN, ATYP_IPV4, ATYP_IPV6,
    SOCKS_VERSION, USER_PASS_VERSION,
};
use bytes::Bytes;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::trace;

impl NegotiationRequest {
    /// Reads `VER NMETHODS METHODS` from `reader`.
    ///
    /// A zero method count fails with [`BadRequest::NoMethods`] before any
    /// method byte is read.
    pub async fn read_from<R>(reader: &mut R) -> Result<Self, CodecError>
    where
        R: AsyncRead + Unpin,
    {
        let [version, method_count]: [u8; 2] = read_array(reader).await?;
        if version != SOCKS_VERSION {
            return Err(CodecError::InvalidVersion(version));
        }
        if method_count == 0 {
            return Err(BadRequest::NoMethods.into());
        }

        let mut methods = vec![0u8; method_count as usize];
        reader.read_exact(&mut methods).await?;

        trace!(version, method_count, methods = ?methods, "Got negotiation request");
        Ok(NegotiationRequest::from_wire(&methods))
    }
}

impl NegotiationReply {
    pub async fn read_from<R>(reader: &mut R) -> Result<Self, CodecError>
    where
        R: AsyncRead + Unpin,
    {
        let [version, method]: [u8; 2] = read_array(reader).await?;
        if version != SOCKS_VERSION {
            return Err(CodecError::InvalidVersion(version));
        }

        trace!(version, method, "Got negotiation reply");
        Ok(NegotiationReply::new(AuthMethod::from(method)))
    }
}

impl UserPassRequest {
    /// Reads `VER ULEN UNAME PLEN PASSWD` from `reader`.
    ///
    /// The username and the password length byte are read as one block, so
    /// an empty password is reported after exactly `ULEN + 1` bytes of the
    /// body were consumed.
    pub async fn read_from<R>(reader: &mut R) -> Result<Self, CodecError>
    where
        R: AsyncRead + Unpin,
    {
        let [version, username_len]: [u8; 2] = read_array(reader).await?;
        if version != USER_PASS_VERSION {
            return Err(CodecError::InvalidUserPassVersion(version));
        }
        if username_len == 0 {
            return Err(BadRequest::EmptyUsername.into());
        }

        let mut username = vec![0u8; username_len as usize + 1];
        reader.read_exact(&mut username).await?;
        let password_len = match username.pop() {
            Some(len) if len > 0 => len,
            _ => return Err(BadRequest::EmptyPassword.into()),
        };

        let mut password = vec![0u8; password_len as usize];
        reader.read_exact(&mut password).await?;

        // Credentials themselves stay out of the trace.
        trace!(version, username_len, password_len, "Got username/password request");
        Ok(UserPassRequest::from_wire(
            Bytes::from(username),
            Bytes::from(password),
        ))
    }
}

impl UserPassReply {
    pub async fn read_from<R>(reader: &mut R) -> Result<Self, CodecError>
    where
        R: AsyncRead + Unpin,
    {
        let [version, status]: [u8; 2] = read_array(reader).await?;
        if version != USER_PASS_VERSION {
            return Err(CodecError::InvalidUserPassVersion(version));
        }

        trace!(version, status, "Got username/password reply");
        Ok(UserPassReply::new(status))
    }
}

impl Request {
    /// Reads `VER CMD RSV ATYP DST.ADDR DST.PORT` from `reader`.
    ///
    /// An unknown ATYP fails right after the 4-byte header; neither address
    /// nor port bytes are read in that case.
    pub async fn read_from<R>(reader: &mut R) -> Result<Self, CodecError>
    where
        R: AsyncRead + Unpin,
    {
        let [version, command, reserved, atyp]: [u8; 4] = read_array(reader).await?;
        if version != SOCKS_VERSION {
            return Err(CodecError::InvalidVersion(version));
        }

        let destination = read_address(reader, atyp).await?;
        let port = reader.read_u16().await?;

        trace!(
            version,
            command,
            reserved,
            atyp,
            destination = %destination,
            port,
            "Got request"
        );
        Ok(Request {
            command: Command::from(command),
            reserved,
            destination,
            port,
        })
    }
}

impl Reply {
    pub async fn read_from<R>(reader: &mut R) -> Result<Self, CodecError>
    where
        R: AsyncRead + Unpin,
    {
        let [version, code, reserved, atyp]: [u8; 4] = read_array(reader).await?;
        if version != SOCKS_VERSION {
            return Err(CodecError::InvalidVersion(version));
        }
        let code = ReplyCode::from(code);

        let address = read_address(reader, atyp).await?;
        let port = reader.read_u16().await?;

        trace!(version, code = ?code, reserved, atyp, address = %address, port, "Got reply");
        Ok(Reply::new(code, address, port))
    }
}

async fn read_array<R, const N: usize>(reader: &mut R) -> io::Result<[u8; N]>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf).await?;
    Ok(buf)
}

async fn read_address<R>(reader: &mut R, atyp: u8) -> Result<Address, CodecError>
where
    R: AsyncRead + Unpin,
{
    match atyp {
        ATYP_IPV4 => {
            let octets: [u8; 4] = read_array(reader).await?;
            Ok(Address::IPv4(Ipv4Addr::from(octets)))
        }
        ATYP_IPV6 => {
            let octets: [u8; 16] = read_array(reader).await?;
            Ok(Address::IPv6(Ipv6Addr::from(octets)))
        }
        ATYP_DOMAIN => {
            let len = reader.read_u8().await?;
            if len == 0 {
                return Err(BadRequest::EmptyDomain.into());
            }
            let mut name = vec![0u8; len as usize];
            reader.read_exact(&mut name).await?;
            Ok(Address::Domain(DomainName::from_wire(Bytes::from(name))))
        }
        other => Err(BadRequest::UnknownAddressType(other).into()),
    }
}
