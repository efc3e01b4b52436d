use crate::codec::{BadRequest, CodecError};
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

pub const SOCKS_VERSION: u8 = 0x05;
pub const USER_PASS_VERSION: u8 = 0x01;
pub const RESERVED: u8 = 0x00;

pub const ATYP_IPV4: u8 = 0x01;
pub const ATYP_DOMAIN: u8 = 0x03;
pub const ATYP_IPV6: u8 = 0x04;

/// Largest value a SOCKS5 length byte can carry.
pub const MAX_FIELD_LEN: usize = u8::MAX as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMethod {
    NoAuth,
    GssApi,
    UserPass,
    NoAcceptable,
    Other(u8),
}

impl From<u8> for AuthMethod {
    fn from(value: u8) -> Self {
        match value {
            0x00 => AuthMethod::NoAuth,
            0x01 => AuthMethod::GssApi,
            0x02 => AuthMethod::UserPass,
            0xFF => AuthMethod::NoAcceptable,
            other => AuthMethod::Other(other),
        }
    }
}

impl From<AuthMethod> for u8 {
    fn from(value: AuthMethod) -> Self {
        match value {
            AuthMethod::NoAuth => 0x00,
            AuthMethod::GssApi => 0x01,
            AuthMethod::UserPass => 0x02,
            AuthMethod::NoAcceptable => 0xFF,
            AuthMethod::Other(other) => other,
        }
    }
}

/// Method proposal sent by the client: `VER NMETHODS METHODS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiationRequest {
    methods: Vec<AuthMethod>,
}

impl NegotiationRequest {
    pub fn new(methods: Vec<AuthMethod>) -> Result<Self, CodecError> {
        match methods.len() {
            0 => Err(BadRequest::NoMethods.into()),
            n if n > MAX_FIELD_LEN => Err(BadRequest::TooManyMethods(n).into()),
            _ => Ok(Self { methods }),
        }
    }

    pub(crate) fn from_wire(methods: &[u8]) -> Self {
        Self {
            methods: methods.iter().copied().map(AuthMethod::from).collect(),
        }
    }

    pub fn version(&self) -> u8 {
        SOCKS_VERSION
    }

    pub fn methods(&self) -> &[AuthMethod] {
        &self.methods
    }

    /// Always in `1..=255`.
    pub fn method_count(&self) -> u8 {
        self.methods.len() as u8
    }

    pub fn supports(&self, method: AuthMethod) -> bool {
        self.methods.contains(&method)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiationReply {
    pub method: AuthMethod,
}

impl NegotiationReply {
    pub fn new(method: AuthMethod) -> Self {
        Self { method }
    }

    pub fn version(&self) -> u8 {
        SOCKS_VERSION
    }
}

/// Username/password sub-negotiation request (RFC 1929).
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassRequest {
    username: Bytes,
    password: Bytes,
}

impl UserPassRequest {
    pub fn new(username: impl Into<Bytes>, password: impl Into<Bytes>) -> Result<Self, CodecError> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() {
            return Err(BadRequest::EmptyUsername.into());
        }
        if password.is_empty() {
            return Err(BadRequest::EmptyPassword.into());
        }
        for field in [&username, &password] {
            if field.len() > MAX_FIELD_LEN {
                return Err(BadRequest::CredentialTooLong(field.len()).into());
            }
        }
        Ok(Self { username, password })
    }

    pub(crate) fn from_wire(username: Bytes, password: Bytes) -> Self {
        Self { username, password }
    }

    pub fn version(&self) -> u8 {
        USER_PASS_VERSION
    }

    pub fn username(&self) -> &[u8] {
        &self.username
    }

    pub fn password(&self) -> &[u8] {
        &self.password
    }

    pub fn username_len(&self) -> u8 {
        self.username.len() as u8
    }

    pub fn password_len(&self) -> u8 {
        self.password.len() as u8
    }
}

impl fmt::Debug for UserPassRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassRequest")
            .field("username", &String::from_utf8_lossy(&self.username))
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserPassReply {
    pub status: u8,
}

impl UserPassReply {
    pub fn new(status: u8) -> Self {
        Self { status }
    }

    pub fn success() -> Self {
        Self { status: 0x00 }
    }

    pub fn failure() -> Self {
        Self { status: 0x01 }
    }

    pub fn version(&self) -> u8 {
        USER_PASS_VERSION
    }

    pub fn is_success(&self) -> bool {
        self.status == 0x00
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Connect,
    Bind,
    UdpAssociate,
    Other(u8),
}

impl From<u8> for Command {
    fn from(value: u8) -> Self {
        match value {
            0x01 => Command::Connect,
            0x02 => Command::Bind,
            0x03 => Command::UdpAssociate,
            other => Command::Other(other),
        }
    }
}

impl From<Command> for u8 {
    fn from(value: Command) -> Self {
        match value {
            Command::Connect => 0x01,
            Command::Bind => 0x02,
            Command::UdpAssociate => 0x03,
            Command::Other(other) => other,
        }
    }
}

/// A domain name as carried in `DST.ADDR`/`BND.ADDR`, without its length
/// prefix. Holds between 1 and 255 bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DomainName(Bytes);

impl DomainName {
    pub fn new(name: impl Into<Bytes>) -> Result<Self, CodecError> {
        let name = name.into();
        match name.len() {
            0 => Err(BadRequest::EmptyDomain.into()),
            n if n > MAX_FIELD_LEN => Err(BadRequest::DomainTooLong(n).into()),
            _ => Ok(Self(name)),
        }
    }

    pub(crate) fn from_wire(name: Bytes) -> Self {
        Self(name)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The length byte written in front of the name on the wire.
    pub fn len(&self) -> u8 {
        self.0.len() as u8
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }
}

impl fmt::Debug for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    IPv4(Ipv4Addr),
    IPv6(Ipv6Addr),
    Domain(DomainName),
}

impl Address {
    /// Builds an address from its ATYP and raw bytes. Domain names are
    /// given without a length prefix.
    pub fn from_parts(atyp: u8, raw: &[u8]) -> Result<Self, CodecError> {
        match atyp {
            ATYP_IPV4 => {
                let octets = <[u8; 4]>::try_from(raw).map_err(|_| BadRequest::AddressLength {
                    atyp,
                    expected: 4,
                    actual: raw.len(),
                })?;
                Ok(Address::IPv4(Ipv4Addr::from(octets)))
            }
            ATYP_IPV6 => {
                let octets = <[u8; 16]>::try_from(raw).map_err(|_| BadRequest::AddressLength {
                    atyp,
                    expected: 16,
                    actual: raw.len(),
                })?;
                Ok(Address::IPv6(Ipv6Addr::from(octets)))
            }
            ATYP_DOMAIN => Ok(Address::Domain(DomainName::new(Bytes::copy_from_slice(raw))?)),
            other => Err(BadRequest::UnknownAddressType(other).into()),
        }
    }

    pub fn domain(name: impl Into<Bytes>) -> Result<Self, CodecError> {
        Ok(Address::Domain(DomainName::new(name)?))
    }

    pub fn address_type(&self) -> u8 {
        match self {
            Address::IPv4(_) => ATYP_IPV4,
            Address::IPv6(_) => ATYP_IPV6,
            Address::Domain(_) => ATYP_DOMAIN,
        }
    }

    /// Size of the address on the wire, including a domain's length byte.
    pub fn encoded_len(&self) -> usize {
        match self {
            Address::IPv4(_) => 4,
            Address::IPv6(_) => 16,
            Address::Domain(name) => 1 + name.0.len(),
        }
    }

    pub fn encode<B: BufMut>(&self, dst: &mut B) {
        match self {
            Address::IPv4(ip) => dst.put_slice(&ip.octets()),
            Address::IPv6(ip) => dst.put_slice(&ip.octets()),
            Address::Domain(name) => {
                dst.put_u8(name.len());
                dst.put_slice(name.as_bytes());
            }
        }
    }

    /// Wire form of the address; domains keep their length prefix.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode(&mut buf);
        buf.freeze()
    }
}

impl From<IpAddr> for Address {
    fn from(value: IpAddr) -> Self {
        match value {
            IpAddr::V4(ip) => Address::IPv4(ip),
            IpAddr::V6(ip) => Address::IPv6(ip),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::IPv4(ip) => write!(f, "{}", ip),
            Address::IPv6(ip) => write!(f, "[{}]", ip),
            Address::Domain(name) => write!(f, "{}", name),
        }
    }
}

/// Connection request: `VER CMD RSV ATYP DST.ADDR DST.PORT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub command: Command,
    pub reserved: u8,
    pub destination: Address,
    pub port: u16,
}

impl Request {
    pub fn new(command: Command, destination: Address, port: u16) -> Self {
        Self {
            command,
            reserved: RESERVED,
            destination,
            port,
        }
    }

    pub fn version(&self) -> u8 {
        SOCKS_VERSION
    }

    pub fn address_type(&self) -> u8 {
        self.destination.address_type()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyCode {
    Succeeded,
    GeneralFailure,
    ConnectionNotAllowed,
    NetworkUnreachable,
    HostUnreachable,
    ConnectionRefused,
    TTLExpired,
    CommandNotSupported,
    AddressTypeNotSupported,
    Other(u8),
}

impl From<u8> for ReplyCode {
    fn from(value: u8) -> Self {
        match value {
            0x00 => ReplyCode::Succeeded,
            0x01 => ReplyCode::GeneralFailure,
            0x02 => ReplyCode::ConnectionNotAllowed,
            0x03 => ReplyCode::NetworkUnreachable,
            0x04 => ReplyCode::HostUnreachable,
            0x05 => ReplyCode::ConnectionRefused,
            0x06 => ReplyCode::TTLExpired,
            0x07 => ReplyCode::CommandNotSupported,
            0x08 => ReplyCode::AddressTypeNotSupported,
            other => ReplyCode::Other(other),
        }
    }
}

impl From<ReplyCode> for u8 {
    fn from(value: ReplyCode) -> Self {
        match value {
            ReplyCode::Succeeded => 0x00,
            ReplyCode::GeneralFailure => 0x01,
            ReplyCode::ConnectionNotAllowed => 0x02,
            ReplyCode::NetworkUnreachable => 0x03,
            ReplyCode::HostUnreachable => 0x04,
            ReplyCode::ConnectionRefused => 0x05,
            ReplyCode::TTLExpired => 0x06,
            ReplyCode::CommandNotSupported => 0x07,
            ReplyCode::AddressTypeNotSupported => 0x08,
            ReplyCode::Other(other) => other,
        }
    }
}

/// Server reply: `VER REP RSV ATYP BND.ADDR BND.PORT`. RSV is always 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub code: ReplyCode,
    pub address: Address,
    pub port: u16,
}

impl Reply {
    pub fn new(code: ReplyCode, address: Address, port: u16) -> Self {
        Self {
            code,
            address,
            port,
        }
    }

    /// Builds a reply from raw wire pieces. A domain address is given
    /// without its length byte; the prefix is derived when encoding.
    pub fn from_parts(
        code: ReplyCode,
        atyp: u8,
        address: &[u8],
        port: [u8; 2],
    ) -> Result<Self, CodecError> {
        Ok(Self {
            code,
            address: Address::from_parts(atyp, address)?,
            port: u16::from_be_bytes(port),
        })
    }

    pub fn success(bound: SocketAddr) -> Self {
        Self::new(ReplyCode::Succeeded, bound.ip().into(), bound.port())
    }

    /// A failure reply with an unspecified `0.0.0.0:0` bound address.
    pub fn failure(code: ReplyCode) -> Self {
        Self::new(code, Address::IPv4(Ipv4Addr::UNSPECIFIED), 0)
    }

    pub fn version(&self) -> u8 {
        SOCKS_VERSION
    }

    pub fn reserved(&self) -> u8 {
        RESERVED
    }

    pub fn address_type(&self) -> u8 {
        self.address.address_type()
    }

    pub(crate) fn header(&self) -> [u8; 4] {
        [SOCKS_VERSION, self.code.into(), RESERVED, self.address_type()]
    }
}
