use crate::message_types::ReplyCode;

#[derive(Debug, Default, Clone, Copy)]
pub struct NegotiationRequestCodec;

#[derive(Debug, Default, Clone, Copy)]
pub struct NegotiationReplyCodec;

#[derive(Debug, Default, Clone, Copy)]
pub struct UserPassRequestCodec;

#[derive(Debug, Default, Clone, Copy)]
pub struct UserPassReplyCodec;

#[derive(Debug, Default, Clone, Copy)]
pub struct RequestCodec;

#[derive(Debug, Default, Clone, Copy)]
pub struct ReplyCodec;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Invalid version: {0:#04x}")]
    InvalidVersion(u8),

    #[error("Invalid version of username/password auth: {0:#04x}")]
    InvalidUserPassVersion(u8),

    #[error("Bad request: {0}")]
    BadRequest(#[from] BadRequest),
}

/// Field-level reasons behind [`CodecError::BadRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BadRequest {
    #[error("no authentication methods offered")]
    NoMethods,

    #[error("too many authentication methods: {0} (max 255)")]
    TooManyMethods(usize),

    #[error("empty username")]
    EmptyUsername,

    #[error("empty password")]
    EmptyPassword,

    #[error("credential too long: {0} bytes (max 255)")]
    CredentialTooLong(usize),

    #[error("empty domain name")]
    EmptyDomain,

    #[error("domain name too long: {0} bytes (max 255)")]
    DomainTooLong(usize),

    #[error("unknown address type: {0:#04x}")]
    UnknownAddressType(u8),

    #[error("address type {atyp:#04x} takes {expected} bytes, got {actual}")]
    AddressLength {
        atyp: u8,
        expected: usize,
        actual: usize,
    },
}

impl CodecError {
    pub fn is_transport(&self) -> bool {
        matches!(self, CodecError::Io(_))
    }

    pub fn bad_request(&self) -> Option<BadRequest> {
        match self {
            CodecError::BadRequest(reason) => Some(*reason),
            _ => None,
        }
    }
}

impl From<&CodecError> for ReplyCode {
    fn from(value: &CodecError) -> Self {
        match value {
            CodecError::BadRequest(BadRequest::UnknownAddressType(_)) => {
                ReplyCode::AddressTypeNotSupported
            }
            _ => ReplyCode::GeneralFailure,
        }
    }
}
