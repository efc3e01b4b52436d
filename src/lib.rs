pub mod codec;
pub mod message_types;
pub mod session;
pub mod stream;

// Re-export commonly used items for convenience
pub use codec::{
    BadRequest, CodecError, NegotiationReplyCodec, NegotiationRequestCodec, ReplyCodec,
    RequestCodec, UserPassReplyCodec, UserPassRequestCodec,
};
pub use message_types::{
    Address, AuthMethod, Command, DomainName, NegotiationReply, NegotiationRequest, Reply,
    ReplyCode, Request, UserPassReply, UserPassRequest,
};
pub use session::{Selected, Session, SessionConfig};
