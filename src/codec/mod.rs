mod decoder;
mod encoder;
mod types;

pub use types::{
    BadRequest, CodecError, NegotiationReplyCodec, NegotiationRequestCodec, ReplyCodec,
    RequestCodec, UserPassReplyCodec, UserPassRequestCodec,
};
