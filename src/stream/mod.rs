//! Message I/O directly over a caller-owned byte stream.
//!
//! Every operation reads or writes exactly one message and suspends only on
//! the stream itself. Decoders use exact-length reads, so a stream that ends
//! early surfaces as [`CodecError::Io`](crate::codec::CodecError::Io) with
//! [`std::io::ErrorKind::UnexpectedEof`]. Nothing is buffered past the
//! current message.
//!
//! Server side: [`NegotiationRequest::read_from`], [`NegotiationReply::write_to`],
//! [`UserPassRequest::read_from`], [`UserPassReply::write_to`],
//! [`Request::read_from`] and [`Reply::write_to`]. Their client-side
//! counterparts live on the same types.
//!
//! [`NegotiationRequest::read_from`]: crate::NegotiationRequest::read_from
//! [`NegotiationReply::write_to`]: crate::NegotiationReply::write_to
//! [`UserPassRequest::read_from`]: crate::UserPassRequest::read_from
//! [`UserPassReply::write_to`]: crate::UserPassReply::write_to
//! [`Request::read_from`]: crate::Request::read_from
//! [`Reply::write_to`]: crate::Reply::write_to

mod reader;
mod writer;
