use crate::codec::types::{
    CodecError, NegotiationReplyCodec, NegotiationRequestCodec, ReplyCodec, RequestCodec,
    UserPassReplyCodec, UserPassRequestCodec,
};
use crate::message_types::{
    NegotiationReply, NegotiationRequest, Reply, Request, UserPassReply, UserPassRequest,
    SOCKS_VERSION, USER_PASS_VERSION,
};
use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

impl Encoder<NegotiationRequest> for NegotiationRequestCodec {
    type Error = CodecError;

    fn encode(&mut self, req: NegotiationRequest, dst: &mut BytesMut) -> Result<(), Self::Error> {
        req.encode(dst);
        Ok(())
    }
}

impl Encoder<NegotiationReply> for NegotiationReplyCodec {
    type Error = CodecError;

    fn encode(&mut self, reply: NegotiationReply, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.put_slice(&reply.to_bytes());
        Ok(())
    }
}

impl Encoder<UserPassRequest> for UserPassRequestCodec {
    type Error = CodecError;

    fn encode(&mut self, req: UserPassRequest, dst: &mut BytesMut) -> Result<(), Self::Error> {
        req.encode(dst);
        Ok(())
    }
}

impl Encoder<UserPassReply> for UserPassReplyCodec {
    type Error = CodecError;

    fn encode(&mut self, reply: UserPassReply, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.put_slice(&reply.to_bytes());
        Ok(())
    }
}

impl Encoder<Request> for RequestCodec {
    type Error = CodecError;

    fn encode(&mut self, req: Request, dst: &mut BytesMut) -> Result<(), Self::Error> {
        req.encode(dst);
        Ok(())
    }
}

impl Encoder<Reply> for ReplyCodec {
    type Error = CodecError;

    fn encode(&mut self, reply: Reply, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(4 + reply.address.encoded_len() + 2);
        dst.put_slice(&reply.header());
        reply.address.encode(dst);
        dst.put_u16(reply.port);
        Ok(())
    }
}

impl NegotiationRequest {
    pub(crate) fn encode<B: BufMut>(&self, dst: &mut B) {
        dst.put_u8(SOCKS_VERSION);
        dst.put_u8(self.method_count());
        for method in self.methods() {
            dst.put_u8((*method).into());
        }
    }
}

impl NegotiationReply {
    pub(crate) fn to_bytes(self) -> [u8; 2] {
        [SOCKS_VERSION, self.method.into()]
    }
}

impl UserPassRequest {
    pub(crate) fn encode<B: BufMut>(&self, dst: &mut B) {
        dst.put_u8(USER_PASS_VERSION);
        dst.put_u8(self.username_len());
        dst.put_slice(self.username());
        dst.put_u8(self.password_len());
        dst.put_slice(self.password());
    }
}

impl UserPassReply {
    pub(crate) fn to_bytes(self) -> [u8; 2] {
        [USER_PASS_VERSION, self.status]
    }
}

impl Request {
    pub(crate) fn encode<B: BufMut>(&self, dst: &mut B) {
        dst.put_u8(SOCKS_VERSION);
        dst.put_u8(self.command.into());
        dst.put_u8(self.reserved);
        dst.put_u8(self.address_type());
        self.destination.encode(dst);
        dst.put_u16(self.port);
    }
}
