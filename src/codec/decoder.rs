use crate::codec::types::{
    BadRequest, CodecError, NegotiationReplyCodec, NegotiationRequestCodec, ReplyCodec,
    RequestCodec, UserPassReplyCodec, UserPassRequestCodec,
};
use crate::message_types::{
    Address, AuthMethod, Command, DomainName, NegotiationReply, NegotiationRequest, Reply,
    ReplyCode, Request, UserPassReply, UserPassRequest, ATYP_DOMAIN, ATYP_IPV4, ATYP_IPV6,
    SOCKS_VERSION, USER_PASS_VERSION,
};
use bytes::{Buf, BytesMut};
use std::net::{Ipv4Addr, Ipv6Addr};
use tokio_util::codec::Decoder;

impl Decoder for NegotiationRequestCodec {
    type Item = NegotiationRequest;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        check_version(src, SOCKS_VERSION)?;
        if needs_more(src, 2) {
            return Ok(None);
        }

        let method_count = src[1] as usize;
        if method_count == 0 {
            return Err(BadRequest::NoMethods.into());
        }

        let required_len = 2 + method_count;
        if needs_more(src, required_len) {
            return Ok(None);
        }

        let data = src.split_to(required_len);
        Ok(Some(NegotiationRequest::from_wire(&data[2..])))
    }
}

impl Decoder for NegotiationReplyCodec {
    type Item = NegotiationReply;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        check_version(src, SOCKS_VERSION)?;
        if needs_more(src, 2) {
            return Ok(None);
        }

        let data = src.split_to(2);
        Ok(Some(NegotiationReply::new(AuthMethod::from(data[1]))))
    }
}

impl Decoder for UserPassRequestCodec {
    type Item = UserPassRequest;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        check_user_pass_version(src)?;
        if needs_more(src, 2) {
            return Ok(None);
        }

        let username_len = src[1] as usize;
        if username_len == 0 {
            return Err(BadRequest::EmptyUsername.into());
        }

        let password_len_at = 2 + username_len;
        if needs_more(src, password_len_at + 1) {
            return Ok(None);
        }

        let password_len = src[password_len_at] as usize;
        if password_len == 0 {
            return Err(BadRequest::EmptyPassword.into());
        }

        let required_len = password_len_at + 1 + password_len;
        if needs_more(src, required_len) {
            return Ok(None);
        }

        let mut data = src.split_to(required_len);
        data.advance(2);
        let username = data.split_to(username_len).freeze();
        data.advance(1);
        let password = data.freeze();

        Ok(Some(UserPassRequest::from_wire(username, password)))
    }
}

impl Decoder for UserPassReplyCodec {
    type Item = UserPassReply;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        check_user_pass_version(src)?;
        if needs_more(src, 2) {
            return Ok(None);
        }

        let data = src.split_to(2);
        Ok(Some(UserPassReply::new(data[1])))
    }
}

impl Decoder for RequestCodec {
    type Item = Request;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        check_version(src, SOCKS_VERSION)?;
        if needs_more(src, 4) {
            return Ok(None);
        }

        let atyp = src[3];
        let Some(addr_len) = address_len(&src[4..], atyp)? else {
            return Ok(None);
        };

        let required_len = 4 + addr_len + 2;
        if needs_more(src, required_len) {
            return Ok(None);
        }

        let mut data = src.split_to(required_len);
        data.advance(1);
        let command = Command::from(data.get_u8());
        let reserved = data.get_u8();
        data.advance(1);

        let destination = take_address(&mut data, atyp)?;
        let port = data.get_u16();

        Ok(Some(Request {
            command,
            reserved,
            destination,
            port,
        }))
    }
}

impl Decoder for ReplyCodec {
    type Item = Reply;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        check_version(src, SOCKS_VERSION)?;
        if needs_more(src, 4) {
            return Ok(None);
        }

        let code = ReplyCode::from(src[1]);
        let atyp = src[3];
        let Some(addr_len) = address_len(&src[4..], atyp)? else {
            return Ok(None);
        };

        let required_len = 4 + addr_len + 2;
        if needs_more(src, required_len) {
            return Ok(None);
        }

        let mut data = src.split_to(required_len);
        data.advance(4);

        let address = take_address(&mut data, atyp)?;
        let port = data.get_u16();

        Ok(Some(Reply::new(code, address, port)))
    }
}

fn check_version(src: &BytesMut, expected: u8) -> Result<(), CodecError> {
    match src.first() {
        Some(&version) if version != expected => Err(CodecError::InvalidVersion(version)),
        _ => Ok(()),
    }
}

fn check_user_pass_version(src: &BytesMut) -> Result<(), CodecError> {
    match src.first() {
        Some(&version) if version != USER_PASS_VERSION => {
            Err(CodecError::InvalidUserPassVersion(version))
        }
        _ => Ok(()),
    }
}

/// Reserves room for the rest of the frame and reports whether it is still
/// incomplete.
fn needs_more(src: &mut BytesMut, required_len: usize) -> bool {
    if src.len() < required_len {
        src.reserve(required_len - src.len());
        true
    } else {
        false
    }
}

/// Wire length of the address starting at `rest`, or `None` while a domain's
/// length byte is not buffered yet.
fn address_len(rest: &[u8], atyp: u8) -> Result<Option<usize>, CodecError> {
    match atyp {
        ATYP_IPV4 => Ok(Some(4)),
        ATYP_IPV6 => Ok(Some(16)),
        ATYP_DOMAIN => match rest.first() {
            None => Ok(None),
            Some(0) => Err(BadRequest::EmptyDomain.into()),
            Some(&len) => Ok(Some(1 + len as usize)),
        },
        other => Err(BadRequest::UnknownAddressType(other).into()),
    }
}

fn take_address(data: &mut BytesMut, atyp: u8) -> Result<Address, CodecError> {
    match atyp {
        ATYP_IPV4 => {
            let mut octets = [0u8; 4];
            data.copy_to_slice(&mut octets);
            Ok(Address::IPv4(Ipv4Addr::from(octets)))
        }
        ATYP_IPV6 => {
            let mut octets = [0u8; 16];
            data.copy_to_slice(&mut octets);
            Ok(Address::IPv6(Ipv6Addr::from(octets)))
        }
        ATYP_DOMAIN => {
            let len = data.get_u8() as usize;
            let name = data.split_to(len).freeze();
            Ok(Address::Domain(DomainName::from_wire(name)))
        }
        other => Err(BadRequest::UnknownAddressType(other).into()),
    }
}
