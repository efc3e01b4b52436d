mod common;

use bytes::{BufMut, BytesMut};
use common::init_tracing;
use n0_future::SinkExt;
use s5wire::message_types::{ATYP_DOMAIN, ATYP_IPV4};
use s5wire::{
    Address, AuthMethod, BadRequest, CodecError, Command, NegotiationReply, NegotiationReplyCodec,
    NegotiationRequest, NegotiationRequestCodec, Reply, ReplyCode, ReplyCodec, Request,
    RequestCodec, UserPassReply, UserPassReplyCodec, UserPassRequest, UserPassRequestCodec,
};
use std::net::{Ipv4Addr, Ipv6Addr};
use tokio_stream::StreamExt;
use tokio_util::codec::{Decoder, Encoder, FramedRead, FramedWrite};

#[test]
fn negotiation_request_waits_for_all_methods() {
    let mut codec = NegotiationRequestCodec;
    let mut buf = BytesMut::from(&[0x05, 0x03, 0x00][..]);

    assert!(codec.decode(&mut buf).unwrap().is_none());
    assert_eq!(buf.len(), 3);

    buf.put_slice(&[0x01, 0x02]);
    let request = codec.decode(&mut buf).unwrap().unwrap();

    assert_eq!(
        request.methods(),
        &[AuthMethod::NoAuth, AuthMethod::GssApi, AuthMethod::UserPass]
    );
    assert!(buf.is_empty());
}

#[test]
fn negotiation_request_fails_fast() {
    let mut codec = NegotiationRequestCodec;

    let err = codec.decode(&mut BytesMut::from(&[0x04][..])).unwrap_err();
    assert!(matches!(err, CodecError::InvalidVersion(0x04)));

    let err = codec.decode(&mut BytesMut::from(&[0x05, 0x00][..])).unwrap_err();
    assert_eq!(err.bad_request(), Some(BadRequest::NoMethods));
}

#[test]
fn user_pass_request_decodes_incrementally() {
    let wire = [0x01, 0x02, b'i', b'd', 0x02, b'p', b'w'];
    let mut codec = UserPassRequestCodec;
    let mut buf = BytesMut::new();

    for (i, byte) in wire.iter().enumerate() {
        buf.put_u8(*byte);
        let decoded = codec.decode(&mut buf).unwrap();
        if i + 1 < wire.len() {
            assert!(decoded.is_none(), "decoded early at byte {}", i);
            assert_eq!(buf.len(), i + 1);
        } else {
            let request = decoded.unwrap();
            assert_eq!(request.username(), b"id");
            assert_eq!(request.password(), b"pw");
        }
    }
    assert!(buf.is_empty());
}

#[test]
fn user_pass_request_rejects_empty_fields() {
    let mut codec = UserPassRequestCodec;

    let err = codec.decode(&mut BytesMut::from(&[0x01, 0x00][..])).unwrap_err();
    assert_eq!(err.bad_request(), Some(BadRequest::EmptyUsername));

    let err = codec
        .decode(&mut BytesMut::from(&[0x01, 0x01, b'a', 0x00][..]))
        .unwrap_err();
    assert_eq!(err.bad_request(), Some(BadRequest::EmptyPassword));

    let err = codec.decode(&mut BytesMut::from(&[0x05][..])).unwrap_err();
    assert!(matches!(err, CodecError::InvalidUserPassVersion(0x05)));
}

#[test]
fn request_waits_for_domain_and_port() {
    let mut wire = vec![0x05, 0x01, 0x00, ATYP_DOMAIN, 0x07];
    wire.extend_from_slice(b"foo.bar");
    wire.extend_from_slice(&[0x00, 0x50]);
    let mut codec = RequestCodec;

    for cut in 0..wire.len() {
        let mut partial = BytesMut::from(&wire[..cut]);
        assert!(codec.decode(&mut partial).unwrap().is_none());
        assert_eq!(partial.len(), cut);
    }

    let mut buf = BytesMut::from(wire.as_slice());
    let request = codec.decode(&mut buf).unwrap().unwrap();

    assert_eq!(request.command, Command::Connect);
    assert_eq!(request.destination, Address::domain("foo.bar").unwrap());
    assert_eq!(request.destination.to_bytes()[0], 7);
    assert_eq!(request.port, 80);
}

#[test]
fn request_rejects_unknown_address_type_from_header() {
    let mut codec = RequestCodec;
    let mut buf = BytesMut::from(&[0x05, 0x01, 0x00, 0x05][..]);

    let err = codec.decode(&mut buf).unwrap_err();

    assert_eq!(err.bad_request(), Some(BadRequest::UnknownAddressType(0x05)));
    assert_eq!(ReplyCode::from(&err), ReplyCode::AddressTypeNotSupported);
}

#[test]
fn request_rejects_empty_domain() {
    let mut codec = RequestCodec;
    let mut buf = BytesMut::from(&[0x05, 0x01, 0x00, ATYP_DOMAIN, 0x00][..]);

    let err = codec.decode(&mut buf).unwrap_err();

    assert_eq!(err.bad_request(), Some(BadRequest::EmptyDomain));
    assert_eq!(ReplyCode::from(&err), ReplyCode::GeneralFailure);
}

#[test]
fn reply_encoding_matches_stream_writer_layout() {
    let reply =
        Reply::from_parts(ReplyCode::Succeeded, ATYP_DOMAIN, b"proxy.local", [0x04, 0x38])
            .unwrap();
    let mut buf = BytesMut::new();

    ReplyCodec.encode(reply.clone(), &mut buf).unwrap();

    let mut expected = vec![0x05, 0x00, 0x00, ATYP_DOMAIN, 11];
    expected.extend_from_slice(b"proxy.local");
    expected.extend_from_slice(&[0x04, 0x38]);
    assert_eq!(&buf[..], expected.as_slice());

    let decoded = ReplyCodec.decode(&mut buf).unwrap().unwrap();
    assert_eq!(decoded, reply);
}

#[test]
fn reply_round_trips_ip_addresses() {
    let replies = [
        Reply::success("10.1.2.3:1080".parse().unwrap()),
        Reply::new(ReplyCode::TTLExpired, Address::IPv6(Ipv6Addr::UNSPECIFIED), 0),
        Reply::failure(ReplyCode::CommandNotSupported),
    ];

    for reply in replies {
        let mut buf = BytesMut::new();
        ReplyCodec.encode(reply.clone(), &mut buf).unwrap();
        assert_eq!(buf[2], 0x00);

        let decoded = ReplyCodec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded, reply);
        assert!(buf.is_empty());
    }
}

#[test]
fn reply_passes_unassigned_codes_through() {
    let mut buf = BytesMut::from(&[0x05, 0x09, 0x00, ATYP_IPV4, 1, 1, 1, 1, 0, 53, 0xAA][..]);

    let decoded = ReplyCodec.decode(&mut buf).unwrap().unwrap();

    assert_eq!(decoded.code, ReplyCode::Other(0x09));
    assert_eq!(decoded.address, Address::IPv4(Ipv4Addr::new(1, 1, 1, 1)));
    assert_eq!(decoded.port, 53);
    assert_eq!(&buf[..], &[0xAA]);

    let mut out = BytesMut::new();
    ReplyCodec.encode(decoded, &mut out).unwrap();
    assert_eq!(&out[..], &[0x05, 0x09, 0x00, ATYP_IPV4, 1, 1, 1, 1, 0, 53]);
}

#[test]
fn short_replies_encode_to_two_bytes() {
    let mut buf = BytesMut::new();
    NegotiationReplyCodec
        .encode(NegotiationReply::new(AuthMethod::NoAcceptable), &mut buf)
        .unwrap();
    UserPassReplyCodec.encode(UserPassReply::success(), &mut buf).unwrap();

    assert_eq!(&buf[..], &[0x05, 0xFF, 0x01, 0x00]);

    let method = NegotiationReplyCodec.decode(&mut buf).unwrap().unwrap();
    let status = UserPassReplyCodec.decode(&mut buf).unwrap().unwrap();
    assert_eq!(method.method, AuthMethod::NoAcceptable);
    assert!(status.is_success());
}

#[tokio::test]
async fn framed_request_and_reply_over_duplex() {
    init_tracing();
    let (client, server) = tokio::io::duplex(256);
    let (client_read, client_write) = tokio::io::split(client);
    let (server_read, server_write) = tokio::io::split(server);

    let mut client_requests = FramedWrite::new(client_write, RequestCodec);
    let mut client_replies = FramedRead::new(client_read, ReplyCodec);
    let mut server_requests = FramedRead::new(server_read, RequestCodec);
    let mut server_replies = FramedWrite::new(server_write, ReplyCodec);

    let target = Address::IPv4(Ipv4Addr::new(93, 184, 216, 34));
    let request = Request::new(Command::Connect, target, 443);
    client_requests.send(request.clone()).await.unwrap();

    let received = server_requests.next().await.unwrap().unwrap();
    assert_eq!(received, request);

    let reply = Reply::success("127.0.0.1:40000".parse().unwrap());
    server_replies.send(reply.clone()).await.unwrap();

    let received = client_replies.next().await.unwrap().unwrap();
    assert_eq!(received, reply);
}

#[tokio::test]
async fn framed_negotiation_over_duplex() {
    let (client, server) = tokio::io::duplex(64);

    let mut client_side = FramedWrite::new(client, NegotiationRequestCodec);
    let mut server_side = FramedRead::new(server, NegotiationRequestCodec);

    let proposal = NegotiationRequest::new(vec![AuthMethod::UserPass]).unwrap();
    client_side.send(proposal.clone()).await.unwrap();
    let credentials = UserPassRequest::new("u", "p").unwrap();
    let mut raw = BytesMut::new();
    UserPassRequestCodec.encode(credentials.clone(), &mut raw).unwrap();

    assert_eq!(server_side.next().await.unwrap().unwrap(), proposal);
    assert_eq!(UserPassRequestCodec.decode(&mut raw).unwrap().unwrap(), credentials);
}
