//! Server-side handshake driver with the protocol phases in its type.
//!
//! A [`Session`] moves `Negotiation` -> (`Authentication`) -> `Connect` and
//! hands the stream back once the reply is sent. Reads borrow the session so
//! a decode failure still allows sending a rejection; transitions consume it.

mod config;

pub use config::{SessionConfig, SessionConfigBuilder, SessionConfigBuilderError};

use crate::codec::CodecError;
use crate::message_types::{
    AuthMethod, NegotiationReply, NegotiationRequest, Reply, Request, UserPassReply,
    UserPassRequest,
};
use std::marker::PhantomData;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, debug_span, Instrument, Span};

#[derive(Debug)]
pub struct Negotiation;

#[derive(Debug)]
pub struct Authentication;

#[derive(Debug)]
pub struct Connect;

#[derive(Debug)]
pub struct Session<S, P> {
    stream: S,
    config: SessionConfig,
    span: Span,
    _phase: PhantomData<P>,
}

/// Outcome of [`Session::select`].
#[derive(Debug)]
pub enum Selected<S> {
    Authenticate(Session<S, Authentication>),
    Connect(Session<S, Connect>),
    /// `NoAcceptable` was sent; the client is expected to close.
    Rejected(S),
    /// A method this crate has no sub-negotiation for, e.g. GSSAPI.
    Other(AuthMethod, S),
}

impl<S, P> Session<S, P> {
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    fn advance<Q>(self) -> Session<S, Q> {
        Session {
            stream: self.stream,
            config: self.config,
            span: self.span,
            _phase: PhantomData,
        }
    }
}

impl<S> Session<S, Negotiation> {
    pub fn new(stream: S, config: SessionConfig) -> Self {
        let span = debug_span!("socks5_session", peer = config.peer.as_deref());
        Self {
            stream,
            config,
            span,
            _phase: PhantomData,
        }
    }
}

impl<S> Session<S, Negotiation>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub async fn read_proposal(&mut self) -> Result<NegotiationRequest, CodecError> {
        let proposal = NegotiationRequest::read_from(&mut self.stream)
            .instrument(self.span.clone())
            .await?;

        self.span.in_scope(|| {
            debug!(methods = ?proposal.methods(), "Client proposed authentication methods");
        });
        Ok(proposal)
    }

    /// Sends the chosen method and moves to the phase it implies.
    pub async fn select(mut self, method: AuthMethod) -> Result<Selected<S>, CodecError> {
        NegotiationReply::new(method)
            .write_to(&mut self.stream)
            .instrument(self.span.clone())
            .await?;

        self.span.in_scope(|| debug!(method = ?method, "Selected authentication method"));
        Ok(match method {
            AuthMethod::UserPass => Selected::Authenticate(self.advance()),
            AuthMethod::NoAuth => Selected::Connect(self.advance()),
            AuthMethod::NoAcceptable => Selected::Rejected(self.stream),
            other => Selected::Other(other, self.stream),
        })
    }
}

impl<S> Session<S, Authentication>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub async fn read_credentials(&mut self) -> Result<UserPassRequest, CodecError> {
        let credentials = UserPassRequest::read_from(&mut self.stream)
            .instrument(self.span.clone())
            .await?;

        self.span.in_scope(|| {
            if self.config.log_usernames {
                debug!(
                    username = %String::from_utf8_lossy(credentials.username()),
                    "Received credentials"
                );
            } else {
                debug!(username_len = credentials.username_len(), "Received credentials");
            }
        });
        Ok(credentials)
    }

    pub async fn accept(mut self) -> Result<Session<S, Connect>, CodecError> {
        UserPassReply::success()
            .write_to(&mut self.stream)
            .instrument(self.span.clone())
            .await?;

        self.span.in_scope(|| debug!("Authentication accepted"));
        Ok(self.advance())
    }

    pub async fn reject(mut self) -> Result<S, CodecError> {
        UserPassReply::failure()
            .write_to(&mut self.stream)
            .instrument(self.span.clone())
            .await?;

        self.span.in_scope(|| debug!("Authentication rejected"));
        Ok(self.stream)
    }
}

impl<S> Session<S, Connect>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub async fn read_request(&mut self) -> Result<Request, CodecError> {
        let request = Request::read_from(&mut self.stream)
            .instrument(self.span.clone())
            .await?;

        self.span.in_scope(|| {
            debug!(
                command = ?request.command,
                destination = %request.destination,
                port = request.port,
                "Received request"
            );
        });
        Ok(request)
    }

    /// Sends the final reply and returns the stream for relaying.
    pub async fn reply(mut self, reply: &Reply) -> Result<S, CodecError> {
        reply
            .write_to(&mut self.stream)
            .instrument(self.span.clone())
            .await?;

        self.span.in_scope(|| debug!(code = ?reply.code, "Handshake finished"));
        Ok(self.stream)
    }
}
