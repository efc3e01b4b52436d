use derive_builder::Builder;

#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(setter(into))]
pub struct SessionConfig {
    /// Label recorded on the session span, usually the client's address.
    #[builder(default, setter(into, strip_option))]
    pub peer: Option<String>,
    /// Puts the username into the debug event for received credentials.
    /// Passwords are never logged.
    #[builder(default = "false")]
    pub log_usernames: bool,
}

impl SessionConfig {
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }

    pub fn for_peer(peer: impl Into<String>) -> Self {
        Self {
            peer: Some(peer.into()),
            ..Self::default()
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            peer: None,
            log_usernames: false,
        }
    }
}
