//! Connection parameters (spec.md §6). Deliberately minimal: no
//! config-file loading, no profile management — those are the CLI
//! collaborator's job (SPEC_FULL.md §13).

/// `{host, port, user, password, schema}` for one side of a comparison.
#[derive(Clone)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub schema: String,
}

impl ConnectionParams {
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
        schema: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            user: user.into(),
            password: password.into(),
            schema: schema.into(),
        }
    }
}

/// Passwords are never printed, even in debug output — SPEC_FULL.md §13.
impl std::fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("schema", &self.schema)
            .finish()
    }
}
