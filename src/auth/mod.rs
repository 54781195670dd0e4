// SPDX-License-Identifier: GPL-3.0-only

use crate::secret::{SecretBuffer, SecretSource};
use std::ops::{Deref, DerefMut};
use tracing::{debug, info, warn};

mod pam;
pub use self::pam::PamOracle;

/// Name under which the authentication service is asked to evaluate
/// credentials.
pub const SERVICE_NAME: &str = "cosmic-lock";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected,
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct OracleError(pub String);

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Failed to determine the current user")]
    UnknownUser,
    #[error("Failed to open authentication session for service {service:?}")]
    Open {
        service: &'static str,
        #[source]
        source: OracleError,
    },
}

/// An external service that evaluates credentials.
pub trait Oracle {
    type Session: OracleSession;

    fn open(&mut self, service: &str, user: &str) -> Result<Self::Session, OracleError>;
}

pub trait OracleSession {
    /// Runs a single authentication round. The secret may only be read for
    /// the duration of this call.
    fn authenticate(&mut self, secret: &dyn SecretSource) -> Result<(), OracleError>;

    fn close(self) -> Result<(), OracleError>;
}

/// Erases the wrapped buffer when dropped, whichever way the caller leaves.
struct EraseOnDrop<'a>(&'a mut SecretBuffer);

impl Deref for EraseOnDrop<'_> {
    type Target = SecretBuffer;

    fn deref(&self) -> &SecretBuffer {
        self.0
    }
}

impl DerefMut for EraseOnDrop<'_> {
    fn deref_mut(&mut self) -> &mut SecretBuffer {
        self.0
    }
}

impl Drop for EraseOnDrop<'_> {
    fn drop(&mut self) {
        self.0.erase();
    }
}

pub struct AuthGate<O: Oracle> {
    oracle: O,
    user: String,
}

impl<O: Oracle> AuthGate<O> {
    pub fn new(oracle: O, user: impl Into<String>) -> AuthGate<O> {
        AuthGate {
            oracle,
            user: user.into(),
        }
    }

    /// Creates a gate for the user owning this process.
    pub fn for_current_user(oracle: O) -> Result<AuthGate<O>, AuthError> {
        let passwd = pwd::Passwd::current_user().ok_or(AuthError::UnknownUser)?;
        debug!(user = %passwd.name, "Resolved local user");
        Ok(AuthGate::new(oracle, passwd.name))
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Checks the secret against the oracle.
    ///
    /// `secret` is erased before this returns, on every path. Failing to open
    /// an oracle session is an error since no verdict can be reached. A
    /// failed close after a successful round counts as a rejection; this
    /// only applies to oracles that report close failures, which
    /// `PamOracle` does not.
    pub fn authenticate(&mut self, secret: &mut SecretBuffer) -> Result<Verdict, AuthError> {
        let mut secret = EraseOnDrop(secret);

        let mut session = self
            .oracle
            .open(SERVICE_NAME, &self.user)
            .map_err(|source| AuthError::Open {
                service: SERVICE_NAME,
                source,
            })?;

        let round = session.authenticate(&*secret);
        secret.erase();

        if let Err(err) = round {
            info!("Authentication failed: {}", err);
            if let Err(err) = session.close() {
                warn!("Failed to close authentication session: {}", err);
            }
            return Ok(Verdict::Rejected);
        }

        match session.close() {
            Ok(()) => Ok(Verdict::Accepted),
            Err(err) => {
                warn!(
                    "Authentication session did not end cleanly, refusing to unlock: {}",
                    err
                );
                Ok(Verdict::Rejected)
            }
        }
    }
}
