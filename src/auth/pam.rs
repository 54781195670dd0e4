// SPDX-License-Identifier: GPL-3.0-only

use super::{Oracle, OracleError, OracleSession};
use crate::secret::SecretSource;
use pam_client::{Context, ConversationHandler, ErrorCode, Flag};
use std::ffi::{CStr, CString};
use tracing::{info, warn};
use zeroize::Zeroizing;

impl From<pam_client::Error> for OracleError {
    fn from(err: pam_client::Error) -> Self {
        OracleError(err.to_string())
    }
}

/// Authenticates against the system PAM stack.
#[derive(Debug, Default)]
pub struct PamOracle;

pub struct PamSession {
    context: Context<SecretConversation>,
}

impl Oracle for PamOracle {
    type Session = PamSession;

    fn open(&mut self, service: &str, user: &str) -> Result<PamSession, OracleError> {
        let context = Context::new(service, Some(user), SecretConversation::default())?;
        Ok(PamSession { context })
    }
}

impl OracleSession for PamSession {
    fn authenticate(&mut self, secret: &dyn SecretSource) -> Result<(), OracleError> {
        self.context.conversation_mut().pending =
            Some(Zeroizing::new(secret.supply_secret().to_vec()));
        let result = self.context.authenticate(Flag::NONE);
        self.context.conversation_mut().pending = None;
        result.map_err(OracleError::from)
    }

    /// Ends the PAM transaction.
    ///
    /// pam-client only calls `pam_end` from its `Drop` impl and discards the
    /// status, so this never reports a failed close.
    fn close(self) -> Result<(), OracleError> {
        drop(self.context);
        Ok(())
    }
}

/// Answers every prompt of a round with the secret supplied for that round.
#[derive(Default)]
struct SecretConversation {
    pending: Option<Zeroizing<Vec<u8>>>,
}

impl SecretConversation {
    // The returned CString is a second heap copy of the secret. pam-client
    // strdup()s it into the PAM response and frees both without clearing
    // them; the handler signature leaves no way to hand out borrowed or
    // zeroizing memory.
    fn answer(&mut self) -> Result<CString, ErrorCode> {
        let secret = self.pending.as_ref().ok_or(ErrorCode::CONV_ERR)?;
        CString::new(secret.as_slice()).map_err(|_| ErrorCode::CONV_ERR)
    }
}

impl ConversationHandler for SecretConversation {
    fn prompt_echo_on(&mut self, _prompt: &CStr) -> Result<CString, ErrorCode> {
        self.answer()
    }

    fn prompt_echo_off(&mut self, _prompt: &CStr) -> Result<CString, ErrorCode> {
        self.answer()
    }

    fn text_info(&mut self, msg: &CStr) {
        info!("PAM: {}", msg.to_string_lossy());
    }

    fn error_msg(&mut self, msg: &CStr) {
        warn!("PAM: {}", msg.to_string_lossy());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(bytes: &[u8]) -> &CStr {
        CStr::from_bytes_with_nul(bytes).unwrap()
    }

    #[test]
    fn answers_with_pending_secret() {
        let mut conversation = SecretConversation {
            pending: Some(Zeroizing::new(b"hunter2".to_vec())),
        };
        let answer = conversation.prompt_echo_off(prompt(b"Password: \0")).unwrap();
        assert_eq!(answer.as_bytes(), b"hunter2");
        // a module may prompt more than once per round
        let answer = conversation.prompt_echo_on(prompt(b"Again: \0")).unwrap();
        assert_eq!(answer.as_bytes(), b"hunter2");
    }

    #[test]
    fn refuses_outside_a_round() {
        let mut conversation = SecretConversation::default();
        assert!(conversation.prompt_echo_off(prompt(b"Password: \0")).is_err());
    }
}
