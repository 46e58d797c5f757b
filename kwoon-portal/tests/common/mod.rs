//! Shared fixtures for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use kwoon_auth::{CredentialGrant, CredentialTransport};
use kwoon_core::{ErrorContext, KwoonConfig, KwoonError, KwoonResult, Role};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// What the scripted transport answers to an authenticate call
#[derive(Debug, Clone)]
pub enum LoginScript {
    Grant(CredentialGrant),
    Reject(u16),
}

/// An in-memory stand-in for the HTTP credential transport
///
/// Answers every authenticate call with a fixed script. An optional gate
/// holds the call in flight until the test releases it.
pub struct ScriptedTransport {
    script: LoginScript,
    gate: Option<Arc<Notify>>,
    token: Mutex<Option<String>>,
    auth_calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn granting(grant: CredentialGrant) -> Self {
        Self {
            script: LoginScript::Grant(grant),
            gate: None,
            token: Mutex::new(None),
            auth_calls: AtomicUsize::new(0),
        }
    }

    pub fn rejecting(status: u16) -> Self {
        Self {
            script: LoginScript::Reject(status),
            gate: None,
            token: Mutex::new(None),
            auth_calls: AtomicUsize::new(0),
        }
    }

    /// Hold authenticate calls until the gate is notified
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// How many authenticate calls have started
    pub fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }

    /// The token currently installed on the transport
    pub fn installed_token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }
}

#[async_trait]
impl CredentialTransport for ScriptedTransport {
    async fn authenticate(&self, _username: &str, _password: &str) -> KwoonResult<CredentialGrant> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match &self.script {
            LoginScript::Grant(grant) => {
                self.install_credential(&grant.token);
                Ok(grant.clone())
            }
            LoginScript::Reject(status) => Err(KwoonError::Authentication {
                message: format!("Login rejected with HTTP {}", status),
                source: None,
                context: ErrorContext::new("scripted_transport").with_operation("authenticate"),
            }),
        }
    }

    fn install_credential(&self, token: &str) {
        *self.token.lock().unwrap() = Some(token.to_string());
    }

    fn clear_credential(&self) {
        *self.token.lock().unwrap() = None;
    }

    fn has_credential(&self) -> bool {
        self.token.lock().unwrap().is_some()
    }
}

/// The grant the backend issues in the happy-path scenario
pub fn instructor_grant() -> CredentialGrant {
    grant_with_roles(&[Role::Instructor])
}

pub fn grant_with_roles(roles: &[Role]) -> CredentialGrant {
    CredentialGrant {
        token: "abc".to_string(),
        user_id: 5,
        username: "ana".to_string(),
        email: None,
        roles: roles.iter().copied().collect(),
    }
}

/// A default configuration with storage redirected into a test directory
pub fn test_config(data_dir: &Path) -> KwoonConfig {
    let mut config = KwoonConfig::default();
    config.storage.data_dir = data_dir.to_path_buf();
    config
}
