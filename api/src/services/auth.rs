//! `auth.v1.AuthService`: account creation and login.

use serde::{Deserialize, Serialize};

use crate::{
    client::{Access, ApiClient, Empty},
    errors::ApiError,
    transport::{Procedure, Transport},
};

pub const SERVICE: &str = "auth.v1.AuthService";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub check_password: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct LoginResponse {
    token: String,
}

impl<T: Transport> ApiClient<T> {
    /// Register a new account. The server sends a verification mail before login is allowed.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn signup(&self, request: &SignupRequest) -> Result<(), ApiError> {
        let Empty {} = self
            .call(Procedure::new(SERVICE, "Signup"), Access::Public, request)
            .await?;
        Ok(())
    }

    /// Exchange credentials for a session token.
    ///
    /// Returns `None` when the server answered without a token. The token is *not* stored, that is
    /// left to the caller.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn login(&self, request: &LoginRequest) -> Result<Option<String>, ApiError> {
        let LoginResponse { token } = self
            .call(Procedure::new(SERVICE, "Login"), Access::Public, request)
            .await?;
        Ok(Some(token).filter(|token| !token.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{client::test_transport::ScriptedTransport, session::MemoryTokenStore};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case(json!({"token": "jwt"}), Some("jwt"))]
    #[case(json!({"token": ""}), None)]
    #[case(json!({}), None)]
    #[tokio::test]
    async fn test_login(#[case] reply: Value, #[case] expected: Option<&str>) {
        let client = ApiClient::new(
            ScriptedTransport::replying([Ok(reply)]),
            Arc::new(MemoryTokenStore::with_token("stale")),
        );
        let request = LoginRequest {
            email: "miku@example.com".into(),
            password: "pass1234".into(),
        };

        let token = client.login(&request).await.unwrap();

        assert_eq!(token.as_deref(), expected);
        let calls = client.transport().calls.lock().unwrap();
        assert_eq!(calls[0].bearer, None);
        assert_eq!(
            calls[0].body,
            json!({"email": "miku@example.com", "password": "pass1234"})
        );
    }

    #[tokio::test]
    async fn test_signup_wire_format() {
        let client = ApiClient::new(ScriptedTransport::default(), Arc::new(MemoryTokenStore::new()));
        let request = SignupRequest {
            email: "a@b.c".into(),
            password: "p4ss".into(),
            check_password: "p4ss".into(),
        };

        client.signup(&request).await.unwrap();

        assert_eq!(
            client.transport().calls.lock().unwrap()[0].body,
            json!({"email": "a@b.c", "password": "p4ss", "checkPassword": "p4ss"})
        );
    }
}
