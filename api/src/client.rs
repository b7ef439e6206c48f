//! [`ApiClient`] and the authentication interceptor.

use std::{fmt, sync::Arc};

use log::{debug, warn};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    errors::{ApiError, Code},
    session::TokenStore,
    transport::{Procedure, RpcRequest, Transport},
};

/// Called when the server rejects the session of an authenticated call.
///
/// Front ends use this to send the user back to the login view.
pub type AuthFailureHook = Arc<dyn Fn(Code) + Send + Sync>;

/// Whether a call runs as the signed-in user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// No token is attached.
    Public,
    /// The session token is attached and auth failures trigger the [`AuthFailureHook`].
    Authenticated,
}

/// Typed access to every service of the API.
///
/// Cloning is cheap: the transport and session are shared.
pub struct ApiClient<T> {
    transport: Arc<T>,
    session: Arc<dyn TokenStore>,
    on_auth_failure: Option<AuthFailureHook>,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            session: self.session.clone(),
            on_auth_failure: self.on_auth_failure.clone(),
        }
    }
}

impl<T> fmt::Debug for ApiClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("authenticated", &self.session.token().is_some())
            .field("on_auth_failure", &self.on_auth_failure.is_some())
            .finish_non_exhaustive()
    }
}

impl<T: Transport> ApiClient<T> {
    #[must_use]
    pub fn new(transport: T, session: Arc<dyn TokenStore>) -> Self {
        Self {
            transport: Arc::new(transport),
            session,
            on_auth_failure: None,
        }
    }

    /// Install the hook run when an authenticated call is rejected.
    #[must_use]
    pub fn with_auth_failure_hook(mut self, hook: AuthFailureHook) -> Self {
        self.on_auth_failure = Some(hook);
        self
    }

    #[must_use]
    pub fn session(&self) -> &dyn TokenStore {
        self.session.as_ref()
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) fn bearer(&self, access: Access) -> Option<String> {
        match access {
            Access::Public => None,
            Access::Authenticated => self.session.token(),
        }
    }

    /// Perform a unary call.
    ///
    /// # Errors
    ///
    /// Fails with [`ApiError::AuthenticationRequired`] when an authenticated call is rejected
    /// with `unauthenticated` or `permission_denied`, after running the [`AuthFailureHook`].
    /// No retry is attempted. Any other failure is returned as is.
    pub async fn call<Req, Resp>(
        &self,
        procedure: Procedure,
        access: Access,
        request: &Req,
    ) -> Result<Resp, ApiError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let request = RpcRequest {
            procedure,
            body: serde_json::to_value(request)?,
            bearer: self.bearer(access),
        };
        debug!(
            "calling {procedure} ({})",
            if request.bearer.is_some() { "with session" } else { "anonymous" }
        );

        match self.transport.unary(request).await {
            Ok(body) => Ok(serde_json::from_value(body)?),
            Err(ApiError::Status { code, message })
                if access == Access::Authenticated && code.is_auth_failure() =>
            {
                warn!("{procedure} rejected the session ({code}): {message}");
                if let Some(hook) = &self.on_auth_failure {
                    hook(code);
                }
                Err(ApiError::AuthenticationRequired { code })
            }
            Err(e) => Err(e),
        }
    }
}

/// The empty message, `{}` on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct Empty {}


#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::{test_transport::ScriptedTransport, *};
    use crate::session::MemoryTokenStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const PROCEDURE: Procedure = Procedure::new("user.v1.UserService", "UserInfo");

    #[tokio::test]
    async fn test_authenticated_call_attaches_bearer() {
        let session = Arc::new(MemoryTokenStore::with_token("tkn"));
        let client = ApiClient::new(ScriptedTransport::default(), session);

        let _: Empty = client
            .call(PROCEDURE, Access::Authenticated, &Empty {})
            .await
            .unwrap();
        let _: Empty = client.call(PROCEDURE, Access::Public, &Empty {}).await.unwrap();

        let calls = client.transport().calls.lock().unwrap();
        assert_eq!(calls[0].bearer.as_deref(), Some("tkn"));
        assert_eq!(calls[0].body, json!({}));
        assert_eq!(calls[1].bearer, None);
    }

    #[tokio::test]
    async fn test_auth_failure_runs_hook_and_is_terminal() {
        let redirected = Arc::new(Mutex::new(Vec::new()));
        let hook_log = redirected.clone();
        let transport = ScriptedTransport::replying([Err(ApiError::status(
            Code::Unauthenticated,
            "token expired",
        ))]);
        let client = ApiClient::new(transport, Arc::new(MemoryTokenStore::with_token("old")))
            .with_auth_failure_hook(Arc::new(move |code| hook_log.lock().unwrap().push(code)));

        let result: Result<Empty, _> = client.call(PROCEDURE, Access::Authenticated, &Empty {}).await;

        assert!(matches!(
            result,
            Err(ApiError::AuthenticationRequired {
                code: Code::Unauthenticated
            })
        ));
        assert_eq!(*redirected.lock().unwrap(), vec![Code::Unauthenticated]);
        // no retry
        assert_eq!(client.transport().calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_public_call_passes_auth_errors_through() {
        let redirected = Arc::new(Mutex::new(0));
        let hook_count = redirected.clone();
        let transport =
            ScriptedTransport::replying([Err(ApiError::status(Code::Unauthenticated, "not verified"))]);
        let client = ApiClient::new(transport, Arc::new(MemoryTokenStore::new()))
            .with_auth_failure_hook(Arc::new(move |_| *hook_count.lock().unwrap() += 1));

        let result: Result<Empty, _> = client.call(PROCEDURE, Access::Public, &Empty {}).await;

        assert!(matches!(
            result,
            Err(ApiError::Status {
                code: Code::Unauthenticated,
                ..
            })
        ));
        assert_eq!(*redirected.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_intercepted() {
        let transport = ScriptedTransport::replying([Err(ApiError::status(Code::Internal, "db down"))]);
        let client = ApiClient::new(transport, Arc::new(MemoryTokenStore::with_token("t")));

        let result: Result<Empty, _> = client.call(PROCEDURE, Access::Authenticated, &Empty {}).await;

        assert_eq!(result.unwrap_err().code(), Some(Code::Internal));
    }
}
