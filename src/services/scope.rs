use tokio_util::sync::CancellationToken;

/// One cancellation scope per fetch role. Renewing the scope cancels the
/// previous token, so at most one request per role is ever live.
#[derive(Debug)]
pub struct CancellationScope {
    role: &'static str,
    current: Option<CancellationToken>,
}

impl CancellationScope {
    pub fn new(role: &'static str) -> Self {
        Self {
            role,
            current: None,
        }
    }

    pub fn role(&self) -> &'static str {
        self.role
    }

    /// Cancel whatever is in flight and hand out a fresh token
    pub fn renew(&mut self) -> CancellationToken {
        self.cancel();
        let token = CancellationToken::new();
        self.current = Some(token.clone());
        token
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            if !token.is_cancelled() {
                tracing::debug!(role = self.role, "Cancelling in-flight request");
            }
            token.cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        self.current.as_ref().is_some_and(|t| !t.is_cancelled())
    }
}

impl Drop for CancellationScope {
    fn drop(&mut self) {
        self.cancel();
    }
}
