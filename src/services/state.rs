use serde::Serialize;

/// Lifecycle of a single fetch role: `Idle → Loading → Resolved | Failed | Aborted`
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Idle,
    Loading,
    Resolved(T),
    Failed(String),
    Aborted,
}

/// Payload-free view of a `FetchState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    Idle,
    Loading,
    Resolved,
    Failed,
    Aborted,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::Idle
    }
}

impl<T> FetchState<T> {
    pub fn status(&self) -> FetchStatus {
        match self {
            FetchState::Idle => FetchStatus::Idle,
            FetchState::Loading => FetchStatus::Loading,
            FetchState::Resolved(_) => FetchStatus::Resolved,
            FetchState::Failed(_) => FetchStatus::Failed,
            FetchState::Aborted => FetchStatus::Aborted,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn resolved(&self) -> Option<&T> {
        match self {
            FetchState::Resolved(value) => Some(value),
            _ => None,
        }
    }

    /// An in-flight fetch whose scope was torn down ends as `Aborted`;
    /// settled states are left alone.
    pub fn abort(&mut self) {
        if self.is_loading() {
            *self = FetchState::Aborted;
        }
    }
}
