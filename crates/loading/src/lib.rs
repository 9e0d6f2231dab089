//! Load-state machinery for the two startup dataset fetches.
//!
//! This is intentionally small and deterministic: each dataset moves through
//! an explicit `Pending -> Loaded | Failed` lifecycle, and [`DualLoad`] joins
//! the two so nothing downstream can observe "ready" before both are.

/// Why a dataset load failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Transport-level failure: request error, file read error.
    Fetch(String),
    /// The upstream answered with a non-success HTTP status.
    Status(u16),
    /// The body arrived but could not be decoded.
    Decode(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Fetch(msg) => write!(f, "fetch failed: {msg}"),
            LoadError::Status(code) => write!(f, "upstream HTTP {code}"),
            LoadError::Decode(msg) => write!(f, "decode failed: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Lifecycle of one dataset load.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetState<T> {
    Pending,
    Loaded(T),
    Failed(LoadError),
}

impl<T> DatasetState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, DatasetState::Pending)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, DatasetState::Loaded(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, DatasetState::Failed(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            DatasetState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            DatasetState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn complete(&mut self, value: T) {
        *self = DatasetState::Loaded(value);
    }

    pub fn fail(&mut self, error: LoadError) {
        *self = DatasetState::Failed(error);
    }

    /// Returns the slot to `Pending`. This is the retry affordance: the
    /// machine itself never retries, times out, or keeps partial results.
    pub fn reset(&mut self) {
        *self = DatasetState::Pending;
    }
}

impl<T> Default for DatasetState<T> {
    fn default() -> Self {
        DatasetState::Pending
    }
}

/// Combined phase of the startup load pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Ready,
    Failed,
}

impl LoadPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            LoadPhase::Loading => "loading",
            LoadPhase::Ready => "ready",
            LoadPhase::Failed => "failed",
        }
    }
}

/// Join of the two startup fetches.
///
/// `Ready` requires both slots `Loaded`; a single `Failed` slot makes the
/// whole join `Failed` so the failure is surfaced instead of leaving the
/// caller in a loading state forever.
#[derive(Debug, Clone, PartialEq)]
pub struct DualLoad<A, B> {
    first_label: &'static str,
    second_label: &'static str,
    first: DatasetState<A>,
    second: DatasetState<B>,
}

impl<A, B> DualLoad<A, B> {
    pub fn new(first_label: &'static str, second_label: &'static str) -> Self {
        Self {
            first_label,
            second_label,
            first: DatasetState::Pending,
            second: DatasetState::Pending,
        }
    }

    pub fn first(&self) -> &DatasetState<A> {
        &self.first
    }

    pub fn first_mut(&mut self) -> &mut DatasetState<A> {
        &mut self.first
    }

    pub fn second(&self) -> &DatasetState<B> {
        &self.second
    }

    pub fn second_mut(&mut self) -> &mut DatasetState<B> {
        &mut self.second
    }

    pub fn phase(&self) -> LoadPhase {
        if self.first.is_failed() || self.second.is_failed() {
            return LoadPhase::Failed;
        }
        if self.first.is_loaded() && self.second.is_loaded() {
            return LoadPhase::Ready;
        }
        LoadPhase::Loading
    }

    /// Both values, available only once both slots are `Loaded`.
    pub fn both(&self) -> Option<(&A, &B)> {
        Some((self.first.value()?, self.second.value()?))
    }

    /// Slot label and error for every failed slot.
    pub fn failures(&self) -> Vec<(&'static str, &LoadError)> {
        let mut out = Vec::new();
        if let Some(err) = self.first.error() {
            out.push((self.first_label, err));
        }
        if let Some(err) = self.second.error() {
            out.push((self.second_label, err));
        }
        out
    }

    /// Resets every failed slot to `Pending`, returning the labels of the
    /// slots that were reset.
    pub fn reset_failed(&mut self) -> Vec<&'static str> {
        let mut reset = Vec::new();
        if self.first.is_failed() {
            self.first.reset();
            reset.push(self.first_label);
        }
        if self.second.is_failed() {
            self.second.reset();
            reset.push(self.second_label);
        }
        reset
    }
}

#[cfg(test)]
mod tests {
    use super::{DatasetState, DualLoad, LoadError, LoadPhase};

    #[test]
    fn dataset_state_transitions() {
        let mut state: DatasetState<u32> = DatasetState::default();
        assert!(state.is_pending());
        assert_eq!(state.value(), None);

        state.complete(7);
        assert!(state.is_loaded());
        assert_eq!(state.value(), Some(&7));

        state.fail(LoadError::Status(502));
        assert!(state.is_failed());
        assert_eq!(state.error(), Some(&LoadError::Status(502)));
        assert_eq!(state.value(), None);

        state.reset();
        assert!(state.is_pending());
    }

    #[test]
    fn join_is_ready_only_when_both_loaded() {
        let mut load: DualLoad<u32, u32> = DualLoad::new("a", "b");
        assert_eq!(load.phase(), LoadPhase::Loading);
        assert_eq!(load.both(), None);

        load.first_mut().complete(1);
        assert_eq!(load.phase(), LoadPhase::Loading);
        assert_eq!(load.both(), None);

        load.second_mut().complete(2);
        assert_eq!(load.phase(), LoadPhase::Ready);
        assert_eq!(load.both(), Some((&1, &2)));
    }

    #[test]
    fn one_failure_fails_the_join() {
        let mut load: DualLoad<u32, u32> = DualLoad::new("a", "b");
        load.first_mut().complete(1);
        load.second_mut()
            .fail(LoadError::Fetch("connection refused".to_string()));

        assert_eq!(load.phase(), LoadPhase::Failed);
        let failures = load.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "b");
        assert_eq!(load.both(), None);
    }

    #[test]
    fn reset_failed_only_touches_failed_slots() {
        let mut load: DualLoad<u32, u32> = DualLoad::new("a", "b");
        load.first_mut().complete(1);
        load.second_mut().fail(LoadError::Status(404));

        let reset = load.reset_failed();
        assert_eq!(reset, vec!["b"]);
        assert!(load.first().is_loaded());
        assert!(load.second().is_pending());
        assert_eq!(load.phase(), LoadPhase::Loading);
    }

    #[test]
    fn load_error_display() {
        assert_eq!(
            LoadError::Fetch("boom".to_string()).to_string(),
            "fetch failed: boom"
        );
        assert_eq!(LoadError::Status(503).to_string(), "upstream HTTP 503");
        assert_eq!(
            LoadError::Decode("bad json".to_string()).to_string(),
            "decode failed: bad json"
        );
    }
}
