//! Request correlation identifier.
//!
//! The request middleware puts a `TraceId` in task-local scope for the
//! duration of each request so errors and log lines can be correlated without
//! threading the value through every call. Task locals do not follow
//! `tokio::spawn`; wrap spawned work in [`TraceId::scope`] when it matters.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// Correlation identifier for one inbound request.
///
/// # Examples
/// ```
/// use journal_backend::domain::TraceId;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let id: TraceId = "6f9619ff-8b86-d011-b42d-00c04fc964ff".parse().unwrap();
/// let seen = TraceId::scope(id, async { TraceId::current() }).await;
/// assert_eq!(seen, Some(id));
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Mint a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reuse a caller-supplied identifier when it is a well-formed UUID,
    /// otherwise mint a new one.
    #[must_use]
    pub fn from_header_or_generate(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.trim().parse().ok())
            .unwrap_or_else(Self::generate)
    }

    /// Identifier in scope for the current task, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` in scope.
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn current_is_none_outside_a_scope() {
        assert!(TraceId::current().is_none());
    }

    #[tokio::test]
    async fn scope_exposes_the_identifier() {
        let id = TraceId::generate();
        let seen = TraceId::scope(id, async { TraceId::current() }).await;
        assert_eq!(seen, Some(id));
    }

    #[rstest]
    #[case(Some("00000000-0000-0000-0000-000000000001"), true)]
    #[case(Some("  00000000-0000-0000-0000-000000000001 "), true)]
    #[case(Some("not-a-uuid"), false)]
    #[case(None, false)]
    fn header_values_are_reused_only_when_valid(
        #[case] raw: Option<&str>,
        #[case] reused: bool,
    ) {
        let id = TraceId::from_header_or_generate(raw);
        let expected = "00000000-0000-0000-0000-000000000001";
        assert_eq!(id.to_string() == expected, reused);
    }
}
