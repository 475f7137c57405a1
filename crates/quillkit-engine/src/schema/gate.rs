use std::fmt;
use std::sync::Arc;

/// Host-supplied predicate restricting which media sources may enter the
/// document.
///
/// Consulted synchronously at HTML parse time, during input-rule
/// auto-conversion (potentially on every keystroke), and optionally on
/// programmatic inserts — implementations must be fast and side-effect-free.
/// A rejected source is a normal "nothing happened" outcome, never an error.
///
/// The default gate allows any non-empty `src`.
#[derive(Clone)]
pub struct SourceGate(Arc<dyn Fn(Option<&str>) -> bool + Send + Sync>);

impl SourceGate {
    pub fn new(predicate: impl Fn(Option<&str>) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    /// Gate that only admits sources for which `predicate` returns true.
    ///
    /// A missing or empty `src` is always rejected, matching the default.
    pub fn restricting(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self::new(move |src| src.is_some_and(|s| !s.is_empty() && predicate(s)))
    }

    pub fn allows(&self, src: Option<&str>) -> bool {
        (self.0)(src)
    }
}

impl Default for SourceGate {
    fn default() -> Self {
        Self::new(|src| src.is_some_and(|s| !s.is_empty()))
    }
}

impl fmt::Debug for SourceGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SourceGate(..)")
    }
}
