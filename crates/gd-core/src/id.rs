use lasso::{Spur, ThreadedRodeo};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner shared by instance and pair identifiers.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

fn next_serial() -> u64 {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Identity of one placed glyph in a scene.
/// Internally a `Spur` index: 4 bytes, Copy, O(1) Eq and Hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(Spur);

impl InstanceId {
    /// Intern a string as an InstanceId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        InstanceId(INTERNER.get_or_intern(s))
    }

    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a fresh id (`glyph_0`, `glyph_1`, ...). Never reused within a process.
    pub fn fresh() -> Self {
        Self::intern(&format!("glyph_{}", next_serial()))
    }
}

/// Opaque id shared by the two halves of a symmetry pair.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairId(Spur);

impl PairId {
    pub fn intern(s: &str) -> Self {
        PairId(INTERNER.get_or_intern(s))
    }

    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a fresh pair id (`sym_0`, `sym_1`, ...).
    pub fn fresh() -> Self {
        Self::intern(&format!("sym_{}", next_serial()))
    }
}

impl fmt::Debug for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~{}", self.as_str())
    }
}
