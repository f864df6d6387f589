use std::fmt;

/// Wrapper for &[T] which logs as a markdown-style list, one entry per line.
///
/// Empty lists render as `(none)` so a missing extension list is still
/// visible in the log.
pub struct PrettyList<'data, T>(pub &'data [T]);

impl<T> PrettyList<'_, T> {
    fn write_entries(
        &self,
        f: &mut fmt::Formatter<'_>,
        mut write_entry: impl FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
    ) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(none)");
        }
        for entry in self.0 {
            f.write_str("\n- ")?;
            write_entry(f, entry)?;
        }
        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Debug for PrettyList<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_entries(f, |f, entry| write!(f, "{:?}", entry))
    }
}

impl<T: fmt::Display> fmt::Display for PrettyList<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_entries(f, |f, entry| write!(f, "{}", entry))
    }
}
