/// Wraps a query result together with its emit count, the 1-based position of
/// the value in the stream it was taken from.
///
/// `emit_count` is expected to be at least 1; the constructor does not check
/// it. With 0, [`update_count`](Self::update_count) reports 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryCountResult<T> {
    result: T,
    emit_count: u64,
}

impl<T> QueryCountResult<T> {
    pub fn new(result: T, emit_count: u64) -> Self {
        QueryCountResult { result, emit_count }
    }

    pub fn result(&self) -> &T {
        &self.result
    }

    pub fn into_result(self) -> T {
        self.result
    }

    pub fn into_parts(self) -> (T, u64) {
        (self.result, self.emit_count)
    }

    /// Number of times the source has emitted, counting this value. The
    /// initial result returns 1.
    pub fn emit_count(&self) -> u64 {
        self.emit_count
    }

    /// Number of times the query has been updated. The initial result
    /// returns 0.
    pub fn update_count(&self) -> u64 {
        self.emit_count.saturating_sub(1)
    }

    pub fn is_initial_update(&self) -> bool {
        self.emit_count == 1
    }

    pub fn map<U, F>(self, f: F) -> QueryCountResult<U>
    where
        F: FnOnce(T) -> U,
    {
        QueryCountResult::new(f(self.result), self.emit_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_emission_is_initial() {
        let first = QueryCountResult::new("a", 1);

        assert!(first.is_initial_update());
        assert_eq!(first.update_count(), 0);
        assert_eq!(*first.result(), "a");
    }

    #[test]
    fn later_emissions_are_updates() {
        let third = QueryCountResult::new(vec![1, 2], 3);

        assert!(!third.is_initial_update());
        assert_eq!(third.update_count(), 2);
        assert_eq!(third.emit_count(), 3);
        assert_eq!(third.into_result(), vec![1, 2]);
    }

    #[test]
    fn zero_index_does_not_underflow() {
        let bogus = QueryCountResult::new((), 0);

        assert!(!bogus.is_initial_update());
        assert_eq!(bogus.update_count(), 0);
    }

    #[test]
    fn map_keeps_count() {
        let mapped = QueryCountResult::new(21, 2).map(|x| x * 2);

        assert_eq!(mapped.into_parts(), (42, 2));
    }
}
