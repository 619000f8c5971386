//! Lazy, composable computations.
//!
//! A [`Provider`] is a zero-argument computation that yields a value or a
//! [`DomainError`](crate::DomainError) when invoked with [`Provider::get`].
//! Nothing runs at construction time, so callers can assemble a pipeline
//! (load, transform, emit) and decide later whether and when to run it.
//! Suspension points are exactly at invocation, never implicit.

use std::sync::Arc;
use std::thread;

use crate::error::{DomainError, DomainResult};

/// A deferred computation producing `T` or a domain failure on demand.
///
/// Cheap to clone; re-invoking a provider without intervening mutation of
/// whatever it reads must yield identical results.
pub struct Provider<T> {
    thunk: Arc<dyn Fn() -> DomainResult<T> + Send + Sync>,
}

impl<T> Clone for Provider<T> {
    fn clone(&self) -> Self {
        Self {
            thunk: Arc::clone(&self.thunk),
        }
    }
}

impl<T> core::fmt::Debug for Provider<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Provider(..)")
    }
}

impl<T: 'static> Provider<T> {
    /// Wrap a computation. It will not run until [`get`](Self::get) is called.
    pub fn new(f: impl Fn() -> DomainResult<T> + Send + Sync + 'static) -> Self {
        Self { thunk: Arc::new(f) }
    }

    /// A provider that always fails with `err`.
    pub fn error(err: DomainError) -> Self {
        Self::new(move || Err(err.clone()))
    }

    /// Invoke the computation.
    pub fn get(&self) -> DomainResult<T> {
        (self.thunk)()
    }

    /// Transform the value on success; failure propagates unchanged.
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + Send + Sync + 'static) -> Provider<U> {
        Provider::new(move || self.get().map(&f))
    }

    /// Transform the value with a fallible function; evaluation stays lazy.
    pub fn and_then<U: 'static>(
        self,
        f: impl Fn(T) -> DomainResult<U> + Send + Sync + 'static,
    ) -> Provider<U> {
        Provider::new(move || self.get().and_then(&f))
    }
}

impl<T: Clone + Send + Sync + 'static> Provider<T> {
    /// A provider that always yields a copy of `value`.
    pub fn fixed(value: T) -> Self {
        Self::new(move || Ok(value.clone()))
    }
}

impl<T: Send + 'static> Provider<Vec<T>> {
    /// Apply a fallible transform to every element, sequentially.
    ///
    /// The first failing element fails the whole computation.
    pub fn map_seq<U: Send + 'static>(
        self,
        f: impl Fn(T) -> DomainResult<U> + Send + Sync + 'static,
    ) -> Provider<Vec<U>> {
        Provider::new(move || self.get()?.into_iter().map(&f).collect())
    }

    /// Apply a fallible transform to every element, concurrently.
    ///
    /// Fan-out is one scoped thread per element; fan-in preserves input
    /// order regardless of completion order. Any single element's failure
    /// fails the whole computation. The transform must be side-effect free.
    pub fn par_map_seq<U: Send + 'static>(
        self,
        f: impl Fn(T) -> DomainResult<U> + Send + Sync + 'static,
    ) -> Provider<Vec<U>> {
        let f = Arc::new(f);
        Provider::new(move || {
            let items = self.get()?;
            let f = &f;
            let results: Vec<DomainResult<U>> = thread::scope(|scope| {
                let handles: Vec<_> = items
                    .into_iter()
                    .map(|item| scope.spawn(move || f(item)))
                    .collect();
                handles
                    .into_iter()
                    .map(|h| {
                        h.join().unwrap_or_else(|_| {
                            Err(DomainError::validation("parallel map worker panicked"))
                        })
                    })
                    .collect()
            });
            results.into_iter().collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn construction_does_not_evaluate() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let provider = Provider::new(move || {
            counted.fetch_add(1, Ordering::SeqCst);
            Ok(7u32)
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(provider.get().unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn repeated_invocations_yield_identical_results() {
        let provider = Provider::fixed(vec![1u32, 2, 3]);
        assert_eq!(provider.get().unwrap(), provider.get().unwrap());
    }

    #[test]
    fn map_transforms_success_and_propagates_failure() {
        let ok = Provider::fixed(2u32).map(|v| v * 10);
        assert_eq!(ok.get().unwrap(), 20);

        let failed = Provider::<u32>::error(DomainError::not_found()).map(|v| v * 10);
        assert_eq!(failed.get().unwrap_err(), DomainError::NotFound);
    }

    #[test]
    fn map_stays_lazy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let _mapped = Provider::fixed(1u32).map(move |v| {
            counted.fetch_add(1, Ordering::SeqCst);
            v
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn par_map_seq_preserves_input_order() {
        let provider = Provider::fixed((0u32..32).collect::<Vec<_>>())
            .par_map_seq(|v| Ok(v * 2));
        let out = provider.get().unwrap();
        assert_eq!(out, (0u32..32).map(|v| v * 2).collect::<Vec<_>>());
    }

    #[test]
    fn par_map_seq_fails_when_any_element_fails() {
        let provider = Provider::fixed(vec![1u32, 2, 3]).par_map_seq(|v| {
            if v == 2 {
                Err(DomainError::validation("bad element"))
            } else {
                Ok(v)
            }
        });
        assert!(matches!(
            provider.get().unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[test]
    fn and_then_short_circuits_on_failure() {
        let provider = Provider::fixed(5u32)
            .and_then(|_| Err::<u32, _>(DomainError::validation("nope")))
            .map(|v| v + 1);
        assert!(matches!(
            provider.get().unwrap_err(),
            DomainError::Validation(_)
        ));
    }
}
