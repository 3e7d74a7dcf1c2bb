//! Growable-buffer query adapter
//!
//! Probe-then-fetch loop against a native query interface that signals
//! undersized buffers with a status code instead of failing outright.

use super::buffer::GrowableBuffer;
use super::selector::InfoSelector;
use crate::core::types::{NtStatus, QueryError, QueryResult, StatusKind};
use tracing::debug;

/// Seam between the adapter and the native query surface.
///
/// The production implementation routes selectors to the matching ntdll
/// entry point; tests substitute doubles that script status sequences and
/// count invocations.
pub trait NativeQuery {
    /// Issue one native call. Writes output into `buffer`, stores the
    /// bytes needed or returned into `returned`, and reports the raw status.
    fn invoke(&mut self, selector: &InfoSelector, buffer: &mut [u8], returned: &mut u32)
        -> NtStatus;
}

/// Retrieve a variable-length information buffer for `selector`.
///
/// Starts at `initial_capacity` and retries while the native layer reports
/// a length mismatch: growing to exactly the reported requirement when one
/// is furnished, doubling otherwise. Exceeding `max_capacity` converts the
/// loop into `QueryError::BufferLimit`. Any other failure status is
/// propagated as `QueryError::Native`; the buffer is released on every
/// path. A success with a zero count in the payload is a positive "no
/// records" result and is returned like any other buffer.
pub fn query_growable<N: NativeQuery>(
    native: &mut N,
    selector: &InfoSelector,
    initial_capacity: usize,
    max_capacity: usize,
) -> QueryResult<GrowableBuffer> {
    let api = selector.api_name();
    let mut buffer = GrowableBuffer::with_capacity(initial_capacity.max(4));

    loop {
        let mut returned = 0u32;
        let status = native.invoke(selector, buffer.as_mut_slice(), &mut returned);

        match status.kind() {
            StatusKind::Success => {
                buffer.set_used(returned as usize);
                return Ok(buffer);
            }
            StatusKind::NeedsLargerBuffer => {
                // Prefer the exact requirement when the class reports one;
                // fall back to doubling for classes that report nothing.
                let reported = returned as usize;
                let next = if reported > buffer.capacity() {
                    reported
                } else {
                    buffer.capacity() * 2
                };
                if next > max_capacity {
                    return Err(QueryError::BufferLimit {
                        api,
                        limit: max_capacity,
                    });
                }
                debug!(
                    api,
                    from = buffer.capacity(),
                    to = next,
                    reported,
                    "growing query buffer"
                );
                buffer.grow_to(next);
            }
            _ => return Err(QueryError::native(api, status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::selector::SystemClass;

    /// Scripted native layer: yields each (status, returned) in order
    struct Scripted {
        steps: Vec<(NtStatus, u32)>,
        calls: usize,
        capacities_seen: Vec<usize>,
    }

    impl Scripted {
        fn new(steps: Vec<(NtStatus, u32)>) -> Self {
            Scripted {
                steps,
                calls: 0,
                capacities_seen: Vec::new(),
            }
        }
    }

    impl NativeQuery for Scripted {
        fn invoke(
            &mut self,
            _selector: &InfoSelector,
            buffer: &mut [u8],
            returned: &mut u32,
        ) -> NtStatus {
            self.capacities_seen.push(buffer.len());
            let (status, len) = self.steps[self.calls.min(self.steps.len() - 1)];
            self.calls += 1;
            *returned = len;
            status
        }
    }

    const SEL: InfoSelector = InfoSelector::System(SystemClass::ExtendedHandleInformation);

    #[test]
    fn test_success_first_try() {
        let mut native = Scripted::new(vec![(NtStatus::SUCCESS, 64)]);
        let buf = query_growable(&mut native, &SEL, 128, 1 << 20).unwrap();
        assert_eq!(native.calls, 1);
        assert_eq!(buf.used(), 64);
    }

    #[test]
    fn test_grows_to_exact_reported_size() {
        let mut native = Scripted::new(vec![
            (NtStatus::INFO_LENGTH_MISMATCH, 9000),
            (NtStatus::SUCCESS, 9000),
        ]);
        let buf = query_growable(&mut native, &SEL, 1024, 1 << 20).unwrap();
        assert_eq!(native.calls, 2);
        assert_eq!(native.capacities_seen, vec![1024, 9000]);
        assert!(buf.capacity() >= 9000);
        assert_eq!(buf.used(), 9000);
    }

    #[test]
    fn test_doubles_when_no_size_reported() {
        let mut native = Scripted::new(vec![
            (NtStatus::INFO_LENGTH_MISMATCH, 0),
            (NtStatus::INFO_LENGTH_MISMATCH, 0),
            (NtStatus::SUCCESS, 3000),
        ]);
        let buf = query_growable(&mut native, &SEL, 1024, 1 << 20).unwrap();
        assert_eq!(native.capacities_seen, vec![1024, 2048, 4096]);
        assert_eq!(buf.used(), 3000);
    }

    #[test]
    fn test_capacity_limit_becomes_error() {
        let mut native = Scripted::new(vec![(NtStatus::INFO_LENGTH_MISMATCH, 0)]);
        let err = query_growable(&mut native, &SEL, 1024, 4096).unwrap_err();
        match err {
            QueryError::BufferLimit { api, limit } => {
                assert_eq!(api, "NtQuerySystemInformation");
                assert_eq!(limit, 4096);
            }
            other => panic!("unexpected error: {other}"),
        }
        // 1024 -> 2048 -> 4096, then the next doubling would breach the cap
        assert_eq!(native.capacities_seen, vec![1024, 2048, 4096]);
    }

    #[test]
    fn test_other_failure_propagates_status() {
        let mut native = Scripted::new(vec![(NtStatus::ACCESS_DENIED, 0)]);
        let err = query_growable(&mut native, &SEL, 1024, 1 << 20).unwrap_err();
        match err {
            QueryError::Native { api, status } => {
                assert_eq!(api, "NtQuerySystemInformation");
                assert_eq!(status, NtStatus::ACCESS_DENIED);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_returned_on_success_uses_whole_region() {
        let mut native = Scripted::new(vec![(NtStatus::SUCCESS, 0)]);
        let buf = query_growable(&mut native, &SEL, 256, 1 << 20).unwrap();
        assert_eq!(buf.used(), 256);
    }
}
