//! RAII handle ownership across query operations
//!
//! Process, token, and object handles are scoped strictly to the operation
//! that opens them and must be released on every exit path. `HandleGuard`
//! ties the release to drop so early-error branches cannot leak.

use super::selector::RawHandle;
use crate::core::types::QueryResult;

/// Opens and closes the subject handles query operations need.
///
/// The production implementation wraps OpenProcess / OpenProcessToken /
/// CloseHandle; tests substitute a counting double to assert open/close
/// balance, including on failure paths.
pub trait HandleProvider {
    fn open_process(&self, pid: u32) -> QueryResult<RawHandle>;
    fn open_process_token(&self, process: RawHandle) -> QueryResult<RawHandle>;
    fn close(&self, handle: RawHandle);
}

/// Owns one raw handle; closes it through the provider on drop
pub struct HandleGuard<'a, P: HandleProvider + ?Sized> {
    provider: &'a P,
    handle: RawHandle,
}

impl<'a, P: HandleProvider + ?Sized> HandleGuard<'a, P> {
    pub fn new(provider: &'a P, handle: RawHandle) -> Self {
        HandleGuard { provider, handle }
    }

    pub fn raw(&self) -> RawHandle {
        self.handle
    }
}

impl<P: HandleProvider + ?Sized> Drop for HandleGuard<'_, P> {
    fn drop(&mut self) {
        self.provider.close(self.handle);
    }
}
