//! Real OS implementations of the query, handle, and resolver seams

use super::bindings::ntdll;
use super::strings::wide_to_string;
use crate::core::types::{Advisory, NtStatus, QueryError, QueryResult, Win32Code};
use crate::inspect::AccountResolver;
use crate::query::{HandleProvider, InfoSelector, NativeQuery, RawHandle};
use crate::security::{AccountInfo, Sid, SidNameUse};
use std::ptr;
use tracing::warn;
use winapi::shared::minwindef::FALSE;
use winapi::um::errhandlingapi::GetLastError;
use winapi::um::handleapi::CloseHandle;
use winapi::um::processthreadsapi::{OpenProcess, OpenProcessToken};
use winapi::um::winbase::LookupAccountSidW;
use winapi::um::winnt::{
    HANDLE, PROCESS_QUERY_INFORMATION, PSID, SID_NAME_USE, TOKEN_QUERY,
};

const ERROR_ACCESS_DENIED: u32 = 5;
const ERROR_INVALID_PARAMETER: u32 = 87;
const ERROR_INSUFFICIENT_BUFFER: u32 = 122;

/// Human-readable text for a Win32 error code
fn error_message(code: u32) -> String {
    windows::core::Error::from(windows::core::HRESULT::from_win32(code))
        .message()
        .to_string()
}

/// Routes selectors to the matching ntdll entry point and owns the raw
/// OpenProcess / OpenProcessToken / LookupAccountSid calls
#[derive(Debug, Default)]
pub struct SystemNative;

impl SystemNative {
    pub fn new() -> Self {
        SystemNative
    }
}

impl NativeQuery for SystemNative {
    fn invoke(
        &mut self,
        selector: &InfoSelector,
        buffer: &mut [u8],
        returned: &mut u32,
    ) -> NtStatus {
        match *selector {
            InfoSelector::System(class) => {
                ntdll::query_system_information(class.class_id(), buffer, returned)
            }
            InfoSelector::Object { handle, class } => {
                ntdll::query_object(handle, class.class_id(), buffer, returned)
            }
            InfoSelector::Token { token, class } => {
                ntdll::query_information_token(token, class.class_id(), buffer, returned)
            }
        }
    }
}

impl HandleProvider for SystemNative {
    fn open_process(&self, pid: u32) -> QueryResult<RawHandle> {
        let handle = unsafe { OpenProcess(PROCESS_QUERY_INFORMATION, FALSE, pid) };
        if handle.is_null() {
            let code = unsafe { GetLastError() };
            return Err(match code {
                ERROR_INVALID_PARAMETER => QueryError::ProcessNotFound(pid),
                ERROR_ACCESS_DENIED => QueryError::access_denied(pid, error_message(code)),
                other => QueryError::access_denied(
                    pid,
                    format!("OpenProcess failed ({}): {}", other, error_message(other)),
                ),
            });
        }
        Ok(handle as RawHandle)
    }

    fn open_process_token(&self, process: RawHandle) -> QueryResult<RawHandle> {
        let mut token: HANDLE = ptr::null_mut();
        let ok = unsafe { OpenProcessToken(process as HANDLE, TOKEN_QUERY, &mut token) };
        if ok == FALSE {
            let code = unsafe { GetLastError() };
            return Err(QueryError::InvalidHandle(format!(
                "OpenProcessToken failed ({}): {}",
                code,
                error_message(code)
            )));
        }
        Ok(token as RawHandle)
    }

    fn close(&self, handle: RawHandle) {
        let ok = unsafe { CloseHandle(handle as HANDLE) };
        if ok == FALSE {
            warn!(handle, "CloseHandle failed");
        }
    }
}

impl AccountResolver for SystemNative {
    fn lookup_account(&self, sid: &Sid) -> Result<AccountInfo, Advisory> {
        let psid = sid.as_bytes().as_ptr() as PSID;
        let mut name_len = 0u32;
        let mut domain_len = 0u32;
        let mut use_raw: SID_NAME_USE = 0;

        // Probe call reports the required lengths
        unsafe {
            LookupAccountSidW(
                ptr::null(),
                psid,
                ptr::null_mut(),
                &mut name_len,
                ptr::null_mut(),
                &mut domain_len,
                &mut use_raw,
            );
        }
        let code = unsafe { GetLastError() };
        if code != ERROR_INSUFFICIENT_BUFFER {
            return Err(Advisory::new("LookupAccountSid", Win32Code::from(code)));
        }

        let mut name = vec![0u16; name_len as usize];
        let mut domain = vec![0u16; domain_len as usize];
        let ok = unsafe {
            LookupAccountSidW(
                ptr::null(),
                psid,
                name.as_mut_ptr(),
                &mut name_len,
                domain.as_mut_ptr(),
                &mut domain_len,
                &mut use_raw,
            )
        };
        if ok == FALSE {
            let code = unsafe { GetLastError() };
            return Err(Advisory::new("LookupAccountSid", Win32Code::from(code)));
        }

        Ok(AccountInfo {
            name: wide_to_string(&name),
            domain: wide_to_string(&domain),
            use_kind: SidNameUse::from(use_raw),
        })
    }
}
