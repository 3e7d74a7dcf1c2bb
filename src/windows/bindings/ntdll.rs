//! ntdll.dll bindings for variable-length information queries

use crate::core::types::NtStatus;
use std::ptr;
use winapi::shared::minwindef::ULONG;
use winapi::shared::ntdef::{NTSTATUS, PVOID};
use winapi::um::winnt::HANDLE;

#[link(name = "ntdll")]
extern "system" {
    fn NtQuerySystemInformation(
        system_information_class: ULONG,
        system_information: PVOID,
        system_information_length: ULONG,
        return_length: *mut ULONG,
    ) -> NTSTATUS;

    fn NtQueryObject(
        handle: HANDLE,
        object_information_class: ULONG,
        object_information: PVOID,
        object_information_length: ULONG,
        return_length: *mut ULONG,
    ) -> NTSTATUS;

    fn NtQueryInformationToken(
        token_handle: HANDLE,
        token_information_class: ULONG,
        token_information: PVOID,
        token_information_length: ULONG,
        return_length: *mut ULONG,
    ) -> NTSTATUS;
}

/// Safe wrapper for NtQuerySystemInformation
pub fn query_system_information(class: u32, buffer: &mut [u8], returned: &mut u32) -> NtStatus {
    let raw = unsafe {
        NtQuerySystemInformation(
            class,
            buffer.as_mut_ptr() as PVOID,
            buffer.len() as ULONG,
            returned as *mut ULONG,
        )
    };
    NtStatus(raw)
}

/// Safe wrapper for NtQueryObject. A `None` handle queries the global
/// object-type table instead of a specific object.
pub fn query_object(
    handle: Option<isize>,
    class: u32,
    buffer: &mut [u8],
    returned: &mut u32,
) -> NtStatus {
    let raw = unsafe {
        NtQueryObject(
            handle.map_or(ptr::null_mut(), |h| h as HANDLE),
            class,
            buffer.as_mut_ptr() as PVOID,
            buffer.len() as ULONG,
            returned as *mut ULONG,
        )
    };
    NtStatus(raw)
}

/// Safe wrapper for NtQueryInformationToken
pub fn query_information_token(
    token: isize,
    class: u32,
    buffer: &mut [u8],
    returned: &mut u32,
) -> NtStatus {
    let raw = unsafe {
        NtQueryInformationToken(
            token as HANDLE,
            class,
            buffer.as_mut_ptr() as PVOID,
            buffer.len() as ULONG,
            returned as *mut ULONG,
        )
    };
    NtStatus(raw)
}
