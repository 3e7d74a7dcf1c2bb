//! Static lookup tables for token attributes and well-known privileges
//!
//! Attribute bitmasks map to names through these tables rather than inline
//! conditionals, so a new attribute is one table row, not a decoder change.
//! Built once, immutable afterwards.

use lazy_static::lazy_static;
use std::collections::HashMap;

/// SE_GROUP_* attribute bits carried by group and mandatory-label entries
pub const SE_GROUP_MANDATORY: u32 = 0x0000_0001;
pub const SE_GROUP_ENABLED_BY_DEFAULT: u32 = 0x0000_0002;
pub const SE_GROUP_ENABLED: u32 = 0x0000_0004;
pub const SE_GROUP_OWNER: u32 = 0x0000_0008;
pub const SE_GROUP_USE_FOR_DENY_ONLY: u32 = 0x0000_0010;
pub const SE_GROUP_INTEGRITY: u32 = 0x0000_0020;
pub const SE_GROUP_INTEGRITY_ENABLED: u32 = 0x0000_0040;
pub const SE_GROUP_RESOURCE: u32 = 0x2000_0000;
pub const SE_GROUP_LOGON_ID: u32 = 0xC000_0000;

/// SE_PRIVILEGE_* attribute bits carried by privilege entries
pub const SE_PRIVILEGE_ENABLED_BY_DEFAULT: u32 = 0x0000_0001;
pub const SE_PRIVILEGE_ENABLED: u32 = 0x0000_0002;
pub const SE_PRIVILEGE_REMOVED: u32 = 0x0000_0004;
pub const SE_PRIVILEGE_USED_FOR_ACCESS: u32 = 0x8000_0000;

/// Group attribute bit values and their names. `LogonId` is a two-bit
/// field; the lookup requires every bit of an entry's value to be set.
pub static GROUP_ATTRIBUTE_NAMES: &[(u32, &str)] = &[
    (SE_GROUP_MANDATORY, "Mandatory"),
    (SE_GROUP_ENABLED_BY_DEFAULT, "EnabledByDefault"),
    (SE_GROUP_ENABLED, "Enabled"),
    (SE_GROUP_OWNER, "Owner"),
    (SE_GROUP_USE_FOR_DENY_ONLY, "UseForDenyOnly"),
    (SE_GROUP_INTEGRITY, "Integrity"),
    (SE_GROUP_INTEGRITY_ENABLED, "IntegrityEnabled"),
    (SE_GROUP_RESOURCE, "Resource"),
    (SE_GROUP_LOGON_ID, "LogonId"),
];

pub static PRIVILEGE_ATTRIBUTE_NAMES: &[(u32, &str)] = &[
    (SE_PRIVILEGE_ENABLED_BY_DEFAULT, "EnabledByDefault"),
    (SE_PRIVILEGE_ENABLED, "Enabled"),
    (SE_PRIVILEGE_REMOVED, "Removed"),
    (SE_PRIVILEGE_USED_FOR_ACCESS, "UsedForAccess"),
];

fn names_for(table: &[(u32, &'static str)], mask: u32) -> Vec<&'static str> {
    table
        .iter()
        .filter(|(bit, _)| mask & bit == *bit)
        .map(|(_, name)| *name)
        .collect()
}

/// Names of every group attribute bit set in `mask`
pub fn group_attribute_names(mask: u32) -> Vec<&'static str> {
    names_for(GROUP_ATTRIBUTE_NAMES, mask)
}

/// Names of every privilege attribute bit set in `mask`
pub fn privilege_attribute_names(mask: u32) -> Vec<&'static str> {
    names_for(PRIVILEGE_ATTRIBUTE_NAMES, mask)
}

lazy_static! {
    /// Well-known privilege LUIDs. These low parts are fixed constants of
    /// the security subsystem, which keeps the decoder free of per-entry
    /// name resolution calls.
    static ref PRIVILEGE_NAMES: HashMap<u32, &'static str> = {
        let mut m = HashMap::new();
        m.insert(2, "SeCreateTokenPrivilege");
        m.insert(3, "SeAssignPrimaryTokenPrivilege");
        m.insert(4, "SeLockMemoryPrivilege");
        m.insert(5, "SeIncreaseQuotaPrivilege");
        m.insert(6, "SeMachineAccountPrivilege");
        m.insert(7, "SeTcbPrivilege");
        m.insert(8, "SeSecurityPrivilege");
        m.insert(9, "SeTakeOwnershipPrivilege");
        m.insert(10, "SeLoadDriverPrivilege");
        m.insert(11, "SeSystemProfilePrivilege");
        m.insert(12, "SeSystemtimePrivilege");
        m.insert(13, "SeProfileSingleProcessPrivilege");
        m.insert(14, "SeIncreaseBasePriorityPrivilege");
        m.insert(15, "SeCreatePagefilePrivilege");
        m.insert(16, "SeCreatePermanentPrivilege");
        m.insert(17, "SeBackupPrivilege");
        m.insert(18, "SeRestorePrivilege");
        m.insert(19, "SeShutdownPrivilege");
        m.insert(20, "SeDebugPrivilege");
        m.insert(21, "SeAuditPrivilege");
        m.insert(22, "SeSystemEnvironmentPrivilege");
        m.insert(23, "SeChangeNotifyPrivilege");
        m.insert(24, "SeRemoteShutdownPrivilege");
        m.insert(25, "SeUndockPrivilege");
        m.insert(26, "SeSyncAgentPrivilege");
        m.insert(27, "SeEnableDelegationPrivilege");
        m.insert(28, "SeManageVolumePrivilege");
        m.insert(29, "SeImpersonatePrivilege");
        m.insert(30, "SeCreateGlobalPrivilege");
        m.insert(31, "SeTrustedCredManAccessPrivilege");
        m.insert(32, "SeRelabelPrivilege");
        m.insert(33, "SeIncreaseWorkingSetPrivilege");
        m.insert(34, "SeTimeZonePrivilege");
        m.insert(35, "SeCreateSymbolicLinkPrivilege");
        m.insert(36, "SeDelegateSessionUserImpersonatePrivilege");
        m
    };

    /// User-facing descriptions keyed by privilege name
    static ref PRIVILEGE_DESCRIPTIONS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("SeCreateTokenPrivilege", "Create a token object");
        m.insert("SeAssignPrimaryTokenPrivilege", "Replace a process level token");
        m.insert("SeLockMemoryPrivilege", "Lock pages in memory");
        m.insert("SeIncreaseQuotaPrivilege", "Adjust memory quotas for a process");
        m.insert("SeMachineAccountPrivilege", "Add workstations to domain");
        m.insert("SeTcbPrivilege", "Act as part of the operating system");
        m.insert("SeSecurityPrivilege", "Manage auditing and security log");
        m.insert("SeTakeOwnershipPrivilege", "Take ownership of files or other objects");
        m.insert("SeLoadDriverPrivilege", "Load and unload device drivers");
        m.insert("SeSystemProfilePrivilege", "Profile system performance");
        m.insert("SeSystemtimePrivilege", "Change the system time");
        m.insert("SeProfileSingleProcessPrivilege", "Profile single process");
        m.insert("SeIncreaseBasePriorityPrivilege", "Increase scheduling priority");
        m.insert("SeCreatePagefilePrivilege", "Create a pagefile");
        m.insert("SeCreatePermanentPrivilege", "Create permanent shared objects");
        m.insert("SeBackupPrivilege", "Back up files and directories");
        m.insert("SeRestorePrivilege", "Restore files and directories");
        m.insert("SeShutdownPrivilege", "Shut down the system");
        m.insert("SeDebugPrivilege", "Debug programs");
        m.insert("SeAuditPrivilege", "Generate security audits");
        m.insert("SeSystemEnvironmentPrivilege", "Modify firmware environment values");
        m.insert("SeChangeNotifyPrivilege", "Bypass traverse checking");
        m.insert("SeRemoteShutdownPrivilege", "Force shutdown from a remote system");
        m.insert("SeUndockPrivilege", "Remove computer from docking station");
        m.insert("SeSyncAgentPrivilege", "Synchronize directory service data");
        m.insert("SeEnableDelegationPrivilege", "Enable accounts to be trusted for delegation");
        m.insert("SeManageVolumePrivilege", "Perform volume maintenance tasks");
        m.insert("SeImpersonatePrivilege", "Impersonate a client after authentication");
        m.insert("SeCreateGlobalPrivilege", "Create global objects");
        m.insert("SeTrustedCredManAccessPrivilege", "Access Credential Manager as a trusted caller");
        m.insert("SeRelabelPrivilege", "Modify an object label");
        m.insert("SeIncreaseWorkingSetPrivilege", "Increase a process working set");
        m.insert("SeTimeZonePrivilege", "Change the time zone");
        m.insert("SeCreateSymbolicLinkPrivilege", "Create symbolic links");
        m.insert("SeDelegateSessionUserImpersonatePrivilege", "Obtain an impersonation token for another user in the same session");
        m
    };
}

/// Resolve a well-known privilege LUID low part to its name
pub fn privilege_name(luid_low: u32) -> Option<&'static str> {
    PRIVILEGE_NAMES.get(&luid_low).copied()
}

/// Resolve a privilege name to its user-facing description
pub fn privilege_description(name: &str) -> Option<&'static str> {
    PRIVILEGE_DESCRIPTIONS.get(name).copied()
}
