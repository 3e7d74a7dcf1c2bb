//! High-level inspection operations
//!
//! Each operation composes handle acquisition, the growable query loop,
//! and the matching decoder. Everything is generic over the native seams
//! (`NativeQuery`, `HandleProvider`, `AccountResolver`) so the full call
//! paths, including handle open/close balance, run against test doubles.

use crate::config::BufferConfig;
use crate::core::types::{Advisory, QueryResult};
use crate::layout::PointerWidth;
use crate::object::{
    decode_extended_handles, decode_object_types, filter_handles, HandleFilter, HandleRecord,
    ObjectTypeTable,
};
use crate::query::{
    query_growable, GrowableBuffer, HandleGuard, HandleProvider, InfoSelector, NativeQuery,
    SystemClass, TokenClass,
};
use crate::security::{AccountInfo, Sid};
use crate::token::{
    decode_groups, decode_integrity_level, decode_origin, decode_privileges, decode_session_id,
    decode_single_sid, decode_source, decode_statistics, decode_user, IntegrityLabel, TokenGroup,
    TokenPrivilege, TokenSource, TokenStatistics, TokenUser,
};
use tracing::warn;

/// Maps a binary SID to an account name, domain, and use kind.
///
/// Enrichment only: a failed lookup surfaces as an `Advisory`, never as
/// an error on the enumeration that requested it.
pub trait AccountResolver {
    fn lookup_account(&self, sid: &Sid) -> Result<AccountInfo, Advisory>;
}

/// A token group joined with its resolved account, where resolution
/// succeeded
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ResolvedGroup {
    pub group: TokenGroup,
    pub account: Option<AccountInfo>,
}

/// Retrieve one variable-length system information class
pub fn system_information<N: NativeQuery>(
    native: &mut N,
    class: SystemClass,
    initial_capacity: usize,
    max_capacity: usize,
) -> QueryResult<GrowableBuffer> {
    query_growable(
        native,
        &InfoSelector::System(class),
        initial_capacity,
        max_capacity,
    )
}

/// Enumerate every object type the kernel has registered
pub fn object_types<N: NativeQuery>(
    native: &mut N,
    width: PointerWidth,
    buffers: &BufferConfig,
) -> QueryResult<ObjectTypeTable> {
    let selector = InfoSelector::Object {
        handle: None,
        class: crate::query::ObjectClass::TypesInformation,
    };
    let buffer = query_growable(native, &selector, buffers.object_types, buffers.max_capacity)?;
    decode_object_types(&buffer.view(), width)
}

/// Enumerate the system handle table, resolving type names through
/// `types` and applying `filter` after decode
pub fn handle_table<N: NativeQuery>(
    native: &mut N,
    width: PointerWidth,
    buffers: &BufferConfig,
    types: &ObjectTypeTable,
    filter: &HandleFilter,
) -> QueryResult<Vec<HandleRecord>> {
    let buffer = system_information(
        native,
        SystemClass::ExtendedHandleInformation,
        buffers.handle_table,
        buffers.max_capacity,
    )?;
    let records = decode_extended_handles(&buffer.view(), width, types)?;
    Ok(filter_handles(records, filter))
}

/// Open the process and its token, run the query, release both handles
/// in reverse order whatever the outcome
fn query_token<N, P>(
    native: &mut N,
    provider: &P,
    pid: u32,
    class: TokenClass,
    buffers: &BufferConfig,
) -> QueryResult<GrowableBuffer>
where
    N: NativeQuery,
    P: HandleProvider + ?Sized,
{
    let process = HandleGuard::new(provider, provider.open_process(pid)?);
    let token = HandleGuard::new(provider, provider.open_process_token(process.raw())?);
    let selector = InfoSelector::Token {
        token: token.raw(),
        class,
    };
    query_growable(
        native,
        &selector,
        buffers.token_information,
        buffers.max_capacity,
    )
}

pub fn token_user<N: NativeQuery, P: HandleProvider + ?Sized>(
    native: &mut N,
    provider: &P,
    pid: u32,
    width: PointerWidth,
    buffers: &BufferConfig,
) -> QueryResult<TokenUser> {
    let buffer = query_token(native, provider, pid, TokenClass::User, buffers)?;
    decode_user(&buffer.view(), width, buffer.base_address())
}

pub fn token_groups<N: NativeQuery, P: HandleProvider + ?Sized>(
    native: &mut N,
    provider: &P,
    pid: u32,
    width: PointerWidth,
    buffers: &BufferConfig,
) -> QueryResult<Vec<TokenGroup>> {
    let buffer = query_token(native, provider, pid, TokenClass::Groups, buffers)?;
    decode_groups(&buffer.view(), width, buffer.base_address())
}

pub fn token_privileges<N: NativeQuery, P: HandleProvider + ?Sized>(
    native: &mut N,
    provider: &P,
    pid: u32,
    buffers: &BufferConfig,
) -> QueryResult<Vec<TokenPrivilege>> {
    let buffer = query_token(native, provider, pid, TokenClass::Privileges, buffers)?;
    decode_privileges(&buffer.view())
}

pub fn token_owner<N: NativeQuery, P: HandleProvider + ?Sized>(
    native: &mut N,
    provider: &P,
    pid: u32,
    width: PointerWidth,
    buffers: &BufferConfig,
) -> QueryResult<Sid> {
    let buffer = query_token(native, provider, pid, TokenClass::Owner, buffers)?;
    decode_single_sid(&buffer.view(), width, buffer.base_address())
}

pub fn token_primary_group<N: NativeQuery, P: HandleProvider + ?Sized>(
    native: &mut N,
    provider: &P,
    pid: u32,
    width: PointerWidth,
    buffers: &BufferConfig,
) -> QueryResult<Sid> {
    let buffer = query_token(native, provider, pid, TokenClass::PrimaryGroup, buffers)?;
    decode_single_sid(&buffer.view(), width, buffer.base_address())
}

pub fn token_statistics<N: NativeQuery, P: HandleProvider + ?Sized>(
    native: &mut N,
    provider: &P,
    pid: u32,
    buffers: &BufferConfig,
) -> QueryResult<TokenStatistics> {
    let buffer = query_token(native, provider, pid, TokenClass::Statistics, buffers)?;
    decode_statistics(&buffer.view())
}

pub fn token_session_id<N: NativeQuery, P: HandleProvider + ?Sized>(
    native: &mut N,
    provider: &P,
    pid: u32,
    buffers: &BufferConfig,
) -> QueryResult<u32> {
    let buffer = query_token(native, provider, pid, TokenClass::SessionId, buffers)?;
    decode_session_id(&buffer.view())
}

pub fn token_origin<N: NativeQuery, P: HandleProvider + ?Sized>(
    native: &mut N,
    provider: &P,
    pid: u32,
    buffers: &BufferConfig,
) -> QueryResult<u64> {
    let buffer = query_token(native, provider, pid, TokenClass::Origin, buffers)?;
    decode_origin(&buffer.view())
}

pub fn token_source<N: NativeQuery, P: HandleProvider + ?Sized>(
    native: &mut N,
    provider: &P,
    pid: u32,
    buffers: &BufferConfig,
) -> QueryResult<TokenSource> {
    let buffer = query_token(native, provider, pid, TokenClass::Source, buffers)?;
    decode_source(&buffer.view())
}

pub fn token_integrity_level<N: NativeQuery, P: HandleProvider + ?Sized>(
    native: &mut N,
    provider: &P,
    pid: u32,
    width: PointerWidth,
    buffers: &BufferConfig,
) -> QueryResult<IntegrityLabel> {
    let buffer = query_token(native, provider, pid, TokenClass::IntegrityLevel, buffers)?;
    decode_integrity_level(&buffer.view(), width, buffer.base_address())
}

/// Join each group with its resolved account. Lookup failures become
/// advisories; the group itself always survives.
pub fn resolve_group_accounts<R: AccountResolver + ?Sized>(
    resolver: &R,
    groups: Vec<TokenGroup>,
) -> (Vec<ResolvedGroup>, Vec<Advisory>) {
    let mut resolved = Vec::with_capacity(groups.len());
    let mut advisories = Vec::new();
    for group in groups {
        let account = match resolver.lookup_account(&group.sid) {
            Ok(account) => Some(account),
            Err(advisory) => {
                warn!(sid = %group.sid, %advisory, "account lookup failed");
                advisories.push(advisory);
                None
            }
        };
        resolved.push(ResolvedGroup { group, account });
    }
    (resolved, advisories)
}
