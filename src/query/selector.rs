//! Selectors identifying which native information class a query requests

/// Raw handle value, portable across the FFI boundary and test doubles
pub type RawHandle = isize;

/// System information classes passed to NtQuerySystemInformation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum SystemClass {
    BasicInformation = 0,
    ProcessInformation = 5,
    HandleInformation = 16,
    ExtendedHandleInformation = 64,
}

impl SystemClass {
    pub fn class_id(self) -> u32 {
        self as u32
    }
}

/// Object information classes passed to NtQueryObject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ObjectClass {
    NameInformation = 1,
    TypeInformation = 2,
    /// All registered object types; queried with a null subject handle
    TypesInformation = 3,
}

impl ObjectClass {
    pub fn class_id(self) -> u32 {
        self as u32
    }
}

/// Token information classes passed to NtQueryInformationToken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum TokenClass {
    User = 1,
    Groups = 2,
    Privileges = 3,
    Owner = 4,
    PrimaryGroup = 5,
    Source = 7,
    Statistics = 10,
    SessionId = 12,
    Origin = 17,
    IntegrityLevel = 25,
}

impl TokenClass {
    pub fn class_id(self) -> u32 {
        self as u32
    }
}

/// Identifies which category of information a query requests, plus the
/// subject handle where the class needs one. Immutable, supplied by the
/// caller, interpreted by the `NativeQuery` implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoSelector {
    /// System-wide class, no subject handle
    System(SystemClass),
    /// Object manager class against a specific handle (or all types)
    Object {
        handle: Option<RawHandle>,
        class: ObjectClass,
    },
    /// Token class against an opened token handle
    Token {
        token: RawHandle,
        class: TokenClass,
    },
}

impl InfoSelector {
    /// Name of the native entry point this selector routes to, used in
    /// error and advisory messages
    pub fn api_name(&self) -> &'static str {
        match self {
            InfoSelector::System(_) => "NtQuerySystemInformation",
            InfoSelector::Object { .. } => "NtQueryObject",
            InfoSelector::Token { .. } => "NtQueryInformationToken",
        }
    }
}
