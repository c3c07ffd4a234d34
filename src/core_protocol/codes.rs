//! FTP reply codes used by this server and client.

// Positive preliminary
pub const FILE_STATUS_OK: u16 = 150;
pub const DATA_ALREADY_OPEN: u16 = 125;

// Positive completion
pub const COMMAND_OK: u16 = 200;
pub const SYSTEM_STATUS: u16 = 211;
pub const NAME_SYSTEM: u16 = 215;
pub const SERVICE_READY: u16 = 220;
pub const SERVICE_CLOSING: u16 = 221;
pub const CLOSING_DATA_CONNECTION: u16 = 226;
pub const ENTERING_PASSIVE_MODE: u16 = 227;
pub const LOGGED_IN: u16 = 230;
pub const FILE_ACTION_OK: u16 = 250;
pub const PATHNAME_CREATED: u16 = 257;

// Positive intermediate
pub const NEED_PASSWORD: u16 = 331;

// Transient negative
pub const CANNOT_OPEN_DATA_CONNECTION: u16 = 425;
pub const TRANSFER_ABORTED: u16 = 426;

// Permanent negative
pub const SYNTAX_ERROR: u16 = 501;
pub const NOT_IMPLEMENTED: u16 = 502;
pub const NOT_LOGGED_IN: u16 = 530;
pub const ACTION_NOT_TAKEN: u16 = 550;
