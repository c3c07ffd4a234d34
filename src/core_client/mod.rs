pub mod client;
pub mod conn;
pub mod ops;
pub mod shell;
