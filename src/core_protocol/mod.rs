pub mod codes;
pub mod command;
pub mod response;
