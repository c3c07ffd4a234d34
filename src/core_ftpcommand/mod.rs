// One module per implemented FTP verb.
pub mod cdup;
pub mod cwd;
pub mod feat;
pub mod list;
pub mod pass;
pub mod pwd;
pub mod quit;
pub mod retr;
pub mod stor;
pub mod syst;
pub mod type_;
pub mod user;

// The dispatch table and shared helpers live here.
pub mod handlers;
pub mod utils;
