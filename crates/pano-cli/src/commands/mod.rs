//! Command implementations for pano-cli

pub mod configure;
pub mod connection;
pub mod field;
pub mod init;
pub mod list;
pub mod scan;
pub mod sync;
pub mod validate;

pub use configure::run_configure;
pub use connection::run_connection;
pub use field::run_field_scaffold;
pub use init::{choose_company, run_init};
pub use list::{run_list_companies, run_list_connections};
pub use scan::run_scan;
pub use sync::{run_pull, run_push};
pub use validate::run_validate;
