pub mod import_legacy;
pub mod initdb;
pub mod serve;

pub use import_legacy::import_legacy;
pub use initdb::init_database;
pub use serve::serve;
