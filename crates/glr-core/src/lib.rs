pub mod config;
pub mod logging;

pub mod arch;
pub mod checksum;
pub mod fetch;
pub mod formula;
pub mod install;
pub mod manifest;
pub mod retry;
pub mod smoke;
pub mod storage;
pub mod url_model;
pub mod verify;
