pub mod analyze;
pub mod config;
pub mod init;
pub mod inspect;
pub mod sweep;
pub mod targets;
pub mod zeta;
