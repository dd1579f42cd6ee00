pub mod config;
pub mod describe;
pub mod encode;
