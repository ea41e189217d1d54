pub mod byte_order;
pub mod chain;
pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod file_parsers;
pub mod size_policy;
pub mod xtea;
