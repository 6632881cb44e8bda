//! I/O for the fitness log: slot storage, draft mirroring, config, files.

pub mod config;
pub mod draft;
pub mod init;
pub mod kv;
pub mod storage;
pub mod transfer;
