//! Infrastructure layer - Storage, crypto, mail and the account controller

pub mod crypto;
pub mod invitation;
pub mod logging;
pub mod mail;
pub mod storage;
pub mod team;
pub mod user;
