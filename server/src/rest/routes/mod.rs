pub mod auth;
pub mod health;
pub mod snaps;
pub mod storage;
