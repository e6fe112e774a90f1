//! # Vault Service
//!
//! Async front for [`Vault`](crate::vault::Vault) that runs each conceal /
//! reveal on tokio's blocking pool, with at most `pool_size` running at once.
//! Each running operation holds 128 MiB of Argon2id memory.

pub mod worker;

pub use worker::{default_pool_size, StegoService};
