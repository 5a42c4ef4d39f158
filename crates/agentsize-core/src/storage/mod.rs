//! # Storage Module
//!
//! Durable rules configuration and named scenarios using redb.
//!
//! Uses the redb embedded database for:
//! - ACID transactions (a config save is all-or-nothing)
//! - Crash safety (copy-on-write B-trees)
//! - MVCC (concurrent readers, single writer)

mod redb_store;

pub use redb_store::ConfigStore;
