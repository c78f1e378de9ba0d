//! atlasd - a small, strict, self-hostable world-data CRUD service
//!
//! HTTP CRUD over the classic three-table world schema: countries, cities,
//! country languages. Referential integrity lives in the repositories with
//! the store's constraints as the authoritative backstop; durability comes
//! from an append-only journal replayed at startup.

pub mod cli;
pub mod http_server;
pub mod model;
pub mod observability;
pub mod repo;
pub mod storage;
pub mod validation;
