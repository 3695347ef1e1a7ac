//! SQL query modules, one per concern. Every function takes a borrowed
//! `Connection`, so callers decide whether it runs on the writer, a
//! reader, or inside an immediate transaction.

pub mod group_crud;
pub mod group_query;
pub mod group_upsert;
pub mod occurrence_ops;
pub mod tag_ops;
pub mod triage_ops;
