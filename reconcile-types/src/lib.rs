//! Data model for the asset reconciliation scheduler.
//!
//! This crate is deliberately thin: it defines the vocabulary the reconciliation core is built
//! from — [`AssetKey`], [`RunId`], [`Cursor`] and its [`CursorCodec`], and [`ParentUpdateStatus`]
//! — without any knowledge of the graph, the event log, or the decision rule that consumes them.
//! `reconcile_core` depends on this crate the way `timely` depends on `timely_container`.

mod asset_key;
mod cursor;
mod run_id;
mod status;

pub use asset_key::AssetKey;
pub use cursor::{Cursor, CursorCodec, CursorDecodeError};
pub use run_id::RunId;
pub use status::ParentUpdateStatus;
