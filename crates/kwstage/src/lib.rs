//! Sandboxed staging of keyword recognition model payloads.
//!
//! A model payload arrives either as a raw `kws.table` byte stream or as a
//! zip bundle containing one. Staging classifies the payload, confines a
//! per-name directory under the system temp root, extracts or copies the
//! payload into it without letting hostile entry names escape, and hands
//! back the path a native recognition engine can open.
//!
//! # Architecture
//!
//! - `detect.rs` - payload classification (zip magic sniff)
//! - `name.rs` - logical name validation
//! - `sandbox.rs` - temp-root confined staging directories
//! - `extract.rs` - archive extraction and raw payload writes
//! - `stage.rs` - staging entry points

pub use detect::sniff_archive;
pub use error::{Error, Result};
pub use name::validate_name;
pub use stage::{StagedModel, stage_from_file, stage_from_reader};

/// The one output file every staged model must contain.
pub const TABLE_FILE_NAME: &str = "kws.table";

mod detect;
mod error;
mod extract;
mod name;
mod sandbox;
mod stage;
