//! # Prompt Store
//!
//! This crate gives the PromptForce similarity system read access to the
//! prompt collection: a connectivity probe, filtered listings with field
//! projection, and single-document lookups that tolerate both typed and
//! raw id spellings.
//!
//! Documents are never written from here. The similarity index treats
//! the collection as an external source of truth and rebuilds wholesale
//! when it changes.

pub mod document;
pub mod error;
pub mod source;

pub use document::{PromptDocument, PromptFilter, PromptId, Projection};
pub use error::{Result, StoreError};
pub use source::{HttpSource, MemorySource, PromptSource};
