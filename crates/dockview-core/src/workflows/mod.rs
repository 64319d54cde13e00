//! # Workflows Module
//!
//! Top-level procedures written against the [`Engine`](crate::engine::Engine)
//! trait, so the same steps run in an in-process
//! [`Session`](crate::engine::session::Session) or any other engine.
//!
//! - **Split** ([`split`]) - Copies the complex and divides the copy into receptor
//!   and ligand objects, then styles and frames them.
//! - **Contacts** ([`contacts`]) - Measures ligand–receptor polar contacts and
//!   candidate hydrogen bonds.
//! - **Analyze** ([`analyze`]) - Loads a complex and runs both of the above.

pub mod analyze;
pub mod contacts;
pub mod split;

#[cfg(test)]
pub(crate) mod recording;
