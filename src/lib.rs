#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![warn(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown, clippy::module_name_repetitions)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
//!
//! ## Note
//!
//! Most structures in this library are marked with
//! ```ignore
//! #[non_exhaustive]
//! ```
//! to indicate that they are likely to grow new fields as the correction
//! pipeline evolves.

pub mod backends;
#[cfg(feature = "server")]
pub mod cache;
#[cfg(feature = "server")]
pub mod chunker;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod languages;
pub mod pipeline;
pub mod prompt;
#[cfg(feature = "server")]
pub mod server;
pub mod validator;
