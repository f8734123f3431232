//! `optbind` is a small convenience layer for command line option parsing.
//!
//! Rather than being a full argument parser, `optbind` maps option declarations and
//! their destination variables onto an underlying option recognition engine
//! ([`lexopt`]), converting raw textual arguments into typed values and validating
//! the count of trailing positional arguments.
//!
//! The crate is built from two pieces, composed linearly:
//! * *Bindings*: type-directed converters, each parsing a single raw token into a
//! destination variable captured by mutable reference ([`Value`], [`Flag`],
//! [`FileHandle`], [`NamedFile`], [`List`], [`Custom`]).
//! * *[`OptionParser`]*: holds the declared options, drives a single parse of the
//! argument vector through the engine, collects the positional arguments, and
//! enforces the expected positional count.
//!
//! Tokenization, short/long flag syntax, combined short flags, `--opt=value`
//! splitting, and the `--` separator are all delegated to the engine; `optbind`
//! never re-implements them.
//!
//! # Usage
//! ```
//! use optbind::{Declaration, Expected, Flag, List, OptionParser, Value};
//!
//! let mut name = String::default();
//! let mut ids: Vec<u32> = Vec::default();
//! let mut verbose = false;
//!
//! let mut parser = OptionParser::new("demo");
//! parser
//!     .add_option(
//!         Declaration::new(1, "name").short('n').help("The name to greet."),
//!         Value::new(&mut name),
//!     )
//!     .unwrap();
//! parser
//!     .add_option(
//!         Declaration::new(2, "ids").short('i').help("Comma separated ids."),
//!         List::new(&mut ids),
//!     )
//!     .unwrap();
//! parser
//!     .add_option(Declaration::new(3, "verbose"), Flag::new(&mut verbose))
//!     .unwrap();
//! parser.expect(Expected::Exactly(1));
//!
//! parser
//!     .parse_tokens(&["-n", "Alice", "--ids", "1,2,3", "file.txt"], "FILE", None)
//!     .unwrap();
//!
//! assert_eq!(parser.arguments(), &["file.txt".to_string()]);
//! drop(parser);
//! assert_eq!(name, "Alice");
//! assert_eq!(ids, vec![1, 2, 3]);
//! assert!(!verbose);
//! ```
//!
//! # Failure surface
//! [`OptionParser::parse_tokens`] reports `Err(0)` when help was requested and
//! `Err(1)` on any parse failure; [`OptionParser::parse`] folds this into a
//! boolean (callers translate `false` into a failing process exit).
//!
//! # Features
//! * `tracing_debug`: Emit `tracing` debug events while classifying tokens.
#![deny(missing_docs)]
mod api;
mod constant;
mod model;
mod parser;
pub mod prelude;

pub use api::*;
pub use model::*;
pub use parser::ConfigError;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
