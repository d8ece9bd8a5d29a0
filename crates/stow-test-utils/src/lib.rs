//! Instrumented element types for Stow container testing.
//!
//! Containers that manage element lifetimes by hand can fail in two quiet
//! ways: leaking a value (never dropping it) and dropping one twice. The
//! fixtures here make both observable:
//!
//! - [`DropLedger`] counts constructions and drops of [`Tracked`] values
//!   and flags any value dropped more than once.
//! - [`FragileClone`] panics on its N-th clone, for driving failure paths
//!   through copy-based operations.
//! - [`fail_after`] and [`panic_after`] build constructor closures that
//!   succeed a fixed number of times and then fail.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    fail_after, panic_after, DropLedger, FragileClone, FragileFamily, Refused, Tracked,
};
