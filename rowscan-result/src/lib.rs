//! Error types and result definitions for rowscan.
//!
//! This crate provides the unified error type ([`Error`]) and result type alias
//! ([`Result<T>`]) used throughout the rowscan crates. All operations that could
//! fail return `Result<T>`, and errors propagate with the `?` operator up to the
//! caller of `Scanner::scan`.
//!
//! # Error Categories
//!
//! - **Destination errors**: the destination value cannot be bound at all
//!   ([`Error::NilDestination`], [`Error::NotSettable`], [`Error::UnsupportedShape`],
//!   [`Error::InvalidKeyType`]).
//! - **Binding errors**: a row could not be written into the destination
//!   ([`Error::TypeMismatch`], [`Error::ValueOutOfRange`], [`Error::InvalidDimension`]).
//! - **Empty results**: [`Error::NoRows`] for single-row destinations.
//! - **Cursor errors**: faults reported by the row source ([`Error::Cursor`],
//!   [`Error::Arrow`]).

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
