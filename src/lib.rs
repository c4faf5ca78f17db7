//! Shift coverage: which parts of a shift still need someone.
//!
//! A shift owner asks to have all or part of a shift covered. Colleagues
//! take pieces of it. This crate works out what is left:
//!
//! - [`window`] turns loosely-typed date and time fields into windows.
//! - [`gaps`] subtracts covered windows from a base window.
//! - [`coverage`] classifies a shift and derives its display status.
//! - [`selection`] validates the piece someone offers to take.
//! - [`record`] reads backend records with their legacy field names.
//! - [`storage`] and [`roster`] keep a local roster and run the request
//!   lifecycle against it.

pub mod coverage;
pub mod gaps;
pub mod model;
pub mod record;
pub mod roster;
pub mod selection;
pub mod storage;
pub mod window;
