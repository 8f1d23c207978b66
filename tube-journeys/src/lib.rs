//! Longest tube journeys avoiding a set of letters.
//!
//! Builds a graph of stations and line connections from the TfL API,
//! keeps the stations whose names share no letter with a banned word, and
//! finds every longest journey through what is left.

pub mod batch;
pub mod cache;
pub mod graph;
pub mod report;
pub mod tfl;
