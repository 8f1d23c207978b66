//! Station graph: model, assembly, filtering and search.
//!
//! A [`Graph`] holds every station and the directed, per-line adjacencies
//! between them. It is built once from the API by [`GraphAssembler`],
//! narrowed with [`Graph::filter`] (typically by a [`LetterMask`]
//! predicate), and searched with [`longest_paths`].

mod assemble;
mod letters;
mod model;
mod search;
mod station;

pub use assemble::{AssemblerConfig, GraphAssembler};
pub use letters::{LetterMask, passes};
pub use model::{Adjacencies, Adjacency, Graph};
pub use search::{Path, longest_paths};
pub use station::{Station, StationId};
