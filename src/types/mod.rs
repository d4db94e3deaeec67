//! Shared data structures for the well documentation query pipeline:
//! - Fragment / WellIndex / RankedCandidate (retrieval substrate)
//! - BoreholeTag / ResolvedCandidate (wellbore identity resolution)
//! - WellPhysicalModel / OperatingPoint (nodal analysis)

mod fragment;
mod borehole;
mod nodal;

pub use fragment::*;
pub use borehole::*;
pub use nodal::*;
