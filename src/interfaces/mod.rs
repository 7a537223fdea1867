//! Transport adapters. Only CSV replay is implemented; whatever transport a
//! surrounding application chooses must pass the domain fields verbatim.

pub mod csv;
