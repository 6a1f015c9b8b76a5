//! Trajectory and summary output. Kept as a thin text-writing layer; no
//! serde/JSON library is used here since downstream tooling is expected to
//! consume these files as plain text, not round-trip them back in.

pub mod csv;
pub mod json;
