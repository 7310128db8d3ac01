//! File-backed job sources, the CSV result sink and the command-line surface
//! of the `jobfit` binary.
pub mod cli;
pub mod sink;
pub mod sources;
