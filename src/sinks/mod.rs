//! Report persistence.
mod format;
mod writers;


pub use writers::write_report;
