//! CSV adapters used by the command line.

pub mod gift_reader;
pub mod option_writer;
