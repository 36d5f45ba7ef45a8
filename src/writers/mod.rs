pub mod json_writer;

pub use json_writer::RegionWriter;
