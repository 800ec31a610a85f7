pub mod file;
pub mod mem;
