//! Generates out-of-line stub definitions for the public member functions
//! of a C++ class header.

pub mod error;
pub mod generator;
pub mod parser;
pub mod types;

pub use error::GenerateError;
pub use generator::{Generated, GeneratorOptions, generate_cpp_from_hpp, generate_with, try_generate};
