use std::fmt;

/// Conditions that stop a whole header from being turned into stubs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateError {
    /// The header contains no `class <Name>` declaration.
    NoClassFound,
}

impl GenerateError {
    /// The error as a line of C++ to hand back instead of a generated file.
    pub fn as_comment(&self) -> String {
        format!("// {self}\n")
    }
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::NoClassFound => write!(f, "No class declaration found."),
        }
    }
}

impl std::error::Error for GenerateError {}
