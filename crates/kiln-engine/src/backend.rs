//! Shader compilation backends
//!
//! The engine never talks to a graphics API directly. A backend turns the
//! assembled vertex and fragment source into whatever program handle it
//! uses, or reports why it could not.

use std::convert::Infallible;

/// Compiles shader source into a program handle
pub trait ShaderBackend {
    /// Linked program handle
    type Program;

    /// Compile or link failure
    type Error: std::error::Error + Send + Sync + 'static;

    fn compile(&mut self, vertex: &str, fragment: &str) -> Result<Self::Program, Self::Error>;
}

/// Shader source as handed to a [`SourceBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSource {
    pub vertex: String,
    pub fragment: String,
}

/// Headless backend that keeps the assembled source
///
/// Used by the command-line tools to print or save shaders, and by tests to
/// observe what the engine would have uploaded.
#[derive(Debug, Default)]
pub struct SourceBackend {
    compiles: usize,
}

impl SourceBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of programs built so far
    pub fn compiles(&self) -> usize {
        self.compiles
    }
}

impl ShaderBackend for SourceBackend {
    type Program = CompiledSource;
    type Error = Infallible;

    fn compile(&mut self, vertex: &str, fragment: &str) -> Result<CompiledSource, Infallible> {
        self.compiles += 1;
        Ok(CompiledSource {
            vertex: vertex.to_string(),
            fragment: fragment.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_backend_counts_compiles() {
        let mut backend = SourceBackend::new();
        assert_eq!(backend.compiles(), 0);

        let program = backend.compile("vert", "frag").unwrap_or_else(|e| match e {});
        assert_eq!(program.vertex, "vert");
        assert_eq!(program.fragment, "frag");
        assert_eq!(backend.compiles(), 1);
    }
}
