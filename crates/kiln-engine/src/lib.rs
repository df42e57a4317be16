//! Kiln Engine - Keeps a compiled shader in step with an editable scene
//!
//! The engine owns a [`SceneBuilder`], the render [`ShaderConfig`] and a
//! [`ShaderBackend`]. Edits go through [`Engine::scene_mut`]; calling
//! [`Engine::refresh`] once per frame rebuilds the program only when the
//! scene revision has moved since the last attempt.
//!
//! A failed compile never tears down the running program: the previous one
//! stays active and the error is returned to the caller.
//!
//! ## Example
//!
//! ```rust
//! use kiln_engine::{Engine, SourceBackend};
//! use glam::Vec3;
//!
//! let mut engine = Engine::new(SourceBackend::new());
//! engine.scene_mut().add_sphere(Vec3::ZERO, 1.0, Vec3::Z)?;
//!
//! assert!(engine.refresh()?);
//! assert!(!engine.refresh()?);
//!
//! let program = engine.program().expect("compiled");
//! assert!(program.fragment.contains("MaterialDist s0"));
//! # Ok::<(), kiln_engine::EngineError>(())
//! ```

mod backend;
mod error;

use tracing::{debug, info, warn};

pub use backend::{CompiledSource, ShaderBackend, SourceBackend};
pub use error::{EngineError, Result};

// Re-export commonly used types from kiln-sdf
pub use kiln_sdf::{NodeId, SceneBuilder, SceneGraph, ShaderConfig};

/// A program together with the scene revision it was built from
struct ActiveProgram<P> {
    program: P,
    revision: u64,
}

/// The main Kiln engine
pub struct Engine<B: ShaderBackend> {
    scene: SceneBuilder,
    config: ShaderConfig,
    backend: B,

    /// Last program that compiled successfully
    active: Option<ActiveProgram<B::Program>>,

    /// Revision of the last compile attempt, successful or not
    attempted: Option<u64>,
}

impl<B: ShaderBackend> Engine<B> {
    /// Create an engine with an empty scene and the default config
    pub fn new(backend: B) -> Self {
        Self::with_scene(SceneBuilder::new(), ShaderConfig::default(), backend)
    }

    /// Create an engine around an existing scene
    pub fn with_scene(scene: SceneBuilder, config: ShaderConfig, backend: B) -> Self {
        Self {
            scene,
            config,
            backend,
            active: None,
            attempted: None,
        }
    }

    // ========================================================================
    // Scene Access
    // ========================================================================

    pub fn scene(&self) -> &SceneBuilder {
        &self.scene
    }

    /// Mutable access to the scene. Edits are picked up by the next [`Engine::refresh`].
    pub fn scene_mut(&mut self) -> &mut SceneBuilder {
        &mut self.scene
    }

    pub fn config(&self) -> &ShaderConfig {
        &self.config
    }

    /// Replace the render config and force a rebuild on the next refresh
    pub fn set_config(&mut self, config: ShaderConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        self.invalidate();
        Ok(())
    }

    /// Forget the last attempt so the next refresh recompiles unconditionally
    pub fn invalidate(&mut self) {
        self.attempted = None;
    }

    // ========================================================================
    // Program Lifecycle
    // ========================================================================

    /// Whether the scene has changed since the last compile attempt
    pub fn is_stale(&self) -> bool {
        self.attempted != Some(self.scene.graph().revision())
    }

    /// Rebuild the program if the scene changed
    ///
    /// Returns `Ok(true)` when a new program was installed and `Ok(false)`
    /// when nothing needed doing. A revision that failed to compile is not
    /// retried until the scene changes again.
    pub fn refresh(&mut self) -> Result<bool> {
        let revision = self.scene.graph().revision();
        if !self.is_stale() {
            return Ok(false);
        }
        self.attempted = Some(revision);

        let fragment = self.fragment_shader()?;
        debug!(revision, bytes = fragment.len(), "Assembled fragment shader");

        match self.backend.compile(kiln_sdf::vertex_shader(), &fragment) {
            Ok(program) => {
                info!(revision, nodes = self.scene.graph().len(), "Shader program rebuilt");
                self.active = Some(ActiveProgram { program, revision });
                Ok(true)
            }
            Err(e) => {
                warn!(
                    revision,
                    active = ?self.active_revision(),
                    error = %e,
                    "Shader compile failed, keeping previous program"
                );
                Err(EngineError::Compile(e.to_string()))
            }
        }
    }

    /// Assemble the complete fragment shader for the current scene
    pub fn fragment_shader(&self) -> Result<String> {
        Ok(kiln_sdf::build_fragment_shader(
            self.scene.graph(),
            self.scene.root(),
            &self.config,
        )?)
    }

    /// The program currently in use, if any compile has succeeded
    pub fn program(&self) -> Option<&B::Program> {
        self.active.as_ref().map(|a| &a.program)
    }

    /// Scene revision the active program was built from
    pub fn active_revision(&self) -> Option<u64> {
        self.active.as_ref().map(|a| a.revision)
    }

    // ========================================================================
    // Access to underlying components
    // ========================================================================

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: ShaderBackend + Default> Default for Engine<B> {
    fn default() -> Self {
        Self::new(B::default())
    }
}
