//! Engine recompilation behaviour against a backend that can be told to fail

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use glam::Vec3;
use kiln_engine::{Engine, EngineError, ShaderBackend};

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct LinkError(String);

/// Backend that accepts sources until `fail_next` is set
#[derive(Default)]
struct FlakyBackend {
    fail_next: bool,
    attempts: usize,
}

impl ShaderBackend for FlakyBackend {
    type Program = String;
    type Error = LinkError;

    fn compile(&mut self, _vertex: &str, fragment: &str) -> Result<String, LinkError> {
        self.attempts += 1;
        if std::mem::take(&mut self.fail_next) {
            return Err(LinkError("0:1: syntax error".into()));
        }
        Ok(fragment.to_string())
    }
}

#[test]
fn failed_compile_keeps_previous_program() {
    let mut engine = Engine::new(FlakyBackend::default());
    engine
        .scene_mut()
        .add_sphere(Vec3::ZERO, 1.0, Vec3::ONE)
        .unwrap();
    assert!(engine.refresh().unwrap());
    let good_revision = engine.active_revision().unwrap();
    let good_program = engine.program().unwrap().clone();

    engine
        .scene_mut()
        .add_sphere(Vec3::X, 0.5, Vec3::ONE)
        .unwrap();
    engine.backend_mut().fail_next = true;

    let err = engine.refresh().unwrap_err();
    assert!(matches!(err, EngineError::Compile(ref msg) if msg.contains("syntax error")));
    assert_eq!(engine.program(), Some(&good_program));
    assert_eq!(engine.active_revision(), Some(good_revision));
}

#[test]
fn failed_revision_is_not_retried_until_edited() {
    let mut engine = Engine::new(FlakyBackend::default());
    engine.backend_mut().fail_next = true;

    assert!(engine.refresh().is_err());
    assert!(engine.program().is_none());
    assert!(!engine.refresh().unwrap());
    assert_eq!(engine.backend().attempts, 1);

    let root = engine.scene().root();
    let s0 = engine
        .scene_mut()
        .add_box(Vec3::ZERO, Vec3::ONE, Vec3::Y)
        .unwrap();
    engine.scene_mut().remove_child(root, s0).unwrap();

    assert!(engine.refresh().unwrap());
    assert_eq!(engine.backend().attempts, 2);
    assert!(!engine.program().unwrap().contains("MaterialDist s0"));
}

#[test]
fn rejected_edits_do_not_trigger_rebuild() {
    let mut engine = Engine::new(FlakyBackend::default());
    let op = engine.scene_mut().add_union();
    engine.refresh().unwrap();

    assert!(engine.scene_mut().add_children(op, &[op]).is_err());
    assert!(engine.scene_mut().add_sphere(Vec3::ZERO, -1.0, Vec3::ONE).is_err());

    assert!(!engine.is_stale());
    assert!(!engine.refresh().unwrap());
    assert_eq!(engine.backend().attempts, 1);
}

#[test]
fn rebuilt_program_tracks_edits() {
    let mut engine = Engine::new(FlakyBackend::default());
    let blend = engine.scene_mut().add_smooth_union(0.5).unwrap();
    let a = engine
        .scene_mut()
        .add_sphere(Vec3::new(0.0, 0.0, 1.0), 1.0, Vec3::X)
        .unwrap();
    engine.scene_mut().add_children(blend, &[a]).unwrap();
    engine.refresh().unwrap();
    assert!(engine.program().unwrap().contains("op_smooth_min(op1.dist, s0.dist, 0.5)"));

    engine
        .scene_mut()
        .graph_mut()
        .set_smoothness(blend, 0.25)
        .unwrap();
    assert!(engine.refresh().unwrap());
    assert!(engine.program().unwrap().contains("op_smooth_min(op1.dist, s0.dist, 0.25)"));
}
