//! Shader assembly
//!
//! The fixed ray-marching template lives in `shaders/` with three marker
//! comments. Assembly replaces each marker exactly once: render constants
//! from [`ShaderConfig`], the generated formula library from `kiln-math`,
//! and the scene fragment inside `map`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::glsl_gen::generate_fragment;
use crate::graph::SceneGraph;
use crate::literal::{float_literal, vec3_literal};
use crate::node::NodeId;

pub const CONFIG_MARKER: &str = "// CONFIG_PLACEHOLDER";
pub const FORMULAS_MARKER: &str = "// FORMULAS_PLACEHOLDER";
pub const SCENE_MARKER: &str = "// SCENE_FRAGMENT_PLACEHOLDER";

/// Render constants baked into the fragment shader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    /// Ray-march iteration limit
    pub max_steps: u32,
    /// Distance at which a ray is considered to have escaped
    pub max_distance: f32,
    /// Distance below which a ray counts as a hit
    pub hit_epsilon: f32,
    /// Central difference step for surface normals
    pub normal_epsilon: f32,
    /// Direction towards the light (normalized in the shader)
    pub light_direction: [f32; 3],
    /// Light color (RGB, 0-1)
    pub light_color: [f32; 3],
    /// Background and fog color (RGB, 0-1)
    pub background_color: [f32; 3],
    pub gamma: f32,
    /// Fog amount per unit of ray distance
    pub fog_density: f32,
    /// Samples per pixel axis (1 = no anti-aliasing)
    pub supersample: u32,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            max_steps: 256,
            max_distance: 1000.0,
            hit_epsilon: 0.001,
            normal_epsilon: 0.0001,
            light_direction: [1.0, 2.0, -1.0],
            light_color: [1.0, 1.0, 1.0],
            background_color: [1.0, 1.0, 1.0],
            gamma: 2.2,
            fog_density: 0.02,
            supersample: 2,
        }
    }
}

impl ShaderConfig {
    /// Reject values that would produce a broken or non-terminating shader
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("max_distance", self.max_distance),
            ("hit_epsilon", self.hit_epsilon),
            ("normal_epsilon", self.normal_epsilon),
            ("gamma", self.gamma),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidParameter(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }

        if !(self.fog_density.is_finite() && self.fog_density >= 0.0) {
            return Err(Error::InvalidParameter(format!(
                "fog_density must be finite and non-negative, got {}",
                self.fog_density
            )));
        }
        if self.max_steps == 0 {
            return Err(Error::InvalidParameter("max_steps must be at least 1".into()));
        }
        if !(1..=4).contains(&self.supersample) {
            return Err(Error::InvalidParameter(format!(
                "supersample must be between 1 and 4, got {}",
                self.supersample
            )));
        }

        let colors = [
            ("light_direction", self.light_direction),
            ("light_color", self.light_color),
            ("background_color", self.background_color),
        ];
        for (name, value) in colors {
            if value.iter().any(|c| !c.is_finite()) {
                return Err(Error::InvalidParameter(format!("{name} must be finite")));
            }
        }
        if self.light_direction.iter().all(|&c| c == 0.0) {
            return Err(Error::InvalidParameter(
                "light_direction must not be the zero vector".into(),
            ));
        }
        Ok(())
    }

    /// Render the config as GLSL constant declarations
    pub fn to_glsl(&self) -> String {
        let mut code = String::new();
        code.push_str(&format!("const int MAX_STEPS = {};\n", self.max_steps));
        code.push_str(&format!(
            "const float MAX_DIST = {};\n",
            float_literal(self.max_distance)
        ));
        code.push_str(&format!(
            "const float HIT_EPSILON = {};\n",
            float_literal(self.hit_epsilon)
        ));
        code.push_str(&format!(
            "const float NORMAL_EPSILON = {};\n",
            float_literal(self.normal_epsilon)
        ));
        code.push_str(&format!(
            "const vec3 LIGHT_DIRECTION = {};\n",
            vec3_literal(self.light_direction.into())
        ));
        code.push_str(&format!(
            "const vec3 LIGHT_COLOR = {};\n",
            vec3_literal(self.light_color.into())
        ));
        code.push_str(&format!(
            "const vec3 BACKGROUND_COLOR = {};\n",
            vec3_literal(self.background_color.into())
        ));
        code.push_str(&format!("const float GAMMA = {};\n", float_literal(self.gamma)));
        code.push_str(&format!(
            "const float FOG_DENSITY = {};\n",
            float_literal(self.fog_density)
        ));
        code.push_str(&format!("const int SUPERSAMPLE = {};\n", self.supersample));
        code
    }
}

/// Get the fragment shader template with its markers still in place
pub fn get_fragment_template() -> &'static str {
    include_str!("shaders/raymarch.frag")
}

/// Get the full-screen quad vertex shader
pub fn vertex_shader() -> &'static str {
    include_str!("shaders/raymarch.vert")
}

/// Replace `marker` in `template` with `code`
pub fn splice(template: &str, marker: &'static str, code: &str) -> Result<String> {
    let Some(pos) = template.find(marker) else {
        return Err(Error::MissingSplicePoint(marker));
    };

    let mut result = String::with_capacity(template.len() + code.len());
    result.push_str(&template[..pos]);
    result.push_str(code);
    result.push_str(&template[pos + marker.len()..]);
    Ok(result)
}

/// Build the complete fragment shader for the tree rooted at `root`
pub fn build_fragment_shader(
    graph: &SceneGraph,
    root: NodeId,
    config: &ShaderConfig,
) -> Result<String> {
    config.validate()?;
    let fragment = generate_fragment(graph, root)?;

    let shader = splice(get_fragment_template(), CONFIG_MARKER, &config.to_glsl())?;
    let shader = splice(&shader, FORMULAS_MARKER, kiln_math::get_glsl_code())?;
    splice(&shader, SCENE_MARKER, &fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SceneBuilder;
    use glam::Vec3;

    #[test]
    fn test_template_has_all_markers() {
        let template = get_fragment_template();
        for marker in [CONFIG_MARKER, FORMULAS_MARKER, SCENE_MARKER] {
            assert_eq!(template.matches(marker).count(), 1, "{marker}");
        }
    }

    #[test]
    fn test_splice_replaces_marker() {
        let out = splice("a\n// X\nb", "// X", "middle").unwrap();
        assert_eq!(out, "a\nmiddle\nb");
    }

    #[test]
    fn test_splice_missing_marker_is_error() {
        let err = splice("no marker here", SCENE_MARKER, "code").unwrap_err();
        assert_eq!(err, Error::MissingSplicePoint(SCENE_MARKER));
    }

    #[test]
    fn test_default_config_glsl() {
        let glsl = ShaderConfig::default().to_glsl();
        assert!(glsl.contains("const int MAX_STEPS = 256;"));
        assert!(glsl.contains("const float MAX_DIST = 1000.0;"));
        assert!(glsl.contains("const float HIT_EPSILON = 0.001;"));
        assert!(glsl.contains("const vec3 LIGHT_DIRECTION = vec3(1.0, 2.0, -1.0);"));
        assert!(glsl.contains("const float GAMMA = 2.2;"));
    }

    #[test]
    fn test_config_validation() {
        assert!(ShaderConfig::default().validate().is_ok());

        let bad = ShaderConfig {
            max_steps: 0,
            ..ShaderConfig::default()
        };
        assert!(bad.validate().is_err());

        let bad = ShaderConfig {
            hit_epsilon: f32::NAN,
            ..ShaderConfig::default()
        };
        assert!(bad.validate().is_err());

        let bad = ShaderConfig {
            light_direction: [0.0; 3],
            ..ShaderConfig::default()
        };
        assert!(bad.validate().is_err());

        let bad = ShaderConfig {
            supersample: 9,
            ..ShaderConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config: ShaderConfig =
            serde_json::from_str(r#"{ "max_steps": 64, "gamma": 1.0 }"#).unwrap();
        assert_eq!(config.max_steps, 64);
        assert!((config.gamma - 1.0).abs() < f32::EPSILON);
        assert_eq!(config.supersample, ShaderConfig::default().supersample);
    }

    #[test]
    fn test_build_fragment_shader() {
        let mut builder = SceneBuilder::new();
        builder
            .add_sphere(Vec3::ZERO, 1.0, Vec3::new(0.0, 0.0, 1.0))
            .unwrap();

        let shader =
            build_fragment_shader(builder.graph(), builder.root(), &ShaderConfig::default())
                .unwrap();

        assert!(shader.starts_with("#version 300 es"));
        assert!(!shader.contains("PLACEHOLDER"));
        assert!(shader.contains("float sd_sphere(vec3 p, float r)"));
        assert!(shader.contains("float op_smooth_min(float a, float b, float k)"));
        assert!(shader.contains("MaterialDist s0 = MaterialDist(vec3(0.0, 0.0, 1.0), true,"));

        // Constants and formulas are declared before `map` uses them
        let map_at = shader.find("MaterialDist map(vec3 p)").unwrap();
        assert!(shader.find("const float MAX_DIST").unwrap() < map_at);
        assert!(shader.find("float sd_box(vec3 p, vec3 b)").unwrap() < map_at);
        assert!(shader.find("MaterialDist s0").unwrap() > map_at);
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let builder = SceneBuilder::new();
        let config = ShaderConfig {
            gamma: -1.0,
            ..ShaderConfig::default()
        };
        assert!(build_fragment_shader(builder.graph(), builder.root(), &config).is_err());
    }

    #[test]
    fn test_vertex_shader() {
        assert!(vertex_shader().contains("gl_Position = a_position;"));
    }
}
