//! GLSL literal formatting
//!
//! GLSL does not promote integer literals to `float`, so `2` where a float is
//! expected is a compile error. Every scalar written into generated code goes
//! through [`float_literal`].

use glam::{Vec2, Vec3};

/// Format a scalar as a GLSL float literal (`2.0`, `1.5`, `-0.25`).
///
/// Values must be finite; scene parameters are validated before they reach
/// code generation.
pub fn float_literal(value: f32) -> String {
    debug_assert!(value.is_finite(), "non-finite value {value} in shader code");

    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{text}.0")
    }
}

/// Format a vector as a `vec2(x, y)` constructor call
pub fn vec2_literal(v: Vec2) -> String {
    format!("vec2({}, {})", float_literal(v.x), float_literal(v.y))
}

/// Format a vector as a `vec3(x, y, z)` constructor call
pub fn vec3_literal(v: Vec3) -> String {
    format!(
        "vec3({}, {}, {})",
        float_literal(v.x),
        float_literal(v.y),
        float_literal(v.z)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_values_get_fraction() {
        assert_eq!(float_literal(2.0), "2.0");
        assert_eq!(float_literal(0.0), "0.0");
        assert_eq!(float_literal(-2.0), "-2.0");
        assert_eq!(float_literal(1000.0), "1000.0");
    }

    #[test]
    fn test_fractional_values_unchanged() {
        assert_eq!(float_literal(1.5), "1.5");
        assert_eq!(float_literal(0.001), "0.001");
        assert_eq!(float_literal(-0.25), "-0.25");
        assert_eq!(float_literal(1.2), "1.2");
    }

    #[test]
    fn test_vec3_literal() {
        assert_eq!(
            vec3_literal(Vec3::new(1.0, 0.0, -2.0)),
            "vec3(1.0, 0.0, -2.0)"
        );
    }

    #[test]
    fn test_vec2_literal() {
        assert_eq!(vec2_literal(Vec2::new(0.5, 3.0)), "vec2(0.5, 3.0)");
    }
}
