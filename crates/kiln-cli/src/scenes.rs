//! Built-in demo scenes

use clap::ValueEnum;
use glam::Vec3;
use kiln_sdf::{Result, SceneBuilder};

const RED: Vec3 = Vec3::new(1.0, 0.0, 0.0);
const GREEN: Vec3 = Vec3::new(0.0, 1.0, 0.0);
const BLUE: Vec3 = Vec3::new(0.0, 0.0, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Demo {
    /// Three unit spheres under the root union
    #[default]
    Spheres,
    /// Two spheres and a box melted together by a smooth union
    Blend,
    /// A sphere next to a smooth union of a sphere and a box
    Nested,
}

impl Demo {
    pub fn build(self) -> Result<SceneBuilder> {
        match self {
            Demo::Spheres => spheres(),
            Demo::Blend => blend(),
            Demo::Nested => nested(),
        }
    }
}

fn spheres() -> Result<SceneBuilder> {
    let mut scene = SceneBuilder::new();
    scene.add_sphere(Vec3::ZERO, 1.0, BLUE)?;
    scene.add_sphere(Vec3::new(0.0, 1.2, 0.0), 1.0, RED)?;
    scene.add_sphere(Vec3::new(1.2, 0.0, 0.0), 1.0, GREEN)?;
    Ok(scene)
}

fn blend() -> Result<SceneBuilder> {
    let mut scene = SceneBuilder::new();
    let op = scene.add_smooth_union(0.5)?;
    let front = scene.add_sphere(Vec3::new(0.0, 0.0, 1.0), 1.0, RED)?;
    let middle = scene.add_box(Vec3::ZERO, Vec3::ONE, GREEN)?;
    let back = scene.add_sphere(Vec3::new(0.0, 0.0, -1.0), 1.0, BLUE)?;
    scene.add_children(op, &[front, middle, back])?;
    Ok(scene)
}

fn nested() -> Result<SceneBuilder> {
    let mut scene = SceneBuilder::new();
    scene.add_sphere(Vec3::ZERO, 1.0, BLUE)?;
    let op = scene.add_smooth_union(0.5)?;
    let sphere = scene.add_sphere(Vec3::new(1.0, 0.0, 0.0), 1.0, RED)?;
    let cube = scene.add_box(Vec3::new(0.0, 1.0, 0.0), Vec3::ONE, GREEN)?;
    scene.add_children(op, &[sphere, cube])?;
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_demos_build() {
        for demo in Demo::value_variants() {
            let scene = demo.build().unwrap();
            let fragment = scene.generate_fragment();
            assert!(fragment.ends_with("    res.dist = min(res.dist, op0.dist);\n"));
        }
    }

    #[test]
    fn test_spheres_demo() {
        let scene = Demo::Spheres.build().unwrap();
        let graph = scene.graph();
        assert_eq!(graph.children(scene.root()).unwrap().len(), 3);

        let fragment = scene.generate_fragment();
        assert!(fragment.contains(
            "MaterialDist s1 = MaterialDist(vec3(1.0, 0.0, 0.0), true, \
             sd_sphere(p - vec3(0.0, 1.2, 0.0), 1.0));"
        ));
    }

    #[test]
    fn test_blend_demo_moves_shapes_under_operation() {
        let scene = Demo::Blend.build().unwrap();
        let graph = scene.graph();
        let op = graph.find("op1").unwrap();

        assert_eq!(graph.children(scene.root()).unwrap(), &[op]);
        assert_eq!(graph.children(op).unwrap().len(), 3);
        assert!(
            scene
                .generate_fragment()
                .contains("op1.dist = op_smooth_min(op1.dist, s2.dist, 0.5);")
        );
    }

    #[test]
    fn test_nested_demo_order() {
        let fragment = Demo::Nested.build().unwrap().generate_fragment();
        let order: Vec<_> = ["op0", "s0", "op1", "s1", "s2"]
            .iter()
            .map(|name| fragment.find(&format!("MaterialDist {name} =")).unwrap())
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
    }
}
