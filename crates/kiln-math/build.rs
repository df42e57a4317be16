//! Build script for kiln-math
//!
//! Reads formula specifications from TOML files and generates:
//! - Rust implementations
//! - GLSL shader code
//! - Test cases
//! - Documentation

use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;

// ============================================================================
// TOML Schema Definitions
// ============================================================================

#[derive(Debug, Deserialize)]
struct FormulaSpec {
    formula: FormulaInfo,
    codegen: CodegenTemplates,
}

#[derive(Debug, Deserialize)]
struct FormulaInfo {
    name: String,
    category: String,
    description: String,
    verified_date: String,
    params: Vec<ParamInfo>,
    returns: ReturnInfo,
    steps: Vec<Step>,
    #[serde(default)]
    pitfalls: Vec<Pitfall>,
    tests: Vec<TestCase>,
}

#[derive(Debug, Deserialize)]
struct ParamInfo {
    name: String,
    #[serde(rename = "type")]
    param_type: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ReturnInfo {
    #[serde(rename = "type")]
    return_type: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct Step {
    name: String,
    expr: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct Pitfall {
    name: String,
    wrong: String,
    right: String,
    explanation: String,
}

/// A test vector. `args` are flattened scalar inputs, substituted into the
/// test template as `{arg0}`, `{arg1}`, ...
#[derive(Debug, Deserialize)]
struct TestCase {
    name: String,
    args: Vec<f64>,
    expected: f64,
    tolerance: f64,
    description: String,
}

#[derive(Debug, Deserialize)]
struct CodegenTemplates {
    rust: TemplateInfo,
    glsl: TemplateInfo,
    test: TemplateInfo,
}

#[derive(Debug, Deserialize)]
struct TemplateInfo {
    template: String,
}

// ============================================================================
// Code Generation
// ============================================================================

fn generate_step_docs(steps: &[Step]) -> String {
    steps
        .iter()
        .map(|s| format!("/// - `{}` = {} : {}", s.name, s.expr, s.description))
        .collect::<Vec<_>>()
        .join("\n")
}

fn generate_pitfall_docs(pitfalls: &[Pitfall]) -> String {
    if pitfalls.is_empty() {
        return "/// - none recorded".to_string();
    }
    pitfalls
        .iter()
        .map(|p| format!("/// - **{}**: Use `{}` not `{}`", p.name, p.right, p.wrong))
        .collect::<Vec<_>>()
        .join("\n")
}

fn generate_rust_code(spec: &FormulaSpec) -> String {
    let formula = &spec.formula;
    let template = &spec.codegen.rust.template;

    template
        .replace("{name}", &formula.name)
        .replace("{description}", &formula.description)
        .replace("{verified_date}", &formula.verified_date)
        .replace("{step_docs}", &generate_step_docs(&formula.steps))
        .replace("{pitfall_docs}", &generate_pitfall_docs(&formula.pitfalls))
}

fn generate_glsl_code(spec: &FormulaSpec) -> String {
    let formula = &spec.formula;
    let template = &spec.codegen.glsl.template;

    template
        .replace("{name}", &formula.name)
        .replace("{description}", &formula.description)
        .replace("{verified_date}", &formula.verified_date)
}

fn generate_test_code(spec: &FormulaSpec) -> String {
    let formula = &spec.formula;
    let template = &spec.codegen.test.template;

    formula
        .tests
        .iter()
        .map(|test| {
            let mut code = template
                .replace("{name}", &formula.name)
                .replace("{test_name}", &test.name)
                .replace("{expected}", &format!("{:.6}_f32", test.expected))
                .replace("{tolerance}", &format!("{:.6}_f32", test.tolerance));

            // Highest index first so `{arg1}` never clobbers `{arg10}`
            for (i, arg) in test.args.iter().enumerate().rev() {
                code = code.replace(&format!("{{arg{}}}", i), &format!("{:.6}_f32", arg));
            }
            code
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn generate_markdown_docs(spec: &FormulaSpec) -> String {
    let formula = &spec.formula;

    let mut doc = String::new();

    doc.push_str(&format!("# {}\n\n", formula.name));
    doc.push_str(&format!("{}\n\n", formula.description));
    doc.push_str(&format!("**Category:** {}\n\n", formula.category));
    doc.push_str(&format!("**Verified:** {}\n\n", formula.verified_date));

    doc.push_str("## Parameters\n\n");
    for param in &formula.params {
        doc.push_str(&format!(
            "- `{}` ({}): {}\n",
            param.name, param.param_type, param.description
        ));
    }

    doc.push_str("\n## Returns\n\n");
    doc.push_str(&format!(
        "- `{}`: {}\n\n",
        formula.returns.return_type, formula.returns.description
    ));

    doc.push_str("## Formula Steps\n\n");
    for step in &formula.steps {
        doc.push_str(&format!("1. **{}** = `{}`\n", step.name, step.expr));
        doc.push_str(&format!("   - {}\n\n", step.description));
    }

    if !formula.pitfalls.is_empty() {
        doc.push_str("## Pitfalls\n\n");
        for pitfall in &formula.pitfalls {
            doc.push_str(&format!("### {}\n\n", pitfall.name));
            doc.push_str(&format!("- **Wrong:** `{}`\n", pitfall.wrong));
            doc.push_str(&format!("- **Right:** `{}`\n\n", pitfall.right));
            doc.push_str(&format!("{}\n\n", pitfall.explanation.trim()));
        }
    }

    doc.push_str("## Test Vectors\n\n");
    doc.push_str("| Test | Args | Expected | Description |\n");
    doc.push_str("|------|------|----------|-------------|\n");
    for test in &formula.tests {
        let args = test
            .args
            .iter()
            .map(|a| format!("{:.2}", a))
            .collect::<Vec<_>>()
            .join(", ");
        doc.push_str(&format!(
            "| {} | ({}) | {:.3} | {} |\n",
            test.name, args, test.expected, test.description
        ));
    }

    doc
}

// ============================================================================
// Main Build Script
// ============================================================================

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let out_path = Path::new(&out_dir);

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let formulas_dir = Path::new(&manifest_dir).join("formulas");

    let mut rust_code = String::new();
    let mut glsl_code = String::new();
    let mut test_code = String::new();
    let mut docs = String::new();

    rust_code.push_str("// AUTO-GENERATED by build.rs from formula specs\n");
    rust_code.push_str("// DO NOT EDIT - modify the TOML files in formulas/ instead\n\n");
    rust_code.push_str("use glam::Vec3;\n\n");

    glsl_code.push_str("// AUTO-GENERATED by build.rs from formula specs\n");
    glsl_code.push_str("// DO NOT EDIT - modify the TOML files in formulas/ instead\n\n");

    test_code.push_str("// AUTO-GENERATED by build.rs from formula specs\n");
    test_code.push_str("// DO NOT EDIT - modify the TOML files in formulas/ instead\n\n");
    test_code.push_str("use glam::Vec3;\n");
    test_code.push_str("use crate::*;\n\n");

    docs.push_str("# Kiln Math Formula Reference\n\n");
    docs.push_str("*Auto-generated from formula specifications*\n\n");
    docs.push_str("---\n\n");

    if formulas_dir.exists() {
        let mut entries: Vec<_> = fs::read_dir(&formulas_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "toml"))
            .collect();

        // Sorted so the generated GLSL is byte-identical between builds
        entries.sort_by_key(|e| e.path());

        for entry in entries {
            let path = entry.path();
            println!("cargo:rerun-if-changed={}", path.display());

            let content = fs::read_to_string(&path).unwrap();
            let spec: FormulaSpec = toml::from_str(&content).unwrap_or_else(|e| {
                panic!("Failed to parse {}: {}", path.display(), e);
            });

            rust_code.push_str(&generate_rust_code(&spec));
            rust_code.push_str("\n\n");

            glsl_code.push_str(&generate_glsl_code(&spec));
            glsl_code.push_str("\n\n");

            test_code.push_str(&generate_test_code(&spec));
            test_code.push_str("\n\n");

            docs.push_str(&generate_markdown_docs(&spec));
            docs.push_str("\n---\n\n");
        }
    }

    fs::write(out_path.join("formulas.rs"), rust_code).unwrap();
    fs::write(out_path.join("formulas.glsl"), glsl_code).unwrap();
    fs::write(out_path.join("tests.rs"), test_code).unwrap();
    fs::write(out_path.join("FORMULAS.md"), docs).unwrap();

    println!("cargo:rerun-if-changed=formulas");
}
