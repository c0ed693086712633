//! Built-in process module catalog.
//!
//! Pure data. The presentation layer filters by [`AppMode`] and resolves
//! icon names itself.

use super::model::{AppMode, ModuleKind, ProcessModule};

const TEXT_PLACEHOLDER: &str = "Input problem statement or paste documentation...";
const VISUAL_PLACEHOLDER: &str = "Describe the educational or brand visual you need...";

/// Returns the official built-in process modules.
pub fn builtin_modules() -> Vec<ProcessModule> {
    vec![
        // Student modules
        ProcessModule {
            id: "academic-solver".to_string(),
            title: "Math & Science Solver".to_string(),
            description: "Step-by-step solutions for equations and scientific concepts."
                .to_string(),
            icon: "Calculator".to_string(),
            prompt_template: "You are an elite tutor. Solve the following problem \
                              step-by-step. If an image is provided, analyze it first."
                .to_string(),
            mode: AppMode::Student,
            kind: ModuleKind::Text,
            placeholder: TEXT_PLACEHOLDER.to_string(),
        },
        ProcessModule {
            id: "study-diagram".to_string(),
            title: "Diagram Creator".to_string(),
            description: "Generate educational diagrams and visual study aids.".to_string(),
            icon: "ImageIcon".to_string(),
            prompt_template: "Create a clear, educational diagram or visual representation \
                              of the following concept."
                .to_string(),
            mode: AppMode::Student,
            kind: ModuleKind::Visual,
            placeholder: VISUAL_PLACEHOLDER.to_string(),
        },
        ProcessModule {
            id: "essay-architect".to_string(),
            title: "Essay Architect".to_string(),
            description: "Generate structured outlines and thesis statements.".to_string(),
            icon: "PenTool".to_string(),
            prompt_template: "Create a comprehensive essay outline including a strong \
                              thesis and key arguments."
                .to_string(),
            mode: AppMode::Student,
            kind: ModuleKind::Text,
            placeholder: TEXT_PLACEHOLDER.to_string(),
        },
        // Business modules
        ProcessModule {
            id: "brand-visualizer".to_string(),
            title: "Brand Visualizer".to_string(),
            description: "Generate logos, mockups, and visual brand assets.".to_string(),
            icon: "ImageIcon".to_string(),
            prompt_template: "Generate a professional brand asset or mockup based on \
                              these business requirements."
                .to_string(),
            mode: AppMode::Business,
            kind: ModuleKind::Visual,
            placeholder: VISUAL_PLACEHOLDER.to_string(),
        },
        ProcessModule {
            id: "marketing-strategy".to_string(),
            title: "Marketing Strategy".to_string(),
            description: "Develop multi-channel marketing plans.".to_string(),
            icon: "Target".to_string(),
            prompt_template: "Create a 3-month growth plan including digital channels \
                              and local engagement."
                .to_string(),
            mode: AppMode::Business,
            kind: ModuleKind::Text,
            placeholder: TEXT_PLACEHOLDER.to_string(),
        },
        ProcessModule {
            id: "swot-analysis".to_string(),
            title: "SWOT Analysis".to_string(),
            description: "Identify strengths, weaknesses, opportunities, and threats."
                .to_string(),
            icon: "TrendingUp".to_string(),
            prompt_template: "Perform a detailed SWOT analysis for this business idea."
                .to_string(),
            mode: AppMode::Business,
            kind: ModuleKind::Text,
            placeholder: TEXT_PLACEHOLDER.to_string(),
        },
    ]
}

/// Finds a module by id.
pub fn find_module(id: &str) -> Option<ProcessModule> {
    builtin_modules().into_iter().find(|m| m.id == id)
}

/// Returns the modules for one mode, catalog order preserved.
pub fn modules_for_mode(mode: AppMode) -> Vec<ProcessModule> {
    builtin_modules()
        .into_iter()
        .filter(|m| m.mode == mode)
        .collect()
}

/// The first catalog entry for a mode, used as the selection default.
pub fn default_module(mode: AppMode) -> ProcessModule {
    modules_for_mode(mode)
        .into_iter()
        .next()
        .expect("catalog has at least one module per mode")
}
