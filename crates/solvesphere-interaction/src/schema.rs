//! Response schema for the structured solve call.
//!
//! Sent as `generationConfig.responseSchema` so the model returns a JSON
//! payload matching [`solvesphere_core::solve::SolutionResult`]. Field
//! names follow the camelCase wire shape of the domain model.

use serde_json::{json, Value};

/// The schema describing one structured solution payload.
pub(crate) fn solution_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "analysis": {
                "type": "STRING",
                "description": "Brief description of the core problem"
            },
            "steps": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Numbered step-by-step breakdown of the solution"
            },
            "solution": {
                "type": "STRING",
                "description": "The final definitive answer or output"
            },
            "recommendations": {
                "type": "STRING",
                "description": "Strategic advice for the student or business owner"
            },
            "diagramDescription": {
                "type": "STRING",
                "description": "Prompt for a clean schematic diagram of the solution"
            },
            "realisticDiagramDescription": {
                "type": "STRING",
                "description": "Prompt for a photorealistic visualization of the solution"
            },
            "diagramNodes": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "label": { "type": "STRING" },
                        "description": { "type": "STRING" }
                    },
                    "required": ["label", "description"]
                }
            }
        },
        "required": ["analysis", "steps", "solution", "recommendations"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fields_match_the_domain_model() {
        let schema = solution_response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(
            required,
            vec!["analysis", "steps", "solution", "recommendations"]
        );
        for field in required {
            assert!(schema["properties"].get(field).is_some());
        }
    }
}
