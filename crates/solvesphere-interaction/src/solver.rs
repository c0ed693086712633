//! Gemini-backed reasoning client.
//!
//! Implements [`ReasoningClient`] over the REST client: builds the solve
//! and render requests, runs them under the retry policy, and validates
//! the structured payload. Everything above this module sees only
//! [`SolveFailure`] and validated domain types.

use crate::gemini::{
    blocked_reason, first_inline_image, first_text, grounding_links, Content, GeminiClient,
    GenerateContentRequest, GenerationConfig, ImageConfig, InlineDataPayload, Part, Tool,
};
use crate::retry::{run_with_retry, AttemptError, RetryConfig};
use crate::schema::solution_response_schema;
use solvesphere_core::error::{Result as SphereResult, SphereError};
use solvesphere_core::secret::GeminiConfig;
use solvesphere_core::solve::{
    ImageRequest, InlineImage, ReasoningClient, SolutionResult, SolveFailure, SolveRequest,
};
use solvesphere_infrastructure::SecretStorage;
use tokio_util::sync::CancellationToken;

const SYSTEM_INSTRUCTION: &str = "You are an elite reasoning engine for SolveSphere AI. \
    Your goal is to solve problems using a \"First Principles\" approach. \
    Break your answer into: an analysis of the core problem, a numbered step-by-step \
    breakdown of the solution, the final definitive answer, and strategic recommendations \
    for the student or business owner. Also describe a schematic diagram and a realistic \
    visual that would aid understanding, with the key diagram nodes. \
    Maintain a professional, encouraging, and highly structured tone. \
    Respond with a single JSON object conforming to the provided response schema.";

// Lower temperature for more consistent reasoning.
const SOLVE_TEMPERATURE: f64 = 0.4;

const SCHEMATIC_ASPECT_RATIO: &str = "1:1";
const REALISTIC_ASPECT_RATIO: &str = "16:9";

/// [`ReasoningClient`] implementation over the Gemini HTTP API.
///
/// Stateless between calls; the caller owns the cancellation token.
pub struct GeminiReasoningClient {
    client: GeminiClient,
    retry: RetryConfig,
}

impl GeminiReasoningClient {
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            retry: RetryConfig::default(),
        }
    }

    /// Overrides the retry policy after construction.
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Builds a client from a loaded Gemini credential config.
    pub fn from_config(config: GeminiConfig) -> Self {
        let mut client = GeminiClient::new(config.api_key);
        if let Some(model) = config.model_name {
            client = client.with_solve_model(model);
        }
        if let Some(model) = config.image_model_name {
            client = client.with_image_model(model);
        }
        Self::new(client)
    }

    /// Loads configuration from secret.json.
    pub fn try_from_secret() -> SphereResult<Self> {
        let storage = SecretStorage::new()
            .map_err(|e| SphereError::config(format!("Failed to locate secret storage: {}", e)))?;
        let config = storage
            .load()
            .map_err(|e| SphereError::config(format!("Failed to load secret.json: {}", e)))?;
        let gemini = config
            .gemini
            .ok_or_else(|| SphereError::config("Gemini configuration not found in secret.json"))?;
        Ok(Self::from_config(gemini))
    }
}

#[async_trait::async_trait]
impl ReasoningClient for GeminiReasoningClient {
    async fn solve(
        &self,
        request: SolveRequest,
        cancel: &CancellationToken,
    ) -> Result<SolutionResult, SolveFailure> {
        if !request.has_content() {
            return Err(SolveFailure::Unknown(
                "solve request must include text or an image".to_string(),
            ));
        }

        let body = build_solve_body(&request);
        run_with_retry(&self.retry, cancel, || {
            let client = self.client.clone();
            let body = body.clone();
            let cancel = cancel.clone();
            async move {
                let response = client.generate(client.solve_model(), &body, &cancel).await?;

                if let Some(reason) = blocked_reason(&response) {
                    return Err(AttemptError::terminal(SolveFailure::SafetyBlocked(reason)));
                }

                let text = first_text(&response).ok_or_else(|| {
                    AttemptError::terminal(SolveFailure::MalformedResponse(
                        "Gemini returned no text in the response candidates".to_string(),
                    ))
                })?;

                let mut result = parse_solution(&text).map_err(AttemptError::terminal)?;
                result.links = grounding_links(&response);
                Ok(result)
            }
        })
        .await
    }

    async fn render_image(
        &self,
        request: ImageRequest,
        cancel: &CancellationToken,
    ) -> Result<InlineImage, SolveFailure> {
        let body = build_image_body(&request);
        run_with_retry(&self.retry, cancel, || {
            let client = self.client.clone();
            let body = body.clone();
            let cancel = cancel.clone();
            async move {
                let response = client.generate(client.image_model(), &body, &cancel).await?;

                if let Some(reason) = blocked_reason(&response) {
                    return Err(AttemptError::terminal(SolveFailure::SafetyBlocked(reason)));
                }

                first_inline_image(&response).ok_or_else(|| {
                    AttemptError::terminal(SolveFailure::MalformedResponse(
                        "No image data in response".to_string(),
                    ))
                })
            }
        })
        .await
    }
}

/// Builds the generateContent body for one structured solve.
fn build_solve_body(request: &SolveRequest) -> GenerateContentRequest {
    let mut parts = vec![Part::Text {
        text: format!(
            "{}\n\nUser Input: {}",
            request.prompt_template, request.input
        ),
    }];

    if let Some(image) = &request.image {
        parts.push(Part::InlineData {
            inline_data: InlineDataPayload {
                mime_type: image.mime_type.clone(),
                data: image.data.clone(),
            },
        });
    }

    GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts,
        }],
        system_instruction: Some(Content {
            role: "system".to_string(),
            parts: vec![Part::Text {
                text: SYSTEM_INSTRUCTION.to_string(),
            }],
        }),
        generation_config: Some(GenerationConfig {
            temperature: Some(SOLVE_TEMPERATURE),
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(solution_response_schema()),
            image_config: None,
        }),
        tools: request.use_search.then(|| vec![Tool::google_search()]),
    }
}

/// Builds the generateContent body for one image render.
fn build_image_body(request: &ImageRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts: vec![Part::Text {
                text: image_prompt(request),
            }],
        }],
        system_instruction: None,
        generation_config: Some(GenerationConfig {
            temperature: None,
            response_mime_type: None,
            response_schema: None,
            image_config: Some(ImageConfig {
                aspect_ratio: if request.realistic {
                    REALISTIC_ASPECT_RATIO.to_string()
                } else {
                    SCHEMATIC_ASPECT_RATIO.to_string()
                },
            }),
        }),
        tools: None,
    }
}

/// The style-specific natural-language prompt for one render.
fn image_prompt(request: &ImageRequest) -> String {
    if request.realistic {
        format!(
            "Photorealistic, high resolution visual of: {}. Context: {}. \
             Natural lighting, realistic materials and textures.",
            request.description, request.context
        )
    } else {
        format!(
            "High quality, clean, professional diagram or visual for: {}. Context: {}. \
             Flat schematic style, clear labels, minimal color palette.",
            request.description, request.context
        )
    }
}

/// Strips an optional markdown code fence from the model output.
///
/// The remote model is not 100% schema-compliant and sometimes wraps its
/// JSON in ```json fences. Idempotent: already-bare payloads pass through
/// unchanged.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") up to the end of the opening line.
    let Some(newline) = rest.find('\n') else {
        return trimmed;
    };
    let body = &rest[newline + 1..];
    match body.trim_end().strip_suffix("```") {
        Some(inner) => inner.trim(),
        None => trimmed,
    }
}

/// Parses and validates one structured solution payload.
///
/// A payload that does not parse, misses a required field, or carries an
/// empty `steps` sequence is a malformed response, never partial data.
fn parse_solution(text: &str) -> Result<SolutionResult, SolveFailure> {
    let body = strip_code_fences(text);
    let result: SolutionResult = serde_json::from_str(body).map_err(|err| {
        SolveFailure::MalformedResponse(format!("Solution payload violates the schema: {err}"))
    })?;

    if result.steps.is_empty() {
        return Err(SolveFailure::MalformedResponse(
            "Solution payload has no steps".to_string(),
        ));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_PAYLOAD: &str = r#"{
        "analysis": "A linear equation in one unknown.",
        "steps": ["Subtract 3", "Divide by 2"],
        "solution": "x = 2",
        "recommendations": "Practice isolating the variable.",
        "diagramDescription": "Balance scale",
        "realisticDiagramDescription": "Photo of a balance scale",
        "diagramNodes": [{"label": "2x+3", "description": "left side"}]
    }"#;

    #[test]
    fn test_parse_valid_payload() {
        let result = parse_solution(VALID_PAYLOAD).unwrap();
        assert_eq!(result.steps, vec!["Subtract 3", "Divide by 2"]);
        assert_eq!(result.solution, "x = 2");
        assert_eq!(result.diagram_nodes.len(), 1);
    }

    #[test]
    fn test_fenced_and_bare_payloads_parse_identically() {
        let fenced = format!("```json\n{VALID_PAYLOAD}\n```");
        assert_eq!(
            parse_solution(&fenced).unwrap(),
            parse_solution(VALID_PAYLOAD).unwrap()
        );
    }

    #[test]
    fn test_fence_stripping_is_idempotent() {
        let fenced = format!("```json\n{VALID_PAYLOAD}\n```");
        let once = strip_code_fences(&fenced).to_string();
        let twice = strip_code_fences(&once).to_string();
        assert_eq!(once, twice);

        // Bare payloads pass through untouched (modulo outer whitespace).
        assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_fence_without_closing_is_left_alone() {
        let text = "```json\n{\"a\": 1}";
        assert_eq!(strip_code_fences(text), text);
    }

    #[test]
    fn test_missing_required_field_is_malformed() {
        let payload = r#"{"analysis": "a", "steps": ["s"], "solution": "x"}"#;
        assert!(matches!(
            parse_solution(payload),
            Err(SolveFailure::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_empty_steps_is_malformed_not_partial() {
        let payload = r#"{
            "analysis": "a",
            "steps": [],
            "solution": "x",
            "recommendations": "r"
        }"#;
        assert!(matches!(
            parse_solution(payload),
            Err(SolveFailure::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_non_json_is_malformed() {
        assert!(matches!(
            parse_solution("The answer is obviously 42."),
            Err(SolveFailure::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_solve_body_shape() {
        let request = SolveRequest {
            prompt_template: "You are an elite tutor.".to_string(),
            input: "Solve 2x+3=7".to_string(),
            image: Some(InlineImage::new("image/png", "QUJD")),
            use_search: true,
        };
        let body = build_solve_body(&request);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(
            json["contents"][0]["parts"][0]["text"],
            "You are an elite tutor.\n\nUser Input: Solve 2x+3=7"
        );
        assert_eq!(
            json["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/png"
        );
        assert_eq!(json["generationConfig"]["temperature"], 0.4);
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert!(json["generationConfig"]["responseSchema"].is_object());
        assert!(json["tools"][0].get("googleSearch").is_some());
    }

    #[test]
    fn test_solve_body_omits_tools_without_search() {
        let request = SolveRequest {
            prompt_template: "t".to_string(),
            input: "q".to_string(),
            image: None,
            use_search: false,
        };
        let json = serde_json::to_value(build_solve_body(&request)).unwrap();
        assert!(json.get("tools").is_none());
    }

    #[test]
    fn test_image_prompt_styles_differ() {
        let schematic = ImageRequest {
            description: "water cycle".to_string(),
            context: "for a science class".to_string(),
            realistic: false,
        };
        let realistic = ImageRequest {
            realistic: true,
            ..schematic.clone()
        };

        let schematic_prompt = image_prompt(&schematic);
        let realistic_prompt = image_prompt(&realistic);
        assert!(schematic_prompt.contains("professional diagram"));
        assert!(realistic_prompt.contains("Photorealistic"));
        assert!(schematic_prompt.contains("water cycle"));
        assert!(realistic_prompt.contains("for a science class"));

        let schematic_json = serde_json::to_value(build_image_body(&schematic)).unwrap();
        let realistic_json = serde_json::to_value(build_image_body(&realistic)).unwrap();
        assert_eq!(
            schematic_json["generationConfig"]["imageConfig"]["aspectRatio"],
            "1:1"
        );
        assert_eq!(
            realistic_json["generationConfig"]["imageConfig"]["aspectRatio"],
            "16:9"
        );
    }
}
