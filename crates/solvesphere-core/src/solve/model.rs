//! Structured solve output domain models.
//!
//! [`SolutionResult`] mirrors the JSON schema the remote model is asked to
//! fill. Field names serialize in camelCase so the model payload, the stored
//! history files, and the domain model share one shape.

use serde::{Deserialize, Serialize};

/// A citation returned alongside a search-augmented response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingLink {
    pub uri: String,
    pub title: String,
}

/// A single node of the generated concept diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramNode {
    pub label: String,
    pub description: String,
}

/// An inline image payload (mime type plus base64 data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl InlineImage {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Renders the image as a `data:` URI for presentation layers.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// The structured result of one solve call.
///
/// Produced atomically by a single remote request. The optional image fields
/// are filled in later by an independent render call and patched into the
/// stored result.
///
/// `analysis`, `steps`, `solution`, and `recommendations` are required in the
/// model payload; a response missing any of them fails schema validation and
/// is treated as a malformed response, never as partial data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionResult {
    /// The model's understanding of the core problem.
    pub analysis: String,
    /// Ordered solution steps. Non-empty after a successful solve.
    pub steps: Vec<String>,
    /// The final definitive answer.
    pub solution: String,
    /// Strategic advice for the student or business owner.
    pub recommendations: String,
    /// Prompt text for the schematic diagram render.
    #[serde(default)]
    pub diagram_description: String,
    /// Prompt text for the photorealistic render.
    #[serde(default)]
    pub realistic_diagram_description: String,
    /// Labeled nodes of the concept diagram.
    #[serde(default)]
    pub diagram_nodes: Vec<DiagramNode>,
    /// Schematic visual, rendered lazily after the solve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual: Option<InlineImage>,
    /// Photorealistic visual, rendered lazily after the solve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realistic_visual: Option<InlineImage>,
    /// Grounding citations from search-augmented responses.
    #[serde(default)]
    pub links: Vec<GroundingLink>,
}

impl SolutionResult {
    /// Returns the visual slot for the requested style.
    pub fn visual_for(&self, realistic: bool) -> Option<&InlineImage> {
        if realistic {
            self.realistic_visual.as_ref()
        } else {
            self.visual.as_ref()
        }
    }

    /// Installs a rendered visual into the slot for the requested style.
    pub fn set_visual(&mut self, realistic: bool, image: InlineImage) {
        if realistic {
            self.realistic_visual = Some(image);
        } else {
            self.visual = Some(image);
        }
    }

    /// Returns the description used to prompt the render for a style.
    ///
    /// Falls back to the schematic description when the model did not
    /// provide a separate realistic one.
    pub fn render_description(&self, realistic: bool) -> &str {
        if realistic && !self.realistic_diagram_description.is_empty() {
            &self.realistic_diagram_description
        } else {
            &self.diagram_description
        }
    }
}
