//! Prompt style variations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const BASE_INSTRUCTION: &str = "You are an expert AI prompt engineer specializing in creating highly detailed and accurate prompts for AI image generation. Analyze this image carefully and create a comprehensive prompt that would recreate this image with maximum fidelity.

CRITICAL REQUIREMENTS:
1. Be extremely specific about visual details
2. Include precise color descriptions (use specific color names, not just \"blue\" but \"deep navy blue\" or \"cerulean blue\")
3. Describe lighting conditions in detail (soft diffused light, harsh directional lighting, golden hour, etc.)
4. Specify camera angles and composition (close-up, wide shot, bird's eye view, etc.)
5. Include texture descriptions (smooth, rough, glossy, matte, etc.)
6. Mention artistic style or photographic technique if applicable
7. Describe the mood and atmosphere
8. Include any relevant technical details

FORMAT: Write as a single, flowing prompt without bullet points or sections.";

const CREATIVE_FOCUS: &str = "
CREATIVE FOCUS: Emphasize the artistic and imaginative elements. Describe:
- The emotional impact and mood of the image
- Creative composition techniques used
- Unique visual elements that make it stand out
- Color harmony and artistic choices
- Any surreal or imaginative aspects
- The overall aesthetic appeal and artistic vision

Create a prompt that captures the creative essence and would inspire an AI to generate something equally artistic and visually compelling.";

const TECHNICAL_FOCUS: &str = "
TECHNICAL FOCUS: Provide precise technical specifications. Describe:
- Camera settings equivalent (aperture, focal length, depth of field)
- Lighting setup (key light, fill light, rim light positions)
- Composition rules applied (rule of thirds, leading lines, symmetry)
- Image quality aspects (sharpness, contrast, saturation)
- Technical photographic techniques used
- Post-processing effects visible
- Resolution and clarity characteristics

Create a prompt that would help an AI generate technically excellent and professionally composed imagery.";

const ARTISTIC_FOCUS: &str = "
ARTISTIC FOCUS: Analyze the artistic style and technique. Describe:
- Specific art movement or style (impressionist, minimalist, baroque, etc.)
- Brushwork or technique characteristics (if applicable)
- Color palette and color theory application
- Artistic composition and visual flow
- Medium characteristics (oil painting, watercolor, digital art, etc.)
- Artistic influences or references
- Texture and surface qualities

Create a prompt that captures the artistic methodology and would guide an AI to replicate the artistic approach.";

const COMMERCIAL_FOCUS: &str = "
COMMERCIAL FOCUS: Emphasize marketable and professional aspects. Describe:
- Professional presentation quality
- Brand-appropriate visual elements
- Target audience appeal
- Commercial photography techniques
- Product placement and styling (if applicable)
- Professional lighting and composition
- Market-ready aesthetic qualities
- Commercial viability factors

Create a prompt suitable for generating professional, market-ready imagery that would work in commercial contexts.";

/// Style the generated prompt is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptStyle {
    #[default]
    Creative,
    Technical,
    Artistic,
    Commercial,
}

impl PromptStyle {
    /// All styles in display order.
    pub fn all() -> [PromptStyle; 4] {
        [
            PromptStyle::Creative,
            PromptStyle::Technical,
            PromptStyle::Artistic,
            PromptStyle::Commercial,
        ]
    }

    /// Parse a style name, falling back to [`PromptStyle::Creative`].
    pub fn parse_lossy(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptStyle::Creative => "creative",
            PromptStyle::Technical => "technical",
            PromptStyle::Artistic => "artistic",
            PromptStyle::Commercial => "commercial",
        }
    }

    /// One-line summary for listings.
    pub fn description(&self) -> &'static str {
        match self {
            PromptStyle::Creative => "Focus on artistic elements, mood, and creative interpretation",
            PromptStyle::Technical => "Detailed technical specifications, lighting, and composition",
            PromptStyle::Artistic => "Art style, technique, and visual aesthetics",
            PromptStyle::Commercial => "Marketing-focused, brand-suitable descriptions",
        }
    }

    /// Full instruction sent alongside the image.
    pub fn instruction(&self) -> String {
        let focus = match self {
            PromptStyle::Creative => CREATIVE_FOCUS,
            PromptStyle::Technical => TECHNICAL_FOCUS,
            PromptStyle::Artistic => ARTISTIC_FOCUS,
            PromptStyle::Commercial => COMMERCIAL_FOCUS,
        };
        format!("{}{}", BASE_INSTRUCTION, focus)
    }
}

impl fmt::Display for PromptStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "creative" => Ok(PromptStyle::Creative),
            "technical" => Ok(PromptStyle::Technical),
            "artistic" => Ok(PromptStyle::Artistic),
            "commercial" => Ok(PromptStyle::Commercial),
            other => Err(format!("Unknown prompt style: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("technical".parse::<PromptStyle>(), Ok(PromptStyle::Technical));
        assert_eq!(" Artistic ".parse::<PromptStyle>(), Ok(PromptStyle::Artistic));
        assert!("noir".parse::<PromptStyle>().is_err());
    }

    #[test]
    fn test_parse_lossy_defaults_to_creative() {
        assert_eq!(PromptStyle::parse_lossy("noir"), PromptStyle::Creative);
        assert_eq!(PromptStyle::parse_lossy("commercial"), PromptStyle::Commercial);
    }

    #[test]
    fn test_instruction_combines_base_and_focus() {
        let text = PromptStyle::Commercial.instruction();
        assert!(text.starts_with("You are an expert AI prompt engineer"));
        assert!(text.contains("COMMERCIAL FOCUS"));
        assert!(!text.contains("CREATIVE FOCUS"));
    }

    #[test]
    fn test_display_roundtrip() {
        for style in PromptStyle::all() {
            assert_eq!(style.to_string().parse::<PromptStyle>(), Ok(style));
            assert!(!style.description().is_empty());
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&PromptStyle::Technical).unwrap();
        assert_eq!(json, "\"technical\"");
    }
}
