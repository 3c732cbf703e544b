//! Prompt construction for carousel idea generation

use mayvn_core::models::BrandData;

/// Number of concepts requested from the model and kept from its answer
pub const IDEA_COUNT: usize = 10;

const OUTPUT_INSTRUCTIONS: &str = r#"Instructions (follow exactly):

1. Generate 10 unique, bold and creative Instagram carousel post concepts based on the brand DNA above.

2. Each concept must include:
    - idea: a bold, catchy, high-impact hook that stops people from scrolling.
    - concept: a strategic explanation linking the idea to the brand values, tone and audience.
    - visual_style: a plain description of how the post should look: main subject, background, colors, text and logo placement, effects and overall mood. Not an image generation prompt.

3. Emphasize modern design, future-forward creativity, automation, human-like interaction and brand recognition.

4. Avoid generic or "safe" ideas. Push boundaries.

5. Score every concept from 1 to 10:
    - creativity_score
    - brand_alignment_score
    - engagement_score
    - clarity_score
    - total_score = average of the four scores (decimal)

6. Output a valid JSON array with exactly this structure:

[
  {
    "idea": "...",
    "concept": "...",
    "visual_style": "...",
    "creativity_score": 0,
    "brand_alignment_score": 0,
    "engagement_score": 0,
    "clarity_score": 0,
    "total_score": 0.0
  }
]

IMPORTANT:
- Return ONLY valid JSON.
- Return EXACTLY 10 concepts.
- Do NOT include any text outside the JSON.
- Each concept has exactly one visual_style."#;

fn push_line(lines: &mut Vec<String>, label: &str, value: &str) {
    if !value.trim().is_empty() {
        lines.push(format!("- {}: {}", label, value.trim()));
    }
}

/// Build the generation prompt. Empty brand fields are left out.
pub fn build_prompt(brand: &BrandData) -> String {
    let brand_name = brand.name().unwrap_or("the brand");

    let mut lines = vec![format!("- Name: {}", brand_name)];
    push_line(&mut lines, "Tagline", brand.tagline.as_deref().unwrap_or_default());
    push_line(
        &mut lines,
        "Business",
        brand.business_overview.as_deref().unwrap_or_default(),
    );
    push_line(&mut lines, "Brand Values", &brand.brand_values.join(", "));
    push_line(&mut lines, "Audience", &brand.target_audience.join(", "));
    push_line(&mut lines, "Tone", &brand.tone_of_voice.join(", "));
    push_line(&mut lines, "Colors", &brand.colors.join(", "));
    push_line(&mut lines, "Fonts", &brand.fonts.join(", "));

    format!(
        "You are a creative AI generating Instagram carousel post concepts for the brand {}.\n\n\
         Brand Overview:\n{}\n\n{}",
        brand_name,
        lines.join("\n"),
        OUTPUT_INSTRUCTIONS
    )
}
