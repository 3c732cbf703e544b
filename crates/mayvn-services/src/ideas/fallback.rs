//! Canned ideas returned when generation fails

use mayvn_core::models::{BrandData, Idea};

const FALLBACK_COUNT: usize = 3;

/// Three generic concepts personalised with the brand name, first value and
/// first audience
pub fn fallback_ideas(brand: &BrandData) -> Vec<Idea> {
    let brand_name = brand.name().unwrap_or("your brand");
    let primary_value = brand
        .brand_values
        .first()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("brand value");
    let audience = brand
        .target_audience
        .first()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("audience");

    (1..=FALLBACK_COUNT)
        .map(|n| Idea {
            idea: format!("Fallback carousel idea {} for {}", n, brand_name),
            concept: format!(
                "Highlight {} for {} with a clear CTA",
                primary_value, audience
            ),
            visual_style: "Clean, on-brand colors with simple typography and product focus."
                .to_string(),
            creativity_score: 5.0,
            brand_alignment_score: 6.0,
            engagement_score: 5.0,
            clarity_score: 6.0,
            total_score: 5.5,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_personalises_with_brand() {
        let brand = BrandData {
            brand_name: Some("Acme Brand".to_string()),
            brand_values: vec!["trust".to_string()],
            target_audience: vec!["marketers".to_string()],
            ..Default::default()
        };
        let ideas = fallback_ideas(&brand);
        assert_eq!(ideas.len(), 3);
        assert_eq!(ideas[2].idea, "Fallback carousel idea 3 for Acme Brand");
        assert_eq!(ideas[0].concept, "Highlight trust for marketers with a clear CTA");
        assert_eq!(ideas[0].total_score, 5.5);
    }

    #[test]
    fn test_fallback_defaults() {
        let ideas = fallback_ideas(&BrandData::default());
        assert_eq!(ideas[0].idea, "Fallback carousel idea 1 for your brand");
        assert_eq!(
            ideas[0].concept,
            "Highlight brand value for audience with a clear CTA"
        );
    }
}
