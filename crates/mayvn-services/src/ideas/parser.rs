//! Repair and validation of model output into scored ideas
//!
//! Small models wrap JSON in markdown fences, add commentary, leave
//! placeholder scores, trailing commas or unquoted keys. The text is cleaned,
//! then parsed in up to three attempts: the array span as-is, the array span
//! after syntax repair, and the whole cleaned text.

use mayvn_core::models::Idea;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use super::prompt::IDEA_COUNT;
use super::IdeaGenerationError;

const DEFAULT_SCORE: f64 = 5.0;
const MIN_SCORE: f64 = 1.0;
const MAX_SCORE: f64 = 10.0;

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static regex must compile")
}

static JSON_FENCE: LazyLock<Regex> = LazyLock::new(|| regex(r"```json\n?"));
static FENCE: LazyLock<Regex> = LazyLock::new(|| regex(r"```\n?"));
static LEADING_PROSE: LazyLock<Regex> = LazyLock::new(|| regex(r"^[^{\[]*"));
static TRAILING_PROSE: LazyLock<Regex> = LazyLock::new(|| regex(r"[^}\]]*$"));
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| regex(r#":\s*"?X"?\s*([,}])"#));
static TRAILING_COMMA_OBJECT: LazyLock<Regex> = LazyLock::new(|| regex(r",\s*\}"));
static TRAILING_COMMA_ARRAY: LazyLock<Regex> = LazyLock::new(|| regex(r",\s*\]"));
static BARE_KEY: LazyLock<Regex> = LazyLock::new(|| regex(r"([{,]\s*)(\w+)(\s*):"));
static NUMERIC_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| regex(r"^\s*[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?"));

/// Strip fences and surrounding prose, and replace `X` placeholder scores
fn clean(text: &str) -> String {
    let text = text.trim();
    let text = JSON_FENCE.replace_all(text, "");
    let text = FENCE.replace_all(&text, "");
    let text = LEADING_PROSE.replace(&text, "");
    let text = TRAILING_PROSE.replace(&text, "");
    PLACEHOLDER.replace_all(&text, ": 5${1}").into_owned()
}

/// Outermost `[...]` span
fn array_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (start < end).then(|| &text[start..=end])
}

fn repair(json: &str) -> String {
    let json = TRAILING_COMMA_OBJECT.replace_all(json, "}");
    let json = TRAILING_COMMA_ARRAY.replace_all(&json, "]");
    BARE_KEY
        .replace_all(&json, "${1}\"${2}\"${3}:")
        .into_owned()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// First alias holding a truthy value
fn lookup<'a>(item: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| item.get(*key))
        .find(|value| is_truthy(value))
}

fn text_field(item: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    let text = match lookup(item, keys)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Numeric score clamped to [1, 10]; numeric strings use their leading number
fn score_value(value: &Value) -> Option<f64> {
    let score = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => NUMERIC_PREFIX.find(s)?.as_str().trim().parse().ok()?,
        _ => return None,
    };
    score
        .is_finite()
        .then(|| score.clamp(MIN_SCORE, MAX_SCORE))
}

fn score(item: &Map<String, Value>, keys: &[&str]) -> f64 {
    lookup(item, keys)
        .and_then(score_value)
        .unwrap_or(DEFAULT_SCORE)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn normalize(item: &Map<String, Value>) -> Option<Idea> {
    let idea = text_field(item, &["idea", "Idea"])?;
    let concept = text_field(item, &["concept", "Concept"])?;
    let visual_style = text_field(item, &["visual_style", "visualStyle"])?;

    let creativity_score = score(item, &["creativity_score", "creativityScore"]);
    let brand_alignment_score = score(item, &["brand_alignment_score", "brandAlignmentScore"]);
    let engagement_score = score(item, &["engagement_score", "engagementScore"]);
    let clarity_score = score(item, &["clarity_score", "clarityScore"]);

    let mean = (creativity_score + brand_alignment_score + engagement_score + clarity_score) / 4.0;
    let total_score = lookup(item, &["total_score", "totalScore"])
        .and_then(score_value)
        .unwrap_or(mean);

    Some(Idea {
        idea,
        concept,
        visual_style,
        creativity_score,
        brand_alignment_score,
        engagement_score,
        clarity_score,
        total_score: round_one_decimal(total_score),
    })
}

fn ideas_from_json(json: &str) -> Option<Vec<Idea>> {
    let value: Value = serde_json::from_str(json).ok()?;
    let ideas: Vec<Idea> = value
        .as_array()?
        .iter()
        .filter_map(Value::as_object)
        .filter_map(normalize)
        .take(IDEA_COUNT)
        .collect();
    (!ideas.is_empty()).then_some(ideas)
}

/// Parse model output into at most ten valid ideas.
/// Output without a single usable idea is an error.
pub fn parse_ideas(text: &str) -> Result<Vec<Idea>, IdeaGenerationError> {
    let cleaned = clean(text);

    let mut attempts = Vec::with_capacity(3);
    if let Some(span) = array_span(&cleaned) {
        attempts.push(span.to_string());
        attempts.push(repair(span));
    }
    attempts.push(cleaned.clone());

    for (attempt, candidate) in attempts.iter().enumerate() {
        if let Some(ideas) = ideas_from_json(candidate) {
            tracing::debug!(attempt = attempt + 1, count = ideas.len(), "Parsed model ideas");
            return Ok(ideas);
        }
    }

    let preview: String = text.chars().take(200).collect();
    tracing::warn!(preview = %preview, "Model output could not be parsed as ideas");
    Err(IdeaGenerationError::Parse(
        "no valid idea objects in model output".to_string(),
    ))
}
