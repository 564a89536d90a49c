//! Lenient field deserializers for knowledge-base records.
//!
//! List fields accept either an array or a delimited string (`"a|b"` or
//! `"a,b"`). Dosha effects accept either a table or the compact
//! `"vata:-,pitta:-,kapha:+"` form. Unparseable pieces are dropped.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use super::DoshaEffect;

#[derive(Deserialize)]
#[serde(untagged)]
enum ListRepr {
    List(Vec<String>),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EffectsRepr {
    Table(BTreeMap<String, serde_json::Value>),
    Text(String),
}

/// Deserialize a list that may be written as a delimited string.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match ListRepr::deserialize(deserializer)? {
        ListRepr::List(items) => items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        ListRepr::Text(text) => split_list(&text),
    };
    Ok(items)
}

/// Split a delimited string into trimmed, non-empty items.
///
/// A JSON array literal is honoured first; otherwise `|` is the separator
/// when present, else `,`.
pub fn split_list(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    if text.starts_with('[') {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(text) {
            return items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
    }
    let sep = if text.contains('|') { '|' } else { ',' };
    text.split(sep)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Deserialize a dosha-effect map from a table or compact string.
pub fn dosha_effects<'de, D>(deserializer: D) -> Result<BTreeMap<String, DoshaEffect>, D::Error>
where
    D: Deserializer<'de>,
{
    let effects = match EffectsRepr::deserialize(deserializer)? {
        EffectsRepr::Table(table) => table
            .into_iter()
            .filter_map(|(dosha, value)| {
                let effect = value.as_str()?.parse().ok()?;
                let dosha = dosha.trim().to_lowercase();
                (!dosha.is_empty()).then_some((dosha, effect))
            })
            .collect(),
        EffectsRepr::Text(text) => parse_dosha_effects(&text),
    };
    Ok(effects)
}

/// Parse `"vata:-,pitta:-,kapha:+"` (or `|`-separated) into an effect map.
pub fn parse_dosha_effects(text: &str) -> BTreeMap<String, DoshaEffect> {
    let sep = if text.contains('|') { '|' } else { ',' };
    text.split(sep)
        .filter_map(|pair| {
            let (dosha, effect) = pair.split_once(':')?;
            let dosha = dosha.trim().to_lowercase();
            if dosha.is_empty() {
                return None;
            }
            let effect = effect.parse().ok()?;
            Some((dosha, effect))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_prefers_pipe() {
        assert_eq!(split_list("protein|digestion"), vec!["protein", "digestion"]);
        assert_eq!(split_list("a, b ,,c"), vec!["a", "b", "c"]);
        assert!(split_list("   ").is_empty());
    }

    #[test]
    fn split_accepts_json_array() {
        assert_eq!(split_list(r#"["light", " soft "]"#), vec!["light", "soft"]);
    }

    #[test]
    fn compact_effects() {
        let effects = parse_dosha_effects("vata:-,pitta:0,kapha:+");
        assert_eq!(effects.get("vata"), Some(&DoshaEffect::Decrease));
        assert_eq!(effects.get("pitta"), Some(&DoshaEffect::Neutral));
        assert_eq!(effects.get("kapha"), Some(&DoshaEffect::Increase));
    }

    #[test]
    fn malformed_effects_are_dropped() {
        let effects = parse_dosha_effects("vata,pitta:?,:+,kapha:decrease");
        assert_eq!(effects.len(), 1);
        assert_eq!(effects.get("kapha"), Some(&DoshaEffect::Decrease));
    }

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "string_list")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "dosha_effects")]
        effects: BTreeMap<String, DoshaEffect>,
    }

    #[test]
    fn deserializes_both_shapes_from_toml() {
        let probe: Probe = toml::from_str(
            r#"
tags = "heavy|oily"
effects = { vata = "decrease", pitta = 3, kapha = "+" }
"#,
        )
        .unwrap();
        assert_eq!(probe.tags, vec!["heavy", "oily"]);
        assert_eq!(probe.effects.len(), 2);
        assert_eq!(probe.effects.get("kapha"), Some(&DoshaEffect::Increase));

        let probe: Probe = toml::from_str(
            r#"
tags = ["light", ""]
effects = "vata:-"
"#,
        )
        .unwrap();
        assert_eq!(probe.tags, vec!["light"]);
        assert_eq!(probe.effects.get("vata"), Some(&DoshaEffect::Decrease));
    }
}
