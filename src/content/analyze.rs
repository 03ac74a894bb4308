/// Words with at least this many characters count as rare.
pub const RARE_WORD_MIN_CHARS: usize = 8;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StructureFeatures {
    pub headings_count: u32,
    pub para_count: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LexiconFeatures {
    pub rarity: f64, // 0..1
}

/// Merged analyzer output for one content item.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContentAnalysis {
    pub structure: StructureFeatures,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lexicon: Option<LexiconFeatures>,
}

/// Count markdown ATX headings and blank-line separated paragraphs.
pub fn analyze_structure(text: &str) -> StructureFeatures {
    let mut headings_count = 0u32;
    let mut para_count = 0u32;
    let mut in_para = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            in_para = false;
            continue;
        }
        if trimmed.starts_with('#') {
            headings_count = headings_count.saturating_add(1);
            continue;
        }
        if !in_para {
            para_count = para_count.saturating_add(1);
            in_para = true;
        }
    }

    StructureFeatures {
        headings_count,
        para_count,
    }
}

/// Fraction of words longer than seven characters.
pub fn analyze_lexicon(text: &str) -> LexiconFeatures {
    let mut total = 0usize;
    let mut rare = 0usize;
    for word in words(text) {
        total += 1;
        if word.chars().count() >= RARE_WORD_MIN_CHARS {
            rare += 1;
        }
    }
    let rarity = if total == 0 {
        0.0
    } else {
        rare as f64 / total as f64
    };
    LexiconFeatures { rarity }
}

/// Run both analyzers side by side and merge their features.
#[tracing::instrument(skip(text), fields(len = text.len()))]
pub fn analyze_content(text: &str) -> ContentAnalysis {
    let (structure, lexicon) = rayon::join(|| analyze_structure(text), || analyze_lexicon(text));
    ContentAnalysis {
        structure,
        lexicon: Some(lexicon),
    }
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
}

#[cfg(test)]
#[path = "../../tests/unit/content/analyze.rs"]
mod tests;
