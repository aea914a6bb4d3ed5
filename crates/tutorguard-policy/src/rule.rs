//! Text rule definitions
//!
//! A [`TextRule`] is the single matching abstraction shared by the policy
//! engine, the messaging gate, and the application scorer. Rules are declared
//! as serializable [`RuleSpec`]s and compiled once into matchers.

use aho_corasick::AhoCorasick;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tutorguard_core::{Error, Result};

/// Characters stripped from the end of a shape match (sentence punctuation
/// that the greedy URL patterns pick up).
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']'];

/// Serializable rule declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleSpec {
    /// Case-insensitive substring match against a keyword list
    SubstringList { keywords: Vec<String> },

    /// Regex shapes with optional digit floor and exclusions. A pattern
    /// with a capture group reports the span of its first group.
    ShapePattern {
        patterns: Vec<String>,

        /// Minimum number of ASCII digits a match must contain
        #[serde(default)]
        min_digits: Option<usize>,

        /// Matches containing any of these (case-insensitive) are dropped
        #[serde(default)]
        exclude: Vec<String>,
    },

    /// Character length within `[min, max]`
    LengthBand {
        min: usize,
        #[serde(default)]
        max: Option<usize>,
    },

    /// Sentence count within `[min, max]`
    SentenceCountBand { min: usize, max: usize },
}

impl RuleSpec {
    /// Compile the declaration into a matcher
    pub fn compile(&self) -> Result<TextRule> {
        match self {
            RuleSpec::SubstringList { keywords } => {
                Ok(TextRule::SubstringList(KeywordSet::new(keywords.clone())?))
            }
            RuleSpec::ShapePattern {
                patterns,
                min_digits,
                exclude,
            } => Ok(TextRule::ShapePattern(ShapePattern::new(
                patterns,
                *min_digits,
                exclude.clone(),
            )?)),
            RuleSpec::LengthBand { min, max } => Ok(TextRule::LengthBand {
                min: *min,
                max: *max,
            }),
            RuleSpec::SentenceCountBand { min, max } => {
                if min > max {
                    return Err(Error::policy(format!(
                        "sentence band min {} exceeds max {}",
                        min, max
                    )));
                }
                Ok(TextRule::SentenceCountBand {
                    min: *min,
                    max: *max,
                })
            }
        }
    }
}

/// A located match, as byte offsets into the evaluated text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'t> {
    pub start: usize,
    pub end: usize,
    pub text: &'t str,
}

impl RuleMatch<'_> {
    /// True if `other` lies entirely inside this match
    pub fn contains(&self, other: &RuleMatch<'_>) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Compiled text rule, evaluated through one interface regardless of kind
#[derive(Debug, Clone)]
pub enum TextRule {
    SubstringList(KeywordSet),
    ShapePattern(ShapePattern),
    LengthBand { min: usize, max: Option<usize> },
    SentenceCountBand { min: usize, max: usize },
}

impl TextRule {
    /// Shorthand for a keyword rule
    pub fn keywords<I, S>(keywords: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::SubstringList(KeywordSet::new(
            keywords.into_iter().map(Into::into).collect(),
        )?))
    }

    /// All matches in `text`, ordered by position.
    ///
    /// Band rules describe the whole text, so they yield a single match
    /// spanning it when they hold.
    pub fn find<'t>(&self, text: &'t str) -> Vec<RuleMatch<'t>> {
        match self {
            TextRule::SubstringList(set) => set.find(text),
            TextRule::ShapePattern(shape) => shape.find(text),
            TextRule::LengthBand { .. } | TextRule::SentenceCountBand { .. } => {
                if self.is_match(text) {
                    vec![RuleMatch {
                        start: 0,
                        end: text.len(),
                        text,
                    }]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Whether the rule holds for `text`
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            TextRule::SubstringList(set) => set.is_match(text),
            TextRule::ShapePattern(shape) => !shape.find(text).is_empty(),
            TextRule::LengthBand { min, max } => {
                let len = text.chars().count();
                len >= *min && max.map_or(true, |max| len <= max)
            }
            TextRule::SentenceCountBand { min, max } => {
                let count = sentence_count(text);
                count >= *min && count <= *max
            }
        }
    }
}

/// Number of non-empty segments after splitting on `.`, `!`, and `?`.
pub fn sentence_count(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|segment| !segment.trim().is_empty())
        .count()
}

/// Aho-Corasick backed keyword list (ASCII case-insensitive)
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<String>,
    automaton: AhoCorasick,
}

impl KeywordSet {
    /// Build a keyword set; blank keywords are ignored
    pub fn new(keywords: Vec<String>) -> Result<Self> {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|keyword| keyword.trim().to_string())
            .filter(|keyword| !keyword.is_empty())
            .collect();

        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&keywords)
            .map_err(|e| Error::policy(format!("Failed to build keyword matcher: {}", e)))?;

        Ok(Self {
            keywords,
            automaton,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn is_match(&self, text: &str) -> bool {
        !self.is_empty() && self.automaton.is_match(text)
    }

    /// First occurrence of every keyword present in `text`
    pub fn find<'t>(&self, text: &'t str) -> Vec<RuleMatch<'t>> {
        if self.is_empty() {
            return Vec::new();
        }

        let mut seen = vec![false; self.keywords.len()];
        let mut matches = Vec::new();
        for mat in self.automaton.find_overlapping_iter(text) {
            let index = mat.pattern().as_usize();
            if seen[index] {
                continue;
            }
            seen[index] = true;
            matches.push(RuleMatch {
                start: mat.start(),
                end: mat.end(),
                text: &text[mat.start()..mat.end()],
            });
        }

        matches.sort_by_key(|m| (m.start, std::cmp::Reverse(m.end)));
        matches
    }
}

/// Regex shapes for structurally-matched content (phones, emails, links)
#[derive(Debug, Clone)]
pub struct ShapePattern {
    patterns: Vec<Regex>,
    min_digits: Option<usize>,
    exclude: Vec<String>,
}

impl ShapePattern {
    pub fn new(
        patterns: &[String],
        min_digits: Option<usize>,
        exclude: Vec<String>,
    ) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    Error::policy(format!("Failed to compile pattern '{}': {}", pattern, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            patterns,
            min_digits,
            exclude: exclude
                .into_iter()
                .map(|value| value.to_lowercase())
                .filter(|value| !value.is_empty())
                .collect(),
        })
    }

    /// Matches from every shape, with matches nested inside a larger match
    /// of the same rule removed
    pub fn find<'t>(&self, text: &'t str) -> Vec<RuleMatch<'t>> {
        let mut found: Vec<RuleMatch<'t>> = Vec::new();

        for regex in &self.patterns {
            for captures in regex.captures_iter(text) {
                let Some(mat) = captures.get(1).or_else(|| captures.get(0)) else {
                    continue;
                };
                let trimmed = mat.as_str().trim_end_matches(TRAILING_PUNCTUATION);
                if trimmed.is_empty() {
                    continue;
                }
                let candidate = RuleMatch {
                    start: mat.start(),
                    end: mat.start() + trimmed.len(),
                    text: trimmed,
                };
                if self.accepts(candidate.text) {
                    found.push(candidate);
                }
            }
        }

        found.sort_by_key(|m| (m.start, std::cmp::Reverse(m.end)));

        let mut kept: Vec<RuleMatch<'t>> = Vec::with_capacity(found.len());
        for candidate in found {
            if kept.iter().any(|outer| outer.contains(&candidate)) {
                continue;
            }
            kept.push(candidate);
        }
        kept
    }

    fn accepts(&self, matched: &str) -> bool {
        if let Some(min) = self.min_digits {
            let digits = matched.chars().filter(|c| c.is_ascii_digit()).count();
            if digits < min {
                return false;
            }
        }

        if !self.exclude.is_empty() {
            let lowered = matched.to_lowercase();
            if self.exclude.iter().any(|needle| lowered.contains(needle.as_str())) {
                return false;
            }
        }

        true
    }
}
