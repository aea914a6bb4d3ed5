//! Declarative scoring policy
//!
//! Every cap, tier, weight, and micro-teaching criterion lives here so the
//! scoring algorithm can be audited and tuned without touching orchestration
//! code. The defaults are the production rubric.

use serde::{Deserialize, Serialize};
use tutorguard_core::{Error, Result};
use tutorguard_policy::{RuleSpec, TextRule};

/// Points awarded once a count reaches `min`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub min: usize,
    pub points: u32,
}

/// Tier ladder; the highest tier whose `min` is reached wins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountTiers(pub Vec<Tier>);

impl CountTiers {
    pub fn new(tiers: &[(usize, u32)]) -> Self {
        Self(
            tiers
                .iter()
                .map(|&(min, points)| Tier { min, points })
                .collect(),
        )
    }

    pub fn points(&self, count: usize) -> u32 {
        self.0
            .iter()
            .filter(|tier| count >= tier.min)
            .max_by_key(|tier| tier.min)
            .map_or(0, |tier| tier.points)
    }
}

/// Field-presence checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletenessPolicy {
    pub cap: u32,
    pub name_min_chars: usize,
    pub name: u32,
    pub country: u32,
    pub timezone: u32,
    pub languages: u32,
    pub subjects: u32,
    pub grades: u32,
    pub experience_level: u32,
    pub teaching_styles: u32,
    /// Awarded only when both days and slots are non-empty
    pub availability: u32,
}

impl Default for CompletenessPolicy {
    fn default() -> Self {
        Self {
            cap: 20,
            name_min_chars: 2,
            name: 2,
            country: 2,
            timezone: 2,
            languages: 2,
            subjects: 3,
            grades: 3,
            experience_level: 2,
            teaching_styles: 2,
            availability: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailabilityPolicy {
    pub cap: u32,
    pub days: CountTiers,
    pub slots: CountTiers,
}

impl Default for AvailabilityPolicy {
    fn default() -> Self {
        Self {
            cap: 15,
            days: CountTiers::new(&[(5, 8), (3, 5), (1, 2)]),
            slots: CountTiers::new(&[(3, 7), (2, 4), (1, 2)]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectFitPolicy {
    pub cap: u32,
    pub subjects: CountTiers,
    pub grades: CountTiers,
}

impl Default for SubjectFitPolicy {
    fn default() -> Self {
        Self {
            cap: 10,
            subjects: CountTiers::new(&[(3, 5), (2, 3), (1, 2)]),
            grades: CountTiers::new(&[(3, 5), (2, 3), (1, 2)]),
        }
    }
}

/// Micro-teaching score families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Clarity,
    Structure,
    Empathy,
    Communication,
}

/// Per-family clamps applied after all answers are accumulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyCaps {
    pub clarity: u32,
    pub structure: u32,
    pub empathy: u32,
    pub communication: u32,
}

impl FamilyCaps {
    pub fn cap(&self, family: Family) -> u32 {
        match family {
            Family::Clarity => self.clarity,
            Family::Structure => self.structure,
            Family::Empathy => self.empathy,
            Family::Communication => self.communication,
        }
    }
}

impl Default for FamilyCaps {
    fn default() -> Self {
        Self {
            clarity: 12,
            structure: 12,
            empathy: 8,
            communication: 10,
        }
    }
}

/// One way of satisfying a criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeSpec {
    pub rule: RuleSpec,
    pub points: u32,
}

/// A per-answer criterion; the first matching alternative awards its points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionSpec {
    pub family: Family,
    pub alternatives: Vec<AlternativeSpec>,
}

impl CriterionSpec {
    fn single(family: Family, rule: RuleSpec, points: u32) -> Self {
        Self {
            family,
            alternatives: vec![AlternativeSpec { rule, points }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MicroTeachingPolicy {
    pub cap: u32,
    pub family_caps: FamilyCaps,
    pub criteria: Vec<CriterionSpec>,
}

impl Default for MicroTeachingPolicy {
    fn default() -> Self {
        Self {
            cap: 35,
            family_caps: FamilyCaps::default(),
            criteria: vec![
                CriterionSpec::single(
                    Family::Structure,
                    keywords(&[
                        "first", "then", "next", "finally", "step 1", "step one", "after that",
                        "second", "lastly", "to begin",
                    ]),
                    4,
                ),
                CriterionSpec::single(
                    Family::Clarity,
                    keywords(&["student", "child", "they", "learner", "kid", "pupil", "them"]),
                    3,
                ),
                CriterionSpec::single(
                    Family::Clarity,
                    keywords(&[
                        "explain",
                        "demonstrate",
                        "check",
                        "practice",
                        "show",
                        "model",
                        "ask",
                        "review",
                        "example",
                        "guide",
                    ]),
                    2,
                ),
                CriterionSpec::single(
                    Family::Empathy,
                    keywords(&[
                        "gently",
                        "patiently",
                        "respectfully",
                        "kindly",
                        "calmly",
                        "encourage",
                        "praise",
                    ]),
                    3,
                ),
                CriterionSpec::single(
                    Family::Empathy,
                    keywords(&[
                        "understand",
                        "struggle",
                        "difficult",
                        "patience",
                        "confidence",
                        "frustrat",
                        "support",
                        "feel",
                    ]),
                    2,
                ),
                CriterionSpec {
                    family: Family::Communication,
                    alternatives: vec![
                        AlternativeSpec {
                            rule: RuleSpec::LengthBand {
                                min: 100,
                                max: Some(280),
                            },
                            points: 3,
                        },
                        AlternativeSpec {
                            rule: RuleSpec::LengthBand { min: 50, max: None },
                            points: 2,
                        },
                    ],
                },
                CriterionSpec::single(
                    Family::Communication,
                    RuleSpec::SentenceCountBand { min: 2, max: 5 },
                    2,
                ),
            ],
        }
    }
}

fn keywords(values: &[&str]) -> RuleSpec {
    RuleSpec::SubstringList {
        keywords: values.iter().map(|value| value.to_string()).collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompliancePolicy {
    /// Awarded when no answer or bio trips the policy engine
    pub cap: u32,
}

impl Default for CompliancePolicy {
    fn default() -> Self {
        Self { cap: 10 }
    }
}

/// Sub-score floors below which risk flags are raised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub low_availability_below: u32,
    pub weak_demo_below: u32,
    pub missing_profile_below: u32,
    /// Empathy dimension percentage below which the extra suggestion is added
    pub low_empathy_percent_below: u8,
    pub checklist_limit: usize,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low_availability_below: 5,
            weak_demo_below: 15,
            missing_profile_below: 15,
            low_empathy_percent_below: 50,
            checklist_limit: 5,
        }
    }
}

/// The complete rubric
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub completeness: CompletenessPolicy,
    pub availability: AvailabilityPolicy,
    pub subject_fit: SubjectFitPolicy,
    pub micro_teaching: MicroTeachingPolicy,
    pub compliance: CompliancePolicy,
    pub risk: RiskThresholds,
}

impl ScoringPolicy {
    /// Ceiling of the composite score
    pub const MAX_SCORE: u32 = 100;

    /// Compile the micro-teaching criteria into matchers
    pub(crate) fn compile_criteria(&self) -> Result<Vec<Criterion>> {
        self.micro_teaching
            .criteria
            .iter()
            .map(|spec| {
                if spec.alternatives.is_empty() {
                    return Err(Error::config(format!(
                        "{:?} criterion has no alternatives",
                        spec.family
                    )));
                }
                let alternatives = spec
                    .alternatives
                    .iter()
                    .map(|alt| Ok((alt.rule.compile()?, alt.points)))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Criterion {
                    family: spec.family,
                    alternatives,
                })
            })
            .collect()
    }
}

/// Compiled micro-teaching criterion
#[derive(Debug, Clone)]
pub(crate) struct Criterion {
    pub family: Family,
    pub alternatives: Vec<(TextRule, u32)>,
}

impl Criterion {
    /// Points from the first alternative that holds for `answer`
    pub fn award(&self, answer: &str) -> u32 {
        self.alternatives
            .iter()
            .find(|(rule, _)| rule.is_match(answer))
            .map_or(0, |(_, points)| *points)
    }
}
