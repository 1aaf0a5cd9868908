//! Hint rules: pattern → identifier overrides for known metadata errors.
//!
//! A rule whose pattern matches a publication's title, completion string or
//! a harvested container title contributes its identifier to the candidate
//! pool. Rules only ever add candidates; they never veto one.
//!
//! Patterns arrive either precompiled or as strings. A string may be a bare
//! regex or a `/body/flags` literal. String patterns always match
//! case-insensitively.

use regex_lite::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Rules shipped with the crate: `(pattern, issn, canonical name)`.
const BUILTIN_HINTS: &[(&str, &str, Option<&str>)] = &[
    // Crossref files CHI papers under the proceedings, but the ranking
    // authority lists the journal (PACMHCI).
    (
        "/CHI Conference|Human Factors in Computing Systems/i",
        "2573-0142",
        None,
    ),
    (
        "/IEEE (Conference on )?Virtual Reality( and 3D User Interfaces)?|IEEE VRW?|VR 3D User Interfaces|VR '?(20)?[0-9]{2}/i",
        "2642-5246",
        Some("IEEE Conference on Virtual Reality and 3D User Interfaces (VR)"),
    ),
];

/// Errors produced while compiling a hint rule.
#[derive(Debug, Error)]
pub enum HintError {
    #[error("Invalid hint pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Hint rule '{pattern}' has no identifier")]
    MissingIdentifier { pattern: String },
}

/// Hint rule as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HintRuleConfig {
    /// Regex, either bare or as `/body/flags`.
    pub pattern: String,
    /// Identifier to add when the pattern matches.
    pub issn: String,
    /// Canonical venue name, tried by name lookup when the rule matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A compiled hint rule.
#[derive(Debug, Clone)]
pub struct HintRule {
    pattern: Regex,
    issn: String,
    name: Option<String>,
}

impl HintRule {
    /// Build a rule from an already compiled pattern.
    ///
    /// The pattern is rebuilt to match case-insensitively. Inline flags in
    /// its source survive; builder flags do not.
    pub fn new(
        pattern: Regex,
        issn: impl Into<String>,
        name: Option<String>,
    ) -> Result<Self, HintError> {
        let source = pattern.as_str();
        let pattern = RegexBuilder::new(source)
            .case_insensitive(true)
            .build()
            .map_err(|e| HintError::InvalidPattern {
                pattern: source.to_string(),
                reason: e.to_string(),
            })?;
        Self::from_parts(pattern, issn.into(), name)
    }

    /// Compile a rule from its configuration form.
    pub fn compile(config: &HintRuleConfig) -> Result<Self, HintError> {
        Self::from_parts(
            compile_pattern(&config.pattern)?,
            config.issn.clone(),
            config.name.clone(),
        )
    }

    fn from_parts(pattern: Regex, issn: String, name: Option<String>) -> Result<Self, HintError> {
        if issn.trim().is_empty() {
            return Err(HintError::MissingIdentifier {
                pattern: pattern.as_str().to_string(),
            });
        }
        Ok(Self {
            pattern,
            issn,
            name: name.filter(|n| !n.trim().is_empty()),
        })
    }

    pub fn issn(&self) -> &str {
        &self.issn
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Whether the pattern matches any of the given texts.
    pub fn matches_any<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> bool {
        texts
            .into_iter()
            .any(|text| !text.is_empty() && self.pattern.is_match(text))
    }
}

/// Compile a pattern string, accepting `/body/flags` literals.
pub fn compile_pattern(raw: &str) -> Result<Regex, HintError> {
    let invalid = |reason: String| HintError::InvalidPattern {
        pattern: raw.to_string(),
        reason,
    };

    let (body, flags) = split_slash_literal(raw).unwrap_or((raw, ""));
    if body.is_empty() {
        return Err(invalid("empty pattern".to_string()));
    }

    let mut builder = RegexBuilder::new(body);
    builder.case_insensitive(true);
    for flag in flags.chars() {
        match flag {
            'i' => {}
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            'U' => {
                builder.swap_greed(true);
            }
            // Meaningless for a single boolean match.
            'g' | 'u' | 'y' | 'd' => {}
            other => return Err(invalid(format!("unsupported flag '{}'", other))),
        }
    }

    builder.build().map_err(|e| invalid(e.to_string()))
}

/// Split `/body/flags` into its parts, if the string has that shape.
fn split_slash_literal(raw: &str) -> Option<(&str, &str)> {
    let trimmed = raw.trim();
    let rest = trimmed.strip_prefix('/')?;
    let end = rest.rfind('/')?;
    let (body, flags) = (&rest[..end], &rest[end + 1..]);
    flags
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
        .then_some((body, flags))
}

/// The set of active hint rules. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct HintEngine {
    rules: Vec<HintRule>,
}

impl HintEngine {
    /// An engine with no rules.
    pub fn empty() -> Self {
        Self::default()
    }

    /// An engine with only the built-in rules.
    pub fn builtin() -> Self {
        Self::with_custom(&[], false)
    }

    /// Custom rules first, then the built-in ones.
    ///
    /// Malformed custom rules are skipped.
    pub fn with_custom(custom: &[HintRuleConfig], debug_log: bool) -> Self {
        Self::with_rules(Vec::new(), custom, debug_log)
    }

    /// Precompiled rules, then custom rules from configuration, then the
    /// built-in ones.
    pub fn with_rules(
        precompiled: Vec<HintRule>,
        custom: &[HintRuleConfig],
        debug_log: bool,
    ) -> Self {
        let builtin = BUILTIN_HINTS.iter().map(|(pattern, issn, name)| HintRuleConfig {
            pattern: pattern.to_string(),
            issn: issn.to_string(),
            name: name.map(String::from),
        });

        let mut rules = precompiled;
        for config in custom.iter().cloned().chain(builtin) {
            match HintRule::compile(&config) {
                Ok(rule) => rules.push(rule),
                Err(e) => {
                    if debug_log {
                        debug!("Skipping hint rule: {}", e);
                    }
                }
            }
        }

        Self { rules }
    }

    pub fn rules(&self) -> &[HintRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules matching any of the texts, in table order.
    pub fn matching<'s>(&'s self, texts: &[&str]) -> Vec<&'s HintRule> {
        self.rules
            .iter()
            .filter(|rule| rule.matches_any(texts.iter().copied()))
            .collect()
    }

    /// Identifiers contributed by the rules matching any of the texts.
    pub fn matching_issns(&self, texts: &[&str]) -> Vec<String> {
        self.matching(texts)
            .into_iter()
            .map(|rule| rule.issn.clone())
            .collect()
    }

    /// Canonical names of the rules matching any of the texts.
    pub fn matching_names(&self, texts: &[&str]) -> Vec<String> {
        self.matching(texts)
            .into_iter()
            .filter_map(|rule| rule.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_chi_rule() {
        let engine = HintEngine::builtin();
        let issns =
            engine.matching_issns(&["CHI Conference on Human Factors in Computing Systems 2023"]);
        assert_eq!(issns, vec!["2573-0142"]);
    }

    #[test]
    fn test_builtin_vr_rule_carries_name() {
        let engine = HintEngine::builtin();
        let texts = ["", "2024 IEEE Conference on Virtual Reality and 3D User Interfaces (VR)"];
        assert_eq!(engine.matching_issns(&texts), vec!["2642-5246"]);
        assert_eq!(
            engine.matching_names(&texts),
            vec!["IEEE Conference on Virtual Reality and 3D User Interfaces (VR)"]
        );
        assert_eq!(engine.matching_issns(&["Proc. IEEE VRW"]), vec!["2642-5246"]);
    }

    #[test]
    fn test_no_match() {
        let engine = HintEngine::builtin();
        assert!(engine.matching_issns(&["Journal of Documentation"]).is_empty());
    }

    #[test]
    fn test_slash_literal_with_flags() {
        let re = compile_pattern("/journal of (foo|bar)/i").unwrap();
        assert!(re.is_match("Journal Of Bar"));
    }

    #[test]
    fn test_bare_pattern_is_case_insensitive() {
        let re = compile_pattern("SIGGRAPH").unwrap();
        assert!(re.is_match("acm siggraph asia"));
    }

    #[test]
    fn test_slash_in_body() {
        let re = compile_pattern("/a/b/").unwrap();
        assert!(re.is_match("x a/b y"));
    }

    #[test]
    fn test_malformed_patterns_rejected() {
        assert!(matches!(
            compile_pattern("/(unclosed/i"),
            Err(HintError::InvalidPattern { .. })
        ));
        assert!(matches!(
            compile_pattern("/ok/q"),
            Err(HintError::InvalidPattern { .. })
        ));
        assert!(matches!(compile_pattern("//"), Err(HintError::InvalidPattern { .. })));
    }

    #[test]
    fn test_custom_rules_first_and_malformed_skipped() {
        let custom = vec![
            HintRuleConfig {
                pattern: "/Nordic Workshop/i".to_string(),
                issn: "1234-5678".to_string(),
                name: None,
            },
            HintRuleConfig {
                pattern: "(broken".to_string(),
                issn: "8765-4321".to_string(),
                name: None,
            },
            HintRuleConfig {
                pattern: "Anything".to_string(),
                issn: " ".to_string(),
                name: None,
            },
        ];
        let engine = HintEngine::with_custom(&custom, true);
        assert_eq!(engine.len(), 1 + BUILTIN_HINTS.len());
        assert_eq!(engine.rules()[0].issn(), "1234-5678");
    }

    #[test]
    fn test_precompiled_rule_matches_case_insensitively() {
        let rule = HintRule::new(Regex::new("EuroVis").unwrap(), "0167-7055", None).unwrap();
        let engine = HintEngine::with_rules(vec![rule], &[], false);
        assert_eq!(engine.matching_issns(&["EuroVis 2022"]), vec!["0167-7055"]);
        assert_eq!(engine.matching_issns(&["eurovis 2022"]), vec!["0167-7055"]);
    }

    #[test]
    fn test_precompiled_rules_come_first() {
        let rule = HintRule::new(Regex::new("CHI").unwrap(), "1111-2222", None).unwrap();
        let custom = vec![HintRuleConfig {
            pattern: "/CHI/i".to_string(),
            issn: "3333-4444".to_string(),
            name: None,
        }];
        let engine = HintEngine::with_rules(vec![rule], &custom, false);
        let issns = engine.matching_issns(&["CHI Conference 2023"]);
        assert_eq!(issns, vec!["1111-2222", "3333-4444", "2573-0142"]);
    }

    #[test]
    fn test_precompiled_rule_requires_identifier() {
        assert!(matches!(
            HintRule::new(Regex::new("EuroVis").unwrap(), "", None),
            Err(HintError::MissingIdentifier { .. })
        ));
    }

    #[test]
    fn test_one_identifier_per_rule() {
        let engine = HintEngine::builtin();
        let issns =
            engine.matching_issns(&["CHI Conference", "Human Factors in Computing Systems"]);
        assert_eq!(issns.len(), 1);
    }
}
