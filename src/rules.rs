use crate::error::RuleError;
use regex_lite::Regex;
use std::collections::HashSet;

/// Token replaced by a rule's captured text when a template is rendered.
pub const PLACEHOLDER: &str = "{1}";

pub const EMPTY_INPUT_REPLY: &str =
    "It's okay to take your time. Let me know when you're ready to share.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    General,
    Gratitude,
    Farewell,
    Negation,
    Affirmation,
    Sadness,
    Happiness,
    Emotional,
}

impl Category {
    /// Categories that end any follow-up, checked in this order before anything else.
    pub const SHORT_CIRCUIT: [Category; 4] = [
        Category::Gratitude,
        Category::Farewell,
        Category::Negation,
        Category::Affirmation,
    ];

    pub fn is_tracked(self) -> bool {
        matches!(
            self,
            Category::Sadness | Category::Happiness | Category::Emotional
        )
    }

    /// Fixed emotion label recorded when a rule of this category matches.
    /// `Emotional` rules record the captured word instead.
    pub fn tracked_label(self) -> Option<&'static str> {
        match self {
            Category::Sadness => Some("sadness"),
            Category::Happiness => Some("happiness"),
            _ => None,
        }
    }
}

/// Prompts issued on the turns after an emotion has been detected.
#[derive(Debug, Clone)]
pub struct FollowUpScript {
    probe: Vec<String>,
    coping: Vec<String>,
    closing: Vec<String>,
}

impl FollowUpScript {
    pub fn new(probe: &[&str], coping: &[&str], closing: &[&str]) -> Self {
        Self {
            probe: to_owned(probe),
            coping: to_owned(coping),
            closing: to_owned(closing),
        }
    }

    /// Pool for the given follow-up step; anything past the second probe closes.
    pub fn pool(&self, step: u32) -> &[String] {
        match step {
            0 => &self.probe,
            1 => &self.coping,
            _ => &self.closing,
        }
    }

    fn pools(&self) -> [(&'static str, &[String]); 3] {
        [
            ("probe", &self.probe),
            ("coping", &self.coping),
            ("closing", &self.closing),
        ]
    }
}

/// Outcome of a successful match: the text captured by the first group, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'t> {
    pub capture: Option<&'t str>,
}

#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    category: Category,
    matcher: Option<Regex>,
    responses: Vec<String>,
    follow_up: Option<FollowUpScript>,
}

impl Rule {
    pub fn new(
        name: &str,
        category: Category,
        pattern: &str,
        responses: &[&str],
    ) -> Result<Self, RuleError> {
        let matcher = Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
            rule: name.to_string(),
            source,
        })?;

        Ok(Self {
            name: name.to_string(),
            category,
            matcher: Some(matcher),
            responses: to_owned(responses),
            follow_up: None,
        })
    }

    /// Whole-word, case-insensitive match on any of `words`, capturing the word found.
    pub fn keywords(
        name: &str,
        category: Category,
        words: &[&str],
        responses: &[&str],
    ) -> Result<Self, RuleError> {
        let alternatives: Vec<String> = words.iter().map(|w| regex_lite::escape(w)).collect();
        let pattern = format!(r"(?i)\b({})\b", alternatives.join("|"));
        Self::new(name, category, &pattern, responses)
    }

    /// The catch-all rule answering when nothing else matched.
    pub fn fallback(name: &str, responses: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            category: Category::General,
            matcher: None,
            responses: to_owned(responses),
            follow_up: None,
        }
    }

    pub fn with_follow_up(mut self, script: FollowUpScript) -> Self {
        self.follow_up = Some(script);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn responses(&self) -> &[String] {
        &self.responses
    }

    pub fn follow_up(&self) -> Option<&FollowUpScript> {
        self.follow_up.as_ref()
    }

    pub fn is_fallback(&self) -> bool {
        self.matcher.is_none()
    }

    /// Leftmost match of the rule. A rule that needs its capture only accepts
    /// matches where the first group took part.
    pub fn find<'t>(&self, text: &'t str) -> Option<RuleMatch<'t>> {
        let re = match &self.matcher {
            None => return Some(RuleMatch { capture: None }),
            Some(re) => re,
        };

        if self.needs_capture() {
            re.captures_iter(text)
                .find_map(|caps| caps.get(1))
                .map(|m| RuleMatch {
                    capture: Some(m.as_str()),
                })
        } else {
            re.captures(text).map(|caps| RuleMatch {
                capture: caps.get(1).map(|m| m.as_str()),
            })
        }
    }

    fn needs_capture(&self) -> bool {
        self.category == Category::Emotional
            || self.responses.iter().any(|t| t.contains(PLACEHOLDER))
    }

    fn has_capture(&self) -> bool {
        self.matcher
            .as_ref()
            .map_or(false, |re| re.captures_len() > 1)
    }

    fn validate(&self) -> Result<(), RuleError> {
        if self.responses.is_empty() {
            return Err(RuleError::EmptyPool {
                rule: self.name.clone(),
                pool: "responses",
            });
        }

        if !self.has_capture() {
            if let Some(template) = self.responses.iter().find(|t| t.contains(PLACEHOLDER)) {
                return Err(RuleError::UnfilledPlaceholder {
                    rule: self.name.clone(),
                    template: template.clone(),
                });
            }
        }

        if self.category == Category::Emotional && !self.has_capture() {
            return Err(RuleError::MissingCapture(self.name.clone()));
        }

        if self.category.is_tracked() {
            let script = self
                .follow_up
                .as_ref()
                .ok_or_else(|| RuleError::MissingFollowUp(self.name.clone()))?;
            for (pool, templates) in script.pools() {
                if templates.is_empty() {
                    return Err(RuleError::EmptyPool {
                        rule: self.name.clone(),
                        pool,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Ordered, validated rule list. The last rule is always the fallback.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
    empty_reply: String,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Result<Self, RuleError> {
        let last = rules.last().ok_or(RuleError::MissingFallback)?;
        if !last.is_fallback() {
            return Err(RuleError::MissingFallback);
        }

        let mut names = HashSet::new();
        for (index, rule) in rules.iter().enumerate() {
            if !names.insert(rule.name()) {
                return Err(RuleError::DuplicateName(rule.name.clone()));
            }
            if rule.is_fallback() {
                if index + 1 != rules.len() {
                    return Err(RuleError::FallbackNotLast(rule.name.clone()));
                }
                if rule.category != Category::General {
                    return Err(RuleError::InvalidFallback(rule.name.clone()));
                }
            }
            rule.validate()?;
        }

        Ok(Self {
            rules,
            empty_reply: EMPTY_INPUT_REPLY.to_string(),
        })
    }

    /// The table the chat page ships with.
    pub fn builtin() -> Result<Self, RuleError> {
        Self::new(crate::script::builtin_rules()?)
    }

    pub fn with_empty_reply(mut self, reply: &str) -> Self {
        self.empty_reply = reply.to_string();
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Rules with a pattern, in declared order.
    pub fn matchers(&self) -> &[Rule] {
        &self.rules[..self.rules.len() - 1]
    }

    pub fn fallback(&self) -> &Rule {
        &self.rules[self.rules.len() - 1]
    }

    pub fn empty_reply(&self) -> &str {
        &self.empty_reply
    }
}

/// Substitute the captured text into a template.
pub fn render(template: &str, capture: Option<&str>) -> String {
    match capture {
        Some(text) => template.replace(PLACEHOLDER, text),
        None => template.to_string(),
    }
}

fn to_owned(templates: &[&str]) -> Vec<String> {
    templates.iter().map(|t| t.to_string()).collect()
}
