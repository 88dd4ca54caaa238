use crate::error::RuleError;
use crate::rules::{render, Category, Rule, RuleTable};
use crate::selector;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::debug;

/// Number of probing turns issued before a follow-up closes.
const FOLLOW_UP_PROBES: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Tracked {
    rule: usize,
    emotion: String,
}

/// Per-conversation state. The tracked emotion and follow-up step move together.
#[derive(Debug, Clone, Default)]
pub struct Session {
    tracked: Option<Tracked>,
    follow_up_step: u32,
    last_reply: Option<String>,
}

impl Session {
    /// `"sadness"`, `"happiness"`, or the feeling word that armed the follow-up.
    pub fn tracked_emotion(&self) -> Option<&str> {
        self.tracked.as_ref().map(|t| t.emotion.as_str())
    }

    pub fn follow_up_step(&self) -> u32 {
        self.follow_up_step
    }

    /// The last template drawn, before placeholder substitution.
    pub fn last_reply(&self) -> Option<&str> {
        self.last_reply.as_deref()
    }

    fn track(&mut self, rule: usize, emotion: &str) {
        self.tracked = Some(Tracked {
            rule,
            emotion: emotion.trim().to_lowercase(),
        });
        self.follow_up_step = 0;
    }

    fn clear(&mut self) {
        self.tracked = None;
        self.follow_up_step = 0;
    }
}

pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// A single conversation over a shared rule table.
pub struct Responder {
    table: Arc<RuleTable>,
    session: Session,
    rng: StdRng,
}

impl Responder {
    /// Validate `rules` and start a fresh conversation over them.
    pub fn new(rules: Vec<Rule>) -> Result<Self, RuleError> {
        Ok(Self::from_table(Arc::new(RuleTable::new(rules)?)))
    }

    pub fn builtin() -> Result<Self, RuleError> {
        Ok(Self::from_table(Arc::new(RuleTable::builtin()?)))
    }

    pub fn from_table(table: Arc<RuleTable>) -> Self {
        Self {
            table,
            session: Session::default(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn respond(&mut self, text: &str) -> String {
        let input = normalize(text);
        if input.is_empty() {
            return self.table.empty_reply().to_string();
        }

        if let Some(reply) = self.short_circuit(&input) {
            return reply;
        }

        if let Some(reply) = self.follow_up() {
            return reply;
        }

        self.scan(&input)
    }

    fn short_circuit(&mut self, input: &str) -> Option<String> {
        let table = Arc::clone(&self.table);
        for category in Category::SHORT_CIRCUIT {
            let hit = table
                .matchers()
                .iter()
                .filter(|rule| rule.category() == category)
                .find_map(|rule| rule.find(input).map(|found| (rule, found)));

            if let Some((rule, found)) = hit {
                debug!(rule = rule.name(), "short-circuit match, clearing follow-up");
                self.session.clear();
                let template = self.pick(rule.responses());
                return Some(render(&template, found.capture));
            }
        }
        None
    }

    fn follow_up(&mut self) -> Option<String> {
        let tracked = self.session.tracked.clone()?;
        let table = Arc::clone(&self.table);
        let Some(script) = table.rules().get(tracked.rule).and_then(Rule::follow_up) else {
            self.session.clear();
            return None;
        };

        let step = self.session.follow_up_step;
        let template = self.pick(script.pool(step));
        if step >= FOLLOW_UP_PROBES {
            debug!(emotion = %tracked.emotion, "follow-up finished");
            self.session.clear();
        } else {
            debug!(emotion = %tracked.emotion, step, "follow-up advanced");
            self.session.follow_up_step += 1;
        }

        Some(render(&template, Some(&tracked.emotion)))
    }

    fn scan(&mut self, input: &str) -> String {
        let table = Arc::clone(&self.table);
        let hit = table
            .matchers()
            .iter()
            .enumerate()
            .find_map(|(index, rule)| rule.find(input).map(|found| (index, rule, found)));

        let Some((index, rule, found)) = hit else {
            debug!("no rule matched, using fallback");
            let template = self.pick(table.fallback().responses());
            return render(&template, None);
        };

        debug!(rule = rule.name(), capture = ?found.capture, "rule matched");
        match rule.category().tracked_label() {
            Some(label) => self.session.track(index, label),
            None if rule.category() == Category::Emotional => {
                if let Some(word) = found.capture {
                    self.session.track(index, word);
                }
            }
            None => {}
        }

        let template = self.pick(rule.responses());
        render(&template, found.capture)
    }

    fn pick(&mut self, pool: &[String]) -> String {
        let template = selector::select(pool, self.session.last_reply.as_deref(), &mut self.rng)
            .unwrap_or_default()
            .to_string();
        self.session.last_reply = Some(template.clone());
        template
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{FollowUpScript, EMPTY_INPUT_REPLY};

    fn responder(seed: u64) -> Responder {
        Responder::builtin().unwrap().with_seed(seed)
    }

    fn pool_of(responder: &Responder, rule: &str) -> Vec<String> {
        responder.table().rule(rule).unwrap().responses().to_vec()
    }

    fn follow_up_pool(responder: &Responder, rule: &str, step: u32) -> Vec<String> {
        let rule = responder.table().rule(rule).unwrap();
        rule.follow_up().unwrap().pool(step).to_vec()
    }

    fn rendered(pool: &[String], capture: &str) -> Vec<String> {
        pool.iter().map(|t| render(t, Some(capture))).collect()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Hello There \n"), "hello there");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_greeting_leaves_state_alone() {
        let mut bot = responder(1);
        let reply = bot.respond("hello");
        assert!(pool_of(&bot, "greeting").contains(&reply));
        assert_eq!(bot.session().tracked_emotion(), None);
        assert_eq!(bot.session().follow_up_step(), 0);
    }

    #[test]
    fn test_happiness_arms_follow_up() {
        let mut bot = responder(2);
        let reply = bot.respond("I am so happy today");
        assert!(rendered(&pool_of(&bot, "happiness"), "happy").contains(&reply));
        assert!(!reply.contains("{1}"));
        assert_eq!(bot.session().tracked_emotion(), Some("happiness"));
        assert_eq!(bot.session().follow_up_step(), 0);

        let reply = bot.respond("thanks");
        assert!(pool_of(&bot, "gratitude").contains(&reply));
        assert_eq!(bot.session().tracked_emotion(), None);
    }

    #[test]
    fn test_sadness_runs_three_follow_up_turns() {
        let mut bot = responder(3);
        bot.respond("I feel sad");
        assert_eq!(bot.session().tracked_emotion(), Some("sadness"));

        let reply = bot.respond("my cat ran away");
        assert!(follow_up_pool(&bot, "sadness", 0).contains(&reply));
        assert_eq!(bot.session().follow_up_step(), 1);

        let reply = bot.respond("it has been rough");
        assert!(follow_up_pool(&bot, "sadness", 1).contains(&reply));
        assert_eq!(bot.session().follow_up_step(), 2);

        let reply = bot.respond("friends help a little");
        assert!(follow_up_pool(&bot, "sadness", 2).contains(&reply));
        assert_eq!(bot.session().tracked_emotion(), None);
        assert_eq!(bot.session().follow_up_step(), 0);

        let reply = bot.respond("hello");
        assert!(pool_of(&bot, "greeting").contains(&reply));
    }

    #[test]
    fn test_follow_up_ignores_other_rules() {
        let mut bot = responder(4);
        bot.respond("i am feeling down");
        let reply = bot.respond("hello, i am angry now");
        assert!(follow_up_pool(&bot, "sadness", 0).contains(&reply));
        assert_eq!(bot.session().tracked_emotion(), Some("sadness"));
    }

    #[test]
    fn test_emotional_tracks_feeling_word() {
        let mut bot = responder(5);
        let reply = bot.respond("  I'm ANXIOUS about work ");
        assert!(rendered(&pool_of(&bot, "emotional"), "anxious").contains(&reply));
        assert_eq!(bot.session().tracked_emotion(), Some("anxious"));

        let reply = bot.respond("deadlines");
        assert!(rendered(&follow_up_pool(&bot, "emotional", 0), "anxious").contains(&reply));
        assert!(reply.contains("anxious"));

        let reply = bot.respond("badly");
        assert!(rendered(&follow_up_pool(&bot, "emotional", 1), "anxious").contains(&reply));

        let reply = bot.respond("walks");
        assert!(follow_up_pool(&bot, "emotional", 2).contains(&reply));
        assert_eq!(bot.session().tracked_emotion(), None);
    }

    #[test]
    fn test_gratitude_wins_over_sadness() {
        let mut bot = responder(6);
        let reply = bot.respond("thanks, I feel sad");
        assert!(pool_of(&bot, "gratitude").contains(&reply));
        assert_eq!(bot.session().tracked_emotion(), None);
    }

    #[test]
    fn test_short_circuits_interrupt_follow_up() {
        for (input, rule) in [
            ("thank you", "gratitude"),
            ("bye", "goodbye"),
            ("not really", "negative_response"),
            ("sure", "positive_response"),
        ] {
            let mut bot = responder(7);
            bot.respond("i am upset");
            bot.respond("work");
            assert_eq!(bot.session().follow_up_step(), 1);

            let reply = bot.respond(input);
            assert!(pool_of(&bot, rule).contains(&reply), "{input} -> {reply}");
            assert_eq!(bot.session().tracked_emotion(), None);
            assert_eq!(bot.session().follow_up_step(), 0);
        }
    }

    #[test]
    fn test_short_circuit_priority() {
        let mut bot = responder(8);
        let reply = bot.respond("no thanks, bye");
        assert!(pool_of(&bot, "gratitude").contains(&reply));

        let reply = bot.respond("yes, see you");
        assert!(pool_of(&bot, "goodbye").contains(&reply));

        let reply = bot.respond("okay, i don't know");
        assert!(pool_of(&bot, "negative_response").contains(&reply));
    }

    #[test]
    fn test_empty_input_keeps_follow_up() {
        let mut bot = responder(9);
        bot.respond("i am miserable");
        bot.respond("everything");
        let before = bot.session().clone();

        for input in ["", "   ", "\t\n"] {
            assert_eq!(bot.respond(input), EMPTY_INPUT_REPLY);
            assert_eq!(bot.session().tracked_emotion(), before.tracked_emotion());
            assert_eq!(bot.session().follow_up_step(), before.follow_up_step());
            assert_eq!(bot.session().last_reply(), before.last_reply());
        }

        let reply = bot.respond("still bad");
        assert!(follow_up_pool(&bot, "sadness", 1).contains(&reply));
    }

    #[test]
    fn test_unknown_input_uses_fallback() {
        let mut bot = responder(10);
        let reply = bot.respond("the weather is cloudy");
        assert!(pool_of(&bot, "unknown").contains(&reply));
        assert_eq!(bot.session().tracked_emotion(), None);
    }

    #[test]
    fn test_consecutive_replies_differ() {
        let mut bot = responder(11);
        let mut last = bot.respond("hello");
        for _ in 0..50 {
            let reply = bot.respond("hello");
            assert_ne!(reply, last);
            last = reply;
        }
    }

    #[test]
    fn test_last_reply_holds_template() {
        let mut bot = responder(12);
        let reply = bot.respond("i am so tired");
        let template = bot.session().last_reply().unwrap().to_string();
        assert!(template.contains("{1}"));
        assert_eq!(render(&template, Some("tired")), reply);
    }

    #[test]
    fn test_declared_order_decides_overlaps() {
        let rules = vec![
            Rule::keywords("pets", Category::General, &["cat"], &["Tell me about pets."]).unwrap(),
            Rule::keywords("animals", Category::General, &["cat", "dog"], &["Animals!"])
                .unwrap(),
            Rule::fallback("unknown", &["Hm?"]),
        ];
        let mut bot = Responder::new(rules).unwrap().with_seed(1);
        assert_eq!(bot.respond("my cat"), "Tell me about pets.");
        assert_eq!(bot.respond("my dog"), "Animals!");
        assert_eq!(bot.respond("my fish"), "Hm?");
    }

    #[test]
    fn test_custom_table_follow_up() {
        let rules = vec![
            Rule::keywords("sad", Category::Sadness, &["blue"], &["Blue, you say."])
                .unwrap()
                .with_follow_up(FollowUpScript::new(&["one"], &["two"], &["three"])),
            Rule::fallback("unknown", &["Hm?"]),
        ];
        let mut bot = Responder::new(rules).unwrap().with_seed(1);
        assert_eq!(bot.respond("feeling blue"), "Blue, you say.");
        assert_eq!(bot.respond("a"), "one");
        assert_eq!(bot.respond("b"), "two");
        assert_eq!(bot.respond("c"), "three");
        assert_eq!(bot.respond("d"), "Hm?");
    }

    #[test]
    fn test_happiness_runs_three_follow_up_turns() {
        let mut bot = responder(13);
        bot.respond("i feel great");
        assert_eq!(bot.session().tracked_emotion(), Some("happiness"));

        let reply = bot.respond("i got the job");
        assert!(follow_up_pool(&bot, "happiness", 0).contains(&reply));
        assert_eq!(bot.session().follow_up_step(), 1);

        let reply = bot.respond("the team seems nice");
        assert!(follow_up_pool(&bot, "happiness", 1).contains(&reply));
        assert_eq!(bot.session().follow_up_step(), 2);

        let reply = bot.respond("dinner with family");
        assert!(follow_up_pool(&bot, "happiness", 2).contains(&reply));
        assert_eq!(bot.session().tracked_emotion(), None);
        assert_eq!(bot.session().follow_up_step(), 0);
    }

    #[test]
    fn test_custom_empty_reply() {
        let table = RuleTable::builtin()
            .unwrap()
            .with_empty_reply("Whenever you're ready.");
        let mut bot = Responder::from_table(Arc::new(table)).with_seed(1);
        assert_eq!(bot.respond("  "), "Whenever you're ready.");
        assert_eq!(bot.session().last_reply(), None);
    }

    #[test]
    fn test_placeholder_never_left_unfilled() {
        let rules = vec![
            Rule::new(
                "greet",
                Category::General,
                r"(?i)\bhi\b|\b(hey)\b",
                &["Well {1}!"],
            )
            .unwrap(),
            Rule::fallback("unknown", &["Hm?"]),
        ];
        let mut bot = Responder::new(rules).unwrap().with_seed(1);
        assert_eq!(bot.respond("hi"), "Hm?");
        assert_eq!(bot.respond("hey"), "Well hey!");
    }

    #[test]
    fn test_emotional_rule_needs_feeling_word() {
        let rules = vec![
            Rule::new(
                "emotional",
                Category::Emotional,
                r"(?i)\bfeel\b|\b(angry)\b",
                &["So {1}?"],
            )
            .unwrap()
            .with_follow_up(FollowUpScript::new(&["one {1}"], &["two"], &["three"])),
            Rule::fallback("unknown", &["Hm?"]),
        ];
        let mut bot = Responder::new(rules).unwrap().with_seed(1);
        assert_eq!(bot.respond("i feel"), "Hm?");
        assert_eq!(bot.session().tracked_emotion(), None);

        assert_eq!(bot.respond("i feel angry"), "So angry?");
        assert_eq!(bot.session().tracked_emotion(), Some("angry"));
        assert_eq!(bot.respond("work"), "one angry");
    }

    #[test]
    fn test_invalid_table_fails_construction() {
        let rules = vec![Rule::keywords("hi", Category::General, &["hi"], &["Hi"]).unwrap()];
        assert!(matches!(Responder::new(rules), Err(RuleError::MissingFallback)));
    }
}
