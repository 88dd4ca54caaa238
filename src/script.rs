//! The built-in conversation script: keyword lists, reply pools and follow-up prompts.

use crate::error::RuleError;
use crate::rules::{Category, FollowUpScript, Rule};

pub const WELCOME_MESSAGE: &str = "Hi, I'm ELIZA. I'm here to listen and help you process your thoughts. Just type how you're feeling or say hello to start!";

const GREETING_WORDS: &[&str] = &["hello", "hi", "hey"];

const GREETING_REPLIES: &[&str] = &[
    "Hello! How are you feeling today?",
    "Hi there! Tell me how you are feeling.",
    "Hey! How are you feeling at the moment?",
    "Hi! How are you feeling today? I'm here to listen.",
];

const GOODBYE_WORDS: &[&str] = &[
    "bye",
    "goodbye",
    "see you",
    "farewell",
    "take care",
    "later",
    "quit",
    "exit",
];

const GOODBYE_REPLIES: &[&str] = &[
    "Goodbye! Take care, and remember I'm always here if you need someone to talk to.",
    "It was nice talking to you. Come back anytime if you need to chat!",
    "See you later! I’ll be here whenever you need support.",
    "Take care of yourself! I’m always here if you need to talk.",
];

const GRATITUDE_WORDS: &[&str] = &["thanks", "thank you"];

const GRATITUDE_REPLIES: &[&str] = &[
    "You're welcome! I'm here to help.",
    "No problem at all! I'm here to support you.",
    "You're welcome! I'm glad I could be of help.",
    "You're welcome! I'm always here to listen.",
];

const HAPPINESS_WORDS: &[&str] = &[
    "happy", "joyful", "excited", "good", "great", "elated", "thrilled",
];

const HAPPINESS_REPLIES: &[&str] = &[
    "That’s wonderful to hear! What has made you feel so {1}?",
    "I'm delighted to hear you're {1}. What has brought this about?",
    "That sounds fantastic! Can you tell me about what's making you feel so {1}?",
    "This is something to celebrate! What has happened to make you feel {1}?",
];

const SADNESS_WORDS: &[&str] = &["sad", "down", "unhappy", "depressed", "upset", "miserable"];

const SADNESS_REPLIES: &[&str] = &[
    "I'm really sorry to hear you're feeling {1}. Can you share why you're feeling this way?",
    "It’s okay to feel {1}. Can you share what’s been going on?",
    "That sounds really hard. What’s been making you feel {1}?",
    "I’m here to listen if you want to talk about why you’re feeling {1}.",
];

const EMOTIONAL_WORDS: &[&str] = &[
    "angry",
    "frustrated",
    "bored",
    "tired",
    "anxious",
    "stressed",
    "lonely",
    "nervous",
    "scared",
    "confused",
];

const EMOTIONAL_REPLIES: &[&str] = &[
    "It’s okay to feel {1}. Can you tell me more about it?",
    "Why do you feel {1}? Has something happened recently?",
    "That must be difficult. What is causing you to feel {1}?",
    "It’s understandable to feel {1} sometimes. Would you like to share why you feel that way?",
];

const NEGATIVE_WORDS: &[&str] = &["no", "nothing", "i don't know", "not really"];

const NEGATIVE_REPLIES: &[&str] = &[
    "That's okay. It’s alright if you’re not ready to share. Is there anything else I can help with?",
    "I’m here to listen whenever you’re ready.",
    "Take your time. You don’t have to talk about it if you don’t want to.",
    "Sometimes it’s hard to talk about things, and that’s okay.",
];

const POSITIVE_WORDS: &[&str] = &[
    "yes",
    "yeah",
    "definitely",
    "absolutely",
    "sure",
    "of course",
    "okay",
    "alright",
];

const POSITIVE_REPLIES: &[&str] = &[
    "I'm glad you're willing to share. Can you tell me more about what you are feeling?",
    "It helps to talk things through. What other feelings would you like to share?",
    "I appreciate you sharing with me. Can you tell me more about how you're feeling?",
];

const UNKNOWN_REPLIES: &[&str] = &[
    "I'm not quite sure I understand. Could you tell me how you're feeling?",
    "I want to help, but I'm having trouble following. Could you share what emotions you're experiencing?",
    "I'm not sure I caught that. Do you want to tell me more about how you're feeling?",
];

fn sadness_follow_up() -> FollowUpScript {
    FollowUpScript::new(
        &[
            "I'm so sorry to hear that. How has this been affecting you?",
            "That sounds really hard. Can you tell me more about how you're feeling?",
            "It must be tough to go through this. How have you been coping so far?",
        ],
        &[
            "It sounds like you're going through a lot. How are you taking care of yourself?",
            "It's okay to feel overwhelmed sometimes. What's been helping you manage this?",
            "That must be very difficult. Is there anything that's brought you comfort during this time?",
        ],
        &[
            "I hope you can feel better soon, can I help you in any other way?",
            "Just take everything one step at a time, you will feel better eventually, I know it. Are there any other feelings you'd like to share?",
        ],
    )
}

fn happiness_follow_up() -> FollowUpScript {
    FollowUpScript::new(
        &[
            "That's wonderful news! What's been the highlight of it so far?",
            "It's great to hear you're feeling this way. What else has been going well for you?",
            "Happiness is precious! Can you tell me more about it?",
        ],
        &[
            "I love hearing about positive moments. What's on your mind now?",
            "That's brilliant, has anything else brought you joy recently?",
            "Let's keep this positivity going! What else would you like to share that has made you feel good?",
        ],
        &[
            "I'm glad to hear that. Are there any other feelings you'd like to share?",
            "It's great that you're feeling this way, have you any other feelings you'd like to talk about?",
        ],
    )
}

fn emotional_follow_up() -> FollowUpScript {
    FollowUpScript::new(
        &[
            "I see. How has feeling {1} been affecting you?",
            "It's okay to feel {1}. Can you share what's been going on?",
            "What do you think has been causing you to feel {1}?",
        ],
        &[
            "That must be challenging. How have you been managing feeling {1}?",
            "Sometimes feeling {1} can be difficult. How are you coping with it?",
            "It's okay to talk about feeling {1}. What's been helping you through this?",
        ],
        &[
            "It's okay to share what's on your mind. Are there any other feelings you'd like to discuss?",
            "Just take things one step at a time, that will help you manage all this. Has there been anything else on your mind recently?",
        ],
    )
}

/// Rules in match order. Happiness is declared before sadness, so "not good" reads as happy.
pub fn builtin_rules() -> Result<Vec<Rule>, RuleError> {
    Ok(vec![
        Rule::keywords("greeting", Category::General, GREETING_WORDS, GREETING_REPLIES)?,
        Rule::keywords("goodbye", Category::Farewell, GOODBYE_WORDS, GOODBYE_REPLIES)?,
        Rule::keywords("gratitude", Category::Gratitude, GRATITUDE_WORDS, GRATITUDE_REPLIES)?,
        Rule::keywords("happiness", Category::Happiness, HAPPINESS_WORDS, HAPPINESS_REPLIES)?
            .with_follow_up(happiness_follow_up()),
        Rule::keywords("sadness", Category::Sadness, SADNESS_WORDS, SADNESS_REPLIES)?
            .with_follow_up(sadness_follow_up()),
        Rule::keywords("emotional", Category::Emotional, EMOTIONAL_WORDS, EMOTIONAL_REPLIES)?
            .with_follow_up(emotional_follow_up()),
        Rule::keywords(
            "negative_response",
            Category::Negation,
            NEGATIVE_WORDS,
            NEGATIVE_REPLIES,
        )?,
        Rule::keywords(
            "positive_response",
            Category::Affirmation,
            POSITIVE_WORDS,
            POSITIVE_REPLIES,
        )?,
        Rule::fallback("unknown", UNKNOWN_REPLIES),
    ])
}
