use std::time::Duration;

pub(crate) const BATCH_TRANSLATION_DELAY: Duration = Duration::from_millis(100);

pub const NOT_CONFIGURED_MESSAGE: &str = "Thank you for your question! To get AI-powered responses, please configure the legal backend, the completion service or the translation suite. For now, I recommend consulting with a legal professional for specific legal advice.";
pub const NOT_CONFIGURED_WARNING: &str = "API services not configured";

pub const EMPTY_QUERY_MESSAGE: &str = "Please type or record your question to get started.";
pub const EMPTY_QUERY_WARNING: &str = "Empty query";

pub const TYPE_YOUR_QUESTION_MESSAGE: &str = "We could not understand the recording. Please type your question instead.";

pub const TRANSLATION_FAILED_MESSAGE: &str = "We could not translate your question for our legal assistant, so it was not sent. Please try again in a moment or ask your question in English.";
pub const PIVOT_TRANSLATION_WARNING: &str = "Question translation failed";

pub const AI_UNAVAILABLE_MESSAGE: &str = "I apologize, but I'm unable to process your query at the moment. For legal advice, please consult with a qualified legal professional or visit your nearest legal aid center.";
pub const AI_UNAVAILABLE_WARNING: &str = "AI service unavailable";

pub const FALLBACK_WARNING: &str = "Knowledge backend unavailable, answered with the direct completion fallback";
pub const RESPONSE_TRANSLATION_WARNING: &str = "Translation failed, returning response in English";
pub const TRANSLATION_NOT_CONFIGURED_WARNING: &str = "Translation service not configured, returning response in English";
