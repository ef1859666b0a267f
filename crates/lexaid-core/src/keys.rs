//! Storage key layout. Everything the client persists lives under the
//! `lexaid:` prefix so adapters can enumerate or clear it wholesale.

pub const PREFIX: &str = "lexaid:";

pub const SESSION: &str = "lexaid:session";
pub const HISTORY_INDEX: &str = "lexaid:history";
pub const PREFERENCES: &str = "lexaid:prefs";
pub const NEWS_SUBSCRIPTION: &str = "lexaid:news:subscription";
pub const FAQ_SEARCHES: &str = "lexaid:faq:searches";
pub const FAQ_FEEDBACK: &str = "lexaid:faq:feedback";

pub fn transcript(session_id: &str) -> String {
    format!("lexaid:transcript:{}", session_id)
}
