pub mod chat;
pub mod health;
pub mod preferences;
pub mod summaries;
pub mod summarize;
