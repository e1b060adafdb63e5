pub mod analyze;
pub mod chat;
pub mod followup;
pub mod ping;
