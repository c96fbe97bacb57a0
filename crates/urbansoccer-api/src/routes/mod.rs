//! Route modules organized by bounded context.

pub mod campaigns;
pub mod health;
pub mod players;
