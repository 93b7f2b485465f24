// Daily vote ledger and the score aggregate derived from it.

pub mod handlers;
pub mod ledger;
pub mod scoring;
