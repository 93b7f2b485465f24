pub mod idea;
pub mod vote;
