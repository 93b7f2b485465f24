// Idea lifecycle: bulk import (line classifier -> markdown parser -> batch
// normalizer), single-idea editing, and the ranked listing.

pub mod batch;
pub mod editing;
pub mod handlers;
pub mod lines;
pub mod markdown;
pub mod ranking;
