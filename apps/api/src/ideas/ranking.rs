use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::idea::IdeaRow;
use crate::models::vote::VoteEventRow;
use crate::store::IdeaStore;
use crate::votes::ledger::DayBoundary;

/// An idea as listed to its owner, with the caller's vote state for today.
#[derive(Debug, Clone, Serialize)]
pub struct IdeaView {
    #[serde(flatten)]
    pub idea: IdeaRow,
    pub user_vote: Option<i16>,
    pub can_vote: bool,
}

/// Score descending, then newest first; id keeps equal rows stable.
pub fn rank_order(a: &IdeaRow, b: &IdeaRow) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}

/// Pairs each ranked idea with the caller's vote from today, if any.
pub fn with_vote_state(ideas: Vec<IdeaRow>, today: &[VoteEventRow]) -> Vec<IdeaView> {
    let votes: HashMap<Uuid, i16> = today.iter().map(|v| (v.idea_id, v.value)).collect();
    ideas
        .into_iter()
        .map(|idea| {
            let user_vote = votes.get(&idea.id).copied();
            IdeaView {
                idea,
                user_vote,
                can_vote: user_vote.is_none(),
            }
        })
        .collect()
}

/// Lists `owner`'s ideas in rank order, optionally narrowed by a text search.
pub async fn list_ideas(
    store: &dyn IdeaStore,
    owner: Uuid,
    search: Option<&str>,
    now: DateTime<Utc>,
    boundary: DayBoundary,
) -> Result<Vec<IdeaView>, AppError> {
    let search = search.map(str::trim).filter(|q| !q.is_empty());

    let mut ideas = store.find_ideas(owner, search).await?;
    ideas.sort_by(rank_order);

    let ids: Vec<Uuid> = ideas.iter().map(|i| i.id).collect();
    let today = if ids.is_empty() {
        Vec::new()
    } else {
        store
            .votes_on_day(owner, boundary.day_of(now), &ids)
            .await?
    };

    Ok(with_vote_state(ideas, &today))
}
