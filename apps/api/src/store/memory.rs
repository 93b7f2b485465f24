use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::idea::{IdeaChanges, IdeaRow, NewIdea};
use crate::models::vote::VoteEventRow;
use crate::store::IdeaStore;
use crate::votes::ledger::{Ballot, VoteOutcome};

#[derive(Default)]
struct Tables {
    ideas: Vec<IdeaRow>,
    votes: Vec<VoteEventRow>,
}

/// Store backed by two vectors behind one lock; every call is atomic.
#[derive(Default)]
pub struct MemoryIdeaStore {
    tables: Mutex<Tables>,
}

impl MemoryIdeaStore {
    pub async fn idea_count(&self) -> usize {
        self.tables.lock().await.ideas.len()
    }

    pub async fn vote_count(&self) -> usize {
        self.tables.lock().await.votes.len()
    }

    /// All ideas in insertion order.
    pub async fn all_ideas(&self) -> Vec<IdeaRow> {
        self.tables.lock().await.ideas.clone()
    }
}

fn to_row(idea: NewIdea) -> IdeaRow {
    IdeaRow {
        id: Uuid::new_v4(),
        user_id: idea.user_id,
        title: idea.title,
        content: idea.content,
        status: idea.status,
        score: 0,
        created_at: idea.created_at,
        updated_at: idea.created_at,
    }
}

/// Same shape as `upsert_vote`: the voter's event for that day is overwritten in place.
fn apply_ballot(events: &mut Vec<VoteEventRow>, ballot: &Ballot) -> VoteEventRow {
    let existing = events.iter_mut().find(|e| {
        e.idea_id == ballot.idea_id && e.user_id == ballot.voter && e.vote_day == ballot.day
    });
    if let Some(event) = existing {
        event.value = ballot.value.as_i16();
        event.updated_at = ballot.at;
        return event.clone();
    }

    let event = VoteEventRow {
        id: Uuid::new_v4(),
        idea_id: ballot.idea_id,
        user_id: ballot.voter,
        value: ballot.value.as_i16(),
        vote_day: ballot.day,
        created_at: ballot.at,
        updated_at: ballot.at,
    };
    events.push(event.clone());
    event
}

/// Full recompute over every day's events, like `recompute_score`.
fn refresh_cached_score(idea: &mut IdeaRow, events: &[VoteEventRow]) -> i64 {
    idea.score = events
        .iter()
        .filter(|e| e.idea_id == idea.id)
        .map(|e| i64::from(e.value))
        .sum();
    idea.score
}

/// Lowercased alphanumeric tokens, split the way the `simple` text-search parser splits.
fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

/// Every search term must equal a whole word of the title or content, ignoring case.
fn matches_search(idea: &IdeaRow, search: &str) -> bool {
    let haystack: Vec<String> = words(&idea.title)
        .chain(words(idea.content.as_deref().unwrap_or_default()))
        .collect();
    let mut terms = words(search).peekable();
    terms.peek().is_some() && terms.all(|term| haystack.contains(&term))
}

#[async_trait]
impl IdeaStore for MemoryIdeaStore {
    async fn insert_idea(&self, idea: NewIdea) -> Result<IdeaRow, AppError> {
        let row = to_row(idea);
        self.tables.lock().await.ideas.push(row.clone());
        Ok(row)
    }

    async fn insert_batch(&self, ideas: Vec<NewIdea>) -> Result<u64, AppError> {
        let mut tables = self.tables.lock().await;
        let count = ideas.len() as u64;
        tables.ideas.extend(ideas.into_iter().map(to_row));
        Ok(count)
    }

    async fn get_idea(&self, id: Uuid) -> Result<Option<IdeaRow>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables.ideas.iter().find(|i| i.id == id).cloned())
    }

    async fn update_idea(&self, id: Uuid, changes: IdeaChanges) -> Result<IdeaRow, AppError> {
        let mut tables = self.tables.lock().await;
        let idea = tables
            .ideas
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Idea {id} not found")))?;
        idea.title = changes.title;
        idea.content = changes.content;
        idea.status = changes.status;
        idea.updated_at = changes.updated_at;
        Ok(idea.clone())
    }

    async fn delete_idea(&self, id: Uuid) -> Result<(), AppError> {
        let mut tables = self.tables.lock().await;
        let before = tables.ideas.len();
        tables.ideas.retain(|i| i.id != id);
        if tables.ideas.len() == before {
            return Err(AppError::NotFound(format!("Idea {id} not found")));
        }
        tables.votes.retain(|v| v.idea_id != id);
        Ok(())
    }

    async fn record_vote(&self, ballot: Ballot) -> Result<VoteOutcome, AppError> {
        let mut guard = self.tables.lock().await;
        let Tables { ideas, votes } = &mut *guard;

        let idea = ideas
            .iter_mut()
            .find(|i| i.id == ballot.idea_id)
            .ok_or_else(|| AppError::NotFound(format!("Idea {} not found", ballot.idea_id)))?;

        let vote = apply_ballot(votes, &ballot);
        let score = refresh_cached_score(idea, votes.as_slice());
        Ok(VoteOutcome { vote, score })
    }

    async fn find_ideas(
        &self,
        owner: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<IdeaRow>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .ideas
            .iter()
            .filter(|i| i.user_id == owner)
            .filter(|i| search.map_or(true, |q| matches_search(i, q)))
            .cloned()
            .collect())
    }

    async fn votes_on_day(
        &self,
        voter: Uuid,
        day: NaiveDate,
        idea_ids: &[Uuid],
    ) -> Result<Vec<VoteEventRow>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .votes
            .iter()
            .filter(|v| v.user_id == voter && v.vote_day == day && idea_ids.contains(&v.idea_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::*;
    use crate::models::idea::IdeaStatus;
    use crate::votes::ledger::VoteValue;

    fn idea(title: &str, content: Option<&str>) -> IdeaRow {
        to_row(NewIdea {
            user_id: Uuid::new_v4(),
            title: title.to_string(),
            content: content.map(String::from),
            status: IdeaStatus::Draft,
            created_at: Utc::now(),
        })
    }

    fn event(idea_id: Uuid, value: i16, day: u32) -> VoteEventRow {
        let at = Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap();
        VoteEventRow {
            id: Uuid::new_v4(),
            idea_id,
            user_id: Uuid::new_v4(),
            value,
            vote_day: at.date_naive(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_search_matches_title_case_insensitively() {
        assert!(matches_search(&idea("Test High", None), "test"));
    }

    #[test]
    fn test_search_matches_content() {
        assert!(matches_search(&idea("Other", Some("rust parser")), "Parser"));
    }

    #[test]
    fn test_search_requires_every_term() {
        let i = idea("Rust parser", None);
        assert!(matches_search(&i, "rust parser"));
        assert!(!matches_search(&i, "rust compiler"));
    }

    #[test]
    fn test_search_matches_whole_words_only() {
        let i = idea("Rust parser", Some("state-machine based"));
        assert!(!matches_search(&i, "pars"));
        assert!(matches_search(&i, "machine"));
    }

    #[test]
    fn test_search_without_terms_matches_nothing() {
        assert!(!matches_search(&idea("Rust parser", None), "!!"));
    }

    #[test]
    fn test_apply_ballot_replaces_same_day_vote() {
        let mut events = Vec::new();
        let idea_id = Uuid::new_v4();
        let voter = Uuid::new_v4();
        let morning = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let ballot = |value, at: DateTime<Utc>| Ballot {
            idea_id,
            voter,
            value,
            day: at.date_naive(),
            at,
        };

        let first = apply_ballot(&mut events, &ballot(VoteValue::Up, morning));
        let second = apply_ballot(
            &mut events,
            &ballot(VoteValue::Down, morning + Duration::hours(3)),
        );

        assert_eq!(events.len(), 1);
        assert_eq!(first.id, second.id);
        assert_eq!(second.value, -1);
        assert_eq!(second.created_at, morning);
    }

    #[test]
    fn test_refresh_ignores_other_ideas_and_heals_drift() {
        let mut mine = idea("t", None);
        mine.score = 42; // stale cache
        let events = vec![
            event(mine.id, 1, 1),
            event(Uuid::new_v4(), -1, 1),
            event(mine.id, 1, 2),
        ];

        assert_eq!(refresh_cached_score(&mut mine, &events), 2);
        assert_eq!(mine.score, 2);
    }

    #[test]
    fn test_refresh_with_no_events_is_zero() {
        let mut fresh = idea("t", None);
        assert_eq!(refresh_cached_score(&mut fresh, &[]), 0);
    }

    #[tokio::test]
    async fn test_delete_cascades_votes() {
        let store = MemoryIdeaStore::default();
        let row = store
            .insert_idea(NewIdea {
                user_id: Uuid::new_v4(),
                title: "Doomed".to_string(),
                content: None,
                status: IdeaStatus::Draft,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        let now = Utc::now();
        store
            .record_vote(Ballot {
                idea_id: row.id,
                voter: Uuid::new_v4(),
                value: VoteValue::Up,
                day: now.date_naive(),
                at: now,
            })
            .await
            .unwrap();

        store.delete_idea(row.id).await.unwrap();

        assert_eq!(store.idea_count().await, 0);
        assert_eq!(store.vote_count().await, 0);
    }
}
