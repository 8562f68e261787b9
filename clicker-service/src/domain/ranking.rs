use shared::ScoreEntry;

pub const TOP_SCORES_LIMIT: usize = 5;

/// Appends `candidate`, stable-sorts by score descending and keeps the first
/// [`TOP_SCORES_LIMIT`] entries.
///
/// Equal scores keep their relative order, so a newcomer tying an existing
/// entry ranks below it.
pub fn merge_into_top(mut current: Vec<ScoreEntry>, candidate: ScoreEntry) -> Vec<ScoreEntry> {
    current.push(candidate);
    current.sort_by(|a, b| b.score.cmp(&a.score));
    current.truncate(TOP_SCORES_LIMIT);
    current
}
