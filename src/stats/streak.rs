use crate::scores::models::GameRecord;

/// Longest run of consecutive wins in an already ordered outcome sequence
pub fn longest_run<I>(outcomes: I) -> u32
where
    I: IntoIterator<Item = bool>,
{
    let mut longest = 0;
    let mut current = 0;

    for is_win in outcomes {
        if is_win {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }

    longest
}

/// Longest win streak of a user's records in chronological order.
///
/// The sort is stable, so records sharing a `created_at` keep the order the store
/// returned them in.
pub fn longest_streak(records: &[GameRecord]) -> u32 {
    let mut ordered: Vec<&GameRecord> = records.iter().collect();
    ordered.sort_by_key(|record| record.created_at);

    longest_run(ordered.into_iter().map(|record| record.is_win))
}
