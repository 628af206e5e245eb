use crate::models::Story;

/// Stories whose title contains `term`, ignoring case, in their original order.
///
/// The term is used as typed: no trimming and no tokenizing, so an empty term
/// keeps every story.
pub fn filter_stories<'a>(stories: &'a [Story], term: &str) -> Vec<&'a Story> {
    let needle = term.to_lowercase();
    stories
        .iter()
        .filter(|story| story.title.to_lowercase().contains(&needle))
        .collect()
}
