use chrono::{DateTime, Utc};

use crate::models::{FetchState, Story};
use crate::search::filter_stories;

/// Placeholder cards drawn while the front page is loading.
pub const PLACEHOLDER_CARDS: usize = 5;

/// What the story list should draw this frame.
#[derive(Debug, PartialEq)]
pub enum StoryListView<'a> {
    Placeholders(usize),
    ErrorLine(&'a str),
    Cards(Vec<&'a Story>),
}

pub fn story_list_view<'a>(state: &'a FetchState, search_term: &str) -> StoryListView<'a> {
    match state {
        FetchState::Loading => StoryListView::Placeholders(PLACEHOLDER_CARDS),
        FetchState::Error(message) => StoryListView::ErrorLine(message),
        FetchState::Success(stories) => StoryListView::Cards(filter_stories(stories, search_term)),
    }
}

pub fn error_line(message: &str) -> String {
    format!("Error: {message}")
}

pub fn upvotes_label(points: i64) -> String {
    format!("Upvotes: {points}")
}

/// `None` when there is no active search.
pub fn match_summary(shown: usize, total: usize, search_term: &str) -> Option<String> {
    if search_term.is_empty() {
        return None;
    }
    let noun = if total == 1 { "story" } else { "stories" };
    Some(format!("Showing {shown} of {total} {noun}"))
}

/// Author, age and comment count for the card's second row.
pub fn story_meta(story: &Story, now: DateTime<Utc>) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(author) = &story.author {
        parts.push(format!("by {author}"));
    }
    if let Some(created_at) = story.created_at {
        parts.push(time_ago(created_at, now));
    }
    if let Some(comments) = story.num_comments {
        parts.push(plural(comments as i64, "comment"));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" · "))
    }
}

pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    if secs < 60 {
        return "just now".to_string();
    }

    let minutes = secs / 60;
    if minutes < 60 {
        return format!("{} ago", plural(minutes, "minute"));
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{} ago", plural(hours, "hour"));
    }

    format!("{} ago", plural(hours / 24, "day"))
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}
