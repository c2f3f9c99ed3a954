use serde::Serialize;

use crate::types::{Movie, MovieResult, Tv};

pub const POPULAR_TITLE: &str = "Popular Movies";
pub const UPCOMING_TITLE: &str = "Upcoming Movies";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "layout", content = "title", rename_all = "lowercase")]
pub enum Section {
    /// Two-column grid.
    Double,
    Banner,
    Horizontal(String),
    Vertical(String),
}

impl Section {
    pub fn title(&self) -> Option<&str> {
        match self {
            Section::Horizontal(t) | Section::Vertical(t) => Some(t),
            Section::Double | Section::Banner => None,
        }
    }
}

/// Card data shared by TV and movie entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    pub id: u64,
    pub title: String,
    pub vote: String,
    pub overview: String,
    pub poster_url: String,
    pub date: String,
}

impl From<&Tv> for Content {
    fn from(t: &Tv) -> Self {
        Self {
            id: t.id,
            title: t.name.clone(),
            vote: t.vote.clone(),
            overview: t.overview.clone(),
            poster_url: t.poster_url.clone(),
            date: t.first_air_date.clone(),
        }
    }
}

impl From<&Movie> for Content {
    fn from(m: &Movie) -> Self {
        Self {
            id: m.id,
            title: m.title.clone(),
            vote: m.vote.clone(),
            overview: m.overview.clone(),
            poster_url: m.poster_url.clone(),
            date: m.release_date.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "style", content = "data", rename_all = "snake_case")]
pub enum Item {
    Normal(Content),
    BigImage(Movie),
    List(Movie),
}

impl Item {
    pub fn title(&self) -> &str {
        match self {
            Item::Normal(c) => &c.title,
            Item::BigImage(m) | Item::List(m) => &m.title,
        }
    }
}

/// Ordered sections of ordered items, ready for a presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub sections: Vec<(Section, Vec<Item>)>,
}

impl Snapshot {
    pub fn from_tv(items: &[Tv]) -> Self {
        let cards = items.iter().map(|t| Item::Normal(Content::from(t))).collect();
        Self { sections: vec![(Section::Double, cards)] }
    }

    pub fn from_movies(result: &MovieResult) -> Self {
        let banner = result.now_playing.results.iter().cloned().map(Item::BigImage).collect();
        let popular = result.popular.results.iter().map(|m| Item::Normal(Content::from(m))).collect();
        let upcoming = result.upcoming.results.iter().cloned().map(Item::List).collect();
        Self {
            sections: vec![
                (Section::Banner, banner),
                (Section::Horizontal(POPULAR_TITLE.to_string()), popular),
                (Section::Vertical(UPCOMING_TITLE.to_string()), upcoming),
            ],
        }
    }

    pub fn is_empty(&self) -> bool { self.sections.iter().all(|(_, items)| items.is_empty()) }

    pub fn item_count(&self) -> usize { self.sections.iter().map(|(_, items)| items.len()).sum() }

    pub fn section(&self, section: &Section) -> Option<&[Item]> {
        self.sections.iter().find(|(s, _)| s == section).map(|(_, items)| items.as_slice())
    }
}
