//! Derived view state. Everything here is a pure function of store state.

use super::api_key::ApiKeyState;
use super::collections::SourceConnectionMap;
use super::dialog::DialogState;
use crate::api::models::{Collection, Source};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleProject {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
}

pub const EXAMPLE_PROJECTS: &[ExampleProject] = &[
    ExampleProject {
        id: 1,
        title: "Integrate Google Drive",
        description: "This is an example project",
    },
    ExampleProject {
        id: 2,
        title: "Informed Langraph Agent",
        description: "This is an example project",
    },
    ExampleProject {
        id: 3,
        title: "White label react app",
        description: "This is an example project",
    },
    ExampleProject {
        id: 4,
        title: "Custom SQL Integration",
        description: "This is an example project",
    },
    ExampleProject {
        id: 5,
        title: "Notion Knowledge Base",
        description: "This is an example project",
    },
];

/// What a panel should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    /// Nothing to show yet and a request is in flight
    Loading,
    Empty,
    Ready,
}

impl PanelState {
    fn derive(loading: bool, len: usize) -> Self {
        match (loading, len) {
            (true, 0) => PanelState::Loading,
            (false, 0) => PanelState::Empty,
            _ => PanelState::Ready,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionsPanel {
    pub loading: bool,
    /// First collections in store order
    pub top: Vec<Collection>,
    pub total: usize,
    /// Connections already fetched for the collections in `top`
    pub connections: SourceConnectionMap,
}

impl CollectionsPanel {
    pub fn state(&self) -> PanelState {
        PanelState::derive(self.loading, self.total)
    }

    pub fn has_more(&self) -> bool {
        self.total > self.top.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourcesPanel {
    pub loading: bool,
    pub sources: Vec<Source>,
}

impl SourcesPanel {
    pub fn state(&self) -> PanelState {
        PanelState::derive(self.loading, self.sources.len())
    }
}

/// Snapshot of everything the dashboard shows
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub collections: CollectionsPanel,
    pub sources: SourcesPanel,
    pub api_key: ApiKeyState,
    pub example_projects: &'static [ExampleProject],
    pub dialog: DialogState,
}

/// The first `n` collections, never re-sorted
pub fn top_collections(collections: &[Collection], n: usize) -> Vec<Collection> {
    collections.iter().take(n).cloned().collect()
}

/// Sources ascending by display name
pub fn sort_sources(sources: &[Source]) -> Vec<Source> {
    let mut sorted = sources.to_vec();
    sorted.sort_by(|a, b| compare_display_names(&a.name, &b.name));
    sorted
}

/// Case- and accent-insensitive ordering.
///
/// Names are compared on their folded form first ("Élan" sorts with the
/// e's), then on the lowercase form so accented spellings follow plain
/// ones, and finally lowercase before uppercase. Only Latin letters are
/// folded; other scripts compare by code point.
pub fn compare_display_names(a: &str, b: &str) -> Ordering {
    sort_key(a)
        .cmp(&sort_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

fn sort_key(name: &str) -> String {
    name.to_lowercase().chars().map(fold_latin).collect()
}

fn fold_latin(c: char) -> char {
    match c {
        'à'..='å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è'..='ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ĥ' | 'ħ' => 'h',
        'ì'..='ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ĵ' => 'j',
        'ķ' => 'k',
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò'..='ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'ţ' | 'ť' | 'ŧ' => 't',
        'ù'..='ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ŵ' => 'w',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}
