//! View-model capabilities the controller drives.
//!
//! The controller never knows how a region is drawn. It only shows, hides,
//! and fills named regions; a presentation adapter decides the rest.

use std::collections::{HashMap, HashSet};

use crate::protocol::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    StartView,
    QuestionView,
    ResultsView,
    Loading,
    /// Synchronous feedback on the start view.
    Notice,
    Stage,
    Message,
    Question,
    AnswerPanel,
    ResourcesPanel,
    Results,
    RevealControl,
    CorrectControl,
    IncorrectControl,
    RetryControl,
}

/// The capability set a presentation adapter offers the controller.
pub trait View {
    fn show(&mut self, region: Region);
    fn hide(&mut self, region: Region);
    fn set_text(&mut self, region: Region, text: &str);
    fn set_list(&mut self, region: Region, items: &[Resource]);
}

/// In-memory view model. The terminal UI renders from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    visible: HashSet<Region>,
    text: HashMap<Region, String>,
    lists: HashMap<Region, Vec<Resource>>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        let mut visible = HashSet::new();
        visible.insert(Region::StartView);
        Self {
            visible,
            text: HashMap::new(),
            lists: HashMap::new(),
        }
    }

    pub fn is_visible(&self, region: Region) -> bool {
        self.visible.contains(&region)
    }

    pub fn text(&self, region: Region) -> &str {
        self.text.get(&region).map(String::as_str).unwrap_or("")
    }

    pub fn list(&self, region: Region) -> &[Resource] {
        self.lists.get(&region).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl View for ViewState {
    fn show(&mut self, region: Region) {
        self.visible.insert(region);
    }

    fn hide(&mut self, region: Region) {
        self.visible.remove(&region);
    }

    fn set_text(&mut self, region: Region, text: &str) {
        if text.is_empty() {
            self.text.remove(&region);
        } else {
            self.text.insert(region, text.to_string());
        }
    }

    fn set_list(&mut self, region: Region, items: &[Resource]) {
        if items.is_empty() {
            self.lists.remove(&region);
        } else {
            self.lists.insert(region, items.to_vec());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_start_view() {
        let view = ViewState::new();
        assert!(view.is_visible(Region::StartView));
        assert!(!view.is_visible(Region::QuestionView));
        assert!(!view.is_visible(Region::Loading));
        assert_eq!(view.text(Region::Question), "");
        assert!(view.list(Region::Results).is_empty());
    }

    #[test]
    fn empty_list_clears_region() {
        let mut view = ViewState::new();
        let item = Resource {
            kind: "job".into(),
            title: "Line cook".into(),
            link: None,
        };
        view.set_list(Region::ResourcesPanel, &[item]);
        assert_eq!(view.list(Region::ResourcesPanel).len(), 1);
        view.set_list(Region::ResourcesPanel, &[]);
        assert!(view.list(Region::ResourcesPanel).is_empty());
    }
}
