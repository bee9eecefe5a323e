use std::sync::Arc;

use career_quiz_core::{AssessmentService, Controller, Region, Settings, ViewState};
use ratatui::widgets::ListState;

pub struct App {
    pub should_quit: bool,

    // Quiz state; the view model is what gets rendered
    pub controller: Controller,
    pub view: ViewState,
    pub service: Arc<dyn AssessmentService>,
    pub server_url: String,

    // Start view input
    pub career_input: String,
    pub career_cursor: usize,

    // List selection for the resources and results panels
    pub resources_state: ListState,
    pub results_state: ListState,

    pub animation_frame: u8,
}

impl App {
    pub fn new(settings: &Settings, service: Arc<dyn AssessmentService>, career: Option<String>) -> Self {
        let career_input = career.unwrap_or_default();
        let career_cursor = career_input.chars().count();

        Self {
            should_quit: false,
            controller: Controller::new(settings.total_questions),
            view: ViewState::new(),
            service,
            server_url: settings.server_url.clone(),
            career_input,
            career_cursor,
            resources_state: ListState::default(),
            results_state: ListState::default(),
            animation_frame: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.view.is_visible(Region::Loading)
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    /// Reset list selections after the lists were repopulated.
    pub fn sync_lists(&mut self) {
        let resources = self.view.list(Region::ResourcesPanel).len();
        self.resources_state
            .select(if resources == 0 { None } else { Some(0) });

        let results = self.view.list(Region::Results).len();
        self.results_state
            .select(if results == 0 { None } else { Some(0) });
    }

    /// The list that j/k currently move through.
    fn active_list(&mut self) -> Option<(&mut ListState, usize)> {
        if self.view.is_visible(Region::ResultsView) {
            let len = self.view.list(Region::Results).len();
            Some((&mut self.results_state, len))
        } else if self.view.is_visible(Region::ResourcesPanel) {
            let len = self.view.list(Region::ResourcesPanel).len();
            Some((&mut self.resources_state, len))
        } else {
            None
        }
    }

    pub fn list_down(&mut self) {
        if let Some((state, len)) = self.active_list() {
            if len > 0 {
                let i = state.selected().map_or(0, |i| (i + 1).min(len - 1));
                state.select(Some(i));
            }
        }
    }

    pub fn list_up(&mut self) {
        if let Some((state, len)) = self.active_list() {
            if len > 0 {
                let i = state.selected().map_or(0, |i| i.saturating_sub(1));
                state.select(Some(i));
            }
        }
    }
}
