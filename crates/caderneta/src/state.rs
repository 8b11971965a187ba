//! Session state for the client.
//!
//! All mutable session data lives in [`AppState`] and is changed only through
//! named update functions, so the flows stay testable without a terminal or a
//! live backend.

use crate::types::{subject_name, Activity, AnalysisResult, Child, Goal, Subject};

/// Lifecycle of one detail panel. Each panel degrades independently: a failed
/// goals fetch never blanks a successful activities fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel<T> {
    /// Nothing to show (no child selected, or nothing requested yet).
    Empty,
    /// A fetch is in flight.
    Loading,
    /// Data arrived.
    Ready(T),
    /// The fetch failed; the panel shows its error placeholder.
    Failed,
}

impl<T> Default for Panel<T> {
    fn default() -> Self {
        Panel::Empty
    }
}

/// The detail tabs. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Goals,
    Activities,
    Report,
    Analysis,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Goals, Tab::Activities, Tab::Report, Tab::Analysis];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Goals => "Metas",
            Tab::Activities => "Atividades",
            Tab::Report => "Relatório",
            Tab::Analysis => "Análise",
        }
    }

    /// Parse a tab name as typed in the shell (accent-free accepted).
    pub fn parse(input: &str) -> Option<Tab> {
        match input.trim().to_lowercase().as_str() {
            "metas" => Some(Tab::Goals),
            "atividades" => Some(Tab::Activities),
            "relatorio" | "relatório" => Some(Tab::Report),
            "analise" | "análise" => Some(Tab::Analysis),
            _ => None,
        }
    }
}

impl Default for Tab {
    fn default() -> Self {
        Tab::Goals
    }
}

/// In-memory mirror of the session: cached reference data, the current
/// selection, the detail panels, and the in-flight guards.
#[derive(Debug, Default)]
pub struct AppState {
    children: Vec<Child>,
    subjects: Vec<Subject>,
    current_child: Option<String>,
    goals: Panel<Vec<Goal>>,
    activities: Panel<Vec<Activity>>,
    analysis: Panel<AnalysisResult>,
    report_status: Option<String>,
    active_tab: Tab,
    report_busy: bool,
    analysis_busy: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- read access ----

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn current_child_id(&self) -> Option<&str> {
        self.current_child.as_deref()
    }

    /// The selected child, if the selection is set and still in the cache.
    pub fn selected_child(&self) -> Option<&Child> {
        let id = self.current_child.as_deref()?;
        self.children.iter().find(|c| c.id == id)
    }

    pub fn goals(&self) -> &Panel<Vec<Goal>> {
        &self.goals
    }

    pub fn activities(&self) -> &Panel<Vec<Activity>> {
        &self.activities
    }

    pub fn analysis(&self) -> &Panel<AnalysisResult> {
        &self.analysis
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn subject_name(&self, subject_id: &str) -> &str {
        subject_name(&self.subjects, subject_id)
    }

    // ---- reference data ----

    pub fn set_children(&mut self, children: Vec<Child>) {
        self.children = children;
    }

    pub fn set_subjects(&mut self, subjects: Vec<Subject>) {
        self.subjects = subjects;
    }

    /// Append a freshly created child to the cache. The server owns identity;
    /// the cache is never merged or de-duplicated locally.
    pub fn insert_child(&mut self, child: Child) {
        self.children.push(child);
    }

    // ---- selection ----

    /// Select a child by id. Resets both detail panels to `Loading`, discards
    /// any previous analysis and report status, and returns the tab selection
    /// to the first tab. Returns `false` if the id is not in the cache.
    pub fn select_child(&mut self, id: &str) -> bool {
        if !self.children.iter().any(|c| c.id == id) {
            return false;
        }
        self.current_child = Some(id.to_string());
        self.goals = Panel::Loading;
        self.activities = Panel::Loading;
        self.analysis = Panel::Empty;
        self.report_status = None;
        self.active_tab = Tab::Goals;
        true
    }

    /// Drop the selection. Detail views are visible iff a child is selected.
    pub fn clear_selection(&mut self) {
        self.current_child = None;
        self.goals = Panel::Empty;
        self.activities = Panel::Empty;
        self.analysis = Panel::Empty;
        self.report_status = None;
    }

    // ---- panel updates ----

    pub fn set_goals(&mut self, goals: Vec<Goal>) {
        self.goals = Panel::Ready(goals);
    }

    pub fn fail_goals(&mut self) {
        self.goals = Panel::Failed;
    }

    pub fn set_activities(&mut self, activities: Vec<Activity>) {
        self.activities = Panel::Ready(activities);
    }

    pub fn fail_activities(&mut self) {
        self.activities = Panel::Failed;
    }

    pub fn set_analysis(&mut self, analysis: AnalysisResult) {
        self.analysis = Panel::Ready(analysis);
    }

    pub fn fail_analysis(&mut self) {
        self.analysis = Panel::Failed;
    }

    pub fn set_report_status(&mut self, message: impl Into<String>) {
        self.report_status = Some(message.into());
    }

    /// Take the transient report status for display. It is shown once and
    /// then cleared, the terminal analogue of a self-clearing status label.
    pub fn take_report_status(&mut self) -> Option<String> {
        self.report_status.take()
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    // ---- in-flight guards ----

    /// Claim the report trigger. Returns `false` if a generation is already
    /// pending; a second submission is rejected, not queued.
    pub fn try_begin_report(&mut self) -> bool {
        if self.report_busy {
            return false;
        }
        self.report_busy = true;
        true
    }

    pub fn end_report(&mut self) {
        self.report_busy = false;
    }

    pub fn try_begin_analysis(&mut self) -> bool {
        if self.analysis_busy {
            return false;
        }
        self.analysis_busy = true;
        true
    }

    pub fn end_analysis(&mut self) {
        self.analysis_busy = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_child(id: &str, name: &str) -> Child {
        Child {
            id: id.to_string(),
            name: name.to_string(),
            birth_date: None,
        }
    }

    fn make_goal(subject_id: &str, description: &str) -> Goal {
        Goal {
            id: "g1".to_string(),
            subject_id: subject_id.to_string(),
            description: description.to_string(),
            status: "Pendente".to_string(),
        }
    }

    // ========== selection tests ==========

    #[test]
    fn test_select_child_resets_panels_and_tab() {
        let mut state = AppState::new();
        state.set_children(vec![make_child("c1", "Ana")]);
        state.set_goals(vec![make_goal("math", "Frações")]);
        state.select_tab(Tab::Report);
        state.set_report_status("Relatório gerado");

        assert!(state.select_child("c1"));

        assert_eq!(state.current_child_id(), Some("c1"));
        assert_eq!(*state.goals(), Panel::Loading);
        assert_eq!(*state.activities(), Panel::Loading);
        assert_eq!(*state.analysis(), Panel::Empty);
        assert_eq!(state.active_tab(), Tab::Goals);
        assert!(state.take_report_status().is_none());
    }

    #[test]
    fn test_select_unknown_child_rejected() {
        let mut state = AppState::new();
        state.set_children(vec![make_child("c1", "Ana")]);

        assert!(!state.select_child("ghost"));
        assert!(state.current_child_id().is_none());
    }

    #[test]
    fn test_clear_selection_hides_details() {
        let mut state = AppState::new();
        state.set_children(vec![make_child("c1", "Ana")]);
        state.select_child("c1");
        state.set_goals(vec![]);

        state.clear_selection();

        assert!(state.selected_child().is_none());
        assert_eq!(*state.goals(), Panel::Empty);
        assert_eq!(*state.activities(), Panel::Empty);
    }

    #[test]
    fn test_selected_child_resolves_from_cache() {
        let mut state = AppState::new();
        state.set_children(vec![make_child("c1", "Ana"), make_child("c2", "Bruno")]);
        state.select_child("c2");

        assert_eq!(state.selected_child().unwrap().name, "Bruno");
    }

    #[test]
    fn test_insert_child_appends_once() {
        let mut state = AppState::new();
        state.set_children(vec![make_child("c1", "Ana")]);

        state.insert_child(make_child("c2", "Bruno"));

        let ids: Vec<_> = state.children().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2"]);
    }

    // ========== panel tests ==========

    #[test]
    fn test_panels_fail_independently() {
        let mut state = AppState::new();
        state.set_children(vec![make_child("c1", "Ana")]);
        state.select_child("c1");

        state.fail_goals();
        state.set_activities(vec![]);

        assert_eq!(*state.goals(), Panel::Failed);
        assert_eq!(*state.activities(), Panel::Ready(vec![]));
    }

    #[test]
    fn test_report_status_taken_once() {
        let mut state = AppState::new();
        state.set_report_status("Relatório gerado e salvo");

        assert_eq!(
            state.take_report_status().as_deref(),
            Some("Relatório gerado e salvo")
        );
        assert!(state.take_report_status().is_none());
    }

    // ========== tab tests ==========

    #[test]
    fn test_tab_parse_accepts_accent_free() {
        assert_eq!(Tab::parse("metas"), Some(Tab::Goals));
        assert_eq!(Tab::parse("Atividades"), Some(Tab::Activities));
        assert_eq!(Tab::parse("relatorio"), Some(Tab::Report));
        assert_eq!(Tab::parse("análise"), Some(Tab::Analysis));
        assert_eq!(Tab::parse("notas"), None);
    }

    #[test]
    fn test_exactly_one_tab_active() {
        let mut state = AppState::new();
        state.select_tab(Tab::Activities);

        let active: Vec<_> = Tab::ALL
            .iter()
            .filter(|t| **t == state.active_tab())
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(state.active_tab(), Tab::Activities);
    }

    // ========== busy flag tests ==========

    #[test]
    fn test_report_busy_rejects_second_submission() {
        let mut state = AppState::new();

        assert!(state.try_begin_report());
        assert!(!state.try_begin_report());

        state.end_report();
        assert!(state.try_begin_report());
    }

    #[test]
    fn test_analysis_busy_independent_of_report() {
        let mut state = AppState::new();

        assert!(state.try_begin_report());
        assert!(state.try_begin_analysis());
        assert!(!state.try_begin_analysis());

        state.end_analysis();
        assert!(state.try_begin_analysis());
    }

    // ========== subject lookup ==========

    #[test]
    fn test_subject_name_fallback() {
        let state = AppState::new();
        assert_eq!(state.subject_name("ghost"), "Desconhecida");
    }
}
