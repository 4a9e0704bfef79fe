use tracing::info;

use super::codec::{decode, encode, AdminView, NavigationState, NavigationUpdate};

/// Client-side history of the admin console. Navigations push a new URL so
/// back/forward keep working; returning to the list replaces the current entry
/// with the bare admin path.
#[derive(Debug, Clone)]
pub struct Navigator {
    path: String,
    entries: Vec<String>,
    cursor: usize,
}

impl Navigator {
    pub fn new(path: &str) -> Self {
        Self::at(path, path)
    }

    /// Starts at `url`, typically the URL the console was opened with.
    pub fn at(path: &str, url: &str) -> Self {
        Self {
            path: path.to_string(),
            entries: vec![url.to_string()],
            cursor: 0,
        }
    }

    pub fn current_url(&self) -> &str {
        &self.entries[self.cursor]
    }

    pub fn history_len(&self) -> usize {
        self.entries.len()
    }

    pub fn state(&self) -> NavigationState {
        let url = self.current_url();
        match url.split_once('?') {
            Some((_, query)) => decode(query),
            None => NavigationState::default(),
        }
    }

    fn url_for(&self, query: &str) -> String {
        if query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, query)
        }
    }

    fn push(&mut self, url: String) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(url);
        self.cursor += 1;
    }

    pub fn navigate(&mut self, update: NavigationUpdate) {
        let query = encode(&update, &self.state());
        let url = self.url_for(&query);
        info!(url = %url, "navigate");
        self.push(url);
    }

    /// Back to the course list, dropping every query parameter.
    pub fn go_to_courses(&mut self) {
        info!(url = %self.path, "reset to course list");
        self.entries[self.cursor] = self.path.clone();
    }

    pub fn go_to_course_content(&mut self, course_id: i64) {
        self.go_to_course_view(AdminView::CourseContent, course_id);
    }

    pub fn go_to_course_tests(&mut self, course_id: i64) {
        self.go_to_course_view(AdminView::CourseTests, course_id);
    }

    pub fn go_to_course_summary(&mut self, course_id: i64) {
        self.go_to_course_view(AdminView::CourseSummary, course_id);
    }

    pub fn go_to_course_edit(&mut self, course_id: i64) {
        self.go_to_course_view(AdminView::CourseEdit, course_id);
    }

    fn go_to_course_view(&mut self, view: AdminView, course_id: i64) {
        self.navigate(
            NavigationUpdate::view(view)
                .course_id(Some(course_id))
                .module_id(None),
        );
    }

    pub fn go_to_course_upload(&mut self) {
        self.navigate(
            NavigationUpdate::view(AdminView::CourseUpload)
                .course_id(None)
                .module_id(None),
        );
    }

    pub fn go_to_ai_create(&mut self) {
        self.navigate(
            NavigationUpdate::view(AdminView::CourseAiCreate)
                .course_id(None)
                .module_id(None),
        );
    }

    pub fn go_to_module_edit(&mut self, module_id: i64, course_id: Option<i64>) {
        self.navigate(
            NavigationUpdate::view(AdminView::ModuleEdit)
                .module_id(Some(module_id))
                .course_id(course_id),
        );
    }

    /// Browser back. Returns false when already at the oldest entry.
    pub fn go_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        info!(url = %self.current_url(), "back");
        true
    }

    pub fn go_forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        true
    }
}
