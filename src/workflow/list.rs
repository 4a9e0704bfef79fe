use std::collections::{HashMap, HashSet};

use tracing::{error, info, warn};

use super::WorkflowError;
use crate::api::{
    ApiError, Course, CourseApi, CourseCreate, CourseQuery, CourseUpdate, Module, ModuleUpdate,
    DEFAULT_CATEGORY_ID,
};
use crate::storage::LocalStore;

/// Store key remembering which course row is expanded.
pub const EXPANDED_COURSE_KEY: &str = "expandedCourse";

const EMBEDDINGS_FAILED: &str =
    "Nepodařilo se vygenerovat embeddingy. Zkontrolujte, zda je kurz ve stavu \"Schváleno\".";

/// Landing view: every course with its modules on demand plus the quick
/// actions that do not need their own screen.
#[derive(Debug, Default)]
pub struct CoursesListView {
    courses: Vec<Course>,
    expanded: Option<i64>,
    modules: HashMap<i64, Vec<Module>>,
    embeddings_done: HashSet<i64>,
    error: Option<String>,
    alert: Option<String>,
}

impl CoursesListView {
    /// Fetches the courses and restores the expanded row. Failures end up in
    /// the inline error, never as a terminal state.
    pub fn load(api: &dyn CourseApi, store: &dyn LocalStore) -> Self {
        let mut view = Self {
            expanded: store
                .get(EXPANDED_COURSE_KEY)
                .and_then(|v| v.trim().parse().ok()),
            ..Self::default()
        };
        view.reload(api);
        if let Some(course_id) = view.expanded {
            view.load_modules(api, course_id);
        }
        view
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn expanded(&self) -> Option<i64> {
        self.expanded
    }

    /// Modules of an expanded course, once loaded.
    pub fn modules(&self, course_id: i64) -> Option<&[Module]> {
        self.modules.get(&course_id).map(Vec::as_slice)
    }

    /// Inline error of the last failed load.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Alert left by the last failed action.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn embeddings_generated(&self, course_id: i64) -> bool {
        self.embeddings_done.contains(&course_id)
    }

    pub fn reload(&mut self, api: &dyn CourseApi) {
        match api.list_courses(&CourseQuery::default()) {
            Ok(courses) => {
                info!(count = courses.len(), "loaded courses");
                self.courses = courses;
                self.error = None;
            }
            Err(e) => {
                error!(error = %e, "could not load courses");
                self.error = Some(String::from("Nepodařilo se načíst kurzy"));
            }
        }
    }

    fn load_modules(&mut self, api: &dyn CourseApi, course_id: i64) {
        match api.list_modules(Some(course_id)) {
            Ok(mut modules) => {
                modules.sort_by_key(|m| m.position.unwrap_or(i32::MAX));
                self.modules.insert(course_id, modules);
            }
            Err(e) => warn!(course_id, error = %e, "could not load modules"),
        }
    }

    /// Expands a row, or collapses it when it is already open. The choice is
    /// remembered in the store.
    pub fn toggle_expand(
        &mut self,
        api: &dyn CourseApi,
        store: &mut dyn LocalStore,
        course_id: i64,
    ) {
        if self.expanded == Some(course_id) {
            self.expanded = None;
            store.remove(EXPANDED_COURSE_KEY);
            return;
        }

        self.expanded = Some(course_id);
        store.set(EXPANDED_COURSE_KEY, &course_id.to_string());
        if !self.modules.contains_key(&course_id) {
            self.load_modules(api, course_id);
        }
    }

    pub fn toggle_publish(
        &mut self,
        api: &dyn CourseApi,
        course_id: i64,
    ) -> Result<(), WorkflowError> {
        let course = self.act(
            api.toggle_course_publish(course_id),
            "Nepodařilo se změnit stav publikování",
        )?;
        info!(course_id, published = course.is_published, "publish toggled");
        self.reload(api);
        Ok(())
    }

    pub fn delete_course(
        &mut self,
        api: &dyn CourseApi,
        store: &mut dyn LocalStore,
        course_id: i64,
    ) -> Result<(), WorkflowError> {
        self.act(api.delete_course(course_id), "Nepodařilo se smazat kurz")?;
        info!(course_id, "course deleted");
        self.modules.remove(&course_id);
        if self.expanded == Some(course_id) {
            self.expanded = None;
            store.remove(EXPANDED_COURSE_KEY);
        }
        self.reload(api);
        Ok(())
    }

    /// Creates an empty course in the default category.
    pub fn create_course(
        &mut self,
        api: &dyn CourseApi,
        title: &str,
        description: &str,
    ) -> Result<i64, WorkflowError> {
        let description = description.trim();
        let request = CourseCreate {
            title: title.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            modules_count: None,
            category_id: DEFAULT_CATEGORY_ID,
        };
        let result = api.create_course(&request);
        let alert = result
            .as_ref()
            .err()
            .map(ApiError::user_message)
            .unwrap_or_default();
        let course = self.act(result, &alert)?;
        self.reload(api);
        Ok(course.course_id)
    }

    pub fn update_course(
        &mut self,
        api: &dyn CourseApi,
        course_id: i64,
        title: &str,
        description: &str,
    ) -> Result<(), WorkflowError> {
        let category_id = self
            .courses
            .iter()
            .find(|c| c.course_id == course_id)
            .and_then(|c| c.category_id)
            .unwrap_or(DEFAULT_CATEGORY_ID);
        let description = description.trim();
        let request = CourseUpdate {
            title: title.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            modules_count: None,
            category_id,
        };
        self.act(
            api.update_course(course_id, &request),
            "Nepodařilo se uložit kurz",
        )?;
        self.reload(api);
        Ok(())
    }

    /// Renames or moves a module and refreshes the cached module list of its
    /// course.
    pub fn update_module(
        &mut self,
        api: &dyn CourseApi,
        module_id: i64,
        title: &str,
        position: i32,
    ) -> Result<(), WorkflowError> {
        let request = ModuleUpdate {
            title: title.trim().to_string(),
            position: position.max(1),
        };
        let module = self.act(
            api.update_module(module_id, &request),
            "Nepodařilo se uložit modul",
        )?;
        self.load_modules(api, module.course_id);
        Ok(())
    }

    /// Builds the retrieval embeddings. The backend only accepts approved
    /// courses.
    pub fn generate_embeddings(
        &mut self,
        api: &dyn CourseApi,
        course_id: i64,
    ) -> Result<(), WorkflowError> {
        self.act(api.generate_course_embeddings(course_id), EMBEDDINGS_FAILED)?;
        info!(course_id, "embeddings generated");
        self.embeddings_done.insert(course_id);
        Ok(())
    }

    fn act<T>(&mut self, result: Result<T, ApiError>, alert: &str) -> Result<T, WorkflowError> {
        match result {
            Ok(value) => {
                self.alert = None;
                Ok(value)
            }
            Err(e) => {
                error!(error = %e, "{}", alert);
                self.alert = Some(alert.to_string());
                Err(e.into())
            }
        }
    }
}
