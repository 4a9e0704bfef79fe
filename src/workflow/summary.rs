use tracing::{error, info};

use super::{BusyFlag, LoadError, WorkflowError};
use crate::api::{Course, CourseApi, CourseUpdate, DEFAULT_CATEGORY_ID};
use crate::navigation::Navigator;

const SAVE_FAILED: &str = "Nepodařilo se uložit kurz";

/// Step 3 of the authoring flow: read-only outline plus editable title and
/// description.
#[derive(Debug)]
pub struct CourseSummaryView {
    course: Course,
    pub title: String,
    pub description: String,
    error: Option<String>,
    busy: BusyFlag,
}

impl CourseSummaryView {
    pub fn load(api: &dyn CourseApi, course_id: i64) -> Result<Self, LoadError> {
        let course = api
            .get_course(course_id)
            .map_err(|e| LoadError::from_api(e, "Kurz nebyl nalezen"))?;

        Ok(Self {
            title: course.title.clone(),
            description: course.description.clone().unwrap_or_default(),
            course,
            error: None,
            busy: BusyFlag::default(),
        })
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn module_count(&self) -> usize {
        self.course.modules.len()
    }

    pub fn total_questions(&self) -> usize {
        self.course
            .modules
            .iter()
            .map(|m| m.practice_questions.len())
            .sum()
    }

    /// Inline error of the last failed finish.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Stores the edited title and description, then returns to the course
    /// list. A failure stays in the view as an inline error.
    pub fn finish(
        &mut self,
        api: &dyn CourseApi,
        nav: &mut Navigator,
    ) -> Result<(), WorkflowError> {
        self.busy.begin()?;
        let update = CourseUpdate {
            title: self.title.trim().to_string(),
            description: Some(self.description.clone()),
            modules_count: None,
            category_id: self.course.category_id.unwrap_or(DEFAULT_CATEGORY_ID),
        };
        let result = api.update_course(self.course.course_id, &update);
        self.busy.end();

        match result {
            Ok(course) => {
                info!(course_id = course.course_id, "finished course");
                self.error = None;
                self.course = course;
                nav.go_to_courses();
                Ok(())
            }
            Err(e) => {
                error!(course_id = self.course.course_id, error = %e, "{}", SAVE_FAILED);
                self.error = Some(SAVE_FAILED.to_string());
                Err(e.into())
            }
        }
    }

    pub fn back(&self, nav: &mut Navigator) {
        nav.go_to_course_tests(self.course.course_id);
    }
}
