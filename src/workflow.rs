//! The admin console views. Each view fetches its own data when opened, keeps
//! edits in local drafts and only talks to the API again when the author saves
//! or moves to another step.

mod ai_create;
mod content;
mod edit;
mod list;
mod module_edit;
mod quiz;
mod summary;
mod upload;

use std::thread;

use thiserror::Error;
use tracing::error;

use crate::api::{
    ApiError, ApiResult, CourseApi, LearnBlockUpdate, ModuleUpdate, PracticeOptionUpdate,
    PracticeQuestionUpdate,
};
use crate::drafts::ValidationError;
use crate::navigation::ViewRoute;
use crate::storage::LocalStore;

pub use ai_create::{AiCreateStep, CourseAiCreateView, MAX_MODULE_COUNT, MIN_MODULE_COUNT};
pub use content::CourseContentView;
pub use edit::CourseEditView;
pub use list::{CoursesListView, EXPANDED_COURSE_KEY};
pub use module_edit::ModuleEditView;
pub use quiz::CourseTestsView;
pub use summary::CourseSummaryView;
pub use upload::{CourseUploadView, ALLOWED_EXTENSIONS};

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{} question(s) failed validation", .0.len())]
    Validation(Vec<ValidationError>),

    #[error("a save is already in progress")]
    Busy,

    /// Form input the author has to fix; the message is shown as is.
    #[error("{0}")]
    Input(String),
}

/// Terminal states of opening a view.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("{0}")]
    NotFound(String),

    #[error("Chybí ID kurzu")]
    MissingCourseId,

    #[error(transparent)]
    Api(ApiError),
}

impl LoadError {
    pub(crate) fn from_api(err: ApiError, not_found: &str) -> Self {
        match err {
            ApiError::NotFound(_) => LoadError::NotFound(not_found.to_string()),
            other => LoadError::Api(other),
        }
    }
}

/// Marks a view as mid-flush. Flushes take `&mut self`, so this only fires for
/// a UI caller that re-enters a flush from a callback running inside one.
#[derive(Debug, Default)]
pub(crate) struct BusyFlag(bool);

impl BusyFlag {
    #[cfg(test)]
    pub(crate) fn is_busy(&self) -> bool {
        self.0
    }

    pub(crate) fn begin(&mut self) -> Result<(), WorkflowError> {
        if self.0 {
            return Err(WorkflowError::Busy);
        }
        self.0 = true;
        Ok(())
    }

    pub(crate) fn end(&mut self) {
        self.0 = false;
    }
}

/// An update of an entity that already exists server-side.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PendingUpdate {
    Module(i64, ModuleUpdate),
    LearnBlock(i64, LearnBlockUpdate),
    Question(i64, PracticeQuestionUpdate),
    Option(i64, PracticeOptionUpdate),
}

impl PendingUpdate {
    fn send(&self, api: &dyn CourseApi) -> ApiResult<()> {
        match self {
            PendingUpdate::Module(id, data) => api.update_module(*id, data).map(|_| ()),
            PendingUpdate::LearnBlock(id, data) => api.update_learn_block(*id, data).map(|_| ()),
            PendingUpdate::Question(id, data) => {
                api.update_practice_question(*id, data).map(|_| ())
            }
            PendingUpdate::Option(id, data) => api.update_practice_option(*id, data).map(|_| ()),
        }
    }
}

const MAX_PARALLEL_UPDATES: usize = 8;

/// Sends independent updates concurrently and waits for all of them. Returns the
/// first failure once every request in flight has settled.
pub(crate) fn send_all(api: &dyn CourseApi, updates: &[PendingUpdate]) -> ApiResult<()> {
    let mut first_error = None;

    for batch in updates.chunks(MAX_PARALLEL_UPDATES) {
        let results: Vec<ApiResult<()>> = thread::scope(|scope| {
            let handles: Vec<_> = batch
                .iter()
                .map(|update| scope.spawn(move || update.send(api)))
                .collect();
            handles
                .into_iter()
                .map(|h| match h.join() {
                    Ok(result) => result,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        });

        for result in results {
            if let Err(e) = result {
                first_error.get_or_insert(e);
            }
        }
        if first_error.is_some() {
            break;
        }
    }

    first_error.map_or(Ok(()), Err)
}

/// Logs a failed flush and turns it into the blocking alert text.
pub(crate) fn flush_failed(err: &WorkflowError, alert: &str) -> String {
    error!(error = %err, "{}", alert);
    alert.to_string()
}

/// A view opened for a route, with its data loaded.
#[derive(Debug)]
pub enum AdminScreen {
    CoursesList(CoursesListView),
    CourseContent(CourseContentView),
    CourseTests(CourseTestsView),
    CourseSummary(CourseSummaryView),
    CourseEdit(CourseEditView),
    CourseUpload(CourseUploadView),
    CourseAiCreate(CourseAiCreateView),
    ModuleEdit(ModuleEditView),
}

/// Opens the view a route points at. Views are loaded eagerly.
pub fn open_view(
    api: &dyn CourseApi,
    store: &mut dyn LocalStore,
    route: ViewRoute,
) -> Result<AdminScreen, LoadError> {
    let screen = match route {
        ViewRoute::CoursesList => AdminScreen::CoursesList(CoursesListView::load(api, store)),
        ViewRoute::CourseContent { course_id } => {
            AdminScreen::CourseContent(CourseContentView::load(api, course_id)?)
        }
        ViewRoute::CourseTests { course_id } => {
            AdminScreen::CourseTests(CourseTestsView::load(api, course_id)?)
        }
        ViewRoute::CourseSummary { course_id } => {
            AdminScreen::CourseSummary(CourseSummaryView::load(api, course_id)?)
        }
        ViewRoute::CourseEdit { course_id } => {
            AdminScreen::CourseEdit(CourseEditView::load(api, course_id)?)
        }
        ViewRoute::CourseUpload => AdminScreen::CourseUpload(CourseUploadView::new()),
        ViewRoute::CourseAiCreate => AdminScreen::CourseAiCreate(CourseAiCreateView::load(api)),
        ViewRoute::ModuleEdit {
            module_id,
            course_id,
        } => AdminScreen::ModuleEdit(ModuleEditView::load(api, module_id, course_id)?),
    };
    Ok(screen)
}
