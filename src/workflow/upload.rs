use std::path::{Path, PathBuf};

use tracing::{error, info};

use super::{BusyFlag, WorkflowError};
use crate::api::{ApiError, CourseApi, CourseCreate, DEFAULT_CATEGORY_ID};
use crate::navigation::Navigator;

/// Source documents accepted for course creation.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "xls", "xlsx", "md", "txt"];

const UNSUPPORTED_FILE: &str =
    "Nepodporovaný formát souboru. Povolené formáty: PDF, Word, Excel, Markdown, TXT";

pub(crate) fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Manual course creation: one source file, title and description.
#[derive(Debug, Default)]
pub struct CourseUploadView {
    pub title: String,
    pub description: String,
    file: Option<PathBuf>,
    error: Option<String>,
    busy: BusyFlag,
}

impl CourseUploadView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Picks the source file. Unsupported types are refused and clear any
    /// earlier pick.
    pub fn select_file(&mut self, path: impl Into<PathBuf>) -> Result<(), WorkflowError> {
        let path = path.into();
        if !is_supported(&path) {
            self.file = None;
            self.error = Some(UNSUPPORTED_FILE.to_string());
            return Err(WorkflowError::Input(UNSUPPORTED_FILE.to_string()));
        }
        self.error = None;
        self.file = Some(path);
        Ok(())
    }

    pub fn remove_file(&mut self) {
        self.file = None;
    }

    /// Creates the course, uploads the file and opens the new course for
    /// editing. Returns the new course id.
    pub fn submit(
        &mut self,
        api: &dyn CourseApi,
        nav: &mut Navigator,
    ) -> Result<i64, WorkflowError> {
        let Some(file) = self.file.clone() else {
            let message = String::from("Vyberte prosím soubor");
            self.error = Some(message.clone());
            return Err(WorkflowError::Input(message));
        };
        let title = self.title.trim().to_string();
        if title.is_empty() {
            let message = String::from("Název kurzu je povinný");
            self.error = Some(message.clone());
            return Err(WorkflowError::Input(message));
        }

        self.busy.begin()?;
        let result = self.create_and_upload(api, title, &file);
        self.busy.end();

        match result {
            Ok(course_id) => {
                self.error = None;
                nav.go_to_course_edit(course_id);
                Ok(course_id)
            }
            Err(e) => {
                error!(error = %e, "course upload failed");
                self.error = Some(e.user_message());
                Err(e.into())
            }
        }
    }

    fn create_and_upload(
        &self,
        api: &dyn CourseApi,
        title: String,
        file: &Path,
    ) -> Result<i64, ApiError> {
        let description = self.description.trim();
        let course = api.create_course(&CourseCreate {
            title,
            description: (!description.is_empty()).then(|| description.to_string()),
            modules_count: None,
            category_id: DEFAULT_CATEGORY_ID,
        })?;
        api.upload_course_file(course.course_id, file)?;
        info!(course_id = course.course_id, file = %file.display(), "course created from upload");
        Ok(course.course_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{course, Call, FakeApi};
    use crate::api::DUPLICATE_TITLE_DETAIL;

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(is_supported(Path::new("osnova.PDF")));
        assert!(is_supported(Path::new("data/tabulka.xlsx")));
        assert!(!is_supported(Path::new("obrazek.png")));
        assert!(!is_supported(Path::new("bez_pripony")));
    }

    #[test]
    fn unsupported_file_clears_selection() {
        let mut view = CourseUploadView::new();
        view.select_file("osnova.md").unwrap();
        assert!(view.select_file("video.mp4").is_err());
        assert_eq!(view.file(), None);
        assert_eq!(view.error(), Some(UNSUPPORTED_FILE));
    }

    #[test]
    fn submit_creates_uploads_and_opens_edit() {
        let api = FakeApi::new();
        let mut view = CourseUploadView::new();
        view.title = String::from("Nový kurz");
        view.select_file("/tmp/osnova.pdf").unwrap();
        let mut nav = Navigator::new("/admin");
        nav.go_to_course_upload();

        let id = view.submit(&api, &mut nav).unwrap();
        assert_eq!(id, 101);
        assert_eq!(
            api.calls(),
            vec![
                Call::CreateCourse(String::from("Nový kurz")),
                Call::UploadFile(101, String::from("osnova.pdf")),
            ]
        );
        assert_eq!(nav.current_url(), "/admin?view=course-edit&courseId=101");
        assert_eq!(api.stored_course(101).unwrap().category_id, Some(DEFAULT_CATEGORY_ID));
    }

    #[test]
    fn submit_without_file_is_rejected() {
        let api = FakeApi::new();
        let mut view = CourseUploadView::new();
        view.title = String::from("Kurz");
        let mut nav = Navigator::new("/admin");
        assert!(matches!(
            view.submit(&api, &mut nav),
            Err(WorkflowError::Input(_))
        ));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn duplicate_title_shows_conflict_detail() {
        let api = FakeApi::new().with_course(course(5, "Prompting"));
        let mut view = CourseUploadView::new();
        view.title = String::from("Prompting");
        view.select_file("osnova.docx").unwrap();
        let mut nav = Navigator::new("/admin");

        assert!(view.submit(&api, &mut nav).is_err());
        assert_eq!(view.error(), Some(DUPLICATE_TITLE_DETAIL));
        assert_eq!(nav.current_url(), "/admin");
    }
}
