use std::path::PathBuf;

use tracing::{error, info, warn};

use super::upload::is_supported;
use super::{BusyFlag, WorkflowError};
use crate::api::{ApiError, Category, CourseApi, CourseCreate};
use crate::navigation::Navigator;

pub const MIN_MODULE_COUNT: u32 = 1;
pub const MAX_MODULE_COUNT: u32 = 20;
const DEFAULT_MODULE_COUNT: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiCreateStep {
    #[default]
    Form,
    Uploading,
    Generating,
}

impl AiCreateStep {
    /// Progress text shown while the step runs.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            AiCreateStep::Form => None,
            AiCreateStep::Uploading => Some("Nahrávám podklady..."),
            AiCreateStep::Generating => Some("AI generuje obsah kurzu..."),
        }
    }
}

/// AI-assisted course creation: source files go up, the generator fills the
/// modules, and the author lands on the content step.
#[derive(Debug)]
pub struct CourseAiCreateView {
    pub title: String,
    pub description: String,
    module_count: u32,
    category_id: Option<i64>,
    categories: Vec<Category>,
    files: Vec<PathBuf>,
    step: AiCreateStep,
    error: Option<String>,
    busy: BusyFlag,
}

impl CourseAiCreateView {
    /// Loads the category choices and preselects the first one. A failed load
    /// leaves the form usable with an inline error.
    pub fn load(api: &dyn CourseApi) -> Self {
        let mut view = Self {
            title: String::new(),
            description: String::new(),
            module_count: DEFAULT_MODULE_COUNT,
            category_id: None,
            categories: Vec::new(),
            files: Vec::new(),
            step: AiCreateStep::Form,
            error: None,
            busy: BusyFlag::default(),
        };

        match api.list_categories(false) {
            Ok(categories) => {
                view.category_id = categories.first().map(|c| c.category_id);
                view.categories = categories;
            }
            Err(e) => {
                warn!(error = %e, "could not load categories");
                view.error = Some(String::from("Nepodařilo se načíst kategorie"));
            }
        }
        view
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_id(&self) -> Option<i64> {
        self.category_id
    }

    pub fn select_category(&mut self, category_id: i64) {
        if self.categories.iter().any(|c| c.category_id == category_id) {
            self.category_id = Some(category_id);
        }
    }

    pub fn module_count(&self) -> u32 {
        self.module_count
    }

    pub fn set_module_count(&mut self, count: u32) {
        self.module_count = count.clamp(MIN_MODULE_COUNT, MAX_MODULE_COUNT);
    }

    pub fn increment_modules(&mut self) {
        self.set_module_count(self.module_count.saturating_add(1));
    }

    pub fn decrement_modules(&mut self) {
        self.set_module_count(self.module_count.saturating_sub(1));
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Adds source files, skipping unsupported types. Returns how many were
    /// accepted.
    pub fn add_files<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let before = self.files.len();
        for path in paths.into_iter().map(Into::into) {
            if is_supported(&path) {
                self.files.push(path);
            } else {
                warn!(file = %path.display(), "skipping unsupported file");
            }
        }
        self.files.len() - before
    }

    pub fn remove_file(&mut self, index: usize) {
        if index < self.files.len() {
            self.files.remove(index);
        }
    }

    pub fn step(&self) -> AiCreateStep {
        self.step
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Creates the course, uploads every file, runs the generator and opens the
    /// content step. Any failure returns the form with the server's message.
    pub fn submit(
        &mut self,
        api: &dyn CourseApi,
        nav: &mut Navigator,
    ) -> Result<i64, WorkflowError> {
        if self.files.is_empty() {
            return Err(self.reject("Prosím nahrajte alespoň jeden soubor s podklady"));
        }
        let Some(category_id) = self.category_id else {
            return Err(self.reject("Prosím vyberte kategorii kurzu"));
        };
        if self.title.trim().is_empty() {
            return Err(self.reject("Název kurzu je povinný"));
        }

        self.busy.begin()?;
        self.error = None;
        let result = self.generate(api, category_id);
        self.busy.end();

        match result {
            Ok(course_id) => {
                self.step = AiCreateStep::Form;
                nav.go_to_course_content(course_id);
                Ok(course_id)
            }
            Err(e) => {
                error!(error = %e, "AI course creation failed");
                self.step = AiCreateStep::Form;
                self.error = Some(e.user_message());
                Err(e.into())
            }
        }
    }

    fn reject(&mut self, message: &str) -> WorkflowError {
        self.error = Some(message.to_string());
        WorkflowError::Input(message.to_string())
    }

    fn generate(&mut self, api: &dyn CourseApi, category_id: i64) -> Result<i64, ApiError> {
        self.step = AiCreateStep::Uploading;
        let description = self.description.trim();
        let course = api.create_course(&CourseCreate {
            title: self.title.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            modules_count: Some(self.module_count),
            category_id,
        })?;
        for file in &self.files {
            api.upload_course_file(course.course_id, file)?;
        }

        self.step = AiCreateStep::Generating;
        let generated = api.generate_course(course.course_id)?;
        info!(
            course_id = course.course_id,
            modules = generated.modules.len(),
            "course generated"
        );
        Ok(course.course_id)
    }
}
