use tracing::{error, info};

use super::{BusyFlag, LoadError, WorkflowError};
use crate::api::{CourseApi, Module, ModuleUpdate};
use crate::navigation::Navigator;

/// Title and position form for a single module.
#[derive(Debug)]
pub struct ModuleEditView {
    module: Module,
    pub title: String,
    pub position: i32,
    error: Option<String>,
    busy: BusyFlag,
}

impl ModuleEditView {
    /// Modules are only listed per course, so the course id is required even
    /// though the route treats it as optional.
    pub fn load(
        api: &dyn CourseApi,
        module_id: i64,
        course_id: Option<i64>,
    ) -> Result<Self, LoadError> {
        let course_id = course_id.ok_or(LoadError::MissingCourseId)?;
        let modules = api
            .list_modules(Some(course_id))
            .map_err(|e| LoadError::from_api(e, "Kurz nebyl nalezen"))?;
        let module = modules
            .into_iter()
            .find(|m| m.module_id == module_id)
            .ok_or_else(|| LoadError::NotFound(String::from("Modul nebyl nalezen")))?;

        Ok(Self {
            title: module.title.clone(),
            position: module.position.unwrap_or(1),
            module,
            error: None,
            busy: BusyFlag::default(),
        })
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn submit(
        &mut self,
        api: &dyn CourseApi,
        nav: &mut Navigator,
    ) -> Result<(), WorkflowError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            let message = String::from("Název modulu je povinný");
            self.error = Some(message.clone());
            return Err(WorkflowError::Input(message));
        }

        self.busy.begin()?;
        let update = ModuleUpdate {
            title,
            position: self.position.max(1),
        };
        let result = api.update_module(self.module.module_id, &update);
        self.busy.end();

        match result {
            Ok(saved) => {
                info!(module_id = saved.module_id, "module updated");
                self.module = saved;
                nav.go_to_courses();
                Ok(())
            }
            Err(e) => {
                error!(module_id = self.module.module_id, error = %e, "module update failed");
                self.error = Some(e.user_message());
                Err(e.into())
            }
        }
    }

    pub fn back(&self, nav: &mut Navigator) {
        nav.go_back();
    }
}
