use tracing::{error, info};

use super::{BusyFlag, LoadError, WorkflowError};
use crate::api::{CourseApi, CourseUpdate, Module, ModuleUpdate, DEFAULT_CATEGORY_ID};
use crate::navigation::Navigator;

/// Module count sent for a course that has no modules yet.
const DEFAULT_MODULES_COUNT: u32 = 3;

#[derive(Debug, Clone, PartialEq)]
struct ModuleTitleEdit {
    module_id: i64,
    title: String,
}

/// Course metadata form with inline module renaming and deletion.
#[derive(Debug)]
pub struct CourseEditView {
    course_id: i64,
    pub title: String,
    pub description: String,
    category_id: Option<i64>,
    modules: Vec<Module>,
    editing: Option<ModuleTitleEdit>,
    error: Option<String>,
    busy: BusyFlag,
}

impl CourseEditView {
    pub fn load(api: &dyn CourseApi, course_id: i64) -> Result<Self, LoadError> {
        let course = api
            .get_course(course_id)
            .map_err(|e| LoadError::from_api(e, "Kurz nebyl nalezen"))?;

        Ok(Self {
            course_id,
            title: course.title,
            description: course.description.unwrap_or_default(),
            category_id: course.category_id,
            modules: course.modules,
            editing: None,
            error: None,
            busy: BusyFlag::default(),
        })
    }

    pub fn course_id(&self) -> i64 {
        self.course_id
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The module being renamed and its pending title.
    pub fn editing(&self) -> Option<(i64, &str)> {
        self.editing
            .as_ref()
            .map(|e| (e.module_id, e.title.as_str()))
    }

    /// Module count sent with the course form.
    pub fn modules_count(&self) -> u32 {
        match self.modules.len() {
            0 => DEFAULT_MODULES_COUNT,
            n => n as u32,
        }
    }

    pub fn start_module_edit(&mut self, module_id: i64) {
        if let Some(module) = self.modules.iter().find(|m| m.module_id == module_id) {
            self.editing = Some(ModuleTitleEdit {
                module_id,
                title: module.title.clone(),
            });
        }
    }

    pub fn set_module_title(&mut self, title: &str) {
        if let Some(edit) = self.editing.as_mut() {
            edit.title = title.to_string();
        }
    }

    pub fn cancel_module_edit(&mut self) {
        self.editing = None;
    }

    pub fn save_module_edit(&mut self, api: &dyn CourseApi) -> Result<(), WorkflowError> {
        let Some(edit) = self.editing.clone() else {
            return Ok(());
        };
        let Some(index) = self.modules.iter().position(|m| m.module_id == edit.module_id) else {
            self.editing = None;
            return Ok(());
        };

        let update = ModuleUpdate {
            title: edit.title.trim().to_string(),
            position: self.modules[index].position.unwrap_or(index as i32 + 1),
        };
        match api.update_module(edit.module_id, &update) {
            Ok(saved) => {
                self.modules[index] = Module {
                    learn_blocks: std::mem::take(&mut self.modules[index].learn_blocks),
                    practice_questions: std::mem::take(
                        &mut self.modules[index].practice_questions,
                    ),
                    ..saved
                };
                self.editing = None;
                Ok(())
            }
            Err(e) => {
                error!(module_id = edit.module_id, error = %e, "module rename failed");
                self.error = Some(String::from("Nepodařilo se uložit modul"));
                Err(e.into())
            }
        }
    }

    /// Saves the course form and returns to the list.
    pub fn submit(
        &mut self,
        api: &dyn CourseApi,
        nav: &mut Navigator,
    ) -> Result<(), WorkflowError> {
        let title = self.title.trim();
        if title.is_empty() {
            let message = String::from("Název kurzu je povinný");
            self.error = Some(message.clone());
            return Err(WorkflowError::Input(message));
        }

        self.busy.begin()?;
        let description = self.description.trim();
        let update = CourseUpdate {
            title: title.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            modules_count: Some(self.modules_count()),
            category_id: self.category_id.unwrap_or(DEFAULT_CATEGORY_ID),
        };
        let result = api.update_course(self.course_id, &update);
        self.busy.end();

        match result {
            Ok(_) => {
                info!(course_id = self.course_id, "course updated");
                nav.go_to_courses();
                Ok(())
            }
            Err(e) => {
                error!(course_id = self.course_id, error = %e, "course update failed");
                self.error = Some(e.user_message());
                Err(e.into())
            }
        }
    }

    pub fn delete(
        &mut self,
        api: &dyn CourseApi,
        nav: &mut Navigator,
    ) -> Result<(), WorkflowError> {
        self.busy.begin()?;
        let result = api.delete_course(self.course_id);
        self.busy.end();

        match result {
            Ok(()) => {
                info!(course_id = self.course_id, "course deleted");
                nav.go_to_courses();
                Ok(())
            }
            Err(e) => {
                error!(course_id = self.course_id, error = %e, "course delete failed");
                self.error = Some(String::from("Nepodařilo se smazat kurz"));
                Err(e.into())
            }
        }
    }

    pub fn back(&self, nav: &mut Navigator) {
        nav.go_back();
    }
}
