use tracing::{debug, info};

use super::{flush_failed, send_all, BusyFlag, LoadError, PendingUpdate, WorkflowError};
use crate::api::{CourseApi, LearnBlockCreate, LearnBlockUpdate, ModuleCreate, ModuleUpdate};
use crate::drafts::ModuleDrafts;
use crate::navigation::Navigator;

const SAVE_FAILED: &str = "Nepodařilo se uložit obsah";

/// Step 1 of the authoring flow: module list plus one rich-text block per module.
#[derive(Debug)]
pub struct CourseContentView {
    course_id: i64,
    pub course_title: String,
    pub drafts: ModuleDrafts,
    alert: Option<String>,
    busy: BusyFlag,
}

impl CourseContentView {
    pub fn load(api: &dyn CourseApi, course_id: i64) -> Result<Self, LoadError> {
        let course = api
            .get_course(course_id)
            .map_err(|e| LoadError::from_api(e, "Kurz nebyl nalezen"))?;
        debug!(course_id, modules = course.modules.len(), "loaded course content");

        Ok(Self {
            course_id,
            course_title: course.title.clone(),
            drafts: ModuleDrafts::from_course(&course),
            alert: None,
            busy: BusyFlag::default(),
        })
    }

    pub fn course_id(&self) -> i64 {
        self.course_id
    }

    /// Blocking alert left by the last failed save.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Flushes every draft to the server. Temporary modules and their learn
    /// blocks are created one by one first; updates of existing entities then
    /// go out together.
    pub fn save(&mut self, api: &dyn CourseApi) -> Result<(), WorkflowError> {
        self.busy.begin()?;
        let result = self.flush(api);
        self.busy.end();

        match result {
            Ok(()) => {
                self.alert = None;
                Ok(())
            }
            Err(e) => {
                self.alert = Some(flush_failed(&e, SAVE_FAILED));
                Err(e)
            }
        }
    }

    /// Saves, then moves on to the tests step.
    pub fn continue_to_tests(
        &mut self,
        api: &dyn CourseApi,
        nav: &mut Navigator,
    ) -> Result<(), WorkflowError> {
        self.save(api)?;
        nav.go_to_course_tests(self.course_id);
        Ok(())
    }

    /// Saves, then returns to wherever the author came from.
    pub fn back(&mut self, api: &dyn CourseApi, nav: &mut Navigator) -> Result<(), WorkflowError> {
        self.save(api)?;
        nav.go_back();
        Ok(())
    }

    fn flush(&mut self, api: &dyn CourseApi) -> Result<(), WorkflowError> {
        // Planned before any create so entities created below are not updated
        // again in the same flush.
        let updates = self.pending_updates();
        let created = self.create_missing(api)?;
        send_all(api, &updates)?;
        info!(
            course_id = self.course_id,
            created,
            updated = updates.len(),
            "saved course content"
        );
        Ok(())
    }

    fn pending_updates(&self) -> Vec<PendingUpdate> {
        let mut updates = Vec::new();
        for module in self.drafts.modules().iter().filter(|m| !m.is_temporary) {
            updates.push(PendingUpdate::Module(
                module.module_id,
                ModuleUpdate {
                    title: module.title.clone(),
                    position: module.position,
                },
            ));
            if let Some(content) = self.drafts.content(module.module_id) {
                if let Some(learn_id) = content.learn_id {
                    updates.push(PendingUpdate::LearnBlock(
                        learn_id,
                        LearnBlockUpdate {
                            position: content.position,
                            content: content.content.clone(),
                        },
                    ));
                }
            }
        }
        updates
    }

    /// Creates temporary modules, each with its learn block, in display order
    /// and records the server ids in the drafts as it goes. Persisted modules
    /// are left alone even without a block. Returns how many entities were
    /// created.
    fn create_missing(&mut self, api: &dyn CourseApi) -> Result<usize, WorkflowError> {
        let mut created = 0;
        let modules = self.drafts.modules().to_vec();

        for module in modules.iter().filter(|m| m.is_temporary) {
            let saved = api.create_module(&ModuleCreate {
                course_id: self.course_id,
                title: module.title.clone(),
                position: module.position,
            })?;
            self.drafts.promote(module.module_id, saved.module_id);
            created += 1;

            let content = self
                .drafts
                .content(saved.module_id)
                .map(|c| c.content.clone())
                .unwrap_or_default();
            let block = api.create_learn_block(&LearnBlockCreate {
                module_id: saved.module_id,
                position: 1,
                content,
            })?;
            self.drafts.set_learn_block(
                saved.module_id,
                block.learn_id,
                block.position.unwrap_or(1),
            );
            created += 1;
        }

        Ok(created)
    }
}
