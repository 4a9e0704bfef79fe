use tracing::{debug, info, warn};

use super::{flush_failed, send_all, BusyFlag, LoadError, PendingUpdate, WorkflowError};
use crate::api::{
    CourseApi, PracticeOptionCreate, PracticeOptionUpdate, PracticeQuestionCreate,
    PracticeQuestionUpdate,
};
use crate::drafts::{QuestionDraft, QuestionDrafts, QuestionKind, ValidationError};
use crate::navigation::Navigator;

const SAVE_FAILED: &str = "Nepodařilo se uložit obsah testu";

/// Step 2 of the authoring flow: practice questions per module.
#[derive(Debug)]
pub struct CourseTestsView {
    course_id: i64,
    pub course_title: String,
    pub drafts: QuestionDrafts,
    validation_errors: Vec<ValidationError>,
    alert: Option<String>,
    busy: BusyFlag,
}

impl CourseTestsView {
    pub fn load(api: &dyn CourseApi, course_id: i64) -> Result<Self, LoadError> {
        let course = api
            .get_course(course_id)
            .map_err(|e| LoadError::from_api(e, "Kurz nebyl nalezen"))?;
        let drafts = QuestionDrafts::from_modules(&course.modules);
        debug!(course_id, questions = drafts.total_questions(), "loaded course tests");

        Ok(Self {
            course_id,
            course_title: course.title,
            drafts,
            validation_errors: Vec::new(),
            alert: None,
            busy: BusyFlag::default(),
        })
    }

    pub fn course_id(&self) -> i64 {
        self.course_id
    }

    /// Errors from the last blocked continue.
    pub fn validation_errors(&self) -> &[ValidationError] {
        &self.validation_errors
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Flushes the question drafts. New questions are created first, each
    /// followed by its options; updates of existing questions and options then
    /// go out together. Removed questions stay on the server.
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

    /// Validates every module, saves, then moves on to the summary. Nothing is
    /// sent while validation fails.
    pub fn continue_to_summary(
        &mut self,
        api: &dyn CourseApi,
        nav: &mut Navigator,
    ) -> Result<(), WorkflowError> {
        let errors = self.drafts.validate();
        if !errors.is_empty() {
            warn!(
                course_id = self.course_id,
                errors = errors.len(),
                "questions failed validation"
            );
            self.validation_errors = errors.clone();
            return Err(WorkflowError::Validation(errors));
        }
        self.validation_errors.clear();

        self.save(api)?;
        nav.go_to_course_summary(self.course_id);
        Ok(())
    }

    /// Saves without validating and returns to the content step.
    pub fn back(&mut self, api: &dyn CourseApi, nav: &mut Navigator) -> Result<(), WorkflowError> {
        self.save(api)?;
        nav.go_to_course_content(self.course_id);
        Ok(())
    }

    fn flush(&mut self, api: &dyn CourseApi) -> Result<(), WorkflowError> {
        let updates = self.pending_updates();
        let created = self.create_missing(api)?;
        send_all(api, &updates)?;
        info!(
            course_id = self.course_id,
            created,
            updated = updates.len(),
            "saved course tests"
        );
        Ok(())
    }

    fn pending_updates(&self) -> Vec<PendingUpdate> {
        let mut updates = Vec::new();
        for module in self.drafts.modules() {
            for question in self.drafts.questions_for(module.module_id) {
                let Some(question_id) = question.question_id else {
                    continue;
                };
                updates.push(PendingUpdate::Question(
                    question_id,
                    PracticeQuestionUpdate {
                        position: question.server_position(),
                        question_type: question.kind.into(),
                        question: question.question.clone(),
                        correct_answer: question.resolved_correct_answer(),
                        example_answer: question.example_answer.clone(),
                    },
                ));
                if question.kind != QuestionKind::Closed {
                    continue;
                }
                for option in &question.options {
                    if let Some(option_id) = option.option_id {
                        updates.push(PendingUpdate::Option(
                            option_id,
                            PracticeOptionUpdate {
                                position: option.server_position(),
                                text: option.text.clone(),
                            },
                        ));
                    }
                }
            }
        }
        updates
    }

    fn create_missing(&mut self, api: &dyn CourseApi) -> Result<usize, WorkflowError> {
        let mut created = 0;
        let module_ids: Vec<i64> = self.drafts.modules().iter().map(|m| m.module_id).collect();

        for module_id in module_ids {
            let count = self.drafts.questions_for(module_id).len();
            for index in 0..count {
                let Some(question) = self.drafts.question_mut_at(module_id, index) else {
                    continue;
                };
                created += create_question(api, module_id, question)?;
            }
        }

        Ok(created)
    }
}

/// Creates the question if it is new, then every option that has no server id
/// yet. Ids are written back into the draft as soon as they exist.
fn create_question(
    api: &dyn CourseApi,
    module_id: i64,
    question: &mut QuestionDraft,
) -> Result<usize, WorkflowError> {
    let mut created = 0;

    let question_id = match question.question_id {
        Some(id) => id,
        None => {
            let saved = api.create_practice_question(&PracticeQuestionCreate {
                module_id,
                position: question.server_position(),
                question_type: question.kind.into(),
                question: question.question.clone(),
                correct_answer: question.resolved_correct_answer(),
                example_answer: question.example_answer.clone(),
            })?;
            question.question_id = Some(saved.question_id);
            created += 1;
            saved.question_id
        }
    };

    if question.kind != QuestionKind::Closed {
        return Ok(created);
    }

    for option in question.options.iter_mut() {
        if option.option_id.is_some() {
            continue;
        }
        let saved = api.create_practice_option(&PracticeOptionCreate {
            question_id,
            position: option.server_position(),
            text: option.text.clone(),
        })?;
        option.option_id = Some(saved.option_id);
        created += 1;
    }

    Ok(created)
}
