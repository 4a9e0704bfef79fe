//! In-memory `CourseApi` for tests. Records every call so tests can assert on
//! ordering, and can be told to fail a named operation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListCourses,
    GetCourse(i64),
    CreateCourse(String),
    UpdateCourse(i64),
    DeleteCourse(i64),
    TogglePublish(i64),
    UploadFile(i64, String),
    ListModules(Option<i64>),
    CreateModule { course_id: i64, title: String },
    UpdateModule(i64),
    CreateLearnBlock { module_id: i64 },
    UpdateLearnBlock(i64),
    CreateQuestion { module_id: i64 },
    UpdateQuestion(i64),
    CreateOption { question_id: i64 },
    UpdateOption(i64),
    ListCategories,
    GenerateCourse(i64),
    GenerateEmbeddings(i64),
}

#[derive(Default)]
struct State {
    courses: Vec<Course>,
    categories: Vec<Category>,
    next_id: i64,
    calls: Vec<Call>,
    failing: Vec<&'static str>,
}

pub struct FakeApi {
    state: Mutex<State>,
}

pub fn course(course_id: i64, title: &str) -> Course {
    Course {
        course_id,
        title: title.to_string(),
        description: Some(format!("{} popis", title)),
        is_published: false,
        is_active: true,
        category_id: Some(2),
        status: Some(String::from("draft")),
        modules: Vec::new(),
        files: Vec::new(),
    }
}

pub fn module(module_id: i64, course_id: i64, title: &str, position: i32) -> Module {
    Module {
        module_id,
        course_id,
        title: title.to_string(),
        position: Some(position),
        is_active: true,
        learn_blocks: Vec::new(),
        practice_questions: Vec::new(),
    }
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 100,
                categories: vec![
                    Category {
                        category_id: 3,
                        name: String::from("Prompting"),
                        description: None,
                        is_active: true,
                    },
                    Category {
                        category_id: 4,
                        name: String::from("Etika"),
                        description: None,
                        is_active: true,
                    },
                ],
                ..State::default()
            }),
        }
    }

    pub fn with_course(self, course: Course) -> Self {
        self.state.lock().unwrap().courses.push(course);
        self
    }

    pub fn without_categories(self) -> Self {
        self.state.lock().unwrap().categories.clear();
        self
    }

    pub fn fail_on(&self, operation: &'static str) {
        self.state.lock().unwrap().failing.push(operation);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn stored_course(&self, course_id: i64) -> Option<Course> {
        self.state
            .lock()
            .unwrap()
            .courses
            .iter()
            .find(|c| c.course_id == course_id)
            .cloned()
    }

    fn begin(&self, operation: &'static str, call: Call) -> ApiResult<MutexGuard<'_, State>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.failing.contains(&operation) {
            return Err(ApiError::Status {
                status: 500,
                detail: Some(format!("{} failed", operation)),
            });
        }
        Ok(state)
    }
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn modules_mut(&mut self) -> impl Iterator<Item = &mut Module> + '_ {
        self.courses.iter_mut().flat_map(|c| c.modules.iter_mut())
    }

    fn questions_mut(&mut self) -> impl Iterator<Item = &mut PracticeQuestion> + '_ {
        self.modules_mut()
            .flat_map(|m| m.practice_questions.iter_mut())
    }

    fn course_mut(&mut self, course_id: i64) -> ApiResult<&mut Course> {
        self.courses
            .iter_mut()
            .find(|c| c.course_id == course_id)
            .ok_or_else(|| ApiError::NotFound(String::from("Kurz nenalezen")))
    }
}

impl CourseApi for FakeApi {
    fn list_courses(&self, _query: &CourseQuery) -> ApiResult<Vec<Course>> {
        let state = self.begin("list_courses", Call::ListCourses)?;
        Ok(state.courses.clone())
    }

    fn get_course(&self, course_id: i64) -> ApiResult<Course> {
        let mut state = self.begin("get_course", Call::GetCourse(course_id))?;
        state.course_mut(course_id).map(|c| c.clone())
    }

    fn create_course(&self, data: &CourseCreate) -> ApiResult<Course> {
        let mut state = self.begin("create_course", Call::CreateCourse(data.title.clone()))?;
        if state.courses.iter().any(|c| c.title == data.title) {
            return Err(ApiError::Conflict(DUPLICATE_TITLE_DETAIL.to_string()));
        }
        let id = state.next_id();
        let mut created = course(id, &data.title);
        created.description = data.description.clone();
        created.category_id = Some(data.category_id);
        state.courses.push(created.clone());
        Ok(created)
    }

    fn update_course(&self, course_id: i64, data: &CourseUpdate) -> ApiResult<Course> {
        let mut state = self.begin("update_course", Call::UpdateCourse(course_id))?;
        let course = state.course_mut(course_id)?;
        course.title = data.title.clone();
        course.description = data.description.clone();
        course.category_id = Some(data.category_id);
        Ok(course.clone())
    }

    fn delete_course(&self, course_id: i64) -> ApiResult<()> {
        let mut state = self.begin("delete_course", Call::DeleteCourse(course_id))?;
        state.courses.retain(|c| c.course_id != course_id);
        Ok(())
    }

    fn toggle_course_publish(&self, course_id: i64) -> ApiResult<Course> {
        let mut state = self.begin("toggle_course_publish", Call::TogglePublish(course_id))?;
        let course = state.course_mut(course_id)?;
        course.is_published = !course.is_published;
        Ok(course.clone())
    }

    fn upload_course_file(&self, course_id: i64, path: &Path) -> ApiResult<CourseFile> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let mut state = self.begin(
            "upload_course_file",
            Call::UploadFile(course_id, filename.clone()),
        )?;
        let file_id = state.next_id();
        let file = CourseFile {
            file_id,
            course_id,
            filename,
            file_path: path.display().to_string(),
        };
        state.course_mut(course_id)?.files.push(file.clone());
        Ok(file)
    }

    fn list_modules(&self, course_id: Option<i64>) -> ApiResult<Vec<Module>> {
        let state = self.begin("list_modules", Call::ListModules(course_id))?;
        Ok(state
            .courses
            .iter()
            .filter(|c| course_id.map_or(true, |id| c.course_id == id))
            .flat_map(|c| c.modules.iter().cloned())
            .collect())
    }

    fn create_module(&self, data: &ModuleCreate) -> ApiResult<Module> {
        let mut state = self.begin(
            "create_module",
            Call::CreateModule {
                course_id: data.course_id,
                title: data.title.clone(),
            },
        )?;
        let id = state.next_id();
        let created = module(id, data.course_id, &data.title, data.position);
        state.course_mut(data.course_id)?.modules.push(created.clone());
        Ok(created)
    }

    fn update_module(&self, module_id: i64, data: &ModuleUpdate) -> ApiResult<Module> {
        let mut state = self.begin("update_module", Call::UpdateModule(module_id))?;
        let module = state
            .modules_mut()
            .find(|m| m.module_id == module_id)
            .ok_or_else(|| ApiError::NotFound(String::from("Modul nenalezen")))?;
        module.title = data.title.clone();
        module.position = Some(data.position);
        Ok(module.clone())
    }

    fn create_learn_block(&self, data: &LearnBlockCreate) -> ApiResult<LearnBlock> {
        let mut state = self.begin(
            "create_learn_block",
            Call::CreateLearnBlock {
                module_id: data.module_id,
            },
        )?;
        let learn_id = state.next_id();
        let block = LearnBlock {
            learn_id,
            module_id: data.module_id,
            position: Some(data.position),
            content: data.content.clone(),
        };
        let module = state
            .modules_mut()
            .find(|m| m.module_id == data.module_id)
            .ok_or_else(|| ApiError::NotFound(String::from("Modul nenalezen")))?;
        module.learn_blocks.push(block.clone());
        Ok(block)
    }

    fn update_learn_block(&self, learn_id: i64, data: &LearnBlockUpdate) -> ApiResult<LearnBlock> {
        let mut state = self.begin("update_learn_block", Call::UpdateLearnBlock(learn_id))?;
        let block = state
            .modules_mut()
            .flat_map(|m| m.learn_blocks.iter_mut())
            .find(|b| b.learn_id == learn_id)
            .ok_or_else(|| ApiError::NotFound(String::from("Blok nenalezen")))?;
        block.content = data.content.clone();
        block.position = Some(data.position);
        Ok(block.clone())
    }

    fn create_practice_question(
        &self,
        data: &PracticeQuestionCreate,
    ) -> ApiResult<PracticeQuestion> {
        let mut state = self.begin(
            "create_practice_question",
            Call::CreateQuestion {
                module_id: data.module_id,
            },
        )?;
        let question_id = state.next_id();
        let question = PracticeQuestion {
            question_id,
            position: Some(data.position),
            question_type: data.question_type,
            question: data.question.clone(),
            correct_answer: data.correct_answer.clone(),
            example_answer: data.example_answer.clone(),
            closed_options: Vec::new(),
        };
        let module = state
            .modules_mut()
            .find(|m| m.module_id == data.module_id)
            .ok_or_else(|| ApiError::NotFound(String::from("Modul nenalezen")))?;
        module.practice_questions.push(question.clone());
        Ok(question)
    }

    fn update_practice_question(
        &self,
        question_id: i64,
        data: &PracticeQuestionUpdate,
    ) -> ApiResult<PracticeQuestion> {
        let mut state = self.begin("update_practice_question", Call::UpdateQuestion(question_id))?;
        let question = state
            .questions_mut()
            .find(|q| q.question_id == question_id)
            .ok_or_else(|| ApiError::NotFound(String::from("Otázka nenalezena")))?;
        question.question = data.question.clone();
        question.question_type = data.question_type;
        question.correct_answer = data.correct_answer.clone();
        question.example_answer = data.example_answer.clone();
        question.position = Some(data.position);
        Ok(question.clone())
    }

    fn create_practice_option(&self, data: &PracticeOptionCreate) -> ApiResult<PracticeOption> {
        let mut state = self.begin(
            "create_practice_option",
            Call::CreateOption {
                question_id: data.question_id,
            },
        )?;
        let option_id = state.next_id();
        let option = PracticeOption {
            option_id,
            question_id: data.question_id,
            position: Some(data.position),
            text: data.text.clone(),
        };
        let question = state
            .questions_mut()
            .find(|q| q.question_id == data.question_id)
            .ok_or_else(|| ApiError::NotFound(String::from("Otázka nenalezena")))?;
        question.closed_options.push(option.clone());
        Ok(option)
    }

    fn update_practice_option(
        &self,
        option_id: i64,
        data: &PracticeOptionUpdate,
    ) -> ApiResult<PracticeOption> {
        let mut state = self.begin("update_practice_option", Call::UpdateOption(option_id))?;
        let option = state
            .questions_mut()
            .flat_map(|q| q.closed_options.iter_mut())
            .find(|o| o.option_id == option_id)
            .ok_or_else(|| ApiError::NotFound(String::from("Možnost nenalezena")))?;
        option.text = data.text.clone();
        option.position = Some(data.position);
        Ok(option.clone())
    }

    fn list_categories(&self, _include_inactive: bool) -> ApiResult<Vec<Category>> {
        let state = self.begin("list_categories", Call::ListCategories)?;
        Ok(state.categories.clone())
    }

    fn generate_course(&self, course_id: i64) -> ApiResult<GeneratedCourse> {
        let mut state = self.begin("generate_course", Call::GenerateCourse(course_id))?;
        let title = state.course_mut(course_id)?.title.clone();
        Ok(GeneratedCourse {
            title,
            modules: Vec::new(),
        })
    }

    fn generate_course_embeddings(&self, course_id: i64) -> ApiResult<serde_json::Value> {
        let mut state = self.begin("generate_course_embeddings", Call::GenerateEmbeddings(course_id))?;
        state.course_mut(course_id)?;
        Ok(serde_json::json!({ "course_id": course_id, "embeddings": 0 }))
    }
}
