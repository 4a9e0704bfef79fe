//! Typed access to the PRAKTIK-AI backend.
//!
//! The backend is authoritative for every entity; this crate only issues typed
//! requests against it. Calls are blocking and the trait is `Sync` so a workflow
//! flush can fan independent updates out across scoped threads.

mod client;
mod error;
#[cfg(test)]
pub(crate) mod fake;
mod models;

use std::path::Path;

pub use client::HttpCourseApi;
pub use error::{ApiError, ApiResult, DUPLICATE_TITLE_DETAIL};
pub use models::{
    Category, Course, CourseCreate, CourseFile, CourseQuery, CourseUpdate, GeneratedCourse,
    LearnBlock, LearnBlockCreate, LearnBlockUpdate, Module, ModuleCreate, ModuleUpdate,
    PracticeOption, PracticeOptionCreate, PracticeOptionUpdate, PracticeQuestion,
    PracticeQuestionCreate, PracticeQuestionUpdate, QuestionType,
};

/// Default category for courses created without an explicit choice.
pub const DEFAULT_CATEGORY_ID: i64 = 1;

pub trait CourseApi: Send + Sync {
    fn list_courses(&self, query: &CourseQuery) -> ApiResult<Vec<Course>>;
    fn get_course(&self, course_id: i64) -> ApiResult<Course>;
    fn create_course(&self, data: &CourseCreate) -> ApiResult<Course>;
    fn update_course(&self, course_id: i64, data: &CourseUpdate) -> ApiResult<Course>;
    fn delete_course(&self, course_id: i64) -> ApiResult<()>;
    /// Flips `is_published` server-side and returns the updated course.
    fn toggle_course_publish(&self, course_id: i64) -> ApiResult<Course>;
    fn upload_course_file(&self, course_id: i64, path: &Path) -> ApiResult<CourseFile>;

    fn list_modules(&self, course_id: Option<i64>) -> ApiResult<Vec<Module>>;
    fn create_module(&self, data: &ModuleCreate) -> ApiResult<Module>;
    fn update_module(&self, module_id: i64, data: &ModuleUpdate) -> ApiResult<Module>;

    fn create_learn_block(&self, data: &LearnBlockCreate) -> ApiResult<LearnBlock>;
    fn update_learn_block(&self, learn_id: i64, data: &LearnBlockUpdate) -> ApiResult<LearnBlock>;

    fn create_practice_question(&self, data: &PracticeQuestionCreate)
        -> ApiResult<PracticeQuestion>;
    fn update_practice_question(
        &self,
        question_id: i64,
        data: &PracticeQuestionUpdate,
    ) -> ApiResult<PracticeQuestion>;
    fn create_practice_option(&self, data: &PracticeOptionCreate) -> ApiResult<PracticeOption>;
    fn update_practice_option(
        &self,
        option_id: i64,
        data: &PracticeOptionUpdate,
    ) -> ApiResult<PracticeOption>;

    fn list_categories(&self, include_inactive: bool) -> ApiResult<Vec<Category>>;

    /// Runs the AI course generator over the uploaded course files.
    fn generate_course(&self, course_id: i64) -> ApiResult<GeneratedCourse>;
    /// Builds the retrieval embeddings for every learn block of the course.
    fn generate_course_embeddings(&self, course_id: i64) -> ApiResult<serde_json::Value>;
}
