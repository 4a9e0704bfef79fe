use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub course_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub category_id: Option<i64>,
    /// workflow status on the server, e.g. "draft" or "approved"
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub modules: Vec<Module>,
    #[serde(default)]
    pub files: Vec<CourseFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub module_id: i64,
    pub course_id: i64,
    pub title: String,
    /// 1-based order within the course
    #[serde(default)]
    pub position: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub learn_blocks: Vec<LearnBlock>,
    #[serde(default)]
    pub practice_questions: Vec<PracticeQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnBlock {
    pub learn_id: i64,
    pub module_id: i64,
    #[serde(default)]
    pub position: Option<i32>,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Closed,
    Open,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeQuestion {
    pub question_id: i64,
    #[serde(default)]
    pub position: Option<i32>,
    pub question_type: QuestionType,
    pub question: String,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub example_answer: Option<String>,
    #[serde(default)]
    pub closed_options: Vec<PracticeOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeOption {
    pub option_id: i64,
    pub question_id: i64,
    #[serde(default)]
    pub position: Option<i32>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseFile {
    pub file_id: i64,
    pub course_id: i64,
    pub filename: String,
    #[serde(default)]
    pub file_path: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneratedCourse {
    pub title: String,
    #[serde(default)]
    pub modules: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default)]
pub struct CourseQuery {
    pub include_inactive: bool,
    pub is_published: Option<bool>,
    pub text_search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modules_count: Option<u32>,
    pub category_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseUpdate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modules_count: Option<u32>,
    pub category_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleCreate {
    pub course_id: i64,
    pub title: String,
    pub position: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleUpdate {
    pub title: String,
    pub position: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearnBlockCreate {
    pub module_id: i64,
    pub position: i32,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearnBlockUpdate {
    pub position: i32,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PracticeQuestionCreate {
    pub module_id: i64,
    pub position: i32,
    pub question_type: QuestionType,
    pub question: String,
    pub correct_answer: Option<String>,
    pub example_answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PracticeQuestionUpdate {
    pub position: i32,
    pub question_type: QuestionType,
    pub question: String,
    pub correct_answer: Option<String>,
    pub example_answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PracticeOptionCreate {
    pub question_id: i64,
    pub position: i32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PracticeOptionUpdate {
    pub position: i32,
    pub text: String,
}

fn default_true() -> bool {
    true
}
