//! Slug-addressed course and module lookup for the public pages.

use std::sync::OnceLock;

use regex::Regex;

use crate::api::{ApiResult, Course, CourseApi, CourseQuery, Module};
use crate::workflow::LoadError;

fn separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"[^a-z0-9]+").unwrap())
}

/// URL slug of a title: lowercased, every run of characters outside `a-z0-9`
/// becomes one hyphen, no leading or trailing hyphens.
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    separator()
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// A path segment naming a course or module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseRef {
    /// All-digit segments from older links address by id.
    Id(i64),
    Slug(String),
}

impl CourseRef {
    pub fn parse(segment: &str) -> Self {
        let segment = segment.trim();
        if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = segment.parse() {
                return CourseRef::Id(id);
            }
        }
        CourseRef::Slug(segment.to_string())
    }

    fn matches(&self, id: i64, title: &str) -> bool {
        match self {
            CourseRef::Id(wanted) => *wanted == id,
            CourseRef::Slug(slug) => slugify(title) == *slug,
        }
    }
}

fn not_found<T>(found: Option<T>, message: &str) -> Result<T, LoadError> {
    found.ok_or_else(|| LoadError::NotFound(message.to_string()))
}

fn fetch<T>(result: ApiResult<T>) -> Result<T, LoadError> {
    result.map_err(LoadError::Api)
}

pub fn resolve_course(api: &dyn CourseApi, segment: &str) -> Result<Course, LoadError> {
    let wanted = CourseRef::parse(segment);
    let courses = fetch(api.list_courses(&CourseQuery::default()))?;
    let course = courses
        .into_iter()
        .find(|c| wanted.matches(c.course_id, &c.title));
    not_found(course, "Kurz nebyl nalezen.")
}

/// Looks a module up across every course, by id or by the slug of its title.
pub fn resolve_module(api: &dyn CourseApi, segment: &str) -> Result<Module, LoadError> {
    let wanted = CourseRef::parse(segment);
    let modules = fetch(api.list_modules(None))?;
    let module = modules
        .into_iter()
        .find(|m| wanted.matches(m.module_id, &m.title));
    not_found(module, "Modul nebyl nalezen.")
}

/// The modules a learner sees: active ones in position order.
pub fn active_modules(course: &Course) -> Vec<&Module> {
    let mut modules: Vec<&Module> = course.modules.iter().filter(|m| m.is_active).collect();
    modules.sort_by_key(|m| m.position.unwrap_or(i32::MAX));
    modules
}
