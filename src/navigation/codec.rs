use std::fmt;
use std::str::FromStr;

use url::form_urlencoded;

/// Every screen of the admin console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AdminView {
    #[default]
    Courses,
    CourseContent,
    CourseTests,
    CourseSummary,
    CourseEdit,
    CourseUpload,
    CourseAiCreate,
    ModuleEdit,
}

impl AdminView {
    pub const ALL: [AdminView; 8] = [
        AdminView::Courses,
        AdminView::CourseContent,
        AdminView::CourseTests,
        AdminView::CourseSummary,
        AdminView::CourseEdit,
        AdminView::CourseUpload,
        AdminView::CourseAiCreate,
        AdminView::ModuleEdit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdminView::Courses => "courses",
            AdminView::CourseContent => "course-content",
            AdminView::CourseTests => "course-tests",
            AdminView::CourseSummary => "course-summary",
            AdminView::CourseEdit => "course-edit",
            AdminView::CourseUpload => "course-upload",
            AdminView::CourseAiCreate => "course-ai-create",
            AdminView::ModuleEdit => "module-edit",
        }
    }
}

impl fmt::Display for AdminView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownView(pub String);

impl FromStr for AdminView {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdminView::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownView(s.to_string()))
    }
}

/// What the admin URL encodes. Rebuilt from the URL on every render and never
/// mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationState {
    pub view: AdminView,
    pub course_id: Option<i64>,
    pub module_id: Option<i64>,
}

impl NavigationState {
    pub fn new(view: AdminView) -> Self {
        Self {
            view,
            ..Self::default()
        }
    }

    pub fn with_course(mut self, course_id: i64) -> Self {
        self.course_id = Some(course_id);
        self
    }

    pub fn with_module(mut self, module_id: i64) -> Self {
        self.module_id = Some(module_id);
        self
    }
}

/// A partial update merged over the current state. The outer `Option` says
/// whether the field is touched, the inner one is the new value, so
/// `Some(None)` clears an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationUpdate {
    pub view: Option<AdminView>,
    pub course_id: Option<Option<i64>>,
    pub module_id: Option<Option<i64>>,
}

impl NavigationUpdate {
    pub fn view(view: AdminView) -> Self {
        Self {
            view: Some(view),
            ..Self::default()
        }
    }

    pub fn course_id(mut self, course_id: Option<i64>) -> Self {
        self.course_id = Some(course_id);
        self
    }

    pub fn module_id(mut self, module_id: Option<i64>) -> Self {
        self.module_id = Some(module_id);
        self
    }

    pub fn apply(&self, current: &NavigationState) -> NavigationState {
        NavigationState {
            view: self.view.unwrap_or(current.view),
            course_id: self.course_id.unwrap_or(current.course_id),
            module_id: self.module_id.unwrap_or(current.module_id),
        }
    }
}

/// Parses a query string (with or without the leading `?`).
///
/// A missing or unknown `view` falls back to the course list. Ids that are absent
/// or not integers decode to `None`; nothing here fails. Values are
/// percent-decoded and the first occurrence of a key wins.
pub fn decode(query: &str) -> NavigationState {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut view = None;
    let mut course_id = None;
    let mut module_id = None;

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "view" => {
                view.get_or_insert(value);
            }
            "courseId" => {
                course_id.get_or_insert(value);
            }
            "moduleId" => {
                module_id.get_or_insert(value);
            }
            _ => {}
        }
    }

    NavigationState {
        view: view.and_then(|v| v.parse().ok()).unwrap_or_default(),
        course_id: course_id.as_deref().and_then(parse_id),
        module_id: module_id.as_deref().and_then(parse_id),
    }
}

// integer prefix, like parseInt(value, 10)
fn parse_id(value: &str) -> Option<i64> {
    let value = value.trim();
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, value.strip_prefix('+').unwrap_or(value)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Serializes a state. `view` is left out when it is the default and ids are left
/// out when unset; the result carries no leading `?`.
pub fn serialize(state: &NavigationState) -> String {
    let mut params: Vec<String> = Vec::with_capacity(3);
    if state.view != AdminView::default() {
        params.push(format!("view={}", state.view));
    }
    if let Some(id) = state.course_id {
        params.push(format!("courseId={}", id));
    }
    if let Some(id) = state.module_id {
        params.push(format!("moduleId={}", id));
    }
    params.join("&")
}

/// Merges `update` over `current` and serializes the result.
pub fn encode(update: &NavigationUpdate, current: &NavigationState) -> String {
    serialize(&update.apply(current))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_is_course_list() {
        assert_eq!(decode(""), NavigationState::default());
        assert_eq!(decode("?"), NavigationState::default());
    }

    #[test]
    fn decodes_all_fields() {
        let state = decode("?view=module-edit&courseId=5&moduleId=12");
        assert_eq!(
            state,
            NavigationState::new(AdminView::ModuleEdit)
                .with_course(5)
                .with_module(12)
        );
    }

    #[test]
    fn non_numeric_id_is_none() {
        let state = decode("view=course-content&courseId=abc");
        assert_eq!(state.view, AdminView::CourseContent);
        assert_eq!(state.course_id, None);
    }

    #[test]
    fn numeric_prefix_is_kept() {
        assert_eq!(decode("courseId=42abc").course_id, Some(42));
        assert_eq!(decode("courseId=").course_id, None);
        assert_eq!(decode("courseId").course_id, None);
    }

    #[test]
    fn first_occurrence_of_a_key_wins() {
        let state = decode("view=course-tests&courseId=5&courseId=7&view=course-edit");
        assert_eq!(state.view, AdminView::CourseTests);
        assert_eq!(state.course_id, Some(5));
    }

    #[test]
    fn escaped_values_are_decoded() {
        let state = decode("view=course%2Dcontent&courseId=%35&moduleId=+8");
        assert_eq!(state.view, AdminView::CourseContent);
        assert_eq!(state.course_id, Some(5));
        assert_eq!(state.module_id, Some(8));
    }

    #[test]
    fn unknown_view_falls_back_to_courses() {
        assert_eq!(decode("view=dashboard").view, AdminView::Courses);
    }

    #[test]
    fn default_view_is_not_written() {
        let state = NavigationState::new(AdminView::Courses).with_course(3);
        assert_eq!(serialize(&state), "courseId=3");
        assert_eq!(serialize(&NavigationState::default()), "");
    }

    #[test]
    fn update_merges_over_current() {
        let current = NavigationState::new(AdminView::ModuleEdit)
            .with_course(5)
            .with_module(7);
        let update = NavigationUpdate::view(AdminView::CourseTests).module_id(None);
        assert_eq!(encode(&update, &current), "view=course-tests&courseId=5");
    }

    #[test]
    fn untouched_fields_survive_merge() {
        let current = NavigationState::new(AdminView::CourseEdit).with_course(9);
        let update = NavigationUpdate::default().module_id(Some(4));
        assert_eq!(
            encode(&update, &current),
            "view=course-edit&courseId=9&moduleId=4"
        );
    }

    #[test]
    fn view_names_round_trip() {
        for view in AdminView::ALL {
            assert_eq!(view.as_str().parse::<AdminView>(), Ok(view));
        }
    }
}
