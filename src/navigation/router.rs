use super::codec::{AdminView, NavigationState};

/// The view to render for a navigation state, with the ids it needs already
/// resolved. Any state is reachable straight from a URL; the only guard is that
/// a view missing its required id falls back to the course list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewRoute {
    CoursesList,
    CourseContent { course_id: i64 },
    CourseTests { course_id: i64 },
    CourseSummary { course_id: i64 },
    CourseEdit { course_id: i64 },
    CourseUpload,
    CourseAiCreate,
    ModuleEdit { module_id: i64, course_id: Option<i64> },
}

pub fn route(state: &NavigationState) -> ViewRoute {
    let course_id = entity_id(state.course_id);
    match (state.view, course_id) {
        (AdminView::CourseContent, Some(course_id)) => ViewRoute::CourseContent { course_id },
        (AdminView::CourseTests, Some(course_id)) => ViewRoute::CourseTests { course_id },
        (AdminView::CourseSummary, Some(course_id)) => ViewRoute::CourseSummary { course_id },
        (AdminView::CourseEdit, Some(course_id)) => ViewRoute::CourseEdit { course_id },
        (AdminView::CourseUpload, _) => ViewRoute::CourseUpload,
        (AdminView::CourseAiCreate, _) => ViewRoute::CourseAiCreate,
        (AdminView::ModuleEdit, course_id) => match entity_id(state.module_id) {
            Some(module_id) => ViewRoute::ModuleEdit {
                module_id,
                course_id,
            },
            None => ViewRoute::CoursesList,
        },
        _ => ViewRoute::CoursesList,
    }
}

// server ids start at 1; zero or less counts as no id
fn entity_id(id: Option<i64>) -> Option<i64> {
    id.filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_views_need_course_id() {
        for view in [
            AdminView::CourseContent,
            AdminView::CourseTests,
            AdminView::CourseSummary,
            AdminView::CourseEdit,
        ] {
            assert_eq!(route(&NavigationState::new(view)), ViewRoute::CoursesList);
        }
        assert_eq!(
            route(&NavigationState::new(AdminView::CourseSummary).with_course(4)),
            ViewRoute::CourseSummary { course_id: 4 }
        );
    }

    #[test]
    fn zero_id_counts_as_missing() {
        use crate::navigation::decode;

        assert_eq!(
            route(&decode("view=course-content&courseId=0")),
            ViewRoute::CoursesList
        );
        assert_eq!(
            route(&decode("view=module-edit&moduleId=0&courseId=3")),
            ViewRoute::CoursesList
        );
        assert_eq!(
            route(&decode("view=module-edit&moduleId=7&courseId=0")),
            ViewRoute::ModuleEdit {
                module_id: 7,
                course_id: None
            }
        );
    }

    #[test]
    fn module_edit_needs_module_id_only() {
        let state = NavigationState::new(AdminView::ModuleEdit).with_course(3);
        assert_eq!(route(&state), ViewRoute::CoursesList);
        assert_eq!(
            route(&NavigationState::new(AdminView::ModuleEdit).with_module(9)),
            ViewRoute::ModuleEdit {
                module_id: 9,
                course_id: None
            }
        );
    }

    #[test]
    fn create_flows_ignore_ids() {
        let state = NavigationState::new(AdminView::CourseUpload).with_course(1);
        assert_eq!(route(&state), ViewRoute::CourseUpload);
        assert_eq!(
            route(&NavigationState::new(AdminView::CourseAiCreate)),
            ViewRoute::CourseAiCreate
        );
    }

    #[test]
    fn any_step_is_reachable_directly() {
        let state = NavigationState::new(AdminView::CourseSummary).with_course(11);
        assert_eq!(route(&state), ViewRoute::CourseSummary { course_id: 11 });
    }
}
