use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use multipart::client::lazy::Multipart;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::error::{status_error, ApiError, ApiResult};
use super::models::{
    Category, Course, CourseCreate, CourseFile, CourseQuery, CourseUpdate, GeneratedCourse,
    LearnBlock, LearnBlockCreate, LearnBlockUpdate, Module, ModuleCreate, ModuleUpdate,
    PracticeOption, PracticeOptionCreate, PracticeOptionUpdate, PracticeQuestion,
    PracticeQuestionCreate, PracticeQuestionUpdate,
};
use super::CourseApi;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
// AI generation runs for minutes on the server
const GENERATION_TIMEOUT: Duration = Duration::from_secs(600);

/// `CourseApi` over HTTP/JSON.
pub struct HttpCourseApi {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpCourseApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get<T: DeserializeOwned>(&self, request: ureq::Request) -> ApiResult<T> {
        debug!(url = request.url(), "GET");
        decode(finish(request.call(), false)?)
    }

    fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        request: ureq::Request,
        body: &B,
        course_create: bool,
    ) -> ApiResult<T> {
        debug!(method = request.method(), url = request.url(), "sending JSON");
        decode(finish(request.send_json(body), course_create)?)
    }
}

fn finish(
    result: Result<ureq::Response, ureq::Error>,
    course_create: bool,
) -> ApiResult<ureq::Response> {
    match result {
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(code, response)) => {
            let body = response.into_string().unwrap_or_default();
            Err(status_error(code, &body, course_create))
        }
        Err(other) => Err(ApiError::Http(Box::new(other))),
    }
}

fn decode<T: DeserializeOwned>(response: ureq::Response) -> ApiResult<T> {
    response
        .into_json::<T>()
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// The `multipart/form-data` content type and body carrying `path` under the
/// `file` field.
fn file_form(path: &Path) -> ApiResult<(String, Vec<u8>)> {
    let file = File::open(path)?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    let mut form = Multipart::new();
    form.add_stream("file", file, Some(filename), Some(mime));
    let mut prepared = form.prepare().map_err(|e| ApiError::Io(e.error))?;

    let mut body = Vec::new();
    prepared.read_to_end(&mut body)?;
    let content_type = format!("multipart/form-data; boundary={}", prepared.boundary());
    Ok((content_type, body))
}

impl CourseApi for HttpCourseApi {
    fn list_courses(&self, query: &CourseQuery) -> ApiResult<Vec<Course>> {
        let mut request = self
            .agent
            .get(&self.url("/courses"))
            .query("include_inactive", &query.include_inactive.to_string());
        if let Some(published) = query.is_published {
            request = request.query("is_published", &published.to_string());
        }
        if let Some(ref text) = query.text_search {
            request = request.query("text_search", text);
        }
        self.get(request)
    }

    fn get_course(&self, course_id: i64) -> ApiResult<Course> {
        self.get(self.agent.get(&self.url(&format!("/courses/{}", course_id))))
    }

    fn create_course(&self, data: &CourseCreate) -> ApiResult<Course> {
        self.send(self.agent.post(&self.url("/courses")), data, true)
    }

    fn update_course(&self, course_id: i64, data: &CourseUpdate) -> ApiResult<Course> {
        let request = self.agent.put(&self.url(&format!("/courses/{}", course_id)));
        self.send(request, data, false)
    }

    fn delete_course(&self, course_id: i64) -> ApiResult<()> {
        let request = self
            .agent
            .delete(&self.url(&format!("/courses/{}", course_id)));
        debug!(url = request.url(), "DELETE");
        finish(request.call(), false).map(|_| ())
    }

    fn toggle_course_publish(&self, course_id: i64) -> ApiResult<Course> {
        let request = self
            .agent
            .post(&self.url(&format!("/courses/{}/publish", course_id)));
        decode(finish(request.call(), false)?)
    }

    fn upload_course_file(&self, course_id: i64, path: &Path) -> ApiResult<CourseFile> {
        let (content_type, body) = file_form(path)?;
        let request = self
            .agent
            .post(&self.url(&format!("/courses/{}/files", course_id)))
            .set("Content-Type", &content_type);
        debug!(
            url = request.url(),
            file = %path.display(),
            bytes = body.len(),
            "uploading file"
        );
        decode(finish(request.send_bytes(&body), false)?)
    }

    fn list_modules(&self, course_id: Option<i64>) -> ApiResult<Vec<Module>> {
        let mut request = self.agent.get(&self.url("/modules"));
        if let Some(id) = course_id {
            request = request.query("course_id", &id.to_string());
        }
        self.get(request)
    }

    fn create_module(&self, data: &ModuleCreate) -> ApiResult<Module> {
        self.send(self.agent.post(&self.url("/modules")), data, false)
    }

    fn update_module(&self, module_id: i64, data: &ModuleUpdate) -> ApiResult<Module> {
        let request = self.agent.put(&self.url(&format!("/modules/{}", module_id)));
        self.send(request, data, false)
    }

    fn create_learn_block(&self, data: &LearnBlockCreate) -> ApiResult<LearnBlock> {
        let request = self.agent.post(&self.url("/activities/learn-blocks"));
        self.send(request, data, false)
    }

    fn update_learn_block(&self, learn_id: i64, data: &LearnBlockUpdate) -> ApiResult<LearnBlock> {
        let request = self
            .agent
            .put(&self.url(&format!("/activities/learn-blocks/{}", learn_id)));
        self.send(request, data, false)
    }

    fn create_practice_question(
        &self,
        data: &PracticeQuestionCreate,
    ) -> ApiResult<PracticeQuestion> {
        let request = self.agent.post(&self.url("/activities/practice-questions"));
        self.send(request, data, false)
    }

    fn update_practice_question(
        &self,
        question_id: i64,
        data: &PracticeQuestionUpdate,
    ) -> ApiResult<PracticeQuestion> {
        let request = self.agent.put(
            &self.url(&format!("/activities/practice-questions/{}", question_id)),
        );
        self.send(request, data, false)
    }

    fn create_practice_option(&self, data: &PracticeOptionCreate) -> ApiResult<PracticeOption> {
        let request = self.agent.post(&self.url("/activities/practice-options"));
        self.send(request, data, false)
    }

    fn update_practice_option(
        &self,
        option_id: i64,
        data: &PracticeOptionUpdate,
    ) -> ApiResult<PracticeOption> {
        let request = self
            .agent
            .put(&self.url(&format!("/activities/practice-options/{}", option_id)));
        self.send(request, data, false)
    }

    fn list_categories(&self, include_inactive: bool) -> ApiResult<Vec<Category>> {
        let request = self
            .agent
            .get(&self.url("/categories"))
            .query("include_inactive", &include_inactive.to_string());
        self.get(request)
    }

    fn generate_course(&self, course_id: i64) -> ApiResult<GeneratedCourse> {
        let request = self
            .agent
            .post(&self.url("/agents/generate-course"))
            .timeout(GENERATION_TIMEOUT)
            .query("course_id", &course_id.to_string());
        decode(finish(request.call(), false)?)
    }

    fn generate_course_embeddings(&self, course_id: i64) -> ApiResult<serde_json::Value> {
        let request = self
            .agent
            .post(&self.url("/agents/generate-course-embeddings"))
            .timeout(GENERATION_TIMEOUT)
            .query("course_id", &course_id.to_string());
        decode(finish(request.call(), false)?)
    }
}
