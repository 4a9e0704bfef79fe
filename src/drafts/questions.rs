use std::collections::HashMap;
use std::fmt;

use crate::api::{Module, PracticeQuestion, QuestionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Closed,
    Open,
}

impl From<QuestionType> for QuestionKind {
    fn from(value: QuestionType) -> Self {
        match value {
            QuestionType::Closed => QuestionKind::Closed,
            QuestionType::Open => QuestionKind::Open,
        }
    }
}

impl From<QuestionKind> for QuestionType {
    fn from(value: QuestionKind) -> Self {
        match value {
            QuestionKind::Closed => QuestionType::Closed,
            QuestionKind::Open => QuestionType::Open,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionDraft {
    /// local id, unique within the question
    pub id: i64,
    /// server id; `None` means the option still has to be created
    pub option_id: Option<i64>,
    pub position: Option<i32>,
    pub text: String,
    pub is_correct: bool,
}

impl OptionDraft {
    pub fn blank(id: i64) -> Self {
        Self {
            id,
            option_id: None,
            position: None,
            text: String::new(),
            is_correct: false,
        }
    }

    pub fn server_position(&self) -> i32 {
        self.position.unwrap_or(self.id as i32)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDraft {
    /// local id, unique within the module
    pub id: i64,
    /// server id; `None` means the question still has to be created
    pub question_id: Option<i64>,
    pub position: Option<i32>,
    pub question: String,
    pub kind: QuestionKind,
    pub correct_answer: Option<String>,
    pub example_answer: Option<String>,
    pub options: Vec<OptionDraft>,
}

const BLANK_OPTIONS: i64 = 3;

fn blank_options() -> Vec<OptionDraft> {
    (1..=BLANK_OPTIONS).map(OptionDraft::blank).collect()
}

impl QuestionDraft {
    /// A new closed question with three empty options.
    pub fn blank(id: i64) -> Self {
        Self {
            id,
            question_id: None,
            position: None,
            question: String::new(),
            kind: QuestionKind::Closed,
            correct_answer: None,
            example_answer: None,
            options: blank_options(),
        }
    }

    /// Local ids follow the server order. The correct option is the one whose
    /// text equals the stored correct answer.
    pub fn from_practice(question: &PracticeQuestion, index: usize) -> Self {
        let options = question
            .closed_options
            .iter()
            .enumerate()
            .map(|(idx, opt)| OptionDraft {
                id: idx as i64 + 1,
                option_id: Some(opt.option_id),
                position: opt.position,
                text: opt.text.clone(),
                is_correct: question.correct_answer.as_deref() == Some(opt.text.as_str()),
            })
            .collect();

        Self {
            id: index as i64 + 1,
            question_id: Some(question.question_id),
            position: question.position,
            question: question.question.clone(),
            kind: question.question_type.into(),
            correct_answer: question.correct_answer.clone(),
            example_answer: question.example_answer.clone(),
            options,
        }
    }

    pub fn server_position(&self) -> i32 {
        self.position.unwrap_or(self.id as i32)
    }

    /// The answer sent to the server: the marked option's text, else the stored
    /// answer.
    pub fn resolved_correct_answer(&self) -> Option<String> {
        self.options
            .iter()
            .find(|o| o.is_correct)
            .map(|o| o.text.clone())
            .or_else(|| self.correct_answer.clone())
    }

    pub fn set_kind(&mut self, kind: QuestionKind) {
        if kind == QuestionKind::Closed && self.kind == QuestionKind::Open && self.options.is_empty()
        {
            self.options = blank_options();
        }
        self.kind = kind;
    }

    pub fn set_option_text(&mut self, option: i64, text: &str) {
        if let Some(opt) = self.options.iter_mut().find(|o| o.id == option) {
            opt.text = text.to_string();
        }
    }

    pub fn set_correct_option(&mut self, option: i64) {
        for opt in self.options.iter_mut() {
            opt.is_correct = opt.id == option;
        }
    }

    pub fn add_option(&mut self) -> i64 {
        let id = self.options.iter().map(|o| o.id).max().unwrap_or(0) + 1;
        self.options.push(OptionDraft::blank(id));
        id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub module_index: usize,
    pub module_name: String,
    pub question_index: usize,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.module_name, self.message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleRef {
    pub module_id: i64,
    pub title: String,
}

/// Question drafts for every module of a course, keyed by module id.
#[derive(Debug, Clone, Default)]
pub struct QuestionDrafts {
    modules: Vec<ModuleRef>,
    questions: HashMap<i64, Vec<QuestionDraft>>,
    selected: usize,
}

impl QuestionDrafts {
    pub fn from_modules(modules: &[Module]) -> Self {
        let mut drafts = Self::default();
        for module in modules {
            drafts.modules.push(ModuleRef {
                module_id: module.module_id,
                title: module.title.clone(),
            });
            let questions = module
                .practice_questions
                .iter()
                .enumerate()
                .map(|(idx, q)| QuestionDraft::from_practice(q, idx))
                .collect();
            drafts.questions.insert(module.module_id, questions);
        }
        drafts
    }

    pub fn modules(&self) -> &[ModuleRef] {
        &self.modules
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn select(&mut self, index: usize) {
        if index < self.modules.len() {
            self.selected = index;
        }
    }

    pub fn questions_for(&self, module_id: i64) -> &[QuestionDraft] {
        self.questions
            .get(&module_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn questions_at(&self, index: usize) -> &[QuestionDraft] {
        match self.modules.get(index) {
            Some(module) => self.questions_for(module.module_id),
            None => &[],
        }
    }

    /// Questions of the selected module.
    pub fn questions(&self) -> &[QuestionDraft] {
        self.questions_at(self.selected)
    }

    fn selected_list(&mut self) -> Option<&mut Vec<QuestionDraft>> {
        let module_id = self.modules.get(self.selected)?.module_id;
        Some(self.questions.entry(module_id).or_default())
    }

    pub fn question_mut(&mut self, id: i64) -> Option<&mut QuestionDraft> {
        self.selected_list()?.iter_mut().find(|q| q.id == id)
    }

    pub fn question_mut_at(&mut self, module_id: i64, index: usize) -> Option<&mut QuestionDraft> {
        self.questions.get_mut(&module_id)?.get_mut(index)
    }

    /// Appends a blank question to the selected module.
    pub fn add_question(&mut self) -> Option<i64> {
        let list = self.selected_list()?;
        let id = list.iter().map(|q| q.id).max().unwrap_or(0) + 1;
        list.push(QuestionDraft::blank(id));
        Some(id)
    }

    /// Drops a question from the draft. Nothing is deleted server-side.
    pub fn remove_question(&mut self, id: i64) {
        if let Some(list) = self.selected_list() {
            list.retain(|q| q.id != id);
        }
    }

    pub fn set_question_text(&mut self, id: i64, text: &str) {
        if let Some(q) = self.question_mut(id) {
            q.question = text.to_string();
        }
    }

    pub fn set_example_answer(&mut self, id: i64, text: &str) {
        if let Some(q) = self.question_mut(id) {
            q.example_answer = Some(text.to_string());
        }
    }

    pub fn set_kind(&mut self, id: i64, kind: QuestionKind) {
        if let Some(q) = self.question_mut(id) {
            q.set_kind(kind);
        }
    }

    pub fn set_option_text(&mut self, id: i64, option: i64, text: &str) {
        if let Some(q) = self.question_mut(id) {
            q.set_option_text(option, text);
        }
    }

    pub fn set_correct_option(&mut self, id: i64, option: i64) {
        if let Some(q) = self.question_mut(id) {
            q.set_correct_option(option);
        }
    }

    pub fn total_questions(&self) -> usize {
        self.questions.values().map(Vec::len).sum()
    }

    /// Checks every question of every module; an empty result means the drafts
    /// may be saved.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for (module_index, module) in self.modules.iter().enumerate() {
            let module_name = if module.title.trim().is_empty() {
                format!("Modul {}", module_index + 1)
            } else {
                module.title.clone()
            };

            for (question_index, question) in self.questions_for(module.module_id).iter().enumerate()
            {
                let n = question_index + 1;
                let mut push = |message: String| {
                    errors.push(ValidationError {
                        module_index,
                        module_name: module_name.clone(),
                        question_index,
                        message,
                    })
                };

                if question.question.trim().is_empty() {
                    push(format!("Otázka {} nemá zadaný text otázky", n));
                }

                match question.kind {
                    QuestionKind::Closed => {
                        if !question.options.iter().any(|o| !o.text.trim().is_empty()) {
                            push(format!("Otázka {} nemá žádné možnosti odpovědí", n));
                        }
                        if !question
                            .options
                            .iter()
                            .any(|o| o.is_correct && !o.text.trim().is_empty())
                        {
                            push(format!("Otázka {} nemá označenou správnou odpověď", n));
                        }
                    }
                    QuestionKind::Open => {
                        let has_example = question
                            .example_answer
                            .as_deref()
                            .is_some_and(|a| !a.trim().is_empty());
                        if !has_example {
                            push(format!("Otázka {} nemá příklad odpovědi", n));
                        }
                    }
                }
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::module;
    use crate::api::PracticeOption;

    fn stored_question() -> PracticeQuestion {
        PracticeQuestion {
            question_id: 30,
            position: Some(1),
            question_type: QuestionType::Closed,
            question: String::from("Co je prompt?"),
            correct_answer: Some(String::from("Zadání")),
            example_answer: None,
            closed_options: vec![
                PracticeOption {
                    option_id: 31,
                    question_id: 30,
                    position: Some(1),
                    text: String::from("Obrázek"),
                },
                PracticeOption {
                    option_id: 32,
                    question_id: 30,
                    position: Some(2),
                    text: String::from("Zadání"),
                },
            ],
        }
    }

    fn drafts() -> QuestionDrafts {
        let mut m = module(10, 1, "Úvod", 1);
        m.practice_questions.push(stored_question());
        QuestionDrafts::from_modules(&[m, module(11, 1, "", 2)])
    }

    #[test]
    fn loaded_question_marks_correct_option_by_text() {
        let d = drafts();
        let q = &d.questions()[0];
        assert_eq!(q.id, 1);
        assert_eq!(q.question_id, Some(30));
        assert_eq!(q.kind, QuestionKind::Closed);
        assert!(!q.options[0].is_correct);
        assert!(q.options[1].is_correct);
        assert_eq!(q.options[1].id, 2);
        assert!(d.validate().is_empty());
    }

    #[test]
    fn new_question_is_closed_with_three_options() {
        let mut d = drafts();
        let id = d.add_question().unwrap();
        assert_eq!(id, 2);
        let q = &d.questions()[1];
        assert_eq!(q.kind, QuestionKind::Closed);
        assert_eq!(q.options.len(), 3);
        assert!(q.question_id.is_none());
    }

    #[test]
    fn switching_to_closed_restores_options() {
        let mut q = QuestionDraft::blank(1);
        q.set_kind(QuestionKind::Open);
        q.options.clear();
        q.set_kind(QuestionKind::Closed);
        assert_eq!(q.options.len(), 3);
    }

    #[test]
    fn second_question_with_empty_option_reports_both_errors() {
        let mut d = drafts();
        let id = d.add_question().unwrap();
        d.set_question_text(id, "Druhá otázka");
        d.question_mut(id).unwrap().options = vec![OptionDraft::blank(1)];

        let errors = d.validate();
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert!(messages.contains(&"Otázka 2 nemá žádné možnosti odpovědí"));
        assert!(messages.contains(&"Otázka 2 nemá označenou správnou odpověď"));
        assert!(errors.iter().all(|e| e.question_index == 1 && e.module_name == "Úvod"));
    }

    #[test]
    fn correct_flag_on_empty_option_does_not_count() {
        let mut d = drafts();
        let id = d.add_question().unwrap();
        d.set_question_text(id, "Otázka");
        d.set_option_text(id, 1, "Ano");
        d.set_correct_option(id, 2);
        let errors = d.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Otázka 2 nemá označenou správnou odpověď");
    }

    #[test]
    fn open_question_needs_example_answer() {
        let mut d = drafts();
        d.select(1);
        let id = d.add_question().unwrap();
        d.set_kind(id, QuestionKind::Open);
        d.set_question_text(id, "Popište prompt");
        d.set_example_answer(id, "   ");

        let errors = d.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].module_index, 1);
        assert_eq!(errors[0].module_name, "Modul 2");
        assert_eq!(errors[0].message, "Otázka 1 nemá příklad odpovědi");

        d.set_example_answer(id, "Jasné zadání");
        assert!(d.validate().is_empty());
    }

    #[test]
    fn blank_text_is_reported() {
        let mut d = drafts();
        d.set_question_text(1, "  ");
        let errors = d.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Otázka 1 nemá zadaný text otázky");
    }

    #[test]
    fn resolved_answer_prefers_marked_option() {
        let mut q = QuestionDraft::from_practice(&stored_question(), 0);
        assert_eq!(q.resolved_correct_answer().as_deref(), Some("Zadání"));
        q.set_correct_option(1);
        assert_eq!(q.resolved_correct_answer().as_deref(), Some("Obrázek"));
        q.options.iter_mut().for_each(|o| o.is_correct = false);
        assert_eq!(q.resolved_correct_answer().as_deref(), Some("Zadání"));
    }

    #[test]
    fn removing_question_only_touches_selected_module() {
        let mut d = drafts();
        d.remove_question(1);
        assert!(d.questions().is_empty());
        assert_eq!(d.total_questions(), 0);
    }

    #[test]
    fn add_option_uses_next_local_id() {
        let mut q = QuestionDraft::blank(1);
        assert_eq!(q.add_option(), 4);
        assert_eq!(q.options.len(), 4);
    }
}
