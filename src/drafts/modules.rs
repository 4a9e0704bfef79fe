use std::collections::HashMap;

use crate::api::Course;

/// A module as the content editor sees it. Temporary modules carry a negative
/// id handed out locally until the save step creates them server-side.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalModule {
    pub module_id: i64,
    pub title: String,
    /// 1-based display position
    pub position: i32,
    pub is_temporary: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModuleContent {
    /// serialized HTML from the rich-text editor
    pub content: String,
    pub learn_id: Option<i64>,
    pub position: i32,
}

impl ModuleContent {
    fn new(content: String, learn_id: Option<i64>, position: i32) -> Self {
        Self {
            content,
            learn_id,
            position,
        }
    }
}

/// Ordered module list plus the per-module content drafts.
///
/// Content is keyed by module id, never by display position, so reordering and
/// deleting only touch `modules` and the content follows its module. Promoting a
/// temporary module re-keys its entry to the server id.
#[derive(Debug, Clone)]
pub struct ModuleDrafts {
    modules: Vec<LocalModule>,
    contents: HashMap<i64, ModuleContent>,
    selected: usize,
    next_temp_id: i64,
}

impl Default for ModuleDrafts {
    fn default() -> Self {
        Self {
            modules: Vec::new(),
            contents: HashMap::new(),
            selected: 0,
            next_temp_id: -1,
        }
    }
}

impl ModuleDrafts {
    /// Builds the drafts from a freshly loaded course. A module without a learn
    /// block starts from the course description.
    pub fn from_course(course: &Course) -> Self {
        let mut drafts = Self::default();
        let fallback = course.description.clone().unwrap_or_default();

        for (idx, module) in course.modules.iter().enumerate() {
            drafts.modules.push(LocalModule {
                module_id: module.module_id,
                title: module.title.clone(),
                position: module.position.unwrap_or(idx as i32 + 1),
                is_temporary: false,
            });
            let content = match module.learn_blocks.first() {
                Some(block) => ModuleContent::new(
                    block.content.clone(),
                    Some(block.learn_id),
                    block.position.unwrap_or(1),
                ),
                None => ModuleContent::new(fallback.clone(), None, 1),
            };
            drafts.contents.insert(module.module_id, content);
        }

        drafts
    }

    pub fn modules(&self) -> &[LocalModule] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_module(&self) -> Option<&LocalModule> {
        self.modules.get(self.selected)
    }

    pub fn select(&mut self, index: usize) {
        if index < self.modules.len() {
            self.selected = index;
        }
    }

    pub fn content(&self, module_id: i64) -> Option<&ModuleContent> {
        self.contents.get(&module_id)
    }

    /// Content of the module currently shown at `position` (0-based).
    pub fn content_at(&self, position: usize) -> Option<&ModuleContent> {
        self.modules
            .get(position)
            .and_then(|m| self.contents.get(&m.module_id))
    }

    pub fn contents_in_order(&self) -> Vec<Option<&ModuleContent>> {
        (0..self.modules.len()).map(|i| self.content_at(i)).collect()
    }

    pub fn selected_content(&self) -> Option<&str> {
        self.content_at(self.selected).map(|c| c.content.as_str())
    }

    /// Writes `html` into the selected module's draft.
    pub fn set_selected_content(&mut self, html: &str) {
        if let Some(module_id) = self.selected_module().map(|m| m.module_id) {
            self.set_content(module_id, html);
        }
    }

    pub fn set_content(&mut self, module_id: i64, html: &str) {
        let entry = self
            .contents
            .entry(module_id)
            .or_insert_with(|| ModuleContent::new(String::new(), None, 1));
        entry.content = html.to_string();
    }

    /// Appends a temporary module and selects it. Blank titles are ignored.
    pub fn add_module(&mut self, title: &str) -> Option<i64> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }

        let module_id = self.next_temp_id;
        self.next_temp_id -= 1;
        self.modules.push(LocalModule {
            module_id,
            title: title.to_string(),
            position: self.modules.len() as i32 + 1,
            is_temporary: true,
        });
        self.contents
            .insert(module_id, ModuleContent::new(String::new(), None, 1));
        self.selected = self.modules.len() - 1;
        Some(module_id)
    }

    /// Moves the module at `from` to `to` and renumbers positions. The selection
    /// keeps pointing at the same module.
    pub fn reorder(&mut self, from: usize, to: usize) {
        if from == to || from >= self.modules.len() || to >= self.modules.len() {
            return;
        }

        let moved = self.modules.remove(from);
        self.modules.insert(to, moved);
        self.renumber();

        if self.selected == from {
            self.selected = to;
        } else if self.selected > from && self.selected <= to {
            self.selected -= 1;
        } else if self.selected < from && self.selected >= to {
            self.selected += 1;
        }
    }

    /// Drops a temporary module together with its draft. Persisted modules are
    /// left alone and `false` is returned.
    pub fn delete_module(&mut self, index: usize) -> bool {
        match self.modules.get(index) {
            Some(module) if module.is_temporary => {}
            _ => return false,
        }

        let removed = self.modules.remove(index);
        self.contents.remove(&removed.module_id);
        self.renumber();

        if self.selected >= self.modules.len() {
            self.selected = self.modules.len().saturating_sub(1);
        } else if self.selected > index {
            self.selected -= 1;
        }
        true
    }

    /// Swaps a temporary id for the id the server assigned.
    pub fn promote(&mut self, temp_id: i64, module_id: i64) {
        if let Some(module) = self.modules.iter_mut().find(|m| m.module_id == temp_id) {
            module.module_id = module_id;
            module.is_temporary = false;
        }
        if let Some(content) = self.contents.remove(&temp_id) {
            self.contents.insert(module_id, content);
        }
    }

    pub fn set_learn_block(&mut self, module_id: i64, learn_id: i64, position: i32) {
        if let Some(content) = self.contents.get_mut(&module_id) {
            content.learn_id = Some(learn_id);
            content.position = position;
        }
    }

    pub fn has_temporary(&self) -> bool {
        self.modules.iter().any(|m| m.is_temporary)
    }

    fn renumber(&mut self) {
        for (idx, module) in self.modules.iter_mut().enumerate() {
            module.position = idx as i32 + 1;
        }
    }
}
