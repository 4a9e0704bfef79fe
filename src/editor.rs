//! Binding between a rich-text editing engine and the module content drafts.

use tracing::debug;

use crate::drafts::ModuleDrafts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// Toolbar actions, passed straight through to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    Bold,
    Italic,
    Underline,
    Strike,
    Heading(u8),
    Align(Alignment),
    BulletList,
    OrderedList,
    Undo,
    Redo,
    SetLink(String),
    Unlink,
    InsertImage(String),
}

/// The WYSIWYG engine doing the actual editing.
pub trait RichTextEngine {
    /// Current document as HTML.
    fn html(&self) -> String;
    /// Replaces the whole document.
    fn set_content(&mut self, html: &str);
    fn run(&mut self, command: EditorCommand);
    /// Target of the link under the cursor, if any.
    fn link_href(&self) -> Option<String>;
}

/// Asks the author for a URL. `None` means the prompt was cancelled.
pub trait UrlPrompt {
    fn ask(&mut self, message: &str, default: &str) -> Option<String>;
}

pub struct ContentEditor<E> {
    engine: E,
}

impl<E: RichTextEngine> ContentEditor<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Called after every edit: the engine's HTML becomes the selected
    /// module's draft.
    pub fn on_update(&self, drafts: &mut ModuleDrafts) {
        drafts.set_selected_content(&self.engine.html());
    }

    /// Shows the selected module's draft. The document is only replaced when
    /// it differs, so the cursor survives redundant syncs.
    pub fn sync_selection(&mut self, drafts: &ModuleDrafts) {
        let wanted = drafts.selected_content().unwrap_or_default();
        if self.engine.html() != wanted {
            debug!(index = drafts.selected_index(), "loading module into editor");
            self.engine.set_content(wanted);
        }
    }

    pub fn command(&mut self, command: EditorCommand, drafts: &mut ModuleDrafts) {
        self.engine.run(command);
        self.on_update(drafts);
    }

    /// Cancel leaves the link alone, an empty answer removes it.
    pub fn set_link(&mut self, prompt: &mut dyn UrlPrompt, drafts: &mut ModuleDrafts) {
        let current = self.engine.link_href().unwrap_or_default();
        let Some(url) = prompt.ask("URL", &current) else {
            return;
        };
        let url = url.trim();
        let command = if url.is_empty() {
            EditorCommand::Unlink
        } else {
            EditorCommand::SetLink(url.to_string())
        };
        self.command(command, drafts);
    }

    pub fn add_image(&mut self, prompt: &mut dyn UrlPrompt, drafts: &mut ModuleDrafts) {
        match prompt.ask("URL obrázku", "") {
            Some(url) if !url.trim().is_empty() => {
                self.command(EditorCommand::InsertImage(url.trim().to_string()), drafts)
            }
            _ => {}
        }
    }
}
