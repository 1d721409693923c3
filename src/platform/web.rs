//! Browser implementations: `window.localStorage` and DOM helpers

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, Storage};

use super::storage::{KvStore, StorageError};
use crate::controls::PageControls;
use crate::render::ListView;
use crate::theme::Theme;

/// Panels restyled by [`apply_theme`] when the page gives no selector
pub const DEFAULT_PANELS_SELECTOR: &str =
    "#settings, #challengeTimeContainer, #result-card, #leaderboard, #achievements";

fn document() -> Option<Document> {
    web_sys::window()?.document()
}

/// `window.localStorage`
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self, StorageError> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))?;
        Ok(Self { storage })
    }
}

impl KvStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(|e| {
            let reason = format!("{e:?}");
            if reason.contains("QuotaExceeded") {
                StorageError::QuotaExceeded {
                    key: key.to_string(),
                }
            } else {
                StorageError::Write {
                    key: key.to_string(),
                    reason,
                }
            }
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: format!("{e:?}"),
            })
    }
}

/// A `<ul>`/`<ol>` element and its optional hidden container
pub struct DomList {
    document: Document,
    list: Element,
    container: Option<Element>,
}

impl DomList {
    /// Look up the list (and container) by id; `None` if the list is missing
    pub fn by_id(list_id: &str, container_id: Option<&str>) -> Option<Self> {
        let document = document()?;
        let list = document.get_element_by_id(list_id)?;
        let container = container_id.and_then(|id| document.get_element_by_id(id));
        Some(Self {
            document,
            list,
            container,
        })
    }
}

impl ListView for DomList {
    fn clear(&mut self) {
        self.list.set_inner_html("");
    }

    fn append_item(&mut self, text: &str) {
        if let Ok(li) = self.document.create_element("li") {
            li.set_text_content(Some(text));
            let _ = self.list.append_child(&li);
        }
    }

    fn reveal(&mut self) {
        if let Some(container) = &self.container {
            let _ = container.class_list().remove_1("hidden");
        }
    }
}

fn set_colors(el: &HtmlElement, background: &str, color: &str) {
    let style = el.style();
    let _ = style.set_property("background-image", "");
    let _ = style.set_property("background-color", background);
    let _ = style.set_property("color", color);
}

/// Paint a computed theme onto the body (or `body_selector`) and panels
pub fn apply_theme(theme: &Theme, body_selector: Option<&str>, panels_selector: Option<&str>) {
    let Some(document) = document() else {
        return;
    };

    let body = match body_selector {
        Some(sel) => document
            .query_selector(sel)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok()),
        None => document.body(),
    };
    if let Some(body) = body {
        set_colors(&body, &theme.background.to_string(), &theme.foreground.to_string());
    }

    let selector = panels_selector.unwrap_or(DEFAULT_PANELS_SELECTOR);
    let Ok(panels) = document.query_selector_all(selector) else {
        log::warn!("Invalid panel selector: {}", selector);
        return;
    };
    let panel_bg = theme.panel.background_css();
    let panel_fg = theme.panel.foreground.to_string();
    for i in 0..panels.length() {
        if let Some(panel) = panels.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
            set_colors(&panel, &panel_bg, &panel_fg);
        }
    }
}

/// The current page's form controls
pub struct DomControls {
    document: Document,
}

impl DomControls {
    pub fn current() -> Option<Self> {
        Some(Self {
            document: document()?,
        })
    }

    fn input(&self, id: &str) -> Option<HtmlInputElement> {
        self.document
            .get_element_by_id(id)?
            .dyn_into::<HtmlInputElement>()
            .ok()
    }

    fn select_all(&self, selector: &str) -> Vec<Element> {
        let Ok(nodes) = self.document.query_selector_all(selector) else {
            log::warn!("Invalid selector: {}", selector);
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()))
            .collect()
    }
}

fn trimmed_text(el: &Element) -> String {
    el.text_content().unwrap_or_default().trim().to_string()
}

impl PageControls for DomControls {
    fn exists(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn checked(&self, id: &str) -> Option<bool> {
        self.input(id).map(|input| input.checked())
    }

    fn set_checked(&mut self, id: &str, checked: bool) {
        if let Some(input) = self.input(id) {
            input.set_checked(checked);
        }
    }

    fn set_text(&mut self, id: &str, text: &str) {
        if let Some(el) = self.document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(&mut self, id: &str, hidden: bool) {
        if let Some(el) = self.document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn marked_text(&self, selector: &str, marks: &[&str]) -> Option<String> {
        self.select_all(selector)
            .into_iter()
            .find(|el| marks.iter().any(|m| el.class_list().contains(m)))
            .map(|el| trimmed_text(&el))
    }

    fn mark_where(&mut self, selector: &str, marks: &[&str], matches: &dyn Fn(&str) -> bool) {
        for el in self.select_all(selector) {
            let classes = el.class_list();
            for mark in marks {
                let _ = classes.remove_1(mark);
            }
            if matches(&trimmed_text(&el)) {
                for mark in marks {
                    let _ = classes.add_1(mark);
                }
            }
        }
    }
}
