//! Menu rendering.
//!
//! Highlighting is derived, never stored on rows: [`menu_rows`] maps the
//! candidate list and the active index to the rows a view draws. A
//! [`MenuView`] receives those rows and owns whatever the host displays.
//! [`HtmlMenu`] is the default view and produces markup from the configured
//! menu and item templates.

use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;

/// Default container markup.
pub const DEFAULT_MENU_TEMPLATE: &str = r#"<ul class="autocomplete"></ul>"#;

/// Default row markup. The label goes inside the anchor.
pub const DEFAULT_ITEM_TEMPLATE: &str = r##"<li><a href="#"></a></li>"##;

const ACTIVE_CLASS: &str = "active";

/// One row of the menu as a view should draw it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuRow<'a> {
    /// Position in the candidate list.
    pub index: usize,
    /// The candidate shown on this row.
    pub candidate: &'a Candidate,
    /// Whether this row is highlighted.
    pub active: bool,
}

/// Compute the rows for `candidates` with `active` highlighted.
pub fn menu_rows(candidates: &[Candidate], active: Option<usize>) -> Vec<MenuRow<'_>> {
    candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| MenuRow {
            index,
            candidate,
            active: active == Some(index),
        })
        .collect()
}

/// Markup for the menu container. Rows are placed before its closing tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuTemplate(String);

impl MenuTemplate {
    /// Create a template from markup.
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    /// The template markup.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Place `rows` inside the container.
    pub fn wrap(&self, rows: &str) -> String {
        insert_before_closing_tag(&self.0, rows)
    }
}

impl Default for MenuTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_MENU_TEMPLATE)
    }
}

/// Markup for one menu row.
///
/// The escaped label goes inside the first `<a>` element (or before the last
/// closing tag if there is no anchor). The active row gets the `active`
/// class on its outermost element and every row carries a `data-index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemTemplate(String);

impl ItemTemplate {
    /// Create a template from markup.
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    /// The template markup.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render one row.
    pub fn render(&self, row: &MenuRow<'_>) -> String {
        let label = escape_html(&row.candidate.label);
        let filled = match self.0.find("</a>") {
            Some(pos) => format!("{}{}{}", &self.0[..pos], label, &self.0[pos..]),
            None => insert_before_closing_tag(&self.0, &label),
        };
        annotate_outer_tag(&filled, row.index, row.active)
    }
}

impl Default for ItemTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_ITEM_TEMPLATE)
    }
}

fn insert_before_closing_tag(markup: &str, content: &str) -> String {
    match markup.rfind("</") {
        Some(pos) => format!("{}{}{}", &markup[..pos], content, &markup[pos..]),
        None => format!("{markup}{content}"),
    }
}

fn annotate_outer_tag(markup: &str, index: usize, active: bool) -> String {
    let Some(end) = markup.find('>').filter(|_| markup.starts_with('<')) else {
        return markup.to_owned();
    };
    let (open, rest) = markup.split_at(end);
    let open = open.strip_suffix('/').unwrap_or(open);
    let self_closing = open.len() != end;

    let mut tag = open.to_owned();
    if active {
        if let Some(pos) = tag.find("class=\"") {
            tag.insert_str(pos + "class=\"".len(), &format!("{ACTIVE_CLASS} "));
        } else {
            tag.push_str(&format!(" class=\"{ACTIVE_CLASS}\""));
        }
    }
    tag.push_str(&format!(" data-index=\"{index}\""));
    if self_closing {
        tag.push('/');
    }
    tag + rest
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// The display side of the menu.
///
/// The widget calls [`render`](Self::render) with the full row set whenever
/// the list or the highlight changes, and [`show`](Self::show) /
/// [`hide`](Self::hide) when visibility changes.
pub trait MenuView: Send {
    /// Replace the displayed rows.
    fn render(&mut self, rows: &[MenuRow<'_>]);

    /// Make the menu visible, attaching it next to the field if needed.
    fn show(&mut self);

    /// Hide the menu, keeping it attached.
    fn hide(&mut self);

    /// Remove the menu from wherever it was attached.
    fn detach(&mut self);
}

type ItemRenderer = Box<dyn Fn(&MenuRow<'_>) -> String + Send>;

/// Default menu view producing markup from templates.
pub struct HtmlMenu {
    menu: MenuTemplate,
    item: ItemTemplate,
    item_renderer: Option<ItemRenderer>,
    markup: String,
    visible: bool,
    attached: bool,
}

impl HtmlMenu {
    /// Create a menu with the given container and row templates.
    pub fn new(menu: MenuTemplate, item: ItemTemplate) -> Self {
        Self {
            menu,
            item,
            item_renderer: None,
            markup: String::new(),
            visible: false,
            attached: false,
        }
    }

    /// Replace the per-row renderer.
    pub fn with_item_renderer<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&MenuRow<'_>) -> String + Send + 'static,
    {
        self.item_renderer = Some(Box::new(renderer));
        self
    }

    /// The markup of the last render, empty once detached.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Whether the menu is showing.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the menu is attached next to the field.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    fn render_item(&self, row: &MenuRow<'_>) -> String {
        match &self.item_renderer {
            Some(renderer) => renderer(row),
            None => self.item.render(row),
        }
    }
}

impl Default for HtmlMenu {
    fn default() -> Self {
        Self::new(MenuTemplate::default(), ItemTemplate::default())
    }
}

impl MenuView for HtmlMenu {
    fn render(&mut self, rows: &[MenuRow<'_>]) {
        let items: String = rows.iter().map(|row| self.render_item(row)).collect();
        self.markup = self.menu.wrap(&items);
    }

    fn show(&mut self) {
        self.attached = true;
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn detach(&mut self) {
        self.visible = false;
        self.attached = false;
        self.markup.clear();
    }
}

impl std::fmt::Debug for HtmlMenu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlMenu")
            .field("menu", &self.menu)
            .field("item", &self.item)
            .field("custom_renderer", &self.item_renderer.is_some())
            .field("visible", &self.visible)
            .field("attached", &self.attached)
            .finish()
    }
}
