//! Table components for maud templates.

use maud::{html, Markup, Render};

/// A table element with headers and rows.
#[derive(Debug)]
pub struct Table<'a> {
    /// Column headers
    pub headers: Vec<&'a str>,
    /// Pre-rendered row content
    pub rows: Vec<Markup>,
    /// Optional CSS class
    pub class: Option<&'a str>,
}

impl<'a> Table<'a> {
    /// Create a new table with the given headers.
    #[must_use]
    pub fn new(headers: Vec<&'a str>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
            class: None,
        }
    }

    /// Replace all rows.
    #[must_use]
    pub fn rows(mut self, rows: Vec<Markup>) -> Self {
        self.rows = rows;
        self
    }

    #[must_use]
    pub fn class(mut self, class: &'a str) -> Self {
        self.class = Some(class);
        self
    }
}

impl Render for Table<'_> {
    fn render(&self) -> Markup {
        html! {
            table class=[self.class] {
                @if !self.headers.is_empty() {
                    thead {
                        tr {
                            @for header in &self.headers {
                                th { (header) }
                            }
                        }
                    }
                }
                tbody {
                    @for row in &self.rows {
                        (row)
                    }
                }
            }
        }
    }
}

/// A table row with cells.
#[derive(Debug, Default)]
pub struct TableRow {
    /// Pre-rendered cell content
    pub cells: Vec<Markup>,
}

impl TableRow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell with text content.
    #[must_use]
    pub fn cell(mut self, content: &str) -> Self {
        self.cells.push(html! { td { (content) } });
        self
    }

    /// Add a cell with pre-rendered markup.
    #[must_use]
    #[allow(clippy::needless_pass_by_value)] // Markup is idiomatically passed by value
    pub fn cell_markup(mut self, content: Markup) -> Self {
        self.cells.push(html! { td { (content) } });
        self
    }
}

impl Render for TableRow {
    fn render(&self) -> Markup {
        html! {
            tr {
                @for cell in &self.cells {
                    (cell)
                }
            }
        }
    }
}
