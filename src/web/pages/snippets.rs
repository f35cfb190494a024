//! Snippet manager pages.

use maud::{html, Markup, Render};

use super::FormState;
use crate::components::{
    BaseLayout, Button, EmptyState, Form, FormAlerts, FormGroup, Input, Site, Table, TableRow,
    TextArea,
};
use crate::db::Snippet;
use crate::paths;

/// The snippet list.
#[must_use]
pub fn render_index(snippets: &[Snippet]) -> Markup {
    let rows = snippets
        .iter()
        .map(|snippet| {
            TableRow::new()
                .cell(&snippet.title)
                .cell_markup(html! {
                    a href=(paths::snippet_show(snippet.id)) { "View" }
                })
                .render()
        })
        .collect();

    let content = html! {
        div class="page-header" {
            h1 { "Snippets" }
            (Button::primary("New").href(&paths::snippet_new()))
        }
        @if snippets.is_empty() {
            (EmptyState::new("No snippets yet."))
        } @else {
            (Table::new(vec!["Title", ""]).class("snippets-table").rows(rows))
        }
    };

    BaseLayout::new("Snippets", Site::Snippets).render(content)
}

/// The snippet creation form.
#[must_use]
pub fn render_new(state: FormState<'_>) -> Markup {
    let fields = html! {
        (FormAlerts::new(state.errors))
        (FormGroup::new(
            "Title",
            "title",
            Input::text("title")
                .id("title")
                .value_opt(state.value("title"))
                .invalid(state.is_invalid("title"))
                .render(),
        )
        .errors(state.field_errors("title")))
        (FormGroup::new(
            "Code",
            "code",
            TextArea::new("code")
                .id("code")
                .class("code")
                .rows(12)
                .value_opt(state.value("code"))
                .render(),
        ))
        (Button::primary("Create").submit())
    };

    let content = html! {
        h1 { "Create a Snippet" }
        (Form::post(&paths::snippet_new(), fields))
    };

    BaseLayout::new("New Snippet", Site::Snippets).render(content)
}

/// A single snippet with edit and delete controls.
#[must_use]
pub fn render_show(snippet: &Snippet, errors: FormState<'_>) -> Markup {
    let edit_path = paths::snippet_edit(snippet.id);
    let delete_path = paths::snippet_delete(snippet.id);
    let delete_form =
        Form::post(&delete_path, Button::danger("Delete").submit().render()).class("inline");

    let content = html! {
        (FormAlerts::new(errors.errors))
        div class="page-header" {
            h1 { (snippet.title) }
            div class="actions" {
                (Button::outline("Edit").href(&edit_path))
                (delete_form)
            }
        }
        pre class="snippet-code" { code { (snippet.code) } }
    };

    BaseLayout::new(&snippet.title, Site::Snippets).render(content)
}

/// The code editor for an existing snippet.
#[must_use]
pub fn render_edit(snippet: &Snippet, state: FormState<'_>) -> Markup {
    let code = state.value("code").unwrap_or(&snippet.code);

    let fields = html! {
        (FormAlerts::new(state.errors))
        (FormGroup::new(
            "Code",
            "code",
            TextArea::new("code")
                .id("code")
                .class("code")
                .rows(16)
                .value_opt(Some(code))
                .render(),
        ))
        (Button::primary("Save").submit())
    };

    let content = html! {
        h1 { "Editing " (snippet.title) }
        (Form::post(&paths::snippet_edit(snippet.id), fields))
        a href=(paths::snippet_show(snippet.id)) { "Cancel" }
    };

    BaseLayout::new("Edit Snippet", Site::Snippets).render(content)
}

/// 404 page for the snippet manager.
#[must_use]
pub fn render_not_found(message: &str) -> Markup {
    let content = html! {
        h1 { "Not Found" }
        p { (message) }
        a href=(paths::snippets_home()) { "Back to snippets" }
    };

    BaseLayout::new("Not Found", Site::Snippets).render(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{FormData, FormErrors};

    fn snippet() -> Snippet {
        Snippet {
            id: 4,
            title: "Hello".to_string(),
            code: "fn main() { println!(\"<hi>\"); }".to_string(),
        }
    }

    #[test]
    fn test_index_lists_snippets() {
        let html = render_index(&[snippet()]).into_string();
        assert!(html.contains("<td>Hello</td>"));
        assert!(html.contains(r#"href="/snippets/4""#));
        assert!(html.contains(r#"href="/snippets/new""#));
    }

    #[test]
    fn test_index_empty() {
        let html = render_index(&[]).into_string();
        assert!(html.contains("No snippets yet."));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn test_show_has_edit_and_delete() {
        let html = render_show(&snippet(), FormState::empty()).into_string();
        assert!(html.contains(r#"href="/snippets/4/edit""#));
        assert!(html.contains(r#"action="/snippets/4/delete""#));
        assert!(html.contains("&lt;hi&gt;"));
    }

    #[test]
    fn test_new_rerenders_title_error() {
        let mut values = FormData::new();
        values.insert("title".to_string(), "ab".to_string());
        values.insert("code".to_string(), "let x = 1;".to_string());
        let errors = FormErrors::field("title", "Title must be at least 3 characters long");

        let html = render_new(FormState::failed(&values, &errors)).into_string();
        assert!(html.contains("Title must be at least 3 characters long"));
        assert!(html.contains("let x = 1;"));
    }

    #[test]
    fn test_edit_prefills_current_code() {
        let html = render_edit(&snippet(), FormState::empty()).into_string();
        assert!(html.contains(r#"action="/snippets/4/edit""#));
        assert!(html.contains("println!"));
    }
}
