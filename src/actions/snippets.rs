use tracing::{debug, error, info};

use super::{ActionResult, RedirectTo};
use crate::db::{self, Database, NewSnippet};
use crate::forms::{CreateSnippetInput, EditSnippetInput, FailureKind, FormData, FormErrors};
use crate::paths;
use crate::web::ViewCache;

// Snippet actions take no RequestContext: any visitor may create, edit or
// delete any snippet.

/// Shown for every snippet storage failure; the cause only goes to the log.
const SNIPPET_STORAGE_ERROR: &str = "Something went wrong";

/// Create a snippet and go back to the list.
pub async fn create_snippet(db: &Database, cache: &dyn ViewCache, form: &FormData) -> ActionResult {
    let input = CreateSnippetInput::parse(form).inspect_err(|errors| {
        debug!(%errors, "Snippet form rejected");
    })?;

    let new_snippet = NewSnippet {
        title: input.title,
        code: input.code,
    };

    let id = db::insert_snippet(db.pool(), &new_snippet)
        .await
        .map_err(|e| {
            error!("Failed to create snippet: {e:#}");
            FormErrors::form(FailureKind::Storage, SNIPPET_STORAGE_ERROR)
        })?;

    info!(snippet_id = id, "Snippet created");

    cache.invalidate(&paths::snippets_home());
    Ok(RedirectTo(paths::snippets_home()))
}

/// Replace a snippet's code and show it.
pub async fn edit_snippet(
    db: &Database,
    cache: &dyn ViewCache,
    id: i64,
    form: &FormData,
) -> ActionResult {
    let input = EditSnippetInput::parse(form);

    match db::update_snippet_code(db.pool(), id, &input.code).await {
        Ok(true) => {}
        Ok(false) => {
            debug!(snippet_id = id, "Edit of unknown snippet");
            return Err(FormErrors::not_found("Snippet not found"));
        }
        Err(e) => {
            error!(snippet_id = id, "Failed to update snippet: {e:#}");
            return Err(FormErrors::form(FailureKind::Storage, SNIPPET_STORAGE_ERROR));
        }
    }

    info!(snippet_id = id, "Snippet updated");

    cache.invalidate(&paths::snippets_home());
    cache.invalidate(&paths::snippet_show(id));
    Ok(RedirectTo(paths::snippet_show(id)))
}

/// Delete a snippet and go back to the list.
///
/// Deleting an id that does not exist (including one already deleted) is a
/// not-found error; no other row is touched.
pub async fn delete_snippet(db: &Database, cache: &dyn ViewCache, id: i64) -> ActionResult {
    match db::delete_snippet(db.pool(), id).await {
        Ok(true) => {}
        Ok(false) => {
            debug!(snippet_id = id, "Delete of unknown snippet");
            return Err(FormErrors::not_found("Snippet not found"));
        }
        Err(e) => {
            error!(snippet_id = id, "Failed to delete snippet: {e:#}");
            return Err(FormErrors::form(FailureKind::Storage, SNIPPET_STORAGE_ERROR));
        }
    }

    info!(snippet_id = id, "Snippet deleted");

    cache.invalidate(&paths::snippets_home());
    cache.invalidate(&paths::snippet_show(id));
    Ok(RedirectTo(paths::snippets_home()))
}
