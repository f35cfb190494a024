use tracing::{debug, error, info};

use super::{ActionResult, RedirectTo};
use crate::auth::{require_principal, RequestContext};
use crate::db::{self, Database, NewPost, NewTopic};
use crate::forms::{CreatePostInput, CreateTopicInput, FormData, FormErrors, SlugRule};
use crate::paths;
use crate::web::ViewCache;

/// Create a topic whose slug is the submitted name.
///
/// Redirects to the new topic's page.
pub async fn create_topic(
    db: &Database,
    cache: &dyn ViewCache,
    ctx: &RequestContext,
    rule: SlugRule,
    form: &FormData,
) -> ActionResult {
    let input = CreateTopicInput::parse(form, rule).inspect_err(|errors| {
        debug!(%errors, "Topic form rejected");
    })?;

    let user = require_principal(ctx, "You must be logged in to create a topic")?;

    let new_topic = NewTopic {
        slug: input.name,
        description: input.description,
    };

    if let Err(e) = db::insert_topic(db.pool(), &new_topic).await {
        if db::is_unique_violation(&e) {
            debug!(slug = %new_topic.slug, "Topic slug already taken");
            return Err(FormErrors::conflict("Topic already exists"));
        }
        error!(slug = %new_topic.slug, "Failed to create topic: {e:#}");
        return Err(FormErrors::storage(&e, "Something went wrong"));
    }

    info!(slug = %new_topic.slug, user_id = %user.id, "Topic created");

    cache.invalidate(&paths::home());
    Ok(RedirectTo(paths::topic_show(&new_topic.slug)))
}

/// Create a post in an existing topic.
///
/// Redirects to the new post's page.
pub async fn create_post(
    db: &Database,
    cache: &dyn ViewCache,
    ctx: &RequestContext,
    form: &FormData,
) -> ActionResult {
    let input = CreatePostInput::parse(form).inspect_err(|errors| {
        debug!(%errors, "Post form rejected");
    })?;

    let user = require_principal(ctx, "You must be logged in to create a post")?;

    let topic = match db::get_topic_by_slug(db.pool(), &input.topic_slug).await {
        Ok(Some(topic)) => topic,
        Ok(None) => {
            debug!(slug = %input.topic_slug, "Post submitted to unknown topic");
            return Err(FormErrors::not_found("Topic not found"));
        }
        Err(e) => {
            error!(slug = %input.topic_slug, "Failed to look up topic: {e:#}");
            return Err(FormErrors::storage(&e, "Failed to create post"));
        }
    };

    let new_post = NewPost {
        title: input.title,
        content: input.content,
        user_id: user.id.clone(),
        topic_id: topic.id,
    };

    let post_id = db::insert_post(db.pool(), &new_post)
        .await
        .map_err(|e| {
            error!(slug = %topic.slug, "Failed to create post: {e:#}");
            FormErrors::storage(&e, "Failed to create post")
        })?;

    info!(post_id, slug = %topic.slug, user_id = %user.id, "Post created");

    cache.invalidate(&paths::topic_show(&topic.slug));
    cache.invalidate(&paths::home());
    Ok(RedirectTo(paths::post_show(&topic.slug, post_id)))
}

/// Turn the header search box submission into a results URL.
///
/// An empty term goes back home.
#[must_use]
pub fn search(form: &FormData) -> RedirectTo {
    match form.get("term").map(String::as_str) {
        Some(term) if !term.is_empty() => RedirectTo(paths::search(term)),
        _ => RedirectTo(paths::home()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_redirect() {
        let mut form = FormData::new();
        assert_eq!(search(&form).path(), "/");

        form.insert("term".to_string(), String::new());
        assert_eq!(search(&form).path(), "/");

        form.insert("term".to_string(), "rust async".to_string());
        assert_eq!(search(&form).path(), "/search?term=rust%20async");
    }
}
