//! Typed views over app.bsky.feed.searchPosts responses

use crate::bluesky::ClientError;
use serde_json::Value;

/// The parts of a post view the search tool needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostView {
    pub handle: String,
    pub text: String,
}

/// Validate a searchPosts body and extract author handle and text of each post
///
/// Order is preserved. Fields beyond `author.handle` and `record.text` are ignored.
pub fn parse_search_posts(body: &Value) -> Result<Vec<PostView>, ClientError> {
    let posts = body.get("posts").and_then(Value::as_array).ok_or_else(|| {
        ClientError::MalformedResponse("response has no 'posts' array".to_string())
    })?;

    posts
        .iter()
        .enumerate()
        .map(|(index, item)| parse_post_view(index, item))
        .collect()
}

fn parse_post_view(index: usize, item: &Value) -> Result<PostView, ClientError> {
    let handle = text_at(item, &["author", "handle"])
        .ok_or_else(|| missing_field(index, "author.handle"))?;
    let text = text_at(item, &["record", "text"])
        .ok_or_else(|| missing_field(index, "record.text"))?;

    Ok(PostView {
        handle: handle.to_string(),
        text: text.to_string(),
    })
}

fn text_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |current, key| current.get(key))?
        .as_str()
}

fn missing_field(index: usize, field: &str) -> ClientError {
    ClientError::MalformedResponse(format!("post {} is missing '{}'", index, field))
}
