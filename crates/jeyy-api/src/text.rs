//! `text/*` endpoints.

use crate::client::JeyyClient;
use crate::Result;
use jeyy_core::query::QueryParams;
use serde_json::Value;
use std::fmt::Display;

impl JeyyClient {
    /// Render an image as rows of emoji text.
    pub async fn emojify(&self, image_url: impl Display) -> Result<Value> {
        self.fetch_json("text/emojify", QueryParams::new().with("image_url", image_url))
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::dispatch::MockDispatch;
    use crate::JeyyClient;
    use jeyy_core::request::{Outcome, Payload};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn emojify_returns_json() {
        let mut dispatcher = MockDispatch::new();
        dispatcher
            .expect_dispatch()
            .withf(|request| {
                request.path == "text/emojify"
                    && request.outcome == Outcome::Json
                    && request.params.get("image_url") == Some("https://example.com/a.png")
            })
            .returning(|_| Ok(Payload::Json(json!(["🟥🟥", "🟦🟦"]))));

        let client = JeyyClient::with_dispatcher(Arc::new(dispatcher));
        let rows = client.emojify("https://example.com/a.png").await.unwrap();
        assert_eq!(rows, json!(["🟥🟥", "🟦🟦"]));
    }
}
