//! `general/*` endpoints: service metadata, health, uploads, lookups.

use crate::client::JeyyClient;
use crate::Result;
use bytes::Bytes;
use jeyy_core::query::QueryParams;
use jeyy_core::request::ApiRequest;
use serde_json::Value;

impl JeyyClient {
    /// Health check.
    pub async fn ping(&self) -> Result<Value> {
        self.fetch_json("general/ping", QueryParams::new()).await
    }

    /// List the endpoints the service currently exposes.
    pub async fn endpoints(&self) -> Result<Value> {
        self.fetch_json("general/endpoints", QueryParams::new())
            .await
    }

    /// Upload an image and return the hosting metadata.
    ///
    /// The bytes are sent as the multipart `image` field with content type
    /// `image/gif`.
    pub async fn image_upload(&self, image: impl Into<Bytes>) -> Result<Value> {
        self.execute(ApiRequest::upload("general/image_upload", image.into()))
            .await?
            .into_json()
    }

    /// Look up an Indonesian licence plate.
    pub async fn plat_nomor(&self, plat: &str) -> Result<Value> {
        self.fetch_json("general/plat_nomor", QueryParams::new().with("plat", plat))
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::dispatch::MockDispatch;
    use crate::JeyyClient;
    use bytes::Bytes;
    use jeyy_core::request::{Outcome, Payload, Verb};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn plat_nomor_sends_plate() {
        let mut dispatcher = MockDispatch::new();
        dispatcher
            .expect_dispatch()
            .withf(|request| {
                request.path == "general/plat_nomor"
                    && request.verb == Verb::Get
                    && request.outcome == Outcome::Json
                    && request.params.get("plat") == Some("B 1234 XYZ")
            })
            .times(1)
            .returning(|_| Ok(Payload::Json(json!({"region": "Jakarta"}))));

        let client = JeyyClient::with_dispatcher(Arc::new(dispatcher));
        let value = client.plat_nomor("B 1234 XYZ").await.unwrap();
        assert_eq!(value["region"], "Jakarta");
    }

    #[tokio::test]
    async fn image_upload_posts_bytes() {
        let mut dispatcher = MockDispatch::new();
        dispatcher
            .expect_dispatch()
            .withf(|request| {
                request.path == "general/image_upload"
                    && request.verb == Verb::Post
                    && request.upload.as_deref() == Some(&b"GIF89a"[..])
                    && request.params.is_empty()
            })
            .times(1)
            .returning(|_| Ok(Payload::Json(json!({"url": "https://cdn.jeyy.xyz/x.gif"}))));

        let client = JeyyClient::with_dispatcher(Arc::new(dispatcher));
        let value = client
            .image_upload(Bytes::from_static(b"GIF89a"))
            .await
            .unwrap();
        assert_eq!(value["url"], "https://cdn.jeyy.xyz/x.gif");
    }

    #[tokio::test]
    async fn metadata_endpoints_are_json() {
        let mut dispatcher = MockDispatch::new();
        dispatcher
            .expect_dispatch()
            .withf(|request| {
                matches!(request.path.as_str(), "general/ping" | "general/endpoints")
                    && request.outcome == Outcome::Json
            })
            .times(2)
            .returning(|_| Ok(Payload::Json(json!([]))));

        let client = JeyyClient::with_dispatcher(Arc::new(dispatcher));
        client.ping().await.unwrap();
        client.endpoints().await.unwrap();
    }
}
