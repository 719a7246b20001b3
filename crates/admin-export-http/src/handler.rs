//! Request handler trait

use crate::{Request, Response};
use admin_export_core::AdminResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Handles an HTTP request and produces a response
#[async_trait]
pub trait Handler: Send + Sync {
	/// # Errors
	///
	/// Returns an error if the request cannot be processed. The server turns it
	/// into a JSON error response.
	async fn handle(&self, request: Request) -> AdminResult<Response>;
}

/// Blanket implementation for `Arc<T>` where T: Handler.
#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> AdminResult<Response> {
		(**self).handle(request).await
	}
}
