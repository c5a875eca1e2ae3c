//! Controller contract
//!
//! Controllers own a name and hand their render data to the [`ViewEngine`].
//! The name becomes the template directory and the first segment of every
//! cache key the controller produces. Dispatch and routing live elsewhere.

use async_trait::async_trait;

use crate::view::{CacheOverride, ViewData, ViewEngine, ViewError, ViewKind};

#[async_trait]
pub trait Controller: Send + Sync {
    /// Name used for template lookup and cache keys (e.g. `"home"`)
    fn name(&self) -> &str;

    /// Render `<views>/<name>/<page>.html`
    async fn render(
        &self,
        engine: &ViewEngine,
        page: &str,
        data: &ViewData,
    ) -> Result<String, ViewError> {
        engine.render(ViewKind::Html, self.name(), page, data).await
    }

    /// Render any view kind with an explicit cache override
    async fn render_as(
        &self,
        engine: &ViewEngine,
        kind: ViewKind,
        page: &str,
        data: &ViewData,
        cache_override: CacheOverride,
    ) -> Result<String, ViewError> {
        engine
            .render_with(kind, self.name(), page, data, cache_override)
            .await
    }
}
