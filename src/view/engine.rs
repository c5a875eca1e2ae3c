// Cache-aware view rendering

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{markdown, template, xml, ViewData, ViewError, ViewKind};
use crate::cache::{CacheConfig, CacheError, CacheOverride, ViewCache, ViewTypeFlags};
use crate::constants::DEFAULT_VIEWS_DIR;

/// Renders views for controllers
///
/// Templates live at `<views_root>/<controller>/<page>.html` (or `.md`).
/// With a cache attached, every render first looks up
/// `"{controller}:{page}.{kind}:{fingerprint}"` and only does template work on
/// a miss, writing the result back before returning it.
pub struct ViewEngine {
    views_root: PathBuf,
    cache: Option<Arc<ViewCache>>,
    view_types: ViewTypeFlags,
}

impl Default for ViewEngine {
    /// Uncached engine reading templates from `./views`
    fn default() -> Self {
        Self::new(DEFAULT_VIEWS_DIR)
    }
}

impl ViewEngine {
    /// Engine without a cache
    pub fn new(views_root: impl Into<PathBuf>) -> Self {
        Self {
            views_root: views_root.into(),
            cache: None,
            view_types: ViewTypeFlags::default(),
        }
    }

    /// Engine backed by `cache`, honoring the per-type toggles of `config`
    pub fn with_cache(
        views_root: impl Into<PathBuf>,
        cache: Arc<ViewCache>,
        config: &CacheConfig,
    ) -> Self {
        Self {
            views_root: views_root.into(),
            cache: Some(cache),
            view_types: config.view_types(),
        }
    }

    /// Build the configured cache backend and attach it
    pub async fn from_config(
        views_root: impl Into<PathBuf>,
        config: &CacheConfig,
    ) -> Result<Self, ViewError> {
        let cache = ViewCache::from_config(config).await?;
        Ok(Self::with_cache(views_root, Arc::new(cache), config))
    }

    pub fn views_root(&self) -> &Path {
        &self.views_root
    }

    pub fn cache(&self) -> Option<&Arc<ViewCache>> {
        self.cache.as_ref()
    }

    fn type_enabled(&self, kind: ViewKind) -> bool {
        match kind {
            ViewKind::Html => self.view_types.html,
            ViewKind::Markdown => self.view_types.markdown,
            ViewKind::Json => self.view_types.json,
            ViewKind::Xml => self.view_types.xml,
        }
    }

    /// A disabled view type bypasses the cache unless the render forces it
    fn effective_override(&self, kind: ViewKind, requested: CacheOverride) -> CacheOverride {
        match requested {
            CacheOverride::Inherit if !self.type_enabled(kind) => CacheOverride::Bypass,
            other => other,
        }
    }

    pub async fn render(
        &self,
        kind: ViewKind,
        controller: &str,
        page: &str,
        data: &ViewData,
    ) -> Result<String, ViewError> {
        self.render_with(kind, controller, page, data, CacheOverride::Inherit)
            .await
    }

    /// Render with an explicit per-call cache override
    pub async fn render_with(
        &self,
        kind: ViewKind,
        controller: &str,
        page: &str,
        data: &ViewData,
        cache_override: CacheOverride,
    ) -> Result<String, ViewError> {
        let Some(cache) = &self.cache else {
            return self.render_uncached(kind, controller, page, data).await;
        };

        let cache_override = self.effective_override(kind, cache_override);
        let key = cache.generate_key(controller, &format!("{}.{}", page, kind), data);

        if let Some(hit) = cache.get_with(&key, cache_override).await {
            return Ok(hit);
        }

        let output = self.render_uncached(kind, controller, page, data).await?;

        match cache.set_with(&key, &output, None, cache_override).await {
            Ok(()) | Err(CacheError::Disabled) => {}
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to cache rendered view");
            }
        }

        Ok(output)
    }

    pub async fn html(&self, controller: &str, page: &str, data: &ViewData) -> Result<String, ViewError> {
        self.render(ViewKind::Html, controller, page, data).await
    }

    pub async fn markdown(&self, controller: &str, page: &str, data: &ViewData) -> Result<String, ViewError> {
        self.render(ViewKind::Markdown, controller, page, data).await
    }

    pub async fn json(&self, controller: &str, page: &str, data: &ViewData) -> Result<String, ViewError> {
        self.render(ViewKind::Json, controller, page, data).await
    }

    pub async fn xml(&self, controller: &str, page: &str, data: &ViewData) -> Result<String, ViewError> {
        self.render(ViewKind::Xml, controller, page, data).await
    }

    async fn render_uncached(
        &self,
        kind: ViewKind,
        controller: &str,
        page: &str,
        data: &ViewData,
    ) -> Result<String, ViewError> {
        match kind {
            ViewKind::Html => {
                let source = self.load_template(kind, controller, page).await?;
                Ok(template::render(&source, data))
            }
            ViewKind::Markdown => {
                let source = self.load_template(kind, controller, page).await?;
                Ok(markdown::to_html(&template::render(&source, data)))
            }
            ViewKind::Json => Ok(serde_json::to_string_pretty(&data.to_json())?),
            ViewKind::Xml => Ok(xml::to_xml("response", &data.to_json())),
        }
    }

    fn template_path(&self, kind: ViewKind, controller: &str, page: &str) -> Option<PathBuf> {
        let ext = kind.template_extension()?;
        Some(
            self.views_root
                .join(controller)
                .join(format!("{}.{}", page, ext)),
        )
    }

    async fn load_template(
        &self,
        kind: ViewKind,
        controller: &str,
        page: &str,
    ) -> Result<String, ViewError> {
        check_name(controller)?;
        check_name(page)?;

        let path = self
            .template_path(kind, controller, page)
            .ok_or_else(|| ViewError::TemplateNotFound(self.views_root.join(controller).join(page)))?;

        match tokio::fs::read_to_string(&path).await {
            Ok(source) => Ok(source),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ViewError::TemplateNotFound(path)),
            Err(e) => Err(ViewError::Io(e)),
        }
    }
}

/// Controller and page names must stay a single component below the views root
fn check_name(name: &str) -> Result<(), ViewError> {
    let escapes = name.is_empty()
        || name == "."
        || name.contains("..")
        || name.contains(['/', '\\', '\0'])
        || Path::new(name).is_absolute();
    if escapes {
        return Err(ViewError::InvalidName(name.to_string()));
    }
    Ok(())
}
