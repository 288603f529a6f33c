use std::sync::Arc;

use crate::config::RosterConfig;
use crate::data::cache::SourceCache;
use crate::data::error::RosterError;
use crate::data::loader;
use crate::data::model::Roster;
use crate::data::normalize::normalize;
use crate::data::source::Source;

/// The roster currently on screen plus what is needed to (re)load it.
///
/// A load either installs a complete new roster or leaves the previous one
/// exactly as it was.
pub struct RosterSession {
    config: RosterConfig,
    cache: SourceCache,
    current: Option<Arc<Roster>>,
    source: Option<Source>,
}

impl RosterSession {
    pub fn new(config: RosterConfig) -> Self {
        Self {
            cache: SourceCache::new(config.cache_ttl()),
            config,
            current: None,
            source: None,
        }
    }

    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    pub fn roster(&self) -> Option<&Arc<Roster>> {
        self.current.as_ref()
    }

    /// Source of the installed roster.
    pub fn source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    /// Load, normalize and install. Remote sources go through the TTL
    /// cache; local files are always read fresh.
    pub fn load(&mut self, source: Source) -> Result<Arc<Roster>, RosterError> {
        let opts = self.config.load_options();
        let table = match &source {
            Source::Url(_) => self
                .cache
                .get_or_load(&self.cache_key(&source), || loader::load(&source, &opts))?,
            Source::File(_) => Arc::new(loader::load(&source, &opts)?),
        };

        let roster = Arc::new(normalize(&table, &self.config.normalize_options())?);
        log::info!(
            "Installed roster of {} providers ({} employment types, {} subspecialties)",
            roster.len(),
            roster.employment_types.len(),
            roster.subspecialties.len()
        );

        self.current = Some(Arc::clone(&roster));
        self.source = Some(source);
        Ok(roster)
    }

    /// Load the configured remote source, if there is one.
    pub fn load_default(&mut self) -> Option<Result<Arc<Roster>, RosterError>> {
        let url = self.config.source_url.clone()?;
        Some(self.load(Source::Url(url)))
    }

    /// Drop the cached copy of the current source and load it again.
    pub fn reload(&mut self) -> Option<Result<Arc<Roster>, RosterError>> {
        let source = self
            .source
            .clone()
            .or_else(|| self.config.source_url.clone().map(Source::Url))?;
        self.cache.invalidate(&self.cache_key(&source));
        Some(self.load(source))
    }

    fn cache_key(&self, source: &Source) -> String {
        format!("{source}#{}", self.config.sheet_name)
    }
}
