// Census tables for one dataset vintage.
// Fetches raw tables through a source, caches them in memory and on disk, and builds frames.

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::cache;
use crate::census::{CensusClient, COUNTY_GROUPS, Geography, RawTable, TableRequest, VariableGroup};
use crate::error::Result;

use super::frame::Frame;

/// Anything that can download a census table.
pub trait CensusSource: Send + Sync + 'static {
    fn fetch(&self, request: &TableRequest) -> impl Future<Output = Result<RawTable>> + Send;

    /// Number of downloads attempted so far.
    fn request_count(&self) -> u64;
}

impl CensusSource for CensusClient {
    fn fetch(&self, request: &TableRequest) -> impl Future<Output = Result<RawTable>> + Send {
        self.get_table(request)
    }

    fn request_count(&self) -> u64 {
        CensusClient::request_count(self)
    }
}

/// Cached access to the tables of one dataset vintage.
pub struct Dataset<S> {
    source: S,
    dataset: String,
    year: u16,
    cache_root: Option<PathBuf>,
    refresh: bool,
    memory: Mutex<HashMap<TableRequest, Arc<RawTable>>>,
}

impl<S: CensusSource> Dataset<S> {
    pub fn new(source: S, dataset: &str, year: u16) -> Self {
        Self {
            source,
            dataset: dataset.to_string(),
            year,
            cache_root: None,
            refresh: false,
            memory: Mutex::new(HashMap::new()),
        }
    }

    /// Persist downloaded tables under `root`.
    pub fn with_disk_cache(mut self, root: PathBuf) -> Self {
        self.cache_root = Some(root);
        self
    }

    /// Ignore tables already on disk (they are still rewritten after download).
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Dataset and year, e.g. "acs5 2019".
    pub fn vintage(&self) -> String {
        format!("{} {}", self.dataset, self.year)
    }

    /// Get a raw table from memory, disk, or the source, in that order.
    pub async fn table(&self, request: &TableRequest) -> Result<Arc<RawTable>> {
        // Held across the download so concurrent renders share one request.
        let mut memory = self.memory.lock().await;
        if let Some(table) = memory.get(request) {
            return Ok(table.clone());
        }

        let path = self
            .cache_root
            .as_ref()
            .map(|root| cache::table_path(root, &self.dataset, self.year, request));

        if let (Some(path), false) = (&path, self.refresh) {
            match cache::read_cached::<RawTable>(path) {
                Ok(Some(cached)) => {
                    debug!(
                        request = %request.cache_key(),
                        cached_at = %cached.cached_at,
                        "table cache hit"
                    );
                    let table = Arc::new(cached.data);
                    memory.insert(request.clone(), table.clone());
                    return Ok(table);
                }
                Ok(None) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "ignoring unreadable cache entry"),
            }
        }

        let table = self.source.fetch(request).await?;

        if let Some(path) = &path {
            if let Err(e) = cache::write_cached(path, &table) {
                warn!(path = %path.display(), error = %e, "failed to write cache entry");
            }
        }

        let table = Arc::new(table);
        memory.insert(request.clone(), table.clone());
        Ok(table)
    }

    /// One row per state for a variable group.
    pub async fn frame_for_state_vars(&self, group: VariableGroup) -> Result<Frame> {
        let request = TableRequest::new(Geography::State, &[group]);
        let raw = self.table(&request).await?;
        Frame::from_raw(&raw, Geography::State, group)
    }

    /// One row per tribal area for a variable group, sorted by name.
    pub async fn frame_for_tribal_areas(&self, group: VariableGroup) -> Result<Frame> {
        let request = TableRequest::new(Geography::TribalArea, &[group]);
        let raw = self.table(&request).await?;
        Frame::from_raw(&raw, Geography::TribalArea, group)?.sort_by_name()
    }

    /// State rows followed by county rows for a variable group. Every county-level
    /// group comes from the same two downloads. Rows are ordered by the group's
    /// first column (largest first) within each state.
    pub async fn frame_for_county_vars(&self, group: VariableGroup) -> Result<Frame> {
        let states = self
            .table(&TableRequest::new(Geography::State, &COUNTY_GROUPS))
            .await?;
        let counties = self
            .table(&TableRequest::new(Geography::County, &COUNTY_GROUPS))
            .await?;

        let frame = Frame::from_raw(&states, Geography::State, group)?
            .concat(Frame::from_raw(&counties, Geography::County, group)?)?;
        let sorted = match group.labels().first() {
            Some(first) => frame.sort_desc_by(first)?,
            None => frame,
        };
        sorted.group_by_state()
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::CensusError;

    /// In-memory census source that counts requests.
    #[derive(Default)]
    pub struct FakeSource {
        pub tables: HashMap<String, RawTable>,
        pub requests: AtomicUsize,
    }

    impl FakeSource {
        pub fn with(mut self, request: TableRequest, table: RawTable) -> Self {
            self.tables.insert(request.cache_key(), table);
            self
        }
    }

    impl CensusSource for FakeSource {
        fn fetch(&self, request: &TableRequest) -> impl Future<Output = Result<RawTable>> + Send {
            self.requests.fetch_add(1, Ordering::SeqCst);
            let result = self
                .tables
                .get(&request.cache_key())
                .cloned()
                .ok_or_else(|| CensusError::NotFound(request.cache_key()));
            async move { result }
        }

        fn request_count(&self) -> u64 {
            self.requests.load(Ordering::SeqCst) as u64
        }
    }

    /// Build a raw table: header is NAME, the group codes, then geography columns.
    pub fn raw_table(
        codes: &[&str],
        geo_columns: &[&str],
        rows: &[(&str, Vec<&str>, Vec<&str>)],
    ) -> RawTable {
        let mut header = vec!["NAME".to_string()];
        header.extend(codes.iter().map(|c| c.to_string()));
        header.extend(geo_columns.iter().map(|c| c.to_string()));

        let rows = rows
            .iter()
            .map(|(name, values, geo)| {
                let mut row = vec![Some(name.to_string())];
                row.extend(values.iter().map(|v| Some(v.to_string())));
                row.extend(geo.iter().map(|g| Some(g.to_string())));
                row
            })
            .collect();

        RawTable { header, rows }
    }
}
