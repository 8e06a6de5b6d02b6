//! On-disk chart store: metadata records, append-only data files, and the
//! per-file write locks that serialize concurrent appenders.
//!
//! # Storage structure
//!
//! ```text
//! <root>/
//! ├── throughput20260830120000.json      # metadata record
//! ├── data_throughput20260830120000.csv  # append-only rows
//! └── ...
//! ```
//!
//! Writers are tracked in an in-process map keyed by base name. Appends to
//! one file take that file's exclusive lock, so append order equals observed
//! order and rows are never torn; appends to distinct files proceed in
//! parallel. Reading rows of a chart whose writer is still open fails with
//! `FileBusy` until the chart is finalized.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use rc_common::{AxisType, ChartError, Result};

use crate::descriptor::{ChartDescriptor, Origin};
use crate::row::{DataRow, Snapshot};

/// Persisted metadata record, one JSON file per chart.
#[derive(Debug, Serialize, Deserialize)]
struct ChartMeta {
    name: String,
    x_axis: String,
    y_axis: String,
    axis_type: AxisType,
    attributes: Vec<String>,
    group: String,
}

type SharedWriter = Arc<Mutex<BufWriter<File>>>;

/// Owns the charts directory and the lifecycle of its files.
pub struct ChartStore {
    root: PathBuf,
    writers: RwLock<HashMap<String, SharedWriter>>,
}

impl ChartStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| ChartError::io(&root, e))?;
        Ok(Self {
            root,
            writers: RwLock::new(HashMap::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Physical path of the descriptor's data file.
    pub fn data_path(&self, descriptor: &ChartDescriptor) -> PathBuf {
        self.root.join(descriptor.data_file_name())
    }

    /// Physical path of the descriptor's metadata record.
    pub fn meta_path(&self, descriptor: &ChartDescriptor) -> PathBuf {
        self.root.join(descriptor.meta_file_name())
    }

    /// Persist a freshly built chart: write its metadata record and create
    /// its (empty) data file.
    ///
    /// Charts read back from storage are sealed; storing one again fails
    /// with `ImmutableChart`.
    pub fn create(&self, descriptor: &ChartDescriptor) -> Result<()> {
        if descriptor.origin() == Origin::Loaded {
            return Err(ChartError::ImmutableChart {
                base_name: descriptor.base_name().to_string(),
            });
        }

        let meta = ChartMeta {
            name: descriptor.name().to_string(),
            x_axis: descriptor.x_axis().to_string(),
            y_axis: descriptor.y_axis().to_string(),
            axis_type: descriptor.axis_type(),
            attributes: descriptor.attributes().to_vec(),
            group: descriptor.group().to_string(),
        };
        let meta_path = self.meta_path(descriptor);
        let json = serde_json::to_string_pretty(&meta)?;
        fs::write(&meta_path, json).map_err(|e| ChartError::io(&meta_path, e))?;

        // Append mode so an existing file (crash, restart) is never truncated.
        let data_path = self.data_path(descriptor);
        OpenOptions::new()
            .append(true)
            .create(true)
            .open(&data_path)
            .map_err(|e| ChartError::io(&data_path, e))?;

        debug!(base_name = descriptor.base_name(), "chart created");
        Ok(())
    }

    /// Append one snapshot to the descriptor's data file, aligned to its
    /// declared column order, flushing before returning.
    ///
    /// Safe under concurrent callers: same-file appends serialize on the
    /// file's lock, distinct files do not contend. Storage failures surface
    /// as `Io` and are not retried here.
    pub fn append(&self, descriptor: &ChartDescriptor, snapshot: &Snapshot) -> Result<()> {
        let row = DataRow::from_snapshot(snapshot, descriptor.attributes());
        let writer = self.writer_for(descriptor)?;
        let path = self.data_path(descriptor);

        let mut line = row.to_line();
        line.push('\n');

        let mut guard = writer.lock().unwrap_or_else(PoisonError::into_inner);
        guard
            .write_all(line.as_bytes())
            .map_err(|e| ChartError::io(&path, e))?;
        guard.flush().map_err(|e| ChartError::io(&path, e))?;

        trace!(
            base_name = descriptor.base_name(),
            axis_value = row.axis_value,
            "row appended"
        );
        Ok(())
    }

    /// Flush and close the descriptor's writer. Idempotent: finalizing a
    /// chart that was never appended to, or twice, is a no-op.
    pub fn finalize(&self, descriptor: &ChartDescriptor) -> Result<()> {
        let removed = self
            .writers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(descriptor.base_name());

        if let Some(writer) = removed {
            let path = self.data_path(descriptor);
            writer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .flush()
                .map_err(|e| ChartError::io(&path, e))?;
            debug!(base_name = descriptor.base_name(), "chart finalized");
        }
        Ok(())
    }

    /// Whether the descriptor's data file is still open for writing in this
    /// process.
    pub fn is_open(&self, base_name: &str) -> bool {
        self.writers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(base_name)
    }

    /// Read back the descriptor persisted under `base_name`.
    pub fn load(&self, base_name: &str) -> Result<ChartDescriptor> {
        let path = self.root.join(format!("{base_name}.json"));
        let json = fs::read_to_string(&path).map_err(|e| ChartError::io(&path, e))?;
        let meta: ChartMeta = serde_json::from_str(&json)?;
        Ok(ChartDescriptor::loaded(
            meta.name,
            meta.x_axis,
            meta.y_axis,
            meta.axis_type,
            meta.attributes,
            meta.group,
            base_name.to_string(),
        ))
    }

    /// Discover every chart recorded in this directory, across all runs.
    ///
    /// Unreadable or foreign files are skipped with a warning; the scan
    /// itself only fails when the directory cannot be listed. Results are
    /// sorted by base name for deterministic grouping.
    pub fn scan(&self) -> Result<Vec<ChartDescriptor>> {
        let entries = fs::read_dir(&self.root).map_err(|e| ChartError::io(&self.root, e))?;

        let mut descriptors = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ChartError::io(&self.root, e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(base_name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match self.load(base_name) {
                Ok(descriptor) => descriptors.push(descriptor),
                Err(err) => {
                    warn!(%err, path = %path.display(), "skipping unreadable chart record");
                }
            }
        }
        descriptors.sort_by(|a, b| a.base_name().cmp(b.base_name()));
        Ok(descriptors)
    }

    /// Read all rows of a finalized chart, in file order.
    ///
    /// Fails with `FileBusy` while the chart is still open for writing in
    /// this process; never mutates the file.
    pub fn read_rows(&self, descriptor: &ChartDescriptor) -> Result<Vec<DataRow>> {
        if self.is_open(descriptor.base_name()) {
            return Err(ChartError::FileBusy {
                base_name: descriptor.base_name().to_string(),
            });
        }

        let path = self.data_path(descriptor);
        let contents = fs::read_to_string(&path).map_err(|e| ChartError::io(&path, e))?;

        let mut rows = Vec::new();
        for (idx, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let row = DataRow::parse(line)
                .filter(|r| r.values.len() == descriptor.attributes().len())
                .ok_or_else(|| ChartError::MalformedRow {
                    path: path.clone(),
                    line: idx + 1,
                })?;
            rows.push(row);
        }
        Ok(rows)
    }

    /// Get or open the shared writer for the descriptor's data file.
    fn writer_for(&self, descriptor: &ChartDescriptor) -> Result<SharedWriter> {
        {
            let writers = self.writers.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(writer) = writers.get(descriptor.base_name()) {
                return Ok(Arc::clone(writer));
            }
        }

        let mut writers = self.writers.write().unwrap_or_else(PoisonError::into_inner);
        // Lost the race to another opener: reuse its writer.
        if let Some(writer) = writers.get(descriptor.base_name()) {
            return Ok(Arc::clone(writer));
        }

        let path = self.data_path(descriptor);
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .map_err(|e| ChartError::io(&path, e))?;
        let writer = Arc::new(Mutex::new(BufWriter::new(file)));
        writers.insert(descriptor.base_name().to_string(), Arc::clone(&writer));
        Ok(writer)
    }
}

impl std::fmt::Debug for ChartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartStore")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
