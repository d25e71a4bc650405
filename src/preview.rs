//! Raster preview of the export region.
//!
//! The preview works on a detached clone of the tree: excluded regions are
//! dropped, chart subtrees are replaced by their snapshots, and the clone is
//! mounted on an [`OffscreenHost`] for the whole-region capture. The clone is
//! unmounted when the capture finishes, whether it succeeded or not.

use crate::chart::find_chart_elements;
use crate::snapshot::{NodeIndex, SnapshotTree};
use crate::snapshotter::{snapshot_all, Snapshotter};
use crate::{Error, ExportConfig, Exporter, Presentation, Result};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewState {
    /// No image yet; also the state after a failed capture.
    Generating,
    Ready { image: String },
}

impl PreviewState {
    pub fn is_ready(&self) -> bool {
        matches!(self, PreviewState::Ready { .. })
    }
}

/// Off-screen mount point for detached clones.
#[derive(Debug, Default)]
pub struct OffscreenHost {
    mounted: Mutex<BTreeMap<u64, Arc<SnapshotTree>>>,
    next: AtomicU64,
}

impl OffscreenHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `tree`; it stays mounted until the returned guard is dropped.
    pub fn mount(&self, tree: SnapshotTree) -> MountedClone<'_> {
        let key = self.next.fetch_add(1, Ordering::Relaxed);
        let tree = Arc::new(tree);
        self.lock().insert(key, Arc::clone(&tree));
        log::debug!("mounted clone {} ({} elements)", key, tree.len());
        MountedClone { host: self, key, tree }
    }

    pub fn mounted_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<u64, Arc<SnapshotTree>>> {
        // the map stays consistent even if a holder panicked
        self.mounted.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A clone mounted on an [`OffscreenHost`]. Unmounts on drop.
pub struct MountedClone<'h> {
    host: &'h OffscreenHost,
    key: u64,
    tree: Arc<SnapshotTree>,
}

impl MountedClone<'_> {
    pub fn tree(&self) -> &SnapshotTree {
        &self.tree
    }
}

impl Drop for MountedClone<'_> {
    fn drop(&mut self) {
        self.host.lock().remove(&self.key);
        log::debug!("unmounted clone {}", self.key);
    }
}

/// Build the preview image for `tree`.
///
/// Chart snapshots run concurrently; a chart whose snapshot fails keeps its
/// live subtree in the clone. A failed whole-region capture is logged and
/// leaves the preview in [`PreviewState::Generating`].
pub async fn prepare<S: Snapshotter>(
    tree: &SnapshotTree,
    snapshotter: &S,
    host: &OffscreenHost,
    config: &ExportConfig,
) -> PreviewState {
    let charts = find_chart_elements(tree, &config.chart_class, &config.chart_attribute);
    let images = snapshot_all(snapshotter, tree, &charts, &config.snapshot).await;

    let (mut clone, origin) = tree.detached_clone();
    for (idx, src) in origin.iter().enumerate() {
        if let Some(uri) = images.get(src) {
            clone.replace_with_image(idx, uri.clone());
        }
    }

    let mounted = host.mount(clone);
    match snapshotter
        .snapshot(mounted.tree(), SnapshotTree::ROOT, &config.snapshot)
        .await
    {
        Ok(image) => PreviewState::Ready { image },
        Err(e) => {
            log::error!("preview capture failed: {}", e);
            PreviewState::Generating
        }
    }
}

/// A review step between requesting an export and downloading it.
pub struct ExportSession<'a> {
    exporter: &'a Exporter,
    tree: &'a SnapshotTree,
    state: PreviewState,
}

impl<'a> ExportSession<'a> {
    /// Prepare the preview and open the session.
    pub async fn open<S: Snapshotter>(
        exporter: &'a Exporter,
        tree: &'a SnapshotTree,
        snapshotter: &S,
        host: &OffscreenHost,
    ) -> ExportSession<'a> {
        let state = exporter.preview(tree, snapshotter, host).await;
        ExportSession { exporter, tree, state }
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    /// Build the editable presentation. Refused while the preview is
    /// still generating.
    pub async fn download<S: Snapshotter>(&self, snapshotter: &S) -> Result<Presentation> {
        if !self.state.is_ready() {
            return Err(Error::Other("preview is still generating".into()));
        }
        self.exporter.export(self.tree, snapshotter).await
    }

    /// Close without exporting.
    pub fn cancel(self) {
        log::debug!("export cancelled");
    }
}

/// Indices in `tree` whose subtree was replaced by an image.
pub fn rasterized(tree: &SnapshotTree) -> Vec<NodeIndex> {
    tree.iter()
        .filter(|(_, el)| el.image.is_some())
        .map(|(idx, _)| idx)
        .collect()
}
