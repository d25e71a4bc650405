//! Snapshot collaborator: rasterizes a subtree into an image data URI.
//!
//! The converter never renders pixels itself. A host (a browser extension,
//! a headless browser, a test double) implements [`Snapshotter`].

use crate::snapshot::{NodeIndex, SnapshotTree};
use crate::{Result, SnapshotOptions};
use futures::future::join_all;
use std::collections::HashMap;

/// A 1x1 transparent PNG.
pub const BLANK_PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

#[allow(async_fn_in_trait)]
pub trait Snapshotter {
    /// Rasterize the subtree rooted at `node`, returning a `data:` URI.
    async fn snapshot(
        &self,
        tree: &SnapshotTree,
        node: NodeIndex,
        options: &SnapshotOptions,
    ) -> Result<String>;
}

/// Returns a blank image for every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSnapshotter;

impl NoopSnapshotter {
    pub fn new() -> Self {
        NoopSnapshotter
    }
}

impl Snapshotter for NoopSnapshotter {
    async fn snapshot(
        &self,
        _tree: &SnapshotTree,
        _node: NodeIndex,
        _options: &SnapshotOptions,
    ) -> Result<String> {
        Ok(BLANK_PNG.to_string())
    }
}

/// Snapshot every node in `nodes` concurrently and collect the successes.
/// A failure is logged and leaves that node out of the map.
pub async fn snapshot_all<S: Snapshotter>(
    snapshotter: &S,
    tree: &SnapshotTree,
    nodes: &[NodeIndex],
    options: &SnapshotOptions,
) -> HashMap<NodeIndex, String> {
    let results = join_all(nodes.iter().map(|&n| async move {
        (n, snapshotter.snapshot(tree, n, options).await)
    }))
    .await;

    let mut out = HashMap::with_capacity(results.len());
    for (node, result) in results {
        match result {
            Ok(uri) => {
                out.insert(node, uri);
            }
            Err(e) => log::warn!("chart snapshot for node {} failed: {}", node, e),
        }
    }
    log::debug!("{} of {} snapshots succeeded", out.len(), nodes.len());
    out
}
