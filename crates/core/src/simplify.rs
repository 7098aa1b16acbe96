//! Figma document simplification.
//!
//! Projects a raw Figma API response (an arbitrarily deep, heterogeneous node
//! tree) into the minimal structure that gets cached and returned to callers.
//! The raw input is kept as untyped JSON: the Figma node schema is partially
//! freeform, so simplification inspects field presence instead of assuming a
//! fixed shape.
//!
//! Simplification is pure and synchronous; independent inputs can be
//! simplified concurrently without shared state.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// File-level metadata copied verbatim from the raw response.
///
/// `lastModified` stays a raw string here; timestamp parsing is the resolve
/// layer's concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DocumentMeta {
    pub name: Option<String>,
    #[serde(rename = "lastModified")]
    pub last_modified: Option<String>,
    #[serde(rename = "thumbnailUrl")]
    pub thumbnail_url: Option<String>,
}

/// A simplified Figma node.
///
/// Optional fields are omitted from the serialized form entirely when absent,
/// never emitted as null placeholders. A node whose children all prune away
/// carries no `children` field at all.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SimplifiedNode {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,

    #[serde(rename = "absoluteBoundingBox", skip_serializing_if = "Option::is_none")]
    pub absolute_bounding_box: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fills: Option<Value>,

    #[serde(rename = "componentId", skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<SimplifiedNode>>,
}

/// The simplified form of a whole file or a set of requested subtrees.
///
/// Constructed once per fetch, then serialized verbatim into the cache record.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SimplifiedDocument {
    pub metadata: DocumentMeta,
    pub nodes: Vec<SimplifiedNode>,
    pub components: Value,
    pub styles: Value,
}

/// Recursively simplify one raw node.
///
/// Returns None (pruned) when the node sits beyond `max_depth` or is
/// explicitly invisible. Depth is counted from the file's top-level children
/// (depth 0), and a node exactly at the limit is kept: pruning triggers on
/// `depth > max_depth`, not `>=`.
pub fn simplify_node(node: &Value, depth: u32, max_depth: Option<u32>) -> Option<SimplifiedNode> {
    if let Some(limit) = max_depth
        && depth > limit
    {
        return None;
    }

    // Absent visibility flag means visible.
    if node.get("visible").and_then(Value::as_bool) == Some(false) {
        return None;
    }

    let raw_kind = node.get("type").and_then(Value::as_str);

    // Downstream consumers only care that a vector shape is a rasterizable
    // image; the original shape category is dropped.
    let kind = match raw_kind {
        Some("VECTOR") => Some("IMAGE-SVG".to_string()),
        Some(other) => Some(other.to_string()),
        None => None,
    };

    let characters = node.get("characters").and_then(Value::as_str).map(str::to_string);

    // Text style only travels together with text content.
    let style = if characters.is_some() { node.get("style").cloned() } else { None };

    let children = node.get("children").and_then(Value::as_array).and_then(|raw_children| {
        let kept: Vec<SimplifiedNode> = raw_children
            .iter()
            .filter_map(|child| simplify_node(child, depth + 1, max_depth))
            .collect();
        if kept.is_empty() { None } else { Some(kept) }
    });

    Some(SimplifiedNode {
        id: node.get("id").and_then(Value::as_str).map(str::to_string),
        name: node.get("name").and_then(Value::as_str).map(str::to_string),
        kind,
        absolute_bounding_box: node.get("absoluteBoundingBox").cloned(),
        characters,
        style,
        fills: node.get("fills").cloned(),
        component_id: node.get("componentId").and_then(Value::as_str).map(str::to_string),
        children,
    })
}

/// Simplify a raw Figma API response into a [`SimplifiedDocument`].
///
/// Accepts both response shapes:
/// - `GET /files/{key}`: a `document` root whose children (canvases/pages)
///   become the top-level nodes;
/// - `GET /files/{key}/nodes`: a `nodes` map from requested node id to an
///   independent subtree, each subtree root treated as a top-level node.
///
/// Every top-level node starts at depth 0. A response where everything is
/// filtered away yields an empty node list, not an error.
pub fn simplify_response(data: &Value, max_depth: Option<u32>) -> SimplifiedDocument {
    let metadata = DocumentMeta {
        name: data.get("name").and_then(Value::as_str).map(str::to_string),
        last_modified: data.get("lastModified").and_then(Value::as_str).map(str::to_string),
        thumbnail_url: data.get("thumbnailUrl").and_then(Value::as_str).map(str::to_string),
    };

    let mut nodes = Vec::new();

    if let Some(root) = data.get("document") {
        if let Some(children) = root.get("children").and_then(Value::as_array) {
            for child in children {
                if let Some(simplified) = simplify_node(child, 0, max_depth) {
                    nodes.push(simplified);
                }
            }
        }
    } else if let Some(subtrees) = data.get("nodes").and_then(Value::as_object) {
        for node_data in subtrees.values() {
            if let Some(root) = node_data.get("document")
                && let Some(simplified) = simplify_node(root, 0, max_depth)
            {
                nodes.push(simplified);
            }
        }
    }

    SimplifiedDocument {
        metadata,
        nodes,
        components: data.get("components").cloned().unwrap_or_else(empty_object),
        styles: data.get("styles").cloned().unwrap_or_else(empty_object),
    }
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}
