use serde::Deserialize;

/// The parts of a repository node needed to locate its parent site.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinimalNode {
    pub name: Option<String>,
    pub node_type: Option<String>,
    pub path: Option<NodePath>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodePath {
    pub elements: Option<Vec<PathElement>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathElement {
    pub name: String,
    pub node_type: Option<String>,
}

const SITE_NODE_TYPE: &str = "st:site";
const SITES_ROOT: &str = "Sites";

/// Lowercased name of the site containing `node`, or `""` when it is not inside one.
pub fn site_name_from_node_path(node: &MinimalNode) -> String {
    node.path
        .as_ref()
        .and_then(|path| path.elements.as_deref())
        .and_then(|elements| {
            elements.iter().find(|el| {
                el.node_type.as_deref() == Some(SITE_NODE_TYPE) && el.name != SITES_ROOT
            })
        })
        .map(|el| el.name.to_lowercase())
        .unwrap_or_default()
}
