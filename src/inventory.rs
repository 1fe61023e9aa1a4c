//! Node inventory: the YAML description of a containerlab topology's devices.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Inventory errors
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Failed to read inventory file '{path}': {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse inventory: {0}")]
    ParseFailed(#[from] serde_yaml::Error),

    #[error("Node '{0}' not found in inventory")]
    NodeNotFound(String),

    #[error("No nodes of kind '{0}' in inventory")]
    KindNotFound(String),

    #[error("Inventory contains no nodes")]
    Empty,
}

/// One device record from the inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Node name (unique within the lab)
    pub name: String,
    /// Management address
    pub host: String,
    /// Containerlab kind (e.g. "juniper_vjunosrouter")
    pub kind: String,
    /// Vendor override; takes precedence over kind for driver selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    /// Per-node username override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Per-node password override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Per-node SSH port override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// The inventory file: lab name plus node list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    /// Lab name
    #[serde(default)]
    pub lab: String,
    /// Device records
    #[serde(default)]
    pub nodes: Vec<Node>,
}

/// Which inventory nodes an operation targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeSelector {
    /// A single node by name
    Name(String),
    /// Every node of a containerlab kind
    Kind(String),
    /// An explicit list of node names
    List(Vec<String>),
    /// Every node in the inventory
    All,
}

impl Inventory {
    /// Load an inventory from a YAML file
    pub fn load(path: &Path) -> Result<Self, InventoryError> {
        let content = std::fs::read_to_string(path).map_err(|e| InventoryError::ReadFailed {
            path: path.display().to_string(),
            source: e,
        })?;
        let inventory: Inventory = serde_yaml::from_str(&content)?;
        debug!(lab = %inventory.lab, nodes = inventory.nodes.len(), "Loaded inventory");
        Ok(inventory)
    }

    /// Parse an inventory from a YAML string
    pub fn parse(content: &str) -> Result<Self, InventoryError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Resolve a selector to the matching nodes.
    ///
    /// Every selector that matches nothing is an error, including `All`
    /// against an empty inventory.
    pub fn select(&self, selector: &NodeSelector) -> Result<Vec<Node>, InventoryError> {
        match selector {
            NodeSelector::Name(name) => self
                .nodes
                .iter()
                .find(|n| n.name == *name)
                .cloned()
                .map(|n| vec![n])
                .ok_or_else(|| InventoryError::NodeNotFound(name.clone())),

            NodeSelector::Kind(kind) => {
                let matched: Vec<Node> = self
                    .nodes
                    .iter()
                    .filter(|n| n.kind.eq_ignore_ascii_case(kind))
                    .cloned()
                    .collect();
                if matched.is_empty() {
                    Err(InventoryError::KindNotFound(kind.clone()))
                } else {
                    Ok(matched)
                }
            }

            NodeSelector::List(names) => {
                let mut matched = Vec::with_capacity(names.len());
                for name in names {
                    let node = self
                        .nodes
                        .iter()
                        .find(|n| n.name == *name)
                        .cloned()
                        .ok_or_else(|| InventoryError::NodeNotFound(name.clone()))?;
                    matched.push(node);
                }
                Ok(matched)
            }

            NodeSelector::All => {
                if self.nodes.is_empty() {
                    Err(InventoryError::Empty)
                } else {
                    Ok(self.nodes.clone())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
lab: core
nodes:
  - name: r1
    host: 172.20.20.11
    kind: juniper_vjunosrouter
  - name: r2
    host: 172.20.20.12
    kind: juniper_vjunosrouter
    username: lab
    password: lab123
    port: 2222
  - name: sw1
    host: 172.20.20.21
    kind: juniper_vjunosswitch
    vendor: juniper
"#;

    #[test]
    fn test_parse_inventory() {
        let inv = Inventory::parse(SAMPLE).unwrap();
        assert_eq!(inv.lab, "core");
        assert_eq!(inv.nodes.len(), 3);
        assert_eq!(inv.nodes[1].username.as_deref(), Some("lab"));
        assert_eq!(inv.nodes[1].port, Some(2222));
        assert_eq!(inv.nodes[2].vendor.as_deref(), Some("juniper"));
    }

    #[test]
    fn test_select_by_name() {
        let inv = Inventory::parse(SAMPLE).unwrap();
        let nodes = inv.select(&NodeSelector::Name("r2".to_string())).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].host, "172.20.20.12");

        let err = inv
            .select(&NodeSelector::Name("missing".to_string()))
            .unwrap_err();
        assert!(matches!(err, InventoryError::NodeNotFound(_)));
    }

    #[test]
    fn test_select_by_kind_case_insensitive() {
        let inv = Inventory::parse(SAMPLE).unwrap();
        let nodes = inv
            .select(&NodeSelector::Kind("JUNIPER_VJUNOSROUTER".to_string()))
            .unwrap();
        assert_eq!(nodes.len(), 2);

        let err = inv
            .select(&NodeSelector::Kind("nokia_srlinux".to_string()))
            .unwrap_err();
        assert!(matches!(err, InventoryError::KindNotFound(_)));
    }

    #[test]
    fn test_select_list_fails_on_any_missing() {
        let inv = Inventory::parse(SAMPLE).unwrap();
        let ok = inv
            .select(&NodeSelector::List(vec![
                "r1".to_string(),
                "sw1".to_string(),
            ]))
            .unwrap();
        assert_eq!(ok.len(), 2);

        let err = inv
            .select(&NodeSelector::List(vec![
                "r1".to_string(),
                "ghost".to_string(),
            ]))
            .unwrap_err();
        assert!(matches!(err, InventoryError::NodeNotFound(_)));
    }

    #[test]
    fn test_select_all_on_empty_inventory_errors() {
        let inv = Inventory::default();
        let err = inv.select(&NodeSelector::All).unwrap_err();
        assert!(matches!(err, InventoryError::Empty));
    }
}
