//! History action tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of mutation a history entry represents.
///
/// Serialized as the upper-case tag (`"ADD_NODE"`); unknown tags survive a
/// round trip through [`HistoryAction::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HistoryAction {
    Init,
    AddNode,
    DeleteNode,
    MoveNode,
    AddEdge,
    DeleteEdge,
    UpdateParams,
    LoadTemplate,
    LoadVersion,
    ImportModel,
    BatchOperation,
    Custom(String),
}

impl HistoryAction {
    pub fn tag(&self) -> &str {
        match self {
            HistoryAction::Init => "INIT",
            HistoryAction::AddNode => "ADD_NODE",
            HistoryAction::DeleteNode => "DELETE_NODE",
            HistoryAction::MoveNode => "MOVE_NODE",
            HistoryAction::AddEdge => "ADD_EDGE",
            HistoryAction::DeleteEdge => "DELETE_EDGE",
            HistoryAction::UpdateParams => "UPDATE_PARAMS",
            HistoryAction::LoadTemplate => "LOAD_TEMPLATE",
            HistoryAction::LoadVersion => "LOAD_VERSION",
            HistoryAction::ImportModel => "IMPORT_MODEL",
            HistoryAction::BatchOperation => "BATCH_OPERATION",
            HistoryAction::Custom(tag) => tag,
        }
    }

    /// Human-readable label shown in tooltips and notifications.
    pub fn label(&self) -> &str {
        match self {
            HistoryAction::Init => "Initial State",
            HistoryAction::AddNode => "Add Component",
            HistoryAction::DeleteNode => "Delete Component",
            HistoryAction::MoveNode => "Move Component",
            HistoryAction::AddEdge => "Connect Components",
            HistoryAction::DeleteEdge => "Disconnect Components",
            HistoryAction::UpdateParams => "Edit Parameters",
            HistoryAction::LoadTemplate => "Load Template",
            HistoryAction::LoadVersion => "Load Version",
            HistoryAction::ImportModel => "Import Model",
            HistoryAction::BatchOperation => "Multiple Changes",
            HistoryAction::Custom(tag) => tag,
        }
    }
}

impl From<String> for HistoryAction {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "INIT" => HistoryAction::Init,
            "ADD_NODE" => HistoryAction::AddNode,
            "DELETE_NODE" => HistoryAction::DeleteNode,
            "MOVE_NODE" => HistoryAction::MoveNode,
            "ADD_EDGE" => HistoryAction::AddEdge,
            "DELETE_EDGE" => HistoryAction::DeleteEdge,
            "UPDATE_PARAMS" => HistoryAction::UpdateParams,
            "LOAD_TEMPLATE" => HistoryAction::LoadTemplate,
            "LOAD_VERSION" => HistoryAction::LoadVersion,
            "IMPORT_MODEL" => HistoryAction::ImportModel,
            "BATCH_OPERATION" => HistoryAction::BatchOperation,
            _ => HistoryAction::Custom(tag),
        }
    }
}

impl From<&str> for HistoryAction {
    fn from(tag: &str) -> Self {
        HistoryAction::from(tag.to_string())
    }
}

impl From<HistoryAction> for String {
    fn from(action: HistoryAction) -> Self {
        action.tag().to_string()
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
