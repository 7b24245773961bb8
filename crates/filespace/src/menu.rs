use crate::tree::{FilespaceNode, NodeKind};
use filespace_layout::{NodeId, ScreenPoint};
use serde::Serialize;

/// What the host should do when an entry is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum MenuAction {
    NewFolder { parent: NodeId },
    UploadFiles { parent: NodeId },
    DeleteFolder { node: NodeId },
    DeleteFile { node: NodeId },
    Download { node: NodeId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MenuEntryKind {
    Button,
    Link { url: String, new_window: bool },
    /// A file chooser; when `enabled` is false the host refuses uploads right now.
    FileSelect { enabled: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub label: String,
    pub kind: MenuEntryKind,
    pub action: MenuAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MenuSection {
    pub entries: Vec<MenuEntry>,
}

/// Host-side hooks consulted while building menus.
pub trait ActionHost {
    fn can_upload(&self) -> bool {
        true
    }

    fn download_url(&self, node: &FilespaceNode) -> String;
}

/// The dropdown UI.
pub trait Menu {
    fn show(&mut self, node: NodeId, sections: &[MenuSection], at: ScreenPoint);
    fn hide(&mut self);
}

/// Action list for `node`, by kind.
pub fn menu_for(node: &FilespaceNode, host: &dyn ActionHost) -> Vec<MenuSection> {
    let id = node.id();
    let entries = match node.kind() {
        NodeKind::Folder { .. } => vec![
            MenuEntry {
                label: "Add folder".to_owned(),
                kind: MenuEntryKind::Button,
                action: MenuAction::NewFolder { parent: id },
            },
            MenuEntry {
                label: "Upload file(s)".to_owned(),
                kind: MenuEntryKind::FileSelect {
                    enabled: host.can_upload(),
                },
                action: MenuAction::UploadFiles { parent: id },
            },
            MenuEntry {
                label: "Delete".to_owned(),
                kind: MenuEntryKind::Button,
                action: MenuAction::DeleteFolder { node: id },
            },
        ],
        NodeKind::File => vec![
            MenuEntry {
                label: "Download".to_owned(),
                kind: MenuEntryKind::Link {
                    url: host.download_url(node),
                    new_window: true,
                },
                action: MenuAction::Download { node: id },
            },
            MenuEntry {
                label: "Delete".to_owned(),
                kind: MenuEntryKind::Button,
                action: MenuAction::DeleteFile { node: id },
            },
        ],
    };
    vec![MenuSection {
        entries,
    }]
}
