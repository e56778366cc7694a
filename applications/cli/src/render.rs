//! Plain-text rendering of catalog nodes

use shelf_core::{FileRecord, LibraryNode};
use std::collections::HashMap;
use std::fmt::Write;

/// Format seconds as `h:mm:ss`, or `m:ss` under an hour
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

fn status(node: &LibraryNode) -> String {
    if node.progress.is_completed {
        "done".to_string()
    } else if node.progress.is_started {
        format!("{}%", node.progress.progress_percent)
    } else {
        "new".to_string()
    }
}

fn label(node: &LibraryNode) -> String {
    match (node.author.is_empty(), node.title.is_empty()) {
        (false, false) => format!("{} - {}", node.author, node.title),
        (true, false) => node.title.clone(),
        _ => node.display_name.clone(),
    }
}

/// Render nodes as an indented tree
///
/// Children keep the order they have in `nodes`. Nodes whose parent is absent are
/// rendered as top-level entries.
pub fn render_tree(nodes: &[LibraryNode]) -> String {
    let present: std::collections::HashSet<&str> = nodes.iter().map(|n| n.path.as_str()).collect();
    let mut children: HashMap<&str, Vec<&LibraryNode>> = HashMap::new();
    let mut roots = Vec::new();

    for node in nodes {
        if node.parent_path.is_empty() || !present.contains(node.parent_path.as_str()) {
            roots.push(node);
        } else {
            children.entry(node.parent_path.as_str()).or_default().push(node);
        }
    }

    let mut out = String::new();
    let mut stack: Vec<(&LibraryNode, usize)> = roots.into_iter().rev().map(|n| (n, 0)).collect();

    while let Some((node, depth)) = stack.pop() {
        let indent = "  ".repeat(depth);
        if node.is_audiobook() {
            let _ = writeln!(
                out,
                "{}{} [{}, {}]",
                indent,
                label(node),
                format_duration(node.total_duration_seconds),
                status(node)
            );
        } else {
            let _ = writeln!(out, "{}{}/", indent, node.display_name);
        }

        if let Some(kids) = children.get(node.path.as_str()) {
            stack.extend(kids.iter().rev().map(|kid| (*kid, depth + 1)));
        }
    }

    out
}

/// Render one node with its file records
pub fn render_node(node: &LibraryNode, files: &[FileRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", node.path);
    let _ = writeln!(out, "  kind:      {}", node.kind.as_str());

    if node.is_audiobook() {
        for (name, value) in [
            ("author", &node.author),
            ("title", &node.title),
            ("narrator", &node.narrator),
            ("year", &node.tag_year),
        ] {
            if !value.is_empty() {
                let _ = writeln!(out, "  {:<10} {}", format!("{}:", name), value);
            }
        }
        if let Some(cover) = &node.cover_path {
            let _ = writeln!(out, "  cover:     {}", cover);
        }
        let _ = writeln!(
            out,
            "  duration:  {} in {} files",
            format_duration(node.total_duration_seconds),
            node.file_count
        );
        let _ = writeln!(
            out,
            "  progress:  {} (file {}, {} at {}x)",
            status(node),
            node.progress.current_file_index + 1,
            format_duration(node.progress.current_position_seconds),
            node.progress.playback_speed
        );
    }

    if !node.is_available {
        let _ = writeln!(out, "  missing from disk");
    }

    for file in files {
        let _ = writeln!(
            out,
            "  {:>3}. {} ({})",
            file.track_number,
            file.file_name,
            format_duration(file.duration_seconds)
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::NodeKind;

    fn audiobook(path: &str, author: &str, title: &str) -> LibraryNode {
        let mut node = LibraryNode::folder(path);
        node.kind = NodeKind::Audiobook;
        node.author = author.to_string();
        node.title = title.to_string();
        node.total_duration_seconds = 3725.0;
        node
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(59.6), "1:00");
        assert_eq!(format_duration(3725.0), "1:02:05");
    }

    #[test]
    fn tree_nests_children_under_parents() {
        let mut started = audiobook("A/B/Book", "Author", "Title");
        started.progress.is_started = true;
        started.progress.progress_percent = 40;

        let nodes = vec![
            LibraryNode::folder("A"),
            audiobook("Loose", "", ""),
            LibraryNode::folder("A/B"),
            started,
        ];

        assert_eq!(
            render_tree(&nodes),
            "A/\n  B/\n    Author - Title [1:02:05, 40%]\nLoose [1:02:05, new]\n"
        );
    }

    #[test]
    fn node_details_list_files() {
        let node = audiobook("Book", "Author", "Title");
        let files = vec![FileRecord {
            audiobook_path: "Book".to_string(),
            file_path: "Book/01.mp3".to_string(),
            file_name: "01.mp3".to_string(),
            track_number: 1,
            duration_seconds: 61.0,
            title: String::new(),
            artist: String::new(),
            album: String::new(),
            genre: String::new(),
            comment: String::new(),
        }];

        let text = render_node(&node, &files);
        assert!(text.starts_with("Book\n"));
        assert!(text.contains("  author:    Author\n"));
        assert!(text.contains("    1. 01.mp3 (1:01)\n"));
        assert!(!text.contains("missing"));
    }
}
