//! End-to-end scenarios: build from edge lists, then query, mutate, sort
//! and render through the public API only.

use gss_core::{
    BuilderConfig, GraphEntry, Gss, GssConfig, NodeId, PathConfig, blank_node, create_graph,
    create_graph_with, links_are_consistent,
};

fn entry(key: &str, contents: Option<&str>, parent: Option<&str>) -> GraphEntry<String, String> {
    GraphEntry::new(
        key.to_string(),
        contents.map(str::to_string),
        parent.map(str::to_string),
    )
}

fn key_of(gss: &Gss<String, String>, id: NodeId) -> &str {
    gss.key(id).map_or("", String::as_str)
}

#[test]
fn mixed_root_and_child_entries_for_one_key() {
    let entries = vec![
        entry("A", Some("a"), None),
        entry("B", Some("b"), Some("A")),
        entry("C", Some("c"), Some("A")),
        entry("B", Some("b2"), None),
    ];
    let mut gss = Gss::new();
    let roots = create_graph(&mut gss, &entries, blank_node);

    let keys: Vec<&str> = roots.iter().map(|&id| key_of(&gss, id)).collect();
    assert_eq!(keys, ["A", "B"]);

    let a = roots[0];
    let children: Vec<&str> = gss.children(a).iter().map(|&id| key_of(&gss, id)).collect();
    assert_eq!(children, ["B", "C"]);
    assert_eq!(gss.contents(roots[1]).map(String::as_str), Some("b"));
    assert!(links_are_consistent(&gss));
}

#[test]
fn path_lookup_from_built_root() {
    let entries = vec![
        entry("A", None, None),
        entry("B", None, Some("A")),
        entry("C", None, Some("B")),
    ];
    let mut gss = Gss::new();
    let roots = create_graph(&mut gss, &entries, blank_node);
    let a = roots[0];

    let c = gss.descendant_by_path(a, "A/B/C").expect("C");
    assert_eq!(key_of(&gss, c), "C");
    assert_eq!(gss.descendant_by_path(a, "A/X"), None);
    assert_eq!(gss.first_root_path(c), vec![a, gss.child_by_key(a, "B").expect("B"), c]);

    let dotted = PathConfig {
        separator: ".".to_string(),
    };
    assert_eq!(gss.descendant_by_path_with(a, "A.B.C", &dotted), Some(c));
}

#[test]
fn shared_subtree_is_one_node_with_two_parents() {
    let entries = vec![
        entry("root", None, None),
        entry("left", None, Some("root")),
        entry("right", None, Some("root")),
        entry("shared", Some("s"), Some("left")),
        entry("shared", None, Some("right")),
        entry("leaf", None, Some("shared")),
    ];
    let mut gss = Gss::new();
    let roots = create_graph(&mut gss, &entries, blank_node);
    let root = roots[0];

    let via_left = gss.descendant_by_path(root, "root/left/shared").expect("left");
    let via_right = gss.descendant_by_path(root, "root/right/shared").expect("right");
    assert_eq!(via_left, via_right);
    assert_eq!(gss.parents(via_left).len(), 2);

    // Paths are counted, not distinct nodes.
    assert_eq!(gss.descendants_count(root), 6);
    assert_eq!(gss.distinct_descendants(root).len(), 4);

    let leaf = gss.find_descendant(root, "leaf").expect("leaf");
    gss.remove_all_parents(via_left);
    assert!(gss.children(gss.child_by_key(root, "left").expect("left")).is_empty());
    assert!(gss.has_parent(leaf, via_left));
    assert!(links_are_consistent(&gss));
}

#[test]
fn dangling_parents_surface_as_roots_once_deduplicated() {
    let entries = vec![
        entry("x", None, Some("ghost")),
        entry("x", None, Some("ghost")),
        entry("y", None, None),
    ];

    let mut gss = Gss::new();
    let roots = create_graph(&mut gss, &entries, blank_node);
    assert_eq!(roots.len(), 3);

    let config = GssConfig {
        builder: BuilderConfig { dedup_roots: true },
        ..GssConfig::default()
    };
    let mut gss = Gss::new();
    let roots = create_graph_with(&mut gss, &entries, blank_node, &config.builder);
    let keys: Vec<&str> = roots.iter().map(|&id| key_of(&gss, id)).collect();
    assert_eq!(keys, ["x", "y"]);
}

#[test]
fn sort_then_render() {
    let entries = vec![
        entry("menu", None, None),
        entry("tools", Some("t"), Some("menu")),
        entry("file", Some("f"), Some("menu")),
        entry("save", Some("s"), Some("file")),
        entry("open", Some("o"), Some("file")),
    ];
    let mut gss = Gss::new();
    let mut roots = create_graph(&mut gss, &entries, blank_node);
    gss.sort_node_list(&mut roots);

    let text = gss.get(roots[0]).expect("root").to_string();
    let expected = [
        "(Key=menu) (Contents=null) (2 children)",
        "  (Key=file) (Contents=f) (2 children)",
        "    (Key=open) (Contents=o)",
        "    (Key=save) (Contents=s)",
        "  (Key=tools) (Contents=t)",
    ];
    assert_eq!(text.lines().collect::<Vec<_>>(), expected);
}

#[test]
fn replacing_children_keeps_links_symmetric() {
    let mut gss: Gss<String, String> = Gss::new();
    let parent = gss.insert("p".into(), None);
    let old: Vec<NodeId> = ["a", "b", "c"]
        .iter()
        .map(|k| gss.insert((*k).to_string(), None))
        .collect();
    gss.set_children(parent, old.iter().copied());

    let fresh_b = gss.insert("b".into(), Some("new".into()));
    let d = gss.insert("d".into(), None);
    gss.set_children(parent, [fresh_b, d, old[0]]);

    assert_eq!(gss.children(parent), &[fresh_b, d, old[0]]);
    assert!(!gss.has_parents(old[1]));
    assert!(!gss.has_parents(old[2]));
    assert!(links_are_consistent(&gss));

    gss.remove_children_by_key(parent, "d");
    assert_eq!(gss.children(parent), &[fresh_b, old[0]]);
    gss.remove_parent(old[0], parent);
    assert_eq!(gss.children(parent), &[fresh_b]);
}
