#![no_main]

use gss_core::{BuilderConfig, GraphEntry, Gss, blank_node, create_graph_with, link_violations};
use libfuzzer_sys::fuzz_target;

// Three bytes per entry: key, parent (high bit clear means root), contents.
fuzz_target!(|data: &[u8]| {
    let entries: Vec<GraphEntry<u8, u8>> = data
        .chunks_exact(3)
        .map(|chunk| {
            let key = chunk[0] % 16;
            let parent = (chunk[1] & 0x80 != 0).then_some(chunk[1] % 16);
            GraphEntry::new(key, Some(chunk[2]), parent)
        })
        .collect();

    for dedup_roots in [false, true] {
        let mut gss = Gss::new();
        let roots = create_graph_with(&mut gss, &entries, blank_node, &BuilderConfig { dedup_roots });

        let violations = link_violations(&gss);
        assert!(violations.is_empty(), "{violations:?}");
        assert!(roots.iter().all(|&root| gss.contains(root)));
        for id in gss.ids() {
            let _ = gss.checked_descendants_count(id);
        }
    }
});
