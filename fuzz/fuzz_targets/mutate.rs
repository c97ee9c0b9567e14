#![no_main]

use gss_core::{Gss, NodeId, link_violations};
use libfuzzer_sys::fuzz_target;

const POOL: usize = 8;

// Two bytes per mutation: opcode with operand bits, second operand.
fuzz_target!(|data: &[u8]| {
    let mut gss: Gss<u8, u8> = Gss::new();
    let ids: Vec<NodeId> = (0..POOL)
        .map(|slot| {
            let slot = u8::try_from(slot).unwrap_or(0);
            gss.insert(slot % 3, Some(slot))
        })
        .collect();
    let node = |byte: u8| ids[usize::from(byte) % POOL];

    for pair in data.chunks_exact(2) {
        let (op, arg) = (pair[0], pair[1]);
        let target = node(op >> 3);
        match op & 0x07 {
            0 => gss.add_child(target, node(arg)),
            1 => gss.add_parent(target, node(arg)),
            2 => gss.remove_child(target, node(arg)),
            3 => gss.remove_child_at(target, usize::from(arg % 4)),
            4 => gss.remove_parent_at(target, usize::from(arg % 4)),
            5 => gss.remove_children_by_key(target, &(arg % 3)),
            6 => gss.remove_all_parents(target),
            _ => gss.set_children(target, [node(arg), node(arg >> 3)]),
        }
        let violations = link_violations(&gss);
        assert!(violations.is_empty(), "after op {op:#x}: {violations:?}");
    }
});
