// Property tests for the engine's testable properties: the
// pointer-arithmetic identity, copy independence, and decimal rendering.

use proptest::prelude::*;
use structsem::memory::{pointer_add, Region};
use structsem::output::Output;
use structsem::suite::{fixtures, Machine};
use structsem::types::Type;

fn machine() -> Machine<Vec<u8>> {
    Machine::new(Vec::new()).expect("machine setup failed")
}

fn element_types() -> Vec<Type> {
    vec![
        Type::Int,
        Type::Char,
        Type::Long,
        fixtures::point(),
        fixtures::shape(),
        fixtures::point().pointer_to(),
        fixtures::point().pointer_to().pointer_to(),
    ]
}

proptest! {
    // advance(addressOf(arr), i) == addressOf(arr[i]) for every element
    // type, region, and in-range index
    #[test]
    fn pointer_identity_holds(len in 1usize..32, region_idx in 0usize..3) {
        let region = [Region::Stack, Region::Heap, Region::Static][region_idx];
        let mut m = machine();
        m.arena.push_frame();
        for elem in element_types() {
            let arr = m
                .arena
                .allocate_array(&m.types, region, elem.clone(), len)
                .unwrap();
            for i in 0..len as i64 {
                let computed = pointer_add(&m.types, arr.addr(), i, &elem).unwrap();
                let indexed = arr.index(&m.types, i).unwrap().addr();
                prop_assert_eq!(computed, indexed);
            }
        }
    }

    // Mutating a copy never changes the original, and vice versa
    #[test]
    fn copies_stay_independent(x1: i32, y1: i32, x2: i32, y2: i32) {
        let mut m = machine();
        m.arena.push_frame();
        let a = m
            .arena
            .allocate(&m.types, Region::Stack, fixtures::point())
            .unwrap();
        let b = m
            .arena
            .allocate(&m.types, Region::Stack, fixtures::point())
            .unwrap();

        m.arena.write_int(&a.field(&m.types, "x").unwrap(), x1 as i64).unwrap();
        m.arena.write_int(&a.field(&m.types, "y").unwrap(), y1 as i64).unwrap();
        m.arena.copy(&m.types, &b, &a).unwrap();
        m.arena.write_int(&b.field(&m.types, "x").unwrap(), x2 as i64).unwrap();
        m.arena.write_int(&b.field(&m.types, "y").unwrap(), y2 as i64).unwrap();

        prop_assert_eq!(
            m.arena.read_int(&a.field(&m.types, "x").unwrap()).unwrap(),
            x1 as i64
        );
        prop_assert_eq!(
            m.arena.read_int(&a.field(&m.types, "y").unwrap()).unwrap(),
            y1 as i64
        );
        prop_assert_eq!(
            m.arena.read_int(&b.field(&m.types, "x").unwrap()).unwrap(),
            x2 as i64
        );
        prop_assert_eq!(
            m.arena.read_int(&b.field(&m.types, "y").unwrap()).unwrap(),
            y2 as i64
        );
    }

    // Pass-by-value isolates the caller's aggregate from callee mutation
    #[test]
    fn pass_by_value_never_leaks_back(x: i32, y: i32) {
        let mut m = machine();
        m.arena.push_frame();
        let arg = m
            .arena
            .allocate(&m.types, Region::Stack, fixtures::point())
            .unwrap();
        m.arena.write_int(&arg.field(&m.types, "x").unwrap(), x as i64).unwrap();
        m.arena.write_int(&arg.field(&m.types, "y").unwrap(), y as i64).unwrap();

        m.arena.push_frame();
        let param = m.arena.pass_by_value(&m.types, &arg).unwrap();
        m.arena
            .write_int(&param.field(&m.types, "x").unwrap(), x as i64 ^ 0x5555)
            .unwrap();
        m.arena.pop_frame();

        prop_assert_eq!(
            m.arena.read_int(&arg.field(&m.types, "x").unwrap()).unwrap(),
            x as i64
        );
        prop_assert_eq!(
            m.arena.read_int(&arg.field(&m.types, "y").unwrap()).unwrap(),
            y as i64
        );
    }

    // put_int agrees with the standard decimal rendering for every i64
    #[test]
    fn put_int_matches_decimal(n: i64) {
        let mut out = Output::new(Vec::new());
        out.put_int(n).unwrap();
        prop_assert_eq!(String::from_utf8(out.into_inner()).unwrap(), n.to_string());
    }
}
