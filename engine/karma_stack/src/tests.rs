use super::*;

/// Minimal stand-in for a descriptor tree: each level wraps the next.
enum Nest {
    Leaf(u32),
    Inner(Box<Nest>),
}

fn build(depth: usize) -> Nest {
    let mut node = Nest::Leaf(7);
    for _ in 0..depth {
        node = Nest::Inner(Box::new(node));
    }
    node
}

fn depth_of(node: &Nest) -> usize {
    ensure_sufficient_stack(|| match node {
        Nest::Leaf(_) => 0,
        Nest::Inner(inner) => depth_of(inner) + 1,
    })
}

fn leaf_of(node: &Nest) -> u32 {
    ensure_sufficient_stack(|| match node {
        Nest::Leaf(v) => *v,
        Nest::Inner(inner) => leaf_of(inner),
    })
}

/// Iterative teardown so the test itself does not recurse on drop.
fn dismantle(mut node: Nest) {
    while let Nest::Inner(inner) = node {
        node = *inner;
    }
}

#[test]
fn shallow_nesting() {
    let tree = build(3);
    assert_eq!(depth_of(&tree), 3);
    assert_eq!(leaf_of(&tree), 7);
    dismantle(tree);
}

#[test]
fn deep_nesting_grows_stack() {
    // Far deeper than any real descriptor, deep enough to overflow 8MB
    let tree = build(200_000);
    assert_eq!(depth_of(&tree), 200_000);
    dismantle(tree);
}

#[test]
fn passes_results_through() {
    let result: Result<usize, &str> = ensure_sufficient_stack(|| Ok(5));
    assert_eq!(result, Ok(5));
}
