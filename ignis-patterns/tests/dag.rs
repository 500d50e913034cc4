use ignis_patterns::dag::*;

#[test]
fn a_little_complex_case() {
    let dag = Dag::<()>::new();
    let node = dag.create_nodes([(); 9]);
    node[0].add_child(node[1]);
    node[0].add_child(node[2]);
    node[1].add_child(node[3]);
    node[1].add_child(node[4]);
    node[2].add_child(node[4]);
    node[2].add_child(node[5]);
    node[3].add_child(node[6]);
    node[3].add_child(node[7]);
    node[4].add_child(node[8]);
    node[7].add_child(node[4]);
    node[8].add_child(node[5]);

    assert_eq!(node[0].paths_iter().count(), 16);
    assert_eq!(node[0].maximul_paths_iter().count(), 5);

    assert!(!node[8].add_child(node[2]));
}

#[test]
fn extend_by_adjacency_rejects_cycles() {
    let dag = Dag::<usize>::new();
    let adjacency = [vec![1, 2], vec![3, 4], vec![], vec![], vec![1, 2]];
    assert!(dag.extend_by_adjacency(0..5, &adjacency).is_none());
}

#[test]
fn extend_by_adjacency_builds_parents() {
    let dag = Dag::<usize>::new();
    let adjacency = [vec![1, 2], vec![3, 4], vec![], vec![], vec![2]];
    let nodes = dag.extend_by_adjacency(0..5, &adjacency).unwrap();
    let parents = nodes[2].parents();
    assert_eq!(parents.len(), 2);
    assert_eq!(parents[0], nodes[0]);
    assert_eq!(parents[1], nodes[4]);
}
