//! Dependency forest assembly and rendering over resolver-shaped input.

use sca_fingerprint::model::{
    DependencyInfo, EnhancedResult, LibType, Library, OperationResult, Organ, VulnerableLib,
};
use sca_fingerprint::tree::DependencyNode;

// ============================================================================
// Helpers
// ============================================================================

fn jar(artifact: &str) -> Library {
    Library::java("com.acme", artifact, "1.0")
}

fn render_tree(op: &OperationResult) -> String {
    let mut out = Vec::new();
    op.write_tree(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn render_vulnerable(result: &EnhancedResult) -> String {
    let mut out = Vec::new();
    result.write_vulnerable_paths(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn mark_vulnerable(result: &mut EnhancedResult, id: &str) {
    result.vulnerable.insert(
        id.into(),
        VulnerableLib {
            cve: "CVE-2021-44228".to_string(),
            ..VulnerableLib::default()
        },
    );
}

/// a -> {b, c}, b -> d, c -> d
fn diamond() -> OperationResult {
    OperationResult::new("pom.xml", LibType::Java, Organ::Maven)
        .with_direct("a", jar("a"))
        .with_library("b", jar("b"))
        .with_library("c", jar("c"))
        .with_library("d", jar("d"))
        .with_edge("a", "b")
        .with_edge("a", "c")
        .with_edge("b", "d")
        .with_edge("c", "d")
}

// ============================================================================
// Assembly
// ============================================================================

#[test]
fn cycle_terminates() {
    let op = OperationResult::new("pom.xml", LibType::Java, Organ::Maven)
        .with_direct("a", jar("a"))
        .with_library("b", jar("b"))
        .with_edge("a", "b")
        .with_edge("b", "a");

    let forest = op.tree();
    assert_eq!(forest.len(), 1);
    let b = &forest[0].children[0];
    let a_again = &b.children[0];
    assert_eq!(a_again.id.as_str(), "a");
    assert!(a_again.deduplicated);
    assert!(a_again.children.is_empty());

    insta::assert_snapshot!(render_tree(&op), @r"
    pom.xml (JAVA)
    |-- com.acme:a:1.0
    |  |-- com.acme:b:1.0
    |  |  |-- com.acme:a:1.0 (d)
    ");
}

#[test]
fn diamond_expands_shared_child_once() {
    let forest = diamond().tree();
    let sizes: Vec<usize> = forest.iter().map(DependencyNode::size).collect();
    assert_eq!(sizes, [5]);

    let b = &forest[0].children[0];
    let c = &forest[0].children[1];
    assert!(!b.children[0].deduplicated);
    assert!(c.children[0].deduplicated);

    insta::assert_snapshot!(render_tree(&diamond()), @r"
    pom.xml (JAVA)
    |-- com.acme:a:1.0
    |  |-- com.acme:b:1.0
    |  |  |-- com.acme:d:1.0
    |  |-- com.acme:c:1.0
    |  |  |-- com.acme:d:1.0 (d)
    ");
}

#[test]
fn shallowest_occurrence_is_expanded() {
    // e is reached at depth 3 through a, but directly as a root too
    let op = OperationResult::new("pom.xml", LibType::Java, Organ::Maven)
        .with_direct("a", jar("a"))
        .with_direct("e", jar("e"))
        .with_library("b", jar("b"))
        .with_library("f", jar("f"))
        .with_edge("a", "b")
        .with_edge("b", "e")
        .with_edge("e", "f");

    insta::assert_snapshot!(render_tree(&op), @r"
    pom.xml (JAVA)
    |-- com.acme:a:1.0
    |  |-- com.acme:b:1.0
    |  |  |-- com.acme:e:1.0 (d)
    |
    |-- com.acme:e:1.0
    |  |-- com.acme:f:1.0
    ");
}

#[test]
fn dangling_ids_are_dropped() {
    let mut op = OperationResult::new("go.mod", LibType::Golang, Organ::FileSystem)
        .with_direct("x", Library::new(LibType::Golang, "github.com/x/x", "v1.0.0"))
        .with_edge("x", "missing");
    op.direct.push("also-missing".into());

    let forest = op.tree();
    assert_eq!(forest.len(), 1);
    assert!(forest[0].children.is_empty());
}

#[test]
fn dependency_tree_serializes_nested() {
    let mut result = EnhancedResult::new(diamond());
    result.deps.insert(
        "d".into(),
        DependencyInfo {
            artifact_id: "d".to_string(),
            sha1: "0123456789abcdef0123456789abcdef01234567".to_string(),
            ..DependencyInfo::default()
        },
    );

    let tree = result.dependency_tree();
    let json = serde_json::to_value(&tree).unwrap();
    assert_eq!(json[0]["artifactId"], "a");
    assert_eq!(json[0]["children"][0]["children"][0]["deduped"], false);
    assert_eq!(json[0]["children"][1]["children"][0]["deduped"], true);
    insta::assert_json_snapshot!(json[0]["children"][0]["children"][0], @r#"
    {
      "artifactId": "d",
      "deduped": false,
      "groupId": "",
      "sha1": "0123456789abcdef0123456789abcdef01234567",
      "type": "",
      "version": ""
    }
    "#);
}

// ============================================================================
// Vulnerability taint
// ============================================================================

#[test]
fn taint_reaches_every_ancestor() {
    let mut result = EnhancedResult::new(diamond());
    mark_vulnerable(&mut result, "d");

    let forest = result.forest();
    let a = &forest[0];
    assert!(a.vulnerable);
    assert!(a.children.iter().all(|child| child.vulnerable));

    insta::assert_snapshot!(render_vulnerable(&result), @r"
    |-- com.acme:a:1.0
    |  |-- com.acme:b:1.0
    |  |  |-- com.acme:d:1.0 Vulnerable
    |  |-- com.acme:c:1.0
    |  |  |-- com.acme:d:1.0 (d) Vulnerable
    ");
}

#[test]
fn clean_branches_are_not_rendered() {
    let op = OperationResult::new("pom.xml", LibType::Java, Organ::Maven)
        .with_direct("a", jar("a"))
        .with_direct("z", jar("z"))
        .with_library("b", jar("b"))
        .with_library("c", jar("c"))
        .with_edge("a", "b")
        .with_edge("a", "c");
    let mut result = EnhancedResult::new(op);
    mark_vulnerable(&mut result, "c");

    insta::assert_snapshot!(render_vulnerable(&result), @r"
    |-- com.acme:a:1.0
    |  |-- com.acme:c:1.0 Vulnerable
    ");
}

#[test]
fn vulnerable_parent_with_vulnerable_child_is_expanded() {
    let op = OperationResult::new("pom.xml", LibType::Java, Organ::Maven)
        .with_direct("a", jar("a"))
        .with_library("b", jar("b"))
        .with_edge("a", "b");
    let mut result = EnhancedResult::new(op);
    mark_vulnerable(&mut result, "a");
    mark_vulnerable(&mut result, "b");

    insta::assert_snapshot!(render_vulnerable(&result), @r"
    |-- com.acme:a:1.0
    |  |-- com.acme:b:1.0 Vulnerable
    ");
}

#[test]
fn long_chain_fits_a_default_thread_stack() {
    const DEPTH: usize = 100_000;

    let handle = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(|| {
            let mut op = OperationResult::new("pom.xml", LibType::Java, Organ::Maven)
                .with_direct("0", jar("0"));
            for i in 1..DEPTH {
                op = op
                    .with_library(i.to_string(), jar(&i.to_string()))
                    .with_edge((i - 1).to_string(), i.to_string());
            }
            let mut result = EnhancedResult::new(op);
            mark_vulnerable(&mut result, &(DEPTH - 1).to_string());

            let forest = result.forest();
            (forest[0].size(), forest[0].vulnerable)
        })
        .unwrap();

    assert_eq!(handle.join().unwrap(), (DEPTH, true));
}
