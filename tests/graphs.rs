use graphtune::graphs::{GraphError, GraphRegistry, GraphSpec};
use graphtune::rounds::RoundStore;
use graphtune::synthesis::{OperatorCatalog, OperatorSpec};
use tempfile::TempDir;

const SOLVE_GRAPH: &str = r#"{
    "name": "solve",
    "operators": [
        {"operator": "Custom", "inputs": ["problem"], "output": "draft"},
        {"operator": "ScEnsemble", "inputs": ["draft"], "output": "answer"}
    ]
}"#;

fn catalog() -> OperatorCatalog {
    OperatorCatalog::from_entries([
        (
            "Custom".to_string(),
            OperatorSpec {
                description: "run a bespoke prompt".to_string(),
                interface: "custom(input: str, instruction: str) -> str".to_string(),
            },
        ),
        (
            "ScEnsemble".to_string(),
            OperatorSpec {
                description: "self-consistency vote".to_string(),
                interface: "sc_ensemble(solutions: list[str]) -> str".to_string(),
            },
        ),
    ])
}

#[test]
fn test_parse_and_validate_wiring() {
    let spec = GraphSpec::parse(SOLVE_GRAPH).unwrap();
    assert_eq!(spec.name, "solve");
    assert_eq!(spec.operators.len(), 2);
    assert_eq!(spec.final_output(), Some("answer"));
    spec.validate(&catalog()).unwrap();
}

#[test]
fn test_validate_rejects_unknown_operator() {
    let spec = GraphSpec::parse(
        r#"{"name": "g", "operators": [
            {"operator": "Review", "inputs": ["problem"], "output": "out"}
        ]}"#,
    )
    .unwrap();
    let err = spec.validate(&catalog()).unwrap_err();
    assert!(matches!(
        err,
        GraphError::UnknownOperator { step: 0, operator } if operator == "Review"
    ));
}

#[test]
fn test_validate_rejects_unbound_input_and_duplicate_output() {
    let unbound = GraphSpec::parse(
        r#"{"name": "g", "operators": [
            {"operator": "Custom", "inputs": ["missing"], "output": "out"}
        ]}"#,
    )
    .unwrap();
    assert!(matches!(
        unbound.validate(&catalog()).unwrap_err(),
        GraphError::UnboundInput { step: 0, input } if input == "missing"
    ));

    let duplicate = GraphSpec::parse(
        r#"{"name": "g", "operators": [
            {"operator": "Custom", "inputs": ["problem"], "output": "x"},
            {"operator": "Custom", "inputs": ["x"], "output": "x"}
        ]}"#,
    )
    .unwrap();
    assert!(matches!(
        duplicate.validate(&catalog()).unwrap_err(),
        GraphError::DuplicateOutput { step: 1, output } if output == "x"
    ));
}

#[test]
fn test_empty_graph_is_invalid() {
    let spec = GraphSpec::parse(r#"{"name": "hollow", "operators": []}"#).unwrap();
    assert!(matches!(
        spec.validate(&catalog()).unwrap_err(),
        GraphError::Empty { name } if name == "hollow"
    ));
}

#[test]
fn test_registry_loads_rounds_through_an_explicit_step() {
    let dir = TempDir::new().unwrap();
    let store = RoundStore::new(dir.path()).with_graph_file("graph.json");
    store.create_round_directory(0).unwrap();
    store.write_round(0, SOLVE_GRAPH, "SOLVE_PROMPT = ...").unwrap();

    let mut registry = GraphRegistry::new();
    assert!(!registry.contains(0));

    let spec = registry.load_round(&store, &catalog(), 0).unwrap();
    assert_eq!(spec.name, "solve");
    assert!(registry.contains(0));
    assert_eq!(registry.rounds().collect::<Vec<_>>(), [0]);
    assert_eq!(registry.get(0).unwrap().final_output(), Some("answer"));

    // Unwritten rounds stay a hard error, not a silent miss.
    assert!(registry.load_round(&store, &catalog(), 7).is_err());
}
