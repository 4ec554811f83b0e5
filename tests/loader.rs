// tests/loader.rs
use approx::assert_abs_diff_eq;
use glam::DVec2;
use lindenmayer::{Action, Engine, GrammarError, LSystem, LSystemSpec, LoadError, Turtle, render};

const F_PLUS_F: &str = r#"
{
  "actions": { "F": "draw", "+": "turnL", "-": "turnR" },
  "axiom": "F",
  "rules": { "F": ["F+F"] },
  "parameters": { "step": 2, "angle": 90, "start": [0, 0, 90] }
}"#;

#[test]
fn loads_grammar_and_turtle_parameters() {
    let system = LSystem::from_json(F_PLUS_F).unwrap();

    assert_eq!(system.setup.step, 2.0);
    assert_eq!(system.setup.angle, 90.0);
    assert_eq!(system.setup.start, DVec2::ZERO);
    assert_eq!(system.setup.heading, 90.0);

    let f = system.grammar.symbol('F').unwrap();
    assert_eq!(system.grammar.action(f), Some(Action::Draw));
    assert_eq!(system.grammar.alternatives(f).len(), 1);

    let mut turtle = system.setup.silent();
    let bounds = Engine::new(&system.grammar).run_axiom(&mut turtle, 1);
    assert_abs_diff_eq!(turtle.position().x, -2.0, epsilon = 1e-9);
    assert_abs_diff_eq!(turtle.position().y, 2.0, epsilon = 1e-9);
    assert_abs_diff_eq!(bounds.width(), 2.0, epsilon = 1e-9);
    assert_abs_diff_eq!(bounds.height(), 2.0, epsilon = 1e-9);
}

#[test]
fn parameters_are_optional() {
    let system = LSystem::from_json(
        r#"{ "actions": { "F": "draw" }, "axiom": "F", "rules": {},
             "parameters": { "angle": 30 } }"#,
    )
    .unwrap();
    assert_eq!(system.setup.angle, 30.0);
    assert_eq!(system.setup.step, 1.0);
    assert_eq!(system.setup.heading, 90.0);
}

#[test]
fn missing_mandatory_sections_are_reported() {
    let cases = [
        (r#"{ "axiom": "F", "rules": {} }"#, "actions"),
        (r#"{ "actions": {}, "rules": {} }"#, "axiom"),
        (r#"{ "actions": {}, "axiom": "F" }"#, "rules"),
    ];
    for (json, field) in cases {
        match LSystem::from_json(json) {
            Err(LoadError::MissingField(name)) => assert_eq!(name, field),
            other => panic!("expected missing `{field}`, got {other:?}"),
        }
    }
}

#[test]
fn unknown_action_fails_the_load() {
    let err = LSystem::from_json(
        r#"{ "actions": { "F": "fly" }, "axiom": "F", "rules": {} }"#,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        LoadError::Grammar(GrammarError::UnknownAction { ref name }) if name == "fly"
    ));
}

#[test]
fn repeated_action_key_is_a_duplicate_binding() {
    let err = LSystem::from_json(
        r#"{ "actions": { "F": "draw", "F": "move" }, "axiom": "F", "rules": {} }"#,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        LoadError::Grammar(GrammarError::DuplicateAction { symbol: 'F' })
    ));
}

#[test]
fn repeated_rule_key_is_rejected() {
    let err = LSystem::from_json(
        r#"{ "actions": { "F": "draw" }, "axiom": "F",
             "rules": { "F": ["FF"], "F": ["F+F"] } }"#,
    )
    .unwrap_err();
    match err {
        LoadError::DuplicateKey { section, key } => {
            assert_eq!(section, "rules");
            assert_eq!(key, "F");
        }
        other => panic!("expected a duplicate key, got {other:?}"),
    }
}

#[test]
fn sections_keep_document_order() {
    let spec = LSystemSpec::from_json(
        r#"{ "actions": { "]": "pop", "F": "draw", "[": "push" }, "axiom": "", "rules": {} }"#,
    )
    .unwrap();
    let keys: Vec<&str> = spec.actions.as_ref().unwrap().iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["]", "F", "["]);

    let text = serde_json::to_string(&spec.actions).unwrap();
    assert_eq!(text, r#"{"]":"pop","F":"draw","[":"push"}"#);
}

#[test]
fn multi_character_keys_are_rejected() {
    let err = LSystem::from_json(
        r#"{ "actions": { "FF": "draw" }, "axiom": "F", "rules": {} }"#,
    )
    .unwrap_err();
    assert!(matches!(err, LoadError::InvalidSymbolKey(ref k) if k == "FF"));

    let err = LSystem::from_json(
        r#"{ "actions": { "F": "draw" }, "axiom": "F", "rules": { "": ["F"] } }"#,
    )
    .unwrap_err();
    assert!(matches!(err, LoadError::InvalidSymbolKey(_)));
}

#[test]
fn malformed_json_is_a_json_error() {
    assert!(matches!(
        LSystem::from_json("{ not json"),
        Err(LoadError::Json(_))
    ));
}

#[test]
fn seed_makes_loads_reproducible() {
    let json = r#"
    {
      "seed": -12345,
      "actions": { "F": "draw", "+": "turnL", "-": "turnR", "[": "push", "]": "pop" },
      "axiom": "F",
      "rules": { "F": ["F[+F]F", "F[-F]F", "F[+F]F[-F]F"] },
      "parameters": { "angle": 22.5 }
    }"#;

    let a = LSystem::from_json(json).unwrap();
    let b = LSystem::from_json(json).unwrap();
    assert_eq!(a.grammar.seed(), b.grammar.seed());

    let da = render::record(&a, 4);
    let db = render::record(&b, 4);
    assert_eq!(da, db);
    assert!(!da.segments.is_empty());
}

#[test]
fn rule_arrays_keep_their_order() {
    let spec = LSystemSpec::from_json(
        r#"{ "actions": {}, "axiom": "A", "rules": { "A": ["B", "C", "B"] } }"#,
    )
    .unwrap();
    let grammar = spec.grammar().unwrap();
    let a = grammar.symbol('A').unwrap();
    let rendered: Vec<String> = grammar
        .alternatives(a)
        .iter()
        .map(|rhs| rhs.iter().map(|s| s.as_char()).collect())
        .collect();
    assert_eq!(rendered, vec!["B", "C", "B"]);
}

#[test]
fn non_finite_parameters_are_rejected() {
    let spec = LSystemSpec {
        parameters: Some(lindenmayer::Parameters {
            step: Some(f64::NAN),
            ..Default::default()
        }),
        ..Default::default()
    };
    assert!(matches!(
        spec.setup(),
        Err(LoadError::InvalidParameter { name: "step", .. })
    ));
}

#[test]
fn step_must_be_positive() {
    for step in ["0", "-1.5"] {
        let json = format!(
            r#"{{ "actions": {{}}, "axiom": "F", "rules": {{}}, "parameters": {{ "step": {step} }} }}"#
        );
        assert!(
            matches!(
                LSystem::from_json(&json),
                Err(LoadError::InvalidParameter { name: "step", .. })
            ),
            "step {step}"
        );
    }

    let system = LSystem::from_json(
        r#"{ "actions": {}, "axiom": "F", "rules": {}, "parameters": { "step": 0.25, "angle": -30 } }"#,
    )
    .unwrap();
    assert_eq!(system.setup.step, 0.25);
    assert_eq!(system.setup.angle, -30.0);
}

#[test]
fn loads_from_a_file() {
    let path = std::env::temp_dir().join(format!("lindenmayer-{}.json", std::process::id()));
    std::fs::write(&path, F_PLUS_F).unwrap();
    let system = LSystem::from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(system.grammar.axiom().len(), 1);

    assert!(matches!(
        LSystem::from_path(path.with_extension("missing")),
        Err(LoadError::Io(_))
    ));
}
