// tests/engine_scenarios.rs
use approx::assert_abs_diff_eq;
use glam::DVec2;
use lindenmayer::{
    Action, BoundingBox, Engine, Grammar, RecordingTurtle, SilentTurtle, Turtle, TurtleSetup,
};

const EPS: f64 = 1e-9;

/// Bracketed plant alphabet: F draws, + and - turn, [ and ] save and restore.
fn setup(seed: u64) -> Grammar {
    let mut grammar = Grammar::with_seed(seed);
    grammar.bind_action('F', "draw").unwrap();
    grammar.bind_action('+', "turnL").unwrap();
    grammar.bind_action('-', "turnR").unwrap();
    grammar.bind_action('[', "push").unwrap();
    grammar.bind_action(']', "pop").unwrap();
    grammar
}

fn turtle(step: f64, angle: f64) -> SilentTurtle {
    TurtleSetup {
        step,
        angle,
        ..Default::default()
    }
    .silent()
}

fn assert_box(b: &BoundingBox, min: (f64, f64), max: (f64, f64)) {
    assert_abs_diff_eq!(b.min.x, min.0, epsilon = EPS);
    assert_abs_diff_eq!(b.min.y, min.1, epsilon = EPS);
    assert_abs_diff_eq!(b.max.x, max.0, epsilon = EPS);
    assert_abs_diff_eq!(b.max.y, max.1, epsilon = EPS);
}

#[test]
fn doubling_rule_doubles_the_height_each_round() {
    let mut grammar = setup(0);
    grammar.add_rule('F', "FF");
    grammar.set_axiom("F");
    let engine = Engine::new(&grammar);

    for (rounds, expected) in [(0, 1.0), (1, 2.0), (2, 4.0)] {
        let mut t = turtle(1.0, 90.0);
        let bounds = engine.run_axiom(&mut t, rounds);

        assert_abs_diff_eq!(t.position().x, 0.0, epsilon = EPS);
        assert_abs_diff_eq!(t.position().y, expected, epsilon = EPS);
        assert_abs_diff_eq!(bounds.height(), expected, epsilon = EPS);
        assert_abs_diff_eq!(bounds.min.y, 0.0, epsilon = EPS);
    }
}

#[test]
fn branch_returns_to_the_saved_point() {
    // F[+F]F: up one, branch left, come back, up one more.
    let mut grammar = setup(0);
    grammar.set_axiom("F[+F]F");
    let mut t = turtle(1.0, 90.0);

    let bounds = Engine::new(&grammar).run_axiom(&mut t, 0);

    assert_abs_diff_eq!(t.position().x, 0.0, epsilon = EPS);
    assert_abs_diff_eq!(t.position().y, 2.0, epsilon = EPS);
    assert_abs_diff_eq!(t.heading(), 90.0);
    assert_box(&bounds, (-1.0, 0.0), (0.0, 2.0));
}

#[test]
fn one_round_of_f_plus_f() {
    let mut grammar = setup(0);
    grammar.add_rule('F', "F+F");
    grammar.set_axiom("F");
    let mut t = turtle(2.0, 90.0);

    let bounds = Engine::new(&grammar).run_axiom(&mut t, 1);

    assert_abs_diff_eq!(t.position().x, -2.0, epsilon = EPS);
    assert_abs_diff_eq!(t.position().y, 2.0, epsilon = EPS);
    assert_abs_diff_eq!(bounds.width(), 2.0, epsilon = EPS);
    assert_abs_diff_eq!(bounds.height(), 2.0, epsilon = EPS);
}

#[test]
fn terminal_axiom_ignores_round_count() {
    let grammar = {
        let mut g = setup(0);
        g.set_axiom("F+F-F[-F]F");
        g
    };
    let engine = Engine::new(&grammar);

    let mut reference = turtle(1.0, 60.0);
    let expected = engine.run_axiom(&mut reference, 0);

    for rounds in 1..6 {
        let mut t = turtle(1.0, 60.0);
        let bounds = engine.run_axiom(&mut t, rounds);
        assert_eq!(bounds, expected, "rounds = {rounds}");
        assert_eq!(t.position(), reference.position());
        assert_eq!(t.heading(), reference.heading());
    }
}

#[test]
fn empty_axiom_yields_a_point_box_at_the_start() {
    let mut grammar = setup(0);
    grammar.set_axiom("");
    let mut t = SilentTurtle::new(DVec2::new(3.0, -2.0), 0.0);

    for rounds in [0, 3] {
        let bounds = Engine::new(&grammar).run_axiom(&mut t, rounds);
        assert_eq!(bounds, BoundingBox::at(DVec2::new(3.0, -2.0)));
        assert!(bounds.is_degenerate());
    }
}

#[test]
fn empty_expansion_collapses_to_the_current_position() {
    let mut grammar = setup(0);
    grammar.add_rule('X', "");
    grammar.set_axiom("X");
    let mut t = SilentTurtle::new(DVec2::new(1.0, 1.0), 90.0);

    let bounds = Engine::new(&grammar).run_axiom(&mut t, 2);
    assert_eq!(bounds, BoundingBox::at(DVec2::new(1.0, 1.0)));
}

#[test]
fn structural_symbols_only_matter_through_their_rules() {
    // X has a rule but no action: invisible at round 0, a branch generator afterwards.
    let mut grammar = setup(0);
    grammar.add_rule('X', "F[+X]FX");
    grammar.set_axiom("X");
    let engine = Engine::new(&grammar);

    let mut t0 = turtle(1.0, 90.0);
    let b0 = engine.run_axiom(&mut t0, 0);
    assert_eq!(b0, BoundingBox::at(DVec2::ZERO));

    let mut t1 = turtle(1.0, 90.0);
    engine.run_axiom(&mut t1, 1);
    assert_abs_diff_eq!(t1.position().y, 2.0, epsilon = EPS);
}

#[test]
fn terminals_execute_inside_deep_rounds() {
    // '+' never rewrites, so it must turn the turtle even when reached with rounds left.
    let mut grammar = setup(0);
    grammar.add_rule('A', "F+A");
    grammar.set_axiom("A");
    let mut t = turtle(1.0, 90.0);

    Engine::new(&grammar).run_axiom(&mut t, 4);

    // Four F+ pairs: a closed unit square.
    assert_abs_diff_eq!(t.position().x, 0.0, epsilon = EPS);
    assert_abs_diff_eq!(t.position().y, 0.0, epsilon = EPS);
    assert_abs_diff_eq!(t.heading(), 450.0);
}

#[test]
fn inert_symbols_are_skipped() {
    let mut grammar = setup(0);
    grammar.set_axiom("F Q F");
    let mut t = turtle(1.0, 90.0);

    let bounds = Engine::new(&grammar).run_axiom(&mut t, 2);
    assert_abs_diff_eq!(bounds.height(), 2.0, epsilon = EPS);
}

#[test]
fn unmatched_pop_does_not_abort_the_run() {
    let mut grammar = setup(0);
    grammar.set_axiom("]]F]F");
    let mut t = turtle(1.0, 90.0);

    let bounds = Engine::new(&grammar).run_axiom(&mut t, 0);
    assert_abs_diff_eq!(t.position().y, 2.0, epsilon = EPS);
    assert_abs_diff_eq!(bounds.height(), 2.0, epsilon = EPS);
}

#[test]
fn larger_round_counts_contain_smaller_ones() {
    let mut grammar = setup(0);
    grammar.add_rule('F', "F[+F]F[-F]F");
    grammar.set_axiom("F");
    let engine = Engine::new(&grammar);

    let mut previous: Option<BoundingBox> = None;
    for rounds in 0..5 {
        let mut t = turtle(1.0, 25.0);
        let bounds = engine.run_axiom(&mut t, rounds);
        if let Some(prev) = previous {
            assert!(bounds.contains(&prev), "round {rounds} lost area");
        }
        previous = Some(bounds);
    }
}

#[test]
fn reset_random_source_replays_the_same_drawing() {
    let mut grammar = setup(42);
    grammar.add_rule('F', "F[+F]F");
    grammar.add_rule('F', "F[-F]F");
    grammar.add_rule('F', "FF");
    grammar.set_axiom("F");
    let engine = Engine::new(&grammar);
    let setup = TurtleSetup {
        angle: 25.7,
        ..Default::default()
    };

    let mut runs = Vec::new();
    for _ in 0..2 {
        grammar.reset_rng();
        let mut t = RecordingTurtle::new();
        setup.apply(&mut t);
        let bounds = engine.run_axiom(&mut t, 4);
        runs.push((bounds, t.into_drawing()));
    }

    assert_eq!(runs[0].0, runs[1].0);
    assert_eq!(runs[0].1.trace, runs[1].1.trace);
    assert_eq!(runs[0].1.segments, runs[1].1.segments);

    // The engine's box covers every recorded position.
    let trace_box = runs[0].1.trace_bounds().unwrap();
    assert_eq!(trace_box, runs[0].0);
}

#[test]
fn dry_run_and_real_run_agree() {
    let mut grammar = setup(7);
    grammar.add_rule('F', "F[+F]");
    grammar.add_rule('F', "F[-F]F");
    grammar.set_axiom("F");
    let engine = Engine::new(&grammar);
    let setup = TurtleSetup::default();

    grammar.reset_rng();
    let mut dry = setup.silent();
    let dry_box = engine.run_axiom(&mut dry, 5);

    grammar.reset_rng();
    let mut real = RecordingTurtle::new();
    setup.apply(&mut real);
    let real_box = engine.run_axiom(&mut real, 5);

    assert_eq!(dry_box, real_box);
    assert_eq!(dry.position(), real.position());
}

#[test]
fn engine_accepts_trait_objects() {
    let mut grammar = setup(0);
    grammar.set_axiom("FF");
    let mut silent = turtle(1.0, 90.0);
    let t: &mut dyn Turtle = &mut silent;

    let bounds = Engine::new(&grammar).run_axiom(t, 0);
    assert_abs_diff_eq!(bounds.height(), 2.0, epsilon = EPS);
}

#[test]
fn typed_bindings_match_named_ones() {
    let mut grammar = Grammar::with_seed(0);
    let f = grammar.bind('F', Action::Move).unwrap();
    assert_eq!(grammar.action(f), Some(Action::Move));
    assert!(grammar.bind('F', Action::Draw).is_err());

    grammar.set_axiom("FFF");
    let mut t = RecordingTurtle::new();
    TurtleSetup::default().apply(&mut t);
    Engine::new(&grammar).run_axiom(&mut t, 0);

    // Moves leave no segments but do extend the trace.
    assert!(t.drawing().segments.is_empty());
    assert_eq!(t.drawing().trace.len(), 4);
}
