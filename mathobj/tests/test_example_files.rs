use std::{fs, io::BufReader, path::Path};

use mathobj::{
    ast::{NodeKind, NumberDomain},
    definitions::Definition,
    parser::{parse_entries, Entry},
    Config, ProofState, Session,
};

fn open(path: &Path) -> BufReader<fs::File> {
    let file = fs::File::open(path)
        .unwrap_or_else(|e| panic!("could not open \"{}\": {}", path.display(), e));
    BufReader::new(file)
}

fn build(session: &mut Session, dir_name: &str) -> ProofState {
    let dir = Path::new("test-examples").join(dir_name);
    let hypotheses = open(&dir.join("hypotheses"));
    let targets = open(&dir.join("targets"));
    ProofState::from_streams(session, hypotheses, targets)
        .unwrap_or_else(|e| panic!("\ntest directory \"{}\"\nreturned error: {}\n", dir_name, e))
}

fn load_definitions(session: &mut Session, dir_name: &str) {
    let path = Path::new("test-examples").join(dir_name).join("definitions");
    let entries = parse_entries(session, open(&path)).expect("error reading definitions");
    let definitions: Vec<Definition> = entries
        .into_iter()
        .filter_map(|e| match e {
            Entry::Definition(d) => Some(d),
            _ => None,
        })
        .collect();
    session.load_definitions(definitions);
}

fn test_examples_from_dir(dir_name: &str) {
    let mut session = Session::default();
    let state = build(&mut session, dir_name);
    state.name_bound_vars(&mut session);
    for &target in &state.targets {
        for var in session.bound_vars(target, None) {
            assert!(
                !session[var].is_unnamed(),
                "\ntest directory \"{}\"\nleft a bound variable unnamed in {}\n",
                dir_name,
                session.display(target),
            );
        }
    }
}

macro_rules! generate_tests {
    ( $( $test_name:ident : $dir_name:literal ,)* ) => {
        $(
            #[test]
            fn $test_name() {
                test_examples_from_dir($dir_name)
            }
        )*
    };
}

generate_tests! {
    inverse_image: "inverse_image",
    intersection: "intersection",
    sequences: "sequences",
}

#[test]
fn test_inverse_image_scenario() {
    let mut session = Session::default();
    let state = build(&mut session, "inverse_image");

    assert_eq!(state.context.len(), 4);
    assert_eq!(state.objects().count(), 4);
    let names: Vec<_> = state.context.iter().filter_map(|e| e.name(&session)).collect();
    assert_eq!(names, ["X", "f", "B", "B'"]);

    let [target] = state.targets[..] else {
        panic!("expected a single target");
    };
    assert_eq!(session[target].kind, NodeKind::ForAll);
    let body = session.body(target).unwrap();
    assert_eq!(session[body].kind, NodeKind::Implies);
    assert!(session.is_for_all(target, true, false));
    assert!(!session.is_exists(target, true, false));
    assert_eq!(session.main_symbol(target, true), Some("forall"));

    // The bound variable only sees the variables bound before it
    let x = session.bound_var(target).unwrap();
    assert!(session[x].local_context().is_empty());
    assert_eq!(session[x].math_type, session.variable("0._fresh.680.5802").unwrap());
}

#[test]
fn test_identifiers_across_parses() {
    let mut session = Session::default();
    let first = build(&mut session, "inverse_image");
    let second = build(&mut session, "inverse_image");
    assert_eq!(first.context, second.context);

    // Interior nodes are rebuilt, but compare equal
    assert_ne!(first.targets, second.targets);
    assert!(session.equals(first.targets[0], second.targets[0]).unwrap());

    let diff = second.compare(&first, &session, false).unwrap();
    assert!(diff.new_context.iter().chain(&diff.new_targets).all(|t| t.to_string() == "="));
}

#[test]
fn test_unfold_is_idempotent() {
    let config = Config::new().allow_implicit_use_of_definitions(true);
    let mut session = Session::new(config);
    load_definitions(&mut session, "intersection");
    assert_eq!(session.definitions().len(), 2);
    assert_eq!(session.implicit_definitions().count(), 1);

    let state = build(&mut session, "intersection");
    let target = state.targets[0];
    let body = session.body(target).unwrap();
    let premise = session.premise(body, true).unwrap();
    assert!(session.is_and(premise, true, true));
    assert_eq!(
        session.last_implicit_definition().map(|d| d.name.clone()).as_deref(),
        Some("definition.intersection_two_subsets")
    );

    let once = session.unfold_recursively(target).unwrap();
    assert!(!session.equals(once, target).unwrap());
    let body = session.body(once).unwrap();
    let premise = session.premise(body, true).unwrap();
    assert_eq!(session[premise].kind, NodeKind::And);

    let twice = session.unfold_recursively(once).unwrap();
    assert!(session.equals(once, twice).unwrap());
}

#[test]
fn test_number_domains() {
    let mut session = Session::default();
    build(&mut session, "sequences");
    assert_eq!(session.number_domains(), [NumberDomain::Naturals, NumberDomain::Reals]);
    assert_eq!(session.largest_number_domain(), Some(NumberDomain::Reals));

    let u = session.variable("0.u").unwrap();
    assert!(session.is_sequence(u, false));
    assert!(session.has_bound_var(u));
}

#[test]
fn test_stale_proof_state() {
    let mut session = Session::default();
    let state = build(&mut session, "inverse_image");
    session.clear();
    assert!(session.equals(state.targets[0], state.targets[0]).is_err());
    assert!(session.contains(state.targets[0], state.targets[0]).is_err());
    assert!(session.unfold_recursively(state.targets[0]).is_err());
}
