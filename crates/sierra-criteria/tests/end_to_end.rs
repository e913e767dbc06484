use pretty_assertions::assert_eq;
use sierra_changeset::ElementPath;
use sierra_criteria::{factory, pm, Axis, CriteriaConfig, CriteriaError, ParseError};
use std::path::Path;

fn quantity(changes: &sierra_changeset::ChangeSet) -> Option<&str> {
    changes.value_of(
        &ElementPath::descendant(&["arena", "distribute", "entity"]),
        "quantity",
    )
}

#[test]
fn swarm_size_log8() {
    let cfg = CriteriaConfig::default();
    let c = factory::build(&["swarm_size.Log8"], &cfg, Path::new("/tmp/batch")).unwrap();

    let sets = c.generate_change_sets();
    let counts: Vec<&str> = sets.iter().filter_map(quantity).collect();
    assert_eq!(counts, vec!["1", "2", "4", "8"]);
    assert_eq!(c.gen_exp_dirnames(&cfg), vec!["exp0", "exp1", "exp2", "exp3"]);
    assert_eq!(c.graph_xticks(&cfg, None).unwrap(), vec![1.0, 2.0, 4.0, 8.0]);
}

#[test]
fn swarm_size_by_cube_quantity() {
    let cfg = CriteriaConfig::default();
    let c = factory::build(
        &["swarm_size.Log4", "block_quantity.CLog64"],
        &cfg,
        Path::new("/tmp/batch"),
    )
    .unwrap();
    let b = c.as_bivar().unwrap();

    assert_eq!(b.shape(), (3, 7));
    assert_eq!(c.generate_change_sets().len(), 3 * 7);
    assert_eq!(b.gen_exp_dirnames(&cfg, Axis::X).len(), 3);
    assert_eq!(b.gen_exp_dirnames(&cfg, Axis::Y).len(), 7);
    assert_eq!(b.swarm_size_axis(), Some(Axis::X));
    assert!(c.pm_query(pm::SELF_ORG));
}

#[test]
fn named_bivariate_directories() {
    let cfg = CriteriaConfig::default().with_named_exp_dirs(true);
    let c = factory::build(
        &["ta_policy_set.All", "swarm_size.Log2"],
        &cfg,
        Path::new("/tmp/batch"),
    )
    .unwrap();

    assert_eq!(
        c.gen_exp_dirnames(&cfg)[..2].to_vec(),
        vec!["c1-random+c2-1", "c1-random+c2-2"]
    );
}

#[test]
fn constant_density_needs_scenario() {
    let result = factory::build(
        &["swarm_density.CD1p0.I16"],
        &CriteriaConfig::default(),
        Path::new("/tmp/batch"),
    );
    assert!(matches!(result, Err(CriteriaError::Precondition(_))));
}

#[test]
fn malformed_token_names_fragment() {
    let result = factory::build(
        &["block_quantity.CLug64"],
        &CriteriaConfig::default(),
        Path::new("/tmp/batch"),
    );
    match result {
        Err(CriteriaError::Parse(ParseError::Grammar { fragment, .. })) => {
            assert_eq!(fragment, "Lug64");
        }
        other => panic!("expected grammar error, got {other:?}"),
    }
}
