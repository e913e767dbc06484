//! Scaffolding and performance-measure stages against a temporary batch

use pretty_assertions::assert_eq;
use sierra_changeset::{Element, ElementPath, ElementTree, TemplateEditor};
use sierra_core::table::{stddev_path, CollatedTable, SummaryGrid};
use sierra_core::{stage1, stage4, BatchPaths, SierraConfig, SierraError};
use sierra_test_utils::{build_criterion, exp_names, flat_rows, ramp_rows, write_collated};

fn setup() -> (tempfile::TempDir, BatchPaths, SierraConfig) {
    let dir = tempfile::tempdir().unwrap();
    let paths = BatchPaths::new(dir.path());
    let cfg = SierraConfig::default().with_scenario("SS.16x8");
    (dir, paths, cfg)
}

fn pm_file(paths: &BatchPaths, cfg: &SierraConfig, stem: &str) -> std::path::PathBuf {
    paths.measures_root(&cfg.perf).join(format!("{stem}.csv"))
}

#[test]
fn scaffold_persists_every_change_set() {
    let (_dir, paths, cfg) = setup();
    let criterion = build_criterion(&["swarm_size.Log8"], &paths.input_root());

    let dirs = stage1::scaffold_batch(&criterion, &cfg).unwrap();
    assert_eq!(dirs.len(), 4);
    assert!(dirs.iter().all(|d| d.is_dir()));

    let sets = criterion.generate_change_sets();
    for (dir, set) in dirs.iter().zip(&sets) {
        assert_eq!(&stage1::load_exp_def(dir).unwrap(), set);
    }

    // scaffolding twice is harmless
    let again = stage1::scaffold_batch(&criterion, &cfg).unwrap();
    assert_eq!(again, dirs);
}

#[test]
fn bivariate_definitions_union_to_cells() {
    let (_dir, paths, cfg) = setup();
    let criterion = build_criterion(&["swarm_size.Log4", "ta_policy_set.All"], &paths.input_root());

    let dirs = stage1::scaffold_batch(&criterion, &cfg).unwrap();
    assert_eq!(dirs.len(), criterion.len());
    assert!(dirs[0].ends_with("c1-exp0+c2-exp0"));

    let sets = criterion.generate_change_sets();
    assert_eq!(stage1::load_exp_def(&dirs[7]).unwrap(), sets[7]);
}

fn template() -> ElementTree {
    ElementTree::new(
        Element::new("argos-configuration")
            .with_child(
                Element::new("arena").with_child(
                    Element::new("distribute")
                        .with_child(Element::new("entity").with_attr("quantity", "0")),
                ),
            )
            .with_child(Element::new("task_alloc").with_attr("policy", "none")),
    )
}

#[test]
fn scaffolded_definition_applies_to_template() {
    let (_dir, paths, cfg) = setup();
    let criterion = build_criterion(&["swarm_size.Log4", "ta_policy_set.All"], &paths.input_root());
    let dirs = stage1::scaffold_batch(&criterion, &cfg).unwrap();

    // row 1 (two robots), column 2
    let mut tree = template();
    assert_eq!(stage1::apply_exp_def(&dirs[7], &mut tree).unwrap(), 2);
    let entity = ElementPath::descendant(&["arena", "distribute", "entity"]);
    let task_alloc = ElementPath::descendant(&["task_alloc"]);
    assert_eq!(tree.attr_get(&entity, "quantity").as_deref(), Some("2"));
    assert_eq!(tree.attr_get(&task_alloc, "policy").as_deref(), Some("strict_greedy"));
}

#[test]
fn definition_for_missing_element_fails_to_apply() {
    let (_dir, paths, cfg) = setup();
    let criterion = build_criterion(&["oracle.tasks"], &paths.input_root());
    let dirs = stage1::scaffold_batch(&criterion, &cfg).unwrap();

    assert!(matches!(
        stage1::apply_exp_def(&dirs[0], &mut template()),
        Err(SierraError::Edit(_))
    ));
}

#[test]
fn named_dirs_never_share_a_definition() {
    let (_dir, paths, cfg) = setup();
    let cfg = cfg.with_named_exp_dirs(true);
    let criterion = build_criterion(&["block_motion_dynamics.C3.F1p0.RW0p1"], &paths.input_root());

    let dirs = stage1::scaffold_batch(&criterion, &cfg).unwrap();
    let unique: std::collections::BTreeSet<_> = dirs.iter().collect();
    assert_eq!(unique.len(), 3);
    for (dir, set) in dirs.iter().zip(criterion.generate_change_sets()) {
        assert_eq!(stage1::load_exp_def(dir).unwrap(), set);
    }
}

#[test]
fn missing_definition_is_reported() {
    let (dir, _, _) = setup();
    assert!(matches!(
        stage1::load_exp_def(dir.path()),
        Err(SierraError::MissingInput { .. })
    ));
}

#[test]
fn linear_scaling_measures() {
    let (_dir, paths, cfg) = setup();
    let criterion = build_criterion(&["swarm_size.Log8"], &paths.input_root());
    let names = exp_names(4);
    let collated = paths.collated_root();

    write_collated(
        &collated.join(&cfg.perf.blocks_collected_csv),
        &names,
        &ramp_rows(&[10.0, 20.0, 40.0, 80.0], 5),
    );
    write_collated(&collated.join(&cfg.perf.interference_csv), &names, &flat_rows(0.0, 4, 5));

    let report = stage4::run_measures(&criterion, &cfg, &paths).unwrap();
    assert!(report.skipped.is_empty(), "{:?}", report.skipped);
    assert_eq!(report.written.len(), 6);

    let blocks = CollatedTable::read(&pm_file(&paths, &cfg, "pm-blocks-collected")).unwrap();
    assert_eq!(blocks.final_values(&names).unwrap(), vec![10.0, 20.0, 40.0, 80.0]);

    let kf = CollatedTable::read(&pm_file(&paths, &cfg, "pm-karp-flatt")).unwrap();
    assert_eq!(kf.columns(), &names[1..]);
    assert!(kf.final_values(&names[1..]).unwrap().iter().all(|y| y.abs() < 1e-9));

    let pp = CollatedTable::read(&pm_file(&paths, &cfg, "pm-projective-positive")).unwrap();
    assert!(pp.final_values(&names[1..]).unwrap().iter().all(|v| (v - 1.0).abs() < 1e-9));

    let so = CollatedTable::read(&pm_file(&paths, &cfg, "pm-self-org")).unwrap();
    assert_eq!(so.final_values(&names).unwrap(), vec![0.0; 4]);
}

#[test]
fn missing_interference_skips_dependent_measures() {
    let (_dir, paths, cfg) = setup();
    let criterion = build_criterion(&["swarm_size.Log8"], &paths.input_root());
    let names = exp_names(4);
    let blocks = paths.collated_root().join(&cfg.perf.blocks_collected_csv);
    write_collated(&blocks, &names, &ramp_rows(&[1.0, 2.0, 3.0, 4.0], 3));
    write_collated(&stddev_path(&blocks), &names, &flat_rows(0.5, 4, 3));

    let report = stage4::run_measures(&criterion, &cfg, &paths).unwrap();

    let skipped: Vec<&str> = report.skipped.iter().map(|(s, _)| s.as_str()).collect();
    assert_eq!(skipped, vec!["pm-fractional-losses", "pm-self-org"]);
    assert!(report
        .written
        .contains(&stddev_path(&pm_file(&paths, &cfg, "pm-blocks-collected"))));
    assert!(report.written.contains(&pm_file(&paths, &cfg, "pm-karp-flatt")));
}

#[test]
fn constant_density_with_repeated_sizes_writes_every_measure() {
    let (_dir, paths, cfg) = setup();
    // arenas of 128, 136 and 162 square units hold one robot each
    let criterion = build_criterion(&["swarm_density.CD0p1.I1.C3"], &paths.input_root());
    assert_eq!(criterion.swarm_sizes(), vec![Some(1); 3]);
    let names = exp_names(3);
    let collated = paths.collated_root();

    write_collated(
        &collated.join(&cfg.perf.blocks_collected_csv),
        &names,
        &ramp_rows(&[10.0, 10.0, 10.0], 4),
    );
    write_collated(&collated.join(&cfg.perf.interference_csv), &names, &flat_rows(0.0, 3, 4));

    let report = stage4::run_measures(&criterion, &cfg, &paths).unwrap();
    assert!(report.skipped.is_empty(), "{:?}", report.skipped);
    assert_eq!(report.written.len(), 6);

    let kf = CollatedTable::read(&pm_file(&paths, &cfg, "pm-karp-flatt")).unwrap();
    assert_eq!(kf.columns(), &names[1..]);
    assert!(kf.final_values(&names[1..]).unwrap().iter().all(|v| v.is_nan()));

    let so = CollatedTable::read(&pm_file(&paths, &cfg, "pm-self-org")).unwrap();
    assert_eq!(so.final_values(&names).unwrap(), vec![0.0; 3]);
}

#[test]
fn unchanged_environment_scores_zero() {
    let (_dir, paths, cfg) = setup();
    let criterion = build_criterion(&["temporal_variance.BCSine"], &paths.input_root());
    let names = criterion.gen_exp_dirnames(&cfg.criteria());
    let n = names.len();
    let collated = paths.collated_root();

    write_collated(&collated.join(&cfg.perf.intra_perf_csv), &names, &flat_rows(3.0, n, 20));
    write_collated(&collated.join(&cfg.perf.variance_csv), &names, &flat_rows(0.2, n, 20));

    let report = stage4::run_measures(&criterion, &cfg, &paths).unwrap();

    // no blocks table: only blocks-collected is skipped
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].0, "pm-blocks-collected");

    for stem in ["pm-reactivity", "pm-adaptability"] {
        let table = CollatedTable::read(&pm_file(&paths, &cfg, stem)).unwrap();
        assert_eq!(table.final_values(&names).unwrap(), vec![0.0; n]);
    }
}

#[test]
fn bivariate_measures_form_grids() {
    let (_dir, paths, cfg) = setup();
    let criterion = build_criterion(&["swarm_size.Log4", "oracle.entities"], &paths.input_root());
    let names = criterion.gen_exp_dirnames(&cfg.criteria());
    assert_eq!(names.len(), 12);

    // blocks collected proportional to swarm size in every column
    let finals: Vec<f64> = criterion
        .swarm_sizes()
        .iter()
        .map(|s| s.unwrap() as f64 * 10.0)
        .collect();
    write_collated(
        &paths.collated_root().join(&cfg.perf.blocks_collected_csv),
        &names,
        &ramp_rows(&finals, 4),
    );

    stage4::run_measures(&criterion, &cfg, &paths).unwrap();

    let blocks = SummaryGrid::read(&pm_file(&paths, &cfg, "pm-blocks-collected")).unwrap();
    assert_eq!(blocks.row_names, vec!["c1-exp0", "c1-exp1", "c1-exp2"]);
    assert_eq!(blocks.col_names.len(), 4);
    assert_eq!(blocks.values[2], vec![40.0; 4]);

    let pp = SummaryGrid::read(&pm_file(&paths, &cfg, "pm-projective-positive")).unwrap();
    assert_eq!(pp.row_names, vec!["c1-exp1", "c1-exp2"]);
    assert!(pp.values.iter().flatten().all(|v| (v - 1.0).abs() < 1e-9));
}

#[test]
fn corrupt_table_aborts_stage() {
    let (_dir, paths, cfg) = setup();
    let criterion = build_criterion(&["swarm_size.Log8"], &paths.input_root());
    let blocks = paths.collated_root().join(&cfg.perf.blocks_collected_csv);
    std::fs::create_dir_all(blocks.parent().unwrap()).unwrap();
    std::fs::write(&blocks, "exp0;exp1;exp2;exp3\n1;2;x;4\n").unwrap();

    assert!(matches!(
        stage4::run_measures(&criterion, &cfg, &paths),
        Err(SierraError::MalformedTable { .. })
    ));
}
