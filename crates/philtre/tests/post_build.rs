//! End-to-end runs against a temporary project tree.

use camino::{Utf8Path, Utf8PathBuf};
use philtre::config::{Overrides, ResolvedConfig};

fn write(path: &Utf8Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn project(config_yaml: &str) -> (tempfile::TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(dir.path()).unwrap().to_owned();
    write(&root.join(".config/philtre.yaml"), config_yaml);
    (dir, root)
}

#[test]
fn processes_a_template_tree() {
    let (_dir, root) = project("source: php\noutput: dist\n");
    write(
        &root.join("php/index.php"),
        "<h1>Home</h1><?php echo $greeting; ?>",
    );
    write(&root.join("php/admin/panel.php"), "<p>admin</p>");
    write(&root.join("php/readme.txt"), "not a template");

    let config =
        ResolvedConfig::load(&root.join(".config/philtre.yaml"), Overrides::default()).unwrap();
    let report = philtre::run(&config).unwrap();

    assert!(report.is_success());
    assert_eq!(report.written.len(), 2);

    let index = std::fs::read_to_string(root.join("dist/index.php")).unwrap();
    assert!(index.starts_with("<?php require_once \"assetsMap.php\" ?>"));
    assert!(index.contains("<h1>Home</h1><?php echo $greeting; ?>"));
    assert!(index.contains("function insertion"));

    let panel = std::fs::read_to_string(root.join("dist/admin/panel.php")).unwrap();
    assert!(panel.contains("<p>admin</p>"));

    assert!(!root.join("dist/readme.txt").as_std_path().exists());
}

#[test]
fn minified_run_preserves_php_and_collapses_markup() {
    let (_dir, root) = project("source: php\noutput: dist\nminify: true\n");
    write(
        &root.join("php/page.php"),
        "<p> hello  </p><?php var_dump($x);   ?>",
    );

    let config =
        ResolvedConfig::load(&root.join(".config/philtre.yaml"), Overrides::default()).unwrap();
    let report = philtre::run(&config).unwrap();
    assert!(report.is_success());

    let out = std::fs::read_to_string(root.join("dist/page.php")).unwrap();
    assert!(out.starts_with("<?php require_once \"assetsMap.php\" ?>"));
    assert!(out.contains("<p>hello</p>"));
    assert!(out.contains("<?php var_dump($x);   ?>"));
}

#[test]
fn insertion_allow_list_is_honored() {
    let (_dir, root) = project(
        "source: php\noutput: dist\ninsertion:\n  - index.php\n",
    );
    write(&root.join("php/index.php"), "<p>x</p>");
    write(&root.join("php/other.php"), "<p>y</p>");

    let config =
        ResolvedConfig::load(&root.join(".config/philtre.yaml"), Overrides::default()).unwrap();
    philtre::run(&config).unwrap();

    let index = std::fs::read_to_string(root.join("dist/index.php")).unwrap();
    let other = std::fs::read_to_string(root.join("dist/other.php")).unwrap();
    assert!(index.contains("function insertion"));
    assert!(!other.contains("function insertion"));
    assert!(other.contains("require_once \"assetsMap.php\""));
}

#[test]
fn mismatched_template_fails_without_output() {
    let (_dir, root) = project("source: php\noutput: dist\nminify: true\n");
    write(
        &root.join("php/bad.php"),
        "<div>ok</div><!-- <?php echo $hidden; ?> -->",
    );
    write(&root.join("php/good.php"), "<div>fine</div>");

    let config =
        ResolvedConfig::load(&root.join(".config/philtre.yaml"), Overrides::default()).unwrap();
    let report = philtre::run(&config).unwrap();

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, Utf8PathBuf::from("bad.php"));
    assert!(report.failed[0].1.to_string().contains("tag count"));
    assert!(!root.join("dist/bad.php").as_std_path().exists());
    assert!(root.join("dist/good.php").as_std_path().exists());
}

#[test]
fn cli_overrides_beat_file_values() {
    let (_dir, root) = project("source: php\noutput: dist\nmanifest_file: a.php\n");
    write(&root.join("php/index.php"), "<p>x</p>");

    let overrides = Overrides {
        output: Some(root.join("elsewhere")),
        manifest_file: Some("b.php".to_string()),
        ..Overrides::default()
    };
    let config = ResolvedConfig::load(&root.join(".config/philtre.yaml"), overrides).unwrap();
    philtre::run(&config).unwrap();

    let out = std::fs::read_to_string(root.join("elsewhere/index.php")).unwrap();
    assert!(out.contains("require_once \"b.php\""));
    assert!(!root.join("dist/index.php").as_std_path().exists());
}

#[test]
fn unknown_config_key_fails_before_processing() {
    let (_dir, root) = project("source: php\noutput: dist\ninclud: typo\n");
    write(&root.join("php/index.php"), "<p>x</p>");

    let result = ResolvedConfig::load(&root.join(".config/philtre.yaml"), Overrides::default());
    assert!(result.is_err());
    assert!(!root.join("dist").as_std_path().exists());
}
