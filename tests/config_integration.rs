use std::path::PathBuf;

use hangeuldown::config::{ConfigFlags, ThemeMode, load_config_flags, parse_flag_tokens};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".hangeuldownrc");
    let content = r"
# comment
--perf

--theme light

--output-dir=exports
";
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.perf);
    assert_eq!(flags.theme, Some(ThemeMode::Light));
    assert_eq!(flags.output_dir, Some(PathBuf::from("exports")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".hangeuldownrc");
    let content = "--theme light\n--storage file.json\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "hangeuldown".to_string(),
        "--theme".to_string(),
        "dark".to_string(),
        "--perf".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.perf, "cli flags should be applied");
    assert_eq!(effective.theme, Some(ThemeMode::Dark), "cli should override theme");
    assert_eq!(
        effective.storage,
        Some(PathBuf::from("file.json")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let args = vec![
        "hangeuldown".to_string(),
        "--theme=dark".to_string(),
        "--render-debug-log=render.log".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags.theme, Some(ThemeMode::Dark));
    assert_eq!(flags.render_debug_log, Some(PathBuf::from("render.log")));
}

#[test]
fn test_missing_config_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let flags = load_config_flags(&dir.path().join("absent")).unwrap();
    assert_eq!(flags, ConfigFlags::default());
}
