use figment::Jail;
use typeindex::Settings;

#[test]
fn test_workspace_config_with_env_override() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".typeindex"))
            .map_err(|e| e.to_string())?;
        jail.create_file(
            ".typeindex/settings.toml",
            r#"
index_path = "build/elements.idx"

[collector]
max_tag_depth = 8
classes = ["com.example.Base"]
"#,
        )?;

        // Double underscore separates nested levels
        jail.set_env("TI_COLLECTOR__MAX_TAG_DEPTH", "32");
        jail.set_env("TI_MARKERS__EXTENSION", "snap");

        let settings = Settings::load().map_err(|e| e.to_string())?;

        // Env wins over the file
        assert_eq!(settings.collector.max_tag_depth, 32);
        assert_eq!(settings.markers.extension, "snap");
        // File wins over defaults
        assert_eq!(settings.index_path.to_str(), Some("build/elements.idx"));
        assert_eq!(settings.collector.classes, vec!["com.example.Base"]);
        // Defaults fill the rest
        assert_eq!(settings.collector.bootstrap_tag, "io.typeindex.Indexed");
        Ok(())
    });
}

#[test]
fn test_single_underscore_stays_in_field_name() {
    Jail::expect_with(|jail| {
        jail.set_env("TI_INDEX_PATH", "custom/elements.idx");

        let settings = Settings::load().map_err(|e| e.to_string())?;
        assert_eq!(settings.index_path.to_str(), Some("custom/elements.idx"));
        Ok(())
    });
}
