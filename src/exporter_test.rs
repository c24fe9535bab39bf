use crate::exporter::{AnimationKind, ExportConfig, ExportSummary, Exporter};
use crate::gif_exporter::count_frames;
use crate::time_array::{SimulationProps, TimeArray};

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn small_config(dir: &std::path::Path) -> ExportConfig {
        ExportConfig::default()
            .with_output_dir(dir.join("export"))
            .with_series(200, 6)
            .with_seed(11)
            .with_canvas_sizes(120, 160)
            .with_gridsize(20)
    }

    #[test]
    fn test_export_writes_both_animations() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let cfg = small_config(dir.path());
        let summary = Exporter::new(cfg.clone()).run().expect("export failed");

        let scatter = summary.animation(AnimationKind::Scatter).expect("no scatter output");
        let hexbin = summary.animation(AnimationKind::Hexbin).expect("no hexbin output");

        assert_eq!(scatter.path, dir.path().join("export/scatter/scatter.gif"));
        assert_eq!(hexbin.path, dir.path().join("export/hexbin/hexbin_20_bins.gif"));
        assert_eq!((scatter.width, scatter.height), (120, 120));
        assert_eq!((hexbin.width, hexbin.height), (160, 160));

        for animation in &summary.animations {
            assert!(animation.path.exists(), "{:?} missing", animation.path);
            assert_eq!(animation.frames, 6);
            assert_eq!(count_frames(&animation.path).unwrap(), 6);
        }

        println!("✅ Exported {} animations in {:.3}s", summary.animations.len(), summary.elapsed_s);
    }

    #[test]
    fn test_manifest_describes_the_run() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let cfg = small_config(dir.path());
        let summary = Exporter::new(cfg.clone()).run().expect("export failed");

        let text = fs::read_to_string(cfg.manifest_path()).expect("manifest missing");
        let manifest: ExportSummary = serde_json::from_str(&text).expect("manifest is not json");
        assert_eq!(manifest.animations, summary.animations);
        assert_eq!(manifest.config, cfg);
    }

    #[test]
    fn test_existing_output_dirs_are_reused() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let cfg = small_config(dir.path()).with_series(50, 2);
        fs::create_dir_all(dir.path().join("export/scatter")).unwrap();

        Exporter::new(cfg.clone()).run().expect("first export failed");
        let summary = Exporter::new(cfg).run().expect("second export failed");
        assert!(summary.animations.iter().all(|a| a.frames == 2));
    }

    #[test]
    fn test_run_with_supplied_array() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let array = TimeArray::simulate(&SimulationProps::new().with_samples(30).with_timepoints(4).with_seed(2))
            .unwrap();
        let summary = Exporter::new(small_config(dir.path())).run_with(&array).unwrap();
        assert!(summary.animations.iter().all(|a| a.frames == 4));
    }

    #[test]
    fn test_invalid_config_writes_nothing() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let cfg = small_config(dir.path()).with_series(10, 0);
        assert!(Exporter::new(cfg).run().is_err());
        assert!(!dir.path().join("export").exists());
    }
}
