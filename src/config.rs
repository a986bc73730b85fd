use crate::cli::Cli;
use crate::error::RunnerError;
use crate::file_utils::build_pattern;
use crate::models::{Config, RunSettings};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// 未指定 --config 时在当前目录查找的配置文件
pub const DEFAULT_CONFIG_FILE: &str = "multeval_runner.toml";

/// 加载配置文件
///
/// 显式给出的路径必须存在；未给出时默认文件不存在则使用内置默认值。
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = match config_path {
        Some(path) if !path.exists() => {
            return Err(RunnerError::ConfigNotFound(path.to_path_buf()).into());
        }
        Some(path) => path.to_path_buf(),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !path.exists() {
                log::debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                return Ok(Config::default());
            }
            path
        }
    };

    // 读取配置文件内容
    let config_content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    // 解析TOML配置
    let config: Config = toml::from_str(&config_content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// 拆分逗号分隔的指标列表，统一为小写
pub fn parse_metrics(metrics: &str) -> Vec<String> {
    metrics
        .split(',')
        .map(|m| m.trim().to_lowercase())
        .filter(|m| !m.is_empty())
        .collect()
}

/// 合并命令行参数与配置文件，命令行优先
pub fn resolve_settings(cli: &Cli, config: &Config, search_root: PathBuf) -> Result<RunSettings> {
    let metrics = parse_metrics(cli.metrics.as_deref().unwrap_or(config.defaults.metrics.as_str()));
    let sort_by = match &cli.sort_by {
        Some(metric) => metric.trim().to_lowercase(),
        None => metrics.first().cloned().ok_or(RunnerError::NoMetrics)?,
    };

    let pattern = build_pattern(
        cli.custom_file.as_deref(),
        cli.prefix.as_deref(),
        cli.metric.as_deref(),
        &cli.test_set,
        cli.suffix.as_deref(),
    );

    let output_folder = cli
        .output_folder
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.defaults.output_folder));

    let evaluator_binary = cli
        .multeval_bin
        .clone()
        .or_else(|| config.evaluator.binary.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("multeval"));

    Ok(RunSettings {
        test_set: cli.test_set.clone(),
        baseline: cli.baseline.clone(),
        metrics,
        sort_by,
        language: cli.language.clone().filter(|l| !l.trim().is_empty()),
        pattern,
        output_dir: output_folder.join(&cli.test_set),
        reference: cli.reference.clone(),
        force: cli.force,
        ar_shuffles: cli.ar_shuffles.unwrap_or(config.defaults.ar_shuffles),
        search_root,
        folders: if cli.folders.is_empty() { None } else { Some(cli.folders.clone()) },
        evaluator_binary,
        language_dependent_metrics: config
            .evaluator
            .language_dependent_metrics
            .iter()
            .map(|m| m.to_lowercase())
            .collect(),
    })
}

/// 在扫描目录和调用评测程序之前完成的检查
pub fn validate_settings(settings: &RunSettings) -> Result<(), RunnerError> {
    if settings.metrics.is_empty() {
        return Err(RunnerError::NoMetrics);
    }

    if let Some(metric) = settings.language_dependent_metric() {
        if settings.language.is_none() {
            return Err(RunnerError::MissingLanguage { metric: metric.to_string() });
        }
    }

    if !settings.reference.exists() {
        return Err(RunnerError::ReferenceNotFound(settings.reference.clone()));
    }

    if settings.output_dir.exists() && !settings.force {
        return Err(RunnerError::OutputExists(settings.output_dir.clone()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["multeval-runner"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_metrics() {
        assert_eq!(parse_metrics("BLEU, meteor,,ter "), vec!["bleu", "meteor", "ter"]);
        assert!(parse_metrics(" , ").is_empty());
    }

    #[test]
    fn test_load_config_explicit_missing() {
        let result = load_config(Some(Path::new("/nonexistent/multeval_runner.toml")));
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RunnerError>(),
            Some(RunnerError::ConfigNotFound(_))
        ));
    }

    #[test]
    fn test_load_config_from_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("runner.toml");
        fs::write(&path, "[evaluator]\nbinary = \"/opt/multeval.sh\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.evaluator.binary.as_deref(), Some("/opt/multeval.sh"));
        assert_eq!(config.defaults.ar_shuffles, 10000);
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("runner.toml");
        fs::write(&path, "[defaults\nar_shuffles = ").unwrap();

        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_resolve_settings_defaults() {
        let cli = parse(&["-t", "test2016", "-b", "base", "-r", "ref.tok", "-s", "tok"]);
        let settings = resolve_settings(&cli, &Config::default(), PathBuf::from(".")).unwrap();

        assert_eq!(settings.metrics, vec!["bleu", "meteor", "ter"]);
        assert_eq!(settings.sort_by, "bleu");
        assert_eq!(settings.pattern, "*test2016*.tok");
        assert_eq!(settings.output_dir, PathBuf::from("multeval_results").join("test2016"));
        assert_eq!(settings.ar_shuffles, 10000);
        assert_eq!(settings.folders, None);
        assert_eq!(settings.language_dependent_metrics, vec!["meteor"]);
    }

    #[test]
    fn test_resolve_settings_cli_overrides_config() {
        let mut config = Config::default();
        config.evaluator.binary = Some("/opt/from-config".to_string());
        config.defaults.metrics = "ter".to_string();

        let cli = parse(&[
            "-t", "dev", "-b", "base", "-r", "ref.tok",
            "-m", "TER,BLEU", "--sort-by", "BLEU",
            "-c", "hyp.txt", "-o", "out", "-a", "50",
            "--multeval-bin", "/opt/from-cli",
            "-l", " ",
            "sysA",
        ]);
        let settings = resolve_settings(&cli, &config, PathBuf::from("/work")).unwrap();

        assert_eq!(settings.metrics, vec!["ter", "bleu"]);
        assert_eq!(settings.sort_by, "bleu");
        assert_eq!(settings.pattern, "hyp.txt");
        assert_eq!(settings.output_dir, PathBuf::from("out").join("dev"));
        assert_eq!(settings.ar_shuffles, 50);
        assert_eq!(settings.evaluator_binary, PathBuf::from("/opt/from-cli"));
        assert_eq!(settings.language, None);
        assert_eq!(settings.search_root, PathBuf::from("/work"));
        assert_eq!(settings.folders, Some(vec!["sysA".to_string()]));
    }

    #[test]
    fn test_resolve_settings_binary_from_config() {
        let mut config = Config::default();
        config.evaluator.binary = Some("/opt/from-config".to_string());

        let mut cli = parse(&["-t", "dev", "-b", "base", "-r", "ref.tok"]);
        // 环境变量 MULTEVAL_BIN 可能已被设置
        cli.multeval_bin = None;
        let settings = resolve_settings(&cli, &config, PathBuf::from(".")).unwrap();

        assert_eq!(settings.evaluator_binary, PathBuf::from("/opt/from-config"));
    }

    #[test]
    fn test_resolve_settings_no_metrics() {
        let cli = parse(&["-t", "dev", "-b", "base", "-r", "ref.tok", "-m", ","]);
        let err = resolve_settings(&cli, &Config::default(), PathBuf::from(".")).unwrap_err();
        assert!(matches!(err.downcast_ref::<RunnerError>(), Some(RunnerError::NoMetrics)));
    }

    fn settings_in(dir: &Path, metrics: &str, language: Option<&str>) -> RunSettings {
        let reference = dir.join("ref.tok");
        let output = dir.join("out");
        let mut args = vec![
            "-t".to_string(), "dev".to_string(),
            "-b".to_string(), "base".to_string(),
            "-r".to_string(), reference.to_string_lossy().into_owned(),
            "-m".to_string(), metrics.to_string(),
            "-o".to_string(), output.to_string_lossy().into_owned(),
        ];
        if let Some(language) = language {
            args.push("-l".to_string());
            args.push(language.to_string());
        }
        let argv: Vec<&str> = args.iter().map(String::as_str).collect();
        resolve_settings(&parse(&argv), &Config::default(), dir.to_path_buf()).unwrap()
    }

    #[test]
    fn test_validate_missing_language() {
        let temp_dir = tempdir().unwrap();
        let settings = settings_in(temp_dir.path(), "bleu,meteor", None);
        assert!(matches!(
            validate_settings(&settings),
            Err(RunnerError::MissingLanguage { .. })
        ));
    }

    #[test]
    fn test_validate_missing_reference() {
        let temp_dir = tempdir().unwrap();
        let settings = settings_in(temp_dir.path(), "bleu,meteor", Some("en"));
        assert!(matches!(
            validate_settings(&settings),
            Err(RunnerError::ReferenceNotFound(_))
        ));
    }

    #[test]
    fn test_validate_output_exists() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("ref.tok"), "ref").unwrap();
        let mut settings = settings_in(temp_dir.path(), "bleu", None);
        assert!(validate_settings(&settings).is_ok());

        fs::create_dir_all(&settings.output_dir).unwrap();
        assert!(matches!(
            validate_settings(&settings),
            Err(RunnerError::OutputExists(_))
        ));

        settings.force = true;
        assert!(validate_settings(&settings).is_ok());
    }
}
