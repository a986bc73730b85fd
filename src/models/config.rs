use serde::{Deserialize, Deserializer};
use std::path::PathBuf;

/// 配置文件结构（multeval_runner.toml），所有字段均有默认值
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub evaluator: EvaluatorConfig,
    pub defaults: DefaultsConfig,
}

/// 外部评测程序配置
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct EvaluatorConfig {
    #[serde(deserialize_with = "deserialize_optional_string")]
    pub binary: Option<String>,
    // ————————————————————————————————————————————————————————————————————————
    // 依赖语言代码的指标，选中其一时必须给出 --language
    // ————————————————————————————————————————————————————————————————————————
    pub language_dependent_metrics: Vec<String>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            binary: None,
            language_dependent_metrics: vec!["meteor".to_string()],
        }
    }
}

/// 命令行参数缺省时使用的默认值
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DefaultsConfig {
    pub metrics: String,
    pub output_folder: String,
    pub ar_shuffles: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            metrics: "bleu,meteor,ter".to_string(),
            output_folder: "multeval_results".to_string(),
            ar_shuffles: 10000,
        }
    }
}

/// 合并命令行与配置文件后的运行参数，启动时构建一次，之后只读
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub test_set: String,
    pub baseline: String,
    pub metrics: Vec<String>, // 全部小写
    pub sort_by: String,      // 排序指标，默认为第一个指标
    pub language: Option<String>,
    pub pattern: String, // 假设文件的 glob 模式
    pub output_dir: PathBuf, // <output-folder>/<test-set>
    pub reference: PathBuf,
    pub force: bool,
    pub ar_shuffles: u32,
    pub search_root: PathBuf,
    pub folders: Option<Vec<String>>, // None 表示搜索 search_root 下所有子目录
    pub evaluator_binary: PathBuf,
    pub language_dependent_metrics: Vec<String>,
}

impl RunSettings {
    /// 选中的指标中第一个依赖语言的指标
    pub fn language_dependent_metric(&self) -> Option<&str> {
        self.metrics
            .iter()
            .find(|m| self.language_dependent_metrics.iter().any(|l| l.eq_ignore_ascii_case(m)))
            .map(String::as_str)
    }

    pub fn results_file(&self) -> PathBuf {
        self.output_dir.join("results.txt")
    }

    pub fn latex_file(&self) -> PathBuf {
        self.output_dir.join("results.tex")
    }

    pub fn rank_dir(&self) -> PathBuf {
        self.output_dir.join("ranksys")
    }
}

/// 反序列化可选字符串，空字符串视为未设置
fn deserialize_optional_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}
