use std::path::PathBuf;
use thiserror::Error;

/// 运行期错误分类：配置错误、发现错误、外部进程错误、输出格式错误
///
/// 所有错误对当前运行都是致命的，不做重试。
#[derive(Debug, Error)]
pub enum RunnerError {
    // ————————————————————————————————————————————————————————————————————————
    // 配置错误
    // ————————————————————————————————————————————————————————————————————————
    #[error("--language is required for the {metric} metric")]
    MissingLanguage { metric: String },

    #[error("reference '{}' does not exist", .0.display())]
    ReferenceNotFound(PathBuf),

    #[error("output folder '{}' exists, give -f to force evaluation", .0.display())]
    OutputExists(PathBuf),

    #[error("config file '{}' does not exist", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("no metrics given")]
    NoMetrics,

    // ————————————————————————————————————————————————————————————————————————
    // 系统发现错误
    // ————————————————————————————————————————————————————————————————————————
    #[error("invalid hypothesis pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("no hypothesis file found with glob '{0}'")]
    NoFilesFound(String),

    #[error("baseline system '{baseline}' not among evaluated systems [{}]", .found.join(", "))]
    BaselineMissing { baseline: String, found: Vec<String> },

    // ————————————————————————————————————————————————————————————————————————
    // 外部评测进程错误
    // ————————————————————————————————————————————————————————————————————————
    #[error("failed to launch evaluator '{}': {source}", .binary.display())]
    EvaluatorLaunch {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("evaluator exited with {status}: {stderr}")]
    EvaluatorFailed { status: String, stderr: String },

    // ————————————————————————————————————————————————————————————————————————
    // 评测输出格式错误
    // ————————————————————————————————————————————————————————————————————————
    #[error("malformed evaluator output: {0}")]
    MalformedOutput(String),

    #[error("sort metric '{metric}' not found in header [{}]", .header.join(", "))]
    UnknownMetric { metric: String, header: Vec<String> },

    #[error("cannot parse score '{value}' of system '{system}'")]
    InvalidScore { system: String, value: String },
}
