use crate::error::RunnerError;
use crate::models::{OrderedSystemTable, RunSettings};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// 一次外部评测程序调用：可执行文件路径及完整参数列表
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatorInvocation {
    pub binary: PathBuf,
    pub args: Vec<String>,
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl EvaluatorInvocation {
    /// 根据运行参数和有序系统表构建命令行
    ///
    /// 基线文件走 `--hyps-baseline`，其余系统依次为 `--hyps-sys1`、`--hyps-sys2` ……
    pub fn build(settings: &RunSettings, table: &OrderedSystemTable) -> Result<Self, RunnerError> {
        let mut args = vec![
            "eval".to_string(),
            "--refs".to_string(),
            path_arg(&settings.reference),
            "--rankDir".to_string(),
            path_arg(&settings.rank_dir()),
            "--latex".to_string(),
            path_arg(&settings.latex_file()),
            "--names".to_string(),
        ];
        args.extend(table.names().into_iter().map(String::from));

        args.push("--hyps-baseline".to_string());
        args.extend(table.baseline().files.iter().map(|f| path_arg(f)));

        args.push("--ar-shuffles".to_string());
        args.push(settings.ar_shuffles.to_string());

        args.push("--metrics".to_string());
        args.extend(settings.metrics.iter().cloned());

        // ————————————————————————————————————————————————————————————————————————
        // 依赖语言的指标需要额外的语言参数，如 --meteor.language de
        // ————————————————————————————————————————————————————————————————————————
        if let Some(metric) = settings.language_dependent_metric() {
            let language = settings
                .language
                .as_deref()
                .filter(|l| !l.is_empty())
                .ok_or_else(|| RunnerError::MissingLanguage { metric: metric.to_string() })?;
            args.push(format!("--{}.language", metric));
            args.push(language.to_string());
        }

        for (i, system) in table.others().iter().enumerate() {
            args.push(format!("--hyps-sys{}", i + 1));
            args.extend(system.files.iter().map(|f| path_arg(f)));
        }

        Ok(Self { binary: settings.evaluator_binary.clone(), args })
    }

    /// 同步运行评测程序并返回其标准输出
    pub fn run(&self) -> Result<String, RunnerError> {
        log::info!("Running {} with {} arguments", self.binary.display(), self.args.len());
        log::debug!("Evaluator arguments: {:?}", self.args);

        let output = Command::new(&self.binary)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| RunnerError::EvaluatorLaunch {
                binary: self.binary.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(RunnerError::EvaluatorFailed {
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        if !stderr.trim().is_empty() {
            log::debug!("Evaluator stderr:\n{}", stderr.trim_end());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
