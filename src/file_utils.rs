use crate::error::RunnerError;
use anyhow::Result;
use glob::Pattern;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// 由命令行中的各个片段拼出假设文件的 glob 模式
///
/// `custom_file` 存在时原样返回；否则为 `{prefix}*{metric}*{test_set}*.{suffix}`，
/// 空片段省略，连续的 `*` 合并为一个。
pub fn build_pattern(
    custom_file: Option<&str>,
    prefix: Option<&str>,
    metric: Option<&str>,
    test_set: &str,
    suffix: Option<&str>,
) -> String {
    if let Some(custom) = custom_file.filter(|c| !c.is_empty()) {
        return custom.to_string();
    }

    let suffix = suffix.filter(|s| !s.is_empty()).map(|s| {
        if s.starts_with('.') || s.starts_with('*') {
            s.to_string()
        } else {
            format!(".{}", s)
        }
    });

    let mut pattern = String::new();
    pattern.push_str(prefix.unwrap_or_default());
    pattern.push('*');
    pattern.push_str(metric.unwrap_or_default());
    pattern.push('*');
    pattern.push_str(test_set);
    pattern.push('*');
    pattern.push_str(suffix.as_deref().unwrap_or_default());

    while pattern.contains("**") {
        pattern = pattern.replace("**", "*");
    }
    pattern
}

/// 确定要搜索的系统目录，返回 (系统名, 目录路径) 列表
///
/// `folders` 为空时取 `root` 下所有直接子目录；否则取给定目录并补上基线目录。
pub fn resolve_search_dirs(
    root: &Path,
    folders: Option<&[String]>,
    baseline: &str,
) -> Result<Vec<(String, PathBuf)>> {
    if !root.exists() {
        anyhow::bail!("Search directory '{}' does not exist", root.display());
    }

    if !root.is_dir() {
        anyhow::bail!("'{}' is not a directory", root.display());
    }

    let dirs = match folders {
        None => WalkDir::new(root)
            .follow_links(true)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_dir())
            .map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                (name, entry.path().to_path_buf())
            })
            .collect(),
        Some(folders) => {
            let mut dirs: Vec<(String, PathBuf)> = Vec::new();
            for folder in folders.iter().map(String::as_str).chain(std::iter::once(baseline)) {
                let name = system_name(folder);
                if dirs.iter().any(|(n, _)| *n == name) {
                    continue;
                }
                let path = root.join(&name);
                if !path.is_dir() {
                    log::warn!("System folder '{}' does not exist", path.display());
                }
                dirs.push((name, path));
            }
            dirs
        }
    };

    Ok(dirs)
}

/// 规范化系统目录名：去掉 `.` 分量和末尾分隔符，"./sysA/" 与 "sysA" 视为同一系统
pub fn system_name(folder: &str) -> String {
    let normalized: PathBuf = Path::new(folder)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if normalized.as_os_str().is_empty() {
        folder.to_string()
    } else {
        normalized.to_string_lossy().into_owned()
    }
}

/// 在每个系统目录下按模式查找假设文件，按系统名分组
///
/// 没有匹配文件的系统不会出现在结果中。
pub fn find_hypothesis_files(
    dirs: &[(String, PathBuf)],
    pattern: &str,
) -> Result<BTreeMap<String, Vec<PathBuf>>> {
    Pattern::new(pattern).map_err(|e| RunnerError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.msg.to_string(),
    })?;

    let mut systems: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

    for (name, dir) in dirs {
        let full = format!("{}/{}", Pattern::escape(&dir.to_string_lossy()), pattern);
        let paths = glob::glob(&full).map_err(|e| RunnerError::InvalidPattern {
            pattern: full.clone(),
            reason: e.msg.to_string(),
        })?;

        for path in paths.filter_map(Result::ok).filter(|p| p.is_file()) {
            systems.entry(name.clone()).or_default().push(path);
        }
    }

    for files in systems.values_mut() {
        files.sort();
        files.dedup();
    }

    Ok(systems)
}
