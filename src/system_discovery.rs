// src/system_discovery.rs
use crate::error::RunnerError;
use crate::file_utils::{find_hypothesis_files, resolve_search_dirs, system_name};
use crate::models::{Discovery, OrderedSystemTable, SkippedSystem, SystemGroup};
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// 计算各系统文件数的众数，即每个系统应有的运行次数
///
/// 出现次数相同时取较小的文件数。
pub fn modal_run_count(systems: &BTreeMap<String, Vec<PathBuf>>) -> Option<usize> {
    let mut frequency: BTreeMap<usize, usize> = BTreeMap::new();
    for files in systems.values() {
        *frequency.entry(files.len()).or_insert(0) += 1;
    }

    // BTreeMap 按文件数升序遍历，只有严格更多的出现次数才替换
    let mut best: Option<(usize, usize)> = None;
    for (count, freq) in frequency {
        match best {
            Some((_, best_freq)) if freq <= best_freq => {}
            _ => best = Some((count, freq)),
        }
    }
    best.map(|(count, _)| count)
}

/// 过滤运行次数不一致的系统并构建有序系统表
pub fn select_systems(
    baseline: &str,
    systems: BTreeMap<String, Vec<PathBuf>>,
    pattern: &str,
) -> Result<Discovery, RunnerError> {
    let run_count =
        modal_run_count(&systems).ok_or_else(|| RunnerError::NoFilesFound(pattern.to_string()))?;

    let mut kept = Vec::new();
    let mut skipped = Vec::new();

    for (name, files) in systems {
        if files.len() != run_count {
            log::warn!(
                "Skipping system {} with {} runs (expected {})",
                name,
                files.len(),
                run_count
            );
            skipped.push(SkippedSystem { name, run_count: files.len() });
        } else {
            let group = SystemGroup::new(name, files);
            log::info!("Adding system {} with {} runs", group.name, group.run_count());
            kept.push(group);
        }
    }

    // ————————————————————————————————————————————————————————————————————————
    // 基线必须在过滤后仍然存在
    // ————————————————————————————————————————————————————————————————————————
    let Some(position) = kept.iter().position(|s| s.name == baseline) else {
        return Err(RunnerError::BaselineMissing {
            baseline: baseline.to_string(),
            found: kept.into_iter().map(|s| s.name).collect(),
        });
    };
    let baseline_group = kept.remove(position);

    Ok(Discovery {
        table: OrderedSystemTable::new(baseline_group, kept),
        run_count,
        skipped,
    })
}

/// 在 `root` 下发现所有系统
///
/// `folders` 为 None 时搜索 `root` 的全部直接子目录，否则只搜索给定目录和基线目录。
pub fn discover_systems(
    root: &Path,
    folders: Option<&[String]>,
    baseline: &str,
    pattern: &str,
) -> Result<Discovery> {
    // 基线名与目录名使用同一规范化形式比较
    let baseline = system_name(baseline);
    let dirs = resolve_search_dirs(root, folders, &baseline)?;
    log::debug!("Searching {} folders with glob '{}'", dirs.len(), pattern);

    let systems = find_hypothesis_files(&dirs, pattern)?;
    if systems.is_empty() {
        return Err(RunnerError::NoFilesFound(pattern.to_string()).into());
    }

    Ok(select_systems(&baseline, systems, pattern)?)
}
