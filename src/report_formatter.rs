// src/report_formatter.rs
use crate::error::RunnerError;
use crate::models::{MetricRow, ReportTable};

/// 表头中没有置信区间标记时，系统名一栏占用的词数
const DEFAULT_LABEL_TOKENS: usize = 5;

/// 以左括号开头的词是分数的附注，如 `(0.3/0.2/0.01)`
fn is_decoration(token: &str) -> bool {
    token.starts_with('(')
}

/// 解析表头：去掉括号附注，系统名各词合并为一列，指标名转为大写
pub fn parse_header(line: &str) -> Vec<String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    // 第一个附注之前的那个词是第一个指标名，其前面的词都属于系统名一栏
    let label_len = match tokens.iter().position(|t| is_decoration(t)) {
        Some(i) if i > 0 => i - 1,
        Some(_) => 0,
        None => DEFAULT_LABEL_TOKENS.min(tokens.len()),
    };

    let mut header = vec![tokens[..label_len].join(" ")];
    header.extend(
        tokens[label_len..]
            .iter()
            .filter(|t| !is_decoration(t))
            .map(|t| t.to_uppercase()),
    );
    header
}

/// 解析一行数据
///
/// 第一个附注之前的词是第一个分数，再之前的词组成系统标签；之后的词两两组成
/// `分数 (附注)` 字段。没有附注或缺少分数的行返回 None。
pub fn parse_row(line: &str) -> Option<MetricRow> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let first = tokens.iter().position(|t| is_decoration(t))?;
    let start = first.checked_sub(1)?;

    let label = tokens[..start].join(" ");
    let scores = tokens[start..]
        .chunks_exact(2)
        .map(|pair| pair.join(" "))
        .collect();

    Some(MetricRow { label, scores })
}

/// 将评测程序的原始输出整理为报告表，其余系统按 `sort_by` 指标升序排列
pub fn build_report(output: &str, sort_by: &str) -> Result<ReportTable, RunnerError> {
    let mut lines = output.trim().lines();

    let header = lines
        .next()
        .map(parse_header)
        .filter(|h| h.len() > 1)
        .ok_or_else(|| RunnerError::MalformedOutput("missing header line".to_string()))?;

    let baseline_line = lines
        .next()
        .ok_or_else(|| RunnerError::MalformedOutput("missing baseline row".to_string()))?;
    let mut baseline = parse_row(baseline_line).ok_or_else(|| {
        RunnerError::MalformedOutput(format!("cannot parse baseline row '{}'", baseline_line.trim()))
    })?;
    baseline.shorten_label();

    let mut systems = Vec::new();
    for line in lines.map(str::trim) {
        if line.is_empty() || line.starts_with('*') {
            continue;
        }
        let Some(mut row) = parse_row(line) else {
            log::debug!("Ignoring evaluator line '{}'", line);
            continue;
        };
        if row.field_count() < header.len() {
            log::debug!("Ignoring short evaluator line '{}'", line);
            continue;
        }
        row.shorten_label();
        systems.push(row);
    }

    let mut table = ReportTable { header, baseline, systems: Vec::new() };

    // ————————————————————————————————————————————————————————————————————————
    // 基线不参与排序
    // ————————————————————————————————————————————————————————————————————————
    let column = table.column_index(sort_by)?;
    let mut keyed = systems
        .into_iter()
        .map(|row| row.primary_score(column).map(|score| (score, row)))
        .collect::<Result<Vec<_>, _>>()?;
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    table.systems = keyed.into_iter().map(|(_, row)| row).collect();

    Ok(table)
}

/// 渲染为纯文本表格：列宽对齐、两空格分隔、表头下方一行短横线
pub fn render_table(table: &ReportTable) -> String {
    let rows: Vec<Vec<&str>> = table.rows().map(|r| r.fields()).collect();
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(table.header.len()))
        .max()
        .unwrap_or(0);

    let mut widths = vec![0usize; columns];
    let header: Vec<&str> = table.header.iter().map(String::as_str).collect();
    for cells in std::iter::once(&header).chain(rows.iter()) {
        for (i, cell) in cells.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let format_line = |cells: &[&str]| -> String {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| format!("{:<width$}", cells.get(i).copied().unwrap_or(""), width = *w))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_line(&header));
    lines.push(rule.join("  "));
    lines.extend(rows.iter().map(|cells| format_line(cells)));
    lines.join("\n")
}

/// 解析、排序并渲染评测输出
pub fn format_report(output: &str, sort_by: &str) -> Result<String, RunnerError> {
    let table = build_report(output, sort_by)?;
    Ok(render_table(&table))
}
