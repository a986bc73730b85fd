use std::path::PathBuf;

/// 单个系统（一个目录）及其全部假设文件
#[derive(Debug, Clone, PartialEq)]
pub struct SystemGroup {
    pub name: String,       // 系统名，即所属目录
    pub files: Vec<PathBuf>, // 按字典序排序的假设文件路径
}

impl SystemGroup {
    pub fn new(name: impl Into<String>, mut files: Vec<PathBuf>) -> Self {
        files.sort();
        files.dedup();
        Self { name: name.into(), files }
    }

    pub fn run_count(&self) -> usize {
        self.files.len()
    }
}

/// 有序系统表：基线总在第一位，其余系统按名称字典序排列
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedSystemTable {
    systems: Vec<SystemGroup>,
}

impl OrderedSystemTable {
    pub fn new(baseline: SystemGroup, mut others: Vec<SystemGroup>) -> Self {
        others.retain(|s| s.name != baseline.name);
        others.sort_by(|a, b| a.name.cmp(&b.name));

        let mut systems = Vec::with_capacity(others.len() + 1);
        systems.push(baseline);
        systems.extend(others);
        Self { systems }
    }

    pub fn baseline(&self) -> &SystemGroup {
        &self.systems[0]
    }

    /// 除基线以外的系统
    pub fn others(&self) -> &[SystemGroup] {
        &self.systems[1..]
    }

    pub fn names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SystemGroup> {
        self.systems.iter()
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }
}

/// 因运行次数与众数不一致而被跳过的系统
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSystem {
    pub name: String,
    pub run_count: usize,
}

/// 系统发现结果
#[derive(Debug, Clone, PartialEq)]
pub struct Discovery {
    pub table: OrderedSystemTable,
    pub run_count: usize,
    pub skipped: Vec<SkippedSystem>,
}
