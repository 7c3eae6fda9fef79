use std::ffi::OsStr;
use std::path::Path;

use anyhow::Result;
use ignore::{DirEntry, Walk, WalkBuilder};

use crate::infrastructure::LoggerTrait;

/// 文件名后缀过滤条件 (区分大小写的字面后缀匹配)
#[derive(Debug, Clone)]
pub struct SuffixFilter {
    suffix: String,
}

impl SuffixFilter {
    /// 创建后缀过滤器
    pub fn new(suffix: &str) -> Self {
        Self {
            suffix: suffix.to_string(),
        }
    }

    /// 检查文件名是否以指定后缀结尾
    pub fn matches(&self, file_name: &OsStr) -> bool {
        file_name.to_string_lossy().ends_with(&self.suffix)
    }
}

/// 构建顺序遍历器
///
/// 包含隐藏文件, 不跟随符号链接; gitignore 规则默认关闭
fn build_walker(dir: &Path, respect_gitignore: bool) -> Walk {
    WalkBuilder::new(dir)
        .hidden(false) // 包含隐藏文件
        .follow_links(false) // 不跟随符号链接
        .ignore(respect_gitignore) // 是否使用 .ignore
        .parents(respect_gitignore) // 是否使用上级目录的忽略规则
        .git_global(respect_gitignore) // 是否使用全局 .gitignore
        .git_ignore(respect_gitignore) // 是否使用 .gitignore
        .git_exclude(respect_gitignore) // 是否使用 .git/info/exclude
        .threads(1)
        .build()
}

/// 统计符合后缀条件的文件总数 (仅用于进度显示, 尽力而为)
///
/// 目录不存在时返回 0, 不视为错误
pub fn count_matching(dir: &Path, filter: &SuffixFilter, respect_gitignore: bool) -> u64 {
    build_walker(dir, respect_gitignore)
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map_or(false, |ft| ft.is_file()))
        .filter(|entry| filter.matches(entry.file_name()))
        .count() as u64
}

/// 遍历目录并对每个符合后缀条件的文件执行回调
///
/// 遍历错误记录后跳过; 回调返回的错误向上传播并终止遍历
pub fn visit_matching<F>(
    dir: &Path,
    filter: &SuffixFilter,
    respect_gitignore: bool,
    logger: &dyn LoggerTrait,
    mut callback: F,
) -> Result<()>
where
    F: FnMut(&DirEntry) -> Result<()>,
{
    for result in build_walker(dir, respect_gitignore) {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                // 记录遍历错误并继续
                if logger.is_enabled() {
                    let _ = logger.log_message(&format!("遍历错误: {}", err));
                }
                continue;
            }
        };

        // 只处理文件
        if !entry.file_type().map_or(false, |ft| ft.is_file()) {
            continue;
        }

        if !filter.matches(entry.file_name()) {
            continue;
        }

        callback(&entry)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::Logger;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_suffix_filter_literal_match() {
        let filter = SuffixFilter::new(".txt");

        assert!(filter.matches(OsStr::new("notes.txt")));
        assert!(filter.matches(OsStr::new("mytext.txt")));
        assert!(!filter.matches(OsStr::new("foo.abctxt")));
        assert!(!filter.matches(OsStr::new("notes.TXT"))); // 区分大小写
        assert!(!filter.matches(OsStr::new("notes.md")));
    }

    #[test]
    fn test_count_matching_recursive() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "one").unwrap();
        fs::write(dir.path().join("b.md"), "two").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.txt"), "three").unwrap();

        let filter = SuffixFilter::new(".txt");
        assert_eq!(count_matching(dir.path(), &filter, false), 2);
    }

    #[test]
    fn test_count_matching_missing_directory_is_zero() {
        let filter = SuffixFilter::new(".txt");
        let missing = Path::new("/nonexistent/path/for/fuzzyfind/tests");
        assert_eq!(count_matching(missing, &filter, false), 0);
    }

    #[test]
    fn test_visit_matching_only_sees_filtered_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "one").unwrap();
        fs::write(dir.path().join("b.log"), "two").unwrap();

        let logger = Logger::new(false).unwrap();
        let filter = SuffixFilter::new(".txt");
        let mut seen = Vec::new();

        visit_matching(dir.path(), &filter, false, &logger, |entry| {
            seen.push(entry.file_name().to_string_lossy().to_string());
            Ok(())
        })
        .unwrap();

        assert_eq!(seen, vec!["a.txt"]);
    }

    #[test]
    fn test_visit_matching_propagates_callback_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "one").unwrap();

        let logger = Logger::new(false).unwrap();
        let filter = SuffixFilter::new(".txt");

        let result = visit_matching(dir.path(), &filter, false, &logger, |_| {
            anyhow::bail!("写入失败")
        });

        assert!(result.is_err());
    }
}
