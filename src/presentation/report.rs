use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::search::ReportEntry;

/// 流式报告写入器
///
/// 输出文件在整个扫描期间保持打开, 每个条目写入后立即刷新,
/// 扫描中途的部分输出也是可读的; 创建失败直接向上传播
pub struct ReportWriter {
    file: File,
}

impl ReportWriter {
    /// 创建(覆盖)输出文件
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("无法创建输出文件: {}", path.display()))?;

        Ok(Self { file })
    }

    /// 追加一个报告条目并刷新
    pub fn write_entry(&mut self, entry: &ReportEntry) -> Result<()> {
        self.file.write_all(format_entry(entry).as_bytes())?;
        self.file.flush()?;
        Ok(())
    }
}

/// 将报告条目格式化为文本块, 块之间以空行分隔
pub fn format_entry(entry: &ReportEntry) -> String {
    let mut block = format!("File: {}\n", entry.file_path);
    block.push_str(&format!("Searched in: {}\n", entry.search_part));
    block.push_str("Keywords found:\n");

    for occurrence in &entry.occurrences {
        block.push_str(&format!(
            "- {} (matched as '{}')\n",
            occurrence.keyword, occurrence.matched_word
        ));
        block.push_str(&format!("  Position: {}\n", occurrence.position));
        block.push_str(&format!("  Context: ...{}...\n", occurrence.context));
    }

    block.push('\n');
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::{MatchOccurrence, SearchPart};
    use std::fs;
    use tempfile::tempdir;

    fn sample_entry() -> ReportEntry {
        ReportEntry {
            file_path: "docs/a.txt".to_string(),
            search_part: SearchPart::All,
            occurrences: vec![
                MatchOccurrence {
                    keyword: "quick".to_string(),
                    matched_word: "quick".to_string(),
                    position: 4,
                    context: "The quick brown fox".to_string(),
                },
                MatchOccurrence {
                    keyword: "fox".to_string(),
                    matched_word: "fox".to_string(),
                    position: 16,
                    context: "The quick brown fox".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_format_entry_layout() {
        let text = format_entry(&sample_entry());
        let expected = "File: docs/a.txt\n\
                        Searched in: all\n\
                        Keywords found:\n\
                        - quick (matched as 'quick')\n\
                        \x20 Position: 4\n\
                        \x20 Context: ...The quick brown fox...\n\
                        - fox (matched as 'fox')\n\
                        \x20 Position: 16\n\
                        \x20 Context: ...The quick brown fox...\n\
                        \n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_writer_streams_entries() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("report.txt");

        let mut writer = ReportWriter::create(&output).unwrap();
        writer.write_entry(&sample_entry()).unwrap();
        writer.write_entry(&sample_entry()).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(written.matches("File: docs/a.txt").count(), 2);
        // 条目之间以空行分隔
        assert!(written.contains("...\n\nFile:"));
    }

    #[test]
    fn test_create_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("report.txt");
        fs::write(&output, "旧内容").unwrap();

        let _writer = ReportWriter::create(&output).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "");
    }

    #[test]
    fn test_create_fails_on_invalid_path() {
        let result = ReportWriter::create(Path::new("/nonexistent/dir/report.txt"));
        assert!(result.is_err());
    }
}
