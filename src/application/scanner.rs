use std::fs;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::file_walker::{count_matching, visit_matching, SuffixFilter};
use crate::domain::matcher::FuzzyMatcher;
use crate::domain::search::{FileRegions, ReportEntry, SearchRequest};
use crate::infrastructure::{ErrorLogger, ErrorType, LoggerTrait};
use crate::presentation::report::ReportWriter;

/// 一次扫描的统计结果
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOutcome {
    /// 符合后缀条件并被处理的文件数
    pub total_files: u64,
    /// 全部关键词都命中的文件数
    pub matched_files: u64,
    /// 报告中列出的匹配项总数
    pub total_matches: u64,
    /// 读取失败被跳过的文件数
    pub read_errors: u64,
}

/// 执行一次完整扫描
///
/// 先统计文件总数用于进度显示, 再逐个文件顺序处理:
/// 读取 -> 区域划分 -> 关键词判定 -> 匹配列表 -> 流式写入报告。
/// 读取失败的文件记录后跳过; 输出文件无法创建或写入时直接返回错误
pub fn run_scan(
    request: &SearchRequest,
    respect_gitignore: bool,
    logger: &dyn LoggerTrait,
    errors: &ErrorLogger,
) -> Result<ScanOutcome> {
    let filter = SuffixFilter::new(&request.file_ending);
    let matcher = FuzzyMatcher::new(request.threshold)?;

    // 输出文件先于扫描创建, 目录为空时也会留下空报告
    let mut writer = ReportWriter::create(&request.output)?;

    // 第一遍只统计总数, 两遍之间目录变化不影响正确性
    let total = count_matching(&request.directory, &filter, respect_gitignore);

    if logger.is_enabled() {
        logger.log_message(&format!(
            "开始扫描目录: {} (共 {} 个候选文件)",
            request.directory.display(),
            total
        ))?;
    }

    // 创建进度条
    let progress = ProgressBar::new(total);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.green} {pos}/{len} 文件 {msg}")
            .expect("无效的进度条模板"),
    );

    let mut outcome = ScanOutcome::default();

    visit_matching(
        &request.directory,
        &filter,
        respect_gitignore,
        logger,
        |entry| {
            outcome.total_files += 1;
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);

            match fs::read_to_string(entry.path()) {
                Ok(content) => {
                    let regions = FileRegions::partition(&content);
                    let region = regions.select(request.search_part);

                    // 所有关键词都必须命中, 缺一个就跳过整个文件
                    let all_present = request
                        .keywords
                        .iter()
                        .all(|keyword| matcher.is_present(region, keyword));

                    if all_present {
                        let mut occurrences = Vec::new();
                        for keyword in &request.keywords {
                            occurrences.extend(matcher.occurrences(region, keyword));
                        }

                        outcome.matched_files += 1;
                        outcome.total_matches += occurrences.len() as u64;

                        let report_entry = ReportEntry {
                            file_path: entry.path().display().to_string(),
                            search_part: request.search_part,
                            occurrences,
                        };

                        // 写入失败无处恢复, 终止扫描
                        writer.write_entry(&report_entry)?;

                        if logger.is_enabled() {
                            logger.log_file(entry.path(), size, "已匹配")?;
                        }
                    } else if logger.is_enabled() {
                        logger.log_file(entry.path(), size, "未匹配")?;
                    }
                }
                Err(err) => {
                    // 读取失败只影响当前文件, 扫描继续
                    outcome.read_errors += 1;
                    let _ = errors.report(ErrorType::FileRead, entry.path(), &err.to_string());

                    if logger.is_enabled() {
                        logger.log_file(entry.path(), size, "读取失败")?;
                    }
                }
            }

            progress.inc(1);
            Ok(())
        },
    )?;

    progress.finish_with_message("扫描完成");

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::SearchPart;
    use crate::infrastructure::Logger;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn request(
        directory: &Path,
        output: &Path,
        keywords: &[&str],
        part: SearchPart,
        threshold: u8,
    ) -> SearchRequest {
        SearchRequest::new(
            directory.to_path_buf(),
            ".txt".to_string(),
            keywords.iter().map(|k| k.to_string()).collect(),
            output.to_path_buf(),
            part,
            threshold,
        )
        .unwrap()
    }

    fn scan(request: &SearchRequest) -> ScanOutcome {
        let logger = Logger::new(false).unwrap();
        let errors = ErrorLogger::new(false).unwrap();
        run_scan(request, false, &logger, &errors).unwrap()
    }

    #[test]
    fn test_end_to_end_scenario() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "The quick brown fox").unwrap();
        fs::write(dir.path().join("b.txt"), "slow turtle").unwrap();

        let output = dir.path().join("report.txt");
        let request = request(dir.path(), &output, &["quick", "fox"], SearchPart::All, 80);

        let outcome = scan(&request);
        assert_eq!(outcome.total_files, 2);
        assert_eq!(outcome.matched_files, 1);
        assert_eq!(outcome.total_matches, 2);

        let report = fs::read_to_string(&output).unwrap();
        assert!(report.contains("a.txt"));
        assert!(!report.contains("b.txt"));
        assert!(report.contains("Searched in: all"));
        assert!(report.contains("- quick (matched as 'quick')"));
        assert!(report.contains("  Position: 4"));
        assert!(report.contains("- fox (matched as 'fox')"));
        assert!(report.contains("  Position: 16"));
    }

    #[test]
    fn test_all_keywords_required() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "The quick brown fox").unwrap();

        let output = dir.path().join("report.txt");
        let request = request(dir.path(), &output, &["quick", "zebra"], SearchPart::All, 80);

        let outcome = scan(&request);
        // 缺少一个关键词时整个文件不产生报告
        assert_eq!(outcome.total_files, 1);
        assert_eq!(outcome.matched_files, 0);
        assert_eq!(fs::read_to_string(&output).unwrap(), "");
    }

    #[test]
    fn test_region_selection_limits_search() {
        let dir = tempdir().unwrap();
        // "aaa bbb ccc" 三等分: "aaa" / " bb" / "b ccc"
        fs::write(dir.path().join("a.txt"), "aaa bbb ccc").unwrap();
        let output = dir.path().join("report.txt");

        let begin = request(dir.path(), &output, &["ccc"], SearchPart::Beginning, 80);
        assert_eq!(scan(&begin).matched_files, 0);

        let end = request(dir.path(), &output, &["ccc"], SearchPart::End, 80);
        assert_eq!(scan(&end).matched_files, 1);
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let dir = tempdir().unwrap();
        // 非 UTF-8 内容导致读取失败
        fs::write(dir.path().join("bad.txt"), [0xff_u8, 0xfe, 0x68]).unwrap();
        fs::write(dir.path().join("good.txt"), "hello world").unwrap();

        let output = dir.path().join("report.txt");
        let request = request(dir.path(), &output, &["hello"], SearchPart::All, 80);

        let outcome = scan(&request);
        // 坏文件不中断扫描, 进度计数仍到达总数
        assert_eq!(outcome.total_files, 2);
        assert_eq!(outcome.read_errors, 1);
        assert_eq!(outcome.matched_files, 1);

        let report = fs::read_to_string(&output).unwrap();
        assert!(report.contains("good.txt"));
        assert!(!report.contains("bad.txt"));
    }

    #[test]
    fn test_missing_directory_produces_empty_report() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("report.txt");
        let missing = PathBuf::from("/nonexistent/fuzzyfind/input");
        let request = request(&missing, &output, &["hello"], SearchPart::All, 80);

        let outcome = scan(&request);
        assert_eq!(outcome.total_files, 0);
        // 报告文件仍然被创建
        assert_eq!(fs::read_to_string(&output).unwrap(), "");
    }

    #[test]
    fn test_suffix_filter_excludes_other_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hello world").unwrap();
        fs::write(dir.path().join("b.md"), "hello world").unwrap();

        let output = dir.path().join("report.out");
        let request = request(dir.path(), &output, &["hello"], SearchPart::All, 80);

        let outcome = scan(&request);
        assert_eq!(outcome.total_files, 1);
        assert_eq!(outcome.matched_files, 1);
    }

    #[test]
    fn test_recursive_scan_finds_nested_files() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("a/b/deep.txt"), "hello world").unwrap();

        let output = dir.path().join("report.out");
        let request = request(dir.path(), &output, &["hello"], SearchPart::All, 80);

        let outcome = scan(&request);
        assert_eq!(outcome.matched_files, 1);
        assert!(fs::read_to_string(&output).unwrap().contains("deep.txt"));
    }

    #[test]
    fn test_fuzzy_qualification_with_typos() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "the qucik brown foxx").unwrap();

        let output = dir.path().join("report.txt");
        let request = request(dir.path(), &output, &["quick", "fox"], SearchPart::All, 60);

        let outcome = scan(&request);
        assert_eq!(outcome.matched_files, 1);

        let report = fs::read_to_string(&output).unwrap();
        assert!(report.contains("(matched as 'qucik')"));
        assert!(report.contains("(matched as 'foxx')"));
    }
}
