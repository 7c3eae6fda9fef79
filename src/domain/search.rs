use std::path::PathBuf;

use thiserror::Error;

/// 搜索配置错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// 阈值超出 0-100 范围
    #[error("相似度阈值必须在 0-100 之间, 实际为 {0}")]
    ThresholdOutOfRange(u8),
    /// 关键词列表为空
    #[error("关键词列表不能为空")]
    EmptyKeywords,
}

/// 要搜索的文件区域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPart {
    /// 开头三分之一
    Beginning,
    /// 中间三分之一
    Middle,
    /// 结尾三分之一
    End,
    /// 完整内容
    All,
}

impl SearchPart {
    /// 从用户输入解析搜索区域
    ///
    /// 无法识别的输入一律视为完整内容, 保持原有的宽松行为
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "beginning" => SearchPart::Beginning,
            "middle" => SearchPart::Middle,
            "end" => SearchPart::End,
            _ => SearchPart::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchPart::Beginning => "beginning",
            SearchPart::Middle => "middle",
            SearchPart::End => "end",
            SearchPart::All => "all",
        }
    }
}

impl std::fmt::Display for SearchPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一次扫描的全部参数, 构造后不再修改
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// 要搜索的目录
    pub directory: PathBuf,
    /// 文件名后缀过滤 (区分大小写)
    pub file_ending: String,
    /// 关键词列表, 保持输入顺序
    pub keywords: Vec<String>,
    /// 结果输出文件
    pub output: PathBuf,
    /// 要搜索的文件区域
    pub search_part: SearchPart,
    /// 模糊匹配阈值 (0-100)
    pub threshold: u8,
}

impl SearchRequest {
    /// 创建搜索请求, 构造时校验参数
    pub fn new(
        directory: PathBuf,
        file_ending: String,
        keywords: Vec<String>,
        output: PathBuf,
        search_part: SearchPart,
        threshold: u8,
    ) -> Result<Self, ConfigurationError> {
        if threshold > 100 {
            return Err(ConfigurationError::ThresholdOutOfRange(threshold));
        }
        if keywords.is_empty() {
            return Err(ConfigurationError::EmptyKeywords);
        }

        Ok(Self {
            directory,
            file_ending,
            keywords,
            output,
            search_part,
            threshold,
        })
    }

    /// 解析逗号分隔的关键词列表, 去除每项前后空白
    pub fn parse_keywords(input: &str) -> Vec<String> {
        input.split(',').map(|k| k.trim().to_string()).collect()
    }
}

/// 文件内容的三个连续区域
///
/// 按字符数整除三分, 末尾区域吸收余数, 三段拼接等于原文
#[derive(Debug)]
pub struct FileRegions<'a> {
    pub beginning: &'a str,
    pub middle: &'a str,
    pub end: &'a str,
    all: &'a str,
}

impl<'a> FileRegions<'a> {
    /// 将内容划分为开头/中间/结尾三个区域
    pub fn partition(content: &'a str) -> Self {
        let total_chars = content.chars().count();
        let part_chars = total_chars / 3;

        // 区域边界落在字符边界上, 不会切开多字节字符
        let first = char_boundary_at(content, part_chars);
        let second = char_boundary_at(content, part_chars * 2);

        Self {
            beginning: &content[..first],
            middle: &content[first..second],
            end: &content[second..],
            all: content,
        }
    }

    /// 按搜索区域取出对应内容, All 返回完整内容
    pub fn select(&self, part: SearchPart) -> &'a str {
        match part {
            SearchPart::Beginning => self.beginning,
            SearchPart::Middle => self.middle,
            SearchPart::End => self.end,
            SearchPart::All => self.all,
        }
    }
}

/// 第 n 个字符对应的字节偏移, 超出长度时取内容末尾
fn char_boundary_at(content: &str, n: usize) -> usize {
    content
        .char_indices()
        .nth(n)
        .map(|(idx, _)| idx)
        .unwrap_or(content.len())
}

/// 单个关键词的一处匹配
#[derive(Debug, Clone)]
pub struct MatchOccurrence {
    /// 原始关键词
    pub keyword: String,
    /// 实际匹配到的词
    pub matched_word: String,
    /// 在搜索区域内的字节偏移
    pub position: usize,
    /// 匹配位置前后各 50 个字符的上下文
    pub context: String,
}

/// 单个文件的报告条目
#[derive(Debug)]
pub struct ReportEntry {
    pub file_path: String,
    pub search_part: SearchPart,
    /// 按关键词列表顺序分组的全部匹配
    pub occurrences: Vec<MatchOccurrence>,
}
